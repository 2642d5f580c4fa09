mod index;
mod refactor;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "waycode", about = "AI-powered code refactoring assistant")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refactor a code file with AI suggestions
    Refactor {
        /// File to refactor
        filepath: PathBuf,

        /// Output file path (default: ./output/<filename>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show the diff between original and refactored code (default)
        #[arg(long = "show-diff", overrides_with = "no_diff")]
        show_diff: bool,

        /// Hide the diff
        #[arg(long = "no-diff")]
        no_diff: bool,
    },
    /// Index files to learn coding patterns from them
    Index {
        /// File or directory to index
        path: PathBuf,

        /// Recurse into subdirectories
        #[arg(short, long)]
        recursive: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Refactor {
            filepath,
            output,
            show_diff: _,
            no_diff,
        } => {
            // Diff is shown unless --no-diff wins
            rt.block_on(refactor::run_refactor(filepath, output, !no_diff))?;
        }
        Commands::Index { path, recursive } => {
            rt.block_on(index::run_index(path, recursive))?;
        }
    }

    Ok(())
}
