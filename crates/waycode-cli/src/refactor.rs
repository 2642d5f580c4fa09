use std::path::PathBuf;

use anyhow::Context;

use waycode_agent::{GeminiClient, RefactorAgent, RefactorOutcome};
use waycode_analysis::detect_language;
use waycode_memory::{auto_select_provider, MemoryManager};

/// Run the `refactor` command: one sequential pipeline from file read to
/// memory update.
pub async fn run_refactor(
    filepath: PathBuf,
    output: Option<PathBuf>,
    show_diff: bool,
) -> anyhow::Result<()> {
    let config = waycode_config::load_config()?;
    let api_key = waycode_config::gemini_api_key()?;
    let data_dir = waycode_config::data_dir()?;

    let provider = auto_select_provider(&config.embedding_model)
        .context("No embedding provider available (set GEMINI_API_KEY)")?;
    let memory = MemoryManager::open(&data_dir, provider)?;
    let client = Box::new(GeminiClient::new(api_key, config.model.clone()));
    let mut agent = RefactorAgent::new(client, memory, config.temperature);

    let code = std::fs::read_to_string(&filepath)
        .with_context(|| format!("Failed to read {}", filepath.display()))?;
    let language = detect_language(&filepath);

    println!("Refactoring {} ({language})...", filepath.display());

    match agent
        .refactor(&code, language, filepath.to_str())
        .await?
    {
        RefactorOutcome::Refactored {
            code: refactored,
            explanation,
            diff,
        } => {
            println!("\nEXPLANATION:\n{explanation}");
            if show_diff {
                println!("\nDIFF:\n{diff}");
            }

            let output = match output {
                Some(path) => path,
                None => {
                    let name = filepath
                        .file_name()
                        .context("Input path has no file name")?;
                    PathBuf::from("output").join(name)
                }
            };
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(&output, &refactored)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("\nSaved to: {}", output.display());
        }
        RefactorOutcome::Unparsed { raw } => {
            eprintln!("Could not parse refactored code from the model response:");
            println!("{raw}");
            std::process::exit(1);
        }
    }

    Ok(())
}
