use std::path::{Path, PathBuf};

use anyhow::Context;

use waycode_agent::{GeminiClient, RefactorAgent};
use waycode_analysis::detect_language;
use waycode_memory::{auto_select_provider, MemoryManager};

/// Run the `index` command: walk source files and index each of them.
pub async fn run_index(path: PathBuf, recursive: bool) -> anyhow::Result<()> {
    let config = waycode_config::load_config()?;
    let api_key = waycode_config::gemini_api_key()?;
    let data_dir = waycode_config::data_dir()?;

    let provider = auto_select_provider(&config.embedding_model)
        .context("No embedding provider available (set GEMINI_API_KEY)")?;
    let memory = MemoryManager::open(&data_dir, provider)?;
    let client = Box::new(GeminiClient::new(api_key, config.model.clone()));
    let mut agent = RefactorAgent::new(client, memory, config.temperature);

    let files = collect_source_files(&path, recursive)?;
    let mut indexed = 0usize;
    for file in &files {
        let language = agent.index_file(file).await?;
        println!("  Indexed: {} ({language})", file.display());
        indexed += 1;
    }

    println!("\nTotal indexed: {indexed}");
    Ok(())
}

/// Collect files whose extension maps to a known language. A file path is
/// returned as-is; a directory is scanned one level deep unless
/// `recursive` is set.
fn collect_source_files(path: &Path, recursive: bool) -> anyhow::Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry_path = entry?.path();
        if entry_path.is_file() {
            if detect_language(&entry_path) != "unknown" {
                files.push(entry_path);
            }
        } else if recursive && entry_path.is_dir() {
            files.extend(collect_source_files(&entry_path, true)?);
        }
    }
    files.sort();
    Ok(files)
}
