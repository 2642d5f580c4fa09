//! waycode-agent: refactor orchestration.
//!
//! Sequences classify → retrieve context → prompt → generate → parse →
//! diff → memory update. One pipeline per invocation; no retry anywhere.
//! A response with no parsable code block is a soft failure that surfaces
//! the raw model output.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use waycode_analysis::{complexity, detect_language, unified_diff};
use waycode_memory::{build_context, MemoryManager, MemoryError};

pub mod client;
pub mod parse;

pub use client::{GeminiClient, GenerationClient};
pub use parse::{parse_refactored, ParsedRefactor};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Generation API error: {0}")]
    Api(String),
    #[error(transparent)]
    Memory(#[from] MemoryError),
}

pub type Result<T> = std::result::Result<T, AgentError>;

/// Result of one refactor invocation.
#[derive(Debug)]
pub enum RefactorOutcome {
    /// The model response parsed; the pair was recorded in memory.
    Refactored {
        code: String,
        explanation: String,
        diff: String,
    },
    /// No fenced code block in the response; raw text for manual recovery.
    Unparsed { raw: String },
}

/// Orchestrates one CLI invocation against the memory subsystem and the
/// generation client.
pub struct RefactorAgent {
    client: Box<dyn GenerationClient>,
    memory: MemoryManager,
    temperature: f32,
}

impl RefactorAgent {
    pub fn new(client: Box<dyn GenerationClient>, memory: MemoryManager, temperature: f32) -> Self {
        Self {
            client,
            memory,
            temperature,
        }
    }

    /// Refactor a piece of code. On a parsable response the diff is
    /// computed and the pair persisted; on parse failure the raw response
    /// is returned instead.
    pub async fn refactor(
        &mut self,
        code: &str,
        language: &str,
        filename: Option<&str>,
    ) -> Result<RefactorOutcome> {
        let relevant = self.memory.relevant_context(code, language, 3).await?;
        let context = build_context(language, &relevant);
        let prompt = waycode_config::refactor_prompt(&context, language, code);

        info!(model = self.client.model(), language, "Generating refactor");
        let raw = self.client.generate(&prompt, self.temperature).await?;

        let Some(parsed) = parse_refactored(&raw) else {
            debug!("Model response contained no closed code block");
            return Ok(RefactorOutcome::Unparsed { raw });
        };

        let diff = unified_diff(code, &parsed.code);
        self.memory
            .store_refactoring(
                code,
                &parsed.code,
                language,
                filename.unwrap_or("unknown"),
                &parsed.explanation,
            )
            .await?;

        Ok(RefactorOutcome::Refactored {
            code: parsed.code,
            explanation: parsed.explanation,
            diff,
        })
    }

    /// Read, classify, and index one source file. Returns the detected
    /// language label.
    pub async fn index_file(&mut self, path: &Path) -> Result<&'static str> {
        let code = std::fs::read_to_string(path)?;
        let language = detect_language(path);

        let report = complexity(&code);
        debug!(
            path = %path.display(),
            language,
            lines = report.code_lines,
            nesting = report.max_nesting,
            functions = report.function_count,
            "Indexing file"
        );

        self.memory
            .index_file(&path.to_string_lossy(), &code, language)
            .await?;
        Ok(language)
    }

    /// The underlying memory manager.
    pub fn memory(&self) -> &MemoryManager {
        &self.memory
    }
}
