//! Context assembly: renders a retrieval result into one ordered text
//! block for prompt injection.

use crate::manager::RelevantContext;
use crate::project::truncate_chars;

/// Render the assembled context. Deterministic concatenation: language
/// line, project patterns, up to two similar-code excerpts (200 chars),
/// up to two refactor-history excerpts (150 chars), then all style
/// documents. Sections with no data are omitted entirely.
pub fn build_context(language: &str, relevant: &RelevantContext) -> String {
    let mut parts = Vec::new();

    parts.push(format!("Language: {language}"));

    if !relevant.project_patterns.is_empty() {
        parts.push("\nProject Patterns:".to_string());
        for pattern in &relevant.project_patterns {
            parts.push(format!("- {pattern}"));
        }
    }

    if !relevant.similar_code.is_empty() {
        parts.push("\nSimilar code in your project:".to_string());
        for (i, hit) in relevant.similar_code.iter().take(2).enumerate() {
            parts.push(format!(
                "Example {}: {}...",
                i + 1,
                truncate_chars(&hit.document, 200)
            ));
        }
    }

    if !relevant.refactor_history.is_empty() {
        parts.push("\nPrevious refactoring patterns:".to_string());
        for hit in relevant.refactor_history.iter().take(2) {
            parts.push(format!("- {}...", truncate_chars(&hit.document, 150)));
        }
    }

    if !relevant.style_patterns.is_empty() {
        parts.push("\nYour coding style preferences:".to_string());
        for hit in &relevant.style_patterns {
            parts.push(format!("- {}", hit.document));
        }
    }

    parts.join("\n")
}
