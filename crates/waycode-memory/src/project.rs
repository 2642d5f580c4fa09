//! JSON-persisted project memory and refactor history.
//!
//! Both files are rewritten wholesale on every mutation. There is no
//! cross-process locking; concurrent writers are last-writer-wins.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{MemoryError, Result};

/// Durable record of accumulated style and pattern observations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectMemory {
    #[serde(default)]
    pub style_preferences: BTreeMap<String, String>,
    /// Insertion-ordered, de-duplicated pattern flags.
    #[serde(default)]
    pub common_patterns: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub architecture: BTreeMap<String, String>,
}

impl ProjectMemory {
    /// Load project memory from disk. A missing file yields the default
    /// empty memory; a malformed file is a corrupt-state error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| MemoryError::CorruptState {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Persist project memory, rewriting the whole file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Record a pattern flag, keeping `common_patterns` duplicate-free.
    /// Returns true if the flag was newly observed.
    pub fn add_pattern(&mut self, name: &str) -> bool {
        if self.common_patterns.iter().any(|p| p == name) {
            return false;
        }
        self.common_patterns.push(name.to_string());
        true
    }
}

/// One entry in the append-only refactor history log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefactorHistoryEntry {
    pub filename: String,
    pub language: String,
    /// ISO-8601 timestamp.
    pub timestamp: String,
    /// Change summary, truncated to 200 characters.
    pub changes_summary: String,
}

/// Load the refactor history array from disk. Missing file → empty log.
pub fn load_history(path: &Path) -> Result<Vec<RefactorHistoryEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| MemoryError::CorruptState {
        path: path.to_path_buf(),
        source,
    })
}

/// Persist the refactor history, rewriting the whole file.
pub fn save_history(path: &Path, entries: &[RefactorHistoryEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(entries)?)?;
    Ok(())
}

/// Truncate a string to at most `max` characters.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let memory = ProjectMemory::load(&dir.path().join("project_memory.json")).unwrap();
        assert!(memory.common_patterns.is_empty());
        assert!(memory.style_preferences.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project_memory.json");

        let mut memory = ProjectMemory::default();
        memory.add_pattern("prefers_async_await");
        memory.dependencies.push("tokio".to_string());
        memory.save(&path).unwrap();

        let reloaded = ProjectMemory::load(&path).unwrap();
        assert_eq!(reloaded.common_patterns, vec!["prefers_async_await"]);
        assert_eq!(reloaded.dependencies, vec!["tokio"]);
    }

    #[test]
    fn test_add_pattern_deduplicates() {
        let mut memory = ProjectMemory::default();
        assert!(memory.add_pattern("modern_js_syntax"));
        assert!(!memory.add_pattern("modern_js_syntax"));
        assert_eq!(memory.common_patterns.len(), 1);
    }

    #[test]
    fn test_corrupt_memory_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project_memory.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = ProjectMemory::load(&path).unwrap_err();
        assert!(matches!(err, MemoryError::CorruptState { .. }));
    }

    #[test]
    fn test_history_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refactor_history.json");

        assert!(load_history(&path).unwrap().is_empty());

        let entries = vec![RefactorHistoryEntry {
            filename: "app.py".to_string(),
            language: "python".to_string(),
            timestamp: "2026-08-31T12:00:00Z".to_string(),
            changes_summary: "Extracted helper".to_string(),
        }];
        save_history(&path, &entries).unwrap();

        let reloaded = load_history(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].filename, "app.py");
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("short", 200), "short");
    }
}
