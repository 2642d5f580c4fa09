//! Memory manager — the single coordination point between durable JSON
//! state and the vector store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::embeddings::EmbeddingProvider;
use crate::patterns::detect_patterns;
use crate::project::{self, ProjectMemory, RefactorHistoryEntry};
use crate::store::{SearchHit, VectorStore};
use crate::Result;

/// Fan-out retrieval result for one query.
#[derive(Debug, Default)]
pub struct RelevantContext {
    pub similar_code: Vec<SearchHit>,
    pub refactor_history: Vec<SearchHit>,
    pub style_patterns: Vec<SearchHit>,
    pub project_patterns: Vec<String>,
}

/// Owns the vector store plus the JSON-persisted project memory and
/// refactor history. All mutation and retrieval the rest of the system
/// performs goes through here.
pub struct MemoryManager {
    store: VectorStore,
    project_memory: ProjectMemory,
    history: Vec<RefactorHistoryEntry>,
    memory_path: PathBuf,
    history_path: PathBuf,
}

impl MemoryManager {
    /// Open the memory subsystem rooted at the given data directory.
    pub fn open(data_dir: &Path, provider: Box<dyn EmbeddingProvider>) -> Result<Self> {
        let store = VectorStore::open(&waycode_config::vector_store_path(data_dir), provider)?;
        let memory_path = waycode_config::project_memory_path(data_dir);
        let history_path = waycode_config::refactor_history_path(data_dir);

        let project_memory = ProjectMemory::load(&memory_path)?;
        let history = project::load_history(&history_path)?;
        debug!(
            patterns = project_memory.common_patterns.len(),
            history_entries = history.len(),
            "Memory opened"
        );

        Ok(Self {
            store,
            project_memory,
            history,
            memory_path,
            history_path,
        })
    }

    /// Index a source file: store it in the code-pattern collection, then
    /// run the pattern rule table against it. Newly observed flags are
    /// appended to `common_patterns` once and mirrored into the style
    /// collection.
    pub async fn index_file(&mut self, path: &str, code: &str, language: &str) -> Result<()> {
        let mut metadata = BTreeMap::new();
        metadata.insert("filename".to_string(), path.to_string());
        metadata.insert("language".to_string(), language.to_string());
        metadata.insert("indexed_at".to_string(), chrono::Utc::now().to_rfc3339());

        self.store.add_code_pattern(code, metadata).await?;

        for flag in detect_patterns(code, language) {
            if self.project_memory.add_pattern(flag) {
                info!(pattern = flag, "New pattern observed");
                let mut style_meta = BTreeMap::new();
                style_meta.insert("language".to_string(), language.to_string());
                style_meta.insert("type".to_string(), "syntax_preference".to_string());
                self.store.add_style_preference(flag, style_meta).await?;
            }
        }

        self.project_memory.save(&self.memory_path)?;
        Ok(())
    }

    /// Record a completed refactoring: the pair goes into the refactor
    /// collection and a truncated summary is appended to the history log.
    pub async fn store_refactoring(
        &mut self,
        original: &str,
        refactored: &str,
        language: &str,
        filename: &str,
        changes: &str,
    ) -> Result<()> {
        let timestamp = chrono::Utc::now().to_rfc3339();
        let changes_summary = project::truncate_chars(changes, 200);

        let mut metadata = BTreeMap::new();
        metadata.insert("language".to_string(), language.to_string());
        metadata.insert("filename".to_string(), filename.to_string());
        metadata.insert("timestamp".to_string(), timestamp.clone());
        metadata.insert("changes".to_string(), changes_summary.clone());

        self.store
            .add_refactoring(original, refactored, metadata)
            .await?;

        self.history.push(RefactorHistoryEntry {
            filename: filename.to_string(),
            language: language.to_string(),
            timestamp,
            changes_summary,
        });
        project::save_history(&self.history_path, &self.history)?;
        Ok(())
    }

    /// Fan-out read over all three collections plus the current pattern
    /// flags. Pure read; never fails on empty memory.
    pub async fn relevant_context(
        &self,
        code: &str,
        language: &str,
        k: usize,
    ) -> Result<RelevantContext> {
        debug!(language, k, "Retrieving relevant context");
        Ok(RelevantContext {
            similar_code: self.store.search_similar_code(code, k).await?,
            refactor_history: self.store.search_refactor_history(code, k).await?,
            style_patterns: self.store.search_style_patterns(code, k).await?,
            project_patterns: self.project_memory.common_patterns.clone(),
        })
    }

    /// Currently observed pattern flags, in insertion order.
    pub fn common_patterns(&self) -> &[String] {
        &self.project_memory.common_patterns
    }

    /// The refactor history log, oldest first.
    pub fn history(&self) -> &[RefactorHistoryEntry] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::StubEmbedding;
    use crate::store::Collection;

    async fn open_manager(dir: &Path) -> MemoryManager {
        let (provider, _) = StubEmbedding::new();
        MemoryManager::open(dir, provider).unwrap()
    }

    #[tokio::test]
    async fn test_relevant_context_on_empty_memory() {
        let dir = tempfile::tempdir().unwrap();
        let manager = open_manager(dir.path()).await;

        let relevant = manager.relevant_context("def f(): pass", "python", 3).await.unwrap();
        assert!(relevant.similar_code.is_empty());
        assert!(relevant.refactor_history.is_empty());
        assert!(relevant.style_patterns.is_empty());
        assert!(relevant.project_patterns.is_empty());
    }

    #[tokio::test]
    async fn test_index_file_records_js_patterns() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = open_manager(dir.path()).await;

        let code = "const x = () => {}\nclass Foo extends Bar {}";
        manager.index_file("app.js", code, "javascript").await.unwrap();

        let patterns = manager.common_patterns();
        assert!(patterns.contains(&"prefers_functional_components".to_string()));
        assert!(patterns.contains(&"uses_class_components".to_string()));
        assert!(patterns.contains(&"modern_js_syntax".to_string()));
    }

    #[tokio::test]
    async fn test_reindexing_same_file_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = open_manager(dir.path()).await;

        let code = "async function f() { await g(); }";
        manager.index_file("a.js", code, "javascript").await.unwrap();
        manager.index_file("a.js", code, "javascript").await.unwrap();

        let flagged = manager
            .common_patterns()
            .iter()
            .filter(|p| *p == "prefers_async_await")
            .count();
        assert_eq!(flagged, 1);

        let relevant = manager.relevant_context(code, "javascript", 10).await.unwrap();
        assert_eq!(relevant.similar_code.len(), 1);
    }

    #[tokio::test]
    async fn test_every_flag_has_a_style_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = open_manager(dir.path()).await;

        manager
            .index_file("a.js", "const x = 1; let y = 2;", "javascript")
            .await
            .unwrap();
        manager
            .index_file("b.py", "async def f():\n    await g()\n", "python")
            .await
            .unwrap();

        assert_eq!(
            manager.store.count(Collection::StylePreferences).unwrap(),
            manager.common_patterns().len()
        );
    }

    #[tokio::test]
    async fn test_patterns_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut manager = open_manager(dir.path()).await;
            manager
                .index_file("a.js", "const x = 1;", "javascript")
                .await
                .unwrap();
        }

        let reopened = open_manager(dir.path()).await;
        assert!(reopened
            .common_patterns()
            .contains(&"modern_js_syntax".to_string()));
    }

    #[tokio::test]
    async fn test_store_refactoring_truncates_summary() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = open_manager(dir.path()).await;

        let long_summary = "x".repeat(500);
        manager
            .store_refactoring("old()", "new()", "python", "app.py", &long_summary)
            .await
            .unwrap();

        assert_eq!(manager.history().len(), 1);
        assert_eq!(manager.history()[0].changes_summary.chars().count(), 200);

        // The vector record carries the same truncated summary in its metadata
        let relevant = manager.relevant_context("old()", "python", 1).await.unwrap();
        assert_eq!(relevant.refactor_history.len(), 1);
        assert_eq!(
            relevant.refactor_history[0]
                .metadata
                .get("changes")
                .map(|c| c.chars().count()),
            Some(200)
        );

        // History is flushed to disk after each append
        let on_disk =
            project::load_history(&waycode_config::refactor_history_path(dir.path())).unwrap();
        assert_eq!(on_disk.len(), 1);
    }
}
