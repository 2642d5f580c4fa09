//! SQLite-backed vector storage for the three memory collections.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::embeddings::EmbeddingProvider;
use crate::Result;

/// The three record collections the memory subsystem uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    CodePatterns,
    RefactorHistory,
    StylePreferences,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::CodePatterns => "code_patterns",
            Collection::RefactorHistory => "refactor_history",
            Collection::StylePreferences => "style_preferences",
        }
    }
}

/// A record returned from a similarity search.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: String,
    pub document: String,
    pub metadata: BTreeMap<String, String>,
    pub score: f32,
}

/// Vector store backed by SQLite. Documents are embedded on insert and
/// ranked by cosine similarity on query. All inserts are idempotent
/// upserts keyed by a content digest.
pub struct VectorStore {
    conn: Mutex<Connection>,
    provider: Box<dyn EmbeddingProvider>,
}

impl VectorStore {
    /// Open or create a vector store at the given path.
    pub fn open(db_path: &Path, provider: Box<dyn EmbeddingProvider>) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;

             CREATE TABLE IF NOT EXISTS records (
                 collection TEXT NOT NULL,
                 id TEXT NOT NULL,
                 document TEXT NOT NULL,
                 metadata TEXT NOT NULL,
                 embedding BLOB NOT NULL,
                 updated_at INTEGER NOT NULL,
                 PRIMARY KEY (collection, id)
             );",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
            provider,
        })
    }

    /// Insert a code sample into the code-pattern collection.
    pub async fn add_code_pattern(
        &self,
        code: &str,
        metadata: BTreeMap<String, String>,
    ) -> Result<()> {
        let filename = metadata
            .get("filename")
            .map(String::as_str)
            .unwrap_or("unknown");
        let id = format!("code_{}_{}", filename, content_digest(code));
        self.upsert(Collection::CodePatterns, &id, code, &metadata).await
    }

    /// Insert an original/refactored pair into the refactor collection.
    pub async fn add_refactoring(
        &self,
        original: &str,
        refactored: &str,
        metadata: BTreeMap<String, String>,
    ) -> Result<()> {
        let document = format!("Original:\n{original}\n\nRefactored:\n{refactored}");
        let id = format!("refactor_{}", content_digest(original));
        self.upsert(Collection::RefactorHistory, &id, &document, &metadata)
            .await
    }

    /// Insert a style-preference pattern into the style collection.
    pub async fn add_style_preference(
        &self,
        pattern: &str,
        metadata: BTreeMap<String, String>,
    ) -> Result<()> {
        let id = format!("style_{}", content_digest(pattern));
        self.upsert(Collection::StylePreferences, &id, pattern, &metadata)
            .await
    }

    pub async fn search_similar_code(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        self.search(Collection::CodePatterns, query, k).await
    }

    pub async fn search_refactor_history(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        self.search(Collection::RefactorHistory, query, k).await
    }

    pub async fn search_style_patterns(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        self.search(Collection::StylePreferences, query, k).await
    }

    /// Number of records in a collection.
    pub fn count(&self, collection: Collection) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM records WHERE collection = ?1",
            rusqlite::params![collection.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    async fn upsert(
        &self,
        collection: Collection,
        id: &str,
        document: &str,
        metadata: &BTreeMap<String, String>,
    ) -> Result<()> {
        let embedding = self.provider.embed(document).await?;
        let metadata_json = serde_json::to_string(metadata)?;
        let now = chrono::Utc::now().timestamp();

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO records (collection, id, document, metadata, embedding, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                collection.as_str(),
                id,
                document,
                metadata_json,
                embedding_to_bytes(&embedding),
                now
            ],
        )?;
        tracing::debug!(collection = collection.as_str(), id, "Upserted record");
        Ok(())
    }

    /// Rank all records of a collection against the query by cosine
    /// similarity. Equal scores are broken by record id. An empty
    /// collection returns an empty result without an embedding call.
    async fn search(&self, collection: Collection, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        if self.count(collection)? == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.provider.embed(query).await?;

        let mut hits = {
            let conn = self.conn.lock().unwrap();
            let mut stmt = conn.prepare(
                "SELECT id, document, metadata, embedding FROM records WHERE collection = ?1",
            )?;
            let rows = stmt
                .query_map(rusqlite::params![collection.as_str()], |row| {
                    let metadata_json: String = row.get(2)?;
                    let embedding_bytes: Vec<u8> = row.get(3)?;
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        metadata_json,
                        embedding_bytes,
                    ))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let mut hits = Vec::with_capacity(rows.len());
            for (id, document, metadata_json, embedding_bytes) in rows {
                let metadata: BTreeMap<String, String> = serde_json::from_str(&metadata_json)?;
                let embedding = bytes_to_embedding(&embedding_bytes);
                let score = cosine_similarity(&query_embedding, &embedding);
                hits.push(SearchHit {
                    id,
                    document,
                    metadata,
                    score,
                });
            }
            hits
        };

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(k);
        Ok(hits)
    }
}

/// SHA-256 hex digest used for record identity.
fn content_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Cosine similarity between two vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Deterministic byte-frequency embedding for tests; counts calls.
    pub(crate) struct StubEmbedding {
        pub calls: Arc<AtomicUsize>,
    }

    impl StubEmbedding {
        pub(crate) fn new() -> (Box<dyn EmbeddingProvider>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Box::new(Self {
                    calls: calls.clone(),
                }),
                calls,
            )
        }
    }

    #[async_trait]
    impl EmbeddingProvider for StubEmbedding {
        fn model(&self) -> &str {
            "stub-embedding"
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut v = vec![0.0f32; 16];
            for b in text.bytes() {
                v[(b as usize) % 16] += 1.0;
            }
            Ok(v)
        }
    }

    /// Embedding that maps every text to the same vector, so all scores tie.
    pub(crate) struct ConstantEmbedding;

    #[async_trait]
    impl EmbeddingProvider for ConstantEmbedding {
        fn model(&self) -> &str {
            "constant-embedding"
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0, 0.0])
        }
    }
}
