//! `SQLite` persistence for the active index generation
//!
//! Keeps the last indexed document across process restarts. Embeddings are
//! stored as little-endian `f32` BLOBs next to the chunk text.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::DocumentChunk;
use crate::domain::ports::{ChunkStore, StoredChunk, StoredGeneration};

/// Chunk store backed by a `SQLite` file
pub struct SqliteChunkStore {
    pool: SqlitePool,
}

impl SqliteChunkStore {
    /// Open (creating if missing) the database at `path`
    ///
    /// Missing parent directories are created. Any failure here means the
    /// index cannot be used and is reported as `IndexUnavailable`.
    pub async fn open(path: impl AsRef<Path>) -> RagResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                RagError::IndexUnavailable(format!(
                    "cannot create index directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        Self::connect_with(options).await
    }

    /// Open a database from a `sqlite:` URL (e.g. `sqlite::memory:`)
    pub async fn open_url(database_url: &str) -> RagResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| RagError::IndexUnavailable(format!("invalid database URL: {e}")))?
            .create_if_missing(true);

        Self::connect_with(options).await
    }

    async fn connect_with(options: SqliteConnectOptions) -> RagResult<Self> {
        // One connection keeps `sqlite::memory:` databases shared and
        // serializes writers; the index only writes on reindex.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|e| RagError::IndexUnavailable(format!("failed to open index store: {e}")))?;

        let store = Self { pool };
        store.initialize().await?;
        Ok(store)
    }

    /// Serialize embedding vector to bytes for storage
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding vector from bytes
    fn bytes_to_embedding(bytes: &[u8]) -> RagResult<Vec<f32>> {
        if bytes.len() % 4 != 0 {
            return Err(RagError::IndexUnavailable(
                "Invalid embedding bytes length".to_string(),
            ));
        }

        Ok(bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect())
    }
}

fn to_i64(value: usize) -> RagResult<i64> {
    i64::try_from(value)
        .map_err(|_| RagError::IndexUnavailable(format!("value {value} out of range")))
}

fn to_usize(value: i64) -> RagResult<usize> {
    usize::try_from(value)
        .map_err(|_| RagError::IndexUnavailable(format!("corrupt stored offset {value}")))
}

#[async_trait]
impl ChunkStore for SqliteChunkStore {
    async fn initialize(&self) -> RagResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS index_generation (
                slot INTEGER PRIMARY KEY CHECK (slot = 1),
                generation_id TEXT NOT NULL,
                embedder TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS index_chunks (
                chunk_id INTEGER PRIMARY KEY,
                text TEXT NOT NULL,
                word_start INTEGER,
                word_end INTEGER,
                embedding BLOB NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn load(&self) -> RagResult<Option<StoredGeneration>> {
        let Some(header) =
            sqlx::query("SELECT generation_id, embedder FROM index_generation WHERE slot = 1")
                .fetch_optional(&self.pool)
                .await?
        else {
            return Ok(None);
        };

        let generation_id: String = header.get("generation_id");
        let embedder: String = header.get("embedder");
        let id = Uuid::parse_str(&generation_id)
            .map_err(|e| RagError::IndexUnavailable(format!("corrupt generation id: {e}")))?;

        let rows = sqlx::query(
            "SELECT chunk_id, text, word_start, word_end, embedding FROM index_chunks ORDER BY chunk_id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut chunks = Vec::with_capacity(rows.len());
        for row in rows {
            let chunk_id: i64 = row.get("chunk_id");
            let text: String = row.get("text");
            let word_start: Option<i64> = row.get("word_start");
            let word_end: Option<i64> = row.get("word_end");
            let embedding_bytes: Vec<u8> = row.get("embedding");

            chunks.push(StoredChunk {
                chunk: DocumentChunk {
                    id: to_usize(chunk_id)?,
                    text,
                    word_start: word_start.map(to_usize).transpose()?,
                    word_end: word_end.map(to_usize).transpose()?,
                },
                embedding: Self::bytes_to_embedding(&embedding_bytes)?,
            });
        }

        Ok(Some(StoredGeneration {
            id,
            embedder,
            chunks,
        }))
    }

    async fn replace_all(&self, generation: &StoredGeneration) -> RagResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM index_chunks")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM index_generation")
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO index_generation (slot, generation_id, embedder) VALUES (1, ?, ?)")
            .bind(generation.id.to_string())
            .bind(&generation.embedder)
            .execute(&mut *tx)
            .await?;

        for stored in &generation.chunks {
            let chunk = &stored.chunk;
            sqlx::query(
                r"
                INSERT INTO index_chunks (chunk_id, text, word_start, word_end, embedding)
                VALUES (?, ?, ?, ?, ?)
                ",
            )
            .bind(to_i64(chunk.id)?)
            .bind(&chunk.text)
            .bind(chunk.word_start.map(to_i64).transpose()?)
            .bind(chunk.word_end.map(to_i64).transpose()?)
            .bind(Self::embedding_to_bytes(&stored.embedding))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            generation = %generation.id,
            chunks = generation.chunks.len(),
            "persisted index generation"
        );

        Ok(())
    }

    async fn clear(&self) -> RagResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM index_chunks")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM index_generation")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
