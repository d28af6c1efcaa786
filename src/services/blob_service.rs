//! BlobService — durable blob storage backed by SQLite for metadata and
//! local disk for payloads. Payloads are sharded beneath
//! `base_path/{shard}/{shard}/{id}` to keep per-directory file counts down.
//!
//! This is the tool's stand-in for a managed platform: it owns the metadata
//! index, the payload bytes, and the pagination cursors. Handlers never
//! touch the database or the filesystem directly.

use crate::models::blob::BlobMetadata;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt, pin_mut};
use sqlx::SqlitePool;
use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("blob `{0}` not found")]
    BlobNotFound(Uuid),
    #[error("invalid pagination cursor")]
    InvalidCursor,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One page of browse results.
#[derive(Debug)]
pub struct BlobPage {
    pub blobs: Vec<BlobMetadata>,
    /// Continuation token for the next page, present iff `more`.
    pub cursor: Option<String>,
    pub more: bool,
}

#[derive(Clone)]
pub struct BlobService {
    /// Shared SQLite connection pool used for metadata operations.
    pub db: Arc<SqlitePool>,

    /// Base directory on disk where blob payloads are stored.
    pub base_path: PathBuf,
}

impl BlobService {
    pub fn new(db: Arc<SqlitePool>, base_path: impl Into<PathBuf>) -> Self {
        Self {
            db,
            base_path: base_path.into(),
        }
    }

    /// Generate two-level shard identifiers for a blob id.
    ///
    /// Uses MD5(id) and returns the first two bytes as lowercase hex
    /// (00–ff).
    fn shards(id: &Uuid) -> (String, String) {
        let digest = md5::compute(id.as_bytes());
        (format!("{:02x}", digest[0]), format!("{:02x}", digest[1]))
    }

    /// Fully-qualified payload path for a blob id. Parent directories may
    /// not exist yet.
    fn blob_path(&self, id: &Uuid) -> PathBuf {
        let (shard_a, shard_b) = Self::shards(id);
        let mut path = self.base_path.clone();
        path.push(shard_a);
        path.push(shard_b);
        path.push(id.to_string());
        path
    }

    async fn fetch_blob(&self, id: &Uuid) -> StoreResult<BlobMetadata> {
        sqlx::query_as::<_, BlobMetadata>(
            "SELECT id, filename, content_type, size, creation FROM blobs WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => StoreError::BlobNotFound(*id),
            other => StoreError::Sqlx(other),
        })
    }

    /// Stream a new blob to disk and record its metadata.
    ///
    /// Bytes go to a temp file first, then an atomic rename into the final
    /// location; size is counted while streaming. The temp file is removed
    /// on any failure, and the payload is removed if the metadata insert
    /// fails, so a blob is either fully present or absent.
    pub async fn store_blob<S>(
        &self,
        filename: &str,
        content_type: &str,
        stream: S,
    ) -> StoreResult<BlobMetadata>
    where
        S: Stream<Item = io::Result<Bytes>> + Send,
    {
        let id = Uuid::new_v4();
        let file_path = self.blob_path(&id);
        let parent = file_path.parent().map(Path::to_path_buf).ok_or_else(|| {
            StoreError::Io(io::Error::new(
                ErrorKind::Other,
                "blob path missing parent directory",
            ))
        })?;
        fs::create_dir_all(&parent).await?;
        let tmp_path = parent.join(format!(".tmp-{id}"));
        let mut file = File::create(&tmp_path).await?;

        let mut size: i64 = 0;
        pin_mut!(stream);
        while let Some(chunk_res) = stream.next().await {
            let chunk = match chunk_res {
                Ok(chunk) => chunk,
                Err(err) => {
                    let _ = fs::remove_file(&tmp_path).await;
                    return Err(StoreError::Io(err));
                }
            };
            size += chunk.len() as i64;
            if let Err(err) = file.write_all(&chunk).await {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(StoreError::Io(err));
            }
        }
        if let Err(err) = file.flush().await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StoreError::Io(err));
        }
        if let Err(err) = file.sync_all().await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StoreError::Io(err));
        }
        if let Err(err) = fs::rename(&tmp_path, &file_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StoreError::Io(err));
        }

        // Truncate to whole seconds to match the stored epoch value.
        let now = Utc::now();
        let creation = DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now);

        let insert = sqlx::query(
            "INSERT INTO blobs (id, filename, content_type, size, creation)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(filename)
        .bind(content_type)
        .bind(size)
        .bind(creation.timestamp())
        .execute(&*self.db)
        .await;

        if let Err(err) = insert {
            let _ = fs::remove_file(&file_path).await;
            return Err(StoreError::Sqlx(err));
        }

        debug!("stored blob {id} ({size} bytes) at {}", file_path.display());

        Ok(BlobMetadata {
            id,
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            size,
            creation,
        })
    }

    /// Fetch a blob for reading: its metadata plus an opened payload file
    /// ready for streaming out.
    pub async fn open_blob(&self, id: &Uuid) -> StoreResult<(BlobMetadata, File)> {
        let meta = self.fetch_blob(id).await?;
        let file_path = self.blob_path(id);
        let file = File::open(&file_path).await.map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                StoreError::BlobNotFound(*id)
            } else {
                StoreError::Io(err)
            }
        })?;
        Ok((meta, file))
    }

    /// Delete the given blobs: metadata rows first, then best-effort payload
    /// removal and empty-shard pruning.
    ///
    /// Idempotent — keys that no longer exist are skipped silently. Returns
    /// the number of rows actually removed.
    pub async fn delete_blobs(&self, ids: &[Uuid]) -> StoreResult<u64> {
        let mut deleted = 0;
        for id in ids {
            let result = sqlx::query("DELETE FROM blobs WHERE id = ?")
                .bind(id)
                .execute(&*self.db)
                .await?;
            if result.rows_affected() == 0 {
                debug!("blob {id} already gone, skipping");
                continue;
            }
            deleted += result.rows_affected();

            let file_path = self.blob_path(id);
            match fs::remove_file(&file_path).await {
                Ok(_) => debug!("removed payload {}", file_path.display()),
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    debug!("payload {} already missing", file_path.display());
                }
                Err(err) => return Err(StoreError::Io(err)),
            }
            if let Some(parent) = file_path.parent() {
                self.prune_empty_dirs(parent).await;
            }
        }
        Ok(deleted)
    }

    /// Execute a browse query with offset pagination.
    ///
    /// Fetches one row beyond `page_size` to detect whether more results
    /// exist, and hands back an opaque continuation token when they do. The
    /// incoming token is whatever the previous call produced, round-tripped
    /// verbatim by the handler.
    pub async fn fetch_page(
        &self,
        query: &str,
        page_size: i64,
        start: Option<&str>,
    ) -> StoreResult<BlobPage> {
        let offset = match start {
            None => 0,
            Some(token) if token.is_empty() => 0,
            Some(token) => decode_cursor(token)?,
        };

        let paged = format!("{query} LIMIT {} OFFSET {offset}", page_size + 1);
        let mut blobs: Vec<BlobMetadata> = sqlx::query_as(&paged).fetch_all(&*self.db).await?;

        let more = blobs.len() as i64 > page_size;
        if more {
            blobs.truncate(page_size as usize);
        }
        let cursor = more.then(|| encode_cursor(offset + page_size));

        Ok(BlobPage {
            blobs,
            cursor,
            more,
        })
    }

    /// Remove empty shard directories up to the storage root. Stops at the
    /// first non-empty or missing directory.
    async fn prune_empty_dirs(&self, start: &Path) {
        let mut current = start.to_path_buf();
        while current.starts_with(&self.base_path) && current != self.base_path {
            match fs::remove_dir(&current).await {
                Ok(_) => {
                    if let Some(parent) = current.parent() {
                        current = parent.to_path_buf();
                    } else {
                        break;
                    }
                }
                Err(err) if err.kind() == ErrorKind::NotFound => break,
                Err(err) if err.kind() == ErrorKind::DirectoryNotEmpty => break,
                Err(err) => {
                    debug!("failed to prune directory {}: {}", current.display(), err);
                    break;
                }
            }
        }
    }
}

/// Cursors are URL-safe base64 over the decimal row offset. Opaque to
/// everything outside this module.
fn encode_cursor(offset: i64) -> String {
    URL_SAFE_NO_PAD.encode(offset.to_string())
}

fn decode_cursor(token: &str) -> StoreResult<i64> {
    URL_SAFE_NO_PAD
        .decode(token)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .and_then(|text| text.parse::<i64>().ok())
        .filter(|offset| *offset >= 0)
        .ok_or(StoreError::InvalidCursor)
}
