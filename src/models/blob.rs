//! The stored-blob metadata record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Read-only projection of a stored blob's index row.
///
/// Rows are written once by the upload path and removed by the delete path;
/// nothing ever updates them in place. The payload bytes themselves live on
/// disk, addressed by `id`.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct BlobMetadata {
    /// Opaque identifier assigned at upload time.
    pub id: Uuid,

    /// Original filename from the upload, possibly empty.
    pub filename: String,

    /// MIME type as reported by the uploader, possibly empty. Not validated.
    pub content_type: String,

    /// Payload size in bytes.
    pub size: i64,

    /// Upload timestamp, stored as epoch seconds so threshold filters
    /// compare numerically.
    pub creation: DateTime<Utc>,
}

impl BlobMetadata {
    /// Creation time as epoch seconds, the form the browse queries and the
    /// UI's date widgets work in.
    pub fn creation_epoch(&self) -> i64 {
        self.creation.timestamp()
    }
}
