//! Data models for the blob browsing tool.
//!
//! A single read-mostly entity: the blob metadata index row. It maps to the
//! `blobs` table via `sqlx::FromRow` and serializes naturally as JSON and
//! template context via `serde`.

pub mod blob;
