//! Route definitions for the blob browsing tool.
//!
//! - `GET  /browse` — blob table with sorting, filtering, pagination
//! - `GET  /upload` / `POST /upload` — upload form and multipart upload
//! - `GET  /serve?key=` — stream a blob's payload
//! - `POST /delete` — delete a comma-separated list of blob ids
//! - `GET  /healthz`, `GET /readyz` — probes
//!
//! `GET /` redirects to the browse page.

use crate::{
    handlers::{
        blob_handlers::{delete, index, serve, upload, upload_form},
        browse_handlers::browse,
        health_handlers::{healthz, readyz},
    },
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

/// Maximum multipart upload size. Axum's 2 MB default is too small for a
/// blob tool.
const UPLOAD_BODY_LIMIT: usize = 256 * 1024 * 1024;

/// Build the router carrying shared [`AppState`] to all handlers.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/", get(index))
        .route("/browse", get(browse))
        .route(
            "/upload",
            get(upload_form)
                .post(upload)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/serve", get(serve))
        .route("/delete", post(delete))
}
