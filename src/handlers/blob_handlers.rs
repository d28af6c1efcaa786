//! Upload, serve, and delete handlers.
//!
//! Streams payloads in both directions to avoid buffering blobs in memory
//! and delegates storage concerns to `BlobService`.

use crate::{errors::AppError, state::AppState, templates};
use axum::{
    Form, Json,
    body::Body,
    extract::{Multipart, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{Html, Redirect, Response},
};
use futures::StreamExt;
use serde::Deserialize;
use serde_json::{Value, json};
use std::io;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct UploadPageQuery {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ServeQuery {
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub keys: String,
}

/// `GET /` — the browse page is the front door.
pub async fn index() -> Redirect {
    Redirect::to("/browse")
}

/// `GET /upload` — render the upload form, with a status banner when
/// redirected back after a POST.
pub async fn upload_form(
    State(state): State<AppState>,
    Query(query): Query<UploadPageQuery>,
) -> Result<Html<String>, AppError> {
    let (message_style, message) = match query.message.as_deref() {
        Some("SUCCESS") => (Some("success"), Some("Blob uploaded successfully.")),
        Some("FILE_REQUIRED") => (Some("danger"), Some("You must specify a file.")),
        _ => (None, None),
    };

    templates::render(
        &state.templates,
        "upload.html",
        json!({
            "upload_url": "/upload",
            "message": message,
            "message_style": message_style,
        }),
    )
}

/// `POST /upload` — store every file field in the multipart body, then
/// redirect back to the form with a status flag.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut stored = 0usize;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(err.to_string()))?
    {
        // Only file fields carry a filename; skip everything else.
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().unwrap_or("").to_string();

        let stream =
            field.map(|chunk| chunk.map_err(|err| io::Error::new(io::ErrorKind::Other, err)));
        let meta = state
            .store
            .store_blob(&filename, &content_type, stream)
            .await?;
        tracing::info!("uploaded blob {} ({} bytes)", meta.id, meta.size);
        stored += 1;
    }

    let message = if stored == 0 { "FILE_REQUIRED" } else { "SUCCESS" };
    Ok(Redirect::to(&format!("/upload?message={message}")))
}

/// `GET /serve?key=<id>` — stream the payload bytes back.
pub async fn serve(
    State(state): State<AppState>,
    Query(query): Query<ServeQuery>,
) -> Result<Response, AppError> {
    let key = Uuid::parse_str(query.key.trim())
        .map_err(|_| AppError::bad_request("key must be a valid blob id"))?;

    let (meta, file) = state.store.open_blob(&key).await?;
    let stream = ReaderStream::new(file);

    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();

    let content_type = if meta.content_type.is_empty() {
        "application/octet-stream"
    } else {
        meta.content_type.as_str()
    };
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(
        header::CONTENT_LENGTH,
        HeaderValue::from_str(&meta.size.max(0).to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("0")),
    );
    if !meta.filename.is_empty() {
        let disposition = format!("inline; filename=\"{}\"", sanitize_filename(&meta.filename));
        if let Ok(value) = HeaderValue::from_str(&disposition) {
            headers.insert(header::CONTENT_DISPOSITION, value);
        }
    }

    Ok(response)
}

/// `POST /delete` — delete a comma-separated list of blob ids. An empty
/// list is a no-op. Always answers `{}`.
pub async fn delete(
    State(state): State<AppState>,
    Form(form): Form<DeleteForm>,
) -> Result<Json<Value>, AppError> {
    let keys = parse_keys(&form.keys)?;
    if keys.is_empty() {
        return Ok(Json(json!({})));
    }

    let deleted = state.store.delete_blobs(&keys).await?;
    tracing::info!("deleted {deleted} of {} requested blobs", keys.len());
    Ok(Json(json!({})))
}

/// Split a comma-separated key list, tolerating whitespace and empty
/// segments. Any segment that is not a UUID is a client error.
fn parse_keys(raw: &str) -> Result<Vec<Uuid>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            Uuid::parse_str(segment)
                .map_err(|_| AppError::bad_request(format!("invalid blob id `{segment}`")))
        })
        .collect()
}

/// Strip characters that would break the quoted Content-Disposition value.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect()
}
