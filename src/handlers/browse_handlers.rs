//! The browse page: validate query-string arguments, run the built query
//! with pagination, render the blob table.

use crate::{
    errors::AppError,
    models::blob::BlobMetadata,
    query::{BrowseParams, BrowseQuery},
    state::AppState,
    templates,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Fixed browse page size.
pub const PAGE_SIZE: i64 = 20;

/// One row of the rendered blob table.
#[derive(Debug, Serialize)]
struct BlobRow {
    key: String,
    filename: String,
    content_type: String,
    size: i64,
    size_display: String,
    creation_epoch: i64,
    creation_display: String,
}

impl From<&BlobMetadata> for BlobRow {
    fn from(blob: &BlobMetadata) -> Self {
        Self {
            key: blob.id.to_string(),
            filename: blob.filename.clone(),
            content_type: blob.content_type.clone(),
            size: blob.size,
            size_display: format_size(blob.size),
            creation_epoch: blob.creation_epoch(),
            creation_display: blob.creation.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        }
    }
}

/// `GET /browse`
///
/// Invalid arguments get a 400 with the plain-text validation message and
/// never reach the datastore. Valid ones run the built query for one page
/// and render it, echoing the active filter or sort parameters so the UI
/// can reflect current state.
pub async fn browse(
    State(state): State<AppState>,
    Query(params): Query<BrowseParams>,
) -> Result<Response, AppError> {
    let query = match BrowseQuery::from_params(&params) {
        Ok(query) => query,
        Err(err) => {
            tracing::info!("rejected browse request: {err}");
            return Ok((StatusCode::BAD_REQUEST, err.to_string()).into_response());
        }
    };

    let sql = query.to_sql(Utc::now());
    let page = state
        .store
        .fetch_page(&sql, PAGE_SIZE, params.start.as_deref())
        .await?;

    let rows: Vec<BlobRow> = page.blobs.iter().map(BlobRow::from).collect();

    let mut ctx = Map::new();
    ctx.insert("blobs".into(), json!(rows));
    ctx.insert("cursor".into(), json!(page.cursor));
    ctx.insert("more".into(), json!(page.more));

    if params.filter.is_some() {
        // Echo whatever filter parameters were supplied, raw, so the form
        // and the next-page link can reproduce them.
        let echo: [(&str, &Option<String>); 9] = [
            ("filter", &params.filter),
            ("filename_prefix", &params.filename_prefix),
            ("content_type", &params.content_type),
            ("size", &params.size),
            ("size_op", &params.size_op),
            ("size_unit", &params.size_unit),
            ("creation_op", &params.creation_op),
            ("creation_start", &params.creation_start),
            ("creation_end", &params.creation_end),
        ];
        for (name, value) in echo {
            if let Some(value) = value {
                ctx.insert(name.into(), json!(value));
            }
        }
    } else {
        ctx.insert("sort_col".into(), json!(query.sort_col.as_str()));
        ctx.insert("sort_dir".into(), json!(query.sort_dir.as_str()));
        ctx.insert(
            "opp_sort_dir".into(),
            json!(query.sort_dir.opposite().as_str()),
        );
    }

    let html = templates::render(&state.templates, "index.html", Value::Object(ctx))?;
    Ok(html.into_response())
}

/// Human-readable size using the same binary units the size filter accepts.
fn format_size(bytes: i64) -> String {
    const UNITS: [(&str, i64); 3] = [
        ("GB", 1024 * 1024 * 1024),
        ("MB", 1024 * 1024),
        ("KB", 1024),
    ];
    for (unit, multiplier) in UNITS {
        if bytes >= multiplier {
            return format!("{:.1} {unit}", bytes as f64 / multiplier as f64);
        }
    }
    format!("{bytes} B")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    #[test]
    fn format_size_picks_the_largest_fitting_unit() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn blob_row_projects_display_fields() {
        let blob = BlobMetadata {
            id: Uuid::nil(),
            filename: "a.txt".into(),
            content_type: "text/plain".into(),
            size: 2048,
            creation: chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };
        let row = BlobRow::from(&blob);
        assert_eq!(row.key, Uuid::nil().to_string());
        assert_eq!(row.size_display, "2.0 KB");
        assert_eq!(row.creation_epoch, 1714564800);
        assert_eq!(row.creation_display, "2024-05-01 12:00:00 UTC");
    }
}
