use crate::upload::{CaptureError, CaptureStore};
use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

/// `POST /upload`: persists the multipart `file` field and returns its URL.
pub async fn upload_handler(
    State(store): State<Arc<dyn CaptureStore>>,
    mut multipart: Multipart,
) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Invalid multipart body: {}", e);
                break;
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("capture").to_owned();
        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to read upload body: {}", e);
                break;
            }
        };

        match store.store(&filename, data).await {
            Ok(stored) => return Json(json!({ "url": stored.url })).into_response(),
            Err(CaptureError::Empty) => break,
            Err(e) => {
                error!("Upload Error: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Upload failed" })),
                )
                    .into_response();
            }
        }
    }

    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "No file uploaded" })),
    )
        .into_response()
}
