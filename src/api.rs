//! HTTP surface for the document summarizer.
//!
//! - `POST /summarize` – multipart upload with a single `file` field (PDF or Word). Responds
//!   with the model's JSON object, normally
//!   `{short_version, detailed_version, technical_version, layman_version}`.
//!
//! Unsupported or empty documents are rejected with `400 {"detail": "Unsupported file type"}`
//! before the provider is contacted. Malformed uploads get `422` with a `detail` message.
//! Provider failures and replies that are not a JSON object surface as `500` with a
//! plain-text body.

use crate::config::Config;
use crate::processing::{ProcessingError, SummarizeApi, SummaryResult, UploadedDocument};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use uuid::Uuid;

/// Multipart field that carries the uploaded document.
pub const UPLOAD_FIELD: &str = "file";

/// Build the HTTP router exposing the summarization endpoint.
pub fn create_router<S>(service: Arc<S>, config: &Config) -> Router
where
    S: SummarizeApi + 'static,
{
    let body_limit = match config.upload_limit_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/summarize", post(summarize_document::<S>))
        .with_state(service)
        .layer(body_limit)
        .layer(cors_layer(config.allowed_origins.as_deref()))
}

/// Open policy by default: the request origin is mirrored with credentials allowed, along with
/// any method and header. An explicit list restricts origins only.
fn cors_layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    let allow_origin = match allowed_origins {
        None => AllowOrigin::mirror_request(),
        Some(origins) => AllowOrigin::list(origins.iter().filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|error| {
                    tracing::error!(origin = %origin, %error, "Ignoring invalid CORS origin");
                })
                .ok()
        })),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Summarize an uploaded PDF or Word document.
async fn summarize_document<S>(
    State(service): State<Arc<S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SummaryResult>, ApiError>
where
    S: SummarizeApi,
{
    let request_id = Uuid::new_v4();
    let mut multipart = multipart.map_err(|rejection| ApiError::InvalidUpload {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        detail: rejection.body_text(),
    })?;
    let document = read_upload(&mut multipart).await?;

    tracing::info!(
        %request_id,
        filename = document.filename.as_deref().unwrap_or(""),
        content_type = document.content_type.as_deref().unwrap_or(""),
        size = document.bytes.len(),
        "Summarize request received"
    );

    match service.summarize_document(document).await {
        Ok(summary) => {
            tracing::info!(%request_id, "Summarize request completed");
            Ok(Json(summary))
        }
        Err(error) if error.is_unsupported_format() => {
            tracing::info!(%request_id, "Rejected unsupported document");
            Err(error.into())
        }
        Err(error) => {
            tracing::error!(%request_id, %error, "Summarize request failed");
            Err(error.into())
        }
    }
}

/// Pull the `file` field out of the multipart body, ignoring any other fields.
async fn read_upload(multipart: &mut Multipart) -> Result<UploadedDocument, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(ApiError::from_multipart)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(ApiError::from_multipart)?;
        return Ok(UploadedDocument {
            bytes: bytes.to_vec(),
            content_type,
            filename,
        });
    }

    Err(ApiError::InvalidUpload {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        detail: format!("Missing multipart field `{UPLOAD_FIELD}`"),
    })
}

enum ApiError {
    InvalidUpload { status: StatusCode, detail: String },
    Processing(ProcessingError),
}

impl ApiError {
    fn from_multipart(error: axum::extract::multipart::MultipartError) -> Self {
        let status = match error.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self::InvalidUpload {
            status,
            detail: error.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidUpload { status, detail } => {
                (status, Json(json!({ "detail": detail }))).into_response()
            }
            Self::Processing(error) if error.is_unsupported_format() => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": "Unsupported file type" })),
            )
                .into_response(),
            Self::Processing(error) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response()
            }
        }
    }
}

impl From<ProcessingError> for ApiError {
    fn from(inner: ProcessingError) -> Self {
        Self::Processing(inner)
    }
}
