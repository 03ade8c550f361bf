use crate::upload::{read_upload, validate, Upload};
use crate::{ApiError, ServerConfig};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use markerscan::{encode_png, DetectionResult, MarkerDetector};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub const SERVICE_NAME: &str = "ArUco Marker Detection API";

const DETECTED_MARKERS: HeaderName = HeaderName::from_static("x-detected-markers");
const ORIGINAL_FILENAME: HeaderName = HeaderName::from_static("x-original-filename");

/// Multipart framing on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<MarkerDetector>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(detector: MarkerDetector, max_upload_bytes: usize) -> Self {
        Self {
            detector: Arc::new(detector),
            max_upload_bytes,
        }
    }
}

/// Build the router with CORS, tracing and body-limit layers.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/detect-markers", post(detect_markers))
        .route("/detect-markers-annotated", post(detect_markers_annotated))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer(&config.cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .expose_headers([DETECTED_MARKERS, ORIGINAL_FILENAME]);
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            warn!(origin, "ignoring invalid CORS origin");
            layer
        }
    }
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/detect-markers": "POST - Upload image and detect ArUco markers",
            "/detect-markers-annotated": "POST - Upload image and get annotated result image",
            "/health": "GET - Health check",
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": SERVICE_NAME }))
}

#[derive(Serialize)]
struct DetectResponse {
    #[serde(flatten)]
    result: DetectionResult,
    filename: Option<String>,
    file_size: usize,
    content_type: Option<String>,
}

async fn accept_upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Upload, ApiError> {
    let upload = read_upload(multipart?).await?;
    validate(&upload, state.max_upload_bytes)?;
    Ok(upload)
}

/// Run `job` on the blocking pool; a panicked or cancelled worker becomes a 500.
async fn run_blocking<T, F>(upload: &Upload, job: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(job)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))
        .and_then(|res| res);
    if let Err(err) = &outcome {
        error!(
            filename = upload.display_name(),
            size = upload.bytes.len(),
            "error processing image: {err}"
        );
    }
    outcome
}

async fn detect_markers(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DetectResponse>, ApiError> {
    let upload = accept_upload(&state, multipart).await?;
    info!(
        filename = upload.display_name(),
        size = upload.bytes.len(),
        "processing image"
    );

    let detector = Arc::clone(&state.detector);
    let bytes = upload.bytes.clone();
    let result = run_blocking(&upload, move || Ok(detector.detect(&bytes)?)).await?;
    info!(
        filename = upload.display_name(),
        markers = result.total_markers(),
        "detection finished"
    );

    Ok(Json(DetectResponse {
        result,
        file_size: upload.bytes.len(),
        filename: upload.filename,
        content_type: upload.content_type,
    }))
}

async fn detect_markers_annotated(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let upload = accept_upload(&state, multipart).await?;
    info!(
        filename = upload.display_name(),
        size = upload.bytes.len(),
        "processing image for annotation"
    );

    let detector = Arc::clone(&state.detector);
    let bytes = upload.bytes.clone();
    let (count, png) = run_blocking(&upload, move || {
        let (result, annotated) = detector.detect_and_annotate(&bytes)?;
        let png = encode_png(&annotated).map_err(|err| ApiError::Internal(err.to_string()))?;
        Ok((result.total_markers(), png))
    })
    .await?;

    let filename = HeaderValue::from_str(upload.display_name())
        .unwrap_or_else(|_| HeaderValue::from_static("unknown"));
    let headers = [
        (CONTENT_TYPE, HeaderValue::from_static("image/png")),
        (DETECTED_MARKERS, HeaderValue::from(count)),
        (ORIGINAL_FILENAME, filename),
    ];
    Ok((headers, png).into_response())
}
