//! HTTP front end for `markerscan`.
//!
//! Endpoints:
//! - `GET /` and `GET /health`: service information.
//! - `POST /detect-markers`: multipart upload (field `file`), JSON result.
//! - `POST /detect-markers-annotated`: multipart upload, annotated PNG.
//!
//! Uploads are validated (size, extension, content type) before detection,
//! and detection runs on the blocking thread pool.

mod app;
mod config;
mod error;
mod telemetry;
pub mod upload;

pub use app::{router, AppState, SERVICE_NAME};
pub use config::ServerConfig;
pub use error::ApiError;
pub use telemetry::{init_telemetry, TelemetryError};
