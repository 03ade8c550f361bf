use std::path::PathBuf;

/// Errors produced by the detection entry points.
///
/// Candidates that fail to decode are not errors; they are counted in
/// [`crate::DetectionResult::rejected_count`].
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image has zero dimensions (width={width}, height={height})")]
    ZeroDimensions { width: u32, height: u32 },
}

/// Errors produced while loading detector parameters.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid detector parameters: {0}")]
    Json(#[from] serde_json::Error),
}
