//! Square fiducial marker detection for encoded images.
//!
//! This crate ties the workspace together:
//! - decoding JPEG/PNG/BMP/TIFF/WebP bytes into a raster,
//! - running the `markerscan-aruco` localizer and decoder with the built-in
//!   `DICT_4X4_50` dictionary,
//! - scoring each marker's geometry and serializing results as JSON,
//! - drawing detections onto a copy of the input.
//!
//! ## Quickstart
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("photo.jpg")?;
//! let result = markerscan::detect_markers(&bytes)?;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `markerscan::core`: gray images, homographies, polygon helpers.
//! - `markerscan::aruco`: dictionaries, localization and candidate decoding.
//! - [`MarkerDetector`]: configurable detector; [`MarkerDetector::shared`]
//!   is the process-wide default instance.
//! - [`annotate()`], [`render_marker`]: drawing helpers.

pub use markerscan_aruco as aruco;
pub use markerscan_core as core;

mod annotate;
mod detect;
mod error;
mod image_io;
mod params;
mod render;
mod result;
mod score;

pub use annotate::annotate;
pub use detect::{detect_markers, detect_markers_with_annotation, MarkerDetector};
pub use error::{ConfigError, DetectError};
pub use image_io::{decode_image, encode_png, to_gray};
pub use params::DetectorParams;
pub use render::{draw_marker, render_marker, MarkerPlacement};
pub use result::{DetectedMarker, DetectionResult};
pub use score::{marker_confidence, FALLBACK_CONFIDENCE};
