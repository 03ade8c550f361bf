//! Core types and utilities for square fiducial marker detection.
//!
//! This crate is intentionally small and purely geometric: grayscale
//! buffers, bilinear sampling, four-point homographies with perspective
//! warping, and polygon helpers. It does not know about dictionaries or
//! any concrete image codec.

mod geometry;
mod homography;
mod image;
mod logger;

pub use geometry::{
    centroid, closed_perimeter, contains_point, is_convex, min_side_length, polygon_area,
    signed_area,
};
pub use homography::{homography_from_4pt, warp_perspective_gray, Homography};
pub use image::{sample_bilinear, sample_bilinear_u8, GrayImage, GrayImageView, ImageShapeError};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
