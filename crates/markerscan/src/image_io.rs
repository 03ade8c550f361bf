//! Byte-level image decoding and encoding.

use crate::DetectError;
use image::{ImageFormat, ImageReader, RgbImage};
use markerscan_core::GrayImage;
use std::io::Cursor;

/// Decode an encoded image (JPEG, PNG, BMP, TIFF, WebP) into RGB.
///
/// The container format is sniffed from the bytes; file names and declared
/// MIME types are never consulted.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, DetectError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?;
    let rgb = reader.decode()?.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(DetectError::ZeroDimensions {
            width: rgb.width(),
            height: rgb.height(),
        });
    }
    Ok(rgb)
}

/// Luma conversion with BT.601 weights into the detector's gray buffer.
pub fn to_gray(rgb: &RgbImage) -> Result<GrayImage, DetectError> {
    let (width, height) = rgb.dimensions();
    GrayImage::from_rgb(width as usize, height as usize, rgb.as_raw())
        .map_err(|_| DetectError::ZeroDimensions { width, height })
}

/// Encode an RGB raster as PNG bytes.
pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>, image::ImageError> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}
