//! Lightweight 8-bit grayscale buffers and sampling helpers.

/// Errors raised when a raw pixel buffer does not match its declared shape.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageShapeError {
    #[error("image dimensions are zero (width={width}, height={height})")]
    ZeroDimensions { width: usize, height: usize },
    #[error("pixel buffer length mismatch (expected {expected} bytes, got {got})")]
    BufferLength { expected: usize, got: usize },
}

/// Borrowed row-major grayscale image.
#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

/// Owned row-major grayscale image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    /// Wrap an existing buffer, validating its length against `width * height`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ImageShapeError> {
        check_shape(width, height, 1, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Convert an interleaved 8-bit RGB buffer using BT.601 luma weights
    /// (`0.299 R + 0.587 G + 0.114 B`).
    pub fn from_rgb(width: usize, height: usize, rgb: &[u8]) -> Result<Self, ImageShapeError> {
        check_shape(width, height, 3, rgb.len())?;
        let data = rgb
            .chunks_exact(3)
            .map(|px| {
                let y = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
                (y + 0.5).min(255.0) as u8
            })
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

impl GrayImageView<'_> {
    /// Pixel at `(x, y)`, with coordinates clamped to the image edge.
    #[inline]
    pub fn get_clamped(&self, x: i32, y: i32) -> u8 {
        let xi = x.clamp(0, self.width as i32 - 1) as usize;
        let yi = y.clamp(0, self.height as i32 - 1) as usize;
        self.data[yi * self.width + xi]
    }
}

fn check_shape(
    width: usize,
    height: usize,
    channels: usize,
    len: usize,
) -> Result<(), ImageShapeError> {
    if width == 0 || height == 0 {
        return Err(ImageShapeError::ZeroDimensions { width, height });
    }
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(ImageShapeError::ZeroDimensions { width, height })?;
    if len != expected {
        return Err(ImageShapeError::BufferLength { expected, got: len });
    }
    Ok(())
}

/// Bilinear sample at `(x, y)` where integer coordinates are pixel centers.
#[inline]
pub fn sample_bilinear(src: &GrayImageView<'_>, x: f32, y: f32) -> f32 {
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = src.get_clamped(x0, y0) as f32;
    let p10 = src.get_clamped(x0 + 1, y0) as f32;
    let p01 = src.get_clamped(x0, y0 + 1) as f32;
    let p11 = src.get_clamped(x0 + 1, y0 + 1) as f32;

    let a = p00 + fx * (p10 - p00);
    let b = p01 + fx * (p11 - p01);
    a + fy * (b - a)
}

#[inline]
pub fn sample_bilinear_u8(src: &GrayImageView<'_>, x: f32, y: f32) -> u8 {
    sample_bilinear(src, x, y).round().clamp(0.0, 255.0) as u8
}
