// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image normalization for vision backend payload limits

use image::codecs::jpeg::JpegEncoder;
use image::GenericImageView;
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

/// Maximum payload accepted by the vision backends (4 MiB)
pub const MAX_PAYLOAD_BYTES: usize = 4 * 1024 * 1024;

/// Maximum dimension on either axis
pub const MAX_DIMENSION: u32 = 7500;

/// Bounding box for downscaled images
const RESIZE_BOX: u32 = 1600;

/// JPEG quality for re-encoded images
const JPEG_QUALITY: u8 = 80;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Failed to read image metadata: {0}")]
    Decode(String),

    #[error("Failed to re-encode image: {0}")]
    Encode(String),
}

/// An image ready for a vision backend
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub bytes: Vec<u8>,
    pub media_type: String,
    pub was_resized: bool,
}

/// Map a response content-type onto the media types the backends accept.
/// Anything unrecognized is reported as jpeg.
fn media_type_from_content_type(content_type: &str) -> &'static str {
    if content_type.contains("png") {
        "image/png"
    } else if content_type.contains("webp") {
        "image/webp"
    } else if content_type.contains("gif") {
        "image/gif"
    } else {
        "image/jpeg"
    }
}

/// Inspect raw bytes and downscale/re-encode when they exceed the backend
/// payload limits. Untouched images keep their original media type; resized
/// images are always JPEG quality 80 inside a 1600x1600 box (aspect ratio
/// preserved, never upscaled).
pub fn normalize(bytes: Vec<u8>, content_type: &str) -> Result<NormalizedImage, NormalizeError> {
    let img = image::load_from_memory(&bytes).map_err(|e| NormalizeError::Decode(e.to_string()))?;
    let (width, height) = img.dimensions();

    let needs_resize =
        bytes.len() > MAX_PAYLOAD_BYTES || width > MAX_DIMENSION || height > MAX_DIMENSION;

    if !needs_resize {
        return Ok(NormalizedImage {
            bytes,
            media_type: media_type_from_content_type(content_type).to_string(),
            was_resized: false,
        });
    }

    debug!(
        width,
        height,
        size_bytes = bytes.len(),
        "image exceeds backend limits, downscaling"
    );

    // resize() fits within the box preserving aspect ratio; skip it when the
    // image is already small enough so an oversized-payload image is never
    // upscaled
    let bounded = if width > RESIZE_BOX || height > RESIZE_BOX {
        img.resize(RESIZE_BOX, RESIZE_BOX, image::imageops::FilterType::Lanczos3)
    } else {
        img
    };

    let mut out = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    bounded
        .to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| NormalizeError::Encode(e.to_string()))?;

    Ok(NormalizedImage {
        bytes: out.into_inner(),
        media_type: "image/jpeg".to_string(),
        was_resized: true,
    })
}
