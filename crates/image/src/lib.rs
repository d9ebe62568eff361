//! Image handling for OCR uploads.
//!
//! This crate provides:
//! - Format sniffing from magic bytes (PNG / JPEG only)
//! - PNG to JPEG normalization with alpha flattening onto a solid background
//!
//! The OCR service only accepts JPEG, so every PNG goes through
//! [`png_to_jpeg`] before upload.

#![warn(missing_docs)]

mod detect;
mod error;
mod normalize;

pub use detect::{detect_format, ImageFormat};
pub use error::{ImageError, Result};
pub use normalize::{
    composite_over, has_alpha_channel, png_to_jpeg, DEFAULT_BACKGROUND, JPEG_QUALITY,
};

/// Re-exported so callers can name background colors without depending on `image`.
pub use image::Rgba;
