//! Image format sniffing from magic bytes.

use crate::{ImageError, Result};

/// JPEG: FF D8 FF
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

/// PNG: 89 50 4E 47 0D 0A 1A 0A
const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Image formats the OCR upload path understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// JPEG image, uploaded as-is
    Jpeg,
    /// PNG image, converted to JPEG before upload
    Png,
}

impl ImageFormat {
    /// Get the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }

    /// Get common file extensions for this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ImageFormat::Jpeg => &["jpg", "jpeg"],
            ImageFormat::Png => &["png"],
        }
    }
}

/// Classify image bytes by their leading signature.
///
/// Only the content decides the result; file names and extensions play no
/// part. Anything that is neither PNG nor JPEG, including input too short to
/// hold a signature, is rejected.
///
/// # Example
/// ```
/// use baiduocr_image::{detect_format, ImageFormat};
///
/// let jpeg_data = [0xFF, 0xD8, 0xFF, 0xE0];
/// assert!(matches!(detect_format(&jpeg_data), Ok(ImageFormat::Jpeg)));
///
/// let png_data = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
/// assert!(matches!(detect_format(&png_data), Ok(ImageFormat::Png)));
///
/// assert!(detect_format(b"GIF89a").is_err());
/// ```
pub fn detect_format(data: &[u8]) -> Result<ImageFormat> {
    if data.starts_with(PNG_SIGNATURE) {
        return Ok(ImageFormat::Png);
    }

    if data.starts_with(JPEG_SIGNATURE) {
        return Ok(ImageFormat::Jpeg);
    }

    Err(ImageError::UnrecognizedFormat)
}
