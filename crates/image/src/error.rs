//! Error types for the image crate.

use thiserror::Error;

/// Result type alias for image operations.
pub type Result<T> = std::result::Result<T, ImageError>;

/// Errors that can occur while sniffing or converting an image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Leading bytes match neither the PNG nor the JPEG signature
    #[error("unrecognized image file format")]
    UnrecognizedFormat,

    /// PNG data could not be decoded
    #[error("failed to decode PNG image: {0}")]
    Decode(#[source] image::ImageError),

    /// Pixel buffer could not be encoded as JPEG
    #[error("failed to encode JPEG image: {0}")]
    Encode(#[source] image::ImageError),
}
