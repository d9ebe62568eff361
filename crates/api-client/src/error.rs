//! Error types for the OCR client

use baiduocr_image::ImageError;
use thiserror::Error;

/// Result type alias for OCR operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Phrase every recognition failure message starts with
pub const NO_TEXT_RECOGNIZED: &str = "BaiduOCR failed to recognize any text in the image.";

/// OCR client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Sniffing, PNG decoding or JPEG encoding failed
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// Transport-level failure (DNS, connect, TLS, timeout)
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body is not the expected JSON shape
    #[error("Invalid OCR response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Well-formed response without any recognized text
    #[error("{0}")]
    Recognition(String),

    /// Reading an input file failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing env var error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// Build the recognition error for an empty result set.
    ///
    /// The service's own message is appended when it sent one.
    pub fn no_text(service_message: &str) -> Self {
        let mut msg = NO_TEXT_RECOGNIZED.to_string();
        if !service_message.is_empty() {
            msg.push_str(" reason: ");
            msg.push_str(service_message);
        }
        Self::Recognition(msg)
    }

    /// Check if the input bytes were neither PNG nor JPEG
    #[must_use]
    pub fn is_unrecognized_format(&self) -> bool {
        matches!(self, Self::Image(ImageError::UnrecognizedFormat))
    }

    /// Check if retrying the whole call could help.
    ///
    /// The client never retries on its own.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_connect() || e.is_timeout(),
            Self::Image(_)
            | Self::Parse(_)
            | Self::Recognition(_)
            | Self::Io(_)
            | Self::Config(_)
            | Self::MissingEnvVar(_) => false,
        }
    }
}
