//! Main OCR client implementation

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::options::{OcrOption, RecognizeOptions};
use crate::request::{build_form, send_form};
use crate::response::{decode, TextFragment};
use baiduocr_image::{detect_format, png_to_jpeg, ImageFormat};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, Span};
use uuid::Uuid;

/// Blocking OCR client
///
/// Holds only immutable configuration and a shared HTTP handle, so a single
/// value can be cloned or shared across threads freely. Every call performs
/// at most one round trip and never retries.
#[derive(Clone)]
pub struct OcrClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl OcrClient {
    /// Create a new client with configuration from environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    ///
    /// # Panics
    /// If `config.timeout_ms` is negative and not
    /// [`NO_TIMEOUT`](crate::config::NO_TIMEOUT).
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        let timeout = config.effective_timeout();
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static("baiduocr/1.0"));

        let inner = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Network)?;

        debug!(endpoint = %config.endpoint(), timeout = ?timeout, "OCR client created");

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the endpoint requests are posted to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.config.endpoint()
    }

    // -------------------------------------------------------------------------
    // Word-only entry points
    // -------------------------------------------------------------------------

    /// Read text from an image of unknown type.
    ///
    /// The format is sniffed from the bytes; anything but PNG or JPEG fails
    /// before any request is made.
    pub fn parse_image(&self, image_bytes: &[u8], options: &[OcrOption]) -> ApiResult<Vec<String>> {
        self.recognize_image(image_bytes, options).map(into_words)
    }

    /// Read text from a PNG image. It is converted to JPEG on the fly.
    pub fn parse_png(&self, image_bytes: &[u8], options: &[OcrOption]) -> ApiResult<Vec<String>> {
        self.recognize_png(image_bytes, options).map(into_words)
    }

    /// Read text from a JPEG image.
    pub fn parse_jpeg(&self, image_bytes: &[u8], options: &[OcrOption]) -> ApiResult<Vec<String>> {
        self.recognize_jpeg(image_bytes, options).map(into_words)
    }

    /// Read text from an image file of unknown type.
    pub fn parse_image_file(
        &self,
        path: impl AsRef<Path>,
        options: &[OcrOption],
    ) -> ApiResult<Vec<String>> {
        let data = std::fs::read(path)?;
        self.parse_image(&data, options)
    }

    /// Read text from a PNG image file.
    ///
    /// Transparent areas become black unless a background option is given.
    pub fn parse_png_file(
        &self,
        path: impl AsRef<Path>,
        options: &[OcrOption],
    ) -> ApiResult<Vec<String>> {
        let data = std::fs::read(path)?;
        self.parse_png(&data, options)
    }

    /// Read text from a JPEG image file.
    pub fn parse_jpeg_file(
        &self,
        path: impl AsRef<Path>,
        options: &[OcrOption],
    ) -> ApiResult<Vec<String>> {
        let data = std::fs::read(path)?;
        self.parse_jpeg(&data, options)
    }

    // -------------------------------------------------------------------------
    // Fragment entry points (words with bounding rectangles)
    // -------------------------------------------------------------------------

    /// Like [`parse_image`](Self::parse_image), keeping the bounding rectangles.
    pub fn recognize_image(
        &self,
        image_bytes: &[u8],
        options: &[OcrOption],
    ) -> ApiResult<Vec<TextFragment>> {
        match detect_format(image_bytes)? {
            ImageFormat::Png => self.recognize_png(image_bytes, options),
            ImageFormat::Jpeg => self.recognize_jpeg(image_bytes, options),
        }
    }

    /// Like [`parse_png`](Self::parse_png), keeping the bounding rectangles.
    pub fn recognize_png(
        &self,
        image_bytes: &[u8],
        options: &[OcrOption],
    ) -> ApiResult<Vec<TextFragment>> {
        let opts = RecognizeOptions::from_options(options);
        let jpeg = png_to_jpeg(image_bytes, opts.png_background)?;
        debug!(png_bytes = image_bytes.len(), jpeg_bytes = jpeg.len(), "Converted PNG to JPEG");
        self.recognize(&jpeg, &opts)
    }

    /// Like [`parse_jpeg`](Self::parse_jpeg), keeping the bounding rectangles.
    pub fn recognize_jpeg(
        &self,
        image_bytes: &[u8],
        options: &[OcrOption],
    ) -> ApiResult<Vec<TextFragment>> {
        self.recognize(image_bytes, &RecognizeOptions::from_options(options))
    }

    /// Upload JPEG bytes and decode the answer
    #[instrument(
        skip(self, jpeg_bytes, opts),
        fields(request_id, language = %opts.language_type, bytes = jpeg_bytes.len())
    )]
    fn recognize(&self, jpeg_bytes: &[u8], opts: &RecognizeOptions) -> ApiResult<Vec<TextFragment>> {
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let start = Instant::now();
        let form = build_form(jpeg_bytes, opts);
        let body = send_form(&self.inner, self.endpoint(), &self.config.api_key, &form)?;
        let result = decode(&body);

        debug!(
            elapsed_ms = start.elapsed().as_millis(),
            fragments = result.as_ref().map_or(0, Vec::len),
            "OCR request finished"
        );
        result
    }
}

fn into_words(fragments: Vec<TextFragment>) -> Vec<String> {
    fragments.into_iter().map(|f| f.word).collect()
}
