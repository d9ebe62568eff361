//! Read Chinese and English text from JPEG/PNG images with the Baidu OCR
//! web service.
//!
//! The service only accepts JPEG, so PNG input is converted on the fly with
//! its transparent areas flattened onto a background color (black unless an
//! option says otherwise).
//!
//! # Features
//!
//! - **Format sniffing**: `parse_image` picks the PNG or JPEG path from the bytes
//! - **Ordered options**: language and PNG background, last option wins
//! - **Bounded calls**: one blocking POST under a configurable timeout, no retries
//! - **Bounding boxes**: `recognize_*` keeps the rectangle of every fragment
//!
//! # Example
//!
//! ```rust,no_run
//! use baiduocr::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OcrClient::with_config(ClientConfig::new("my-api-key"))?;
//!
//!     let words = client.parse_image_file(
//!         "captcha.png",
//!         &[lang_eng(), png_background_rgba(255, 255, 255, 255)],
//!     )?;
//!     println!("{}", words.join(", "));
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod options;
pub mod request;
pub mod response;

pub use client::OcrClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use options::{
    lang_chn_eng, lang_eng, lang_jap, png_background, png_background_rgba, LanguageType,
    OcrOption, RecognizeOptions,
};
pub use response::{Bounds, Rect, TextFragment};

pub use baiduocr_image::Rgba;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::OcrClient;
    pub use crate::config::ClientConfig;
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::options::{
        lang_chn_eng, lang_eng, lang_jap, png_background, png_background_rgba, LanguageType,
        OcrOption,
    };
    pub use crate::response::TextFragment;
}
