//! Per-call recognition options
//!
//! Options are plain values applied in order, so a later option overrides an
//! earlier one that touches the same field.

use baiduocr_image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recognition language sent as `languagetype`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageType {
    /// Chinese and English (`CHN_ENG`)
    #[default]
    #[serde(rename = "CHN_ENG")]
    ChineseEnglish,
    /// English only (`ENG`). Use when the image has no Chinese characters.
    #[serde(rename = "ENG")]
    English,
    /// Japanese (`JAP`)
    #[serde(rename = "JAP")]
    Japanese,
}

impl LanguageType {
    /// Wire code for this language
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ChineseEnglish => "CHN_ENG",
            Self::English => "ENG",
            Self::Japanese => "JAP",
        }
    }
}

impl fmt::Display for LanguageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single option passed to the parse entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrOption {
    /// Select the recognition language
    Language(LanguageType),
    /// Background color for transparent PNG areas
    PngBackground(Rgba<u8>),
}

/// Option to set the language type to `CHN_ENG`. This is the default.
#[must_use]
pub fn lang_chn_eng() -> OcrOption {
    OcrOption::Language(LanguageType::ChineseEnglish)
}

/// Option to set the language type to `ENG`.
#[must_use]
pub fn lang_eng() -> OcrOption {
    OcrOption::Language(LanguageType::English)
}

/// Option to set the language type to `JAP`.
#[must_use]
pub fn lang_jap() -> OcrOption {
    OcrOption::Language(LanguageType::Japanese)
}

/// Option to set the background color painted under a transparent PNG.
#[must_use]
pub fn png_background(color: Rgba<u8>) -> OcrOption {
    OcrOption::PngBackground(color)
}

/// Same as [`png_background`] with individual channel values.
#[must_use]
pub fn png_background_rgba(r: u8, g: u8, b: u8, a: u8) -> OcrOption {
    OcrOption::PngBackground(Rgba([r, g, b, a]))
}

/// Resolved configuration for one recognition call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecognizeOptions {
    /// Language sent to the service
    pub language_type: LanguageType,
    /// `None` flattens transparent PNG areas onto black
    pub png_background: Option<Rgba<u8>>,
}

impl RecognizeOptions {
    /// Apply `options` in order on top of the defaults
    #[must_use]
    pub fn from_options(options: &[OcrOption]) -> Self {
        options.iter().fold(Self::default(), |mut acc, option| {
            acc.apply(*option);
            acc
        })
    }

    /// Apply a single option, overwriting the field it touches
    pub fn apply(&mut self, option: OcrOption) {
        match option {
            OcrOption::Language(language) => self.language_type = language,
            OcrOption::PngBackground(color) => self.png_background = Some(color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = RecognizeOptions::from_options(&[]);
        assert_eq!(opts.language_type, LanguageType::ChineseEnglish);
        assert_eq!(opts.language_type.code(), "CHN_ENG");
        assert!(opts.png_background.is_none());
    }

    #[test]
    fn test_last_language_wins() {
        let opts = RecognizeOptions::from_options(&[lang_eng(), lang_chn_eng()]);
        assert_eq!(opts.language_type, LanguageType::ChineseEnglish);

        let opts = RecognizeOptions::from_options(&[lang_chn_eng(), lang_jap(), lang_eng()]);
        assert_eq!(opts.language_type.code(), "ENG");
    }

    #[test]
    fn test_background_options_are_equivalent() {
        let white = Rgba([255, 255, 255, 255]);
        assert_eq!(png_background(white), png_background_rgba(255, 255, 255, 255));

        let opts = RecognizeOptions::from_options(&[
            png_background_rgba(1, 2, 3, 255),
            png_background(white),
        ]);
        assert_eq!(opts.png_background, Some(white));
    }

    #[test]
    fn test_fields_are_independent() {
        let opts = RecognizeOptions::from_options(&[
            png_background_rgba(9, 9, 9, 255),
            lang_eng(),
        ]);
        assert_eq!(opts.language_type, LanguageType::English);
        assert_eq!(opts.png_background, Some(Rgba([9, 9, 9, 255])));
    }

    #[test]
    fn test_language_serde_uses_wire_codes() {
        let json = serde_json::to_string(&LanguageType::Japanese).unwrap();
        assert_eq!(json, "\"JAP\"");
        assert_eq!(LanguageType::English.to_string(), "ENG");
    }
}
