//! Request body construction and transport

use crate::error::ApiResult;
use crate::options::RecognizeOptions;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

/// API key header expected by the service
pub const APIKEY_HEADER: &str = "apikey";

/// Content type of the request body
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Form fields for one recognition request, in wire order
pub type Form = Vec<(&'static str, String)>;

/// Build the form body for a JPEG image.
///
/// Everything except the language and the image is fixed by the service
/// protocol.
#[must_use]
pub fn build_form(jpeg_bytes: &[u8], options: &RecognizeOptions) -> Form {
    vec![
        ("fromdevice", "pc".to_string()),
        ("clientip", "10.10.10.0".to_string()),
        ("detecttype", "LocateRecognize".to_string()),
        ("languagetype", options.language_type.code().to_string()),
        ("imagetype", "1".to_string()),
        ("image", STANDARD.encode(jpeg_bytes)),
        ("version", "v1".to_string()),
        ("sizetype", "small".to_string()),
    ]
}

/// POST the form once and return the raw response body.
///
/// The body is returned whatever the status code; the service reports its
/// own failures inside the JSON payload.
pub fn send_form(http: &Client, endpoint: &str, api_key: &str, form: &Form) -> ApiResult<Vec<u8>> {
    let response = http
        .post(endpoint)
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .header(APIKEY_HEADER, api_key)
        .form(form)
        .send()?;

    let status = response.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), endpoint = %endpoint, "OCR service returned non-success status");
    }

    let body = response.bytes()?;
    debug!(status = status.as_u16(), bytes = body.len(), "Received OCR response");
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{lang_eng, RecognizeOptions};

    fn field<'a>(form: &'a Form, name: &str) -> &'a str {
        form.iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn test_fixed_fields() {
        let form = build_form(b"jpeg", &RecognizeOptions::default());

        assert_eq!(field(&form, "fromdevice"), "pc");
        assert_eq!(field(&form, "clientip"), "10.10.10.0");
        assert_eq!(field(&form, "detecttype"), "LocateRecognize");
        assert_eq!(field(&form, "languagetype"), "CHN_ENG");
        assert_eq!(field(&form, "imagetype"), "1");
        assert_eq!(field(&form, "version"), "v1");
        assert_eq!(field(&form, "sizetype"), "small");
        assert_eq!(form.len(), 8);
    }

    #[test]
    fn test_image_is_standard_base64() {
        let form = build_form(&[0xFF, 0xD8, 0xFF, 0xFB], &RecognizeOptions::default());
        assert_eq!(field(&form, "image"), "/9j/+w==");
    }

    #[test]
    fn test_language_follows_options() {
        let form = build_form(b"", &RecognizeOptions::from_options(&[lang_eng()]));
        assert_eq!(field(&form, "languagetype"), "ENG");
    }
}
