//! Response decoding

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw response body returned by the service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrResponse {
    /// Error message, empty on success
    #[serde(rename = "errMsg", default, deserialize_with = "null_as_default")]
    pub err_msg: String,
    /// Recognized regions in service order
    #[serde(rename = "retData", default, deserialize_with = "null_as_default")]
    pub ret_data: Vec<TextFragment>,
}

/// One recognized region
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFragment {
    /// Recognized word or phrase
    #[serde(default, deserialize_with = "null_as_default")]
    pub word: String,
    /// Bounding rectangle of the region
    #[serde(default, deserialize_with = "null_as_default")]
    pub rect: Rect,
}

/// Bounding rectangle, kept in the string form the service sends.
///
/// Missing or `null` sides decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rect {
    /// Height in pixels
    #[serde(deserialize_with = "null_as_default")]
    pub height: String,
    /// Left offset in pixels
    #[serde(deserialize_with = "null_as_default")]
    pub left: String,
    /// Top offset in pixels
    #[serde(deserialize_with = "null_as_default")]
    pub top: String,
    /// Width in pixels
    #[serde(deserialize_with = "null_as_default")]
    pub width: String,
}

/// Numeric form of [`Rect`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    /// Left offset
    pub left: i64,
    /// Top offset
    pub top: i64,
    /// Width
    pub width: i64,
    /// Height
    pub height: i64,
}

impl Rect {
    /// Parse the four fields; `None` if any is not an integer
    #[must_use]
    pub fn to_numeric(&self) -> Option<Bounds> {
        Some(Bounds {
            left: self.left.trim().parse().ok()?,
            top: self.top.trim().parse().ok()?,
            width: self.width.trim().parse().ok()?,
            height: self.height.trim().parse().ok()?,
        })
    }
}

impl OcrResponse {
    /// Turn the response into fragments, failing when nothing was recognized
    pub fn into_fragments(self) -> ApiResult<Vec<TextFragment>> {
        if self.ret_data.is_empty() {
            return Err(ApiError::no_text(&self.err_msg));
        }
        Ok(self.ret_data)
    }
}

/// Decode a raw response body into recognized fragments
pub fn decode(body: &[u8]) -> ApiResult<Vec<TextFragment>> {
    let response: OcrResponse = serde_json::from_slice(body)?;
    response.into_fragments()
}
