//! Response envelope and outcome classification.
//!
//! Every endpoint answers with `{"head": {...}, "body": ...}`. The head
//! decides the outcome; the HTTP status only matters when no envelope can be
//! decoded at all.

use crate::FinanceError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Status value of a successful head.
pub const SUCCESS_STATUS: &str = "Y";

/// Code value of a successful head.
pub const SUCCESS_CODE: &str = "00000000";

/// Common response head.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseHead {
    /// Result code, `00000000` on success.
    pub code: String,
    /// Result status, `Y` on success.
    pub status: String,
    /// Short message.
    pub msg: String,
    /// Longer description.
    pub description: String,
    /// Server time.
    pub time: String,
}

impl ResponseHead {
    /// Whether the head carries the success sentinel.
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS && self.code == SUCCESS_CODE
    }

    /// Convert into the domain error for this head.
    pub fn into_error(self) -> FinanceError {
        FinanceError::Domain {
            code: self.code,
            msg: self.msg,
            description: self.description,
        }
    }
}

/// Full response envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct Envelope<T> {
    /// Outcome head.
    pub head: ResponseHead,
    /// Endpoint-specific payload. `null` or missing yields the default.
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: T,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Deserialize)]
struct RawEnvelope {
    head: Option<ResponseHead>,
    #[serde(default)]
    body: serde_json::Value,
}

fn is_2xx(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Decode and classify a raw HTTP response.
///
/// # Errors
/// * `Domain` - an envelope was decoded and its head is not the success sentinel
/// * `Transport` - non-2xx status and no decodable envelope
/// * `Decode` - 2xx status but the envelope or its body does not parse
pub fn decode_response<T>(status: u16, body: &[u8]) -> Result<T, FinanceError>
where
    T: DeserializeOwned + Default,
{
    let raw: RawEnvelope = match serde_json::from_slice(body) {
        Ok(raw) => raw,
        Err(e) if is_2xx(status) => {
            return Err(FinanceError::Decode(format!(
                "Failed to parse response envelope: {}",
                e
            )))
        }
        Err(_) => return Err(non_envelope_error(status, body)),
    };

    let head = match raw.head {
        Some(head) => head,
        None if is_2xx(status) => {
            return Err(FinanceError::Decode(
                "Response envelope has no head".to_string(),
            ))
        }
        None => return Err(non_envelope_error(status, body)),
    };

    if !head.is_success() {
        tracing::warn!(
            http_status = status,
            code = %head.code,
            msg = %head.msg,
            "remote API reported failure"
        );
        return Err(head.into_error());
    }

    if raw.body.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(raw.body)
        .map_err(|e| FinanceError::Decode(format!("Failed to parse response body: {}", e)))
}

fn non_envelope_error(status: u16, body: &[u8]) -> FinanceError {
    let snippet: String = String::from_utf8_lossy(body).chars().take(200).collect();
    FinanceError::Transport(format!("HTTP {}: {}", status, snippet))
}
