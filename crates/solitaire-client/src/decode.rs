//! Wire-level response decoding.
//!
//! Decoding happens in two stages so failures are attributable: first the
//! raw body must be UTF-8 JSON at all (otherwise [`ClientError::Decode`]),
//! then it must carry the `success` discriminator and the keys the typed
//! envelope requires (otherwise [`ClientError::ShapeMismatch`]). A
//! well-formed `success: false` answer becomes [`ClientError::Rejected`]
//! with the server's error string.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;

/// Decode a raw response body into a typed envelope.
///
/// `status` is the HTTP status of the response, recorded in
/// [`ClientError::Rejected`] so callers can distinguish a "no such thing"
/// answer (HTTP 200) from a missing-game answer (HTTP 404).
pub fn decode_envelope<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T, ClientError> {
    let text =
        std::str::from_utf8(body).map_err(|e| ClientError::Decode(format!("invalid UTF-8: {e}")))?;
    let value: Value =
        serde_json::from_str(text.trim()).map_err(|e| ClientError::Decode(e.to_string()))?;

    let Some(success) = value.get("success").and_then(Value::as_bool) else {
        return Err(ClientError::ShapeMismatch(
            "missing or non-boolean `success` key".to_string(),
        ));
    };
    if !success {
        let message = value
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unspecified server error")
            .to_string();
        return Err(ClientError::Rejected { message, status });
    }

    serde_json::from_value(value).map_err(|e| ClientError::ShapeMismatch(e.to_string()))
}
