//! Handling of the gateway response envelope.
//!
//! Every endpoint answers with `{ok, result}` on success and `{ok: false,
//! errors}` on failure. Only the first reported error is surfaced.

use crate::errors::{MaibError, Result};
use crate::types::ResponseEnvelope;
use serde_json::Value;

/// Extracts the `result` object from an envelope or maps it to an error.
///
/// A successful envelope whose `result` is not a JSON object is a protocol
/// error.
///
/// # Examples
///
/// ```
/// use maib_rs::response::handle_response;
/// use maib_rs::types::ResponseEnvelope;
/// use serde_json::json;
///
/// let envelope = ResponseEnvelope {
///     ok: Some(true),
///     result: Some(json!({"foo": "bar"})),
///     errors: None,
/// };
/// assert_eq!(handle_response(envelope, "pay").unwrap(), json!({"foo": "bar"}));
/// ```
pub fn handle_response(envelope: ResponseEnvelope, endpoint: &str) -> Result<Value> {
    if envelope.ok == Some(true) {
        return match envelope.result {
            Some(result) if result.is_object() => Ok(result),
            Some(_) => Err(MaibError::protocol(endpoint, "result is not an object")),
            None => Err(MaibError::protocol(endpoint, "missing result")),
        };
    }

    if let Some(error) = envelope.errors.and_then(|errors| errors.into_iter().next()) {
        tracing::warn!(
            endpoint,
            code = error.error_code.as_str(),
            "gateway rejected request"
        );
        return Err(MaibError::Gateway {
            endpoint: endpoint.to_string(),
            code: error.error_code,
            message: error.error_message,
        });
    }

    Err(MaibError::protocol(endpoint, "malformed envelope"))
}

/// Parses a raw JSON value as an envelope and handles it.
pub fn handle_value(value: Value, endpoint: &str) -> Result<Value> {
    if !value.is_object() {
        return Err(MaibError::protocol(endpoint, "malformed envelope"));
    }
    let envelope: ResponseEnvelope = serde_json::from_value(value)
        .map_err(|e| MaibError::protocol(endpoint, format!("malformed envelope: {}", e)))?;
    handle_response(envelope, endpoint)
}

/// Extracts the first error message from a raw error response body.
///
/// Returns an empty string for an empty body and `"Unknown error details."`
/// when the body reports no errors.
pub fn first_error_message(body: &str) -> Result<String> {
    if body.is_empty() {
        return Ok(String::new());
    }

    let envelope: ResponseEnvelope = serde_json::from_str(body)?;
    let message = envelope
        .errors
        .and_then(|errors| errors.into_iter().next())
        .map(|error| error.error_message)
        .unwrap_or_else(|| "Unknown error details.".to_string());

    Ok(message)
}
