//! Callback signature verification.
//!
//! The gateway signs every notification it posts to the merchant's callback
//! URL. The signature is the base64 SHA-256 digest of the `result` values,
//! ordered by key, joined with `:` together with the merchant's signature key
//! as the last element.

use crate::errors::{MaibError, Result};
use crate::types::CallbackNotification;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SEPARATOR: &str = ":";

/// Verifies the signature of a callback notification.
///
/// Returns `Ok(false)` when the signature does not match and an error only when
/// the notification or the secret is missing data needed for the check.
///
/// # Examples
///
/// ```
/// use maib_rs::callback::{sign_result, verify_signature};
/// use maib_rs::types::CallbackNotification;
/// use serde_json::json;
///
/// let result = json!({"payId": "abc", "status": "OK", "amount": 10.25});
/// let result = result.as_object().unwrap().clone();
/// let signature = sign_result(&result, "secret");
///
/// let notification = CallbackNotification {
///     result: Some(result),
///     signature: Some(signature),
/// };
/// assert!(verify_signature(&notification, "secret").unwrap());
/// assert!(!verify_signature(&notification, "other").unwrap());
/// ```
pub fn verify_signature(notification: &CallbackNotification, secret: &str) -> Result<bool> {
    if secret.is_empty() {
        return Err(MaibError::MissingSignatureData(
            "signature key is empty".to_string(),
        ));
    }

    let signature = match notification.signature.as_deref() {
        Some(signature) if !signature.is_empty() => signature,
        _ => {
            return Err(MaibError::MissingSignatureData(
                "callback signature is missing".to_string(),
            ))
        }
    };

    let result = match &notification.result {
        Some(result) if !result.is_empty() => result,
        _ => {
            return Err(MaibError::MissingSignatureData(
                "callback result is missing".to_string(),
            ))
        }
    };

    let expected = sign_result(result, secret);
    let matches: bool = expected.as_bytes().ct_eq(signature.as_bytes()).into();

    if !matches {
        tracing::debug!("callback signature mismatch");
    }

    Ok(matches)
}

/// Parses a raw callback body and verifies its signature.
pub fn verify_callback(body: &[u8], secret: &str) -> Result<bool> {
    let notification: CallbackNotification = serde_json::from_slice(body)?;
    verify_signature(&notification, secret)
}

/// Computes the signature the gateway would attach to `result`.
pub fn sign_result(result: &Map<String, Value>, secret: &str) -> String {
    let mut entries: Vec<(&String, &Value)> = result.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut parts: Vec<String> = entries.into_iter().map(|(_, v)| value_to_string(v)).collect();
    parts.push(secret.to_string());

    let digest = Sha256::digest(parts.join(SEPARATOR).as_bytes());
    BASE64.encode(digest)
}

// Values are rendered the way the gateway renders them when signing:
// `True`/`False` for booleans and Python-style float text.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => float_to_string(f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Formats a float with its shortest round-trip digits, in fixed notation
/// when the decimal exponent is in `-4..16` and as `1.5e+16` / `1e-05` otherwise.
fn float_to_string(value: f64) -> String {
    // `{:e}` yields the shortest round-trip digits, e.g. `1.025e1`
    let formatted = format!("{:e}", value);
    let (mantissa, exponent) = formatted.split_once('e').unwrap_or((&formatted, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let point = exponent + 1;

    if point <= -4 || point > 16 {
        let (first, rest) = digits.split_at(1);
        let fraction = if rest.is_empty() {
            String::new()
        } else {
            format!(".{}", rest)
        };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}{}{}e{}{:02}", sign, first, fraction, exp_sign, exponent.abs());
    }

    let len = digits.len() as i32;
    let body = if point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else if point >= len {
        format!("{}{}.0", digits, "0".repeat((point - len) as usize))
    } else {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}.{}", int, frac)
    };

    format!("{}{}", sign, body)
}
