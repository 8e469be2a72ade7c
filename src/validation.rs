//! Request validation for gateway operations.
//!
//! Every outgoing request is checked before it is sent: first the operation's
//! required fields must be present, then every field that *is* present must
//! satisfy its rule. Validation stops at the first violation, and rules are
//! applied in a fixed field order so the reported error is deterministic.
//!
//! Fields that carry an IP address, an email address or a URL are only
//! required to be non-empty strings; their format is left to the gateway.

use crate::errors::ValidationError;
use crate::types::{Currency, Operation, PaymentParams};
use serde_json::{Map, Value};

type Check = std::result::Result<(), ValidationError>;

/// Rule applied to a single present field.
#[derive(Debug, Clone, Copy)]
enum Rule {
    /// String of exactly this many characters
    ExactLen(usize),
    /// String of at most this many characters
    MaxLen(usize),
    /// Non-empty string, format unchecked
    NonEmpty,
    /// Number greater than or equal to the bound
    MinNumber(f64),
    /// One of the accepted currency codes
    Currency,
    /// Non-empty array of item objects
    Items,
}

/// Top-level field rules, in reporting order.
const FIELD_RULES: &[(&str, Rule)] = &[
    ("billerId", Rule::ExactLen(36)),
    ("billerExpiry", Rule::ExactLen(4)),
    ("payId", Rule::MaxLen(36)),
    ("confirmAmount", Rule::MinNumber(0.01)),
    ("amount", Rule::MinNumber(1.0)),
    ("refundAmount", Rule::MinNumber(0.01)),
    ("currency", Rule::Currency),
    ("clientIp", Rule::NonEmpty),
    ("language", Rule::ExactLen(2)),
    ("description", Rule::MaxLen(124)),
    ("clientName", Rule::MaxLen(128)),
    ("email", Rule::NonEmpty),
    ("phone", Rule::MaxLen(40)),
    ("orderId", Rule::MaxLen(36)),
    ("delivery", Rule::MinNumber(0.0)),
    ("items", Rule::Items),
    ("callbackUrl", Rule::NonEmpty),
    ("okUrl", Rule::NonEmpty),
    ("failUrl", Rule::NonEmpty),
];

/// Validates a request body for the given operation.
///
/// # Examples
///
/// ```
/// use maib_rs::errors::ValidationError;
/// use maib_rs::types::Operation;
/// use maib_rs::validation::validate;
/// use serde_json::json;
///
/// let params = json!({"amount": 10.5, "currency": "MDL", "clientIp": "127.0.0.1"});
/// assert!(validate(Operation::Pay, params.as_object().unwrap()).is_ok());
///
/// let params = json!({"amount": 10.5, "clientIp": "127.0.0.1"});
/// assert_eq!(
///     validate(Operation::Pay, params.as_object().unwrap()),
///     Err(ValidationError::MissingParameter("currency".to_string()))
/// );
/// ```
pub fn validate(operation: Operation, params: &PaymentParams) -> Check {
    for field in operation.required_fields() {
        if present(params, field).is_none() {
            return Err(ValidationError::MissingParameter(field.to_string()));
        }
    }

    for (field, rule) in FIELD_RULES {
        if let Some(value) = present(params, field) {
            check_rule(field, *rule, value)?;
        }
    }

    Ok(())
}

/// Validates a bearer token.
pub fn validate_token(token: &str) -> Check {
    if token.is_empty() {
        return Err(ValidationError::InvalidToken);
    }
    Ok(())
}

/// Validates the bare entity id of an id-addressed operation.
pub fn validate_id(entity_id: &str) -> Check {
    if entity_id.is_empty() {
        return Err(ValidationError::MissingId);
    }
    Ok(())
}

/// Returns the field value unless it is absent or `null`.
fn present<'a>(params: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    params.get(field).filter(|value| !value.is_null())
}

fn check_rule(field: &str, rule: Rule, value: &Value) -> Check {
    match rule {
        Rule::ExactLen(len) => match value.as_str() {
            Some(s) if s.chars().count() == len => Ok(()),
            _ => Err(ValidationError::invalid(
                field,
                format!("should be a string of {} characters", len),
            )),
        },
        Rule::MaxLen(max) => check_max_len(field, value, max),
        Rule::NonEmpty => match value.as_str() {
            Some(s) if !s.is_empty() => Ok(()),
            _ => Err(ValidationError::invalid(field, "should be a non-empty string")),
        },
        Rule::MinNumber(min) => check_min_number(field, value, min),
        Rule::Currency => match value.as_str().and_then(Currency::from_code) {
            Some(_) => Ok(()),
            None => Err(ValidationError::invalid(
                field,
                "currency should be one of 'MDL', 'EUR' or 'USD'",
            )),
        },
        Rule::Items => check_items(value),
    }
}

fn check_max_len(field: &str, value: &Value, max: usize) -> Check {
    match value.as_str() {
        Some(s) if s.chars().count() <= max => Ok(()),
        _ => Err(ValidationError::invalid(
            field,
            format!("should be a string and not exceed {} characters", max),
        )),
    }
}

fn check_min_number(field: &str, value: &Value, min: f64) -> Check {
    match value.as_f64() {
        Some(n) if n >= min => Ok(()),
        _ => Err(ValidationError::invalid(
            field,
            format!("should be a numeric value >= {}", min),
        )),
    }
}

fn check_items(value: &Value) -> Check {
    let items = match value.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => return Err(ValidationError::invalid("items", "should be a non-empty list")),
    };

    for item in items {
        let item = item
            .as_object()
            .ok_or_else(|| ValidationError::invalid("items[]", "each item should be an object"))?;

        if let Some(id) = present(item, "id") {
            check_max_len("items[].id", id, 36)?;
        }
        if let Some(name) = present(item, "name") {
            check_max_len("items[].name", name, 128)?;
        }
        if let Some(price) = present(item, "price") {
            check_min_number("items[].price", price, 0.0)?;
        }
        if let Some(quantity) = present(item, "quantity") {
            // non-negative integers are exactly the values serde_json stores as u64
            if !quantity.is_u64() {
                return Err(ValidationError::invalid(
                    "items[].quantity",
                    "should be an integer value >= 0",
                ));
            }
        }
    }

    Ok(())
}
