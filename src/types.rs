//! Core type definitions for the maib e-commerce API.
//!
//! This module contains the operation catalogue, the gateway response envelope,
//! token exchange payloads and the callback notification shape.

use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Property bag sent as the JSON body of a payment operation.
pub type PaymentParams = Map<String, Value>;

/// Endpoint used to exchange project credentials for an access token.
pub const GENERATE_TOKEN_ENDPOINT: &str = "generate-token";

/// Payment operations exposed by the gateway.
///
/// # Examples
///
/// ```
/// use maib_rs::types::Operation;
/// use reqwest::Method;
///
/// assert_eq!(Operation::Pay.endpoint(), "pay");
/// assert_eq!(Operation::PayInfo.method(), Method::GET);
/// assert_eq!(Operation::Pay.required_fields(), &["amount", "currency", "clientIp"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Direct (one-step) payment
    Pay,
    /// Two-step payment, authorization part
    Hold,
    /// Two-step payment, capture of a held amount
    Complete,
    /// Full or partial refund
    Refund,
    /// Payment status lookup by pay id
    PayInfo,
    /// Removal of a saved card
    DeleteCard,
    /// Card registration for recurring billing
    SaveRecurring,
    /// Charge of a card saved for recurring billing
    ExecuteRecurring,
    /// Card registration for one-click payments
    SaveOneClick,
    /// Charge of a card saved for one-click payments
    ExecuteOneClick,
}

const REQUIRED_PAY: &[&str] = &["amount", "currency", "clientIp"];
const REQUIRED_PAY_ID: &[&str] = &["payId"];
const REQUIRED_SAVE: &[&str] = &["billerExpiry", "currency", "clientIp"];
const REQUIRED_EXECUTE_RECURRING: &[&str] = &["billerId", "amount", "currency"];
const REQUIRED_EXECUTE_ONECLICK: &[&str] = &["billerId", "amount", "currency", "clientIp"];

impl Operation {
    /// All operations, in catalogue order.
    pub const ALL: [Operation; 10] = [
        Operation::Pay,
        Operation::Hold,
        Operation::Complete,
        Operation::Refund,
        Operation::PayInfo,
        Operation::DeleteCard,
        Operation::SaveRecurring,
        Operation::ExecuteRecurring,
        Operation::SaveOneClick,
        Operation::ExecuteOneClick,
    ];

    /// Endpoint path relative to the API base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            Operation::Pay => "pay",
            Operation::Hold => "hold",
            Operation::Complete => "complete",
            Operation::Refund => "refund",
            Operation::PayInfo => "pay-info",
            Operation::DeleteCard => "delete-card",
            Operation::SaveRecurring => "savecard-recurring",
            Operation::ExecuteRecurring => "execute-recurring",
            Operation::SaveOneClick => "savecard-oneclick",
            Operation::ExecuteOneClick => "execute-oneclick",
        }
    }

    /// HTTP method used for the operation.
    pub fn method(self) -> Method {
        match self {
            Operation::PayInfo => Method::GET,
            Operation::DeleteCard => Method::DELETE,
            _ => Method::POST,
        }
    }

    /// Fields that must be present (and non-null) in the request body.
    ///
    /// Id-addressed operations take a bare identifier instead of a body and
    /// have an empty required set.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Operation::Pay | Operation::Hold => REQUIRED_PAY,
            Operation::Complete | Operation::Refund => REQUIRED_PAY_ID,
            Operation::SaveRecurring | Operation::SaveOneClick => REQUIRED_SAVE,
            Operation::ExecuteRecurring => REQUIRED_EXECUTE_RECURRING,
            Operation::ExecuteOneClick => REQUIRED_EXECUTE_ONECLICK,
            Operation::PayInfo | Operation::DeleteCard => &[],
        }
    }

    /// Whether the operation is addressed by a bare entity id.
    pub fn takes_entity_id(self) -> bool {
        matches!(self, Operation::PayInfo | Operation::DeleteCard)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// Currencies accepted by the gateway.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Moldovan leu
    Mdl,
    /// Euro
    Eur,
    /// US dollar
    Usd,
}

impl Currency {
    /// ISO 4217 code as expected by the gateway.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Mdl => "MDL",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
        }
    }

    /// Parses an exact, upper-case currency code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "MDL" => Some(Currency::Mdl),
            "EUR" => Some(Currency::Eur),
            "USD" => Some(Currency::Usd),
            _ => None,
        }
    }
}

/// A single error entry reported by the gateway.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GatewayErrorDetail {
    /// Gateway error code
    #[serde(rename = "errorCode", default, deserialize_with = "scalar_to_string")]
    pub error_code: String,

    /// Human-readable error message
    #[serde(rename = "errorMessage", default, deserialize_with = "scalar_to_string")]
    pub error_message: String,

    /// Optional parameter-level details
    #[serde(rename = "errorArgs", skip_serializing_if = "Option::is_none")]
    pub error_args: Option<Value>,
}

// The gateway sends error codes both as strings and as bare numbers.
fn scalar_to_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

/// Uniform success/error wrapper returned by every gateway endpoint.
///
/// # Examples
///
/// ```
/// use maib_rs::types::ResponseEnvelope;
///
/// let envelope: ResponseEnvelope =
///     serde_json::from_str(r#"{"ok": true, "result": {"payId": "abc"}}"#).unwrap();
/// assert_eq!(envelope.ok, Some(true));
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ResponseEnvelope {
    /// Success flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,

    /// Operation result, meaningful when `ok` is true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Reported errors, meaningful when `ok` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GatewayErrorDetail>>,
}

/// Credentials exchanged for an access token.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TokenCredentials {
    /// Project id and project secret, used for the first token
    Project {
        /// Project id issued in the merchant portal
        #[serde(rename = "projectId")]
        project_id: String,
        /// Project secret issued in the merchant portal
        #[serde(rename = "projectSecret")]
        project_secret: String,
    },
    /// Refresh token from a previous exchange
    Refresh {
        /// Refresh token
        #[serde(rename = "refreshToken")]
        refresh_token: String,
    },
}

impl TokenCredentials {
    /// Builds credentials from a project id and secret.
    pub fn project(project_id: impl Into<String>, project_secret: impl Into<String>) -> Self {
        TokenCredentials::Project {
            project_id: project_id.into(),
            project_secret: project_secret.into(),
        }
    }

    /// Builds credentials from a refresh token.
    pub fn refresh(refresh_token: impl Into<String>) -> Self {
        TokenCredentials::Refresh {
            refresh_token: refresh_token.into(),
        }
    }

    /// Whether any credential value is empty.
    pub fn is_incomplete(&self) -> bool {
        match self {
            TokenCredentials::Project {
                project_id,
                project_secret,
            } => project_id.is_empty() || project_secret.is_empty(),
            TokenCredentials::Refresh { refresh_token } => refresh_token.is_empty(),
        }
    }
}

/// Result of a successful token exchange.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TokenResult {
    /// Bearer token for payment operations
    #[serde(rename = "accessToken")]
    pub access_token: String,

    /// Access token lifetime in seconds
    #[serde(rename = "expiresIn", default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,

    /// Token usable for the next exchange
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Refresh token lifetime in seconds
    #[serde(
        rename = "refreshExpiresIn",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub refresh_expires_in: Option<u64>,

    /// Token type, usually "Bearer"
    #[serde(rename = "tokenType", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// Asynchronous payment-result notification posted to the merchant's callback URL.
///
/// `result` is gateway-defined and kept as an open mapping.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CallbackNotification {
    /// Payment result fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Map<String, Value>>,

    /// Base64 SHA-256 signature over the result fields and the merchant secret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}
