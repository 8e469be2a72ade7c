//! Error types for the maib-rs library.
//!
//! This module defines every error a gateway operation can surface: request
//! validation failures, callback signature problems, malformed or rejected
//! gateway responses, and transport failures.

use thiserror::Error;

/// Reason a request was rejected before it was sent to the gateway.
///
/// Validation short-circuits: only the first violated constraint is reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A field from the operation's required set is absent or `null`
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// A present field does not satisfy its type or format rule
    #[error("Invalid '{field}' parameter: {reason}")]
    InvalidParameter {
        /// Name of the offending field (`items[].id` for item sub-fields)
        field: String,
        /// Human-readable description of the violated constraint
        reason: String,
    },

    /// The bearer token is empty
    #[error("Access token is not valid. It should be a non-empty string.")]
    InvalidToken,

    /// The entity id for an id-addressed operation is empty
    #[error("Missing ID.")]
    MissingId,
}

impl ValidationError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Main error type for maib gateway operations.
#[derive(Error, Debug)]
pub enum MaibError {
    /// Request rejected by local validation
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// Callback secret, signature or result payload is absent
    #[error("Missing signature data: {0}")]
    MissingSignatureData(String),

    /// Neither a project secret nor a refresh token was supplied
    #[error("Project ID and Project Secret or Refresh Token are required")]
    MissingCredentials,

    /// The gateway answered with an envelope that breaks the protocol
    #[error("Invalid response received from server for endpoint {endpoint}: {message}")]
    Protocol {
        /// Endpoint that produced the response
        endpoint: String,
        /// What was wrong with the envelope
        message: String,
    },

    /// The gateway reported a business error
    #[error("Error sending request to endpoint {endpoint}: {message} ({code})")]
    Gateway {
        /// Endpoint that produced the error
        endpoint: String,
        /// Gateway error code
        code: String,
        /// Gateway error message
        message: String,
    },

    /// Network-level failure while talking to the gateway
    #[error("HTTP error while sending request to endpoint {endpoint}: {source}")]
    Transport {
        /// Endpoint being called
        endpoint: String,
        /// Underlying transport error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Non-success HTTP status without a parseable envelope
    #[error("Unexpected HTTP status {status} from endpoint {endpoint}")]
    HttpStatus {
        /// Endpoint being called
        endpoint: String,
        /// HTTP status code returned
        status: u16,
    },

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error parsing or joining a URL
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl MaibError {
    pub(crate) fn protocol(endpoint: &str, message: impl Into<String>) -> Self {
        MaibError::Protocol {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn transport(
        endpoint: &str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        MaibError::Transport {
            endpoint: endpoint.to_string(),
            source: Box::new(source),
        }
    }
}

/// Result type alias for maib operations.
pub type Result<T> = std::result::Result<T, MaibError>;
