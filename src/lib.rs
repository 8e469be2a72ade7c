//! # maib-rs
//!
//! A Rust client for the maib e-commerce card payment gateway.
//!
//! The crate covers the full merchant-side flow: obtaining access tokens,
//! direct and two-step payments, refunds, card-on-file (recurring and
//! one-click) payments, payment status lookups, and verification of the
//! signed notifications the gateway posts to the merchant's callback URL.
//!
//! ## Features
//!
//! - **Request validation**: every request is checked locally before it is sent,
//!   and the first violated rule is reported
//! - **Callback verification**: constant-time check of the callback signature
//! - **Typed errors**: gateway, protocol, validation and transport failures are
//!   distinct [`MaibError`] variants
//! - **Pluggable transport**: `reqwest` by default, any [`transport::Transport`]
//!   implementation otherwise
//!
//! ## Quick Start
//!
//! ### Payments
//!
//! ```rust,no_run
//! use maib_rs::{MaibClient, MaibConfig, TokenCredentials};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MaibClient::new(MaibConfig::from_env()?);
//!
//! let token = client
//!     .generate_token(&TokenCredentials::project("project-id", "project-secret"))
//!     .await?;
//!
//! let params = json!({
//!     "amount": 10.25,
//!     "currency": "MDL",
//!     "clientIp": "135.250.245.121",
//!     "orderId": "123",
//!     "callbackUrl": "https://example.com/callback"
//! });
//! let result = client.pay(params.as_object().unwrap(), &token.access_token).await?;
//! println!("payUrl: {}", result["payUrl"]);
//! # Ok(())
//! # }
//! ```
//!
//! ### Callbacks
//!
//! ```rust,no_run
//! use maib_rs::callback::verify_callback;
//!
//! # fn example(body: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! if verify_callback(body, "signature-key")? {
//!     // trust the payment result
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## References
//!
//! - [maib e-commerce API](https://docs.maibmerchants.md/en)
//! - [Callback notifications](https://docs.maibmerchants.md/en/notifications-on-callback-url)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod callback;
pub mod client;
pub mod config;
pub mod errors;
pub mod response;
pub mod transport;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export commonly used items
pub use callback::{verify_callback, verify_signature};
pub use client::MaibClient;
pub use config::MaibConfig;
pub use errors::{MaibError, Result, ValidationError};
pub use types::{
    CallbackNotification, Currency, GatewayErrorDetail, Operation, PaymentParams,
    ResponseEnvelope, TokenCredentials, TokenResult,
};
