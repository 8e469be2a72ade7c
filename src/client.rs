//! Client for the maib e-commerce API.
//!
//! [`MaibClient`] validates every request locally, sends it through its
//! [`Transport`], and unwraps the gateway's response envelope. It holds no
//! per-request state and can be cloned and shared between tasks.

use crate::config::MaibConfig;
use crate::errors::{MaibError, Result, ValidationError};
use crate::response::handle_value;
use crate::transport::{HttpTransport, Transport, TransportRequest};
use crate::types::{
    Operation, PaymentParams, TokenCredentials, TokenResult, GENERATE_TOKEN_ENDPOINT,
};
use crate::utils::build_url;
use crate::validation::{validate, validate_id, validate_token};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;

/// Client for the maib e-commerce gateway.
#[derive(Clone)]
pub struct MaibClient {
    config: MaibConfig,
    transport: Arc<dyn Transport>,
}

impl MaibClient {
    /// Creates a client sending requests over HTTP with `reqwest`.
    ///
    /// # Examples
    ///
    /// ```
    /// use maib_rs::client::MaibClient;
    /// use maib_rs::config::MaibConfig;
    ///
    /// let client = MaibClient::new(MaibConfig::new());
    /// assert_eq!(client.config().base_url.as_str(), "https://api.maibmerchants.md/v1/");
    /// ```
    pub fn new(config: MaibConfig) -> Self {
        Self {
            config,
            transport: Arc::new(HttpTransport::new()),
        }
    }

    /// Replaces the transport.
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Arc::new(transport);
        self
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &MaibConfig {
        &self.config
    }

    /// Direct payment.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use maib_rs::client::MaibClient;
    /// use maib_rs::config::MaibConfig;
    /// use serde_json::json;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = MaibClient::new(MaibConfig::new());
    /// let params = json!({
    ///     "amount": 10.25,
    ///     "currency": "MDL",
    ///     "clientIp": "135.250.245.121",
    ///     "description": "Order #123",
    ///     "callbackUrl": "https://example.com/callback"
    /// });
    ///
    /// let result = client.pay(params.as_object().unwrap(), "access-token").await?;
    /// println!("redirect to {}", result["payUrl"]);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn pay(&self, params: &PaymentParams, token: &str) -> Result<Value> {
        self.execute(Operation::Pay, params, token).await
    }

    /// Two-step payment, authorization (hold) part.
    pub async fn hold(&self, params: &PaymentParams, token: &str) -> Result<Value> {
        self.execute(Operation::Hold, params, token).await
    }

    /// Two-step payment, completion of a held amount.
    pub async fn complete(&self, params: &PaymentParams, token: &str) -> Result<Value> {
        self.execute(Operation::Complete, params, token).await
    }

    /// Refund of a completed payment.
    pub async fn refund(&self, params: &PaymentParams, token: &str) -> Result<Value> {
        self.execute(Operation::Refund, params, token).await
    }

    /// Payment status lookup.
    pub async fn pay_info(&self, pay_id: &str, token: &str) -> Result<Value> {
        self.execute_by_id(Operation::PayInfo, pay_id, token).await
    }

    /// Removal of a saved card.
    pub async fn delete_card(&self, biller_id: &str, token: &str) -> Result<Value> {
        self.execute_by_id(Operation::DeleteCard, biller_id, token).await
    }

    /// Card registration for recurring payments.
    pub async fn save_recurring(&self, params: &PaymentParams, token: &str) -> Result<Value> {
        self.execute(Operation::SaveRecurring, params, token).await
    }

    /// Recurring charge of a saved card.
    pub async fn execute_recurring(&self, params: &PaymentParams, token: &str) -> Result<Value> {
        self.execute(Operation::ExecuteRecurring, params, token).await
    }

    /// Card registration for one-click payments.
    pub async fn save_oneclick(&self, params: &PaymentParams, token: &str) -> Result<Value> {
        self.execute(Operation::SaveOneClick, params, token).await
    }

    /// One-click charge of a saved card.
    pub async fn execute_oneclick(&self, params: &PaymentParams, token: &str) -> Result<Value> {
        self.execute(Operation::ExecuteOneClick, params, token).await
    }

    /// Exchanges project credentials or a refresh token for an access token.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use maib_rs::client::MaibClient;
    /// use maib_rs::config::MaibConfig;
    /// use maib_rs::types::TokenCredentials;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = MaibClient::new(MaibConfig::new());
    /// let token = client
    ///     .generate_token(&TokenCredentials::project("project-id", "project-secret"))
    ///     .await?;
    ///
    /// let refreshed = client
    ///     .generate_token(&TokenCredentials::refresh(token.refresh_token.unwrap_or_default()))
    ///     .await?;
    /// println!("{}", refreshed.access_token);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn generate_token(&self, credentials: &TokenCredentials) -> Result<TokenResult> {
        if credentials.is_incomplete() {
            return Err(MaibError::MissingCredentials);
        }

        let body = serde_json::to_value(credentials)?;
        let result = self
            .send(Method::POST, GENERATE_TOKEN_ENDPOINT, None, Some(&body), None)
            .await?;

        serde_json::from_value(result).map_err(|e| {
            MaibError::protocol(GENERATE_TOKEN_ENDPOINT, format!("invalid token result: {}", e))
        })
    }

    async fn execute(
        &self,
        operation: Operation,
        params: &PaymentParams,
        token: &str,
    ) -> Result<Value> {
        validate(operation, params)
            .and_then(|_| validate_token(token))
            .map_err(|e| rejected(operation, e))?;

        let body = Value::Object(params.clone());
        self.send(
            operation.method(),
            operation.endpoint(),
            None,
            Some(&body),
            Some(token),
        )
        .await
    }

    async fn execute_by_id(
        &self,
        operation: Operation,
        entity_id: &str,
        token: &str,
    ) -> Result<Value> {
        validate_id(entity_id)
            .and_then(|_| validate_token(token))
            .map_err(|e| rejected(operation, e))?;

        self.send(
            operation.method(),
            operation.endpoint(),
            Some(entity_id),
            None,
            Some(token),
        )
        .await
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        entity_id: Option<&str>,
        body: Option<&Value>,
        bearer_token: Option<&str>,
    ) -> Result<Value> {
        let url = build_url(&self.config.base_url, endpoint, entity_id)?;
        tracing::debug!(method = method.as_str(), endpoint, "sending gateway request");

        let response = self
            .transport
            .send(TransportRequest {
                method,
                url,
                endpoint,
                body,
                bearer_token,
                timeout: self.config.timeout,
            })
            .await?;

        handle_value(response, endpoint)
    }
}

fn rejected(operation: Operation, error: ValidationError) -> MaibError {
    let reason = error.to_string();
    tracing::warn!(
        endpoint = operation.endpoint(),
        reason = reason.as_str(),
        "request rejected before sending"
    );
    error.into()
}
