//! Example callback receiver using Axum.
//!
//! This example accepts the payment-result notifications the gateway posts to
//! the merchant's callback URL and rejects the ones whose signature does not
//! verify.
//!
//! Run with:
//! ```bash
//! cargo run --example callback
//! ```
//!
//! Environment variables (a `.env` file is loaded if present):
//! - MAIB_SIGNATURE_KEY: Signature key from the merchant portal
//! - PORT: Server port (default: 3000)

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use maib_rs::callback::verify_callback;
use maib_rs::CallbackNotification;
use serde_json::json;
use std::sync::Arc;

struct AppState {
    signature_key: String,
}

/// Receives a payment notification.
async fn callback_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let verified = verify_callback(&body, &state.signature_key)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if !verified {
        tracing::warn!("rejected callback with invalid signature");
        return Err(AppError::Forbidden("invalid signature".into()));
    }

    let notification: CallbackNotification =
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;

    if let Some(result) = notification.result {
        tracing::info!(
            pay_id = result.get("payId").and_then(|v| v.as_str()),
            status = result.get("status").and_then(|v| v.as_str()),
            "payment notification accepted"
        );
    }

    Ok((StatusCode::OK, Json(json!({ "ok": true }))).into_response())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let signature_key = std::env::var("MAIB_SIGNATURE_KEY")?;
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()?;

    let state = Arc::new(AppState { signature_key });

    let app = Router::new()
        .route("/callback", post(callback_handler))
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("Callback receiver listening on http://{}/callback", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

enum AppError {
    BadRequest(String),
    Forbidden(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
