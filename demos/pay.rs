//! Example maib payment flow.
//!
//! This example obtains an access token, starts a direct payment and then
//! looks up its status.
//!
//! Run with:
//! ```bash
//! cargo run --example pay
//! ```
//!
//! Environment variables (a `.env` file is loaded if present):
//! - MAIB_PROJECT_ID: Project id from the merchant portal
//! - MAIB_PROJECT_SECRET: Project secret from the merchant portal
//! - MAIB_BASE_URL: API base URL (default: production)
//! - MAIB_TIMEOUT_SECS: Request timeout (default: 30)
//! - CALLBACK_URL: Where the gateway should post the payment result

use maib_rs::{MaibClient, MaibConfig, MaibError, TokenCredentials};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let project_id = std::env::var("MAIB_PROJECT_ID")?;
    let project_secret = std::env::var("MAIB_PROJECT_SECRET")?;
    let callback_url = std::env::var("CALLBACK_URL")
        .unwrap_or_else(|_| "http://localhost:3000/callback".to_string());

    let config = MaibConfig::from_env()?;
    println!("maib example payment");
    println!("   API: {}", config.base_url);
    println!();

    let client = MaibClient::new(config);

    let token = client
        .generate_token(&TokenCredentials::project(project_id, project_secret))
        .await?;
    println!("Access token obtained, expires in {:?}s", token.expires_in);

    let params = json!({
        "amount": 10.25,
        "currency": "MDL",
        "clientIp": "127.0.0.1",
        "language": "ro",
        "description": "Example order",
        "orderId": "example-1",
        "items": [
            {"id": "1", "name": "Coffee", "price": 5.0, "quantity": 1},
            {"id": "2", "name": "Croissant", "price": 5.25, "quantity": 1}
        ],
        "callbackUrl": callback_url,
        "okUrl": "http://localhost:3000/ok",
        "failUrl": "http://localhost:3000/fail"
    });

    let params = params
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("payment parameters must be an object"))?;

    match client.pay(params, &token.access_token).await {
        Ok(result) => {
            println!("Payment created:");
            println!("{}", serde_json::to_string_pretty(&result)?);

            if let Some(pay_id) = result["payId"].as_str() {
                let info = client.pay_info(pay_id, &token.access_token).await?;
                println!("\nPayment status:");
                println!("{}", serde_json::to_string_pretty(&info)?);
            }
        }
        Err(MaibError::Gateway { code, message, .. }) => {
            eprintln!("Gateway rejected the payment: {} ({})", message, code);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
