//! Integration tests for the maib-rs library.
//!
//! These tests drive the client end to end against a mock gateway served by
//! wiremock, and exercise callback verification on realistic payloads.

use maib_rs::{
    callback::{sign_result, verify_callback, verify_signature},
    response::handle_response,
    transport::{HttpTransport, Transport, TransportRequest},
    CallbackNotification, MaibClient, MaibConfig, MaibError, Operation, ResponseEnvelope,
    TokenCredentials, ValidationError,
};
use reqwest::Method;
use serde_json::{json, Value};
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "access-token";

async fn client_for(server: &MockServer) -> MaibClient {
    let config = MaibConfig::new()
        .with_base_url(&format!("{}/v1", server.uri()))
        .unwrap()
        .with_timeout(Duration::from_secs(5));
    MaibClient::new(config)
}

fn object(value: Value) -> serde_json::Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn test_generate_token_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/generate-token"))
        .and(body_json(json!({"projectId": "pid", "projectSecret": "psecret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "accessToken": "xyz",
                "expiresIn": 300,
                "refreshToken": "rt",
                "refreshExpiresIn": 1800,
                "tokenType": "Bearer"
            },
            "ok": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let token = client
        .generate_token(&TokenCredentials::project("pid", "psecret"))
        .await
        .unwrap();

    assert_eq!(token.access_token, "xyz");
    assert_eq!(token.refresh_token.as_deref(), Some("rt"));
    assert_eq!(token.token_type.as_deref(), Some("Bearer"));
}

#[tokio::test]
async fn test_refresh_token_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/generate-token"))
        .and(body_json(json!({"refreshToken": "rt"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"accessToken": "fresh"},
            "ok": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let token = client
        .generate_token(&TokenCredentials::refresh("rt"))
        .await
        .unwrap();
    assert_eq!(token.access_token, "fresh");
}

#[tokio::test]
async fn test_pay_over_http() {
    let server = MockServer::start().await;
    let params = json!({
        "amount": 10.25,
        "currency": "MDL",
        "clientIp": "135.250.245.121",
        "language": "ro",
        "description": "Order #123",
        "items": [{"id": "10", "name": "Product", "price": 10.25, "quantity": 1}],
        "callbackUrl": "https://example.com/callback"
    });

    Mock::given(method("POST"))
        .and(path("/v1/pay"))
        .and(header("authorization", "Bearer access-token"))
        .and(body_json(params.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "payId": "f16a9006-128a-46bc-8e2a-77a6ee99df75",
                "orderId": "123",
                "payUrl": "https://maib.ecommerce.md/ecomm01/ClientHandler?trans_id=rEsfhyIk8s9ypxkcS9fj"
            },
            "ok": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.pay(&object(params), TOKEN).await.unwrap();
    assert_eq!(result["payId"], "f16a9006-128a-46bc-8e2a-77a6ee99df75");
}

#[tokio::test]
async fn test_pay_info_and_delete_card_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/pay-info/f16a9006-128a-46bc-8e2a-77a6ee99df75"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"payId": "f16a9006-128a-46bc-8e2a-77a6ee99df75", "status": "OK"},
            "ok": true
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/delete-card/c7e6e3a0-9f2b-4d1e-8a43-7b1f3f1d2e11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"billerId": "c7e6e3a0-9f2b-4d1e-8a43-7b1f3f1d2e11", "status": "OK"},
            "ok": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let info = client
        .pay_info("f16a9006-128a-46bc-8e2a-77a6ee99df75", TOKEN)
        .await
        .unwrap();
    assert_eq!(info["status"], "OK");

    let deleted = client
        .delete_card("c7e6e3a0-9f2b-4d1e-8a43-7b1f3f1d2e11", TOKEN)
        .await
        .unwrap();
    assert_eq!(deleted["status"], "OK");
}

#[tokio::test]
async fn test_gateway_error_with_4xx_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/refund"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [
                {"errorCode": "12001", "errorMessage": "Parameter 'refundAmount' is invalid"},
                {"errorCode": "12002", "errorMessage": "ignored"}
            ],
            "ok": false
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let params = object(json!({"payId": "f16a9006-128a-46bc-8e2a-77a6ee99df75", "refundAmount": 1}));
    let err = client.refund(&params, TOKEN).await.unwrap_err();

    match err {
        MaibError::Gateway {
            endpoint,
            code,
            message,
        } => {
            assert_eq!(endpoint, "refund");
            assert_eq!(code, "12001");
            assert_eq!(message, "Parameter 'refundAmount' is invalid");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_error_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/hold"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let params = object(json!({"amount": 5, "currency": "EUR", "clientIp": "127.0.0.1"}));
    let err = client.hold(&params, TOKEN).await.unwrap_err();
    assert!(matches!(err, MaibError::HttpStatus { status: 502, .. }));
}

#[tokio::test]
async fn test_malformed_envelope_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/complete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let params = object(json!({"payId": "abc", "confirmAmount": 0.01}));
    let err = client.complete(&params, TOKEN).await.unwrap_err();
    assert!(matches!(err, MaibError::Protocol { ref message, .. } if message == "missing result"));
}

#[tokio::test]
async fn test_validation_happens_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let params = object(json!({"billerExpiry": "1230", "currency": "usd", "clientIp": "127.0.0.1"}));
    let err = client.save_recurring(&params, TOKEN).await.unwrap_err();
    assert!(matches!(
        err,
        MaibError::Validation(ValidationError::InvalidParameter { ref field, .. }) if field == "currency"
    ));

    let params = object(json!({"amount": 10, "currency": "MDL"}));
    let err = client.execute_recurring(&params, TOKEN).await.unwrap_err();
    assert!(matches!(
        err,
        MaibError::Validation(ValidationError::MissingParameter(ref field)) if field == "billerId"
    ));

    let params = object(json!({
        "billerId": "c7e6e3a0-9f2b-4d1e-8a43-7b1f3f1d2e11",
        "amount": 10,
        "currency": "MDL",
        "clientIp": "127.0.0.1"
    }));
    let err = client.execute_oneclick(&params, "").await.unwrap_err();
    assert!(matches!(err, MaibError::Validation(ValidationError::InvalidToken)));
}

#[tokio::test]
async fn test_card_on_file_operations_over_http() {
    let server = MockServer::start().await;
    for endpoint in ["savecard-recurring", "savecard-oneclick", "execute-recurring", "execute-oneclick"] {
        Mock::given(method("POST"))
            .and(path(format!("/v1/{}", endpoint)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {"endpoint": endpoint},
                "ok": true
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server).await;
    let save = object(json!({"billerExpiry": "1230", "currency": "MDL", "clientIp": "127.0.0.1"}));
    let execute = object(json!({
        "billerId": "c7e6e3a0-9f2b-4d1e-8a43-7b1f3f1d2e11",
        "amount": 10,
        "currency": "MDL",
        "clientIp": "127.0.0.1"
    }));

    let result = client.save_recurring(&save, TOKEN).await.unwrap();
    assert_eq!(result["endpoint"], "savecard-recurring");
    let result = client.save_oneclick(&save, TOKEN).await.unwrap();
    assert_eq!(result["endpoint"], "savecard-oneclick");
    let result = client.execute_recurring(&execute, TOKEN).await.unwrap();
    assert_eq!(result["endpoint"], "execute-recurring");
    let result = client.execute_oneclick(&execute, TOKEN).await.unwrap();
    assert_eq!(result["endpoint"], "execute-oneclick");
}

#[tokio::test]
async fn test_transport_connection_failure() {
    // Nothing listens on port 9 of the loopback interface.
    let config = MaibConfig::new()
        .with_base_url("http://127.0.0.1:9/v1")
        .unwrap()
        .with_timeout(Duration::from_secs(2));
    let client = MaibClient::new(config);

    let err = client.pay_info("abc", TOKEN).await.unwrap_err();
    match err {
        MaibError::Transport { endpoint, .. } => assert_eq!(endpoint, "pay-info"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_http_transport_directly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/pay-info/abc"))
        .and(header("authorization", "Bearer t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
        .mount(&server)
        .await;

    let url = format!("{}/v1/pay-info/abc", server.uri()).parse().unwrap();
    let transport = HttpTransport::new();
    let value = transport
        .send(TransportRequest {
            method: Method::GET,
            url,
            endpoint: Operation::PayInfo.endpoint(),
            body: None,
            bearer_token: Some("t"),
            timeout: Duration::from_secs(5),
        })
        .await
        .unwrap();

    assert_eq!(value, json!({"ok": true, "result": {}}));
}

#[test]
fn test_envelope_round_trip() {
    let envelope: ResponseEnvelope =
        serde_json::from_value(json!({"ok": true, "result": {"foo": "bar"}})).unwrap();
    assert_eq!(handle_response(envelope, "pay").unwrap(), json!({"foo": "bar"}));

    let envelope: ResponseEnvelope = serde_json::from_value(json!({
        "ok": false,
        "errors": [
            {"errorCode": "E1", "errorMessage": "bad"},
            {"errorCode": "E2", "errorMessage": "worse"}
        ]
    }))
    .unwrap();
    let err = handle_response(envelope, "pay").unwrap_err();
    assert!(matches!(
        err,
        MaibError::Gateway { ref code, ref message, .. } if code == "E1" && message == "bad"
    ));
}

#[test]
fn test_callback_from_raw_body() {
    let secret = "8508706b-3454-4733-8295-56e617c4abcf";
    let result = object(json!({
        "payId": "f16a9006-128a-46bc-8e2a-77a6ee99df75",
        "orderId": "123",
        "status": "OK",
        "statusCode": "000",
        "statusMessage": "Approved",
        "threeDs": "AUTHENTICATED",
        "rrn": "331711380059",
        "approval": "327593",
        "cardNumber": "510218******1124",
        "amount": 10.25,
        "currency": "MDL",
        "billerId": null
    }));
    let signature = sign_result(&result, secret);

    let body = serde_json::to_vec(&json!({"result": result, "signature": signature})).unwrap();
    assert_ok!(verify_callback(&body, secret));
    assert!(verify_callback(&body, secret).unwrap());
    assert!(!verify_callback(&body, "wrong-key").unwrap());

    let unsigned = serde_json::to_vec(&json!({"result": {"status": "OK"}})).unwrap();
    assert_err!(verify_callback(&unsigned, secret));
}

#[test]
fn test_callback_key_order_independent() {
    let secret = "key";
    let a = object(json!({"status": "OK", "amount": 1, "payId": "p"}));
    let signature = sign_result(&a, secret);

    let mut reordered = serde_json::Map::new();
    reordered.insert("payId".into(), json!("p"));
    reordered.insert("amount".into(), json!(1));
    reordered.insert("status".into(), json!("OK"));

    let notification = CallbackNotification {
        result: Some(reordered),
        signature: Some(signature),
    };
    assert!(verify_signature(&notification, secret).unwrap());
}
