//! Integration tests for the payeezy client against a mock gateway

use mockito::{Matcher, Mock, Server, ServerGuard};
use payeezy::{
    ClientConfig, Credentials, Environment, PayeezyClient, PayeezyError, TokenFields,
    TransactionFields,
};
use serde_json::json;

fn client_for(server: &ServerGuard) -> PayeezyClient {
    let config = ClientConfig::new(
        Credentials::new("y6pWAJNyJyjGv66IsVuWnklkKUPFbb0a", "secret", "fdoa-token"),
        Environment::Sandbox,
    )
    .with_transactions_url(format!("{}/v1/transactions", server.url()))
    .with_token_url(format!("{}/v1/securitytokens", server.url()));
    PayeezyClient::new(config).unwrap()
}

fn signed(mock: Mock) -> Mock {
    mock.match_header("content-type", "application/json")
        .match_header("apikey", "y6pWAJNyJyjGv66IsVuWnklkKUPFbb0a")
        .match_header("token", "fdoa-token")
        .match_header("nonce", Matcher::Regex(r"^\d+$".to_string()))
        .match_header("timestamp", Matcher::Regex(r"^\d{13}$".to_string()))
        .match_header(
            "authorization",
            Matcher::Regex(r"^[A-Za-z0-9+/]{86}==$".to_string()),
        )
        .match_header("user-agent", Matcher::Regex("^payeezy-rust/".to_string()))
}

fn card_fields() -> TransactionFields {
    TransactionFields::new()
        .amount("10.00")
        .currency_code("usd")
        .card_type("visa")
        .cardholder_name("Jane Doe")
        .card_number("4012000033330026")
        .card_expiry("1225")
        .card_cvv("123")
}

#[tokio::test]
async fn test_authorize_sends_signed_request() {
    let mut server = Server::new_async().await;
    let m = signed(server.mock("POST", "/v1/transactions"))
        .match_body(Matcher::PartialJson(json!({
            "transaction_type": "authorize",
            "method": "credit_card",
            "amount": "10.00",
            "currency_code": "USD",
            "credit_card": {
                "type": "visa",
                "cardholder_name": "Jane Doe",
                "card_number": "4012000033330026",
                "exp_date": "1225",
                "cvv": "123"
            }
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"transaction_status":"approved","transaction_id":"ET1","transaction_tag":"99"}"#)
        .create_async()
        .await;

    let response = client_for(&server).authorize(card_fields()).await.unwrap();

    m.assert_async().await;
    assert_eq!(response.status, 201);
    assert!(response.is_success());
    assert_eq!(
        response.body,
        r#"{"transaction_status":"approved","transaction_id":"ET1","transaction_tag":"99"}"#
    );
}

#[tokio::test]
async fn test_purchase_uses_base_url() {
    let mut server = Server::new_async().await;
    let m = signed(server.mock("POST", "/v1/transactions"))
        .match_body(Matcher::PartialJson(json!({ "transaction_type": "purchase" })))
        .with_status(201)
        .with_body("{}")
        .create_async()
        .await;

    client_for(&server).purchase(card_fields()).await.unwrap();
    m.assert_async().await;
}

#[tokio::test]
async fn test_capture_void_refund_use_transaction_path() {
    let mut server = Server::new_async().await;
    let m = signed(server.mock("POST", "/v1/transactions/DEF456"))
        .match_body(Matcher::PartialJson(json!({
            "transaction_tag": "2264726",
            "amount": "10.00",
            "currency_code": "USD"
        })))
        .with_status(201)
        .with_body("{}")
        .expect(3)
        .create_async()
        .await;

    let client = client_for(&server);
    let fields = TransactionFields::new()
        .amount("10.00")
        .currency_code("USD")
        .transaction_tag(2264726)
        .transaction_id("DEF456");

    client.capture(fields.clone()).await.unwrap();
    client.void(fields.clone()).await.unwrap();
    client.refund(fields).await.unwrap();

    m.assert_async().await;
}

#[tokio::test]
async fn test_get_token_sends_signed_request() {
    let mut server = Server::new_async().await;
    let m = signed(server.mock("POST", "/v1/securitytokens"))
        .match_body(Matcher::PartialJson(json!({
            "type": "FDToken",
            "ta_token": "NOIW",
            "js_security_key": "js-key",
            "billing_address": { "phone": {}, "city": "Austin" }
        })))
        .with_status(201)
        .with_body(r#"{"status":"success"}"#)
        .create_async()
        .await;

    let fields = TokenFields::new()
        .ta_token("NOIW")
        .card_type("visa")
        .cardholder_name("Jane Doe")
        .card_number("4012000033330026")
        .exp_date("1225")
        .cvv("123")
        .js_security_key("js-key")
        .city("Austin");
    let response = client_for(&server).get_token(fields).await.unwrap();

    m.assert_async().await;
    assert_eq!(response.body, r#"{"status":"success"}"#);
}

#[tokio::test]
async fn test_gateway_rejection_is_returned_unmodified() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/transactions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":"403","message":"HMAC validation Failure"}"#)
        .create_async()
        .await;

    let response = client_for(&server).authorize(card_fields()).await.unwrap();
    assert_eq!(response.status, 401);
    assert!(!response.is_success());
    assert_eq!(response.body, r#"{"code":"403","message":"HMAC validation Failure"}"#);

    match response.error_for_status() {
        Err(PayeezyError::Gateway { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("HMAC validation Failure"));
        }
        other => panic!("expected gateway error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_validation_failure_makes_no_request() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .authorize(card_fields().currency_code("EUR"))
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("currency_code"));

    let err = client
        .purchase(card_fields().card_type("maestro"))
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("card_type"));

    let err = client.get_token(TokenFields::new()).await.unwrap_err();
    assert_eq!(err.field(), Some("ta_token"));

    m.assert_async().await;
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let config = ClientConfig::new(Credentials::new("key", "secret", "token"), Environment::Sandbox)
        .with_transactions_url("http://127.0.0.1:1/v1/transactions");
    let client = PayeezyClient::new(config).unwrap();

    let err = client.authorize(card_fields()).await.unwrap_err();
    assert!(matches!(err, PayeezyError::Http(_)));
    assert!(!err.is_validation());
}
