//! Error message and classification tests

use payeezy::{build_transaction, ClientConfig, Credentials, Environment, PayeezyError, TransactionFields};

#[test]
fn test_validation_error_names_field() {
    let error = PayeezyError::validation("currency_code", "currency code `EUR` is not valid");

    let error_msg = error.to_string();
    assert!(
        error_msg.contains("currency_code"),
        "Error message MUST contain the field name - actual: {}",
        error_msg
    );
    assert!(
        error_msg.contains("EUR"),
        "Error message MUST contain the reason - actual: {}",
        error_msg
    );
    assert_eq!(error.field(), Some("currency_code"));
    assert!(error.is_validation());
}

#[test]
fn test_missing_field_error() {
    let error = build_transaction(&TransactionFields::new()).unwrap_err();

    let error_msg = error.to_string();
    assert!(
        error_msg.contains("amount") && error_msg.contains("cannot be None"),
        "Missing field message MUST name the field - actual: {}",
        error_msg
    );
}

#[test]
fn test_gateway_error_message() {
    let error = PayeezyError::gateway(400, r#"{"Error":"bad request"}"#);

    let error_msg = error.to_string();
    assert!(
        error_msg.contains("400"),
        "Gateway error MUST contain the status - actual: {}",
        error_msg
    );
    assert!(
        error_msg.contains("bad request"),
        "Gateway error MUST contain the body - actual: {}",
        error_msg
    );
    assert_eq!(error.field(), None);
    assert!(!error.is_validation());
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let error: PayeezyError = json_error.into();
    assert!(matches!(error, PayeezyError::Json(_)));
    assert!(error.to_string().starts_with("JSON error"));
}

#[test]
fn test_config_error_from_bad_url() {
    let config = ClientConfig::new(Credentials::new("key", "secret", "token"), Environment::Live)
        .with_token_url("mailto:someone@example.com");

    let error = config.validate().unwrap_err();
    assert!(
        error.to_string().contains("token_url"),
        "Config error MUST name the setting - actual: {}",
        error
    );
}

#[test]
fn test_signing_and_header_errors_display() {
    assert_eq!(
        PayeezyError::signing("bad key").to_string(),
        "Signing error: bad key"
    );
    assert_eq!(
        PayeezyError::invalid_header("apikey", "invalid character").to_string(),
        "Invalid header `apikey`: invalid character"
    );
}
