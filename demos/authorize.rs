//! Authorize and then void a card against the Payeezy sandbox
//!
//! Expects PAYEEZY_API_KEY, PAYEEZY_API_SECRET and PAYEEZY_TOKEN to be set.

use payeezy::{ClientConfig, Credentials, Environment, PayeezyClient, TransactionFields};
use rust_decimal::Decimal;
use std::env;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let credentials = Credentials::new(
        env::var("PAYEEZY_API_KEY")?,
        env::var("PAYEEZY_API_SECRET")?,
        env::var("PAYEEZY_TOKEN")?,
    );
    let client = PayeezyClient::new(ClientConfig::new(credentials, Environment::Sandbox))?;

    let amount = Decimal::new(1000, 2);
    let response = client
        .authorize(
            TransactionFields::new()
                .amount(amount)
                .currency_code("USD")
                .card_type("visa")
                .cardholder_name("Jane Doe")
                .card_number("4012000033330026")
                .card_expiry("1230")
                .card_cvv("123"),
        )
        .await?
        .error_for_status()?;

    println!("Authorize: {} {}", response.status, response.body);

    let authorized: serde_json::Value = response.json()?;
    let (Some(transaction_id), Some(transaction_tag)) = (
        authorized["transaction_id"].as_str(),
        authorized["transaction_tag"].as_str(),
    ) else {
        println!("Gateway did not return a transaction id and tag");
        return Ok(());
    };

    let response = client
        .void(
            TransactionFields::new()
                .amount(amount)
                .currency_code("USD")
                .transaction_id(transaction_id)
                .transaction_tag(transaction_tag),
        )
        .await?;

    println!("Void: {} {}", response.status, response.body);
    Ok(())
}
