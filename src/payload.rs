//! Payload builders for transaction and token requests
//!
//! Builders validate caller input fail-fast: the first missing or invalid
//! field is reported and nothing is sent.

use crate::types::*;
use crate::{PayeezyError, Result};
use std::fmt::Display;

/// Caller-supplied fields for a transaction.
///
/// Every field is optional here; [`build_transaction`] decides which ones the
/// transaction type requires. Setters that take `impl Display` coerce numbers
/// to their string form, so `rust_decimal::Decimal` amounts keep their scale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFields {
    pub amount: Option<String>,
    pub currency_code: Option<String>,
    pub transaction_type: Option<String>,
    pub method: Option<String>,
    pub card_type: Option<String>,
    pub cardholder_name: Option<String>,
    pub card_number: Option<String>,
    pub card_expiry: Option<String>,
    pub card_cvv: Option<String>,
    pub description: Option<String>,
    pub transaction_tag: Option<String>,
    pub transaction_id: Option<String>,
}

impl TransactionFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amount(mut self, amount: impl Display) -> Self {
        self.amount = Some(amount.to_string());
        self
    }

    pub fn currency_code(mut self, currency_code: impl Into<String>) -> Self {
        self.currency_code = Some(currency_code.into());
        self
    }

    pub fn transaction_type(mut self, transaction_type: impl Display) -> Self {
        self.transaction_type = Some(transaction_type.to_string());
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn card_type(mut self, card_type: impl Into<String>) -> Self {
        self.card_type = Some(card_type.into());
        self
    }

    pub fn cardholder_name(mut self, cardholder_name: impl Into<String>) -> Self {
        self.cardholder_name = Some(cardholder_name.into());
        self
    }

    pub fn card_number(mut self, card_number: impl Display) -> Self {
        self.card_number = Some(card_number.to_string());
        self
    }

    /// Expiry in MMYY form
    pub fn card_expiry(mut self, card_expiry: impl Display) -> Self {
        self.card_expiry = Some(card_expiry.to_string());
        self
    }

    pub fn card_cvv(mut self, card_cvv: impl Display) -> Self {
        self.card_cvv = Some(card_cvv.to_string());
        self
    }

    /// Merchant reference; defaults to a summary of type and amount
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn transaction_tag(mut self, transaction_tag: impl Display) -> Self {
        self.transaction_tag = Some(transaction_tag.to_string());
        self
    }

    pub fn transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }
}

/// A validated transaction ready to be serialized and signed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltTransaction {
    pub request: TransactionRequest,
    /// Id of the referenced transaction; becomes the URL path segment for
    /// capture, void and refund. Always `None` for authorize and purchase.
    pub transaction_id: Option<String>,
}

impl BuiltTransaction {
    pub fn transaction_type(&self) -> Option<TransactionType> {
        self.request.transaction_type()
    }
}

/// Validate `fields` and assemble the request body for its transaction type.
pub fn build_transaction(fields: &TransactionFields) -> Result<BuiltTransaction> {
    let amount = required(&fields.amount, "amount")?;
    let currency_code = required(&fields.currency_code, "currency_code")?;
    let transaction_type: TransactionType =
        required(&fields.transaction_type, "transaction_type")?.parse()?;
    let currency_code = normalize_currency(currency_code)?;

    let merchant_ref = fields
        .description
        .clone()
        .unwrap_or_else(|| format!("{} transaction for amount: {}", transaction_type, amount));
    let method = required(&fields.method, "method")?.to_string();

    if transaction_type.is_primary() {
        let card_number = required(&fields.card_number, "card_number")?.to_string();
        let cardholder_name = fields
            .cardholder_name
            .clone()
            .unwrap_or_else(|| DEFAULT_CARDHOLDER_NAME.to_string());
        let cvv = validate_cvv(required(&fields.card_cvv, "card_cvv")?, "card_cvv")?;
        let exp_date = validate_expiry(required(&fields.card_expiry, "card_expiry")?, "card_expiry")?;
        let card_type = fields
            .card_type
            .as_deref()
            .map(str::parse::<CardType>)
            .transpose()?;

        let request = CardTransaction {
            merchant_ref,
            transaction_type,
            method,
            amount: amount.to_string(),
            currency_code,
            credit_card: CreditCard {
                card_type,
                cardholder_name,
                card_number,
                exp_date,
                cvv,
            },
        };

        Ok(BuiltTransaction {
            request: request.into(),
            transaction_id: None,
        })
    } else {
        let transaction_id = required(&fields.transaction_id, "transaction_id")?;
        if transaction_id.trim().is_empty() {
            return Err(PayeezyError::validation(
                "transaction_id",
                "cannot be empty",
            ));
        }
        let transaction_tag = required(&fields.transaction_tag, "transaction_tag")?.to_string();

        let request = ReferenceTransaction {
            merchant_ref,
            transaction_tag,
            transaction_type,
            method,
            amount: amount.to_string(),
            currency_code,
        };

        Ok(BuiltTransaction {
            request: request.into(),
            transaction_id: Some(transaction_id.to_string()),
        })
    }
}

/// Caller-supplied fields for a tokenization request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenFields {
    pub ta_token: Option<String>,
    pub callback: Option<String>,
    pub token_type: Option<String>,
    pub card_type: Option<String>,
    pub cardholder_name: Option<String>,
    pub card_number: Option<String>,
    pub exp_date: Option<String>,
    pub cvv: Option<String>,
    pub js_security_key: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
    pub phone_type: Option<String>,
    pub phone_number: Option<String>,
    pub street: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl TokenFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transarmor token; the sandbox accepts `NOIW`/`123`
    pub fn ta_token(mut self, ta_token: impl Into<String>) -> Self {
        self.ta_token = Some(ta_token.into());
        self
    }

    pub fn callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = Some(callback.into());
        self
    }

    pub fn token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }

    pub fn card_type(mut self, card_type: impl Into<String>) -> Self {
        self.card_type = Some(card_type.into());
        self
    }

    pub fn cardholder_name(mut self, cardholder_name: impl Into<String>) -> Self {
        self.cardholder_name = Some(cardholder_name.into());
        self
    }

    pub fn card_number(mut self, card_number: impl Display) -> Self {
        self.card_number = Some(card_number.to_string());
        self
    }

    pub fn exp_date(mut self, exp_date: impl Display) -> Self {
        self.exp_date = Some(exp_date.to_string());
        self
    }

    pub fn cvv(mut self, cvv: impl Display) -> Self {
        self.cvv = Some(cvv.to_string());
        self
    }

    pub fn js_security_key(mut self, js_security_key: impl Into<String>) -> Self {
        self.js_security_key = Some(js_security_key.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone_type(mut self, phone_type: impl Into<String>) -> Self {
        self.phone_type = Some(phone_type.into());
        self
    }

    pub fn phone_number(mut self, phone_number: impl Display) -> Self {
        self.phone_number = Some(phone_number.to_string());
        self
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn zip_code(mut self, zip_code: impl Display) -> Self {
        self.zip_code = Some(zip_code.to_string());
        self
    }
}

/// Validate `fields` and assemble a tokenization request body.
pub fn build_token_payload(fields: &TokenFields) -> Result<TokenRequest> {
    let ta_token = required(&fields.ta_token, "ta_token")?.to_string();
    let callback = fields
        .callback
        .clone()
        .unwrap_or_else(|| DEFAULT_CALLBACK.to_string());
    let token_type = fields
        .token_type
        .clone()
        .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string());
    let card_type: CardType = required(&fields.card_type, "card_type")?.parse()?;
    let cardholder_name = required(&fields.cardholder_name, "cardholder_name")?.to_string();
    let js_security_key = required(&fields.js_security_key, "js_security_key")?.to_string();
    let card_number = required(&fields.card_number, "card_number")?.to_string();
    let exp_date = validate_expiry(required(&fields.exp_date, "exp_date")?, "exp_date")?;
    let cvv = validate_cvv(required(&fields.cvv, "cvv")?, "cvv")?;

    let billing_address = BillingAddress {
        city: fields.city.clone(),
        country: fields.country.clone(),
        email: fields.email.clone(),
        phone: Phone {
            phone_type: fields.phone_type.clone(),
            number: fields.phone_number.clone(),
        },
        street: fields.street.clone(),
        state: fields.state.clone(),
        zip: fields.zip_code.clone(),
    };

    Ok(TokenRequest {
        token_type,
        js_security_key,
        ta_token,
        callback,
        credit_card: CreditCard {
            card_type: Some(card_type),
            cardholder_name,
            card_number,
            exp_date,
            cvv,
        },
        billing_address,
    })
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| PayeezyError::missing(field))
}

fn normalize_currency(currency_code: &str) -> Result<String> {
    let upper = currency_code.to_uppercase();
    if ALLOWED_CURRENCIES.contains(&upper.as_str()) {
        Ok(upper)
    } else {
        Err(PayeezyError::validation(
            "currency_code",
            format!("currency code `{}` is not valid", currency_code),
        ))
    }
}

fn validate_cvv(cvv: &str, field: &str) -> Result<String> {
    if (3..=4).contains(&cvv.len()) && cvv.bytes().all(|b| b.is_ascii_digit()) {
        Ok(cvv.to_string())
    } else {
        Err(PayeezyError::validation(field, "must be 3 or 4 digits"))
    }
}

fn validate_expiry(expiry: &str, field: &str) -> Result<String> {
    let month = expiry
        .get(..2)
        .filter(|_| expiry.len() == 4 && expiry.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|m| m.parse::<u8>().ok());
    match month {
        Some(1..=12) => Ok(expiry.to_string()),
        _ => Err(PayeezyError::validation(field, "must be in MMYY format")),
    }
}
