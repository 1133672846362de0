//! Wire types for Payeezy transaction and token requests

use crate::{PayeezyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currency codes the gateway accepts
pub const ALLOWED_CURRENCIES: &[&str] = &["USD"];

/// Cardholder name sent when the caller does not provide one
pub const DEFAULT_CARDHOLDER_NAME: &str = "Not Provided";

/// Payment method sent by the high-level client calls
pub const DEFAULT_METHOD: &str = "credit_card";

/// Token type sent when the caller does not provide one
pub const DEFAULT_TOKEN_TYPE: &str = "FDToken";

/// Callback sent when the caller does not provide one
pub const DEFAULT_CALLBACK: &str = "notProvided";

/// Transaction kinds supported by the transactions endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Authorize,
    Purchase,
    Capture,
    Void,
    Refund,
}

impl TransactionType {
    /// All transaction types, in gateway documentation order
    pub const ALL: [TransactionType; 5] = [
        TransactionType::Authorize,
        TransactionType::Purchase,
        TransactionType::Capture,
        TransactionType::Void,
        TransactionType::Refund,
    ];

    /// Wire name of the transaction type
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Authorize => "authorize",
            TransactionType::Purchase => "purchase",
            TransactionType::Capture => "capture",
            TransactionType::Void => "void",
            TransactionType::Refund => "refund",
        }
    }

    /// Primary transactions carry card data and go to the base URL.
    /// Everything else references a prior transaction by id and tag.
    pub fn is_primary(&self) -> bool {
        matches!(self, TransactionType::Authorize | TransactionType::Purchase)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = PayeezyError;

    fn from_str(s: &str) -> Result<Self> {
        TransactionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                PayeezyError::validation(
                    "transaction_type",
                    format!(
                        "`{}` is not one of authorize, purchase, capture, void, refund",
                        s
                    ),
                )
            })
    }
}

/// Card brands accepted by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    #[serde(rename = "american express")]
    AmericanExpress,
    #[serde(rename = "visa")]
    Visa,
    #[serde(rename = "mastercard")]
    Mastercard,
    #[serde(rename = "jcb")]
    Jcb,
    #[serde(rename = "diners club")]
    DinersClub,
    #[serde(rename = "discover")]
    Discover,
}

impl CardType {
    pub const ALL: [CardType; 6] = [
        CardType::AmericanExpress,
        CardType::Visa,
        CardType::Mastercard,
        CardType::Jcb,
        CardType::DinersClub,
        CardType::Discover,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::AmericanExpress => "american express",
            CardType::Visa => "visa",
            CardType::Mastercard => "mastercard",
            CardType::Jcb => "jcb",
            CardType::DinersClub => "diners club",
            CardType::Discover => "discover",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardType {
    type Err = PayeezyError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        CardType::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                let allowed: Vec<&str> = CardType::ALL.iter().map(CardType::as_str).collect();
                PayeezyError::validation(
                    "card_type",
                    format!("`{}` is not allowed, expected one of {:?}", s, allowed),
                )
            })
    }
}

/// Card block nested under `credit_card`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCard {
    /// Card brand; `null` on the wire when not supplied
    #[serde(rename = "type")]
    pub card_type: Option<CardType>,
    pub cardholder_name: String,
    pub card_number: String,
    /// Expiry in MMYY form
    pub exp_date: String,
    pub cvv: String,
}

impl fmt::Debug for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreditCard")
            .field("card_type", &self.card_type)
            .field("cardholder_name", &self.cardholder_name)
            .field("card_number", &mask_card_number(&self.card_number))
            .field("exp_date", &self.exp_date)
            .field("cvv", &"***")
            .finish()
    }
}

fn mask_card_number(number: &str) -> String {
    let visible = number.len().saturating_sub(4);
    match number.get(visible..) {
        Some(last4) if visible > 0 => format!("{}{}", "*".repeat(visible), last4),
        _ => "*".repeat(number.len()),
    }
}

/// Authorize or purchase request carrying card data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTransaction {
    pub merchant_ref: String,
    pub transaction_type: TransactionType,
    pub method: String,
    pub amount: String,
    pub currency_code: String,
    pub credit_card: CreditCard,
}

/// Capture, void or refund request referencing a prior transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTransaction {
    pub merchant_ref: String,
    pub transaction_tag: String,
    pub transaction_type: TransactionType,
    pub method: String,
    pub amount: String,
    pub currency_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub phone_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

/// Billing address for token requests.
///
/// Absent fields are left out of the JSON entirely; `phone` is always
/// emitted, as `{}` when neither part was supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Phone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(rename = "state_providence", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "zip_postal_code", skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

/// Tokenization request for the security tokens endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
    #[serde(rename = "type")]
    pub token_type: String,
    pub js_security_key: String,
    pub ta_token: String,
    pub callback: String,
    pub credit_card: CreditCard,
    pub billing_address: BillingAddress,
}

/// Any request body the client can send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TransactionRequest {
    Card(CardTransaction),
    Reference(ReferenceTransaction),
    Token(TokenRequest),
}

impl TransactionRequest {
    /// Transaction type, `None` for token requests
    pub fn transaction_type(&self) -> Option<TransactionType> {
        match self {
            TransactionRequest::Card(t) => Some(t.transaction_type),
            TransactionRequest::Reference(t) => Some(t.transaction_type),
            TransactionRequest::Token(_) => None,
        }
    }

    /// Serialize to the exact body string that gets signed and sent
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(PayeezyError::from)
    }
}

impl From<CardTransaction> for TransactionRequest {
    fn from(value: CardTransaction) -> Self {
        TransactionRequest::Card(value)
    }
}

impl From<ReferenceTransaction> for TransactionRequest {
    fn from(value: ReferenceTransaction) -> Self {
        TransactionRequest::Reference(value)
    }
}

impl From<TokenRequest> for TransactionRequest {
    fn from(value: TokenRequest) -> Self {
        TransactionRequest::Token(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transaction_type_round_trips_wire_names() {
        for t in TransactionType::ALL {
            assert_eq!(t.as_str().parse::<TransactionType>().unwrap(), t);
        }
        assert!(TransactionType::Authorize.is_primary());
        assert!(TransactionType::Purchase.is_primary());
        assert!(!TransactionType::Refund.is_primary());
    }

    #[test]
    fn test_transaction_type_rejects_unknown() {
        let err = "settle".parse::<TransactionType>().unwrap_err();
        assert_eq!(err.field(), Some("transaction_type"));
        assert!("Authorize".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_card_type_is_case_insensitive() {
        assert_eq!("VISA".parse::<CardType>().unwrap(), CardType::Visa);
        assert_eq!(
            "American Express".parse::<CardType>().unwrap(),
            CardType::AmericanExpress
        );
        let err = "maestro".parse::<CardType>().unwrap_err();
        assert_eq!(err.field(), Some("card_type"));
    }

    #[test]
    fn test_credit_card_serializes_missing_type_as_null() {
        let card = CreditCard {
            card_type: None,
            cardholder_name: "Jane Doe".to_string(),
            card_number: "4012000033330026".to_string(),
            exp_date: "1225".to_string(),
            cvv: "123".to_string(),
        };
        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["type"], serde_json::Value::Null);
        assert_eq!(value["exp_date"], "1225");
    }

    #[test]
    fn test_credit_card_debug_masks_sensitive_fields() {
        let card = CreditCard {
            card_type: Some(CardType::Visa),
            cardholder_name: "Jane Doe".to_string(),
            card_number: "4012000033330026".to_string(),
            exp_date: "1225".to_string(),
            cvv: "123".to_string(),
        };
        let debug = format!("{:?}", card);
        assert!(!debug.contains("4012000033330026"));
        assert!(debug.contains("************0026"));
        assert!(!debug.contains("\"123\""));
    }

    #[test]
    fn test_empty_billing_address_keeps_phone() {
        let value = serde_json::to_value(BillingAddress::default()).unwrap();
        assert_eq!(value, json!({ "phone": {} }));
    }

    #[test]
    fn test_billing_address_uses_gateway_key_names() {
        let address = BillingAddress {
            state: Some("DE".to_string()),
            zip: Some("19801".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(address).unwrap();
        assert_eq!(value["state_providence"], "DE");
        assert_eq!(value["zip_postal_code"], "19801");
        assert!(value.get("state").is_none());
    }

    #[test]
    fn test_untagged_request_serializes_inner_object() {
        let request = TransactionRequest::Reference(ReferenceTransaction {
            merchant_ref: "ref".to_string(),
            transaction_tag: "2264726".to_string(),
            transaction_type: TransactionType::Capture,
            method: "credit_card".to_string(),
            amount: "10.00".to_string(),
            currency_code: "USD".to_string(),
        });
        let value: serde_json::Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();
        assert_eq!(value["transaction_type"], "capture");
        assert_eq!(value["transaction_tag"], "2264726");
        assert!(value.get("Reference").is_none());
        assert_eq!(request.transaction_type(), Some(TransactionType::Capture));
    }
}
