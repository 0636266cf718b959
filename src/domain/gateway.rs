//! Request and response shapes exchanged with the payment gateway.

use super::address::BillingAddress;
use super::card::CreditCard;
use super::payment::Amount;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PAYMENT_METHODS_ENDPOINT: &str = "payment_methods/credit_cards";
pub const THREE_D_SECURE_VERSION: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientParams {
    pub authorization: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentMethodData {
    pub credit_card: CreditCard,
}

/// A raw request to the gateway client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayRequest {
    pub endpoint: String,
    pub method: HttpMethod,
    pub data: CreatePaymentMethodData,
}

/// A card the gateway tokenized, referenced from then on by its nonce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizedCard {
    pub nonce: String,
    pub bin: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodResponse {
    #[serde(default)]
    pub credit_cards: Vec<TokenizedCard>,
    /// The gateway response as received, kept for diagnostics.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw: Value,
}

impl PaymentMethodResponse {
    pub fn first_card(&self) -> Option<&TokenizedCard> {
        self.credit_cards.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreeDSecureParams {
    pub version: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCardRequest {
    pub amount: Amount,
    pub nonce: String,
    pub bin: String,
    pub billing_address: Option<BillingAddress>,
}

/// Outcome of a 3-D Secure card verification.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCardResponse {
    #[serde(default)]
    pub liability_shifted: bool,
    #[serde(default)]
    pub three_d_secure_info: Value,
    #[serde(default)]
    pub nonce: String,
    #[serde(default)]
    pub bin: String,
}
