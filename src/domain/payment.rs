use super::card::CreditCard;
use crate::error::ValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a positive amount to be charged.
///
/// Wraps `rust_decimal::Decimal` so that amounts are never zero or negative
/// once they leave validation. Serialized as a decimal string.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(ValidationError::InvalidAmount)
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// A payment request as handed over by the checkout, before validation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub credit_card: Option<CreditCard>,
}

/// A payment request that passed pre-flight validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedPayment {
    pub token: String,
    pub amount: Amount,
    pub credit_card: CreditCard,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(10.00)).is_ok());
        assert_eq!(Amount::new(dec!(0)), Err(ValidationError::InvalidAmount));
        assert_eq!(Amount::new(dec!(-1.5)), Err(ValidationError::InvalidAmount));
    }

    #[test]
    fn test_amount_serializes_as_string() {
        let amount = Amount::new(dec!(10.50)).unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), r#""10.50""#);
    }

    #[test]
    fn test_payload_accepts_string_or_number_amount() {
        let from_str: PaymentPayload =
            serde_json::from_str(r#"{"token": "t", "amount": "12.34"}"#).unwrap();
        let from_num: PaymentPayload =
            serde_json::from_str(r#"{"token": "t", "amount": 12}"#).unwrap();
        assert_eq!(from_str.amount, Some(dec!(12.34)));
        assert_eq!(from_num.amount, Some(dec!(12)));
        assert!(from_num.credit_card.is_none());
    }
}
