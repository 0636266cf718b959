use super::address::BillingAddress;
use serde::{Deserialize, Serialize};

/// Raw card details as collected at checkout.
///
/// A card is only usable once a billing address has been attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCard {
    pub number: String,
    pub expiration_month: String,
    pub expiration_year: String,
    pub cvv: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<BillingAddress>,
}

impl CreditCard {
    pub fn new(
        number: impl Into<String>,
        expiration_month: impl Into<String>,
        expiration_year: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            expiration_month: expiration_month.into(),
            expiration_year: expiration_year.into(),
            cvv: cvv.into(),
            billing_address: None,
        }
    }

    /// Builds a card with its billing address already attached.
    pub fn build(
        number: impl Into<String>,
        expiration_month: impl Into<String>,
        expiration_year: impl Into<String>,
        cvv: impl Into<String>,
        billing_address: BillingAddress,
    ) -> Self {
        let mut card = Self::new(number, expiration_month, expiration_year, cvv);
        card.set_billing_address(billing_address);
        card
    }

    pub fn set_billing_address(&mut self, billing_address: BillingAddress) {
        self.billing_address = Some(billing_address);
    }

    pub fn is_valid(&self) -> bool {
        self.billing_address.is_some()
    }

    /// A copy of this card carrying only the street part of its address.
    pub fn with_street_only_address(&self) -> Self {
        let street = self
            .billing_address
            .as_ref()
            .and_then(|a| a.street_address.as_deref())
            .unwrap_or_default();
        let mut card = self.clone();
        card.set_billing_address(BillingAddress::street_only(street));
        card
    }
}
