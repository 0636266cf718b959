use crate::domain::address::BillingAddress;
use crate::domain::card::CreditCard;
use crate::domain::payment::PaymentPayload;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardFields {
    pub number: String,
    pub expiration_month: String,
    pub expiration_year: String,
    pub cvv: String,
}

/// Billing fields exactly as typed into the checkout form.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillingFields {
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
}

/// A checkout form as posted by the storefront.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
    pub token: Option<String>,
    pub amount: Option<Decimal>,
    pub card: Option<CardFields>,
    pub billing: Option<BillingFields>,
}

impl CheckoutForm {
    /// Builds the payment payload, normalizing the billing fields on the way.
    ///
    /// The card is left without a billing address when the form has none, so
    /// validation can report it.
    pub fn into_payload(self) -> PaymentPayload {
        let billing = self.billing;
        let credit_card = self.card.map(|c| {
            let mut card = CreditCard::new(c.number, c.expiration_month, c.expiration_year, c.cvv);
            if let Some(b) = &billing {
                card.set_billing_address(BillingAddress::build(
                    &b.name,
                    &b.surname,
                    &b.phone,
                    &b.street,
                    &b.city,
                    &b.region,
                    &b.postal_code,
                    &b.country,
                ));
            }
            card
        });

        PaymentPayload {
            token: self.token,
            amount: self.amount,
            credit_card,
        }
    }
}

/// Reads a checkout form from any `Read` source (e.g. File, Stdin).
pub struct CheckoutReader<R: Read> {
    source: R,
}

impl<R: Read> CheckoutReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn read_form(self) -> Result<CheckoutForm> {
        Ok(serde_json::from_reader(self.source)?)
    }

    pub fn read_payload(self) -> Result<PaymentPayload> {
        Ok(self.read_form()?.into_payload())
    }
}
