#![allow(dead_code)]

use rust_decimal_macros::dec;
use tdspay::domain::address::BillingAddress;
use tdspay::domain::card::CreditCard;
use tdspay::domain::payment::PaymentPayload;

pub fn billing_address() -> BillingAddress {
    BillingAddress::build(
        "Jane",
        "Doe",
        "+1 (555) 010-0000",
        "1 Main St",
        "Springfield",
        "il",
        "62701",
        "us",
    )
}

pub fn credit_card() -> CreditCard {
    CreditCard::build("4111111111111111", "12", "2030", "123", billing_address())
}

pub fn valid_payload() -> PaymentPayload {
    PaymentPayload {
        token: Some("sandbox_token".to_string()),
        amount: Some(dec!(49.99)),
        credit_card: Some(credit_card()),
    }
}
