use crate::domain::payment::{Amount, PaymentPayload, ValidatedPayment};
use crate::error::ValidationError;

/// Checks the shape of a payment request before anything is sent to the gateway.
///
/// Checks run in a fixed order and stop at the first failure: payload,
/// token, credit card, amount, billing address, amount sign.
pub fn validate(payload: Option<PaymentPayload>) -> Result<ValidatedPayment, ValidationError> {
    let payload = payload.ok_or(ValidationError::MissingPayload)?;

    let token = payload
        .token
        .filter(|t| !t.is_empty())
        .ok_or(ValidationError::MissingToken)?;

    let credit_card = payload
        .credit_card
        .ok_or(ValidationError::MissingCreditCard)?;

    let amount = payload
        .amount
        .filter(|a| !a.is_zero())
        .ok_or(ValidationError::MissingAmount)?;

    if !credit_card.is_valid() {
        return Err(ValidationError::InvalidCreditCard);
    }

    Ok(ValidatedPayment {
        token,
        amount: Amount::new(amount)?,
        credit_card,
    })
}
