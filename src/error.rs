use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// The remote step of the workflow a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    #[serde(rename = "payment")]
    Payment,
    #[serde(rename = "requestPayment")]
    RequestPayment,
    #[serde(rename = "createTDSPayment")]
    CreateTdsPayment,
    #[serde(rename = "verifyTDSCard")]
    VerifyTdsCard,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Payment => "payment",
            Step::RequestPayment => "requestPayment",
            Step::CreateTdsPayment => "createTDSPayment",
            Step::VerifyTdsCard => "verifyTDSCard",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre-flight payload violations. Raised before any gateway call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Payload is required")]
    MissingPayload,
    #[error("Token [token] is required")]
    MissingToken,
    #[error("Credit Card [creditCard] is required")]
    MissingCreditCard,
    #[error("Amount [amount] is required")]
    MissingAmount,
    #[error("Credit card [creditCard] invalid: billing address [billingAddress] is required")]
    InvalidCreditCard,
    #[error("Amount [amount] must be positive")]
    InvalidAmount,
}

/// Failure reported by the gateway collaborator itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Gateway request failed: {0}")]
    Request(String),
    #[error("Gateway response did not include a tokenized credit card")]
    MissingCreditCard,
    #[error("3-D Secure lookup was abandoned before verification resumed")]
    LookupAbandoned,
}

/// A gateway failure enriched with the step that produced it and the
/// data that step was working with.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{step} failed: {source}")]
pub struct StageError {
    #[source]
    pub source: GatewayError,
    pub step: Step,
    /// Snapshot of the payload at failure time. Always `None` for `verifyTDSCard`.
    pub payload: Option<Value>,
    pub request_params: Value,
}

/// Verification went through but the issuer did not take liability.
#[derive(Error, Debug, Clone, PartialEq)]
#[error(
    "3D Secure authentication failed: liabilityShifted = {liability_shifted}; threeDSecureInfo: {three_d_secure_info}; "
)]
pub struct LiabilityNotShiftedError {
    pub liability_shifted: bool,
    pub three_d_secure_info: Value,
}

/// Everything the terminal callback can report as an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaymentFailure {
    #[error(transparent)]
    Stage(#[from] StageError),
    #[error(transparent)]
    LiabilityNotShifted(#[from] LiabilityNotShiftedError),
}

impl PaymentFailure {
    /// The step a transport failure came from; `None` for a liability rejection.
    pub fn step(&self) -> Option<Step> {
        match self {
            PaymentFailure::Stage(e) => Some(e.step),
            PaymentFailure::LiabilityNotShifted(_) => None,
        }
    }

    pub fn is_liability_rejection(&self) -> bool {
        matches!(self, PaymentFailure::LiabilityNotShifted(_))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationError),
    #[error("Payment failed: {0}")]
    PaymentFailed(#[from] PaymentFailure),
}

pub type Result<T> = std::result::Result<T, AppError>;
