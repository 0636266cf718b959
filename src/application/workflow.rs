use crate::application::enricher::enrich;
use crate::application::validator::validate;
use crate::domain::address::BillingAddress;
use crate::domain::card::CreditCard;
use crate::domain::gateway::{
    ClientParams, CreatePaymentMethodData, GatewayRequest, HttpMethod, PAYMENT_METHODS_ENDPOINT,
    THREE_D_SECURE_VERSION, ThreeDSecureParams, TokenizedCard, VerifyCardRequest,
    VerifyCardResponse,
};
use crate::domain::lookup::{LookupData, Resume};
use crate::domain::payment::{Amount, PaymentPayload, ValidatedPayment};
use crate::domain::ports::{
    Gateway, GatewayBox, GatewayClient, GatewayClientBox, ThreeDSecureSession,
    ThreeDSecureSessionBox,
};
use crate::error::{
    GatewayError, LiabilityNotShiftedError, PaymentFailure, StageError, Step, ValidationError,
};
use serde::Serialize;
use std::future::Future;
use tracing::instrument;

/// Where a payment run currently is.
///
/// Runs move strictly forward through the four gateway steps. `Failed` is
/// reachable from any non-terminal state; `Rejected` only from `Verified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    ClientReady,
    PaymentMethodCreated,
    ThreeDSecureReady,
    Verified,
    Succeeded,
    /// Liability did not shift to the issuer.
    Rejected,
    Failed(Step),
}

impl WorkflowState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowState::Succeeded | WorkflowState::Rejected | WorkflowState::Failed(_)
        )
    }

    pub fn can_advance_to(&self, next: WorkflowState) -> bool {
        use WorkflowState::*;
        match (self, next) {
            (Idle, ClientReady)
            | (ClientReady, PaymentMethodCreated)
            | (PaymentMethodCreated, ThreeDSecureReady)
            | (ThreeDSecureReady, Verified)
            | (Verified, Succeeded)
            | (Verified, Rejected) => true,
            (current, Failed(_)) => !current.is_terminal(),
            _ => false,
        }
    }
}

/// Tracks the state of a single payment run.
#[derive(Debug)]
struct PaymentRun {
    state: WorkflowState,
}

impl PaymentRun {
    fn new() -> Self {
        Self {
            state: WorkflowState::Idle,
        }
    }

    fn advance(&mut self, next: WorkflowState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::debug!(from = ?self.state, to = ?next, "payment run transition");
        self.state = next;
    }
}

/// Settings for the gateway calls made by the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    pub payment_methods_endpoint: String,
    pub three_d_secure_version: u8,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            payment_methods_endpoint: PAYMENT_METHODS_ENDPOINT.to_string(),
            three_d_secure_version: THREE_D_SECURE_VERSION,
        }
    }
}

/// A verified, liability-shifted payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedPayment {
    pub verification: VerifyCardResponse,
    /// Data captured when the 3-D Secure lookup completed, if any.
    pub lookup: Option<LookupData>,
}

pub type PaymentOutcome = Result<VerifiedPayment, PaymentFailure>;

/// Drives a card payment through client creation, tokenization, 3-D Secure
/// session creation and card verification.
///
/// Each run gets its own gateway client and 3-D Secure session.
pub struct ThreeDSecurePayment {
    gateway: GatewayBox,
    config: WorkflowConfig,
}

impl ThreeDSecurePayment {
    pub fn new(gateway: GatewayBox) -> Self {
        Self::with_config(gateway, WorkflowConfig::default())
    }

    pub fn with_config(gateway: GatewayBox, config: WorkflowConfig) -> Self {
        Self { gateway, config }
    }

    /// Validates `payload` and returns the run that settles `callback`.
    ///
    /// Validation errors are returned right away and never reach the
    /// callback. Every other outcome is delivered to the callback, which is
    /// called exactly once when the returned future completes.
    pub fn run_payment<F>(
        &self,
        payload: Option<PaymentPayload>,
        callback: F,
    ) -> Result<impl Future<Output = ()> + Send + '_, ValidationError>
    where
        F: FnOnce(PaymentOutcome) + Send + 'static,
    {
        let payment = validate(payload)?;
        Ok(async move {
            let outcome = self.execute(payment).await;
            callback(outcome);
        })
    }

    /// Runs the four gateway steps for an already validated payment.
    #[instrument(skip_all, fields(amount = %payment.amount.value()))]
    pub async fn execute(&self, payment: ValidatedPayment) -> PaymentOutcome {
        let mut run = PaymentRun::new();
        let outcome = self.drive(&mut run, &payment).await;

        match &outcome {
            Ok(_) => {
                run.advance(WorkflowState::Succeeded);
                tracing::info!("payment verified, liability shifted");
            }
            Err(PaymentFailure::Stage(e)) => run.advance(WorkflowState::Failed(e.step)),
            Err(PaymentFailure::LiabilityNotShifted(_)) => run.advance(WorkflowState::Rejected),
        }

        outcome
    }

    async fn drive(&self, run: &mut PaymentRun, payment: &ValidatedPayment) -> PaymentOutcome {
        let client = create_client(self.gateway.as_ref(), payment).await?;
        run.advance(WorkflowState::ClientReady);

        let card = request_payment(client.as_ref(), &self.config, payment).await?;
        run.advance(WorkflowState::PaymentMethodCreated);

        let session =
            create_three_d_secure(self.gateway.as_ref(), client.as_ref(), &self.config, payment)
                .await?;
        run.advance(WorkflowState::ThreeDSecureReady);

        let (verification, lookup) = verify_card(session.as_ref(), &card, payment).await?;
        run.advance(WorkflowState::Verified);

        Ok(check_liability(verification, lookup)?)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardPayload<'a> {
    credit_card: &'a CreditCard,
    amount: Amount,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerificationPayload<'a> {
    amount: Amount,
    billing_address: Option<&'a BillingAddress>,
}

async fn create_client(
    gateway: &dyn Gateway,
    payment: &ValidatedPayment,
) -> Result<GatewayClientBox, StageError> {
    let params = ClientParams {
        authorization: payment.token.clone(),
    };

    gateway
        .create_client(&params)
        .await
        .map_err(|e| enrich(e, Step::Payment, Some(payment), &params))
}

/// Tokenizes the card. Only the street part of the billing address is sent.
async fn request_payment(
    client: &dyn GatewayClient,
    config: &WorkflowConfig,
    payment: &ValidatedPayment,
) -> Result<TokenizedCard, StageError> {
    let request = GatewayRequest {
        endpoint: config.payment_methods_endpoint.clone(),
        method: HttpMethod::Post,
        data: CreatePaymentMethodData {
            credit_card: payment.credit_card.with_street_only_address(),
        },
    };
    let payload = CardPayload {
        credit_card: &payment.credit_card,
        amount: payment.amount,
    };

    let response = client
        .request(&request)
        .await
        .map_err(|e| enrich(e, Step::RequestPayment, Some(&payload), &request))?;

    match response.first_card() {
        Some(card) => {
            tracing::debug!(bin = %card.bin, "payment method created");
            Ok(card.clone())
        }
        None => Err(enrich(
            GatewayError::MissingCreditCard,
            Step::RequestPayment,
            Some(&payload),
            &request,
        )),
    }
}

async fn create_three_d_secure(
    gateway: &dyn Gateway,
    client: &dyn GatewayClient,
    config: &WorkflowConfig,
    payment: &ValidatedPayment,
) -> Result<ThreeDSecureSessionBox, StageError> {
    let params = ThreeDSecureParams {
        version: config.three_d_secure_version,
    };
    let payload = VerificationPayload {
        amount: payment.amount,
        billing_address: payment.credit_card.billing_address.as_ref(),
    };

    gateway
        .create_three_d_secure(client, &params)
        .await
        .map_err(|e| enrich(e, Step::CreateTdsPayment, Some(&payload), &params))
}

/// Verifies the tokenized card, resuming the lookup as soon as it completes.
async fn verify_card(
    session: &dyn ThreeDSecureSession,
    card: &TokenizedCard,
    payment: &ValidatedPayment,
) -> Result<(VerifyCardResponse, Option<LookupData>), StageError> {
    let request = VerifyCardRequest {
        amount: payment.amount,
        nonce: card.nonce.clone(),
        bin: card.bin.clone(),
        billing_address: payment.credit_card.billing_address.clone(),
    };

    let mut lookup = None;
    let mut on_lookup_complete = |data: LookupData, resume: Resume| {
        tracing::debug!("3-D Secure lookup complete");
        lookup = Some(data);
        resume.proceed();
    };

    // The payload is deliberately not echoed for this step.
    let verification = session
        .verify_card(&request, &mut on_lookup_complete)
        .await
        .map_err(|e| enrich(e, Step::VerifyTdsCard, None::<&()>, &request))?;

    Ok((verification, lookup))
}

fn check_liability(
    verification: VerifyCardResponse,
    lookup: Option<LookupData>,
) -> Result<VerifiedPayment, LiabilityNotShiftedError> {
    if !verification.liability_shifted {
        tracing::warn!(
            three_d_secure_info = %verification.three_d_secure_info,
            "liability did not shift to the issuer"
        );
        return Err(LiabilityNotShiftedError {
            liability_shifted: verification.liability_shifted,
            three_d_secure_info: verification.three_d_secure_info,
        });
    }

    Ok(VerifiedPayment {
        verification,
        lookup,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::scripted::{GatewayCall, GatewayScript, ScriptedGateway};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn payload() -> PaymentPayload {
        let address = BillingAddress::build(
            "Jane",
            "Doe",
            "555-0100",
            "1 Main St",
            "Springfield",
            "il",
            "62701",
            "us",
        );
        PaymentPayload {
            token: Some("sandbox_token".to_string()),
            amount: Some(dec!(25.00)),
            credit_card: Some(CreditCard::build(
                "4111111111111111",
                "12",
                "2030",
                "123",
                address,
            )),
        }
    }

    #[test]
    fn test_linear_transitions() {
        use WorkflowState::*;
        let chain = [Idle, ClientReady, PaymentMethodCreated, ThreeDSecureReady, Verified, Succeeded];
        for pair in chain.windows(2) {
            assert!(pair[0].can_advance_to(pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        }
        assert!(Verified.can_advance_to(Rejected));
    }

    #[test]
    fn test_illegal_transitions() {
        use WorkflowState::*;
        assert!(!Idle.can_advance_to(PaymentMethodCreated));
        assert!(!ClientReady.can_advance_to(Idle));
        assert!(!ThreeDSecureReady.can_advance_to(Succeeded));
        assert!(!Idle.can_advance_to(Rejected));
        assert!(!Succeeded.can_advance_to(Failed(Step::Payment)));
        assert!(!Failed(Step::Payment).can_advance_to(ClientReady));
        assert!(PaymentMethodCreated.can_advance_to(Failed(Step::CreateTdsPayment)));
    }

    #[test]
    fn test_check_liability_rejects_unshifted() {
        let verification = VerifyCardResponse {
            liability_shifted: false,
            three_d_secure_info: json!({"liabilityShiftPossible": true}),
            nonce: "n".into(),
            bin: "411111".into(),
        };
        let err = check_liability(verification, Some(LookupData(json!({"a": 1})))).unwrap_err();
        assert!(err.to_string().contains("liabilityShifted = false"));
        assert!(err.to_string().contains(r#"{"liabilityShiftPossible":true}"#));
    }

    #[test]
    fn test_check_liability_accepts_shifted() {
        let verification = VerifyCardResponse {
            liability_shifted: true,
            ..Default::default()
        };
        let verified = check_liability(verification, None).unwrap();
        assert!(verified.verification.liability_shifted);
        assert!(verified.lookup.is_none());
    }

    #[tokio::test]
    async fn test_execute_happy_path() {
        let gateway = ScriptedGateway::new(GatewayScript::approved("nonce-1", "411111"));
        let workflow = ThreeDSecurePayment::new(Box::new(gateway.clone()));

        let payment = validate(Some(payload())).unwrap();
        let verified = workflow.execute(payment).await.unwrap();

        assert!(verified.verification.liability_shifted);
        assert!(verified.lookup.is_some());
        assert_eq!(gateway.calls().await.len(), 4);
    }

    #[tokio::test]
    async fn test_custom_config_reaches_gateway() {
        let gateway = ScriptedGateway::new(GatewayScript::approved("nonce-1", "411111"));
        let config = WorkflowConfig {
            payment_methods_endpoint: "v2/payment_methods".to_string(),
            three_d_secure_version: 1,
        };
        let workflow = ThreeDSecurePayment::with_config(Box::new(gateway.clone()), config);

        workflow.execute(validate(Some(payload())).unwrap()).await.unwrap();

        let calls = gateway.calls().await;
        assert!(matches!(&calls[1], GatewayCall::Request(r) if r.endpoint == "v2/payment_methods"));
        assert_eq!(calls[2], GatewayCall::CreateThreeDSecure(ThreeDSecureParams { version: 1 }));
    }

    #[test]
    fn test_run_payment_validates_before_any_call() {
        let gateway = ScriptedGateway::new(GatewayScript::approved("nonce-1", "411111"));
        let workflow = ThreeDSecurePayment::new(Box::new(gateway));

        let mut bad = payload();
        bad.token = None;
        let result = workflow.run_payment(Some(bad), |_| panic!("callback must not fire"));
        assert!(matches!(result, Err(ValidationError::MissingToken)));
    }
}
