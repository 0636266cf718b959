use crate::domain::gateway::{
    ClientParams, GatewayRequest, PaymentMethodResponse, ThreeDSecureParams, TokenizedCard,
    VerifyCardRequest, VerifyCardResponse,
};
use crate::domain::lookup::{LookupData, Resume};
use crate::domain::ports::{
    Gateway, GatewayClient, GatewayClientBox, ThreeDSecureSession, ThreeDSecureSessionBox,
};
use crate::error::{GatewayError, Step};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

const DEFAULT_RESUME_TIMEOUT: Duration = Duration::from_secs(5);

/// What a `ScriptedGateway` answers at each step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayScript {
    /// The step whose gateway call fails, if any.
    #[serde(default)]
    pub fail_at: Option<Step>,
    #[serde(default = "default_failure_message")]
    pub failure_message: String,
    #[serde(default)]
    pub payment_method: PaymentMethodResponse,
    #[serde(default)]
    pub verification: VerifyCardResponse,
    /// Surfaced through the lookup hook during verification. No hook call when `None`.
    #[serde(default)]
    pub lookup: Option<LookupData>,
}

fn default_failure_message() -> String {
    "scripted gateway failure".to_string()
}

impl Default for GatewayScript {
    fn default() -> Self {
        Self {
            fail_at: None,
            failure_message: default_failure_message(),
            payment_method: PaymentMethodResponse::default(),
            verification: VerifyCardResponse::default(),
            lookup: None,
        }
    }
}

impl GatewayScript {
    /// A script where every step succeeds and liability shifts.
    pub fn approved(nonce: &str, bin: &str) -> Self {
        Self {
            payment_method: PaymentMethodResponse {
                credit_cards: vec![TokenizedCard {
                    nonce: nonce.to_string(),
                    bin: bin.to_string(),
                }],
                raw: json!({"creditCards": [{"nonce": nonce, "details": {"bin": bin}}]}),
            },
            verification: VerifyCardResponse {
                liability_shifted: true,
                three_d_secure_info: json!({"liabilityShifted": true, "liabilityShiftPossible": true}),
                nonce: format!("{nonce}-verified"),
                bin: bin.to_string(),
            },
            lookup: Some(LookupData(json!({"requiresUserAuthentication": false}))),
            ..Self::default()
        }
    }

    pub fn failing_at(mut self, step: Step) -> Self {
        self.fail_at = Some(step);
        self
    }

    pub fn without_liability_shift(mut self) -> Self {
        self.verification.liability_shifted = false;
        self.verification.three_d_secure_info =
            json!({"liabilityShifted": false, "liabilityShiftPossible": false});
        self
    }

    fn outcome(&self, step: Step) -> Result<(), GatewayError> {
        if self.fail_at == Some(step) {
            Err(GatewayError::Request(self.failure_message.clone()))
        } else {
            Ok(())
        }
    }
}

/// A gateway call as recorded by `ScriptedGateway`.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    CreateClient(ClientParams),
    Request(GatewayRequest),
    CreateThreeDSecure(ThreeDSecureParams),
    VerifyCard(VerifyCardRequest),
}

type CallLog = Arc<RwLock<Vec<GatewayCall>>>;

/// An in-memory gateway that replays a `GatewayScript`.
///
/// Every call is recorded in order; clones share the same log, so a test can
/// keep a handle after boxing the gateway into a workflow.
#[derive(Debug, Clone)]
pub struct ScriptedGateway {
    script: Arc<GatewayScript>,
    calls: CallLog,
    resume_timeout: Duration,
}

impl ScriptedGateway {
    pub fn new(script: GatewayScript) -> Self {
        Self {
            script: Arc::new(script),
            calls: CallLog::default(),
            resume_timeout: DEFAULT_RESUME_TIMEOUT,
        }
    }

    /// Bounds how long verification waits for the lookup hook to resume it.
    pub fn with_resume_timeout(mut self, timeout: Duration) -> Self {
        self.resume_timeout = timeout;
        self
    }

    pub async fn calls(&self) -> Vec<GatewayCall> {
        self.calls.read().await.clone()
    }
}

async fn record(calls: &CallLog, call: GatewayCall) {
    tracing::debug!(?call, "scripted gateway call");
    calls.write().await.push(call);
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn create_client(&self, params: &ClientParams) -> Result<GatewayClientBox, GatewayError> {
        record(&self.calls, GatewayCall::CreateClient(params.clone())).await;
        self.script.outcome(Step::Payment)?;
        Ok(Box::new(ScriptedClient {
            script: Arc::clone(&self.script),
            calls: Arc::clone(&self.calls),
        }))
    }

    async fn create_three_d_secure(
        &self,
        _client: &dyn GatewayClient,
        params: &ThreeDSecureParams,
    ) -> Result<ThreeDSecureSessionBox, GatewayError> {
        record(&self.calls, GatewayCall::CreateThreeDSecure(*params)).await;
        self.script.outcome(Step::CreateTdsPayment)?;
        Ok(Box::new(ScriptedSession {
            script: Arc::clone(&self.script),
            calls: Arc::clone(&self.calls),
            resume_timeout: self.resume_timeout,
        }))
    }
}

struct ScriptedClient {
    script: Arc<GatewayScript>,
    calls: CallLog,
}

#[async_trait]
impl GatewayClient for ScriptedClient {
    async fn request(
        &self,
        request: &GatewayRequest,
    ) -> Result<PaymentMethodResponse, GatewayError> {
        record(&self.calls, GatewayCall::Request(request.clone())).await;
        self.script.outcome(Step::RequestPayment)?;
        Ok(self.script.payment_method.clone())
    }
}

struct ScriptedSession {
    script: Arc<GatewayScript>,
    calls: CallLog,
    resume_timeout: Duration,
}

#[async_trait]
impl ThreeDSecureSession for ScriptedSession {
    async fn verify_card(
        &self,
        request: &VerifyCardRequest,
        on_lookup_complete: &mut (dyn FnMut(LookupData, Resume) + Send),
    ) -> Result<VerifyCardResponse, GatewayError> {
        record(&self.calls, GatewayCall::VerifyCard(request.clone())).await;

        if let Some(lookup) = &self.script.lookup {
            let (resume, signal) = Resume::channel();
            on_lookup_complete(lookup.clone(), resume);
            match tokio::time::timeout(self.resume_timeout, signal.resumed()).await {
                Ok(true) => {}
                Ok(false) | Err(_) => {
                    tracing::warn!("lookup hook did not resume verification");
                    return Err(GatewayError::LookupAbandoned);
                }
            }
        }

        self.script.outcome(Step::VerifyTdsCard)?;
        Ok(self.script.verification.clone())
    }
}
