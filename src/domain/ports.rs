use super::gateway::{
    ClientParams, GatewayRequest, PaymentMethodResponse, ThreeDSecureParams, VerifyCardRequest,
    VerifyCardResponse,
};
use super::lookup::{LookupData, Resume};
use crate::error::GatewayError;
use async_trait::async_trait;

/// Entry point into the payment gateway SDK.
///
/// Implementations hand out a fresh client and session per call; the
/// workflow never shares them between payment runs.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn create_client(&self, params: &ClientParams) -> Result<GatewayClientBox, GatewayError>;

    async fn create_three_d_secure(
        &self,
        client: &dyn GatewayClient,
        params: &ThreeDSecureParams,
    ) -> Result<ThreeDSecureSessionBox, GatewayError>;
}

/// An authorized gateway client.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    async fn request(&self, request: &GatewayRequest)
    -> Result<PaymentMethodResponse, GatewayError>;
}

/// A 3-D Secure session bound to a gateway client.
#[async_trait]
pub trait ThreeDSecureSession: Send + Sync {
    /// Verifies the card. When the lookup completes, `on_lookup_complete` is
    /// called with the lookup data and a `Resume` that must be proceeded for
    /// verification to finish.
    async fn verify_card(
        &self,
        request: &VerifyCardRequest,
        on_lookup_complete: &mut (dyn FnMut(LookupData, Resume) + Send),
    ) -> Result<VerifyCardResponse, GatewayError>;
}

pub type GatewayBox = Box<dyn Gateway>;
pub type GatewayClientBox = Box<dyn GatewayClient>;
pub type ThreeDSecureSessionBox = Box<dyn ThreeDSecureSession>;
