//! Application layer containing the payment workflow.
//!
//! `workflow` defines `ThreeDSecurePayment`, the state machine that sequences
//! the gateway steps. `validator` and `enricher` are the pure helpers it
//! relies on before and after each gateway call.

pub mod enricher;
pub mod validator;
pub mod workflow;
