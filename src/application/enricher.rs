use crate::error::{GatewayError, StageError, Step};
use serde::Serialize;
use serde_json::Value;

/// Attaches the failing step and the data it was working with to a gateway error.
///
/// Never fails: a snapshot that cannot be serialized is recorded as `null`.
pub fn enrich<P, R>(
    source: GatewayError,
    step: Step,
    payload: Option<&P>,
    request_params: &R,
) -> StageError
where
    P: Serialize + ?Sized,
    R: Serialize + ?Sized,
{
    let payload = payload.map(snapshot);
    let request_params = snapshot(request_params);

    tracing::warn!(step = %step, error = %source, "payment step failed");

    StageError {
        source,
        step,
        payload,
        request_params,
    }
}

fn snapshot<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
