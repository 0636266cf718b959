//! The mid-verification lookup hand-off.
//!
//! While verifying a card, the 3-D Secure session surfaces lookup data and
//! then waits until the caller lets it continue. `Resume` is the caller's half
//! and can be used only once; `ResumeSignal` is what the session waits on.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;

/// Opaque data surfaced by the 3-D Secure lookup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupData(pub Value);

#[derive(Debug)]
pub struct Resume(oneshot::Sender<()>);

#[derive(Debug)]
pub struct ResumeSignal(oneshot::Receiver<()>);

impl Resume {
    pub fn channel() -> (Resume, ResumeSignal) {
        let (tx, rx) = oneshot::channel();
        (Resume(tx), ResumeSignal(rx))
    }

    /// Lets the suspended verification continue.
    pub fn proceed(self) {
        // The session may already have given up waiting.
        let _ = self.0.send(());
    }
}

impl ResumeSignal {
    /// Waits for the hook to proceed. Returns `false` if the `Resume` half
    /// was dropped without proceeding.
    pub async fn resumed(self) -> bool {
        self.0.await.is_ok()
    }
}
