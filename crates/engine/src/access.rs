//! Per-user unlock flags for the full report.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

/// The single policy point deciding whether a user sees the full
/// categorized report or the redacted preview.
///
/// The gate never inspects payment details; flipping the flag is the
/// payment collaborator's job. Unknown users are locked. Flags are never
/// reset automatically.
#[derive(Clone, Debug, Default)]
pub struct AccessGate {
    inner: Arc<Mutex<HashMap<u64, bool>>>,
}

impl AccessGate {
    pub async fn is_unlocked(&self, user_id: u64) -> bool {
        let guard = self.inner.lock().await;
        guard.get(&user_id).copied().unwrap_or(false)
    }

    /// Idempotent; redundant calls are fine.
    pub async fn set_unlocked(&self, user_id: u64, unlocked: bool) {
        let mut guard = self.inner.lock().await;
        guard.insert(user_id, unlocked);
    }
}
