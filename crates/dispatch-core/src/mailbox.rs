use serde::{Deserialize, Serialize};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// A movement command waiting to be picked up by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PendingAction {
    GoToNearest,
    GoToTarget { target_id: i64 },
}

// ---------------------------------------------------------------------------
// ActionMailbox
// ---------------------------------------------------------------------------

/// Single-slot handoff between the commander (producer) and the driver's
/// long poll (consumer).
///
/// The slot holds at most one action. A newer `submit` replaces an action no
/// one has taken yet; superseded actions are never observed. Each submitted
/// action is handed to at most one `await_and_take` caller.
#[derive(Debug, Default)]
pub struct ActionMailbox {
    slot: Mutex<Option<PendingAction>>,
    filled: Condvar,
}

impl ActionMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `action`, replacing any unconsumed one, and wake every waiter.
    pub fn submit(&self, action: PendingAction) {
        let mut slot = self.lock();
        if let Some(previous) = slot.replace(action) {
            tracing::debug!(?previous, ?action, "pending action superseded");
        } else {
            tracing::debug!(?action, "pending action stored");
        }
        self.filled.notify_all();
    }

    /// Take the pending action, waiting up to `timeout` for one to arrive.
    ///
    /// Returns `None` if the slot is still empty once the deadline passes.
    /// Waiters woken by a `submit` that another waiter already drained go back
    /// to waiting for whatever time they have left. A timeout too large to
    /// express as an `Instant` waits until an action arrives.
    pub fn await_and_take(&self, timeout: Duration) -> Option<PendingAction> {
        let deadline = Instant::now().checked_add(timeout);
        let mut slot = self.lock();
        while slot.is_none() {
            slot = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        break;
                    }
                    self.filled
                        .wait_timeout(slot, remaining)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self
                    .filled
                    .wait(slot)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }
        // Checked under the same lock as the loop: a submit that landed right
        // at the deadline is delivered here rather than dropped.
        let taken = slot.take();
        if let Some(action) = taken {
            tracing::debug!(?action, "pending action delivered");
        }
        taken
    }

    /// Whether an action is waiting to be taken.
    pub fn is_filled(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<PendingAction>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
