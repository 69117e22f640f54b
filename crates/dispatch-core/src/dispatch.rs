use crate::error::{DispatchError, Result};
use crate::mailbox::{ActionMailbox, PendingAction};
use crate::protocol::Command;
use crate::status::{StatusSnapshot, StatusStore, Target};
use std::time::Duration;

/// What a commander request produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Submitted(PendingAction),
    Targets(Vec<Target>),
}

/// The shared context handed to every request: one status store, one mailbox.
#[derive(Debug, Default)]
pub struct Dispatch {
    status: StatusStore,
    mailbox: ActionMailbox,
}

impl Dispatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &StatusStore {
        &self.status
    }

    pub fn mailbox(&self) -> &ActionMailbox {
        &self.mailbox
    }

    /// Validate `action` against the snapshot current right now, then post it.
    ///
    /// A rejected action leaves the mailbox untouched. Targets are not checked
    /// again when the driver picks the action up.
    pub fn submit(&self, action: PendingAction) -> Result<()> {
        if let PendingAction::GoToTarget { target_id } = action {
            if !self.status.get_target_ids().contains(&target_id) {
                tracing::warn!(target_id, "rejected action for unknown target");
                return Err(DispatchError::UnknownTarget(target_id));
            }
        }
        self.mailbox.submit(action);
        Ok(())
    }

    pub fn execute(&self, command: Command) -> Result<CommandOutcome> {
        let action = match command {
            Command::GetAllTargets => {
                return Ok(CommandOutcome::Targets(self.status.list_targets_by_distance()))
            }
            Command::GoToNearest => PendingAction::GoToNearest,
            Command::GoToTarget(target_id) => PendingAction::GoToTarget { target_id },
        };
        self.submit(action)?;
        Ok(CommandOutcome::Submitted(action))
    }

    /// The driver's long poll: store its report, then wait for a command.
    /// Blocks the calling thread for up to `timeout`.
    pub fn report_and_wait(
        &self,
        snapshot: StatusSnapshot,
        timeout: Duration,
    ) -> Option<PendingAction> {
        self.status.report_status(snapshot);
        self.mailbox.await_and_take(timeout)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    fn snapshot(ids: &[i64]) -> StatusSnapshot {
        StatusSnapshot::with_targets(
            ids.iter()
                .map(|&id| Target {
                    id,
                    lat: 35.0,
                    lng: 135.7,
                    distance: id as f64 * 10.0,
                    status: "initial".into(),
                })
                .collect(),
        )
    }

    #[test]
    fn unknown_target_is_rejected_and_mailbox_untouched() {
        let dispatch = Dispatch::new();
        dispatch.status().report_status(snapshot(&[1, 2, 3]));

        let err = dispatch
            .submit(PendingAction::GoToTarget { target_id: 99 })
            .unwrap_err();
        assert!(matches!(err, DispatchError::UnknownTarget(99)));
        assert!(!dispatch.mailbox().is_filled());
    }

    #[test]
    fn rejection_does_not_wake_a_blocked_driver() {
        let dispatch = Arc::new(Dispatch::new());
        dispatch.status().report_status(snapshot(&[1, 2, 3]));

        let driver = {
            let dispatch = Arc::clone(&dispatch);
            thread::spawn(move || {
                let started = Instant::now();
                let action = dispatch.mailbox().await_and_take(Duration::from_millis(300));
                (action, started.elapsed())
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(dispatch
            .submit(PendingAction::GoToTarget { target_id: 99 })
            .is_err());

        let (action, elapsed) = driver.join().unwrap();
        assert_eq!(action, None);
        assert!(elapsed >= Duration::from_millis(300));
    }

    #[test]
    fn known_target_is_posted() {
        let dispatch = Dispatch::new();
        dispatch.status().report_status(snapshot(&[4]));

        let outcome = dispatch.execute(Command::GoToTarget(4)).unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::Submitted(PendingAction::GoToTarget { target_id: 4 })
        );
        assert_eq!(
            dispatch.report_and_wait(snapshot(&[4]), Duration::from_millis(10)),
            Some(PendingAction::GoToTarget { target_id: 4 })
        );
    }

    #[test]
    fn go_to_nearest_needs_no_snapshot() {
        let dispatch = Dispatch::new();
        dispatch.execute(Command::GoToNearest).unwrap();
        assert_eq!(
            dispatch.mailbox().await_and_take(Duration::ZERO),
            Some(PendingAction::GoToNearest)
        );
    }

    #[test]
    fn target_validated_at_submission_time_only() {
        let dispatch = Dispatch::new();
        dispatch.status().report_status(snapshot(&[5]));
        dispatch.execute(Command::GoToTarget(5)).unwrap();

        // The next report no longer lists target 5; the action is still delivered.
        let action = dispatch.report_and_wait(snapshot(&[6]), Duration::from_millis(10));
        assert_eq!(action, Some(PendingAction::GoToTarget { target_id: 5 }));
    }

    #[test]
    fn get_all_targets_does_not_touch_mailbox() {
        let dispatch = Dispatch::new();
        dispatch.status().report_status(snapshot(&[3, 1, 2]));

        let outcome = dispatch.execute(Command::GetAllTargets).unwrap();
        let CommandOutcome::Targets(targets) = outcome else {
            panic!("expected targets");
        };
        let ids: Vec<i64> = targets.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(!dispatch.mailbox().is_filled());
    }

    #[test]
    fn report_and_wait_stores_the_report_before_waiting() {
        let dispatch = Arc::new(Dispatch::new());
        let driver = {
            let dispatch = Arc::clone(&dispatch);
            thread::spawn(move || dispatch.report_and_wait(snapshot(&[8]), Duration::from_secs(5)))
        };

        // Wait until the report is visible, then target it.
        let started = Instant::now();
        while !dispatch.status().get_target_ids().contains(&8) {
            assert!(started.elapsed() < Duration::from_secs(5));
            thread::sleep(Duration::from_millis(5));
        }
        dispatch.execute(Command::GoToTarget(8)).unwrap();

        assert_eq!(
            driver.join().unwrap(),
            Some(PendingAction::GoToTarget { target_id: 8 })
        );
    }
}
