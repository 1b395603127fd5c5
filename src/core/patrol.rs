use crate::domain::model::{CheckInEvent, Checkpoint, CheckpointOutcome, CheckpointStatus};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{GuardError, Result};
use chrono::{DateTime, Local};

pub const DEFAULT_TAG_PREFIX: &str = "cp-";

/// Ordered checkpoints of the active patrol route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatrolRoster {
    checkpoints: Vec<Checkpoint>,
}

impl PatrolRoster {
    pub fn new(checkpoints: Vec<Checkpoint>) -> Self {
        Self { checkpoints }
    }

    pub fn default_roster() -> Self {
        let pending = |id: &str, name: &str, time: &str| Checkpoint {
            id: id.to_string(),
            name: name.to_string(),
            status: CheckpointStatus::Pending,
            time: time.to_string(),
        };
        let mut rear_gate = pending("2", "Rear Gate", "09:15");
        rear_gate.status = CheckpointStatus::Completed;

        Self::new(vec![
            pending("1", "Main Entrance", "10:00"),
            rear_gate,
            pending("3", "Loading Dock", "10:30"),
            pending("4", "Server Room", "11:00"),
        ])
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn get(&self, id: &str) -> Option<&Checkpoint> {
        self.checkpoints.iter().find(|cp| cp.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Marks the checkpoint completed at `at`. Checking in twice refreshes the
    /// verification time.
    pub fn check_in(&mut self, id: &str, at: DateTime<Local>) -> Result<CheckInEvent> {
        let checkpoint = self
            .checkpoints
            .iter_mut()
            .find(|cp| cp.id == id)
            .ok_or_else(|| GuardError::UnknownCheckpoint { id: id.to_string() })?;

        checkpoint.status = CheckpointStatus::Completed;
        checkpoint.time = at.format("%H:%M").to_string();
        tracing::info!(
            "Checkpoint {} ({}) verified at {}",
            checkpoint.id,
            checkpoint.name,
            checkpoint.time
        );

        Ok(CheckInEvent {
            checkpoint_id: checkpoint.id.clone(),
            name: checkpoint.name.clone(),
            verified_at: at,
        })
    }

    /// `(completed, total)`
    pub fn progress(&self) -> (usize, usize) {
        let completed = self
            .checkpoints
            .iter()
            .filter(|cp| cp.status == CheckpointStatus::Completed)
            .count();
        (completed, self.checkpoints.len())
    }
}

impl Default for PatrolRoster {
    fn default() -> Self {
        Self::default_roster()
    }
}

/// Tag scans resolve in one step: `Idle -> Resolved`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckpointScanState {
    Idle,
    Resolved(CheckpointOutcome),
}

#[derive(Debug, Clone)]
pub struct CheckpointDispatcher {
    tag_prefix: Option<String>,
}

impl CheckpointDispatcher {
    pub fn new(tag_prefix: Option<String>) -> Self {
        Self {
            tag_prefix: tag_prefix.filter(|p| !p.is_empty()),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self::new(Some(config.tag_prefix().to_string()))
    }

    /// Tag with the namespace prefix removed, if it carried one.
    pub fn checkpoint_id<'a>(&self, tag: &'a str) -> &'a str {
        match &self.tag_prefix {
            Some(prefix) => tag.strip_prefix(prefix.as_str()).unwrap_or(tag),
            None => tag,
        }
    }

    pub fn resolve(&self, tag: &str, roster: &PatrolRoster) -> CheckpointOutcome {
        let id = self.checkpoint_id(tag);
        match roster.get(id) {
            Some(checkpoint) => CheckpointOutcome::Visited {
                checkpoint_id: checkpoint.id.clone(),
                name: checkpoint.name.clone(),
            },
            None => CheckpointOutcome::UnrecognizedCheckpoint {
                tag: tag.to_string(),
            },
        }
    }

    /// Resolves the tag and, when recognized, checks the checkpoint in.
    /// Unrecognized tags leave the roster untouched.
    pub fn dispatch(
        &self,
        tag: &str,
        roster: &mut PatrolRoster,
        at: DateTime<Local>,
    ) -> (CheckpointOutcome, Option<CheckInEvent>) {
        let mut scan = CheckpointScan::new();
        let event = scan.resolve(self, tag, roster, at);
        let outcome = scan
            .outcome()
            .cloned()
            .unwrap_or_else(|| CheckpointOutcome::UnrecognizedCheckpoint {
                tag: tag.to_string(),
            });
        (outcome, event)
    }
}

/// One tag scan event.
#[derive(Debug)]
pub struct CheckpointScan {
    state: CheckpointScanState,
}

impl CheckpointScan {
    pub fn new() -> Self {
        Self {
            state: CheckpointScanState::Idle,
        }
    }

    pub fn state(&self) -> &CheckpointScanState {
        &self.state
    }

    pub fn outcome(&self) -> Option<&CheckpointOutcome> {
        match &self.state {
            CheckpointScanState::Resolved(outcome) => Some(outcome),
            CheckpointScanState::Idle => None,
        }
    }

    /// Runs the membership test once. A resolved scan is left as is and
    /// returns `None`.
    pub fn resolve(
        &mut self,
        dispatcher: &CheckpointDispatcher,
        tag: &str,
        roster: &mut PatrolRoster,
        at: DateTime<Local>,
    ) -> Option<CheckInEvent> {
        if self.state != CheckpointScanState::Idle {
            return None;
        }

        let outcome = dispatcher.resolve(tag, roster);
        let event = match &outcome {
            CheckpointOutcome::Visited { checkpoint_id, .. } => {
                match roster.check_in(checkpoint_id, at) {
                    Ok(event) => Some(event),
                    Err(e) => {
                        tracing::warn!("Check-in for tag '{}' failed: {}", tag, e);
                        None
                    }
                }
            }
            CheckpointOutcome::UnrecognizedCheckpoint { .. } => {
                tracing::warn!("Unrecognized tag '{}', unauthorized checkpoint", tag);
                None
            }
        };
        self.state = CheckpointScanState::Resolved(outcome);
        event
    }
}

impl Default for CheckpointScan {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for CheckpointDispatcher {
    fn default() -> Self {
        Self::new(Some(DEFAULT_TAG_PREFIX.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 19, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_default_roster() {
        let roster = PatrolRoster::default_roster();
        assert_eq!(roster.checkpoints().len(), 4);
        assert_eq!(roster.progress(), (1, 4));
        assert_eq!(roster.get("3").unwrap().name, "Loading Dock");
        assert!(roster.contains("4"));
        assert!(!roster.contains("cp-4"));
    }

    #[test]
    fn test_prefixed_tag_marks_checkpoint_visited() {
        let mut roster = PatrolRoster::default_roster();
        let dispatcher = CheckpointDispatcher::default();

        let (outcome, event) = dispatcher.dispatch("cp-3", &mut roster, at(10, 42));

        assert_eq!(
            outcome,
            CheckpointOutcome::Visited {
                checkpoint_id: "3".to_string(),
                name: "Loading Dock".to_string()
            }
        );
        assert_eq!(event.unwrap().checkpoint_id, "3");
        let checkpoint = roster.get("3").unwrap();
        assert_eq!(checkpoint.status, CheckpointStatus::Completed);
        assert_eq!(checkpoint.time, "10:42");
        assert_eq!(roster.progress(), (2, 4));
    }

    #[test]
    fn test_unknown_tag_leaves_roster_unchanged() {
        let mut roster = PatrolRoster::default_roster();
        let before = roster.clone();
        let dispatcher = CheckpointDispatcher::default();

        let (outcome, event) = dispatcher.dispatch("cp-9", &mut roster, at(10, 42));

        assert_eq!(
            outcome,
            CheckpointOutcome::UnrecognizedCheckpoint {
                tag: "cp-9".to_string()
            }
        );
        assert!(event.is_none());
        assert_eq!(roster, before);
    }

    #[test]
    fn test_unprefixed_tag_is_looked_up_as_is() {
        let roster = PatrolRoster::default_roster();
        let dispatcher = CheckpointDispatcher::default();
        assert!(dispatcher.resolve("4", &roster).is_visited());
        assert!(!dispatcher.resolve("04:A3:1F", &roster).is_visited());
    }

    #[test]
    fn test_custom_prefix() {
        let roster = PatrolRoster::default_roster();
        let dispatcher = CheckpointDispatcher::new(Some("site7/".to_string()));
        assert_eq!(dispatcher.checkpoint_id("site7/2"), "2");
        assert!(dispatcher.resolve("site7/2", &roster).is_visited());
        assert!(!dispatcher.resolve("cp-2", &roster).is_visited());
    }

    #[test]
    fn test_checkpoint_scan_resolves_once() {
        let mut roster = PatrolRoster::default_roster();
        let dispatcher = CheckpointDispatcher::default();
        let mut scan = CheckpointScan::new();
        assert_eq!(scan.state(), &CheckpointScanState::Idle);

        assert!(scan.resolve(&dispatcher, "cp-1", &mut roster, at(8, 5)).is_some());
        assert!(scan.outcome().unwrap().is_visited());
        assert!(scan.resolve(&dispatcher, "cp-3", &mut roster, at(8, 6)).is_none());
        assert_eq!(roster.get("3").unwrap().status, CheckpointStatus::Pending);
    }

    #[test]
    fn test_every_visit_yields_check_in_event() {
        let mut roster = PatrolRoster::default_roster();
        let dispatcher = CheckpointDispatcher::default();

        for (tag, minute) in [("cp-2", 10), ("cp-2", 20), ("cp-4", 30)] {
            let (outcome, event) = dispatcher.dispatch(tag, &mut roster, at(11, minute));
            let event = event.expect("visited checkpoint without check-in event");
            match outcome {
                CheckpointOutcome::Visited { checkpoint_id, .. } => {
                    assert_eq!(event.checkpoint_id, checkpoint_id)
                }
                other => panic!("expected visit, got {:?}", other),
            }
            assert_eq!(event.verified_at, at(11, minute));
        }
        assert_eq!(roster.get("2").unwrap().time, "11:20");
    }

    #[test]
    fn test_manual_check_in_unknown_id() {
        let mut roster = PatrolRoster::default_roster();
        let err = roster.check_in("42", at(9, 0)).unwrap_err();
        assert!(matches!(err, GuardError::UnknownCheckpoint { .. }));
    }
}
