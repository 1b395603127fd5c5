use crate::core::dispatcher::ScanDispatcher;
use crate::core::patrol::{CheckpointDispatcher, PatrolRoster};
use crate::domain::model::{CheckInEvent, CheckpointOutcome, ScanOutcome};
use crate::domain::ports::{FormController, ScanSource};
use crate::utils::error::Result;
use chrono::Local;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub identity_outcomes: Vec<ScanOutcome>,
    pub checkpoint_outcomes: Vec<CheckpointOutcome>,
    pub check_ins: Vec<CheckInEvent>,
}

impl SessionReport {
    pub fn scans(&self) -> usize {
        self.identity_outcomes.len() + self.checkpoint_outcomes.len()
    }

    pub fn rejected(&self) -> usize {
        let identity = self
            .identity_outcomes
            .iter()
            .filter(|o| !o.is_recognized())
            .count();
        let tags = self
            .checkpoint_outcomes
            .iter()
            .filter(|o| !o.is_visited())
            .count();
        identity + tags
    }
}

/// Pulls payloads from a scanner until it closes and dispatches each one
/// exactly once. Dispatch itself never awaits.
pub struct ScanSession<S: ScanSource> {
    source: S,
}

impl<S: ScanSource> ScanSession<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Identity-document screen. `on_resolved` runs after every scan with the
    /// form already updated, e.g. to submit it.
    pub async fn run_identity<F, H>(
        &mut self,
        dispatcher: &ScanDispatcher,
        form: &mut F,
        mut on_resolved: H,
    ) -> Result<SessionReport>
    where
        F: FormController + ?Sized,
        H: FnMut(&ScanOutcome, &mut F),
    {
        let mut report = SessionReport::default();

        while let Some(payload) = self.source.next_payload().await? {
            let outcome = dispatcher.dispatch(payload, &mut *form);
            tracing::info!("Scan {}: {}", report.scans() + 1, outcome.feedback());
            on_resolved(&outcome, &mut *form);
            report.identity_outcomes.push(outcome);
        }

        tracing::info!(
            "Identity session closed: {} scans, {} unrecognized",
            report.scans(),
            report.rejected()
        );
        Ok(report)
    }

    /// Patrol screen: every payload is a checkpoint tag.
    pub async fn run_patrol(
        &mut self,
        dispatcher: &CheckpointDispatcher,
        roster: &mut PatrolRoster,
    ) -> Result<SessionReport> {
        let mut report = SessionReport::default();

        while let Some(payload) = self.source.next_payload().await? {
            let (outcome, event) = dispatcher.dispatch(payload.as_str(), roster, Local::now());
            if let Some(event) = event {
                report.check_ins.push(event);
            }
            report.checkpoint_outcomes.push(outcome);
        }

        let (completed, total) = roster.progress();
        tracing::info!(
            "Patrol session closed: {}/{} checkpoints verified, {} rejected tags",
            completed,
            total,
            report.rejected()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::form::VisitorForm;
    use crate::adapters::source::StaticSource;
    use crate::domain::model::CheckpointStatus;

    #[tokio::test]
    async fn test_identity_session_dispatches_each_payload_once() {
        let source = StaticSource::new(["8001015009087|Doe|John", "garbage", "Jane|123|082"]);
        let mut session = ScanSession::new(source);
        let mut form = VisitorForm::new();
        let mut seen = Vec::new();

        let report = session
            .run_identity(&ScanDispatcher::default(), &mut form, |outcome, form| {
                seen.push(form.full_name.clone());
                if outcome.is_recognized() {
                    form.clear();
                }
            })
            .await
            .unwrap();

        assert_eq!(report.scans(), 3);
        assert_eq!(report.rejected(), 1);
        assert_eq!(seen, vec!["John Doe", "", "Jane"]);
        assert!(form.is_blank());
    }

    #[tokio::test]
    async fn test_patrol_session() {
        let source = StaticSource::new(["cp-3", "cp-9", "cp-4"]);
        let mut session = ScanSession::new(source);
        let mut roster = PatrolRoster::default_roster();

        let report = session
            .run_patrol(&CheckpointDispatcher::default(), &mut roster)
            .await
            .unwrap();

        assert_eq!(report.scans(), 3);
        assert_eq!(report.rejected(), 1);
        assert_eq!(report.check_ins.len(), 2);
        assert_eq!(roster.progress(), (3, 4));
        assert_eq!(roster.get("1").unwrap().status, CheckpointStatus::Pending);
    }
}
