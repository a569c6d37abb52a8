//! Prior-submission detection and the confirm-before-resubmit state machine.

use crate::draft::date_key;
use crate::errors::TrackerError;
use crate::models::UserId;
use crate::storage::KvStore;
use chrono::NaiveDate;
use std::{sync::Arc, time::Duration};

pub const CONFIRM_PROMPT: &str =
    "You have already submitted tasks for today. Do you want to update your submission?";

const MARKER_VALUE: &str = "true";

pub fn marker_key(user_id: UserId, date: NaiveDate) -> String {
    format!("taskSubmission_{user_id}_{}", date_key(date))
}

/// Per-day "already submitted" flags, stored independently of drafts.
#[derive(Clone)]
pub struct SubmissionMarkers {
    store: Arc<dyn KvStore>,
    ttl: Duration,
}

impl SubmissionMarkers {
    pub fn new(store: Arc<dyn KvStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub async fn has_submitted(&self, user_id: UserId, date: NaiveDate) -> Result<bool, TrackerError> {
        let value = self.store.get(&marker_key(user_id, date)).await?;
        Ok(value.is_some_and(|value| !value.is_empty()))
    }

    pub async fn mark(&self, user_id: UserId, date: NaiveDate) -> Result<(), TrackerError> {
        self.store
            .set(&marker_key(user_id, date), MARKER_VALUE.to_string(), self.ttl)
            .await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    NoMarker,
    AwaitingConfirm,
    /// `marked_before` is where a failed submission falls back to.
    Submitting { marked_before: bool },
    Marked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    NeedsConfirmation,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct SubmissionGuard {
    state: GuardState,
}

impl SubmissionGuard {
    pub fn new(marked: bool) -> Self {
        let state = if marked {
            GuardState::Marked
        } else {
            GuardState::NoMarker
        };
        Self { state }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, GuardState::Submitting { .. })
    }

    /// Handles a submit click given the marker as currently stored.
    pub fn request(&mut self, marker_present: bool) -> Result<Decision, TrackerError> {
        match self.state {
            GuardState::Submitting { .. } => Err(TrackerError::SubmissionInFlight),
            GuardState::AwaitingConfirm => Ok(Decision::NeedsConfirmation),
            GuardState::NoMarker | GuardState::Marked if marker_present => {
                self.state = GuardState::AwaitingConfirm;
                Ok(Decision::NeedsConfirmation)
            }
            GuardState::NoMarker | GuardState::Marked => {
                self.state = GuardState::Submitting {
                    marked_before: false,
                };
                Ok(Decision::Proceed)
            }
        }
    }

    /// Resolves the pending proceed/cancel prompt.
    pub fn resolve(&mut self, proceed: bool) -> Result<Decision, TrackerError> {
        match self.state {
            GuardState::AwaitingConfirm if proceed => {
                self.state = GuardState::Submitting {
                    marked_before: true,
                };
                Ok(Decision::Proceed)
            }
            GuardState::AwaitingConfirm => {
                self.state = GuardState::Marked;
                Ok(Decision::Cancelled)
            }
            GuardState::Submitting { .. } => Err(TrackerError::SubmissionInFlight),
            GuardState::NoMarker | GuardState::Marked => Err(TrackerError::NoPendingConfirmation),
        }
    }

    pub fn finish(&mut self, succeeded: bool) {
        if let GuardState::Submitting { marked_before } = self.state {
            self.state = if succeeded || marked_before {
                GuardState::Marked
            } else {
                GuardState::NoMarker
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn first_submit_proceeds_directly() {
        let mut guard = SubmissionGuard::new(false);
        assert_eq!(guard.request(false).unwrap(), Decision::Proceed);
        assert!(guard.is_submitting());
        guard.finish(true);
        assert_eq!(guard.state(), GuardState::Marked);
    }

    #[test]
    fn existing_marker_requires_confirmation() {
        let mut guard = SubmissionGuard::new(true);
        assert_eq!(guard.request(true).unwrap(), Decision::NeedsConfirmation);
        assert_eq!(guard.state(), GuardState::AwaitingConfirm);
        assert_eq!(guard.resolve(true).unwrap(), Decision::Proceed);
        assert!(guard.is_submitting());
    }

    #[test]
    fn cancel_returns_to_marked() {
        let mut guard = SubmissionGuard::new(true);
        guard.request(true).unwrap();
        assert_eq!(guard.resolve(false).unwrap(), Decision::Cancelled);
        assert_eq!(guard.state(), GuardState::Marked);
    }

    #[test]
    fn failure_restores_prior_state() {
        let mut fresh = SubmissionGuard::new(false);
        fresh.request(false).unwrap();
        fresh.finish(false);
        assert_eq!(fresh.state(), GuardState::NoMarker);

        let mut resubmit = SubmissionGuard::new(true);
        resubmit.request(true).unwrap();
        resubmit.resolve(true).unwrap();
        resubmit.finish(false);
        assert_eq!(resubmit.state(), GuardState::Marked);
    }

    #[test]
    fn second_request_while_submitting_is_rejected() {
        let mut guard = SubmissionGuard::new(false);
        guard.request(false).unwrap();
        assert!(matches!(guard.request(false), Err(TrackerError::SubmissionInFlight)));
        assert!(matches!(guard.resolve(true), Err(TrackerError::SubmissionInFlight)));
    }

    #[test]
    fn resolve_without_prompt_is_rejected() {
        let mut guard = SubmissionGuard::new(false);
        assert!(matches!(guard.resolve(true), Err(TrackerError::NoPendingConfirmation)));
    }

    #[tokio::test]
    async fn marker_is_absent_until_marked() {
        let markers = SubmissionMarkers::new(
            Arc::new(MemoryStore::new()),
            Duration::from_secs(86_400),
        );
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert!(!markers.has_submitted(3, date).await.unwrap());
        markers.mark(3, date).await.unwrap();
        assert!(markers.has_submitted(3, date).await.unwrap());
        assert!(!markers.has_submitted(3, date.succ_opt().unwrap()).await.unwrap());
        assert_eq!(marker_key(3, date), "taskSubmission_3_2026-01-05");
    }
}
