//! Daily submission flow: load the day, keep the draft, gate and send submits.

use crate::dispatcher::{Dispatcher, FAILURE_MESSAGE, SUCCESS_MESSAGE};
use crate::draft::{self, Draft, DraftStore};
use crate::errors::TrackerError;
use crate::guard::{CONFIRM_PROMPT, Decision, GuardState, SubmissionGuard, SubmissionMarkers};
use crate::loader::load_tasks;
use crate::models::{
    Notification, ReportDay, SubmitOutcome, SubmitResponse, Task, TodayResponse, UserId,
};
use crate::remote::TaskService;
use crate::report::group_by_date;
use crate::storage::KvStore;
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tracing::{error, info, warn};

struct Session {
    date: NaiveDate,
    tasks: Vec<Task>,
    guard: SubmissionGuard,
}

type Sessions = Arc<Mutex<HashMap<UserId, Session>>>;

/// Settles a `Submitting` guard exactly once.
///
/// Dropped unsettled (the request future was cancelled mid-send), it
/// settles as a failure so the day can be submitted again.
struct Settlement {
    sessions: Sessions,
    user_id: UserId,
    date: NaiveDate,
    settled: bool,
}

impl Settlement {
    fn new(sessions: &Sessions, user_id: UserId, date: NaiveDate) -> Self {
        Self {
            sessions: Arc::clone(sessions),
            user_id,
            date,
            settled: false,
        }
    }

    fn settle(mut self, succeeded: bool) {
        self.finish(succeeded);
    }

    fn finish(&mut self, succeeded: bool) {
        self.settled = true;
        let mut sessions = self.sessions.lock();
        if let Some(session) = sessions
            .get_mut(&self.user_id)
            .filter(|session| session.date == self.date)
        {
            session.guard.finish(succeeded);
        }
    }
}

impl Drop for Settlement {
    fn drop(&mut self) {
        if !self.settled {
            warn!(user_id = self.user_id, date = %self.date, "submission abandoned before it settled");
            self.finish(false);
        }
    }
}

pub struct Tracker {
    service: Arc<dyn TaskService>,
    drafts: DraftStore,
    markers: SubmissionMarkers,
    dispatcher: Dispatcher,
    sessions: Sessions,
}

impl Tracker {
    pub fn new(service: Arc<dyn TaskService>, store: Arc<dyn KvStore>, ttl: Duration) -> Self {
        let drafts = DraftStore::new(store.clone(), ttl);
        let markers = SubmissionMarkers::new(store, ttl);
        let dispatcher = Dispatcher::new(service.clone(), markers.clone());
        Self {
            service,
            drafts,
            markers,
            dispatcher,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Loads the day's tasks and restores the stored draft.
    ///
    /// A same-day session that is sending or waiting on a confirmation keeps its guard.
    pub async fn open_day(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> Result<TodayResponse, TrackerError> {
        let tasks = load_tasks(self.service.as_ref(), user_id).await;
        let stored = self.drafts.load(user_id, date).await?;
        let draft = draft::with_defaults(&tasks, stored);
        let submitted = self.markers.has_submitted(user_id, date).await?;

        let mut sessions = self.sessions.lock();
        let submitting = match sessions.get_mut(&user_id) {
            Some(session) if session.date == date && in_progress(&session.guard) => {
                session.tasks = tasks.clone();
                session.guard.is_submitting()
            }
            _ => {
                sessions.insert(
                    user_id,
                    Session {
                        date,
                        tasks: tasks.clone(),
                        guard: SubmissionGuard::new(submitted),
                    },
                );
                false
            }
        };

        Ok(TodayResponse {
            date: draft::date_key(date),
            tasks,
            draft,
            submitted,
            can_submit: !submitting,
        })
    }

    /// Replaces the day's draft and returns what was stored.
    pub async fn save_draft(
        &self,
        user_id: UserId,
        date: NaiveDate,
        draft: Draft,
    ) -> Result<Draft, TrackerError> {
        self.drafts.save(user_id, date, &draft).await?;
        Ok(draft)
    }

    pub async fn has_submitted(&self, user_id: UserId, date: NaiveDate) -> Result<bool, TrackerError> {
        self.markers.has_submitted(user_id, date).await
    }

    /// Submit click: sends directly, or asks for confirmation when the day is already marked.
    pub async fn request_submit(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> Result<SubmitResponse, TrackerError> {
        let marked = self.markers.has_submitted(user_id, date).await?;
        self.ensure_session(user_id, date, marked).await;

        let (tasks, settlement) = {
            let mut sessions = self.sessions.lock();
            let session = sessions
                .get_mut(&user_id)
                .ok_or(TrackerError::NoPendingConfirmation)?;
            match session.guard.request(marked)? {
                Decision::Proceed => (
                    session.tasks.clone(),
                    Settlement::new(&self.sessions, user_id, date),
                ),
                Decision::NeedsConfirmation => {
                    info!(user_id, date = %date, "resubmission needs confirmation");
                    return Ok(SubmitResponse {
                        outcome: SubmitOutcome::ConfirmationRequired,
                        message: Some(CONFIRM_PROMPT.to_string()),
                        notification: None,
                        batch: None,
                    });
                }
                Decision::Cancelled => return Ok(cancelled()),
            }
        };

        self.dispatch(user_id, date, tasks, settlement).await
    }

    /// Answer to the confirmation prompt. Cancelling changes nothing.
    pub async fn confirm_submit(
        &self,
        user_id: UserId,
        date: NaiveDate,
        proceed: bool,
    ) -> Result<SubmitResponse, TrackerError> {
        let (tasks, settlement) = {
            let mut sessions = self.sessions.lock();
            let session = sessions
                .get_mut(&user_id)
                .filter(|session| session.date == date)
                .ok_or(TrackerError::NoPendingConfirmation)?;
            match session.guard.resolve(proceed)? {
                Decision::Proceed => (
                    session.tasks.clone(),
                    Settlement::new(&self.sessions, user_id, date),
                ),
                Decision::Cancelled | Decision::NeedsConfirmation => {
                    info!(user_id, date = %date, "resubmission cancelled");
                    return Ok(cancelled());
                }
            }
        };

        self.dispatch(user_id, date, tasks, settlement).await
    }

    pub async fn report(&self, user_id: UserId) -> Vec<ReportDay> {
        match self.service.user_report(user_id).await {
            Ok(records) => group_by_date(records),
            Err(err) => {
                error!(user_id, "failed to fetch report: {err}");
                Vec::new()
            }
        }
    }

    async fn ensure_session(&self, user_id: UserId, date: NaiveDate, marked: bool) {
        let current = self
            .sessions
            .lock()
            .get(&user_id)
            .is_some_and(|session| session.date == date);
        if current {
            return;
        }

        let tasks = load_tasks(self.service.as_ref(), user_id).await;
        let mut sessions = self.sessions.lock();
        let stale = sessions
            .get(&user_id)
            .is_none_or(|session| session.date != date);
        if stale {
            sessions.insert(
                user_id,
                Session {
                    date,
                    tasks,
                    guard: SubmissionGuard::new(marked),
                },
            );
        }
    }

    /// Sends the batch while the guard is `Submitting`.
    ///
    /// Store failures come back as errors; transport failures as a `Failed` outcome.
    async fn dispatch(
        &self,
        user_id: UserId,
        date: NaiveDate,
        tasks: Vec<Task>,
        settlement: Settlement,
    ) -> Result<SubmitResponse, TrackerError> {
        let draft = match self.drafts.load(user_id, date).await {
            Ok(draft) => draft,
            Err(err) => {
                settlement.settle(false);
                return Err(err);
            }
        };

        let result = self.dispatcher.submit(user_id, date, &tasks, &draft).await;
        settlement.settle(result.is_ok());

        Ok(match result {
            Ok(batch) => SubmitResponse {
                outcome: SubmitOutcome::Submitted,
                message: None,
                notification: Some(Notification::success(SUCCESS_MESSAGE)),
                batch: Some(batch),
            },
            Err(err) => {
                warn!(user_id, date = %date, "submission failed: {err}");
                SubmitResponse {
                    outcome: SubmitOutcome::Failed,
                    message: Some(err.to_string()),
                    notification: Some(Notification::error(FAILURE_MESSAGE)),
                    batch: None,
                }
            }
        })
    }
}

fn in_progress(guard: &SubmissionGuard) -> bool {
    guard.is_submitting() || guard.state() == GuardState::AwaitingConfirm
}

fn cancelled() -> SubmitResponse {
    SubmitResponse {
        outcome: SubmitOutcome::Cancelled,
        message: None,
        notification: None,
        batch: None,
    }
}
