//! The live timer state machine.
//!
//! A two-state machine (`Idle` / `Running`) owning the single live pointer:
//! which project is being tracked and since when. Elapsed time is always
//! recomputed from the start timestamp against a caller-supplied clock, never
//! stored as a counter, so it survives process restarts.
//!
//! The timer does not know where its state is persisted: the composition
//! root injects a callback invoked after every transition. Finalized
//! sessions leave through the [`SessionSink`] seam, implemented by the
//! session store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notify::{Notifier, Subscription};
use crate::session::{NewSession, Session};
use crate::types::{ProjectId, ValidationError};

/// Boxed error used across the timer's injected seams.
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Callback invoked with the new state after every transition.
pub type PersistFn = Box<dyn FnMut(&TimerState) -> Result<(), DynError>>;

/// Where finalized sessions land.
///
/// Implemented by the session store; keeps the timer decoupled from the
/// persistence layer. The implementation assigns the session its stable ID.
pub trait SessionSink {
    fn append_session(&mut self, draft: NewSession) -> Result<Session, DynError>;
}

/// The persisted live pointer.
///
/// The variant encodes the invariant: a project and start time exist exactly
/// when the timer is running. Wire form is `{"status":"idle"}` or
/// `{"status":"running","projectId":…,"startTime":…}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TimerState {
    #[default]
    Idle,
    Running {
        #[serde(rename = "projectId")]
        project_id: ProjectId,
        #[serde(rename = "startTime")]
        start_time: DateTime<Utc>,
    },
}

impl TimerState {
    /// Whether the timer is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// The tracked project, when running.
    #[must_use]
    pub const fn project_id(&self) -> Option<&ProjectId> {
        match self {
            Self::Running { project_id, .. } => Some(project_id),
            Self::Idle => None,
        }
    }

    /// When the current run began, when running.
    #[must_use]
    pub const fn start_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Running { start_time, .. } => Some(*start_time),
            Self::Idle => None,
        }
    }
}

/// Timer operation errors.
#[derive(Debug, Error)]
pub enum TimerError {
    /// A manual entry's interval was invalid. Nothing was recorded.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The sink refused the finalized session. The timer state is unchanged.
    #[error("failed to record session")]
    Record(#[source] DynError),

    /// The state transition happened in memory but could not be persisted.
    #[error("failed to persist timer state")]
    Persist(#[source] DynError),
}

/// The timer state machine.
pub struct Timer {
    state: TimerState,
    persist: PersistFn,
    notifier: Notifier<TimerState>,
}

impl std::fmt::Debug for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer")
            .field("state", &self.state)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl Timer {
    /// Creates an idle timer with the injected persistence callback.
    #[must_use]
    pub fn new(persist: PersistFn) -> Self {
        Self {
            state: TimerState::Idle,
            persist,
            notifier: Notifier::new(),
        }
    }

    /// Restores a previously persisted state, e.g. at startup.
    ///
    /// Does not persist or notify: the state is already durable and nothing
    /// has observably changed yet.
    pub fn load(&mut self, state: TimerState) {
        self.state = state;
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &TimerState {
        &self.state
    }

    /// Whether the timer is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Milliseconds elapsed in the current run; 0 when idle.
    ///
    /// Recomputed from the start timestamp on every call, never cached, so it
    /// is correct across process restarts as long as the state was persisted.
    #[must_use]
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> i64 {
        match &self.state {
            TimerState::Running { start_time, .. } => (now - *start_time).num_milliseconds(),
            TimerState::Idle => 0,
        }
    }

    /// Registers a change observer. Observers fire synchronously after every
    /// state-mutating operation, before it returns.
    pub fn on_change<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut(&TimerState) + 'static,
    {
        self.notifier.subscribe(callback)
    }

    /// Removes a change observer registered with [`Timer::on_change`].
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.notifier.unsubscribe(subscription)
    }

    /// Starts tracking `project_id` at `now`.
    ///
    /// Never rejected: a running timer is stopped first (finalizing its
    /// session through the sink), so start always means "switch". Returns the
    /// session finalized by that implicit stop, if there was one.
    pub fn start<S: SessionSink>(
        &mut self,
        sink: &mut S,
        project_id: ProjectId,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, TimerError> {
        let finished = self.stop(sink, now)?;

        tracing::debug!(project = %project_id, "timer started");
        self.state = TimerState::Running {
            project_id,
            start_time: now,
        };
        self.persist_and_notify()?;
        Ok(finished)
    }

    /// Stops the current run at `now`, finalizing it into a session.
    ///
    /// No-op when idle. This is the only path by which live tracking enters
    /// the store.
    pub fn stop<S: SessionSink>(
        &mut self,
        sink: &mut S,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, TimerError> {
        let TimerState::Running {
            project_id,
            start_time,
        } = self.state.clone()
        else {
            return Ok(None);
        };

        let session = sink
            .append_session(NewSession {
                project: project_id,
                start: start_time,
                end: now,
            })
            .map_err(TimerError::Record)?;

        tracing::debug!(project = %session.project, duration_ms = session.duration_ms(), "timer stopped");
        self.state = TimerState::Idle;
        self.persist_and_notify()?;
        Ok(Some(session))
    }

    /// Forces idle without creating a session, deliberately losing the
    /// in-progress interval.
    pub fn discard(&mut self) -> Result<(), TimerError> {
        if let Some(project_id) = self.state.project_id() {
            tracing::debug!(project = %project_id, "in-progress run discarded");
        }
        self.state = TimerState::Idle;
        self.persist_and_notify()
    }

    /// Records a past interval without touching the live timer state.
    ///
    /// Rejects `end <= start` before any mutation. Observers are notified so
    /// displays refresh, but the live state is untouched and not re-persisted.
    pub fn add_manual<S: SessionSink>(
        &mut self,
        sink: &mut S,
        project_id: ProjectId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Session, TimerError> {
        if end <= start {
            return Err(ValidationError::InvalidRange { start, end }.into());
        }

        let session = sink
            .append_session(NewSession {
                project: project_id,
                start,
                end,
            })
            .map_err(TimerError::Record)?;

        self.notifier.emit(&self.state);
        Ok(session)
    }

    fn persist_and_notify(&mut self) -> Result<(), TimerError> {
        // The in-memory transition stays in place even when the write fails;
        // observers only hear about states that reached the persist callback.
        (self.persist)(&self.state).map_err(TimerError::Persist)?;
        self.notifier.emit(&self.state);
        Ok(())
    }
}
