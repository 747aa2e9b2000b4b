//! Sessions - finalized time intervals attributed to one project.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ProjectId, SessionId, ValidationError};

/// A recorded time interval attributed to one project.
///
/// Sessions are immutable once stored except through explicit edit or delete
/// operations addressed by their stable [`SessionId`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// Stable identifier assigned when the session is recorded.
    pub id: SessionId,

    /// The project this session is attributed to.
    ///
    /// Not enforced as referential integrity at write time: a session may
    /// reference a since-deleted project until cascade cleanup runs.
    pub project: ProjectId,

    /// When the interval began.
    pub start: DateTime<Utc>,

    /// When the interval ended. Never before `start`.
    pub end: DateTime<Utc>,
}

impl Session {
    /// Creates a session after validating the interval.
    ///
    /// `end == start` is allowed: stopping a timer within the millisecond it
    /// was started produces a zero-length session. Manual entries are held to
    /// the stricter `end > start` by their callers.
    pub fn new(
        id: SessionId,
        project: ProjectId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvalidRange { start, end });
        }
        Ok(Self {
            id,
            project,
            start,
            end,
        })
    }

    /// Full duration in milliseconds, unclamped.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.end - self.start).num_milliseconds()
    }

    /// The portion of this session overlapping `[range_start, range_end)`,
    /// in milliseconds, floored at 0.
    #[must_use]
    pub fn clamped_ms(&self, range_start: DateTime<Utc>, range_end: DateTime<Utc>) -> i64 {
        let start = self.start.max(range_start);
        let end = self.end.min(range_end);
        (end - start).num_milliseconds().max(0)
    }

    /// Whether this session's start falls in `[range_start, range_end)`.
    ///
    /// This is the start-anchored membership test used by range queries: only
    /// the start time is tested, however far the session runs past the range.
    #[must_use]
    pub fn starts_in(&self, range_start: DateTime<Utc>, range_end: DateTime<Utc>) -> bool {
        self.start >= range_start && self.start < range_end
    }
}

/// A session draft without an identifier.
///
/// The store assigns the [`SessionId`] when the draft is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub project: ProjectId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
