//! Storage layer for the punch time tracker.
//!
//! Persists projects and sessions as a single JSON document, loaded once at
//! startup and held in memory. Every mutating operation rewrites the whole
//! document through a temp-file-and-rename, then returns; there is no dirty
//! buffering and no transaction log. That is fine at personal-use scale but
//! is NOT safe for concurrent writers: two processes saving at once race on
//! the whole document and the last writer wins, silently dropping the
//! other's changes. Keep a single writer.
//!
//! # Document layout
//!
//! ```json
//! {
//!   "projects": [ { "id": "work", "name": "Work", "color": "#5f8eed", "icon": "briefcase" } ],
//!   "sessions": [ { "id": "…", "project": "work", "start": "2024-01-01T09:00:00Z", "end": "…" } ]
//! }
//! ```
//!
//! Timestamps are ISO 8601 strings in UTC. The layout is round-trip stable:
//! load → save → load yields identical data. Session IDs are UUIDs assigned
//! at insertion; they are the stable handles for edit and delete, replacing
//! positions in the list (which any insertion or deletion would invalidate).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use punch_core::{
    DynError, NewSession, Project, ProjectId, ProjectUpdate, Session, SessionId, SessionSink,
    ValidationError, default_projects, period, summary,
};

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The document exists but could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document could not be written.
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document exists but is not valid time data.
    ///
    /// Deliberately fatal rather than silently replaced with defaults: the
    /// host decides whether to restore or delete the file.
    #[error("malformed time data in {}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory data could not be serialized.
    #[error("failed to encode time data")]
    Encode(#[source] serde_json::Error),

    /// A project with this ID already exists.
    #[error("project {id} already exists")]
    DuplicateProject { id: ProjectId },

    /// A field or interval failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// The whole persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeData {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

/// The durable collection of projects and sessions.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    data: TimeData,
}

fn generate_session_id() -> SessionId {
    SessionId::new(Uuid::new_v4().to_string()).expect("UUID string is never empty")
}

impl Store {
    /// Loads the document at `path`, seeding defaults when it doesn't exist.
    ///
    /// A missing file initializes the store with the default projects and
    /// persists immediately. An unreadable or malformed file is an error,
    /// propagated rather than swallowed.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        match fs::read_to_string(&path) {
            Ok(content) => {
                let data = serde_json::from_str(&content).map_err(|source| {
                    StoreError::Malformed {
                        path: path.clone(),
                        source,
                    }
                })?;
                tracing::debug!(path = %path.display(), "time data loaded");
                Ok(Self { path, data })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let store = Self {
                    path,
                    data: TimeData {
                        projects: default_projects(),
                        sessions: Vec::new(),
                    },
                };
                store.save()?;
                tracing::info!(
                    path = %store.path.display(),
                    "initialized time data with default projects"
                );
                Ok(store)
            }
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    /// Serializes the full document and writes it atomically.
    pub fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.data).map_err(StoreError::Encode)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        // Write the sibling temp file first so a crash mid-write can never
        // leave a truncated document behind.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), "time data saved");
        Ok(())
    }

    /// Where the document lives on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ========== Projects ==========

    /// All projects, in creation order.
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.data.projects
    }

    /// Looks up a project by ID.
    #[must_use]
    pub fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.data.projects.iter().find(|p| &p.id == id)
    }

    /// Adds a project and persists. Project IDs must be unique.
    pub fn add_project(&mut self, project: Project) -> Result<(), StoreError> {
        if self.project(&project.id).is_some() {
            return Err(StoreError::DuplicateProject { id: project.id });
        }
        self.data.projects.push(project);
        self.save()
    }

    /// Applies a field-by-field patch to a project and persists.
    ///
    /// Returns `Ok(false)` without writing when the ID is unknown.
    pub fn update_project(
        &mut self,
        id: &ProjectId,
        update: &ProjectUpdate,
    ) -> Result<bool, StoreError> {
        let Some(project) = self.data.projects.iter_mut().find(|p| &p.id == id) else {
            return Ok(false);
        };
        update.apply(project);
        self.save()?;
        Ok(true)
    }

    /// Deletes a project and every session referencing it, then persists.
    ///
    /// Returns `Ok(false)` without writing when the ID is unknown. Whether
    /// deleting the last remaining project should be allowed is the caller's
    /// policy, not enforced here.
    pub fn delete_project(&mut self, id: &ProjectId) -> Result<bool, StoreError> {
        let before = self.data.projects.len();
        self.data.projects.retain(|p| &p.id != id);
        if self.data.projects.len() == before {
            return Ok(false);
        }

        let sessions_before = self.data.sessions.len();
        self.data.sessions.retain(|s| &s.project != id);
        tracing::debug!(
            project = %id,
            cascaded = sessions_before - self.data.sessions.len(),
            "project deleted"
        );
        self.save()?;
        Ok(true)
    }

    // ========== Sessions ==========

    /// All sessions. Insertion order is not semantically meaningful; queries
    /// must not assume ordering.
    #[must_use]
    pub fn sessions(&self) -> &[Session] {
        &self.data.sessions
    }

    /// Looks up a session by its stable ID.
    #[must_use]
    pub fn session(&self, id: &SessionId) -> Option<&Session> {
        self.data.sessions.iter().find(|s| &s.id == id)
    }

    /// Records a session draft, assigning its stable ID, and persists.
    ///
    /// The referenced project is not checked: a session may point at a
    /// since-deleted project until cascade cleanup runs.
    pub fn add_session(&mut self, draft: NewSession) -> Result<&Session, StoreError> {
        let session = Session::new(generate_session_id(), draft.project, draft.start, draft.end)?;
        self.data.sessions.push(session);
        self.save()?;
        Ok(self.data.sessions.last().expect("session was just pushed"))
    }

    /// Replaces a session's fields in place, keeping its ID, and persists.
    ///
    /// Edited intervals must satisfy `end > start`; violations are rejected
    /// before any mutation. Returns `Ok(false)` without writing when the ID
    /// is unknown.
    pub fn update_session(
        &mut self,
        id: &SessionId,
        draft: NewSession,
    ) -> Result<bool, StoreError> {
        if draft.end <= draft.start {
            return Err(ValidationError::InvalidRange {
                start: draft.start,
                end: draft.end,
            }
            .into());
        }
        let Some(session) = self.data.sessions.iter_mut().find(|s| &s.id == id) else {
            return Ok(false);
        };
        *session = Session::new(id.clone(), draft.project, draft.start, draft.end)?;
        self.save()?;
        Ok(true)
    }

    /// Deletes a session by ID and persists.
    ///
    /// Returns `Ok(false)` without writing when the ID is unknown.
    pub fn delete_session(&mut self, id: &SessionId) -> Result<bool, StoreError> {
        let before = self.data.sessions.len();
        self.data.sessions.retain(|s| &s.id != id);
        if self.data.sessions.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    // ========== Range queries ==========

    /// Sessions whose *start* falls in `[start, end)`.
    ///
    /// Start-anchored on purpose: only the start time is tested, however far
    /// the session runs past the range. Period totals that must count only
    /// the overlapping portion clamp separately via
    /// [`summary::total_time_in_range`].
    #[must_use]
    pub fn sessions_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&Session> {
        self.data
            .sessions
            .iter()
            .filter(|s| s.starts_in(start, end))
            .collect()
    }

    /// Sessions starting on the given local calendar day.
    #[must_use]
    pub fn day_sessions_of(&self, date: NaiveDate) -> Vec<&Session> {
        let (start, end) = period::day_bounds(date);
        self.sessions_in_range(start, end)
    }

    /// Sessions starting today.
    #[must_use]
    pub fn today_sessions(&self) -> Vec<&Session> {
        self.day_sessions_of(Local::now().date_naive())
    }

    /// Sessions starting in the week (Mon-Mon) containing the given day.
    #[must_use]
    pub fn week_sessions_of(&self, date: NaiveDate) -> Vec<&Session> {
        let (start, end) = period::week_bounds(date);
        self.sessions_in_range(start, end)
    }

    /// Sessions starting in the current week.
    #[must_use]
    pub fn week_sessions(&self) -> Vec<&Session> {
        self.week_sessions_of(Local::now().date_naive())
    }

    /// Sessions starting in the month containing the given day.
    #[must_use]
    pub fn month_sessions_of(&self, date: NaiveDate) -> Vec<&Session> {
        let (start, end) = period::month_bounds(date);
        self.sessions_in_range(start, end)
    }

    /// Sessions starting in the current month.
    #[must_use]
    pub fn month_sessions(&self) -> Vec<&Session> {
        self.month_sessions_of(Local::now().date_naive())
    }

    // ========== Aggregation ==========

    /// Clamped total for one local calendar day, over that day's sessions.
    #[must_use]
    pub fn total_for_day(&self, date: NaiveDate) -> i64 {
        let (start, end) = period::day_bounds(date);
        summary::total_time_in_range(self.sessions_in_range(start, end), start, end)
    }

    /// Consecutive calendar days, walking backward from `today`, whose
    /// clamped total meets `target_ms`.
    ///
    /// Today must already meet the threshold or the streak is 0, no matter
    /// how long the history before it: a day in progress that hasn't reached
    /// the target yet breaks the streak at "today".
    #[must_use]
    pub fn streak(&self, target_ms: i64, today: NaiveDate) -> u32 {
        if target_ms <= 0 {
            return 0;
        }
        let mut days = 0;
        let mut date = today;
        loop {
            if self.total_for_day(date) < target_ms {
                break;
            }
            days += 1;
            let Some(previous) = date.pred_opt() else {
                break;
            };
            date = previous;
        }
        days
    }
}

impl SessionSink for Store {
    fn append_session(&mut self, draft: NewSession) -> Result<Session, DynError> {
        let session = self.add_session(draft)?;
        Ok(session.clone())
    }
}
