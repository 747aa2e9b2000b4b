//! Core domain logic for the punch time tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - The timer state machine: start/stop/discard transitions with persisted state
//! - Calendar periods: day/week/month boundary math in local time
//! - Aggregation: per-project grouping, clamped range totals, daily buckets
//! - Duration formatting for display

mod format;
pub mod notify;
pub mod period;
mod project;
mod session;
pub mod summary;
mod timer;
mod types;

pub use format::{format_clock, format_hm, format_hms};
pub use project::{AVAILABLE_ICONS, FALLBACK_ICON, Project, ProjectUpdate, default_projects};
pub use session::{NewSession, Session};
pub use timer::{DynError, PersistFn, SessionSink, Timer, TimerError, TimerState};
pub use types::{ProjectId, SessionId, ValidationError};
