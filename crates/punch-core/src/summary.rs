//! Aggregation over recorded sessions.
//!
//! A pure read-only layer: totals, per-project grouping, and calendar-day
//! buckets for chart rendering. Safe to call at arbitrary frequency; nothing
//! here mutates state.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::period;
use crate::session::Session;
use crate::types::ProjectId;

/// Sum of `end - start` over the given sessions, unclamped.
pub fn total_time<'a>(sessions: impl IntoIterator<Item = &'a Session>) -> i64 {
    sessions.into_iter().map(Session::duration_ms).sum()
}

/// Sum of each session's overlap with `[range_start, range_end)`.
///
/// A session partially overlapping the range contributes only the
/// overlapping portion. Distinct from the start-anchored range *filter*:
/// this is true interval overlap.
pub fn total_time_in_range<'a>(
    sessions: impl IntoIterator<Item = &'a Session>,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> i64 {
    sessions
        .into_iter()
        .map(|s| s.clamped_ms(range_start, range_end))
        .sum()
}

/// Groups sessions by project ID, preserving first-seen project order.
pub fn group_by_project<'a>(
    sessions: impl IntoIterator<Item = &'a Session>,
) -> Vec<(&'a ProjectId, Vec<&'a Session>)> {
    let mut groups: Vec<(&ProjectId, Vec<&Session>)> = Vec::new();
    for session in sessions {
        match groups.iter_mut().find(|(id, _)| *id == &session.project) {
            Some((_, group)) => group.push(session),
            None => groups.push((&session.project, vec![session])),
        }
    }
    groups
}

/// Clamped total for one project over a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTotal {
    pub project: ProjectId,
    pub total_ms: i64,
}

/// Per-project clamped totals over `[range_start, range_end)`, sorted by
/// descending total. Ties keep first-seen project order (stable sort).
pub fn project_totals<'a>(
    sessions: impl IntoIterator<Item = &'a Session>,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> Vec<ProjectTotal> {
    let mut totals: Vec<ProjectTotal> = group_by_project(sessions)
        .into_iter()
        .map(|(id, group)| ProjectTotal {
            project: id.clone(),
            total_ms: total_time_in_range(group, range_start, range_end),
        })
        .collect();
    totals.sort_by_key(|t| std::cmp::Reverse(t.total_ms));
    totals
}

/// Clamped total for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub total_ms: i64,
}

/// Buckets sessions into `days` consecutive calendar days starting at `from`.
///
/// Each day's total is the clamped overlap of the given sessions with that
/// day's local bounds, so a session spilling past midnight is split across
/// the days it covers.
pub fn daily_totals(sessions: &[&Session], from: NaiveDate, days: u32) -> Vec<DayTotal> {
    (0..days)
        .map(|offset| {
            let date = from + Duration::days(i64::from(offset));
            let (start, end) = period::day_bounds(date);
            DayTotal {
                date,
                total_ms: total_time_in_range(sessions.iter().copied(), start, end),
            }
        })
        .collect()
}
