//! Shared helpers for command implementations.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};

use punch_core::{Project, SessionId};
use punch_store::Store;

/// Resolves a project by exact ID, falling back to a case-insensitive name
/// match.
pub fn resolve_project<'a>(store: &'a Store, key: &str) -> Result<&'a Project> {
    if let Some(project) = store.projects().iter().find(|p| p.id.as_str() == key) {
        return Ok(project);
    }
    if let Some(project) = store
        .projects()
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(key))
    {
        return Ok(project);
    }
    let known = store
        .projects()
        .iter()
        .map(|p| p.id.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    bail!("no project matching '{key}' (known: {known})");
}

/// Resolves a session by full ID or unique ID prefix.
pub fn resolve_session_id(store: &Store, prefix: &str) -> Result<SessionId> {
    if prefix.is_empty() {
        bail!("session ID prefix cannot be empty");
    }
    let matches: Vec<&SessionId> = store
        .sessions()
        .iter()
        .map(|s| &s.id)
        .filter(|id| id.as_str().starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [] => bail!("no session with ID prefix '{prefix}'"),
        [id] => Ok((*id).clone()),
        _ => bail!(
            "session ID prefix '{prefix}' is ambiguous ({} matches)",
            matches.len()
        ),
    }
}

/// Shortened session ID for display.
#[must_use]
pub fn short_id(id: &SessionId) -> &str {
    id.as_str().get(..8).unwrap_or_else(|| id.as_str())
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

/// Parses an `HH:MM` wall-clock time.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .with_context(|| format!("invalid time '{s}', expected HH:MM"))
}

/// Interprets a local date and time as a UTC instant.
/// DST ambiguity resolves to the earlier time.
pub fn local_to_utc(date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>> {
    match Local.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt.with_timezone(&Utc)),
        LocalResult::None => bail!("{date} {time} does not exist in the local timezone"),
    }
}

/// Derives a project ID from a display name: lowercased, with runs of
/// non-alphanumeric characters collapsed to single dashes.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
