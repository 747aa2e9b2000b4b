//! Session maintenance: list, edit, delete by stable ID.

use anyhow::{Context, Result};
use chrono::{Duration, Local};

use punch_core::{NewSession, format_clock, format_hm};
use punch_store::Store;

use crate::commands::util::{
    local_to_utc, parse_date, parse_time, resolve_project, resolve_session_id, short_id,
};

/// Lists sessions for a day, oldest first.
pub fn list(store: &Store, back: u32) -> Result<()> {
    let date = Local::now().date_naive() - Duration::days(i64::from(back));
    let mut sessions = store.day_sessions_of(date);
    sessions.sort_by_key(|s| s.start);

    println!(
        "Sessions for {date} ({} recorded)",
        format_hm(store.total_for_day(date))
    );
    if sessions.is_empty() {
        println!("  (none)");
        return Ok(());
    }

    for session in sessions {
        let name = store
            .project(&session.project)
            .map_or_else(|| session.project.to_string(), |p| p.name.clone());
        println!(
            "  {}  {} - {}  {:>8}  {name}",
            short_id(&session.id),
            format_clock(session.start.with_timezone(&Local)),
            format_clock(session.end.with_timezone(&Local)),
            format_hm(session.duration_ms()),
        );
    }
    Ok(())
}

/// Edits a session in place, keeping its ID.
///
/// Unset flags keep the session's current values; the date defaults to the
/// session's current local date. An edit that would make the end precede the
/// start is rejected by the store before anything is written.
pub fn edit(
    store: &mut Store,
    id_prefix: &str,
    project: Option<&str>,
    date: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<()> {
    let id = resolve_session_id(store, id_prefix)?;
    let existing = store.session(&id).cloned().context("session not found")?;

    let project_id = match project {
        Some(key) => resolve_project(store, key)?.id.clone(),
        None => existing.project.clone(),
    };
    let base_date = match date {
        Some(d) => parse_date(d)?,
        None => existing.start.with_timezone(&Local).date_naive(),
    };
    let start_time = match start {
        Some(t) => parse_time(t)?,
        None => existing.start.with_timezone(&Local).time(),
    };
    let end_time = match end {
        Some(t) => parse_time(t)?,
        None => existing.end.with_timezone(&Local).time(),
    };

    let draft = NewSession {
        project: project_id,
        start: local_to_utc(base_date, start_time)?,
        end: local_to_utc(base_date, end_time)?,
    };
    let changed = store.update_session(&id, draft)?;
    if changed {
        println!("Updated session {}", short_id(&id));
    } else {
        println!("Session {} not found", short_id(&id));
    }
    Ok(())
}

/// Deletes a session by ID or unique prefix.
pub fn delete(store: &mut Store, id_prefix: &str) -> Result<()> {
    let id = resolve_session_id(store, id_prefix)?;
    if store.delete_session(&id)? {
        println!("Deleted session {}", short_id(&id));
    } else {
        println!("Session {} not found", short_id(&id));
    }
    Ok(())
}
