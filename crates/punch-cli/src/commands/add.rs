//! Add command: record a past interval without touching the live timer.

use anyhow::Result;
use chrono::Local;

use punch_core::{Timer, format_hm};
use punch_store::Store;

use crate::commands::util::{local_to_utc, parse_date, parse_time, resolve_project};

pub fn run(
    store: &mut Store,
    timer: &mut Timer,
    project_key: &str,
    date: Option<&str>,
    start: &str,
    end: &str,
) -> Result<()> {
    let project = resolve_project(store, project_key)?;
    let project_id = project.id.clone();
    let name = project.name.clone();

    let date = match date {
        Some(d) => parse_date(d)?,
        None => Local::now().date_naive(),
    };
    let start = local_to_utc(date, parse_time(start)?)?;
    let end = local_to_utc(date, parse_time(end)?)?;

    let session = timer.add_manual(store, project_id, start, end)?;
    println!(
        "Added {} on {name} ({date})",
        format_hm(session.duration_ms())
    );
    Ok(())
}
