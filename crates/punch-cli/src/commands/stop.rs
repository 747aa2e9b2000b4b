//! Stop command: finalize the running timer into a session.

use anyhow::Result;
use chrono::Utc;

use punch_core::{Timer, format_hm};
use punch_store::Store;

pub fn run(store: &mut Store, timer: &mut Timer) -> Result<()> {
    match timer.stop(store, Utc::now())? {
        Some(session) => {
            let name = store
                .project(&session.project)
                .map_or_else(|| session.project.to_string(), |p| p.name.clone());
            println!("Recorded {} on {name}", format_hm(session.duration_ms()));
        }
        None => println!("No timer running."),
    }
    Ok(())
}
