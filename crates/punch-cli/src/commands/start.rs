//! Start command: begin tracking a project, switching if one is running.

use anyhow::Result;
use chrono::Utc;

use punch_core::{Timer, format_hm};
use punch_store::Store;

use crate::commands::util::resolve_project;

pub fn run(store: &mut Store, timer: &mut Timer, project_key: &str) -> Result<()> {
    let project = resolve_project(store, project_key)?;
    let project_id = project.id.clone();
    let name = project.name.clone();

    let finished = timer.start(store, project_id, Utc::now())?;

    if let Some(previous) = finished {
        let previous_name = store
            .project(&previous.project)
            .map_or_else(|| previous.project.to_string(), |p| p.name.clone());
        println!(
            "Recorded {} on {previous_name}, now tracking {name}",
            format_hm(previous.duration_ms())
        );
    } else {
        println!("Started tracking {name}");
    }
    Ok(())
}
