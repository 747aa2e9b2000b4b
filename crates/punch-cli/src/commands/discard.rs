//! Discard command: drop the in-progress interval without recording it.

use anyhow::Result;
use chrono::Utc;

use punch_core::{Timer, TimerState, format_hm};

pub fn run(timer: &mut Timer) -> Result<()> {
    match timer.state().clone() {
        TimerState::Running {
            project_id,
            start_time,
        } => {
            let lost_ms = (Utc::now() - start_time).num_milliseconds();
            timer.discard()?;
            println!("Discarded {} on {project_id}", format_hm(lost_ms));
        }
        TimerState::Idle => println!("No timer running."),
    }
    Ok(())
}
