//! Streak command: consecutive days meeting the daily target.

use anyhow::Result;
use chrono::Local;

use punch_core::format_hm;
use punch_store::Store;

use crate::settings::Settings;

pub fn run(store: &Store, settings: &Settings) -> Result<()> {
    let today = Local::now().date_naive();
    let days = store.streak(settings.streak_target_ms(), today);
    let unit = if days == 1 { "day" } else { "days" };
    println!(
        "Current streak: {days} {unit} (target {}/day)",
        format_hm(settings.streak_target_ms())
    );
    Ok(())
}
