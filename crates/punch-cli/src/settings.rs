//! The settings document: persisted timer state plus goal numbers.
//!
//! A small camelCase JSON file, separate from the time data document:
//!
//! ```json
//! {
//!   "timerState": { "status": "idle" },
//!   "dailyGoalMins": [240, 240, 240, 240, 240, 240, 240],
//!   "streakTargetMins": 60
//! }
//! ```
//!
//! The tracking core never reads this file itself: the composition root
//! loads it at startup, hands `timerState` to the timer, and injects a
//! callback that writes the document back after every timer transition.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use punch_core::TimerState;

/// Default daily goal in minutes (4 hours), applied to every weekday.
const DEFAULT_DAILY_GOAL_MINS: i64 = 240;

/// Default streak target in minutes (1 hour per day).
const DEFAULT_STREAK_TARGET_MINS: i64 = 60;

/// Settings document errors.
#[derive(Debug, Error)]
pub enum SettingsError {
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

    /// The document exists but is not valid settings.
    #[error("malformed settings in {}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory settings could not be serialized.
    #[error("failed to encode settings")]
    Encode(#[source] serde_json::Error),
}

/// Persisted settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// The live timer pointer, restored at startup.
    pub timer_state: TimerState,

    /// Daily goal in minutes, Sunday through Saturday.
    pub daily_goal_mins: [i64; 7],

    /// Minimum tracked time per day for the streak, in minutes.
    pub streak_target_mins: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timer_state: TimerState::Idle,
            daily_goal_mins: [DEFAULT_DAILY_GOAL_MINS; 7],
            streak_target_mins: DEFAULT_STREAK_TARGET_MINS,
        }
    }
}

impl Settings {
    /// The goal for a calendar day, in milliseconds.
    #[must_use]
    pub fn goal_ms_for(&self, date: NaiveDate) -> i64 {
        let weekday = date.weekday().num_days_from_sunday() as usize;
        self.daily_goal_mins[weekday] * 60_000
    }

    /// The streak threshold in milliseconds.
    #[must_use]
    pub const fn streak_target_ms(&self) -> i64 {
        self.streak_target_mins * 60_000
    }
}

/// Loads settings, falling back to defaults when the file doesn't exist.
pub fn load(path: &Path) -> Result<Settings, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            serde_json::from_str(&content).map_err(|source| SettingsError::Malformed {
                path: path.to_path_buf(),
                source,
            })
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Settings::default()),
        Err(source) => Err(SettingsError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes settings, creating the parent directory if needed.
pub fn save(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    let json = serde_json::to_string_pretty(settings).map_err(SettingsError::Encode)?;
    std::fs::write(path, json).map_err(|source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "settings saved");
    Ok(())
}
