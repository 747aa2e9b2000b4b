//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Personal time tracker.
///
/// Punch a timer in and out against named projects, backfill intervals you
/// forgot to track live, and report daily/weekly/monthly totals and streaks.
#[derive(Debug, Parser)]
#[command(name = "punch", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the timer state and today's total.
    Status {
        /// Refresh once per second until interrupted.
        #[arg(long)]
        watch: bool,
    },

    /// Start tracking a project, switching if a timer is already running.
    Start {
        /// Project ID or name.
        project: String,
    },

    /// Stop the running timer and record the session.
    Stop,

    /// Drop the in-progress interval without recording it.
    Discard,

    /// Record a past interval without touching the live timer.
    Add {
        /// Project ID or name.
        #[arg(long)]
        project: String,

        /// Date of the entry (YYYY-MM-DD, defaults to today).
        #[arg(long)]
        date: Option<String>,

        /// Start of the interval (HH:MM, local time).
        #[arg(long)]
        start: String,

        /// End of the interval (HH:MM, local time). Must be after the start.
        #[arg(long)]
        end: String,
    },

    /// Aggregated totals for a period.
    Report {
        /// Report on the current week (Monday through Sunday). The default.
        #[arg(long, conflicts_with_all = ["month", "day"])]
        week: bool,

        /// Report on the current month.
        #[arg(long, conflicts_with = "day")]
        month: bool,

        /// Report on today.
        #[arg(long)]
        day: bool,

        /// Emit machine-readable JSON instead of the table.
        #[arg(long)]
        json: bool,
    },

    /// List, edit, or delete recorded sessions.
    Sessions {
        #[command(subcommand)]
        action: SessionsAction,
    },

    /// Manage projects.
    Projects {
        #[command(subcommand)]
        action: ProjectsAction,
    },

    /// Show the current daily streak.
    Streak,
}

/// Session maintenance actions.
#[derive(Debug, Subcommand)]
pub enum SessionsAction {
    /// List sessions for a day.
    List {
        /// How many days back from today (0 = today).
        #[arg(long, default_value_t = 0)]
        back: u32,
    },

    /// Edit a session addressed by its ID (or unique ID prefix).
    Edit {
        /// Session ID or unique prefix.
        id: String,

        /// Reassign to this project (ID or name).
        #[arg(long)]
        project: Option<String>,

        /// Move to this date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,

        /// New start (HH:MM, local time).
        #[arg(long)]
        start: Option<String>,

        /// New end (HH:MM, local time).
        #[arg(long)]
        end: Option<String>,
    },

    /// Delete a session addressed by its ID (or unique ID prefix).
    Delete {
        /// Session ID or unique prefix.
        id: String,
    },
}

/// Project maintenance actions.
#[derive(Debug, Subcommand)]
pub enum ProjectsAction {
    /// List all projects.
    List,

    /// Create a project.
    Add {
        /// Display name; the ID is derived from it.
        name: String,

        /// Display color (hex or HSL string).
        #[arg(long)]
        color: Option<String>,

        /// Icon name (see `punch projects list` for the seeded examples).
        #[arg(long)]
        icon: Option<String>,
    },

    /// Change a project's name, color, or icon.
    Edit {
        /// Project ID or name.
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        icon: Option<String>,
    },

    /// Delete a project and every session recorded against it.
    Delete {
        /// Project ID or name.
        id: String,
    },
}
