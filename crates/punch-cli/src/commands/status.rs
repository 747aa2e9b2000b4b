//! Status command: the timer state and today's progress.

use std::io::{self, Write};

use anyhow::Result;
use chrono::{DateTime, Local, Utc};

use punch_core::{TimerState, format_clock, format_hm, format_hms, period};
use punch_store::Store;

use crate::settings::Settings;

pub fn run(store: &Store, settings: &Settings, watch: bool) -> Result<()> {
    if watch {
        watch_loop(store, settings)
    } else {
        let mut stdout = io::stdout();
        render(&mut stdout, store, settings, Utc::now())
    }
}

/// The running timer's contribution to today, clamped to local midnight so a
/// run that crossed into today only counts today's part.
fn running_ms_today(state: &TimerState, now: DateTime<Utc>) -> i64 {
    let TimerState::Running { start_time, .. } = state else {
        return 0;
    };
    let today = now.with_timezone(&Local).date_naive();
    let (day_start, _) = period::day_bounds(today);
    (now - (*start_time).max(day_start)).num_milliseconds().max(0)
}

fn render<W: Write>(
    writer: &mut W,
    store: &Store,
    settings: &Settings,
    now: DateTime<Utc>,
) -> Result<()> {
    let today = now.with_timezone(&Local).date_naive();

    match &settings.timer_state {
        TimerState::Running {
            project_id,
            start_time,
        } => {
            let name = store
                .project(project_id)
                .map_or_else(|| project_id.to_string(), |p| p.name.clone());
            let elapsed = (now - *start_time).num_milliseconds();
            writeln!(
                writer,
                "Timer: running {name} (since {}, {})",
                format_clock(start_time.with_timezone(&Local)),
                format_hms(elapsed)
            )?;
        }
        TimerState::Idle => writeln!(writer, "Timer: idle")?,
    }

    let total = store.total_for_day(today) + running_ms_today(&settings.timer_state, now);
    writeln!(
        writer,
        "Today: {} / {} goal",
        format_hm(total),
        format_hm(settings.goal_ms_for(today))
    )?;

    let days = store.streak(settings.streak_target_ms(), today);
    let unit = if days == 1 { "day" } else { "days" };
    writeln!(writer, "Streak: {days} {unit}")?;
    Ok(())
}

/// Single-line summary for watch mode.
fn watch_line(store: &Store, settings: &Settings, now: DateTime<Utc>) -> String {
    let today = now.with_timezone(&Local).date_naive();
    let total = store.total_for_day(today) + running_ms_today(&settings.timer_state, now);

    match &settings.timer_state {
        TimerState::Running {
            project_id,
            start_time,
        } => {
            let name = store
                .project(project_id)
                .map_or_else(|| project_id.to_string(), |p| p.name.clone());
            format!(
                "{name} {} (today {})",
                format_hms((now - *start_time).num_milliseconds()),
                format_hm(total)
            )
        }
        TimerState::Idle => format!("idle (today {})", format_hm(total)),
    }
}

/// Re-renders once per second until interrupted.
///
/// Strictly read-only: the tick refreshes the elapsed display and never
/// mutates timer or store state.
fn watch_loop(store: &Store, settings: &Settings) -> Result<()> {
    loop {
        let line = watch_line(store, settings, Utc::now());
        print!("\r\x1b[2K{line}");
        io::stdout().flush()?;
        std::thread::sleep(std::time::Duration::from_secs(1));
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};
    use punch_core::{NewSession, ProjectId};

    use super::*;

    fn fixture() -> (tempfile::TempDir, Store, NaiveDate) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::load(dir.path().join("time-data.json")).unwrap();

        // 09:00-10:30 local on a fixed date, built from the local day start
        // so the test doesn't depend on the machine's timezone
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let (day_start, _) = period::day_bounds(date);
        store
            .add_session(NewSession {
                project: ProjectId::new("work").unwrap(),
                start: day_start + Duration::hours(9),
                end: day_start + Duration::hours(9) + Duration::minutes(90),
            })
            .unwrap();
        (dir, store, date)
    }

    #[test]
    fn status_idle_shows_recorded_total_and_streak() {
        let (_dir, store, date) = fixture();
        let (day_start, _) = period::day_bounds(date);
        let now = day_start + Duration::hours(12);

        let mut output = Vec::new();
        render(&mut output, &store, &Settings::default(), now).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output,
            "Timer: idle\nToday: 1h 30m / 4h 0m goal\nStreak: 1 day\n"
        );
    }

    #[test]
    fn status_running_adds_the_live_elapsed_time() {
        let (_dir, store, date) = fixture();
        let (day_start, _) = period::day_bounds(date);
        let now = day_start + Duration::hours(12);

        let settings = Settings {
            timer_state: TimerState::Running {
                project_id: ProjectId::new("work").unwrap(),
                start_time: day_start + Duration::hours(11),
            },
            ..Settings::default()
        };

        let mut output = Vec::new();
        render(&mut output, &store, &settings, now).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output,
            "Timer: running Work (since 11:00, 01:00:00)\nToday: 2h 30m / 4h 0m goal\nStreak: 1 day\n"
        );
    }

    #[test]
    fn running_time_is_clamped_to_local_midnight() {
        let (_dir, store, date) = fixture();
        let (day_start, _) = period::day_bounds(date);
        let now = day_start + Duration::hours(1);

        // Started an hour before midnight; only the hour since midnight
        // counts toward today
        let state = TimerState::Running {
            project_id: ProjectId::new("work").unwrap(),
            start_time: day_start - Duration::hours(1),
        };
        assert_eq!(running_ms_today(&state, now), 3_600_000);
    }

    #[test]
    fn watch_line_is_single_line() {
        let (_dir, store, date) = fixture();
        let (day_start, _) = period::day_bounds(date);
        let now = day_start + Duration::hours(12);

        let line = watch_line(&store, &Settings::default(), now);
        assert_eq!(line, "idle (today 1h 30m)");
        assert!(!line.contains('\n'));
    }
}
