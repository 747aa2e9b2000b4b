//! Report command for aggregated period totals.
//!
//! Implements `punch report` with period options (--day, --week, --month)
//! and output formats (human-readable table, JSON). All aggregation is
//! read-only, composed from the store's range query and the summary helpers.

use std::fmt::Write as _;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

use punch_core::summary::DayTotal;
use punch_core::{format_hm, period, summary};
use punch_store::Store;

/// Report period type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    const fn noun(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

/// One project's share of the period, sorted descending by total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub id: String,
    pub name: String,
    pub total_ms: i64,
}

/// Computed report data.
#[derive(Debug)]
pub struct ReportData {
    pub generated_at: DateTime<Utc>,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub period: Period,
    pub timezone: String,
    pub rows: Vec<ReportRow>,
    pub days: Vec<DayTotal>,
    pub total_ms: i64,
    pub session_count: usize,
}

// ========== Period Date Calculation ==========

/// Boundaries for a given period, using the provided date as reference.
pub fn get_period_bounds(period: Period, today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    match period {
        Period::Day => period::day_bounds(today),
        Period::Week => period::week_bounds(today),
        Period::Month => period::month_bounds(today),
    }
}

// ========== Progress Bar ==========

/// Generates a 10-character progress bar.
/// Values <5% of max get a single block for visibility.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn progress_bar(value: i64, max: i64) -> String {
    if max == 0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = value as f64 / max as f64;
    let filled = if ratio < 0.05 && value > 0 {
        1 // Minimum 1 for visibility
    } else {
        // Clamp to 10 in case value > max
        (ratio * 10.0).round().min(10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

// ========== Report Generation ==========

/// Computes report data for the period containing `today`.
pub fn generate_report_data(
    store: &Store,
    report_period: Period,
    today: NaiveDate,
    generated_at: DateTime<Utc>,
) -> ReportData {
    let (period_start, period_end) = get_period_bounds(report_period, today);
    let sessions = store.sessions_in_range(period_start, period_end);

    let rows: Vec<ReportRow> =
        summary::project_totals(sessions.iter().copied(), period_start, period_end)
            .into_iter()
            .map(|t| ReportRow {
                id: t.project.to_string(),
                name: store
                    .project(&t.project)
                    .map_or_else(|| t.project.to_string(), |p| p.name.clone()),
                total_ms: t.total_ms,
            })
            .collect();

    let from = period_start.with_timezone(&Local).date_naive();
    let until = period_end.with_timezone(&Local).date_naive();
    let day_count = u32::try_from((until - from).num_days()).unwrap_or(0);
    let days = summary::daily_totals(&sessions, from, day_count);

    let total_ms = summary::total_time_in_range(sessions.iter().copied(), period_start, period_end);
    let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());

    ReportData {
        generated_at,
        period_start,
        period_end,
        period: report_period,
        timezone,
        rows,
        days,
        total_ms,
        session_count: sessions.len(),
    }
}

/// Formats the period description for the report header.
fn format_period_label(data: &ReportData) -> String {
    let start_date = data.period_start.with_timezone(&Local).date_naive();
    match data.period {
        Period::Day => format!("{}", start_date.format("%A, %b %-d, %Y")),
        Period::Week => format!("Week of {}", start_date.format("%b %-d, %Y")),
        Period::Month => format!("{}", start_date.format("%B %Y")),
    }
}

/// Formats the human-readable report output.
#[allow(clippy::cast_possible_wrap)]
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();

    writeln!(output, "TIME REPORT: {}", format_period_label(data)).unwrap();

    if data.rows.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "No sessions recorded this {}.", data.period.noun()).unwrap();
        return output;
    }

    // BY PROJECT section, scaled against the largest project
    let max_project = data.rows.iter().map(|r| r.total_ms).max().unwrap_or(0);
    writeln!(output).unwrap();
    writeln!(output, "BY PROJECT").unwrap();
    writeln!(output, "──────────").unwrap();
    for row in &data.rows {
        let duration = format_hm(row.total_ms);
        let bar = progress_bar(row.total_ms, max_project);
        writeln!(output, "{:<24}{duration:>8}  {bar}", row.name).unwrap();
    }

    // DAILY section, skipped for single-day reports
    if data.days.len() > 1 {
        let max_day = data.days.iter().map(|d| d.total_ms).max().unwrap_or(0);
        writeln!(output).unwrap();
        writeln!(output, "DAILY").unwrap();
        writeln!(output, "─────").unwrap();
        for day in &data.days {
            let label = day.date.format("%a %b %-d").to_string();
            let duration = format_hm(day.total_ms);
            let bar = progress_bar(day.total_ms, max_day);
            writeln!(output, "{label:<12}{duration:>8}  {bar}").unwrap();
        }
    }

    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(output, "Total tracked:  {}", format_hm(data.total_ms)).unwrap();
    if data.days.len() > 1 {
        let average = data.total_ms / data.days.len() as i64;
        writeln!(output, "Daily average:  {}", format_hm(average)).unwrap();
    }

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub generated_at: String,
    pub timezone: String,
    pub period: JsonPeriod,
    pub projects: Vec<JsonProjectEntry>,
    pub days: Vec<JsonDayEntry>,
    pub totals: JsonTotals,
}

#[derive(Debug, Serialize)]
pub struct JsonPeriod {
    pub start: String,
    pub end: String,
    #[serde(rename = "type")]
    pub period_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct JsonProjectEntry {
    pub id: String,
    pub name: String,
    pub total_ms: i64,
}

#[derive(Debug, Serialize)]
pub struct JsonDayEntry {
    pub date: String,
    pub total_ms: i64,
}

#[derive(Debug, Serialize)]
pub struct JsonTotals {
    pub total_ms: i64,
    pub session_count: usize,
}

/// Formats report data as JSON.
pub fn format_report_json(data: &ReportData) -> Result<String> {
    let local_start = data.period_start.with_timezone(&Local);
    let local_end = data.period_end.with_timezone(&Local);

    // period_end is the first moment of the next period; the JSON end date
    // is the last day of this period (inclusive)
    let end_date = (local_end.date_naive() - chrono::Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();

    let report = JsonReport {
        generated_at: data.generated_at.to_rfc3339(),
        timezone: data.timezone.clone(),
        period: JsonPeriod {
            start: local_start.date_naive().format("%Y-%m-%d").to_string(),
            end: end_date,
            period_type: data.period.noun(),
        },
        projects: data
            .rows
            .iter()
            .map(|r| JsonProjectEntry {
                id: r.id.clone(),
                name: r.name.clone(),
                total_ms: r.total_ms,
            })
            .collect(),
        days: data
            .days
            .iter()
            .map(|d| JsonDayEntry {
                date: d.date.format("%Y-%m-%d").to_string(),
                total_ms: d.total_ms,
            })
            .collect(),
        totals: JsonTotals {
            total_ms: data.total_ms,
            session_count: data.session_count,
        },
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run(store: &Store, report_period: Period, json: bool) -> Result<()> {
    let data = generate_report_data(store, report_period, Local::now().date_naive(), Utc::now());

    if json {
        println!("{}", format_report_json(&data)?);
    } else {
        print!("{}", format_report(&data));
    }

    Ok(())
}
