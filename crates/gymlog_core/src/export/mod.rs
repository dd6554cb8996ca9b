//! Export documents: pretty JSON slices of the state and a plain-text
//! training report, each paired with its download file name.
//!
//! # Invariants
//! - Week and day slices only contain summary logs dated inside
//!   `[week_start, week_start + 7 days)`.
//! - A day export with no logs is an error; every other export may be
//!   empty.

mod text;

use crate::dates::{format_iso, month_name_long, parse_custom_date, week_of_month};
use crate::model::day::day_label;
use crate::model::exercise::ExerciseLog;
use crate::model::state::AppState;
use crate::service::logs::dated_in_week;
use crate::service::store::{StoreError, StoreResult};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub use text::{format_log_text, summary_text, EMPTY_EXPORT_TEXT};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static SLUG_REJECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9-]").expect("valid slug regex"));

/// Rendered export ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub contents: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummarySlice<'a> {
    summary_logs: Vec<&'a ExerciseLog>,
}

/// Whole state as pretty JSON.
pub fn export_full(state: &AppState, today: NaiveDate) -> StoreResult<ExportFile> {
    Ok(ExportFile {
        filename: format!("progreso-gym-completo-{}.json", format_iso(today)),
        contents: serde_json::to_string_pretty(state)?,
    })
}

/// Every summary log wrapped as `{ "summaryLogs": [...] }`.
pub fn export_summary(state: &AppState, today: NaiveDate) -> StoreResult<ExportFile> {
    let slice = SummarySlice {
        summary_logs: state.summary_logs.iter().collect(),
    };
    Ok(ExportFile {
        filename: format!("resumen-progreso-gym-global-{}.json", format_iso(today)),
        contents: serde_json::to_string_pretty(&slice)?,
    })
}

/// Summary logs of one week.
pub fn export_week(state: &AppState, week_start: &str, today: NaiveDate) -> StoreResult<ExportFile> {
    let start = parse_start(week_start, today)?;
    let slice = SummarySlice {
        summary_logs: week_logs(state, start, today).collect(),
    };
    Ok(ExportFile {
        filename: format!("{}.json", week_file_stem(start)),
        contents: serde_json::to_string_pretty(&slice)?,
    })
}

/// Summary logs of one day inside a week.
///
/// # Errors
/// `NothingToExport` when the day has no logs in that week.
pub fn export_day(
    state: &AppState,
    week_start: &str,
    day: &str,
    today: NaiveDate,
) -> StoreResult<ExportFile> {
    let start = parse_start(week_start, today)?;
    let logs: Vec<&ExerciseLog> = day_logs(state, start, day, today).collect();
    if logs.is_empty() {
        return Err(StoreError::NothingToExport);
    }
    let slice = SummarySlice { summary_logs: logs };
    Ok(ExportFile {
        filename: format!("{}.json", day_file_stem(week_start, day)),
        contents: serde_json::to_string_pretty(&slice)?,
    })
}

/// Plain-text report of every summary log.
pub fn export_summary_text(state: &AppState, today: NaiveDate) -> ExportFile {
    ExportFile {
        filename: format!("resumen-progreso-gym-global-{}.txt", format_iso(today)),
        contents: summary_text(&state.summary_logs, today),
    }
}

/// Full text export; the text report only covers the summary.
pub fn export_full_text(state: &AppState, today: NaiveDate) -> ExportFile {
    export_summary_text(state, today)
}

pub fn export_week_text(state: &AppState, week_start: &str, today: NaiveDate) -> StoreResult<ExportFile> {
    let start = parse_start(week_start, today)?;
    let logs: Vec<&ExerciseLog> = week_logs(state, start, today).collect();
    Ok(ExportFile {
        filename: format!("{}.txt", week_file_stem(start)),
        contents: summary_text(logs, today),
    })
}

/// Text report for one day: a title line, then each log in summary order.
///
/// # Errors
/// `NothingToExport` when the day has no logs in that week.
pub fn export_day_text(
    state: &AppState,
    week_start: &str,
    day: &str,
    today: NaiveDate,
) -> StoreResult<ExportFile> {
    let start = parse_start(week_start, today)?;
    let logs: Vec<&ExerciseLog> = day_logs(state, start, day, today).collect();
    if logs.is_empty() {
        return Err(StoreError::NothingToExport);
    }
    Ok(ExportFile {
        filename: format!("{}.txt", day_file_stem(week_start, day)),
        contents: text::day_text(day, start, &logs, today),
    })
}

/// File-name slug of a label: `Pecho y Bíceps` becomes `pecho-y-biceps`.
pub fn slugify(label: &str) -> String {
    let folded: String = label.to_lowercase().chars().map(fold_accent).collect();
    let replaced = folded.replace('&', "y");
    let dashed = WHITESPACE_RE.replace_all(&replaced, "-");
    SLUG_REJECT_RE.replace_all(&dashed, "").into_owned()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

fn parse_start(week_start: &str, today: NaiveDate) -> StoreResult<NaiveDate> {
    parse_custom_date(week_start, today).ok_or_else(|| StoreError::InvalidDate(week_start.to_string()))
}

fn week_logs<'a>(
    state: &'a AppState,
    start: NaiveDate,
    today: NaiveDate,
) -> impl Iterator<Item = &'a ExerciseLog> {
    state
        .summary_logs
        .iter()
        .filter(move |log| dated_in_week(log, start, today))
}

fn day_logs<'a>(
    state: &'a AppState,
    start: NaiveDate,
    day: &'a str,
    today: NaiveDate,
) -> impl Iterator<Item = &'a ExerciseLog> {
    week_logs(state, start, today).filter(move |log| log.day == day)
}

fn week_file_stem(start: NaiveDate) -> String {
    format!(
        "resumen-semana-{}-{}-{}",
        week_of_month(start),
        month_name_long(start),
        start.year()
    )
}

fn day_file_stem(week_start: &str, day: &str) -> String {
    format!("resumen-ejercicios-{}-{week_start}", slugify(day_label(day)))
}
