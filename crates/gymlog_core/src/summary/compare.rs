//! Session-to-session metric comparison and personal records.
//!
//! # Invariants
//! - Logs are only compared with logs of the same exercise name and sede.
//! - A metric gets a trend only when both sides parse.

use super::metrics::{distance_in_meters, parse_metric, parse_time_to_seconds};
use crate::dates::{compare_dates_desc, local_today, parse_custom_date};
use crate::model::day::is_cardio_day;
use crate::model::exercise::ExerciseLog;
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Direction of a metric against the previous session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Increase,
    Decrease,
    Same,
}

impl Trend {
    fn between(current: f64, previous: f64) -> Self {
        if current > previous {
            Self::Increase
        } else if current < previous {
            Self::Decrease
        } else {
            Self::Same
        }
    }
}

/// Per-metric trends; `None` where either side was missing or unparseable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricComparison {
    pub series: Option<Trend>,
    pub reps: Option<Trend>,
    pub kilos: Option<Trend>,
    pub tiempo: Option<Trend>,
    pub calorias: Option<Trend>,
}

impl MetricComparison {
    /// Compares every tracked metric of `current` against `previous`.
    pub fn between(current: &ExerciseLog, previous: &ExerciseLog) -> Self {
        let metric = |pick: fn(&ExerciseLog) -> Option<f64>| {
            Some(Trend::between(pick(current)?, pick(previous)?))
        };
        Self {
            series: metric(|log| parse_metric(&log.series)),
            reps: metric(|log| parse_metric(&log.reps)),
            kilos: metric(|log| parse_metric(&log.kilos)),
            tiempo: metric(|log| log.tiempo.as_deref().and_then(parse_time_to_seconds)),
            calorias: metric(|log| log.calorias.as_deref().and_then(parse_metric)),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Union of summary and daily logs by id, the daily copy winning.
///
/// Order follows first appearance: summary logs first, then daily-only ids.
pub fn comparison_pool<'a>(summary: &'a [ExerciseLog], daily: &'a [ExerciseLog]) -> Vec<&'a ExerciseLog> {
    let mut pool: Vec<&ExerciseLog> = Vec::with_capacity(summary.len() + daily.len());
    for log in summary.iter().chain(daily.iter()) {
        match pool.iter().position(|existing| existing.id == log.id) {
            Some(position) => pool[position] = log,
            None => pool.push(log),
        }
    }
    pool
}

/// Compares `log` with the newest earlier session of the same exercise.
///
/// The previous session must have a different id, the same name and sede,
/// and a date strictly before `log`'s. Undated logs compare with nothing.
pub fn compare_with_previous(log: &ExerciseLog, pool: &[&ExerciseLog]) -> MetricComparison {
    compare_with_previous_at(log, pool, local_today())
}

pub fn compare_with_previous_at(
    log: &ExerciseLog,
    pool: &[&ExerciseLog],
    today: NaiveDate,
) -> MetricComparison {
    let Some(current_date) = parse_custom_date(&log.date, today) else {
        return MetricComparison::default();
    };

    let previous = pool
        .iter()
        .filter(|candidate| same_exercise(candidate, log) && candidate.id != log.id)
        .filter_map(|candidate| {
            let date = parse_custom_date(&candidate.date, today)?;
            (date < current_date).then_some((date, *candidate))
        })
        .fold(None, |newest, (date, candidate)| match newest {
            Some((newest_date, _)) if newest_date >= date => newest,
            _ => Some((date, candidate)),
        });

    match previous {
        Some((_, previous)) => MetricComparison::between(log, previous),
        None => MetricComparison::default(),
    }
}

/// Dashboard view of the most recent session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Performance<'a> {
    /// Newest log in the pool.
    pub last_log: &'a ExerciseLog,
    /// Trends against the newest other session of the same exercise.
    pub comparison: MetricComparison,
    /// Best session of the same exercise and sede.
    pub personal_record: &'a ExerciseLog,
    /// Whether the newest log is the record.
    pub is_new_record: bool,
}

/// Newest-session summary with its comparison and personal record.
///
/// Returns `None` for an empty pool.
pub fn performance<'a>(pool: &[&'a ExerciseLog]) -> Option<Performance<'a>> {
    performance_at(pool, local_today())
}

pub fn performance_at<'a>(pool: &[&'a ExerciseLog], today: NaiveDate) -> Option<Performance<'a>> {
    let mut sorted: Vec<&'a ExerciseLog> = pool.to_vec();
    sorted.sort_by(|a, b| {
        compare_dates_desc(
            parse_custom_date(&a.date, today),
            parse_custom_date(&b.date, today),
        )
    });
    let last_log = *sorted.first()?;

    let comparison = sorted
        .iter()
        .find(|log| log.id != last_log.id && same_exercise(log, last_log))
        .map(|previous| MetricComparison::between(last_log, previous))
        .unwrap_or_default();

    let cardio = is_cardio_day(&last_log.day);
    let personal_record = pool
        .iter()
        .copied()
        .filter(|log| same_exercise(log, last_log))
        .reduce(|best, current| {
            let ordering = if cardio {
                compare_cardio(current, best)
            } else {
                compare_strength(current, best)
            };
            match ordering {
                Ordering::Greater => current,
                Ordering::Less => best,
                Ordering::Equal => older_of(best, current, today),
            }
        })
        .unwrap_or(last_log);

    Some(Performance {
        last_log,
        comparison,
        personal_record,
        is_new_record: personal_record.id == last_log.id,
    })
}

fn same_exercise(a: &ExerciseLog, b: &ExerciseLog) -> bool {
    a.exercise_name == b.exercise_name && a.sede == b.sede
}

/// Distance in metres, then time, then calories.
fn compare_cardio(a: &ExerciseLog, b: &ExerciseLog) -> Ordering {
    let distance = |log: &ExerciseLog| distance_in_meters(&log.reps, log.distance_unit);
    let time = |log: &ExerciseLog| {
        log.tiempo
            .as_deref()
            .and_then(parse_time_to_seconds)
            .unwrap_or(0.0)
    };
    let calories = |log: &ExerciseLog| {
        log.calorias
            .as_deref()
            .and_then(parse_metric)
            .unwrap_or(0.0)
    };
    distance(a)
        .total_cmp(&distance(b))
        .then_with(|| time(a).total_cmp(&time(b)))
        .then_with(|| calories(a).total_cmp(&calories(b)))
}

/// Kilos, then reps.
fn compare_strength(a: &ExerciseLog, b: &ExerciseLog) -> Ordering {
    let value = |text: &str| parse_metric(text).unwrap_or(0.0);
    value(&a.kilos)
        .total_cmp(&value(&b.kilos))
        .then_with(|| value(&a.reps).total_cmp(&value(&b.reps)))
}

/// Keeps `best` unless `current` is strictly older; undated counts as
/// oldest.
fn older_of<'a>(best: &'a ExerciseLog, current: &'a ExerciseLog, today: NaiveDate) -> &'a ExerciseLog {
    let best_date = parse_custom_date(&best.date, today);
    let current_date = parse_custom_date(&current.date, today);
    if best_date <= current_date {
        best
    } else {
        current
    }
}
