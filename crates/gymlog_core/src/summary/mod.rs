//! Summary analysis: week/day/exercise grouping, metric trends and the
//! dashboard's personal-record view.
//!
//! # Responsibility
//! - Bucket summary logs into Monday weeks and workout days for display
//!   and export.
//! - Compare sessions of the same exercise and sede.
//!
//! # Invariants
//! - Undated logs never appear in a week group.
//! - Weeks are newest first; days follow the summary display order with
//!   unknown day keys appended by name; logs inside a day are newest first.

pub mod compare;
pub mod metrics;

use crate::dates::{compare_dates_desc, format_iso, parse_custom_date, week_start};
use crate::model::day::SUMMARY_DAY_ORDER;
use crate::model::exercise::ExerciseLog;
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub use compare::{
    compare_with_previous, compare_with_previous_at, comparison_pool, performance, performance_at,
    MetricComparison, Performance, Trend,
};
pub use metrics::{parse_metric, parse_time_to_seconds};

/// Logs of one Monday-started week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekGroup<'a> {
    pub start: NaiveDate,
    pub days: Vec<DayGroup<'a>>,
}

impl WeekGroup<'_> {
    /// `YYYY-MM-DD` of the Monday; also the collapse key of the week.
    pub fn key(&self) -> String {
        format_iso(self.start)
    }

    pub fn log_count(&self) -> usize {
        self.days.iter().map(|day| day.logs.len()).sum()
    }
}

/// Logs of one workout day inside a week, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup<'a> {
    pub day: String,
    pub logs: Vec<&'a ExerciseLog>,
}

impl<'a> DayGroup<'a> {
    /// Collapse key of this day inside `week_key`.
    pub fn key(&self, week_key: &str) -> String {
        format!("{week_key}-{}", self.day)
    }

    /// Groups the day's logs by exercise name in first-seen order.
    pub fn by_exercise(&self) -> Vec<ExerciseGroup<'a>> {
        let mut groups: Vec<ExerciseGroup<'a>> = Vec::new();
        for log in self.logs.iter().copied() {
            match groups
                .iter_mut()
                .find(|group| group.exercise_name == log.exercise_name)
            {
                Some(group) => group.logs.push(log),
                None => groups.push(ExerciseGroup {
                    exercise_name: log.exercise_name.clone(),
                    logs: vec![log],
                }),
            }
        }
        groups
    }
}

/// Logs of one exercise inside a day group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseGroup<'a> {
    pub exercise_name: String,
    pub logs: Vec<&'a ExerciseLog>,
}

impl ExerciseGroup<'_> {
    /// Collapse key of this exercise inside `day_key`.
    pub fn key(&self, day_key: &str) -> String {
        format!("{day_key}-{}", self.exercise_name)
    }
}

/// Buckets dated logs by week and day.
pub fn group_by_week<'a>(
    logs: impl IntoIterator<Item = &'a ExerciseLog>,
    today: NaiveDate,
) -> Vec<WeekGroup<'a>> {
    let mut weeks: BTreeMap<NaiveDate, BTreeMap<String, Vec<(NaiveDate, &'a ExerciseLog)>>> =
        BTreeMap::new();
    for log in logs {
        let Some(date) = parse_custom_date(&log.date, today) else {
            continue;
        };
        weeks
            .entry(week_start(date))
            .or_default()
            .entry(log.day.clone())
            .or_default()
            .push((date, log));
    }

    weeks
        .into_iter()
        .rev()
        .map(|(start, mut days)| {
            let mut ordered = Vec::with_capacity(days.len());
            for day in SUMMARY_DAY_ORDER {
                if let Some(logs) = days.remove(day) {
                    ordered.push(day_group(day.to_string(), logs));
                }
            }
            for (day, logs) in days {
                ordered.push(day_group(day, logs));
            }
            WeekGroup {
                start,
                days: ordered,
            }
        })
        .collect()
}

fn day_group(day: String, mut logs: Vec<(NaiveDate, &ExerciseLog)>) -> DayGroup<'_> {
    logs.sort_by(|(a, _), (b, _)| compare_dates_desc(Some(*a), Some(*b)));
    DayGroup {
        day,
        logs: logs.into_iter().map(|(_, log)| log).collect(),
    }
}
