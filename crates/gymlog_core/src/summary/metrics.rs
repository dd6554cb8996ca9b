//! Lenient parsing of the numeric-as-string log metrics.

use crate::model::exercise::DistanceUnit;
use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid number regex")
});

/// Parses a metric such as `"12,5"` or `"80kg"`.
///
/// Blank text yields `None`. The first decimal comma is read as a point and
/// the leading numeric prefix is parsed; text without one yields `None`.
pub fn parse_metric(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = trimmed.replacen(',', ".", 1);
    let prefix = LEADING_NUMBER_RE.find(&normalized)?;
    prefix.as_str().parse().ok()
}

/// Parses `h:m:s` or `m:s` into seconds.
///
/// Empty components count as zero; any other non-numeric component, or a
/// different number of components, yields `None`.
pub fn parse_time_to_seconds(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    let parts = text
        .split(':')
        .map(time_component)
        .collect::<Option<Vec<f64>>>()?;
    match parts.as_slice() {
        [hours, minutes, seconds] => Some(hours * 3600.0 + minutes * 60.0 + seconds),
        [minutes, seconds] => Some(minutes * 60.0 + seconds),
        _ => None,
    }
}

fn time_component(part: &str) -> Option<f64> {
    let trimmed = part.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Distance in metres for a cardio log's `reps` and unit; unparseable
/// distances count as zero.
pub(crate) fn distance_in_meters(distance: &str, unit: Option<DistanceUnit>) -> f64 {
    let value = parse_metric(distance).unwrap_or(0.0);
    match unit {
        Some(unit) => value * unit.meters_factor(),
        None => value,
    }
}
