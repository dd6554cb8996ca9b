//! Calendar helpers: stored-date parsing, Monday week buckets and Spanish
//! display strings.
//!
//! # Invariants
//! - Weeks start on Monday; a week covers `[start, start + 7 days)`.
//! - Week keys are the Monday formatted as `YYYY-MM-DD`.

use chrono::{Datelike, Days, Local, NaiveDate};
use std::cmp::Ordering;

const LEGACY_FUTURE_TOLERANCE_DAYS: i64 = 30;

const MONTHS_LONG: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const MONTHS_SHORT: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

// Monday first, matching `Weekday::num_days_from_monday`.
const WEEKDAYS_LONG: [&str; 7] = [
    "lunes",
    "martes",
    "miércoles",
    "jueves",
    "viernes",
    "sábado",
    "domingo",
];

const WEEKDAYS_SHORT: [&str; 7] = ["lun", "mar", "mié", "jue", "vie", "sáb", "dom"];

/// Current local calendar day.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses a stored log date.
///
/// Accepts `YYYY-MM-DD` and the legacy `"Lun, 26 ago"` form. Legacy dates
/// carry no year: `today`'s year is assumed, or the previous one when that
/// would land more than 30 days in the future.
pub fn parse_custom_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.contains('-') {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Some(date);
        }
    }

    parse_legacy_date(trimmed, today)
}

fn parse_legacy_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let cleaned = text.to_lowercase().replace([',', '.'], "");
    let parts: Vec<&str> = cleaned.split(' ').collect();
    if parts.len() < 3 {
        return None;
    }

    let day = leading_integer(parts[1])?;
    let month = legacy_month_number(parts[2])?;

    let candidate = rolled_date(today.year(), month, day)?;
    if (candidate - today).num_days() > LEGACY_FUTURE_TOLERANCE_DAYS {
        return rolled_date(today.year() - 1, month, day);
    }
    Some(candidate)
}

/// Optional sign and the digits that follow it; trailing text is ignored.
fn leading_integer(token: &str) -> Option<i32> {
    let (sign, digits) = match token.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, token.strip_prefix('+').unwrap_or(token)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i32>().ok().map(|value| sign * value)
}

/// Calendar date where an out-of-range day spills into neighbouring months
/// (`29 feb` of a common year is `1 mar`).
fn rolled_date(year: i32, month: u32, day: i32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_signed(chrono::Duration::days(i64::from(day) - 1))
}

fn legacy_month_number(name: &str) -> Option<u32> {
    let index = match name {
        "ene" => 0,
        "feb" => 1,
        "mar" => 2,
        "abr" => 3,
        "may" => 4,
        "jun" => 5,
        "jul" => 6,
        "ago" => 7,
        "sep" | "sept" => 8,
        "oct" => 9,
        "nov" => 10,
        "dic" => 11,
        _ => return None,
    };
    Some(index + 1)
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date - Days::new(offset)
}

pub fn week_key(date: NaiveDate) -> String {
    format_iso(week_start(date))
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Newest first; dated before undated.
pub fn compare_dates_desc(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Whether `date` falls in the seven days starting at `start`.
pub fn in_week(date: NaiveDate, start: NaiveDate) -> bool {
    date >= start && date < start + Days::new(7)
}

/// Spanish lower-case month name.
pub fn month_name_long(date: NaiveDate) -> &'static str {
    MONTHS_LONG[date.month0() as usize]
}

/// `ceil(day / 7)` of the week's start date, used in export file names.
pub fn week_of_month(start: NaiveDate) -> u32 {
    start.day().div_ceil(7)
}

/// `Semana del 3 al 9 de junio, 2024`, or with both months when the week
/// crosses a month boundary.
pub fn format_week_range(start: NaiveDate) -> String {
    let end = start + Days::new(6);
    let start_month = month_name_long(start);
    let end_month = month_name_long(end);
    if start_month == end_month {
        format!(
            "Semana del {} al {} de {}, {}",
            start.day(),
            end.day(),
            start_month,
            start.year()
        )
    } else {
        format!(
            "Semana del {} de {} al {} de {}, {}",
            start.day(),
            start_month,
            end.day(),
            end_month,
            start.year()
        )
    }
}

/// `Lun 26 ago`; unparseable input is returned unchanged.
pub fn format_display_date(text: &str, today: NaiveDate) -> String {
    match parse_custom_date(text, today) {
        Some(date) => {
            let weekday = WEEKDAYS_SHORT[date.weekday().num_days_from_monday() as usize];
            let month = MONTHS_SHORT[date.month0() as usize];
            capitalize(&format!("{weekday} {} {month}", date.day()))
        }
        None => text.to_string(),
    }
}

/// `Lunes 26 de Agosto de 2024`; unparseable input is returned unchanged.
pub fn format_full_display_date(text: &str, today: NaiveDate) -> String {
    match parse_custom_date(text, today) {
        Some(date) => {
            let weekday = WEEKDAYS_LONG[date.weekday().num_days_from_monday() as usize];
            format!(
                "{} {} de {} de {}",
                capitalize(weekday),
                date.day(),
                capitalize(month_name_long(date)),
                date.year()
            )
        }
        None => text.to_string(),
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        format_display_date, format_full_display_date, format_week_range, in_week,
        parse_custom_date, week_key, week_of_month, week_start,
    };
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn iso_dates_parse_directly() {
        let today = date(2024, 6, 10);
        assert_eq!(parse_custom_date("2024-06-03", today), Some(date(2024, 6, 3)));
        assert_eq!(parse_custom_date("   ", today), None);
        assert_eq!(parse_custom_date("Sin fecha", today), None);
    }

    #[test]
    fn legacy_dates_use_current_or_previous_year() {
        let today = date(2024, 3, 1);
        assert_eq!(parse_custom_date("Lun, 26 feb", today), Some(date(2024, 2, 26)));
        assert_eq!(parse_custom_date("Mar, 13 ago.", today), Some(date(2023, 8, 13)));
        assert_eq!(parse_custom_date("Vie, 15 mar", today), Some(date(2024, 3, 15)));
        assert_eq!(parse_custom_date("Lun, 26 xyz", today), None);
    }

    #[test]
    fn legacy_days_roll_over_like_calendar_arithmetic() {
        assert_eq!(
            parse_custom_date("Jue, 29 feb", date(2023, 3, 10)),
            Some(date(2023, 3, 1))
        );
        // Too far ahead in 2025, so the previous (leap) year applies.
        assert_eq!(
            parse_custom_date("Jue, 29 feb", date(2025, 1, 15)),
            Some(date(2024, 2, 29))
        );
        assert_eq!(parse_custom_date("Mié, 31 abr", date(2024, 6, 1)), Some(date(2024, 5, 1)));
        assert_eq!(parse_custom_date("Lun, 0 jul", date(2024, 8, 1)), Some(date(2024, 6, 30)));
    }

    #[test]
    fn legacy_day_token_keeps_leading_digits() {
        let today = date(2024, 9, 1);
        assert_eq!(parse_custom_date("Lun, 26x ago", today), Some(date(2024, 8, 26)));
        assert_eq!(parse_custom_date("Lun, x26 ago", today), None);
    }

    #[test]
    fn weeks_start_on_monday() {
        assert_eq!(week_start(date(2024, 6, 9)), date(2024, 6, 3));
        assert_eq!(week_start(date(2024, 6, 3)), date(2024, 6, 3));
        assert_eq!(week_key(date(2024, 6, 5)), "2024-06-03");
        assert!(in_week(date(2024, 6, 9), date(2024, 6, 3)));
        assert!(!in_week(date(2024, 6, 10), date(2024, 6, 3)));
    }

    #[test]
    fn spanish_formatting() {
        let today = date(2024, 9, 1);
        assert_eq!(format_week_range(date(2024, 6, 3)), "Semana del 3 al 9 de junio, 2024");
        assert_eq!(
            format_week_range(date(2024, 5, 27)),
            "Semana del 27 de mayo al 2 de junio, 2024"
        );
        assert_eq!(format_display_date("2024-08-26", today), "Lun 26 ago");
        assert_eq!(format_display_date("ayer", today), "ayer");
        assert_eq!(
            format_full_display_date("2024-08-26", today),
            "Lunes 26 de Agosto de 2024"
        );
        assert_eq!(week_of_month(date(2024, 6, 3)), 1);
        assert_eq!(week_of_month(date(2024, 6, 24)), 4);
    }
}
