use crate::dates::{format_display_date, format_week_range, parse_custom_date};
use crate::model::day::{day_label, is_cardio_day, SUMMARY_DAY_ORDER};
use crate::model::exercise::ExerciseLog;
use crate::summary::group_by_week;
use chrono::NaiveDate;

/// Body written when there is nothing dated to report.
pub const EMPTY_EXPORT_TEXT: &str = "No hay datos para exportar.";

const REPORT_HEADER: &str = "PROGRESIÓN DE CARGA - RESUMEN\n===============================\n\n";
const WEEK_RULE: &str = "-------------------------------";

/// Weekly report: weeks newest first, days in display order, entries
/// oldest first inside a day. Day keys outside the catalogue are left out.
pub fn summary_text<'a>(logs: impl IntoIterator<Item = &'a ExerciseLog>, today: NaiveDate) -> String {
    let weeks = group_by_week(logs, today);
    if weeks.is_empty() {
        return EMPTY_EXPORT_TEXT.to_string();
    }

    let mut report = String::from(REPORT_HEADER);
    for week in &weeks {
        report.push_str(&format_week_range(week.start).to_uppercase());
        report.push('\n');
        report.push_str(WEEK_RULE);
        report.push_str("\n\n");

        let catalogue_days = week
            .days
            .iter()
            .filter(|day| SUMMARY_DAY_ORDER.contains(&day.day.as_str()));
        for day in catalogue_days {
            report.push_str(&format!("*** {} ***\n\n", day_label(&day.day)));
            let mut entries = day.logs.clone();
            entries.sort_by_key(|log| parse_custom_date(&log.date, today));
            for log in entries {
                report.push_str(&format_log_text(log, today));
                report.push_str("\n\n");
            }
        }
        report.push('\n');
    }
    report
}

/// One day of one week, entries in the given order.
pub(super) fn day_text(day: &str, start: NaiveDate, logs: &[&ExerciseLog], today: NaiveDate) -> String {
    let entries: Vec<String> = logs.iter().map(|log| format_log_text(log, today)).collect();
    format!(
        "Resumen para {} - {}\n\n{}",
        day_label(day),
        format_week_range(start),
        entries.join("\n\n")
    )
}

/// Multi-line text entry for one log.
pub fn format_log_text(log: &ExerciseLog, today: NaiveDate) -> String {
    let mut lines = vec![format!(
        "{} - {} [Sede: {}]",
        log.exercise_name.to_uppercase(),
        format_display_date(&log.date, today),
        log.sede
    )];
    let tiempo = non_empty(log.tiempo.as_deref());
    let calorias = non_empty(log.calorias.as_deref());

    if is_cardio_day(&log.day) {
        if let Some(tiempo) = tiempo {
            lines.push(format!("  - Tiempo: {tiempo} Min"));
        }
        let mut parts = Vec::new();
        if !log.series.is_empty() {
            parts.push(format!("Velocidad: {}", log.series));
        }
        if !log.reps.is_empty() {
            let unit = log
                .distance_unit
                .map(|unit| format!(" {}", unit.long_name()))
                .unwrap_or_default();
            parts.push(format!("Distancia: {}{unit}", log.reps));
        }
        if !parts.is_empty() {
            lines.push(format!("  - {}", parts.join(", ")));
        }
        if let Some(calorias) = calorias {
            lines.push(format!("  - Calorías: {calorias} Kcal"));
        }
        if !log.kilos.is_empty() {
            lines.push(format!("  - Inclinación: {}", log.kilos));
        }
    } else {
        lines.push(format!(
            "  - {} series x {} reps @ {} kgs",
            or_dash(&log.series),
            or_dash(&log.reps),
            or_dash(&log.kilos)
        ));
        if let Some(tiempo) = tiempo {
            lines.push(format!("  - Tiempo: {tiempo} Min"));
        }
        if let Some(calorias) = calorias {
            lines.push(format!("  - Calorías: {calorias} Kcal"));
        }
    }

    if let Some(notes) = non_empty(log.notes.as_deref()) {
        lines.push(format!("  - Notas: {notes}"));
    }
    lines.join("\n")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
