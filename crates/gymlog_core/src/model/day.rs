//! Fixed workout day catalogue.

/// Cardio day key; its logs reuse `series`/`reps`/`kilos` for speed,
/// distance and incline.
pub const CARDIO_DAY: &str = "Día 5";

/// Day keys in creation order.
pub const WORKOUT_DAYS: [&str; 5] = ["Día 1", "Día 2", "Día 3", "Día 4", "Día 5"];

/// Order used when rendering summaries and text exports.
pub const SUMMARY_DAY_ORDER: [&str; 5] = ["Día 5", "Día 1", "Día 2", "Día 3", "Día 4"];

/// Human label for a day key; unknown keys are returned as-is.
pub fn day_label(day: &str) -> &str {
    match day {
        "Día 1" => "Pecho y Bíceps",
        "Día 2" => "Pierna y Glúteo",
        "Día 3" => "Hombro y Espalda",
        "Día 4" => "Tríceps y Antebrazo",
        "Día 5" => "Cardio",
        other => other,
    }
}

/// Muscle groups that get their own link collections on a day.
pub fn muscle_groups(day: &str) -> &'static [&'static str] {
    match day {
        "Día 1" => &["Pecho", "Bíceps"],
        "Día 2" => &["Pierna", "Glúteo"],
        "Día 3" => &["Hombro", "Espalda"],
        "Día 4" => &["Tríceps", "Antebrazo"],
        "Día 5" => &["General"],
        _ => &[],
    }
}

pub fn is_cardio_day(day: &str) -> bool {
    day == CARDIO_DAY
}

#[cfg(test)]
mod tests {
    use super::{day_label, muscle_groups, SUMMARY_DAY_ORDER, WORKOUT_DAYS};

    #[test]
    fn every_day_has_label_and_muscles() {
        for day in WORKOUT_DAYS {
            assert_ne!(day_label(day), day);
            assert!(!muscle_groups(day).is_empty());
        }
        assert_eq!(day_label("Otros"), "Otros");
    }

    #[test]
    fn summary_order_starts_with_cardio() {
        assert_eq!(SUMMARY_DAY_ORDER[0], "Día 5");
        assert_eq!(SUMMARY_DAY_ORDER.len(), WORKOUT_DAYS.len());
    }
}
