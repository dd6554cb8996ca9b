//! Cardio ("nada") sessions and the per-day cardio form.

use super::{new_record_id, RecordId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder date stored when the form date was left blank.
pub const UNDATED_SESSION: &str = "Sin fecha";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardioDistanceUnit {
    #[default]
    #[serde(rename = "KM")]
    Kilometers,
    #[serde(rename = "MTS")]
    Meters,
}

impl CardioDistanceUnit {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "KM" => Some(Self::Kilometers),
            "MTS" | "M" => Some(Self::Meters),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NadaMetrics {
    pub speed: String,
    pub distance: String,
    pub distance_unit: CardioDistanceUnit,
    pub incline: String,
    pub time: String,
    pub calories: String,
}

/// Draft state of the cardio form kept per workout day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NadaFormData {
    pub date: String,
    pub title: String,
    pub metrics: NadaMetrics,
    pub notes: String,
}

impl NadaFormData {
    /// Empty form dated `today`.
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            date: today.format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    /// Empty form dated with the local calendar day.
    pub fn fresh_today() -> Self {
        Self::fresh(crate::dates::local_today())
    }

    /// Sets one named form field.
    pub fn set_field(&mut self, field: NadaFormField, value: String) -> Result<(), String> {
        match field {
            NadaFormField::Date => self.date = value,
            NadaFormField::Title => self.title = value,
            NadaFormField::Notes => self.notes = value,
            NadaFormField::Speed => self.metrics.speed = value,
            NadaFormField::Distance => self.metrics.distance = value,
            NadaFormField::Incline => self.metrics.incline = value,
            NadaFormField::Time => self.metrics.time = value,
            NadaFormField::Calories => self.metrics.calories = value,
            NadaFormField::DistanceUnit => {
                self.metrics.distance_unit = CardioDistanceUnit::parse(&value)
                    .ok_or_else(|| format!("invalid distance unit `{value}`"))?;
            }
        }
        Ok(())
    }
}

/// Addressable fields of the cardio form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NadaFormField {
    Date,
    Title,
    Notes,
    Speed,
    Distance,
    DistanceUnit,
    Incline,
    Time,
    Calories,
}

impl NadaFormField {
    /// Parses the camelCase field name used by the stored form.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "date" => Some(Self::Date),
            "title" => Some(Self::Title),
            "notes" => Some(Self::Notes),
            "speed" => Some(Self::Speed),
            "distance" => Some(Self::Distance),
            "distanceUnit" => Some(Self::DistanceUnit),
            "incline" => Some(Self::Incline),
            "time" => Some(Self::Time),
            "calories" => Some(Self::Calories),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NadaSnapshot {
    pub date: String,
    pub title: String,
    pub metrics: NadaMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Recorded cardio session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NadaSession {
    pub id: RecordId,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub sede: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub metrics: NadaMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_saved_to_summary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_state: Option<NadaSnapshot>,
}

/// Input for recording a cardio session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNadaSession {
    pub date: String,
    pub day: String,
    pub title: String,
    pub metrics: NadaMetrics,
    pub notes: Option<String>,
}

impl NadaSession {
    pub fn from_new(input: NewNadaSession, sede: impl Into<String>) -> Self {
        let date = match input.date.trim() {
            "" => UNDATED_SESSION.to_string(),
            trimmed => trimmed.to_string(),
        };
        Self {
            id: new_record_id(),
            date,
            day: input.day,
            sede: sede.into(),
            title: input.title,
            metrics: input.metrics,
            notes: input.notes,
            is_saved_to_summary: false,
            saved_state: None,
        }
    }
}
