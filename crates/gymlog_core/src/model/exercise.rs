//! Exercise log records and their promotion snapshot.
//!
//! # Invariants
//! - `saved_state` is only meaningful while the log lives in the daily list.
//! - Summary copies never carry `is_saved_to_summary` or `saved_state`.

use super::{new_record_id, RecordId};
use serde::{Deserialize, Serialize};

/// Kind of an attached media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// Inline media attachment (data URL payload).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseMedia {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub data_url: String,
}

/// Distance unit stored on cardio-day exercise logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[serde(rename = "KM")]
    Kilometers,
    #[serde(rename = "M", alias = "MTS")]
    Meters,
}

impl DistanceUnit {
    pub fn meters_factor(self) -> f64 {
        match self {
            Self::Kilometers => 1000.0,
            Self::Meters => 1.0,
        }
    }

    /// Spanish long name used in text exports.
    pub fn long_name(self) -> &'static str {
        match self {
            Self::Kilometers => "Kilómetros",
            Self::Meters => "Metros",
        }
    }
}

/// One strength or cardio-day entry.
///
/// Metrics stay strings: they are user input and may use a decimal comma.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    pub id: RecordId,
    #[serde(default)]
    pub exercise_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub reps: String,
    #[serde(default)]
    pub kilos: String,
    #[serde(default)]
    pub series: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incline: Option<String>,
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub media: Vec<ExerciseMedia>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub sede: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_saved_to_summary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_state: Option<LogSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiempo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calorias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_unit: Option<DistanceUnit>,
}

impl ExerciseLog {
    /// Builds a daily log for `sede` from form input with a fresh id.
    pub fn from_new(input: NewExerciseLog, sede: impl Into<String>) -> Self {
        Self {
            id: new_record_id(),
            exercise_name: input.exercise_name,
            date: input.date,
            reps: input.reps,
            kilos: input.kilos,
            series: input.series,
            incline: None,
            day: input.day,
            media: input.media,
            notes: input.notes,
            sede: sede.into(),
            is_saved_to_summary: false,
            saved_state: None,
            tiempo: input.tiempo,
            calorias: input.calorias,
            distance_unit: input.distance_unit,
        }
    }

    /// Current state in snapshot form, for promotion and divergence checks.
    pub fn snapshot(&self) -> LogSnapshot {
        LogSnapshot {
            exercise_name: self.exercise_name.clone(),
            date: self.date.clone(),
            reps: self.reps.clone(),
            kilos: self.kilos.clone(),
            series: self.series.clone(),
            media: self.media.clone(),
            notes: self.notes.clone(),
            tiempo: self.tiempo.clone(),
            calorias: self.calorias.clone(),
            distance_unit: self.distance_unit,
        }
    }

    /// Whether the log was edited since its last promotion.
    pub fn diverged_from_snapshot(&self) -> bool {
        self.saved_state
            .as_ref()
            .is_some_and(|saved| *saved != self.snapshot())
    }

    /// Copy stored in the summary list.
    pub fn summary_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.clear_promotion();
        copy
    }

    /// Drops the promotion flag and snapshot.
    pub fn clear_promotion(&mut self) {
        self.is_saved_to_summary = false;
        self.saved_state = None;
    }

    /// Applies a partial update; untouched fields keep their value.
    pub fn apply(&mut self, update: LogUpdate) {
        if let Some(value) = update.exercise_name {
            self.exercise_name = value;
        }
        if let Some(value) = update.date {
            self.date = value;
        }
        if let Some(value) = update.reps {
            self.reps = value;
        }
        if let Some(value) = update.kilos {
            self.kilos = value;
        }
        if let Some(value) = update.series {
            self.series = value;
        }
        if let Some(value) = update.media {
            self.media = value;
        }
        if let Some(value) = update.notes {
            self.notes = value;
        }
        if let Some(value) = update.tiempo {
            self.tiempo = value;
        }
        if let Some(value) = update.calorias {
            self.calorias = value;
        }
        if let Some(value) = update.distance_unit {
            self.distance_unit = value;
        }
    }
}

/// Logged fields captured when a daily log is promoted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogSnapshot {
    pub exercise_name: String,
    pub date: String,
    pub reps: String,
    pub kilos: String,
    pub series: String,
    pub media: Vec<ExerciseMedia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiempo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_unit: Option<DistanceUnit>,
}

/// Form input for a new daily log; sede and id are assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewExerciseLog {
    pub exercise_name: String,
    pub date: String,
    pub day: String,
    pub reps: String,
    pub kilos: String,
    pub series: String,
    pub media: Vec<ExerciseMedia>,
    pub notes: Option<String>,
    pub tiempo: Option<String>,
    pub calorias: Option<String>,
    pub distance_unit: Option<DistanceUnit>,
}

/// Partial update for a daily log.
///
/// Optional-valued fields use `Option<Option<_>>` so callers can clear them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogUpdate {
    pub exercise_name: Option<String>,
    pub date: Option<String>,
    pub reps: Option<String>,
    pub kilos: Option<String>,
    pub series: Option<String>,
    pub media: Option<Vec<ExerciseMedia>>,
    pub notes: Option<Option<String>>,
    pub tiempo: Option<Option<String>>,
    pub calorias: Option<Option<String>>,
    pub distance_unit: Option<Option<DistanceUnit>>,
}
