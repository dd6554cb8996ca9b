//! Per-gym-location ("sede") container.
//!
//! # Invariants
//! - `exercise_names` lists are upper-case, deduplicated and sorted.
//! - Link urls are unique within one collection.

use super::day::{muscle_groups, WORKOUT_DAYS};
use super::exercise::ExerciseMedia;
use super::nada::NadaFormData;
use super::{new_record_id, RecordId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Saved video/article link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkItem {
    pub id: RecordId,
    pub url: String,
    pub name: String,
}

/// Muscle group → links, per workout day.
pub type MuscleGroupLinks = BTreeMap<String, Vec<LinkItem>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteExercise {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub day_title: String,
    #[serde(default)]
    pub media: Vec<ExerciseMedia>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Input for adding (or merging into) a favourite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewFavorite {
    pub name: String,
    pub day_title: String,
    pub media: Vec<ExerciseMedia>,
    pub notes: Option<String>,
}

/// UI state persisted per workout day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDayState {
    #[serde(default)]
    pub expanded_logs: Vec<RecordId>,
    #[serde(default = "NadaFormData::fresh_today")]
    pub nada: NadaFormData,
}

impl WorkoutDayState {
    pub fn fresh() -> Self {
        Self {
            expanded_logs: Vec::new(),
            nada: NadaFormData::fresh_today(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SedeData {
    pub favorite_exercises: Vec<FavoriteExercise>,
    pub workout_days: BTreeMap<String, WorkoutDayState>,
    pub muscle_group_links: BTreeMap<String, MuscleGroupLinks>,
    pub stretching_links: Vec<LinkItem>,
    pub posture_links: Vec<LinkItem>,
    pub exercise_names: BTreeMap<String, Vec<String>>,
    pub summary_collapsed_weeks: Vec<String>,
    pub summary_collapsed_days: Vec<String>,
    pub summary_collapsed_exercises: Vec<String>,
}

impl Default for SedeData {
    fn default() -> Self {
        Self::fresh()
    }
}

impl SedeData {
    /// Fresh sede with the full day catalogue and empty collections.
    pub fn fresh() -> Self {
        Self {
            favorite_exercises: Vec::new(),
            workout_days: WORKOUT_DAYS
                .iter()
                .map(|day| (day.to_string(), WorkoutDayState::fresh()))
                .collect(),
            muscle_group_links: WORKOUT_DAYS
                .iter()
                .map(|day| {
                    let groups = muscle_groups(day)
                        .iter()
                        .map(|muscle| (muscle.to_string(), Vec::new()))
                        .collect();
                    (day.to_string(), groups)
                })
                .collect(),
            stretching_links: Vec::new(),
            posture_links: Vec::new(),
            exercise_names: empty_exercise_names(),
            summary_collapsed_weeks: Vec::new(),
            summary_collapsed_days: Vec::new(),
            summary_collapsed_exercises: Vec::new(),
        }
    }

    /// Adds a normalized name to an existing day list, keeping it sorted.
    ///
    /// Days without a list are skipped; returns whether the list changed.
    pub fn remember_exercise_name(&mut self, day: &str, name: &str) -> bool {
        let normalized = normalize_name(name);
        if normalized.is_empty() {
            return false;
        }
        let Some(names) = self.exercise_names.get_mut(day) else {
            return false;
        };
        insert_sorted_unique(names, normalized)
    }

    /// Removes every collapse key for a promoted log's week, day and group.
    pub fn expand_summary_path(&mut self, week_key: &str, day_key: &str, group_key: &str) {
        self.summary_collapsed_weeks.retain(|key| key != week_key);
        self.summary_collapsed_days.retain(|key| key != day_key);
        self.summary_collapsed_exercises.retain(|key| key != group_key);
    }
}

/// One empty name list per catalogue day.
pub fn empty_exercise_names() -> BTreeMap<String, Vec<String>> {
    WORKOUT_DAYS
        .iter()
        .map(|day| (day.to_string(), Vec::new()))
        .collect()
}

/// Trim + upper-case, the canonical form of exercise and sede names.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase()
}

pub(crate) fn insert_sorted_unique(names: &mut Vec<String>, name: String) -> bool {
    if names.contains(&name) {
        return false;
    }
    names.push(name);
    names.sort();
    true
}

/// Toggles `key` membership in a collapse/expand list.
pub(crate) fn toggle_membership(list: &mut Vec<String>, key: &str) {
    if let Some(position) = list.iter().position(|item| item == key) {
        list.remove(position);
    } else {
        list.push(key.to_string());
    }
}

/// Appends a link named `Video N`; blank or duplicate urls are ignored.
pub fn add_link(links: &mut Vec<LinkItem>, url: &str) -> Option<RecordId> {
    if url.is_empty() || links.iter().any(|link| link.url == url) {
        return None;
    }
    let id = new_record_id();
    links.push(LinkItem {
        id: id.clone(),
        url: url.to_string(),
        name: format!("Video {}", links.len() + 1),
    });
    Some(id)
}

/// Returns whether a link was removed.
pub fn remove_link(links: &mut Vec<LinkItem>, id: &str) -> bool {
    let before = links.len();
    links.retain(|link| link.id != id);
    links.len() != before
}

/// Returns whether a link was renamed.
pub fn rename_link(links: &mut [LinkItem], id: &str, name: &str) -> bool {
    match links.iter_mut().find(|link| link.id == id) {
        Some(link) => {
            link.name = name.to_string();
            true
        }
        None => false,
    }
}
