//! Per-sede reference material and view state: exercise name lists,
//! favourites, links, and collapse/expand flags.
//!
//! Every operation here targets the active sede.

use super::logs::add_name_to_day;
use super::store::{active_sede_mut, AppStore, StoreError, StoreResult};
use crate::model::sede::{
    add_link, normalize_name, remove_link, rename_link, toggle_membership, FavoriteExercise,
    LinkItem, NewFavorite,
};
use crate::model::{new_record_id, RecordId};
use crate::repo::state_repo::StateRepository;

/// Forced state for [`AppStore::toggle_exercise_log_expansion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionState {
    Open,
    Close,
}

/// Which summary level a collapse toggle applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryLevel {
    Week,
    Day,
    Exercise,
}

/// Sede-wide link collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCollection {
    Stretching,
    Posture,
}

impl<R: StateRepository> AppStore<R> {
    /// Adds a suggestion name to a day list; returns whether it was new.
    pub fn add_exercise_name(&mut self, day: &str, name: &str) -> StoreResult<bool> {
        if normalize_name(name).is_empty() {
            return Ok(false);
        }
        self.mutate("add_exercise_name", |state| {
            let (_, sede) = active_sede_mut(state)?;
            Ok(add_name_to_day(sede, day, name))
        })
    }

    /// Removes a suggestion name; returns whether it was present.
    pub fn remove_exercise_name(&mut self, day: &str, name: &str) -> StoreResult<bool> {
        let normalized = normalize_name(name);
        if normalized.is_empty() {
            return Ok(false);
        }
        self.mutate("remove_exercise_name", |state| {
            let (_, sede) = active_sede_mut(state)?;
            let Some(names) = sede.exercise_names.get_mut(day) else {
                return Ok(false);
            };
            let before = names.len();
            names.retain(|existing| *existing != normalized);
            Ok(names.len() != before)
        })
    }

    /// Flips the collapsed flag of a summary week, day or exercise group key.
    pub fn toggle_summary_collapse(&mut self, level: SummaryLevel, key: &str) -> StoreResult<()> {
        self.mutate("toggle_summary_collapse", |state| {
            let (_, sede) = active_sede_mut(state)?;
            let list = match level {
                SummaryLevel::Week => &mut sede.summary_collapsed_weeks,
                SummaryLevel::Day => &mut sede.summary_collapsed_days,
                SummaryLevel::Exercise => &mut sede.summary_collapsed_exercises,
            };
            toggle_membership(list, key);
            Ok(())
        })
    }

    pub fn toggle_summary_week_collapse(&mut self, week_key: &str) -> StoreResult<()> {
        self.toggle_summary_collapse(SummaryLevel::Week, week_key)
    }

    pub fn toggle_summary_day_collapse(&mut self, day_key: &str) -> StoreResult<()> {
        self.toggle_summary_collapse(SummaryLevel::Day, day_key)
    }

    pub fn toggle_summary_exercise_collapse(&mut self, group_key: &str) -> StoreResult<()> {
        self.toggle_summary_collapse(SummaryLevel::Exercise, group_key)
    }

    /// Toggles (or forces) a log's expanded flag on a workout day.
    ///
    /// Unknown days are ignored. Returns the resulting expanded flag.
    pub fn toggle_exercise_log_expansion(
        &mut self,
        day: &str,
        log_id: &str,
        force: Option<ExpansionState>,
    ) -> StoreResult<bool> {
        self.mutate("toggle_exercise_log_expansion", |state| {
            let (_, sede) = active_sede_mut(state)?;
            let Some(day_state) = sede.workout_days.get_mut(day) else {
                return Ok(false);
            };
            let expanded = &mut day_state.expanded_logs;
            let is_expanded = expanded.iter().any(|id| id == log_id);
            let want_expanded = match force {
                Some(ExpansionState::Open) => true,
                Some(ExpansionState::Close) => false,
                None => !is_expanded,
            };
            if want_expanded && !is_expanded {
                expanded.push(log_id.to_string());
            } else if !want_expanded && is_expanded {
                expanded.retain(|id| id != log_id);
            }
            Ok(want_expanded)
        })
    }

    /// Adds a muscle-group link; blank or duplicate urls return `None`.
    pub fn add_muscle_group_link(
        &mut self,
        day: &str,
        muscle: &str,
        url: &str,
    ) -> StoreResult<Option<RecordId>> {
        if url.is_empty() {
            return Ok(None);
        }
        self.mutate("add_muscle_group_link", |state| {
            let (_, sede) = active_sede_mut(state)?;
            let links = sede
                .muscle_group_links
                .entry(day.to_string())
                .or_default()
                .entry(muscle.to_string())
                .or_default();
            Ok(add_link(links, url))
        })
    }

    pub fn remove_muscle_group_link(&mut self, day: &str, muscle: &str, id: &str) -> StoreResult<bool> {
        self.mutate("remove_muscle_group_link", |state| {
            let (_, sede) = active_sede_mut(state)?;
            Ok(sede
                .muscle_group_links
                .get_mut(day)
                .and_then(|groups| groups.get_mut(muscle))
                .is_some_and(|links| remove_link(links, id)))
        })
    }

    pub fn update_muscle_group_link_name(
        &mut self,
        day: &str,
        muscle: &str,
        id: &str,
        name: &str,
    ) -> StoreResult<bool> {
        self.mutate("update_muscle_group_link_name", |state| {
            let (_, sede) = active_sede_mut(state)?;
            Ok(sede
                .muscle_group_links
                .get_mut(day)
                .and_then(|groups| groups.get_mut(muscle))
                .is_some_and(|links| rename_link(links, id, name)))
        })
    }

    /// Adds a stretching or posture link; blank or duplicate urls return
    /// `None`.
    pub fn add_link(&mut self, collection: LinkCollection, url: &str) -> StoreResult<Option<RecordId>> {
        if url.is_empty() {
            return Ok(None);
        }
        self.mutate("add_link", |state| {
            let (_, sede) = active_sede_mut(state)?;
            Ok(add_link(collection_mut(sede, collection), url))
        })
    }

    pub fn remove_link(&mut self, collection: LinkCollection, id: &str) -> StoreResult<bool> {
        self.mutate("remove_link", |state| {
            let (_, sede) = active_sede_mut(state)?;
            Ok(remove_link(collection_mut(sede, collection), id))
        })
    }

    pub fn update_link_name(
        &mut self,
        collection: LinkCollection,
        id: &str,
        name: &str,
    ) -> StoreResult<bool> {
        self.mutate("update_link_name", |state| {
            let (_, sede) = active_sede_mut(state)?;
            Ok(rename_link(collection_mut(sede, collection), id, name))
        })
    }

    pub fn add_stretching_link(&mut self, url: &str) -> StoreResult<Option<RecordId>> {
        self.add_link(LinkCollection::Stretching, url)
    }

    pub fn add_posture_link(&mut self, url: &str) -> StoreResult<Option<RecordId>> {
        self.add_link(LinkCollection::Posture, url)
    }

    /// Adds a favourite, or merges into one with the same name (ignoring
    /// case): media is appended, day title and notes are replaced.
    pub fn add_favorite_exercise(&mut self, favorite: NewFavorite) -> StoreResult<RecordId> {
        self.mutate("add_favorite_exercise", |state| {
            let (_, sede) = active_sede_mut(state)?;
            let wanted = favorite.name.to_uppercase();
            if let Some(existing) = sede
                .favorite_exercises
                .iter_mut()
                .find(|existing| existing.name.to_uppercase() == wanted)
            {
                existing.media.extend(favorite.media);
                existing.day_title = favorite.day_title;
                existing.notes = favorite.notes;
                return Ok(existing.id.clone());
            }

            let id = new_record_id();
            sede.favorite_exercises.push(FavoriteExercise {
                id: id.clone(),
                name: favorite.name,
                day_title: favorite.day_title,
                media: favorite.media,
                notes: favorite.notes,
            });
            Ok(id)
        })
    }

    pub fn remove_favorite_exercise(&mut self, id: &str) -> StoreResult<()> {
        self.mutate("remove_favorite_exercise", |state| {
            let (_, sede) = active_sede_mut(state)?;
            let before = sede.favorite_exercises.len();
            sede.favorite_exercises.retain(|favorite| favorite.id != id);
            if sede.favorite_exercises.len() == before {
                return Err(StoreError::FavoriteNotFound(id.to_string()));
            }
            Ok(())
        })
    }

    pub fn remove_favorite_exercise_media(&mut self, id: &str, media_index: usize) -> StoreResult<()> {
        self.mutate("remove_favorite_exercise_media", |state| {
            let (_, sede) = active_sede_mut(state)?;
            let favorite = sede
                .favorite_exercises
                .iter_mut()
                .find(|favorite| favorite.id == id)
                .ok_or_else(|| StoreError::FavoriteNotFound(id.to_string()))?;
            if media_index < favorite.media.len() {
                favorite.media.remove(media_index);
            }
            Ok(())
        })
    }
}

fn collection_mut(
    sede: &mut crate::model::sede::SedeData,
    collection: LinkCollection,
) -> &mut Vec<LinkItem> {
    match collection {
        LinkCollection::Stretching => &mut sede.stretching_links,
        LinkCollection::Posture => &mut sede.posture_links,
    }
}
