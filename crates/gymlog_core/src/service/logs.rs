//! Daily working-set logs and their promotion into the summary.
//!
//! # Invariants
//! - A daily log flagged `is_saved_to_summary` has a summary copy with the
//!   same id and a snapshot equal to that copy's logged fields.
//! - Editing a flagged log so its snapshot diverges clears the flag.
//! - Removing a summary copy always clears the daily flag and snapshot.

use super::store::{active_sede_mut, AppStore, StoreError, StoreResult};
use crate::dates::{compare_dates_desc, in_week, local_today, parse_custom_date, week_key};
use crate::model::exercise::{ExerciseLog, LogUpdate, NewExerciseLog};
use crate::model::new_record_id;
use crate::model::sede::{insert_sorted_unique, normalize_name, SedeData, WorkoutDayState};
use crate::model::state::AppState;
use crate::model::RecordId;
use crate::repo::state_repo::StateRepository;
use chrono::NaiveDate;

impl<R: StateRepository> AppStore<R> {
    /// Records a new daily log in the active sede and opens it.
    pub fn add_daily_log(&mut self, input: NewExerciseLog) -> StoreResult<RecordId> {
        self.mutate("add_daily_log", |state| {
            let (sede_name, sede) = active_sede_mut(state)?;
            let log = ExerciseLog::from_new(input, sede_name);
            let id = log.id.clone();

            add_name_to_day(sede, &log.day, &log.exercise_name);
            if let Some(day_state) = sede.workout_days.get_mut(&log.day) {
                if !day_state.expanded_logs.contains(&id) {
                    day_state.expanded_logs.push(id.clone());
                }
            }

            state.daily_logs.insert(0, log);
            Ok(id)
        })
    }

    /// Applies a partial update to a daily log and returns its final id.
    ///
    /// Changing the date of a promoted log forks it: the daily copy gets a
    /// fresh id and loses its promotion, while the summary copy stays as
    /// history.
    pub fn update_daily_log(&mut self, id: &str, update: LogUpdate) -> StoreResult<RecordId> {
        let index = daily_index(&self.state, id)?;

        self.mutate("update_daily_log", |state| {
            let original = state.daily_logs[index].clone();
            let date_changed = update
                .date
                .as_ref()
                .is_some_and(|date| *date != original.date);

            let mut updated = original.clone();
            updated.apply(update);

            let mut replaced_id = None;
            if date_changed && original.is_saved_to_summary {
                updated.id = new_record_id();
                updated.clear_promotion();
                replaced_id = Some(original.id.clone());
            } else if updated.is_saved_to_summary && updated.diverged_from_snapshot() {
                updated.is_saved_to_summary = false;
            }

            let final_id = updated.id.clone();
            if let Some(sede) = state.sedes.get_mut(&updated.sede) {
                if updated.exercise_name != original.exercise_name {
                    add_name_to_day(sede, &updated.day, &updated.exercise_name);
                }
                let day_state = sede
                    .workout_days
                    .entry(updated.day.clone())
                    .or_insert_with(WorkoutDayState::fresh);
                if let Some(old_id) = &replaced_id {
                    day_state.expanded_logs.retain(|expanded| expanded != old_id);
                }
                if !day_state.expanded_logs.contains(&final_id) {
                    day_state.expanded_logs.push(final_id.clone());
                }
            }

            state.daily_logs[index] = updated;
            Ok(final_id)
        })
    }

    pub fn remove_daily_log(&mut self, id: &str) -> StoreResult<()> {
        let index = daily_index(&self.state, id)?;
        self.mutate("remove_daily_log", |state| {
            state.daily_logs.remove(index);
            Ok(())
        })
    }

    /// Drops one media item; out-of-range indexes leave the media unchanged.
    pub fn remove_daily_log_media(&mut self, id: &str, media_index: usize) -> StoreResult<RecordId> {
        let log = self
            .state
            .daily_log(id)
            .ok_or_else(|| StoreError::LogNotFound(id.to_string()))?;
        let media = without_index(&log.media, media_index);
        self.update_daily_log(
            id,
            LogUpdate {
                media: Some(media),
                ..LogUpdate::default()
            },
        )
    }

    /// Daily logs of one workout day, newest first; undated logs last.
    pub fn daily_logs_for_day(&self, day: &str) -> Vec<&ExerciseLog> {
        let today = local_today();
        let mut logs: Vec<&ExerciseLog> = self
            .state
            .daily_logs
            .iter()
            .filter(|log| log.day == day)
            .collect();
        logs.sort_by(|a, b| {
            compare_dates_desc(
                parse_custom_date(&a.date, today),
                parse_custom_date(&b.date, today),
            )
        });
        logs
    }

    /// Copies a daily log into the summary and flags it as saved.
    ///
    /// Also re-expands the log's week, day and exercise group in the summary.
    pub fn save_log_to_summary(&mut self, id: &str) -> StoreResult<()> {
        let index = daily_index(&self.state, id)?;
        let today = local_today();

        self.mutate("save_log_to_summary", |state| {
            let log = &mut state.daily_logs[index];
            log.is_saved_to_summary = true;
            log.saved_state = Some(log.snapshot());
            let summary_copy = log.summary_copy();

            if let Some(date) = parse_custom_date(&summary_copy.date, today) {
                if let Some(sede) = state.sedes.get_mut(&summary_copy.sede) {
                    let week = week_key(date);
                    let day_key = format!("{week}-{}", summary_copy.day);
                    let group_key = format!("{day_key}-{}", summary_copy.exercise_name);
                    sede.expand_summary_path(&week, &day_key, &group_key);
                }
            }

            match state
                .summary_logs
                .iter()
                .position(|existing| existing.id == summary_copy.id)
            {
                Some(position) => state.summary_logs[position] = summary_copy,
                None => state.summary_logs.insert(0, summary_copy),
            }
            Ok(())
        })
    }

    /// Removes a summary entry and un-flags its daily copy.
    pub fn remove_summary_log(&mut self, id: &str) -> StoreResult<()> {
        if self.state.summary_log(id).is_none() {
            return Err(StoreError::LogNotFound(id.to_string()));
        }
        self.mutate("remove_summary_log", |state| {
            state.summary_logs.retain(|log| log.id != id);
            state.clear_promotions([id]);
            Ok(())
        })
    }

    pub fn remove_summary_log_media(&mut self, id: &str, media_index: usize) -> StoreResult<()> {
        if self.state.summary_log(id).is_none() {
            return Err(StoreError::LogNotFound(id.to_string()));
        }
        self.mutate("remove_summary_log_media", |state| {
            if let Some(log) = state.summary_logs.iter_mut().find(|log| log.id == id) {
                log.media = without_index(&log.media, media_index);
            }
            Ok(())
        })
    }

    /// Removes every summary log dated inside the week starting at
    /// `week_start`; returns how many were removed.
    pub fn remove_week_data(&mut self, week_start: &str) -> StoreResult<usize> {
        let start = parse_week_start(week_start)?;
        self.remove_summary_where("remove_week_data", start, |_| true)
    }

    /// Removes one day's summary logs inside a week; returns the count.
    pub fn remove_day_exercises(&mut self, week_start: &str, day: &str) -> StoreResult<usize> {
        let start = parse_week_start(week_start)?;
        self.remove_summary_where("remove_day_exercises", start, |log| log.day == day)
    }

    fn remove_summary_where(
        &mut self,
        operation: &'static str,
        start: NaiveDate,
        matches: impl Fn(&ExerciseLog) -> bool,
    ) -> StoreResult<usize> {
        let today = local_today();
        self.mutate(operation, |state| {
            let removed: Vec<RecordId> = state
                .summary_logs
                .iter()
                .filter(|log| matches(log) && dated_in_week(log, start, today))
                .map(|log| log.id.clone())
                .collect();

            state
                .summary_logs
                .retain(|log| !removed.contains(&log.id));
            state.clear_promotions(removed.iter().map(String::as_str));
            Ok(removed.len())
        })
    }
}

fn daily_index(state: &AppState, id: &str) -> StoreResult<usize> {
    state
        .daily_logs
        .iter()
        .position(|log| log.id == id)
        .ok_or_else(|| StoreError::LogNotFound(id.to_string()))
}

/// Records `name` under `day`, creating the day list when missing.
pub(super) fn add_name_to_day(sede: &mut SedeData, day: &str, name: &str) -> bool {
    let normalized = normalize_name(name);
    if normalized.is_empty() {
        return false;
    }
    let names = sede.exercise_names.entry(day.to_string()).or_default();
    insert_sorted_unique(names, normalized)
}

pub(crate) fn parse_week_start(week_start: &str) -> StoreResult<NaiveDate> {
    parse_custom_date(week_start, local_today())
        .ok_or_else(|| StoreError::InvalidDate(week_start.to_string()))
}

pub(crate) fn dated_in_week(log: &ExerciseLog, start: NaiveDate, today: NaiveDate) -> bool {
    parse_custom_date(&log.date, today).is_some_and(|date| in_week(date, start))
}

fn without_index<T: Clone>(items: &[T], index: usize) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter(|(position, _)| *position != index)
        .map(|(_, item)| item.clone())
        .collect()
}
