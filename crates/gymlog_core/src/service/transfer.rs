//! Import of exported state files.
//!
//! # Responsibility
//! - Accept full-state exports (deep merge over the current state) and
//!   partial exports (log lists merged by id).
//! - Archive the pre-import state before anything is replaced.
//!
//! # Invariants
//! - A rejected import leaves the in-memory and stored state unchanged.
//! - Merging by id keeps existing positions; new ids are appended.

use super::store::{AppStore, StoreError, StoreResult};
use crate::migrate::{
    backfill_exercise_names, coerce_numeric_ids, decode_state, split_legacy_logs,
};
use crate::model::exercise::ExerciseLog;
use crate::repo::state_repo::StateRepository;
use log::info;
use serde_json::{Map, Value};

/// Keys whose joint presence marks a full-state export.
const FULL_IMPORT_KEYS: [&str; 3] = ["sedes", "activeSede", "sedeOrder"];

/// What an import did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Whole state deep-merged over the current one.
    Full,
    /// Only `dailyLogs` / `summaryLogs` merged by id.
    Logs { daily: usize, summary: usize },
}

impl<R: StateRepository> AppStore<R> {
    /// Imports an exported JSON document.
    ///
    /// # Errors
    /// - `InvalidImport` when the text is not a JSON object or does not
    ///   decode into state records.
    /// - Repository errors from archiving or persisting.
    pub fn import_data(&mut self, json: &str) -> StoreResult<ImportMode> {
        let mut imported: Value = serde_json::from_str(json)
            .map_err(|err| StoreError::InvalidImport(err.to_string()))?;
        if !imported.is_object() {
            return Err(StoreError::InvalidImport(
                "top-level value must be an object".to_string(),
            ));
        }
        split_legacy_logs(&mut imported);
        coerce_numeric_ids(&mut imported);

        let is_full = FULL_IMPORT_KEYS
            .iter()
            .all(|key| imported.get(key).is_some());

        let (next, mode) = if is_full {
            let mut merged = serde_json::to_value(&self.state)?;
            deep_merge(&mut merged, imported);
            let next = decode_state(merged)
                .map_err(|err| StoreError::InvalidImport(err.to_string()))?;
            (next, ImportMode::Full)
        } else {
            let daily = decode_logs(&imported, "dailyLogs")?;
            let summary = decode_logs(&imported, "summaryLogs")?;
            let mode = ImportMode::Logs {
                daily: daily.len(),
                summary: summary.len(),
            };

            let mut next = self.state.clone();
            let incoming: Vec<ExerciseLog> = daily.iter().chain(summary.iter()).cloned().collect();
            merge_by_id(&mut next.daily_logs, daily);
            merge_by_id(&mut next.summary_logs, summary);
            backfill_exercise_names(&mut next.sedes, &incoming);
            (next, mode)
        };

        self.archive_current("pre_import")?;
        self.replace_state(next)?;
        info!("event=state_import module=transfer status=ok mode={mode:?}");
        Ok(mode)
    }
}

/// Recursively merges `source` into `target`: objects merge key by key,
/// every other value (arrays included) replaces the target value.
pub fn deep_merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => merge_objects(target, source),
        (target, source) => *target = source,
    }
}

fn merge_objects(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        if let Some(existing) = target.get_mut(&key) {
            if existing.is_object() && value.is_object() {
                deep_merge(existing, value);
                continue;
            }
        }
        target.insert(key, value);
    }
}

/// Replaces records sharing an id in place and appends the rest.
pub fn merge_by_id(existing: &mut Vec<ExerciseLog>, incoming: Vec<ExerciseLog>) {
    for log in incoming {
        match existing.iter().position(|current| current.id == log.id) {
            Some(position) => existing[position] = log,
            None => existing.push(log),
        }
    }
}

fn decode_logs(imported: &Value, key: &str) -> StoreResult<Vec<ExerciseLog>> {
    match imported.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|err| StoreError::InvalidImport(format!("{key}: {err}"))),
    }
}
