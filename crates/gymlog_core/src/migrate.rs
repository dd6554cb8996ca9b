//! Stored-blob migration and state normalization.
//!
//! # Responsibility
//! - Upgrade legacy blobs (single `exerciseLogs` list) to the daily/summary
//!   split.
//! - Backfill per-sede exercise name lists from recorded logs.
//! - Repair cross-references between `sedes`, `sedeOrder` and `activeSede`.
//!
//! # Invariants
//! - Migration never drops a legacy log: each becomes a daily log.
//! - A summary log is produced at most once per legacy id.

use crate::model::exercise::ExerciseLog;
use crate::model::sede::SedeData;
use crate::model::state::AppState;
use log::info;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

const LEGACY_LOGS_KEY: &str = "exerciseLogs";

const RECORD_LISTS: [&str; 4] = [
    "dailyLogs",
    "summaryLogs",
    "dailyNadaSessions",
    "summaryNadaSessions",
];

/// Fields copied from a legacy log (or its saved snapshot) into the summary.
const SUMMARY_FIELDS: [&str; 10] = [
    "exerciseName",
    "date",
    "reps",
    "kilos",
    "series",
    "media",
    "notes",
    "tiempo",
    "calorias",
    "distanceUnit",
];

/// Decodes a stored payload into a normalized state.
///
/// # Errors
/// Returns the JSON error when the payload is not a decodable state object.
pub fn load_state(payload: &str) -> Result<AppState, serde_json::Error> {
    decode_state(serde_json::from_str(payload)?)
}

/// Migrates, decodes and normalizes an already parsed state value.
///
/// # Errors
/// Returns the JSON error when the value does not decode into a state.
pub fn decode_state(mut value: Value) -> Result<AppState, serde_json::Error> {
    if split_legacy_logs(&mut value) {
        info!("event=state_migrate module=migrate status=ok step=legacy_split");
    }
    let coerced = coerce_numeric_ids(&mut value);
    if coerced > 0 {
        info!("event=state_migrate module=migrate status=ok step=numeric_ids count={coerced}");
    }

    let mut state: AppState = serde_json::from_value(value)?;
    let logs: Vec<ExerciseLog> = state
        .daily_logs
        .iter()
        .chain(state.summary_logs.iter())
        .cloned()
        .collect();
    backfill_exercise_names(&mut state.sedes, &logs);
    normalize_state(&mut state);
    Ok(state)
}

/// Splits a legacy `exerciseLogs` list into `dailyLogs` and `summaryLogs`.
///
/// Returns whether the blob was rewritten. Blobs that already carry either
/// new list are left alone.
pub fn split_legacy_logs(value: &mut Value) -> bool {
    let Some(root) = value.as_object_mut() else {
        return false;
    };
    if root.contains_key("dailyLogs") || root.contains_key("summaryLogs") {
        return false;
    }
    let Some(Value::Array(legacy_logs)) = root.remove(LEGACY_LOGS_KEY) else {
        return false;
    };

    let mut daily_logs = Vec::with_capacity(legacy_logs.len());
    let mut summary_logs = Vec::new();
    let mut summary_ids = HashSet::new();

    for legacy in legacy_logs {
        let Value::Object(legacy) = legacy else {
            continue;
        };
        let is_saved = is_true(legacy.get("isSavedToSummary"));
        let was_ever_saved = is_true(legacy.get("wasEverSaved"));
        let id = legacy.get("id").cloned().unwrap_or(Value::Null);
        let id_key = id.to_string();

        if (is_saved || was_ever_saved) && summary_ids.insert(id_key) {
            summary_logs.push(Value::Object(legacy_summary_log(&legacy, id)));
        }

        let mut daily = legacy;
        daily.remove("wasEverSaved");
        if !is_saved {
            daily.remove("isSavedToSummary");
            daily.remove("savedState");
        }
        daily_logs.push(Value::Object(daily));
    }

    root.insert("dailyLogs".to_string(), Value::Array(daily_logs));
    root.insert("summaryLogs".to_string(), Value::Array(summary_logs));
    true
}

fn legacy_summary_log(legacy: &Map<String, Value>, id: Value) -> Map<String, Value> {
    let source = match legacy.get("savedState") {
        Some(Value::Object(saved)) => saved,
        _ => legacy,
    };

    let mut summary = Map::new();
    summary.insert("id".to_string(), id);
    for field in SUMMARY_FIELDS {
        if let Some(value) = source.get(field) {
            summary.insert(field.to_string(), value.clone());
        }
    }
    if !summary.contains_key("media") {
        summary.insert("media".to_string(), Value::Array(Vec::new()));
    }
    if let Some(day) = legacy.get("day") {
        summary.insert("day".to_string(), day.clone());
    }
    if let Some(sede) = source.get("sede").or_else(|| legacy.get("sede")) {
        summary.insert("sede".to_string(), sede.clone());
    }
    summary
}

/// Rewrites numeric record ids in the log and session lists as strings.
///
/// Returns how many ids were rewritten.
pub fn coerce_numeric_ids(value: &mut Value) -> usize {
    let Some(root) = value.as_object_mut() else {
        return 0;
    };
    let mut coerced = 0;
    for list in RECORD_LISTS {
        let Some(Value::Array(records)) = root.get_mut(list) else {
            continue;
        };
        for record in records.iter_mut().filter_map(Value::as_object_mut) {
            if let Some(Value::Number(number)) = record.get("id") {
                let id = number.to_string();
                record.insert("id".to_string(), Value::String(id));
                coerced += 1;
            }
        }
    }
    coerced
}

fn is_true(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

/// Records each log's upper-cased exercise name under its sede and day.
///
/// Only day lists that already exist are extended; every list ends sorted.
pub fn backfill_exercise_names(sedes: &mut BTreeMap<String, SedeData>, logs: &[ExerciseLog]) {
    for (sede_name, sede) in sedes.iter_mut() {
        for log in logs.iter().filter(|log| &log.sede == sede_name) {
            if !log.day.is_empty() {
                sede.remember_exercise_name(&log.day, &log.exercise_name);
            }
        }
        for names in sede.exercise_names.values_mut() {
            names.sort();
        }
    }
}

/// Repairs references between sedes, their order and the active selection.
pub fn normalize_state(state: &mut AppState) {
    if state.sedes.is_empty() && state.sede_order.is_empty() {
        let defaults = AppState::default();
        state.sedes = defaults.sedes;
        state.sede_order = defaults.sede_order;
    }

    let mut seen = HashSet::new();
    state.sede_order.retain(|name| seen.insert(name.clone()));

    for name in &state.sede_order {
        state
            .sedes
            .entry(name.clone())
            .or_insert_with(SedeData::fresh);
    }
    for name in state.sedes.keys() {
        if !seen.contains(name) {
            state.sede_order.push(name.clone());
        }
    }

    if let Some(active) = &state.active_sede {
        if !state.sedes.contains_key(active) {
            state.active_sede = None;
        }
    }

    for log in state
        .daily_logs
        .iter_mut()
        .filter(|log| log.is_saved_to_summary && log.saved_state.is_none())
    {
        log.saved_state = Some(log.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::{coerce_numeric_ids, load_state, normalize_state, split_legacy_logs};
    use crate::model::state::AppState;
    use serde_json::json;

    #[test]
    fn split_leaves_current_blobs_alone() {
        let mut value = json!({ "dailyLogs": [], "exerciseLogs": [{ "id": "x" }] });
        assert!(!split_legacy_logs(&mut value));
        assert!(value.get("exerciseLogs").is_some());
    }

    #[test]
    fn split_produces_one_summary_per_saved_id() {
        let mut value = json!({
            "exerciseLogs": [
                { "id": "a", "exerciseName": "REMO", "isSavedToSummary": true, "sede": "VENTAS", "day": "Día 3" },
                { "id": "a", "exerciseName": "REMO", "wasEverSaved": true, "sede": "VENTAS", "day": "Día 3" },
                { "id": "b", "exerciseName": "CURL", "sede": "VENTAS", "day": "Día 1", "savedState": {} }
            ]
        });
        assert!(split_legacy_logs(&mut value));

        let daily = value["dailyLogs"].as_array().unwrap();
        let summary = value["summaryLogs"].as_array().unwrap();
        assert_eq!(daily.len(), 3);
        assert_eq!(summary.len(), 1);
        assert!(daily[1].get("wasEverSaved").is_none());
        assert!(daily[2].get("savedState").is_none());
        assert_eq!(summary[0]["sede"], "VENTAS");
    }

    #[test]
    fn normalize_repairs_order_and_active_sede() {
        let mut state = AppState::default();
        state.sede_order = vec!["CENTRO".to_string(), "VENTAS".to_string(), "VENTAS".to_string()];
        state.active_sede = Some("GONE".to_string());
        normalize_state(&mut state);

        assert_eq!(state.sede_order, vec!["CENTRO", "VENTAS", "LEGANÉS"]);
        assert!(state.sedes.contains_key("CENTRO"));
        assert!(state.active_sede.is_none());
    }

    #[test]
    fn numeric_ids_become_strings() {
        let mut value = json!({
            "dailyLogs": [{ "id": 1717400000000_u64 }, { "id": "abc" }],
            "summaryNadaSessions": [{ "id": 7 }]
        });
        assert_eq!(coerce_numeric_ids(&mut value), 2);
        assert_eq!(value["dailyLogs"][0]["id"], "1717400000000");
        assert_eq!(value["summaryNadaSessions"][0]["id"], "7");

        let state = load_state(r#"{"summaryLogs":[{"id":42,"exerciseName":"REMO"}]}"#).unwrap();
        assert_eq!(state.summary_logs[0].id, "42");
    }

    #[test]
    fn empty_object_loads_default_sedes() {
        let state = load_state("{}").unwrap();
        assert_eq!(state.sede_order, AppState::default().sede_order);
        assert!(load_state("[1, 2]").is_err());
    }
}
