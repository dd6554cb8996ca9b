//! Top-level persisted state.

use super::exercise::ExerciseLog;
use super::nada::NadaSession;
use super::sede::SedeData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sedes seeded into a brand-new state, in display order.
pub const DEFAULT_SEDES: [&str; 2] = ["VENTAS", "LEGANÉS"];

/// Whole application state, serialized as one JSON blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub sedes: BTreeMap<String, SedeData>,
    #[serde(default)]
    pub active_sede: Option<String>,
    #[serde(default)]
    pub daily_logs: Vec<ExerciseLog>,
    #[serde(default)]
    pub summary_logs: Vec<ExerciseLog>,
    #[serde(default)]
    pub sede_order: Vec<String>,
    #[serde(default)]
    pub daily_nada_sessions: Vec<NadaSession>,
    #[serde(default)]
    pub summary_nada_sessions: Vec<NadaSession>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            sedes: DEFAULT_SEDES
                .iter()
                .map(|name| (name.to_string(), SedeData::fresh()))
                .collect(),
            active_sede: None,
            daily_logs: Vec::new(),
            summary_logs: Vec::new(),
            sede_order: DEFAULT_SEDES.iter().map(|name| name.to_string()).collect(),
            daily_nada_sessions: Vec::new(),
            summary_nada_sessions: Vec::new(),
        }
    }
}

impl AppState {
    pub fn daily_log(&self, id: &str) -> Option<&ExerciseLog> {
        self.daily_logs.iter().find(|log| log.id == id)
    }

    pub fn summary_log(&self, id: &str) -> Option<&ExerciseLog> {
        self.summary_logs.iter().find(|log| log.id == id)
    }

    /// Un-flags the daily copies of the given summary ids.
    pub fn clear_promotions<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let ids: Vec<&str> = ids.into_iter().collect();
        for log in self
            .daily_logs
            .iter_mut()
            .filter(|log| ids.contains(&log.id.as_str()))
        {
            log.clear_promotion();
        }
    }

    /// Existing sede key matching `name` case-insensitively.
    pub fn find_sede_key(&self, name: &str) -> Option<&str> {
        let wanted = name.to_uppercase();
        self.sedes
            .keys()
            .find(|key| key.to_uppercase() == wanted)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::AppState;

    #[test]
    fn default_state_seeds_two_sedes_in_order() {
        let state = AppState::default();
        assert_eq!(state.sede_order, vec!["VENTAS", "LEGANÉS"]);
        assert!(state.sedes.contains_key("LEGANÉS"));
        assert!(state.active_sede.is_none());
    }

    #[test]
    fn find_sede_key_ignores_case() {
        let state = AppState::default();
        assert_eq!(state.find_sede_key("leganés"), Some("LEGANÉS"));
        assert_eq!(state.find_sede_key("centro"), None);
    }
}
