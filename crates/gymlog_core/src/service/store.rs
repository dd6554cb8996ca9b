//! Application state store.
//!
//! # Responsibility
//! - Load the state blob once (migrating legacy shapes) and keep it in
//!   memory.
//! - Run every mutation through one path that rewrites the blob afterwards.
//!
//! # Invariants
//! - A failed mutation leaves both memory and storage untouched: changes are
//!   applied to a copy that replaces the state only after it is written.
//! - An unparseable stored blob is archived before defaults replace it.

use crate::migrate;
use crate::model::sede::SedeData;
use crate::model::state::AppState;
use crate::model::RecordId;
use crate::repo::state_repo::{RepoError, StateRepository};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Storage key of the state blob.
pub const STORAGE_KEY: &str = "gymProgressionAppState_v2";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for store use-cases.
#[derive(Debug)]
pub enum StoreError {
    /// Persistence-layer failure.
    Repo(RepoError),
    /// State could not be encoded or decoded.
    Serialization(serde_json::Error),
    /// Operation needs a selected sede.
    NoActiveSede,
    /// Sede name is blank after normalization.
    InvalidSedeName(String),
    /// Rename target already exists.
    SedeExists(String),
    SedeNotFound(String),
    LogNotFound(RecordId),
    FavoriteNotFound(RecordId),
    /// Date text could not be parsed.
    InvalidDate(String),
    /// Cardio form field name or value was rejected.
    InvalidFormField(String),
    /// Import payload was rejected; state is unchanged.
    InvalidImport(String),
    /// Export slice contained no records.
    NothingToExport,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "state serialization failed: {err}"),
            Self::NoActiveSede => write!(f, "no active sede selected"),
            Self::InvalidSedeName(name) => write!(f, "invalid sede name: `{name}`"),
            Self::SedeExists(name) => write!(f, "a sede named `{name}` already exists"),
            Self::SedeNotFound(name) => write!(f, "sede not found: {name}"),
            Self::LogNotFound(id) => write!(f, "exercise log not found: {id}"),
            Self::FavoriteNotFound(id) => write!(f, "favorite exercise not found: {id}"),
            Self::InvalidDate(value) => write!(f, "invalid date: `{value}`"),
            Self::InvalidFormField(details) => write!(f, "invalid form field: {details}"),
            Self::InvalidImport(details) => write!(f, "invalid import file: {details}"),
            Self::NothingToExport => write!(f, "no data to export"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// In-memory state bound to a repository key.
pub struct AppStore<R: StateRepository> {
    repo: R,
    key: String,
    pub(super) state: AppState,
}

impl<R: StateRepository> AppStore<R> {
    /// Loads the state stored under [`STORAGE_KEY`].
    pub fn open(repo: R) -> StoreResult<Self> {
        Self::open_with_key(repo, STORAGE_KEY)
    }

    /// Loads the state stored under `key` and writes back the normalized
    /// form.
    ///
    /// # Errors
    /// Only repository failures; undecodable payloads fall back to defaults.
    pub fn open_with_key(repo: R, key: impl Into<String>) -> StoreResult<Self> {
        let key = key.into();
        let state = match repo.load_state(&key)? {
            None => {
                info!("event=state_load module=store status=ok source=default");
                AppState::default()
            }
            Some(payload) => match migrate::load_state(&payload) {
                Ok(state) => {
                    info!(
                        "event=state_load module=store status=ok source=stored bytes={}",
                        payload.len()
                    );
                    state
                }
                Err(err) => {
                    warn!(
                        "event=state_load module=store status=fallback error_code=state_decode_failed error={}",
                        err
                    );
                    repo.backup_state(&key, &payload, "unparseable")?;
                    AppState::default()
                }
            },
        };

        let store = Self { repo, key, state };
        store.persist()?;
        Ok(store)
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Currently selected sede, if any.
    pub fn active_sede(&self) -> Option<&str> {
        self.state.active_sede.as_deref()
    }

    /// Data of the selected sede.
    pub fn active_sede_data(&self) -> Option<&SedeData> {
        self.state
            .active_sede
            .as_ref()
            .and_then(|name| self.state.sedes.get(name))
    }

    /// Applies `change` to a copy of the state, writes the copy and only
    /// then swaps it in.
    pub(super) fn mutate<T>(
        &mut self,
        operation: &'static str,
        change: impl FnOnce(&mut AppState) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut next = self.state.clone();
        let value = change(&mut next).inspect_err(|err| {
            warn!("event=state_mutate module=store status=rejected op={operation} error={err}");
        })?;
        self.replace_state(next)?;
        info!("event=state_mutate module=store status=ok op={operation}");
        Ok(value)
    }

    /// Persists `state` and then swaps it in; a failed write keeps the
    /// current state.
    pub(super) fn replace_state(&mut self, state: AppState) -> StoreResult<()> {
        self.write(&state)?;
        self.state = state;
        Ok(())
    }

    pub(super) fn archive_current(&self, reason: &str) -> StoreResult<()> {
        let payload = serde_json::to_string(&self.state)?;
        self.repo.backup_state(&self.key, &payload, reason)?;
        Ok(())
    }

    fn persist(&self) -> StoreResult<()> {
        self.write(&self.state)
    }

    fn write(&self, state: &AppState) -> StoreResult<()> {
        let started_at = Instant::now();
        let payload = serde_json::to_string(state)?;
        match self.repo.save_state(&self.key, &payload) {
            Ok(()) => {
                info!(
                    "event=state_save module=store status=ok bytes={} duration_ms={}",
                    payload.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=state_save module=store status=error error_code=state_save_failed error={}",
                    err
                );
                Err(err.into())
            }
        }
    }
}

/// Selected sede name and its data, or `NoActiveSede`.
pub(super) fn active_sede_mut(state: &mut AppState) -> StoreResult<(String, &mut SedeData)> {
    let name = state.active_sede.clone().ok_or(StoreError::NoActiveSede)?;
    let data = state
        .sedes
        .get_mut(&name)
        .ok_or_else(|| StoreError::SedeNotFound(name.clone()))?;
    Ok((name, data))
}
