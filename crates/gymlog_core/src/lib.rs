//! Core domain logic for gymlog.
//! This crate is the single source of truth for the workout ledger's data
//! model, state migration and mutation rules.

pub mod dates;
pub mod db;
pub mod export;
pub mod logging;
pub mod migrate;
pub mod model;
pub mod repo;
pub mod service;
pub mod summary;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use export::ExportFile;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::exercise::{ExerciseLog, ExerciseMedia, LogUpdate, NewExerciseLog};
pub use model::nada::{NadaSession, NewNadaSession};
pub use model::state::AppState;
pub use model::RecordId;
pub use repo::state_repo::{RepoError, RepoResult, SqliteStateRepository, StateRepository};
pub use service::store::{AppStore, StoreError, StoreResult, STORAGE_KEY};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
