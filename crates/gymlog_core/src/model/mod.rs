//! Persisted domain model for the workout ledger.
//!
//! # Responsibility
//! - Mirror the JSON shape of the stored state blob (camelCase fields).
//! - Provide constructors for fresh records and default state.
//!
//! # Invariants
//! - Every log and cardio session is identified by a stable string id.
//! - A daily log and its summary copy share the same id.

pub mod day;
pub mod exercise;
pub mod nada;
pub mod sede;
pub mod state;

/// Stable identifier for logs, sessions, links and favourites.
///
/// Kept as a string: imported blobs carry ids generated elsewhere.
pub type RecordId = String;

/// Generates a fresh random record id.
pub fn new_record_id() -> RecordId {
    uuid::Uuid::new_v4().to_string()
}
