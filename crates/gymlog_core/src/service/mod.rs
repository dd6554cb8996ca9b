//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory state and route every mutation through one
//!   persist path (`AppStore`).
//! - Group use-cases by concern: sedes, logs, cardio, per-sede library,
//!   import.

pub mod cardio;
pub mod library;
pub mod logs;
pub mod sedes;
pub mod store;
pub mod transfer;
