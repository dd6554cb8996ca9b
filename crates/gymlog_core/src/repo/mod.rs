//! Persistence contracts for the state blob.
//!
//! # Responsibility
//! - Define the key-value contract the store depends on.
//! - Keep SQL inside the core persistence boundary.
//!
//! # Invariants
//! - Exactly one payload exists per storage key.
//! - Repositories never interpret the payload.

pub mod state_repo;
