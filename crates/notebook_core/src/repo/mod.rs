//! Repository layer over the key-value storage adapter.
//!
//! # Responsibility
//! - Define the note persistence contract the screens depend on.
//! - Hide the stored JSON layout from view states and FFI callers.
//!
//! # Invariants
//! - Mutations report id contract violations (`NotFound`, `DuplicateId`)
//!   separately from storage failures (`Persistence`).

pub mod note_repo;
