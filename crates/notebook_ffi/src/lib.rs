//! Flutter-facing bindings for the notebook core.

pub mod api;
