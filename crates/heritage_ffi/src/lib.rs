//! Flutter-facing bindings for the heritage map core.

pub mod api;
