//! Persistence contracts and their SQLite implementations.
//!
//! # Invariants
//! - Repository writes validate records before touching SQL.

pub mod record_repo;
