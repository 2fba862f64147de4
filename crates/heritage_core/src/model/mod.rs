//! Domain model for the heritage map.
//!
//! # Responsibility
//! - Define the immutable catalogue record and its closed enumerations.
//! - Define the tri-state category visibility policy.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId`.
//! - "Hide everything" is a policy variant, never a sentinel category.

pub mod policy;
pub mod record;
