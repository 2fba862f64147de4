//! Map-facing layer: adapter contract, marker styling and reconciliation.
//!
//! # Responsibility
//! - Keep surface side effects behind `MapAdapter`.
//! - Own marker handle lifetimes in one place (`MarkerReconciler`).

pub mod adapter;
pub mod queue;
pub mod reconciler;
pub mod style;
