//! Core domain logic for the heritage map.
//! Filtering, derived statistics and marker reconciliation live here; hosts
//! only supply a map surface through [`MapAdapter`].

pub mod catalog;
pub mod config;
pub mod db;
pub mod logging;
pub mod map;
pub mod model;
pub mod repo;
pub mod selection;
pub mod session;
pub mod view;

pub use catalog::{sample_records, CatalogError, CatalogResult, RecordStore};
pub use config::MapConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use map::adapter::{MapAdapter, MapAdapterError, MarkerClickCallback};
pub use map::queue::{CommandQueueAdapter, MapCommand, MarkerId};
pub use map::reconciler::{LayerReady, MarkerReconciler, ReconcileReport};
pub use map::style::{CategoryPalette, MarkerDescriptor, MarkerSize, MarkerStyle, StyleError};
pub use model::policy::{CategorySet, VisibilityPolicy};
pub use model::record::{
    Category, Coordinates, ProtectionLevel, Record, RecordId, RecordValidationError,
};
pub use repo::record_repo::{RecordRepository, RepoError, RepoResult, SqliteRecordRepository};
pub use selection::{toggled_policy, SelectionState, SelectionStore};
pub use session::{MapSession, SessionEvent};
pub use view::{compute_view, DerivedView, ViewStats};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
