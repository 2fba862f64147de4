//! Immutable record catalogue for one view session.
//!
//! # Responsibility
//! - Hold the ordered, read-only record list loaded once per session.
//! - Supply the category enumeration used by selection transitions.
//!
//! # Invariants
//! - Record ids are unique; construction rejects duplicates.
//! - Records are never mutated after load. Reload replaces the whole store.
//! - Invalid geometry is reported once per record, at load time.

mod sample;

pub use sample::sample_records;

use crate::model::record::{Category, ProtectionLevel, Record, RecordId, RecordValidationError};
use log::{info, warn};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Load-time catalogue integrity errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    DuplicateRecordId(RecordId),
    InvalidRecord(RecordValidationError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateRecordId(id) => write!(f, "duplicate record id in catalogue: {id}"),
            Self::InvalidRecord(err) => write!(f, "invalid catalogue record: {err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DuplicateRecordId(_) => None,
            Self::InvalidRecord(err) => Some(err),
        }
    }
}

impl From<RecordValidationError> for CatalogError {
    fn from(value: RecordValidationError) -> Self {
        Self::InvalidRecord(value)
    }
}

/// Read-only record catalogue.
///
/// Cheap to clone; clones share the same backing storage.
#[derive(Debug, Clone)]
pub struct RecordStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    records: Vec<Record>,
    positions: HashMap<RecordId, usize>,
    categories: Vec<Category>,
    invalid_geometry: Vec<RecordId>,
}

impl RecordStore {
    /// Builds a store from loader output.
    ///
    /// Hidden-status records are withheld. Records without a usable position
    /// are kept for listing and logged once.
    ///
    /// # Errors
    /// - `DuplicateRecordId` when two records share an id.
    /// - `InvalidRecord` when a record has a blank id or name.
    pub fn new(records: impl IntoIterator<Item = Record>) -> CatalogResult<Self> {
        let mut kept = Vec::new();
        let mut positions = HashMap::new();
        let mut categories = Vec::new();
        let mut invalid_geometry = Vec::new();
        let mut withheld = 0usize;

        for record in records {
            record.validate()?;
            if record.is_hidden() {
                withheld += 1;
                continue;
            }
            if positions.contains_key(&record.id) {
                return Err(CatalogError::DuplicateRecordId(record.id));
            }
            if !record.has_valid_geometry() {
                warn!(
                    "event=catalog_invalid_geometry module=catalog status=skipped record_id={}",
                    record.id
                );
                invalid_geometry.push(record.id.clone());
            }
            if !categories.contains(&record.category) {
                categories.push(record.category);
            }
            positions.insert(record.id.clone(), kept.len());
            kept.push(record);
        }

        info!(
            "event=catalog_load module=catalog status=ok records={} categories={} invalid_geometry={} withheld={}",
            kept.len(),
            categories.len(),
            invalid_geometry.len(),
            withheld
        );

        Ok(Self {
            inner: Arc::new(StoreInner {
                records: kept,
                positions,
                categories,
                invalid_geometry,
            }),
        })
    }

    /// Store over the built-in 24-record sample.
    pub fn sample() -> Self {
        Self::new(sample_records()).unwrap_or_else(|_| Self::empty())
    }

    pub fn empty() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                records: Vec::new(),
                positions: HashMap::new(),
                categories: Vec::new(),
                invalid_geometry: Vec::new(),
            }),
        }
    }

    /// Records in load order.
    pub fn records(&self) -> &[Record] {
        &self.inner.records
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.inner
            .positions
            .get(id)
            .and_then(|&index| self.inner.records.get(index))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.positions.contains_key(id)
    }

    /// Category enumeration: distinct categories in first-appearance order.
    pub fn categories(&self) -> &[Category] {
        &self.inner.categories
    }

    /// Distinct cities in first-appearance order.
    pub fn cities(&self) -> Vec<&str> {
        let mut cities: Vec<&str> = Vec::new();
        for record in self.records() {
            if !cities.contains(&record.city.as_str()) {
                cities.push(record.city.as_str());
            }
        }
        cities
    }

    /// Distinct protection levels, highest tier first.
    pub fn levels(&self) -> Vec<ProtectionLevel> {
        ProtectionLevel::ALL
            .into_iter()
            .filter(|level| self.records().iter().any(|r| r.level == *level))
            .collect()
    }

    /// Ids of records that can be listed but never get a marker.
    pub fn invalid_geometry_ids(&self) -> &[RecordId] {
        &self.inner.invalid_geometry
    }

    pub fn len(&self) -> usize {
        self.inner.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.records.is_empty()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::empty()
    }
}
