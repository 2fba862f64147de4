//! Heritage record domain model.
//!
//! # Responsibility
//! - Define the immutable catalogue entry shared by every view projection.
//! - Define the closed category and protection-level enumerations.
//!
//! # Invariants
//! - `id` is stable and unique inside one `RecordStore`.
//! - A record with non-finite or out-of-range coordinates may still be listed,
//!   but never gets a map marker.
//!
//! # See also
//! - crate::catalog for load-time validation.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable record identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RecordId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Heritage category. The set is closed; serialized with the catalogue labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "民间文学")]
    FolkLiterature,
    #[serde(rename = "传统音乐")]
    TraditionalMusic,
    #[serde(rename = "传统舞蹈")]
    TraditionalDance,
    #[serde(rename = "传统戏剧")]
    TraditionalOpera,
    #[serde(rename = "曲艺")]
    Quyi,
    #[serde(rename = "传统体育")]
    TraditionalSports,
    #[serde(rename = "传统美术")]
    TraditionalArt,
    #[serde(rename = "传统技艺")]
    TraditionalCraft,
    #[serde(rename = "传统医药")]
    TraditionalMedicine,
    #[serde(rename = "民俗")]
    FolkCustom,
}

impl Category {
    /// All categories in canonical listing order.
    pub const ALL: [Category; 10] = [
        Category::FolkLiterature,
        Category::TraditionalMusic,
        Category::TraditionalDance,
        Category::TraditionalOpera,
        Category::Quyi,
        Category::TraditionalSports,
        Category::TraditionalArt,
        Category::TraditionalCraft,
        Category::TraditionalMedicine,
        Category::FolkCustom,
    ];

    /// Catalogue label, also the text matched by free-text search.
    pub fn label(self) -> &'static str {
        match self {
            Self::FolkLiterature => "民间文学",
            Self::TraditionalMusic => "传统音乐",
            Self::TraditionalDance => "传统舞蹈",
            Self::TraditionalOpera => "传统戏剧",
            Self::Quyi => "曲艺",
            Self::TraditionalSports => "传统体育",
            Self::TraditionalArt => "传统美术",
            Self::TraditionalCraft => "传统技艺",
            Self::TraditionalMedicine => "传统医药",
            Self::FolkCustom => "民俗",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.label() == value.trim())
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Protection tier. Ordering follows priority: national > provincial > municipal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtectionLevel {
    #[serde(rename = "国家级")]
    National,
    #[serde(rename = "省级")]
    Provincial,
    #[serde(rename = "市级")]
    Municipal,
}

impl ProtectionLevel {
    /// Levels from highest to lowest tier.
    pub const ALL: [ProtectionLevel; 3] = [
        ProtectionLevel::National,
        ProtectionLevel::Provincial,
        ProtectionLevel::Municipal,
    ];

    pub fn priority(self) -> u8 {
        match self {
            Self::National => 3,
            Self::Provincial => 2,
            Self::Municipal => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::National => "国家级",
            Self::Provincial => "省级",
            Self::Municipal => "市级",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.label() == value.trim())
    }
}

impl PartialOrd for ProtectionLevel {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProtectionLevel {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl Display for ProtectionLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// WGS-84 style position. Serialized as `{ "lng": .., "lat": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinates {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Returns whether this position can be placed on a map surface.
    pub fn is_valid(&self) -> bool {
        self.lng.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lng)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

/// Exhibition status label used by the catalogue source.
pub const STATUS_ON_DISPLAY: &str = "在展";
/// Records carrying this status are withheld from the catalogue.
pub const STATUS_HIDDEN: &str = "隐藏";

/// One heritage entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub category: Category,
    pub city: String,
    pub level: ProtectionLevel,
    /// `None` when the source row has no position at all.
    #[serde(rename = "coords")]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    STATUS_ON_DISPLAY.to_string()
}

impl Record {
    /// Creates an on-display record without summary.
    pub fn new(
        id: impl Into<RecordId>,
        name: impl Into<String>,
        category: Category,
        city: impl Into<String>,
        level: ProtectionLevel,
        coordinates: Option<Coordinates>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            city: city.into(),
            level,
            coordinates,
            summary: None,
            status: default_status(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Returns coordinates only when they are finite and in range.
    pub fn map_position(&self) -> Option<Coordinates> {
        self.coordinates.filter(Coordinates::is_valid)
    }

    pub fn has_valid_geometry(&self) -> bool {
        self.map_position().is_some()
    }

    pub fn is_hidden(&self) -> bool {
        self.status.trim() == STATUS_HIDDEN
    }

    /// Validates identity fields. Geometry is checked separately because
    /// records without a position are still listable.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(RecordValidationError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(RecordValidationError::EmptyName(self.id.clone()));
        }
        Ok(())
    }
}

/// Identity-level validation failures for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    EmptyId,
    EmptyName(RecordId),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "record id must not be empty"),
            Self::EmptyName(id) => write!(f, "record `{id}` has an empty name"),
        }
    }
}

impl Error for RecordValidationError {}
