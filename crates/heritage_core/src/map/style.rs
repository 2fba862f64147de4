//! Marker visual descriptors.
//!
//! # Responsibility
//! - Map a record's category and protection level to a visual descriptor.
//! - Validate palette overrides supplied by the host.
//!
//! # Invariants
//! - Palette colors are always `#RRGGBB`.
//! - Higher protection tiers render above lower ones.

use crate::model::record::{Category, ProtectionLevel, Record, RecordId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid hex color regex"));

/// Fallback for categories missing from a palette.
pub const FALLBACK_COLOR: &str = "#6366F1";

/// Marker footprint preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl MarkerSize {
    /// `(width, height)` in pixels.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Small => (8, 10),
            Self::Medium => (12, 15),
            Self::Large => (16, 20),
        }
    }
}

/// Per-tier rendering weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelStyle {
    pub color: &'static str,
    pub opacity: f32,
    pub z_index: i32,
}

pub fn level_style(level: ProtectionLevel) -> LevelStyle {
    match level {
        ProtectionLevel::National => LevelStyle {
            color: "#FFD700",
            opacity: 1.0,
            z_index: 100,
        },
        ProtectionLevel::Provincial => LevelStyle {
            color: "#3B82F6",
            opacity: 0.9,
            z_index: 50,
        },
        ProtectionLevel::Municipal => LevelStyle {
            color: "#6B7280",
            opacity: 0.8,
            z_index: 10,
        },
    }
}

/// Palette override rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    InvalidColor { category: Category, value: String },
}

impl Display for StyleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidColor { category, value } => {
                write!(f, "invalid color `{value}` for category {category}; expected #RRGGBB")
            }
        }
    }
}

impl Error for StyleError {}

/// Category color assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPalette {
    colors: BTreeMap<Category, String>,
}

impl Default for CategoryPalette {
    fn default() -> Self {
        let colors = [
            (Category::TraditionalOpera, "#00D9FF"),
            (Category::TraditionalMusic, "#3B82F6"),
            (Category::TraditionalDance, "#8B5CF6"),
            (Category::Quyi, "#F59E0B"),
            (Category::TraditionalSports, "#10B981"),
            (Category::TraditionalArt, "#EF4444"),
            (Category::TraditionalCraft, "#F97316"),
            (Category::TraditionalMedicine, "#84CC16"),
            (Category::FolkCustom, "#EC4899"),
            (Category::FolkLiterature, "#6366F1"),
        ]
        .into_iter()
        .map(|(category, color)| (category, color.to_string()))
        .collect();
        Self { colors }
    }
}

impl CategoryPalette {
    /// Overrides one category color.
    ///
    /// # Errors
    /// - `InvalidColor` when `color` is not `#RRGGBB`.
    pub fn set_color(&mut self, category: Category, color: &str) -> Result<(), StyleError> {
        let trimmed = color.trim();
        if !HEX_COLOR_RE.is_match(trimmed) {
            return Err(StyleError::InvalidColor {
                category,
                value: trimmed.to_string(),
            });
        }
        self.colors.insert(category, trimmed.to_ascii_uppercase());
        Ok(())
    }

    pub fn color(&self, category: Category) -> &str {
        self.colors
            .get(&category)
            .map(String::as_str)
            .unwrap_or(FALLBACK_COLOR)
    }
}

/// Visual descriptor handed to `MapAdapter::create_marker`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerDescriptor {
    pub record_id: RecordId,
    pub label: String,
    pub subtitle: String,
    pub color: String,
    /// Protection tier accent, used for the marker outline.
    pub tier_color: String,
    pub opacity: f32,
    pub z_index: i32,
    pub width: u32,
    pub height: u32,
}

/// Builds descriptors from palette and size preset.
#[derive(Debug, Clone, Default)]
pub struct MarkerStyle {
    pub palette: CategoryPalette,
    pub size: MarkerSize,
}

impl MarkerStyle {
    pub fn new(palette: CategoryPalette, size: MarkerSize) -> Self {
        Self { palette, size }
    }

    pub fn describe(&self, record: &Record) -> MarkerDescriptor {
        let tier = level_style(record.level);
        let (width, height) = self.size.dimensions();
        MarkerDescriptor {
            record_id: record.id.clone(),
            label: record.name.clone(),
            subtitle: format!("{} · {}", record.city, record.level),
            color: self.palette.color(record.category).to_string(),
            tier_color: tier.color.to_string(),
            opacity: tier.opacity,
            z_index: tier.z_index,
            width,
            height,
        }
    }
}
