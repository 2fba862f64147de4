//! Derived view computation.
//!
//! # Responsibility
//! - Turn `(RecordStore, SelectionState)` into a read-only `DerivedView`.
//! - Compute catalogue composition statistics for UI collaborators.
//!
//! # Invariants
//! - Pure: no internal state, same inputs give the same view.
//! - `filtered_records` keeps catalogue order.
//! - `overall_visible` is `false` iff the policy is `HideAll`, regardless of
//!   how many records the text filter matches.
//! - Statistics describe the unfiltered catalogue.

use crate::catalog::RecordStore;
use crate::model::policy::VisibilityPolicy;
use crate::model::record::{Category, ProtectionLevel, Record, RecordId};
use crate::selection::SelectionState;
use std::collections::BTreeMap;

/// Trims and case-folds a raw search query.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Returns whether `record` passes the free-text filter for an already
/// normalized query.
pub fn matches_query(record: &Record, normalized_query: &str) -> bool {
    if normalized_query.is_empty() {
        return true;
    }
    [
        record.name.as_str(),
        record.city.as_str(),
        record.category.label(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(normalized_query))
}

/// Per-city composition used by region distribution panels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CityBreakdown {
    pub total: usize,
    pub by_level: BTreeMap<ProtectionLevel, usize>,
    pub by_category: BTreeMap<Category, usize>,
}

/// Catalogue composition statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewStats {
    pub total: usize,
    pub filtered: usize,
    /// Records actually displayed: `filtered` while visible, `0` under
    /// `HideAll`. Count panels read this one.
    pub displayed: usize,
    /// Records admitted by the category policy alone.
    pub selected: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub by_level: BTreeMap<ProtectionLevel, usize>,
    /// Keyed by city name; `city_order` keeps first-appearance order.
    pub by_city: BTreeMap<String, usize>,
    city_order: Vec<String>,
    category_order: Vec<Category>,
    city_breakdown: BTreeMap<String, CityBreakdown>,
}

impl ViewStats {
    fn from_catalogue(store: &RecordStore, policy: &VisibilityPolicy, filtered: usize) -> Self {
        let mut stats = Self {
            total: store.len(),
            filtered,
            category_order: store.categories().to_vec(),
            ..Self::default()
        };

        for record in store.records() {
            *stats.by_category.entry(record.category).or_default() += 1;
            *stats.by_level.entry(record.level).or_default() += 1;
            if !stats.by_city.contains_key(&record.city) {
                stats.city_order.push(record.city.clone());
            }
            *stats.by_city.entry(record.city.clone()).or_default() += 1;

            let city = stats.city_breakdown.entry(record.city.clone()).or_default();
            city.total += 1;
            *city.by_level.entry(record.level).or_default() += 1;
            *city.by_category.entry(record.category).or_default() += 1;

            if policy.admits(record.category) {
                stats.selected += 1;
            }
        }
        stats
    }

    /// Categories with counts, most common first. Ties keep enumeration order.
    pub fn categories_by_count(&self) -> Vec<(Category, usize)> {
        let mut ranked = self
            .category_order
            .iter()
            .map(|category| (*category, self.count_for_category(*category)))
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Cities with counts, most common first, truncated to `limit`.
    pub fn cities_by_count(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut ranked = self
            .city_order
            .iter()
            .map(|city| (city.as_str(), self.by_city.get(city).copied().unwrap_or(0)))
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }

    pub fn count_for_category(&self, category: Category) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }

    pub fn count_for_level(&self, level: ProtectionLevel) -> usize {
        self.by_level.get(&level).copied().unwrap_or(0)
    }

    /// Percentage of the catalogue at `level`; `0.0` for an empty catalogue.
    pub fn level_share(&self, level: ProtectionLevel) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count_for_level(level) as f64 * 100.0 / self.total as f64
    }

    pub fn city_breakdown(&self, city: &str) -> Option<&CityBreakdown> {
        self.city_breakdown.get(city)
    }

    pub fn city_count(&self) -> usize {
        self.city_order.len()
    }
}

/// Recomputed projection of the catalogue under the current selection.
#[derive(Debug, Clone, Default)]
pub struct DerivedView {
    pub filtered_records: Vec<Record>,
    pub overall_visible: bool,
    pub stats: ViewStats,
}

impl DerivedView {
    /// Records a list or map should display: empty while hidden.
    pub fn visible_records(&self) -> &[Record] {
        if self.overall_visible {
            &self.filtered_records
        } else {
            &[]
        }
    }

    /// Ids the marker layer should hold: visible records with usable
    /// geometry, in catalogue order.
    pub fn wanted_marker_ids(&self) -> Vec<&RecordId> {
        self.visible_records()
            .iter()
            .filter(|record| record.has_valid_geometry())
            .map(|record| &record.id)
            .collect()
    }

}

/// Computes the derived view.
///
/// A record is listed when it passes the text filter and is not excluded by
/// a `ShowOnly` restriction. `HideAll` keeps the composition and clears
/// `overall_visible`, so downstream consumers suppress display.
pub fn compute_view(store: &RecordStore, state: &SelectionState) -> DerivedView {
    let query = normalize_query(&state.search_query);
    let policy = &state.policy;

    let filtered_records = store
        .records()
        .iter()
        .filter(|record| matches_query(record, &query))
        .filter(|record| !policy.narrows(record.category))
        .cloned()
        .collect::<Vec<_>>();

    let overall_visible = !policy.is_hide_all();
    let mut stats = ViewStats::from_catalogue(store, policy, filtered_records.len());
    if overall_visible {
        stats.displayed = stats.filtered;
    }

    DerivedView {
        filtered_records,
        overall_visible,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::{compute_view, matches_query, normalize_query};
    use crate::catalog::RecordStore;
    use crate::model::policy::{CategorySet, VisibilityPolicy};
    use crate::model::record::{Category, ProtectionLevel};
    use crate::selection::SelectionState;

    #[test]
    fn normalize_query_trims_and_folds_case() {
        assert_eq!(normalize_query("  QinQiang "), "qinqiang");
    }

    #[test]
    fn query_matches_name_city_or_category_but_not_summary() {
        let store = RecordStore::sample();
        let record = store.get("1").expect("sample record 1");
        assert!(matches_query(record, "秦腔"));
        assert!(matches_query(record, "西安"));
        assert!(matches_query(record, "戏剧"));
        assert!(!matches_query(record, "活化石"));
    }

    #[test]
    fn show_all_with_blank_query_lists_everything() {
        let store = RecordStore::sample();
        let view = compute_view(&store, &SelectionState::default());
        assert_eq!(view.filtered_records.len(), 24);
        assert!(view.overall_visible);
        assert_eq!(view.stats.total, 24);
        assert_eq!(view.stats.filtered, 24);
        assert_eq!(view.stats.displayed, 24);
        assert_eq!(view.stats.selected, 24);
    }

    #[test]
    fn stats_describe_unfiltered_catalogue() {
        let store = RecordStore::sample();
        let state = SelectionState {
            policy: VisibilityPolicy::ShowOnly(CategorySet::single(Category::Quyi)),
            ..SelectionState::default()
        };
        let view = compute_view(&store, &state);

        assert_eq!(view.filtered_records.len(), 1);
        assert_eq!(view.stats.total, 24);
        assert_eq!(view.stats.selected, 1);
        assert_eq!(view.stats.count_for_category(Category::TraditionalArt), 4);
        assert_eq!(view.stats.count_for_level(ProtectionLevel::National), 6);
        assert_eq!(view.stats.by_city.get("渭南"), Some(&4));
    }

    #[test]
    fn ranking_helpers_sort_by_count() {
        let view = compute_view(&RecordStore::sample(), &SelectionState::default());
        let top = view.stats.categories_by_count();
        assert_eq!(top[0], (Category::TraditionalArt, 4));
        assert_eq!(top[1], (Category::TraditionalCraft, 4));

        let cities = view.stats.cities_by_count(1);
        assert_eq!(cities, vec![("西安", 5)]);
        assert_eq!(view.stats.city_count(), 10);

        let yulin = view.stats.city_breakdown("榆林").expect("榆林 breakdown");
        assert_eq!(yulin.total, 3);
        assert_eq!(yulin.by_level.get(&ProtectionLevel::National), Some(&1));
    }

    #[test]
    fn hidden_view_lists_nothing_for_display() {
        let store = RecordStore::sample();
        let state = SelectionState {
            policy: VisibilityPolicy::HideAll,
            ..SelectionState::default()
        };
        let view = compute_view(&store, &state);
        assert!(!view.overall_visible);
        assert!(view.visible_records().is_empty());
        assert!(view.wanted_marker_ids().is_empty());
        assert_eq!(view.filtered_records.len(), 24);
        assert_eq!(view.stats.displayed, view.visible_records().len());
        assert_eq!(view.stats.displayed, 0);
        assert_eq!(view.stats.selected, 0);
    }
}
