//! Selection state store: the single source of user filter intent.
//!
//! # Responsibility
//! - Hold the visibility policy, the raw search query and the selected record.
//! - Apply the category toggle state machine.
//!
//! # Invariants
//! - Every command is total; none can fail.
//! - Toggling down to zero categories yields `HideAll`, never `ShowAll`.
//! - Toggling up to every category yields `ShowAll`, never `ShowOnly(all)`.
//! - Commands referencing a category outside the enumeration are no-ops for
//!   toggles.

use crate::model::policy::{CategorySet, VisibilityPolicy};
use crate::model::record::{Category, RecordId};
use log::debug;

/// User filter intent snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub policy: VisibilityPolicy,
    /// Stored verbatim; trimming and case folding happen at derivation time.
    pub search_query: String,
    pub selected_record_id: Option<RecordId>,
}

/// Explicit store instance owning one [`SelectionState`].
#[derive(Debug, Clone)]
pub struct SelectionStore {
    state: SelectionState,
    categories: Vec<Category>,
}

impl SelectionStore {
    /// Creates a store in the initial `{ ShowAll, "", none }` state.
    ///
    /// `categories` is the enumeration supplied by the record store.
    pub fn new(categories: impl Into<Vec<Category>>) -> Self {
        Self {
            state: SelectionState::default(),
            categories: categories.into(),
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn policy(&self) -> &VisibilityPolicy {
        &self.state.policy
    }

    pub fn search_query(&self) -> &str {
        &self.state.search_query
    }

    pub fn selected_record_id(&self) -> Option<&RecordId> {
        self.state.selected_record_id.as_ref()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.search_query = query.into();
    }

    pub fn show_all(&mut self) {
        self.state.policy = VisibilityPolicy::ShowAll;
    }

    pub fn hide_all(&mut self) {
        self.state.policy = VisibilityPolicy::HideAll;
    }

    /// Exclusive single-category selection.
    pub fn select_only(&mut self, category: Category) {
        self.state.policy =
            VisibilityPolicy::ShowOnly(CategorySet::single(category)).normalized(&self.categories);
    }

    /// Applies the category toggle transition.
    ///
    /// From `HideAll` the toggled category is rescued alone; any selection
    /// that existed before hiding is not restored.
    pub fn toggle_category(&mut self, category: Category) {
        if !self.categories.contains(&category) {
            debug!(
                "event=toggle_category module=selection status=ignored reason=unknown_category category={}",
                category
            );
            return;
        }
        let next = toggled_policy(&self.state.policy, category, &self.categories);
        self.state.policy = next;
    }

    pub fn select_record(&mut self, record_id: Option<RecordId>) {
        self.state.selected_record_id = record_id;
    }

    /// Returns to `{ ShowAll, "", none }`.
    pub fn reset(&mut self) {
        self.state = SelectionState::default();
    }

    /// Replaces the enumeration after a catalogue reload.
    ///
    /// A `ShowOnly` set that loses every category falls back to `ShowAll`;
    /// a partially surviving set keeps its surviving members.
    pub fn replace_categories(&mut self, categories: impl Into<Vec<Category>>) {
        self.categories = categories.into();
        if let VisibilityPolicy::ShowOnly(set) = &self.state.policy {
            let surviving = set
                .iter()
                .filter(|category| self.categories.contains(category))
                .collect::<Vec<_>>();
            self.state.policy = match CategorySet::new(surviving) {
                Some(set) => VisibilityPolicy::ShowOnly(set).normalized(&self.categories),
                None => VisibilityPolicy::ShowAll,
            };
        }
    }
}

/// Pure toggle transition over a category enumeration.
pub fn toggled_policy(
    current: &VisibilityPolicy,
    category: Category,
    enumeration: &[Category],
) -> VisibilityPolicy {
    if current.is_hide_all() {
        return VisibilityPolicy::ShowOnly(CategorySet::single(category)).normalized(enumeration);
    }

    let mut effective = current.effective_set(enumeration);
    if effective.remove(&category) {
        return match CategorySet::new(effective) {
            Some(set) => VisibilityPolicy::ShowOnly(set),
            None => VisibilityPolicy::HideAll,
        };
    }

    effective.insert(category);
    match CategorySet::new(effective) {
        Some(set) => VisibilityPolicy::ShowOnly(set).normalized(enumeration),
        None => VisibilityPolicy::HideAll,
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectionState, SelectionStore};
    use crate::model::policy::{CategorySet, VisibilityPolicy};
    use crate::model::record::{Category, RecordId};

    fn three() -> Vec<Category> {
        vec![Category::Quyi, Category::FolkCustom, Category::TraditionalArt]
    }

    fn only(categories: &[Category]) -> VisibilityPolicy {
        VisibilityPolicy::ShowOnly(CategorySet::new(categories.iter().copied()).expect("non-empty"))
    }

    #[test]
    fn toggle_from_show_all_removes_one_category() {
        let mut store = SelectionStore::new(three());
        store.toggle_category(Category::Quyi);
        assert_eq!(
            store.policy(),
            &only(&[Category::FolkCustom, Category::TraditionalArt])
        );
    }

    #[test]
    fn toggle_from_hide_all_rescues_single_category() {
        let mut store = SelectionStore::new(three());
        store.hide_all();
        store.toggle_category(Category::FolkCustom);
        assert_eq!(store.policy(), &only(&[Category::FolkCustom]));
    }

    #[test]
    fn unknown_category_toggle_is_noop() {
        let mut store = SelectionStore::new(three());
        store.toggle_category(Category::TraditionalOpera);
        assert_eq!(store.policy(), &VisibilityPolicy::ShowAll);

        store.hide_all();
        store.toggle_category(Category::TraditionalOpera);
        assert_eq!(store.policy(), &VisibilityPolicy::HideAll);
    }

    #[test]
    fn select_only_is_exclusive() {
        let mut store = SelectionStore::new(three());
        store.toggle_category(Category::Quyi);
        store.select_only(Category::TraditionalArt);
        assert_eq!(store.policy(), &only(&[Category::TraditionalArt]));
    }

    #[test]
    fn single_category_enumeration_never_stores_show_only_all() {
        let mut store = SelectionStore::new(vec![Category::Quyi]);
        store.toggle_category(Category::Quyi);
        assert_eq!(store.policy(), &VisibilityPolicy::HideAll);
        store.toggle_category(Category::Quyi);
        assert_eq!(store.policy(), &VisibilityPolicy::ShowAll);
    }

    #[test]
    fn search_query_is_stored_verbatim() {
        let mut store = SelectionStore::new(three());
        store.set_search_query("  皮影 ");
        assert_eq!(store.search_query(), "  皮影 ");
    }

    #[test]
    fn reset_returns_initial_state() {
        let mut store = SelectionStore::new(three());
        store.hide_all();
        store.set_search_query("秦腔");
        store.select_record(Some(RecordId::new("1")));

        store.reset();
        assert_eq!(store.state(), &SelectionState::default());
    }

    #[test]
    fn replace_categories_drops_vanished_members() {
        let mut store = SelectionStore::new(three());
        store.select_only(Category::Quyi);
        store.replace_categories(vec![Category::FolkCustom]);
        assert_eq!(store.policy(), &VisibilityPolicy::ShowAll);
    }
}
