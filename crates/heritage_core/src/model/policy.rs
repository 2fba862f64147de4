//! Category visibility policy.
//!
//! # Invariants
//! - `ShowOnly` always carries a non-empty set; an empty selection cannot be
//!   represented.
//! - "Every category selected" is stored as `ShowAll`, never as
//!   `ShowOnly(all)` (see [`VisibilityPolicy::normalized`]).

use crate::model::record::Category;
use std::collections::BTreeSet;

/// Non-empty set of categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategorySet(BTreeSet<Category>);

impl CategorySet {
    /// Returns `None` for an empty input.
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Option<Self> {
        let set = categories.into_iter().collect::<BTreeSet<_>>();
        if set.is_empty() {
            None
        } else {
            Some(Self(set))
        }
    }

    pub fn single(category: Category) -> Self {
        Self(BTreeSet::from([category]))
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains(&category)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with std collections.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        self.0.iter().copied()
    }

    pub fn as_set(&self) -> &BTreeSet<Category> {
        &self.0
    }
}

/// Tri-state category restriction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum VisibilityPolicy {
    /// No restriction.
    #[default]
    ShowAll,
    /// Only these categories.
    ShowOnly(CategorySet),
    /// Nothing is displayed.
    HideAll,
}

impl VisibilityPolicy {
    /// Returns whether a record of `category` passes the category filter.
    pub fn admits(&self, category: Category) -> bool {
        match self {
            Self::ShowAll => true,
            Self::ShowOnly(set) => set.contains(category),
            Self::HideAll => false,
        }
    }

    /// Returns whether the policy restricts the listed records.
    ///
    /// `HideAll` suppresses display through the view's visibility flag
    /// instead of emptying the composition.
    pub fn narrows(&self, category: Category) -> bool {
        match self {
            Self::ShowOnly(set) => !set.contains(category),
            Self::ShowAll | Self::HideAll => false,
        }
    }

    pub fn is_hide_all(&self) -> bool {
        matches!(self, Self::HideAll)
    }

    pub fn is_show_all(&self) -> bool {
        matches!(self, Self::ShowAll)
    }

    /// Effective selected set against `enumeration`. `ShowAll` expands to the
    /// whole enumeration and `HideAll` to nothing.
    pub fn effective_set(&self, enumeration: &[Category]) -> BTreeSet<Category> {
        match self {
            Self::ShowAll => enumeration.iter().copied().collect(),
            Self::ShowOnly(set) => set.as_set().clone(),
            Self::HideAll => BTreeSet::new(),
        }
    }

    /// Collapses `ShowOnly(enumeration)` to `ShowAll`.
    pub fn normalized(self, enumeration: &[Category]) -> Self {
        match self {
            Self::ShowOnly(set) if covers(set.as_set(), enumeration) => Self::ShowAll,
            other => other,
        }
    }

    /// Number of selected categories as shown by a category control.
    pub fn selected_count(&self, enumeration: &[Category]) -> usize {
        match self {
            Self::ShowAll => enumeration.len(),
            Self::ShowOnly(set) => set.len(),
            Self::HideAll => 0,
        }
    }
}

fn covers(set: &BTreeSet<Category>, enumeration: &[Category]) -> bool {
    !enumeration.is_empty() && enumeration.iter().all(|category| set.contains(category))
}

#[cfg(test)]
mod tests {
    use super::{CategorySet, VisibilityPolicy};
    use crate::model::record::Category;

    #[test]
    fn empty_category_set_cannot_be_built() {
        assert!(CategorySet::new(Vec::new()).is_none());
    }

    #[test]
    fn admits_follows_variant() {
        let only_opera = VisibilityPolicy::ShowOnly(CategorySet::single(
            Category::TraditionalOpera,
        ));
        assert!(VisibilityPolicy::ShowAll.admits(Category::Quyi));
        assert!(only_opera.admits(Category::TraditionalOpera));
        assert!(!only_opera.admits(Category::Quyi));
        assert!(!VisibilityPolicy::HideAll.admits(Category::TraditionalOpera));
    }

    #[test]
    fn show_only_of_whole_enumeration_normalizes_to_show_all() {
        let enumeration = [Category::Quyi, Category::FolkCustom];
        let policy = VisibilityPolicy::ShowOnly(
            CategorySet::new(enumeration).expect("non-empty"),
        );
        assert_eq!(policy.normalized(&enumeration), VisibilityPolicy::ShowAll);
    }
}
