use heritage_core::{toggled_policy, Category, CategorySet, SelectionStore, VisibilityPolicy};

fn every_policy(enumeration: &[Category]) -> Vec<VisibilityPolicy> {
    let mut policies = vec![VisibilityPolicy::ShowAll, VisibilityPolicy::HideAll];
    for mask in 1u32..(1 << enumeration.len()) {
        let members = enumeration
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << bit) != 0)
            .map(|(_, category)| *category);
        let set = CategorySet::new(members).unwrap();
        policies.push(VisibilityPolicy::ShowOnly(set).normalized(enumeration));
    }
    policies
}

#[test]
fn toggling_twice_restores_every_visible_policy() {
    let enumeration = Category::ALL.to_vec();
    for policy in every_policy(&enumeration) {
        if policy.is_hide_all() {
            continue;
        }
        for category in Category::ALL {
            let once = toggled_policy(&policy, category, &enumeration);
            let twice = toggled_policy(&once, category, &enumeration);
            assert_eq!(twice, policy, "toggle {category} twice from {policy:?}");
        }
    }
}

#[test]
fn toggle_never_produces_full_show_only_or_empty_set() {
    let enumeration = vec![Category::Quyi, Category::FolkCustom, Category::TraditionalArt];
    for policy in every_policy(&enumeration) {
        for category in &enumeration {
            match toggled_policy(&policy, *category, &enumeration) {
                VisibilityPolicy::ShowOnly(set) => {
                    assert!(!set.is_empty());
                    assert!(set.len() < enumeration.len());
                }
                VisibilityPolicy::ShowAll | VisibilityPolicy::HideAll => {}
            }
        }
    }
}

#[test]
fn toggling_from_hide_all_rescues_only_that_category() {
    let enumeration = Category::ALL.to_vec();
    let rescued = toggled_policy(&VisibilityPolicy::HideAll, Category::Quyi, &enumeration);
    assert_eq!(
        rescued,
        VisibilityPolicy::ShowOnly(CategorySet::single(Category::Quyi))
    );
}

#[test]
fn rescue_in_single_category_enumeration_is_show_all() {
    let enumeration = vec![Category::Quyi];
    let rescued = toggled_policy(&VisibilityPolicy::HideAll, Category::Quyi, &enumeration);
    assert_eq!(rescued, VisibilityPolicy::ShowAll);
}

#[test]
fn toggling_twice_from_hide_all_returns_to_hide_all() {
    let enumeration = Category::ALL.to_vec();
    for category in Category::ALL {
        let once = toggled_policy(&VisibilityPolicy::HideAll, category, &enumeration);
        assert_eq!(once, VisibilityPolicy::ShowOnly(CategorySet::single(category)));
        let twice = toggled_policy(&once, category, &enumeration);
        assert_eq!(twice, VisibilityPolicy::HideAll, "toggle {category} twice");
    }
}

#[test]
fn toggling_twice_from_hide_all_with_one_category_passes_through_show_all() {
    let mut store = SelectionStore::new(vec![Category::Quyi]);
    store.hide_all();

    store.toggle_category(Category::Quyi);
    assert_eq!(store.policy(), &VisibilityPolicy::ShowAll);

    store.toggle_category(Category::Quyi);
    assert_eq!(store.policy(), &VisibilityPolicy::HideAll);
}

#[test]
fn deselecting_every_category_one_by_one_ends_in_hide_all() {
    let mut store = SelectionStore::new(Category::ALL.to_vec());
    for (index, category) in Category::ALL.into_iter().enumerate() {
        store.toggle_category(category);
        let remaining = Category::ALL.len() - index - 1;
        assert_eq!(store.policy().selected_count(store.categories()), remaining);
    }
    assert_eq!(store.policy(), &VisibilityPolicy::HideAll);
}

#[test]
fn reselecting_every_category_collapses_to_show_all() {
    let mut store = SelectionStore::new(Category::ALL.to_vec());
    store.hide_all();
    for category in Category::ALL {
        store.toggle_category(category);
    }
    assert_eq!(store.policy(), &VisibilityPolicy::ShowAll);
}

#[test]
fn reset_clears_query_policy_and_selection() {
    let mut store = SelectionStore::new(Category::ALL.to_vec());
    store.set_search_query("西安");
    store.select_only(Category::Quyi);
    store.select_record(Some("4".into()));

    store.reset();
    assert_eq!(store.policy(), &VisibilityPolicy::ShowAll);
    assert_eq!(store.search_query(), "");
    assert!(store.selected_record_id().is_none());
}
