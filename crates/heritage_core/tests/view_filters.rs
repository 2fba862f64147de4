use heritage_core::{
    compute_view, Category, CategorySet, ProtectionLevel, RecordStore, SelectionState,
    VisibilityPolicy,
};

fn ids(view: &heritage_core::DerivedView) -> Vec<&str> {
    view.filtered_records
        .iter()
        .map(|record| record.id.as_str())
        .collect()
}

#[test]
fn text_and_category_filters_compose_as_intersection() {
    let store = RecordStore::sample();
    let opera_only = VisibilityPolicy::ShowOnly(CategorySet::single(Category::TraditionalOpera));

    let both = compute_view(
        &store,
        &SelectionState {
            policy: opera_only.clone(),
            search_query: "秦腔".to_string(),
            ..SelectionState::default()
        },
    );
    assert_eq!(ids(&both), vec!["1"]);

    let query_only = compute_view(
        &store,
        &SelectionState {
            search_query: "渭南".to_string(),
            ..SelectionState::default()
        },
    );
    let opera_in_weinan = compute_view(
        &store,
        &SelectionState {
            policy: opera_only,
            search_query: "渭南".to_string(),
            ..SelectionState::default()
        },
    );
    assert_eq!(ids(&query_only), vec!["2", "7", "8", "15"]);
    assert_eq!(ids(&opera_in_weinan), vec!["15"]);
}

#[test]
fn shadow_puppet_query_keeps_catalogue_order() {
    let store = RecordStore::sample();
    let view = compute_view(
        &store,
        &SelectionState {
            search_query: "  皮影 ".to_string(),
            ..SelectionState::default()
        },
    );
    assert_eq!(ids(&view), vec!["7", "15"]);
    assert_eq!(view.stats.filtered, 2);
    assert_eq!(view.stats.total, 24);
}

#[test]
fn query_matching_nothing_yields_empty_visible_view() {
    let store = RecordStore::sample();
    let view = compute_view(
        &store,
        &SelectionState {
            search_query: "不存在的项目".to_string(),
            ..SelectionState::default()
        },
    );
    assert!(view.filtered_records.is_empty());
    assert!(view.overall_visible);
    assert!(view.wanted_marker_ids().is_empty());
}

#[test]
fn hide_all_keeps_composition_but_suppresses_display() {
    let store = RecordStore::sample();
    let view = compute_view(
        &store,
        &SelectionState {
            policy: VisibilityPolicy::HideAll,
            ..SelectionState::default()
        },
    );
    assert!(!view.overall_visible);
    assert_eq!(view.filtered_records.len(), 24);
    assert!(view.visible_records().is_empty());
    assert_eq!(view.stats.filtered, 24);
    assert_eq!(view.stats.displayed, 0);
    assert_eq!(view.stats.selected, 0);
    assert_eq!(view.stats.total, 24);
}

#[test]
fn statistics_describe_the_whole_catalogue() {
    let store = RecordStore::sample();
    let view = compute_view(
        &store,
        &SelectionState {
            policy: VisibilityPolicy::ShowOnly(CategorySet::single(Category::Quyi)),
            ..SelectionState::default()
        },
    );

    let stats = &view.stats;
    assert_eq!(stats.total, 24);
    assert_eq!(stats.selected, view.filtered_records.len());
    assert_eq!(stats.by_category.values().sum::<usize>(), 24);
    assert_eq!(stats.by_level.values().sum::<usize>(), 24);
    assert_eq!(stats.count_for_level(ProtectionLevel::National), 6);
    assert_eq!(stats.by_city.get("西安"), Some(&5));
    assert_eq!(stats.city_count(), 10);
}
