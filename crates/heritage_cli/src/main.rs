//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `heritage_core` linkage without a map host.
//! - Print the sample catalogue view for an optional search query.

use heritage_core::{compute_view, ProtectionLevel, RecordStore, SelectionState};

fn main() {
    println!("heritage_core ping={}", heritage_core::ping());
    println!("heritage_core version={}", heritage_core::core_version());

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let store = RecordStore::sample();
    let view = compute_view(
        &store,
        &SelectionState {
            search_query: query.clone(),
            ..SelectionState::default()
        },
    );

    println!(
        "catalogue total={} filtered={} query={:?}",
        view.stats.total, view.stats.filtered, query
    );
    for level in ProtectionLevel::ALL {
        println!(
            "level {}={} ({:.0}%)",
            level,
            view.stats.count_for_level(level),
            view.stats.level_share(level)
        );
    }
    for record in view.visible_records() {
        println!(
            "{} {} [{}] {} {}",
            record.id, record.name, record.category, record.city, record.level
        );
    }
}
