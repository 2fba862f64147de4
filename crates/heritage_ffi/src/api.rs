//! FFI use-case API for the Flutter map screen.
//!
//! # Responsibility
//! - Expose the map session commands to Dart via FRB.
//! - Hand queued map surface operations to the host as JSON.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The session lives on the calling thread; hosts call from one isolate.
//!
//! # See also
//! - `heritage_core::session`

use heritage_core::db::open_db;
use heritage_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    sample_records, Category, CommandQueueAdapter, MapCommand, MapConfig, MapSession,
    MarkerId, RecordRepository, RecordStore, SqliteRecordRepository, VisibilityPolicy,
};
use log::{error, info};
use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::OnceLock;

const CATALOG_DB_ENV: &str = "HERITAGE_CATALOG_DB_PATH";
static CATALOG_DB_PATH: OnceLock<Option<PathBuf>> = OnceLock::new();

type QueuedSession = MapSession<CommandQueueAdapter>;

thread_local! {
    static SESSION: RefCell<Option<QueuedSession>> = const { RefCell::new(None) };
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns an empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One listed record.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRecordItem {
    pub id: String,
    pub name: String,
    /// Category display label.
    pub category: String,
    pub city: String,
    /// Protection level display label.
    pub level: String,
    pub lng: Option<f64>,
    pub lat: Option<f64>,
    pub summary: Option<String>,
}

/// Category count used by the statistics panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: u32,
}

/// Snapshot of the map screen after a command.
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewResponse {
    /// Whether the command succeeded.
    pub ok: bool,
    /// Human-readable message for diagnostics.
    pub message: String,
    /// `show_all|show_only|hide_all`.
    pub policy: String,
    /// Category labels ticked in the category control.
    pub selected_categories: Vec<String>,
    pub search_query: String,
    pub selected_record_id: Option<String>,
    /// `false` while every category is hidden.
    pub overall_visible: bool,
    /// Records the list should display.
    pub records: Vec<MapRecordItem>,
    pub total: u32,
    /// Records currently displayed; `0` while every category is hidden.
    pub filtered: u32,
    pub category_counts: Vec<CategoryCount>,
    pub live_markers: u32,
}

impl MapViewResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            policy: String::new(),
            selected_categories: Vec::new(),
            search_query: String::new(),
            selected_record_id: None,
            overall_visible: false,
            records: Vec::new(),
            total: 0,
            filtered: 0,
            category_counts: Vec::new(),
            live_markers: 0,
        }
    }
}

/// Generic action envelope for viewport commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapActionResponse {
    pub ok: bool,
    pub message: String,
}

/// Opens (or reopens) the map session and returns its first snapshot.
///
/// The catalogue comes from the SQLite file named by
/// `HERITAGE_CATALOG_DB_PATH` when set (seeded with the sample when empty),
/// otherwise from the built-in sample. Reopening destroys the previous
/// session's markers; those destroys drain before the new creates.
#[flutter_rust_bridge::frb(sync)]
pub fn session_open() -> MapViewResponse {
    let store = match load_catalogue() {
        Ok(store) => store,
        Err(err) => {
            error!("event=session_open module=ffi status=error error={err}");
            return MapViewResponse::failure(format!("session_open failed: {err}"));
        }
    };

    SESSION.with(|slot| {
        let Ok(mut slot) = slot.try_borrow_mut() else {
            return MapViewResponse::failure("map session is busy");
        };
        let retired = slot.take().map(retire_session).unwrap_or_default();

        let mut session = MapSession::queued(store, MapConfig::default());
        session.adapter_mut().carry_over(retired);
        session.sync();
        let response = snapshot(&session, "session opened");
        *slot = Some(session);
        response
    })
}

/// Destroys the previous session's markers and returns every command the
/// host has not drained yet.
fn retire_session(mut previous: QueuedSession) -> Vec<MapCommand> {
    previous.clear_markers();
    let pending = previous.adapter_mut().drain_commands();
    info!(
        "event=session_retire module=ffi status=ok carried_commands={}",
        pending.len()
    );
    pending
}

#[flutter_rust_bridge::frb(sync)]
pub fn set_search_query(query: String) -> MapViewResponse {
    run_command("search updated", |session| {
        session.set_search_query(query);
        Ok(())
    })
}

/// Toggles one category by display label.
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_category(category: String) -> MapViewResponse {
    run_command("category toggled", |session| {
        session.toggle_category(parse_category(&category)?);
        Ok(())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn select_only(category: String) -> MapViewResponse {
    run_command("category selected", |session| {
        session.select_only(parse_category(&category)?);
        Ok(())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn show_all() -> MapViewResponse {
    run_command("all categories shown", |session| {
        session.show_all();
        Ok(())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn hide_all() -> MapViewResponse {
    run_command("all categories hidden", |session| {
        session.hide_all();
        Ok(())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn reset_filters() -> MapViewResponse {
    run_command("filters reset", |session| {
        session.reset();
        Ok(())
    })
}

/// Selects a record by id, or clears the selection with `None`.
#[flutter_rust_bridge::frb(sync)]
pub fn select_record(record_id: Option<String>) -> MapViewResponse {
    run_command("selection updated", |session| {
        session.select_record(record_id.as_deref());
        Ok(())
    })
}

/// Reports a click on a marker created by a `create_marker` command.
#[flutter_rust_bridge::frb(sync)]
pub fn marker_clicked(marker_id: String) -> MapViewResponse {
    run_command("marker clicked", |session| {
        let parsed = MarkerId::parse(&marker_id)
            .ok_or_else(|| format!("invalid marker id `{marker_id}`"))?;
        if session.dispatch_click(&parsed) {
            Ok(())
        } else {
            Err(format!("marker `{marker_id}` is not live"))
        }
    })
}

/// Current snapshot without changing anything.
#[flutter_rust_bridge::frb(sync)]
pub fn current_view() -> MapViewResponse {
    run_command("ok", |_| Ok(()))
}

/// Queues a viewport move onto one record.
#[flutter_rust_bridge::frb(sync)]
pub fn focus_record(record_id: String) -> MapActionResponse {
    run_action(|session| {
        if session.focus_record(&record_id) {
            Ok(format!("focused {record_id}"))
        } else {
            Err(format!("record `{record_id}` has no map position"))
        }
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn reset_view() -> MapActionResponse {
    run_action(|session| {
        session.reset_view();
        Ok("view reset".to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn fit_to_markers() -> MapActionResponse {
    run_action(|session| {
        session.fit_to_markers();
        Ok("fit queued".to_string())
    })
}

/// Returns queued surface operations as JSON objects tagged by `op`.
///
/// # FFI contract
/// - Draining empties the queue; each command is delivered once.
/// - Returns an empty list when no session is open.
#[flutter_rust_bridge::frb(sync)]
pub fn drain_map_commands() -> Vec<String> {
    let drained = with_session(|session| Ok(session.adapter_mut().drain_commands()));
    let Ok(commands) = drained else {
        return Vec::new();
    };
    commands
        .iter()
        .filter_map(|command| match serde_json::to_string(command) {
            Ok(json) => Some(json),
            Err(err) => {
                error!("event=map_command_encode module=ffi status=error error={err}");
                None
            }
        })
        .collect()
}

fn run_command(
    success_message: &str,
    command: impl FnOnce(&mut QueuedSession) -> Result<(), String>,
) -> MapViewResponse {
    let outcome = with_session(|session| {
        let result = command(session);
        Ok(match result {
            Ok(()) => snapshot(session, success_message),
            Err(message) => MapViewResponse {
                ok: false,
                ..snapshot(session, &message)
            },
        })
    });
    outcome.unwrap_or_else(|message| MapViewResponse::failure(message))
}

fn run_action(
    action: impl FnOnce(&mut QueuedSession) -> Result<String, String>,
) -> MapActionResponse {
    match with_session(action) {
        Ok(message) => MapActionResponse { ok: true, message },
        Err(message) => MapActionResponse { ok: false, message },
    }
}

fn with_session<T>(f: impl FnOnce(&mut QueuedSession) -> Result<T, String>) -> Result<T, String> {
    SESSION.with(|slot| {
        let mut slot = slot
            .try_borrow_mut()
            .map_err(|_| "map session is busy".to_string())?;
        match slot.as_mut() {
            Some(session) => f(session),
            None => Err("map session is not open; call session_open first".to_string()),
        }
    })
}

fn parse_category(label: &str) -> Result<Category, String> {
    Category::from_label(label).ok_or_else(|| format!("unknown category `{}`", label.trim()))
}

fn snapshot(session: &QueuedSession, message: &str) -> MapViewResponse {
    let state = session.selection();
    let view = session.view();
    let enumeration = session.store().categories();

    let policy = match &state.policy {
        VisibilityPolicy::ShowAll => "show_all",
        VisibilityPolicy::ShowOnly(_) => "show_only",
        VisibilityPolicy::HideAll => "hide_all",
    };
    let selected_categories = state
        .policy
        .effective_set(enumeration)
        .into_iter()
        .map(|category| category.label().to_string())
        .collect();

    MapViewResponse {
        ok: true,
        message: message.to_string(),
        policy: policy.to_string(),
        selected_categories,
        search_query: state.search_query.clone(),
        selected_record_id: state.selected_record_id.as_ref().map(|id| id.to_string()),
        overall_visible: view.overall_visible,
        records: view
            .visible_records()
            .iter()
            .map(|record| MapRecordItem {
                id: record.id.to_string(),
                name: record.name.clone(),
                category: record.category.label().to_string(),
                city: record.city.clone(),
                level: record.level.label().to_string(),
                lng: record.coordinates.map(|position| position.lng),
                lat: record.coordinates.map(|position| position.lat),
                summary: record.summary.clone(),
            })
            .collect(),
        total: to_u32(view.stats.total),
        filtered: to_u32(view.stats.displayed),
        category_counts: view
            .stats
            .categories_by_count()
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.label().to_string(),
                count: to_u32(count),
            })
            .collect(),
        live_markers: to_u32(session.reconciler().live_count()),
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn load_catalogue() -> Result<RecordStore, String> {
    let Some(path) = resolve_catalog_db_path() else {
        return Ok(RecordStore::sample());
    };

    let conn = open_db(&path).map_err(|err| format!("catalogue DB open failed: {err}"))?;
    let repo = SqliteRecordRepository::new(&conn);
    if repo.count().map_err(|err| err.to_string())? == 0 {
        repo.insert_records(&sample_records())
            .map_err(|err| format!("catalogue seed failed: {err}"))?;
        info!("event=catalog_seed module=ffi status=ok source=sample");
    }
    repo.load_store().map_err(|err| err.to_string())
}

fn resolve_catalog_db_path() -> Option<PathBuf> {
    CATALOG_DB_PATH
        .get_or_init(|| {
            std::env::var(CATALOG_DB_ENV)
                .ok()
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
                .map(PathBuf::from)
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::{
        current_view, drain_map_commands, focus_record, hide_all, init_logging, marker_clicked,
        ping, select_record, session_open, set_search_query, toggle_category,
    };

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn init_logging_rejects_relative_log_dir() {
        let error = init_logging("info".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn commands_before_open_fail_softly() {
        let response = current_view();
        assert!(!response.ok);
        assert!(response.message.contains("session_open"));
        assert!(drain_map_commands().is_empty());
    }

    #[test]
    fn open_queues_one_create_per_record() {
        let response = session_open();
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.total, 24);
        assert_eq!(response.live_markers, 24);

        let commands = drain_map_commands();
        assert_eq!(commands.len(), 24);
        assert!(commands
            .iter()
            .all(|json| json.contains("\"op\":\"create_marker\"")));
        assert!(drain_map_commands().is_empty());
    }

    #[test]
    fn search_and_hide_update_the_snapshot() {
        session_open();
        let searched = set_search_query("皮影".to_string());
        let ids = searched
            .records
            .iter()
            .map(|record| record.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["7", "15"]);

        let hidden = hide_all();
        assert_eq!(hidden.policy, "hide_all");
        assert!(!hidden.overall_visible);
        assert!(hidden.records.is_empty());
        assert_eq!(hidden.filtered, 0);
        assert_eq!(hidden.total, 24);
        assert_eq!(hidden.live_markers, 0);
    }

    #[test]
    fn reopen_destroys_previous_markers_on_host() {
        session_open();
        let first = drain_map_commands();
        assert_eq!(first.len(), 24);

        let reopened = session_open();
        assert!(reopened.ok, "{}", reopened.message);
        assert_eq!(reopened.live_markers, 24);

        let commands = drain_map_commands();
        let destroys = commands
            .iter()
            .filter(|json| json.contains("\"op\":\"destroy_marker\""))
            .count();
        let creates = commands
            .iter()
            .filter(|json| json.contains("\"op\":\"create_marker\""))
            .count();
        assert_eq!(destroys, 24);
        assert_eq!(creates, 24);
        assert!(commands[..24]
            .iter()
            .all(|json| json.contains("\"op\":\"destroy_marker\"")));
    }

    #[test]
    fn unknown_category_label_is_reported() {
        session_open();
        let response = toggle_category("魔法".to_string());
        assert!(!response.ok);
        assert_eq!(response.policy, "show_all");
    }

    #[test]
    fn host_click_selects_record() {
        session_open();
        select_record(None);
        let commands = drain_map_commands();
        let first: serde_json::Value =
            serde_json::from_str(&commands[0]).expect("command is valid JSON");
        let marker_id = first["marker_id"].as_str().expect("marker id").to_string();
        let record_id = first["descriptor"]["record_id"]
            .as_str()
            .expect("record id")
            .to_string();

        let response = marker_clicked(marker_id);
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.selected_record_id, Some(record_id));

        assert!(!marker_clicked("not-a-marker".to_string()).ok);
    }

    #[test]
    fn focus_unknown_record_fails() {
        session_open();
        assert!(focus_record("1".to_string()).ok);
        assert!(!focus_record("missing".to_string()).ok);
    }
}
