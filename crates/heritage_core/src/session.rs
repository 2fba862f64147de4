//! Map view session wiring.
//!
//! # Responsibility
//! - Run the explicit chain: selection command -> view recompute ->
//!   marker reconciliation -> listener notification.
//! - Route marker clicks back into the selection store.
//!
//! # Invariants
//! - Recompute and reconciliation happen inline in the command that changed
//!   the selection; there is no batching or debounce at this layer.
//! - `ViewChanged` is emitted after every recompute, `SelectionChanged`
//!   whenever the selected record id changes.
//! - The session is single-threaded.

use crate::catalog::{CatalogResult, RecordStore};
use crate::config::MapConfig;
use crate::map::adapter::MapAdapter;
use crate::map::queue::{CommandQueueAdapter, MarkerId};
use crate::map::reconciler::{LayerReady, MarkerReconciler, ReconcileReport};
use crate::map::style::{CategoryPalette, MarkerStyle};
use crate::model::policy::VisibilityPolicy;
use crate::model::record::{Category, Record, RecordId};
use crate::selection::{SelectionState, SelectionStore};
use crate::view::{compute_view, DerivedView};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;

/// Notification delivered to session listeners.
#[derive(Debug, Clone, Copy)]
pub enum SessionEvent<'a> {
    ViewChanged(&'a DerivedView),
    SelectionChanged(Option<&'a Record>),
}

pub type SessionListener = Box<dyn FnMut(&SessionEvent<'_>)>;

type ClickInbox = Rc<RefCell<Vec<RecordId>>>;

/// One interactive map view over one catalogue.
pub struct MapSession<A: MapAdapter> {
    store: RecordStore,
    selection: SelectionStore,
    view: DerivedView,
    reconciler: MarkerReconciler<A>,
    listeners: Vec<SessionListener>,
    clicks: ClickInbox,
    config: MapConfig,
    last_report: ReconcileReport,
}

impl<A: MapAdapter> MapSession<A> {
    /// Creates a session with the default palette.
    ///
    /// No marker exists until the first command or [`MapSession::sync`].
    pub fn new(store: RecordStore, adapter: A, config: MapConfig) -> Self {
        Self::with_palette(store, adapter, config, CategoryPalette::default())
    }

    pub fn with_palette(
        store: RecordStore,
        adapter: A,
        config: MapConfig,
        palette: CategoryPalette,
    ) -> Self {
        let selection = SelectionStore::new(store.categories());
        let view = compute_view(&store, selection.state());
        let clicks: ClickInbox = Rc::new(RefCell::new(Vec::new()));

        let mut reconciler =
            MarkerReconciler::with_style(adapter, MarkerStyle::new(palette, config.marker_size));
        let inbox = Rc::clone(&clicks);
        reconciler.set_selection_callback(Rc::new(move |record: &Record| {
            inbox.borrow_mut().push(record.id.clone());
        }));

        info!(
            "event=session_open module=session status=ok records={} categories={}",
            store.len(),
            store.categories().len()
        );

        Self {
            store,
            selection,
            view,
            reconciler,
            listeners: Vec::new(),
            clicks,
            config,
            last_report: ReconcileReport::default(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&SessionEvent<'_>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Registers the one-shot layer-ready listener.
    pub fn on_layer_ready(&mut self, callback: impl FnOnce(LayerReady<'_, A>) + 'static) {
        self.reconciler.set_layer_ready_callback(Box::new(callback));
    }

    /// Recomputes the view and runs a full reconciliation pass.
    pub fn sync(&mut self) -> ReconcileReport {
        self.refresh();
        self.last_report
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn policy(&self) -> &VisibilityPolicy {
        self.selection.policy()
    }

    pub fn view(&self) -> &DerivedView {
        &self.view
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.selection
            .selected_record_id()
            .and_then(|id| self.store.get(id.as_str()))
    }

    pub fn reconciler(&self) -> &MarkerReconciler<A> {
        &self.reconciler
    }

    pub fn adapter(&self) -> &A {
        self.reconciler.adapter()
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        self.reconciler.adapter_mut()
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn last_report(&self) -> ReconcileReport {
        self.last_report
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.mutate(|selection| selection.set_search_query(query));
    }

    pub fn show_all(&mut self) {
        self.mutate(SelectionStore::show_all);
    }

    pub fn hide_all(&mut self) {
        self.mutate(SelectionStore::hide_all);
    }

    pub fn select_only(&mut self, category: Category) {
        self.mutate(|selection| selection.select_only(category));
    }

    pub fn toggle_category(&mut self, category: Category) {
        self.mutate(|selection| selection.toggle_category(category));
    }

    pub fn reset(&mut self) {
        self.mutate(SelectionStore::reset);
    }

    /// Sets or clears the selected record. Unknown ids are ignored.
    pub fn select_record(&mut self, id: Option<&str>) {
        let next = match id {
            Some(id) => match self.store.get(id) {
                Some(record) => Some(record.id.clone()),
                None => {
                    debug!(
                        "event=select_record module=session status=ignored reason=unknown_record record_id={id}"
                    );
                    return;
                }
            },
            None => None,
        };
        self.mutate(|selection| selection.select_record(next));
    }

    /// Applies a click on `handle` as a record selection.
    pub fn marker_clicked(&mut self, handle: &A::Handle) -> bool {
        let Some(id) = self.reconciler.record_for_handle(handle).cloned() else {
            debug!("event=marker_click module=session status=ignored reason=unknown_handle");
            return false;
        };
        self.select_record(Some(id.as_str()));
        true
    }

    /// Applies clicks forwarded by adapter click handlers since the last call.
    ///
    /// Returns the number of clicks applied.
    pub fn process_marker_clicks(&mut self) -> usize {
        let pending = std::mem::take(&mut *self.clicks.borrow_mut());
        let count = pending.len();
        for id in pending {
            self.select_record(Some(id.as_str()));
        }
        count
    }

    /// Centers the map on one record at focus zoom.
    ///
    /// Returns `false` for unknown records or records without geometry.
    pub fn focus_record(&mut self, id: &str) -> bool {
        let Some(position) = self.store.get(id).and_then(Record::map_position) else {
            return false;
        };
        let zoom = self.config.focus_zoom;
        match self.reconciler.adapter_mut().set_view(position, zoom) {
            Ok(()) => true,
            Err(err) => {
                warn!("event=focus_record module=session status=error record_id={id} error={err}");
                false
            }
        }
    }

    /// Restores the default viewport.
    pub fn reset_view(&mut self) {
        let center = self.config.default_center;
        let zoom = self.config.default_zoom;
        if let Err(err) = self.reconciler.adapter_mut().set_view(center, zoom) {
            warn!("event=reset_view module=session status=error error={err}");
        }
    }

    pub fn fit_to_markers(&mut self) {
        self.reconciler.fit_to_all();
    }

    /// Removes every marker until the next reconciliation pass.
    pub fn clear_markers(&mut self) {
        self.reconciler.clear_all();
    }

    /// Replaces the catalogue wholesale.
    ///
    /// Existing markers are rebuilt because positions may have changed. The
    /// selection keeps its surviving categories and drops a vanished record.
    ///
    /// # Errors
    /// - Catalogue integrity errors; the session is left unchanged.
    pub fn reload(&mut self, records: impl IntoIterator<Item = Record>) -> CatalogResult<()> {
        let store = RecordStore::new(records)?;
        let selected_before = self.selection.selected_record_id().cloned();

        self.store = store;
        self.selection.replace_categories(self.store.categories());
        if let Some(id) = &selected_before {
            if !self.store.contains(id.as_str()) {
                self.selection.select_record(None);
            }
        }

        self.reconciler.clear_all();
        self.refresh();

        if self.selection.selected_record_id() != selected_before.as_ref() {
            self.emit_selection();
        }
        Ok(())
    }

    fn mutate(&mut self, command: impl FnOnce(&mut SelectionStore)) {
        let before = self.selection.state().clone();
        command(&mut self.selection);
        let after = self.selection.state();

        let filter_changed =
            before.policy != after.policy || before.search_query != after.search_query;
        let selection_changed = before.selected_record_id != after.selected_record_id;

        if filter_changed {
            self.refresh();
        }
        if selection_changed {
            self.emit_selection();
        }
    }

    fn refresh(&mut self) {
        self.view = compute_view(&self.store, self.selection.state());
        self.last_report = self.reconciler.reconcile(&self.view);
        let event = SessionEvent::ViewChanged(&self.view);
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    fn emit_selection(&mut self) {
        let selected = self
            .selection
            .selected_record_id()
            .and_then(|id| self.store.get(id.as_str()));
        let event = SessionEvent::SelectionChanged(selected);
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

impl MapSession<CommandQueueAdapter> {
    /// Session whose surface operations are queued for a host to apply.
    pub fn queued(store: RecordStore, config: MapConfig) -> Self {
        let adapter = CommandQueueAdapter::new(config.fit_padding);
        Self::new(store, adapter, config)
    }

    /// Dispatches a host-reported click through the marker's click handler
    /// and applies the resulting selection.
    pub fn dispatch_click(&mut self, marker_id: &MarkerId) -> bool {
        let routed = self.reconciler.adapter().click(marker_id);
        if routed {
            self.process_marker_clicks();
        }
        routed
    }
}
