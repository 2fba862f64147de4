//! Marker reconciliation engine.
//!
//! # Responsibility
//! - Own the live `record id -> marker handle` map and every handle lifetime.
//! - Bring the live set in line with a `DerivedView` through minimal
//!   create/destroy calls.
//! - Fire the layer-ready notification once per reconciler lifetime.
//!
//! # Invariants
//! - Handles of records that stay wanted are never recreated.
//! - A failed destroy still drops local bookkeeping.
//! - A failed create records nothing; the next pass retries it.
//! - Records without usable geometry are never wanted.

use crate::map::adapter::MapAdapter;
use crate::map::style::MarkerStyle;
use crate::model::record::{Record, RecordId};
use crate::view::DerivedView;
use log::{debug, error, info, warn};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

/// Receives the record behind a clicked marker.
pub type SelectionCallback = Rc<dyn Fn(&Record)>;

/// One-shot layer-ready listener.
pub type LayerReadyCallback<A> = Box<dyn FnOnce(LayerReady<'_, A>)>;

/// Counters for one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    pub added: usize,
    pub removed: usize,
    pub kept: usize,
    /// Wanted records without usable geometry.
    pub skipped_invalid: usize,
    pub failed_creates: usize,
    pub failed_destroys: usize,
    /// Set on the single pass that fired the layer-ready notification.
    pub layer_ready: bool,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.removed == 0 && self.failed_creates == 0
    }
}

/// Layer-ready notification: a handle snapshot plus layer-wide operations.
pub struct LayerReady<'a, A: MapAdapter> {
    handles: Vec<(RecordId, A::Handle)>,
    layer: &'a mut MarkerReconciler<A>,
}

impl<A: MapAdapter> LayerReady<'_, A> {
    /// Handles live when the layer became ready, ordered by record id.
    pub fn handles(&self) -> &[(RecordId, A::Handle)] {
        &self.handles
    }

    pub fn count(&self) -> usize {
        self.handles.len()
    }

    pub fn fit_to_all(&mut self) {
        self.layer.fit_to_all();
    }

    pub fn clear_all(&mut self) {
        self.layer.clear_all();
    }
}

/// Keeps adapter markers synchronized with the derived view.
pub struct MarkerReconciler<A: MapAdapter> {
    adapter: A,
    style: MarkerStyle,
    live: BTreeMap<RecordId, A::Handle>,
    by_handle: HashMap<A::Handle, RecordId>,
    has_fired_ready: bool,
    on_select: Option<SelectionCallback>,
    on_ready: Option<LayerReadyCallback<A>>,
}

impl<A: MapAdapter> MarkerReconciler<A> {
    pub fn new(adapter: A) -> Self {
        Self::with_style(adapter, MarkerStyle::default())
    }

    pub fn with_style(adapter: A, style: MarkerStyle) -> Self {
        Self {
            adapter,
            style,
            live: BTreeMap::new(),
            by_handle: HashMap::new(),
            has_fired_ready: false,
            on_select: None,
            on_ready: None,
        }
    }

    /// Sets the callback that marker clicks forward to.
    ///
    /// Applies to markers created after this call.
    pub fn set_selection_callback(&mut self, callback: SelectionCallback) {
        self.on_select = Some(callback);
    }

    /// Registers the layer-ready listener. Ignored once ready has fired.
    pub fn set_layer_ready_callback(&mut self, callback: LayerReadyCallback<A>) {
        if self.has_fired_ready {
            debug!("event=layer_ready_subscribe module=reconciler status=ignored reason=already_fired");
            return;
        }
        self.on_ready = Some(callback);
    }

    /// Runs one reconciliation pass against `view`.
    pub fn reconcile(&mut self, view: &DerivedView) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let mut wanted: Vec<&Record> = Vec::new();
        for record in view.visible_records() {
            if record.has_valid_geometry() {
                wanted.push(record);
            } else {
                report.skipped_invalid += 1;
            }
        }
        let wanted_ids = wanted
            .iter()
            .map(|record| record.id.as_str())
            .collect::<HashSet<_>>();

        let stale = self
            .live
            .keys()
            .filter(|id| !wanted_ids.contains(id.as_str()))
            .cloned()
            .collect::<Vec<_>>();
        for id in stale {
            if let Some(handle) = self.live.remove(&id) {
                self.by_handle.remove(&handle);
                if !self.destroy(&id, &handle) {
                    report.failed_destroys += 1;
                }
                report.removed += 1;
            }
        }

        for record in wanted {
            if self.live.contains_key(&record.id) {
                report.kept += 1;
                continue;
            }
            if self.create(record) {
                report.added += 1;
            } else {
                report.failed_creates += 1;
            }
        }

        if !report.is_noop() {
            info!(
                "event=reconcile module=reconciler status=ok added={} removed={} kept={} skipped_invalid={} failed_creates={} failed_destroys={} live={}",
                report.added,
                report.removed,
                report.kept,
                report.skipped_invalid,
                report.failed_creates,
                report.failed_destroys,
                self.live.len()
            );
        }

        if !self.live.is_empty() && !self.has_fired_ready {
            self.has_fired_ready = true;
            report.layer_ready = true;
            info!(
                "event=layer_ready module=reconciler status=ok markers={}",
                self.live.len()
            );
            if let Some(callback) = self.on_ready.take() {
                let handles = self.snapshot();
                callback(LayerReady {
                    handles,
                    layer: self,
                });
            }
        }

        report
    }

    /// Fits the viewport over every live marker. No-op when empty.
    pub fn fit_to_all(&mut self) {
        if self.live.is_empty() {
            return;
        }
        let handles = self.live.values().cloned().collect::<Vec<_>>();
        self.adapter.fit_view(&handles);
    }

    /// Destroys every live marker. Does not re-arm the ready notification.
    pub fn clear_all(&mut self) {
        let drained = std::mem::take(&mut self.live);
        self.by_handle.clear();
        let count = drained.len();
        for (id, handle) in drained {
            self.destroy(&id, &handle);
        }
        if count > 0 {
            info!("event=markers_clear module=reconciler status=ok removed={count}");
        }
    }

    pub fn handle_for(&self, id: &str) -> Option<&A::Handle> {
        self.live.get(id)
    }

    /// Maps a clicked handle back to its record id.
    pub fn record_for_handle(&self, handle: &A::Handle) -> Option<&RecordId> {
        self.by_handle.get(handle)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn has_fired_ready(&self) -> bool {
        self.has_fired_ready
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    fn snapshot(&self) -> Vec<(RecordId, A::Handle)> {
        self.live
            .iter()
            .map(|(id, handle)| (id.clone(), handle.clone()))
            .collect()
    }

    fn create(&mut self, record: &Record) -> bool {
        let Some(position) = record.map_position() else {
            return false;
        };
        let descriptor = self.style.describe(record);
        let handle = match self.adapter.create_marker(position, &descriptor) {
            Ok(handle) => handle,
            Err(err) => {
                warn!(
                    "event=marker_create module=reconciler status=error record_id={} error={}",
                    record.id, err
                );
                return false;
            }
        };

        if let Some(on_select) = &self.on_select {
            let on_select = Rc::clone(on_select);
            let clicked = record.clone();
            let attached = self.adapter.on_marker_click(
                &handle,
                Box::new(move |_handle: &A::Handle| on_select(&clicked)),
            );
            if let Err(err) = attached {
                warn!(
                    "event=marker_click_attach module=reconciler status=error record_id={} error={}",
                    record.id, err
                );
            }
        }

        self.by_handle.insert(handle.clone(), record.id.clone());
        self.live.insert(record.id.clone(), handle);
        true
    }

    fn destroy(&mut self, id: &RecordId, handle: &A::Handle) -> bool {
        match self.adapter.destroy_marker(handle) {
            Ok(()) => true,
            Err(err) => {
                error!(
                    "event=marker_destroy module=reconciler status=error record_id={} error={}",
                    id, err
                );
                false
            }
        }
    }
}

impl<A: MapAdapter> Drop for MarkerReconciler<A> {
    fn drop(&mut self) {
        self.clear_all();
    }
}

#[cfg(test)]
mod tests {
    use super::MarkerReconciler;
    use crate::catalog::RecordStore;
    use crate::map::adapter::{MapAdapter, MapAdapterError, MarkerClickCallback};
    use crate::map::style::MarkerDescriptor;
    use crate::model::policy::VisibilityPolicy;
    use crate::model::record::Coordinates;
    use crate::selection::SelectionState;
    use crate::view::compute_view;

    #[derive(Default)]
    struct CountingAdapter {
        next: u32,
        creates: usize,
        destroys: usize,
    }

    impl MapAdapter for CountingAdapter {
        type Handle = u32;

        fn create_marker(
            &mut self,
            _position: Coordinates,
            _descriptor: &MarkerDescriptor,
        ) -> Result<u32, MapAdapterError> {
            self.next += 1;
            self.creates += 1;
            Ok(self.next)
        }

        fn destroy_marker(&mut self, _handle: &u32) -> Result<(), MapAdapterError> {
            self.destroys += 1;
            Ok(())
        }

        fn on_marker_click(
            &mut self,
            _handle: &u32,
            _callback: MarkerClickCallback<u32>,
        ) -> Result<(), MapAdapterError> {
            Ok(())
        }

        fn fit_view(&mut self, _handles: &[u32]) {}
    }

    #[test]
    fn unchanged_view_is_a_noop_pass() {
        let store = RecordStore::sample();
        let view = compute_view(&store, &SelectionState::default());
        let mut reconciler = MarkerReconciler::new(CountingAdapter::default());

        let first = reconciler.reconcile(&view);
        assert_eq!(first.added, 24);
        assert!(first.layer_ready);

        let second = reconciler.reconcile(&view);
        assert!(second.is_noop());
        assert_eq!(second.kept, 24);
        assert!(!second.layer_ready);
        assert_eq!(reconciler.adapter().creates, 24);
    }

    #[test]
    fn hidden_view_destroys_everything() {
        let store = RecordStore::sample();
        let mut reconciler = MarkerReconciler::new(CountingAdapter::default());
        reconciler.reconcile(&compute_view(&store, &SelectionState::default()));

        let hidden = SelectionState {
            policy: VisibilityPolicy::HideAll,
            ..SelectionState::default()
        };
        let report = reconciler.reconcile(&compute_view(&store, &hidden));
        assert_eq!(report.removed, 24);
        assert_eq!(reconciler.live_count(), 0);
        assert_eq!(reconciler.adapter().destroys, 24);
    }
}
