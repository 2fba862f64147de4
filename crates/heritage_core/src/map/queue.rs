//! Command-queue map adapter for hosts that own the real map surface.
//!
//! The core records surface operations as [`MapCommand`]s; the host drains
//! and applies them, then reports marker clicks back by id.

use crate::map::adapter::{MapAdapter, MapAdapterError, MarkerClickCallback};
use crate::map::style::MarkerDescriptor;
use crate::model::record::Coordinates;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Host-visible marker handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MarkerId(Uuid);

impl MarkerId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value.trim()).ok().map(Self)
    }
}

impl Display for MarkerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One pending surface operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MapCommand {
    CreateMarker {
        marker_id: MarkerId,
        position: Coordinates,
        descriptor: MarkerDescriptor,
    },
    DestroyMarker {
        marker_id: MarkerId,
    },
    FitView {
        marker_ids: Vec<MarkerId>,
        padding: [u32; 4],
    },
    SetView {
        center: Coordinates,
        zoom: u8,
    },
}

/// Adapter that queues surface operations instead of performing them.
pub struct CommandQueueAdapter {
    commands: Vec<MapCommand>,
    live: HashSet<MarkerId>,
    click_handlers: HashMap<MarkerId, MarkerClickCallback<MarkerId>>,
    fit_padding: [u32; 4],
}

impl CommandQueueAdapter {
    pub fn new(fit_padding: [u32; 4]) -> Self {
        Self {
            commands: Vec::new(),
            live: HashSet::new(),
            click_handlers: HashMap::new(),
            fit_padding,
        }
    }

    /// Returns and clears queued commands in issue order.
    pub fn drain_commands(&mut self) -> Vec<MapCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Queues commands left behind by a retired adapter ahead of this
    /// adapter's own, so the host applies them first.
    pub fn carry_over(&mut self, earlier: Vec<MapCommand>) {
        self.commands.splice(0..0, earlier);
    }

    pub fn pending_commands(&self) -> &[MapCommand] {
        &self.commands
    }

    /// Dispatches a host-reported click. Returns `false` for unknown or
    /// destroyed markers.
    pub fn click(&self, marker_id: &MarkerId) -> bool {
        match self.click_handlers.get(marker_id) {
            Some(handler) if self.live.contains(marker_id) => {
                handler(marker_id);
                true
            }
            _ => false,
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl Default for CommandQueueAdapter {
    fn default() -> Self {
        Self::new([30, 30, 30, 30])
    }
}

impl MapAdapter for CommandQueueAdapter {
    type Handle = MarkerId;

    fn create_marker(
        &mut self,
        position: Coordinates,
        descriptor: &MarkerDescriptor,
    ) -> Result<MarkerId, MapAdapterError> {
        if !position.is_valid() {
            return Err(MapAdapterError::InvalidCoordinates(position));
        }
        let marker_id = MarkerId::generate();
        self.live.insert(marker_id);
        self.commands.push(MapCommand::CreateMarker {
            marker_id,
            position,
            descriptor: descriptor.clone(),
        });
        Ok(marker_id)
    }

    fn destroy_marker(&mut self, handle: &MarkerId) -> Result<(), MapAdapterError> {
        self.click_handlers.remove(handle);
        if self.live.remove(handle) {
            self.commands.push(MapCommand::DestroyMarker {
                marker_id: *handle,
            });
        }
        Ok(())
    }

    fn on_marker_click(
        &mut self,
        handle: &MarkerId,
        callback: MarkerClickCallback<MarkerId>,
    ) -> Result<(), MapAdapterError> {
        if !self.live.contains(handle) {
            return Err(MapAdapterError::UnknownHandle(handle.to_string()));
        }
        self.click_handlers.insert(*handle, callback);
        Ok(())
    }

    fn fit_view(&mut self, handles: &[MarkerId]) {
        let marker_ids = handles
            .iter()
            .filter(|handle| self.live.contains(*handle))
            .copied()
            .collect::<Vec<_>>();
        if marker_ids.is_empty() {
            return;
        }
        self.commands.push(MapCommand::FitView {
            marker_ids,
            padding: self.fit_padding,
        });
    }

    fn set_view(&mut self, center: Coordinates, zoom: u8) -> Result<(), MapAdapterError> {
        if !center.is_valid() {
            return Err(MapAdapterError::InvalidCoordinates(center));
        }
        self.commands.push(MapCommand::SetView { center, zoom });
        Ok(())
    }
}
