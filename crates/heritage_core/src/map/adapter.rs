//! Map surface adapter contract.
//!
//! # Responsibility
//! - Define the only boundary that touches the rendering surface.
//!
//! # Invariants
//! - `destroy_marker` is idempotent: destroying a destroyed handle is `Ok`.
//! - Calls are synchronous from the caller's point of view. Asynchronous
//!   surfaces must settle before returning a handle.

use crate::map::style::MarkerDescriptor;
use crate::model::record::Coordinates;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

/// Click handler attached to one marker; receives the clicked handle.
pub type MarkerClickCallback<H> = Box<dyn Fn(&H)>;

/// Adapter-level failures. The reconciler recovers from all of them.
#[derive(Debug, Clone, PartialEq)]
pub enum MapAdapterError {
    InvalidCoordinates(Coordinates),
    UnknownHandle(String),
    Surface(String),
}

impl Display for MapAdapterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCoordinates(position) => write!(
                f,
                "invalid marker coordinates: lng={} lat={}",
                position.lng, position.lat
            ),
            Self::UnknownHandle(handle) => write!(f, "unknown marker handle: {handle}"),
            Self::Surface(message) => write!(f, "map surface error: {message}"),
        }
    }
}

impl Error for MapAdapterError {}

/// Rendering surface operations consumed by the marker reconciler.
pub trait MapAdapter {
    /// Opaque marker reference.
    type Handle: Clone + Eq + Hash + Debug;

    /// Places a marker. Fails without side effects on invalid coordinates.
    fn create_marker(
        &mut self,
        position: Coordinates,
        descriptor: &MarkerDescriptor,
    ) -> Result<Self::Handle, MapAdapterError>;

    fn destroy_marker(&mut self, handle: &Self::Handle) -> Result<(), MapAdapterError>;

    fn on_marker_click(
        &mut self,
        handle: &Self::Handle,
        callback: MarkerClickCallback<Self::Handle>,
    ) -> Result<(), MapAdapterError>;

    /// Best-effort viewport fit over `handles`.
    fn fit_view(&mut self, handles: &[Self::Handle]);

    /// Moves the viewport. Surfaces without camera control may keep the
    /// default no-op.
    fn set_view(&mut self, center: Coordinates, zoom: u8) -> Result<(), MapAdapterError> {
        let _ = (center, zoom);
        Ok(())
    }
}
