//! Drag coordinator: the single owner of registry, session, and host.
//!
//! Wrapper components talk only to the coordinator. It delegates
//! registration to the [`Registry`], gesture transitions to the
//! [`SessionMachine`], and hands every finished gesture to the drag-end sink
//! synchronously. Dropping the coordinator mid-gesture cancels the gesture,
//! so host resources are always released.

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod coordinator_test;

use std::fmt;
use std::hash::Hash;

use tracing::warn;

use crate::consts::DEFAULT_AXIS;
use crate::geometry::{Axis, Point};
use crate::host::{DragHost, WindowPointer};
use crate::registry::{BoundsProvider, RegistrationId, Registry};
use crate::session::{DragSession, SessionMachine};
use crate::types::{ContainerId, ContainerRole, DraggableLocation, DropReason, DropResult};

/// Engine tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DndConfig {
    /// Axis used for containers whose items cannot decide one.
    pub default_axis: Axis,
}

impl Default for DndConfig {
    fn default() -> Self {
        Self { default_axis: DEFAULT_AXIS }
    }
}

/// Receives each finished gesture.
pub type DragEndSink<K> = Box<dyn FnMut(DropResult<K>)>;

pub struct Coordinator<K, H>
where
    K: Clone + Eq + Hash + fmt::Debug,
    H: DragHost,
{
    registry: Registry<K>,
    machine: SessionMachine<K>,
    host: H,
    config: DndConfig,
    on_drag_end: DragEndSink<K>,
}

impl<K, H> Coordinator<K, H>
where
    K: Clone + Eq + Hash + fmt::Debug,
    H: DragHost,
{
    #[must_use]
    pub fn new(host: H, config: DndConfig, on_drag_end: DragEndSink<K>) -> Self {
        Self { registry: Registry::new(), machine: SessionMachine::new(), host, config, on_drag_end }
    }

    // --- Registration ---

    pub fn register_container(
        &mut self,
        id: impl Into<ContainerId>,
        role: ContainerRole,
        bounds: impl BoundsProvider + 'static,
    ) -> RegistrationId {
        self.registry.register_container(id, role, bounds)
    }

    pub fn unregister_container(&mut self, id: &str, registration: RegistrationId) -> bool {
        self.registry.unregister_container(id, registration)
    }

    pub fn register_item(
        &mut self,
        id: K,
        container_id: impl Into<ContainerId>,
        index: usize,
        bounds: impl BoundsProvider + 'static,
    ) -> RegistrationId {
        self.registry.register_item(id, container_id, index, bounds)
    }

    pub fn unregister_item(&mut self, id: &K, registration: RegistrationId) -> bool {
        self.registry.unregister_item(id, registration)
    }

    pub fn update_item(&mut self, id: &K, index: usize, container_id: impl Into<ContainerId>) -> bool {
        self.registry.update_item(id, index, container_id)
    }

    // --- Gesture ---

    /// Pointer-down on an item's drag handle. Returns false if a gesture is
    /// already active.
    pub fn start_drag(&mut self, item: K, source: DraggableLocation, pointer: Point) -> bool {
        self.machine
            .start(&self.registry, &mut self.host, item, source, pointer, self.config.default_axis)
    }

    /// Window pointer-move while dragging. Returns the recomputed destination.
    pub fn pointer_move(&mut self, pointer: Point) -> Option<&DraggableLocation> {
        self.machine.pointer_move(&self.registry, pointer, self.config.default_axis)
    }

    /// Window pointer-up: ends the gesture as a drop.
    pub fn pointer_up(&mut self) {
        self.finish(DropReason::Drop);
    }

    /// Window pointer-cancel: ends the gesture without a destination.
    pub fn pointer_cancel(&mut self) {
        self.finish(DropReason::Cancel);
    }

    /// Route a forwarded window pointer event to the matching entry point.
    pub fn handle_window_pointer(&mut self, signal: WindowPointer) {
        match signal {
            WindowPointer::Move(pointer) => {
                self.pointer_move(pointer);
            }
            WindowPointer::Up => self.pointer_up(),
            WindowPointer::Cancel => self.pointer_cancel(),
        }
    }

    fn finish(&mut self, reason: DropReason) {
        let Some(mut result) = self.machine.end(&mut self.host, reason) else {
            return;
        };
        // The target may have unmounted after the last pointer move.
        if let Some(dest) = &result.destination {
            if self.registry.container(&dest.container_id).is_none() {
                warn!(container = %dest.container_id, "drop target unregistered before release; dropping destination");
                result.destination = None;
            }
        }
        (self.on_drag_end)(result);
    }

    // --- Reads ---

    /// The active gesture, if any.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession<K>> {
        self.machine.session()
    }

    /// Whether `item` is the item being dragged.
    #[must_use]
    pub fn is_dragging(&self, item: &K) -> bool {
        self.session().is_some_and(|s| s.item == *item)
    }

    /// Whether the active gesture currently targets `container_id`.
    #[must_use]
    pub fn is_drag_over(&self, container_id: &str) -> bool {
        self.session()
            .and_then(|s| s.destination.as_ref())
            .is_some_and(|d| d.container_id == container_id && self.registry.container(container_id).is_some())
    }

    #[must_use]
    pub fn registry(&self) -> &Registry<K> {
        &self.registry
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }
}

impl<K, H> Drop for Coordinator<K, H>
where
    K: Clone + Eq + Hash + fmt::Debug,
    H: DragHost,
{
    fn drop(&mut self) {
        self.finish(DropReason::Cancel);
    }
}
