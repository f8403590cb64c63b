//! Gesture state machine and destination computation.
//!
//! `SessionState` is the active gesture tracked between pointer-down and
//! pointer-up. Every pointer move recomputes the destination from the dragged
//! item's center (pointer position corrected by the grab offset), so the
//! hit-test compares the item's box against containers rather than the raw
//! cursor.
//!
//! Transitions:
//!
//! ```text
//! Idle --start--> Dragging --move--> Dragging
//!                 Dragging --end(Drop | Cancel)--> Idle   (emits DropResult)
//! ```
//!
//! `start` while already dragging is ignored; the running gesture keeps its
//! host resources and nothing is acquired twice.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;
use std::hash::Hash;

use tracing::{debug, trace, warn};

use crate::consts::TOP_LEVEL_AXIS;
use crate::geometry::{Axis, Point, Rect, Size, distance_to_rect, infer_axis};
use crate::host::DragHost;
use crate::registry::{RegisteredContainer, RegisteredItem, Registry};
use crate::types::{ContainerRole, DraggableLocation, DropReason, DropResult};

/// The one in-progress gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession<K> {
    /// Item being dragged.
    pub item: K,
    /// Slot the item was picked up from.
    pub source: DraggableLocation,
    /// Slot the item currently targets, if any container is eligible.
    pub destination: Option<DraggableLocation>,
    /// Pointer position minus the item's top-left corner at pickup.
    pub pointer_offset: Point,
    /// Item size at pickup.
    pub item_size: Size,
}

impl<K> DragSession<K> {
    /// Where the dragged item's center is when the pointer is at `pointer`.
    #[must_use]
    pub fn item_center(&self, pointer: Point) -> Point {
        Point {
            x: pointer.x - self.pointer_offset.x + self.item_size.width / 2.0,
            y: pointer.y - self.pointer_offset.y + self.item_size.height / 2.0,
        }
    }
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState<K> {
    /// No gesture in progress; waiting for the next pointer-down.
    Idle,
    /// A gesture is active and its host resources are held.
    Dragging(DragSession<K>),
}

impl<K> Default for SessionState<K> {
    fn default() -> Self {
        Self::Idle
    }
}

/// Drives [`SessionState`] through its transitions.
pub struct SessionMachine<K> {
    state: SessionState<K>,
}

impl<K> SessionMachine<K>
where
    K: Clone + Eq + Hash + fmt::Debug,
{
    #[must_use]
    pub fn new() -> Self {
        Self { state: SessionState::Idle }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState<K> {
        &self.state
    }

    /// The active session, if dragging.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession<K>> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Dragging(session) => Some(session),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Dragging(_))
    }

    /// Idle → Dragging. Returns false (and changes nothing) if a gesture is
    /// already active.
    ///
    /// An item missing from the registry is dragged with a zero offset and
    /// size, so its center is the pointer itself.
    pub fn start<H: DragHost + ?Sized>(
        &mut self,
        registry: &Registry<K>,
        host: &mut H,
        item: K,
        source: DraggableLocation,
        pointer: Point,
        default_axis: Axis,
    ) -> bool {
        if let SessionState::Dragging(active) = &self.state {
            warn!(active = ?active.item, ignored = ?item, "drag already in progress; ignoring start");
            return false;
        }

        let item_rect = registry.item(&item).map(RegisteredItem::bounds);
        let (pointer_offset, item_size) = match item_rect {
            Some(rect) => (Point::new(pointer.x - rect.left, pointer.y - rect.top), rect.size()),
            None => (Point::default(), Size::default()),
        };

        let mut session = DragSession { item, source, destination: None, pointer_offset, item_size };
        let center = session.item_center(pointer);
        session.destination =
            compute_destination(registry, center, &session.item, &session.source.container_id, default_axis);

        debug!(item = ?session.item, source = ?session.source, destination = ?session.destination, "drag started");
        host.acquire();
        self.state = SessionState::Dragging(session);
        true
    }

    /// Dragging → Dragging with a recomputed destination. Returns the new
    /// destination, or `None` when idle or no container is eligible.
    pub fn pointer_move(
        &mut self,
        registry: &Registry<K>,
        pointer: Point,
        default_axis: Axis,
    ) -> Option<&DraggableLocation> {
        let SessionState::Dragging(session) = &mut self.state else {
            return None;
        };
        let center = session.item_center(pointer);
        let destination = compute_destination(registry, center, &session.item, &session.source.container_id, default_axis);
        if destination != session.destination {
            trace!(item = ?session.item, ?destination, "drag destination changed");
        }
        session.destination = destination;
        session.destination.as_ref()
    }

    /// Dragging → Idle. Releases host resources and returns the finished
    /// result; a cancelled gesture never carries a destination. Returns
    /// `None` when idle, without touching the host.
    pub fn end<H: DragHost + ?Sized>(&mut self, host: &mut H, reason: DropReason) -> Option<DropResult<K>> {
        let SessionState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        host.release();
        let result = DropResult::new(session.item, session.source, session.destination, reason);
        debug!(item = ?result.item, ?reason, destination = ?result.destination, "drag ended");
        Some(result)
    }
}

impl<K> Default for SessionMachine<K>
where
    K: Clone + Eq + Hash + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Compute which slot an item centered at `center` would land in.
///
/// Items from a top-level container may only land back in that container;
/// items from any other container may land in any non-top-level container.
/// Among eligible containers, those containing `center` are preferred, and
/// the nearest one wins (earliest registered on ties). The index is the
/// first sibling whose center lies beyond `center` along the container's
/// axis, or the sibling count when none does.
#[must_use]
pub fn compute_destination<K>(
    registry: &Registry<K>,
    center: Point,
    item: &K,
    source_container: &str,
    default_axis: Axis,
) -> Option<DraggableLocation>
where
    K: Clone + Eq + Hash,
{
    let source_role = registry
        .container(source_container)
        .map_or(ContainerRole::Ordinary, |c| c.role);

    let eligible: Vec<(&RegisteredContainer, Rect)> = registry
        .containers()
        .into_iter()
        .filter(|c| match source_role {
            ContainerRole::TopLevel => c.id == source_container,
            ContainerRole::Ordinary => c.role != ContainerRole::TopLevel,
        })
        .map(|c| (c, c.bounds()))
        .collect();

    let inside: Vec<&(&RegisteredContainer, Rect)> = eligible.iter().filter(|(_, r)| r.contains(center)).collect();
    let candidates: Vec<&(&RegisteredContainer, Rect)> =
        if inside.is_empty() { eligible.iter().collect() } else { inside };

    let mut chosen: Option<(&RegisteredContainer, f64)> = None;
    for &(container, rect) in candidates {
        let dist = distance_to_rect(center, &rect);
        if chosen.is_none_or(|(_, best)| dist < best) {
            chosen = Some((container, dist));
        }
    }
    let (container, _) = chosen?;

    let siblings = registry.siblings(&container.id, item);
    if siblings.is_empty() {
        return Some(DraggableLocation::new(container.id.clone(), 0));
    }

    let centers: Vec<Point> = siblings.iter().map(|s| s.bounds().center()).collect();
    let axis = match container.role {
        ContainerRole::TopLevel => TOP_LEVEL_AXIS,
        ContainerRole::Ordinary => infer_axis(&centers).unwrap_or(default_axis),
    };

    let index = centers
        .iter()
        .position(|c| match axis {
            Axis::Horizontal => center.x < c.x,
            Axis::Vertical => center.y < c.y,
        })
        .unwrap_or(centers.len());

    Some(DraggableLocation::new(container.id.clone(), index))
}
