//! Side effects a gesture holds while it is active.
//!
//! Entering the dragging state acquires two host resources: window-level
//! pointer listeners and suppressed text selection. The session state machine
//! calls [`DragHost::acquire`] exactly once on start and [`DragHost::release`]
//! exactly once on every exit path (drop, cancel, teardown).

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use crate::geometry::Point;

/// Window events a host listens for while a gesture is active.
pub const WINDOW_POINTER_EVENTS: [&str; 3] = ["pointermove", "pointerup", "pointercancel"];

/// A window-level pointer event forwarded to
/// [`Coordinator::handle_window_pointer`](crate::coordinator::Coordinator::handle_window_pointer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowPointer {
    Move(Point),
    Up,
    Cancel,
}

impl WindowPointer {
    /// Map a DOM event type and its client coordinates. `None` for events
    /// outside [`WINDOW_POINTER_EVENTS`].
    #[must_use]
    pub fn from_event(event_type: &str, x: f64, y: f64) -> Option<Self> {
        match event_type {
            "pointermove" => Some(Self::Move(Point::new(x, y))),
            "pointerup" => Some(Self::Up),
            "pointercancel" => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// Host environment the engine drives during a gesture.
pub trait DragHost {
    /// Start forwarding window-level pointer move/up/cancel events.
    fn attach_listeners(&mut self);
    /// Stop forwarding window-level pointer events.
    fn detach_listeners(&mut self);
    /// Suppress global text selection.
    fn suspend_selection(&mut self);
    /// Restore global text selection.
    fn restore_selection(&mut self);

    /// Enter the dragging state.
    fn acquire(&mut self) {
        self.attach_listeners();
        self.suspend_selection();
    }

    /// Leave the dragging state.
    fn release(&mut self) {
        self.detach_listeners();
        self.restore_selection();
    }
}

/// Host with no environment: the caller feeds pointer events directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessHost;

impl DragHost for HeadlessHost {
    fn attach_listeners(&mut self) {}

    fn detach_listeners(&mut self) {}

    fn suspend_selection(&mut self) {}

    fn restore_selection(&mut self) {}
}
