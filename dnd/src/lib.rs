//! Pointer-driven drag-and-drop engine for the task board.
//!
//! The engine owns the full lifecycle of one drag gesture: tracking which
//! droppable containers and draggable items are mounted, inferring from raw
//! cursor coordinates which container and insertion index the dragged item
//! would land on, and emitting a [`types::DropResult`] when the gesture ends.
//! The host layer is responsible only for wiring DOM pointer events to the
//! [`coordinator::Coordinator`] and for handing drop results to the board's
//! reconciliation layer.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`coordinator`] | Composition root: registration, gesture entry points, session reads |
//! | [`session`] | Gesture state machine and destination computation |
//! | [`registry`] | Mounted containers and items with their bounds accessors |
//! | [`geometry`] | Points, rectangles, distance-to-rect, axis inference |
//! | [`types`] | Locations, drop results, container roles |
//! | [`host`] | Side effects a gesture acquires (listeners, text selection) |
//! | [`consts`] | Shared defaults |
//! | `web` | Browser host built on `web-sys` (feature `web`) |

pub mod consts;
pub mod coordinator;
pub mod geometry;
pub mod host;
pub mod registry;
pub mod session;
pub mod types;
#[cfg(feature = "web")]
pub mod web;
