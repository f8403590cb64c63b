//! Gesture trace replay.
//!
//! A trace is a recorded board layout (container and item rectangles) plus
//! the pointer events of one or more gestures. Replaying it drives a headless
//! [`Coordinator`] exactly as the browser host would and collects every drop
//! the engine emits.
//!
//! ```json
//! {
//!   "boardId": "1",
//!   "containers": [{ "id": "columns", "role": "top_level", "rect": { "left": 0, "top": 0, "width": 900, "height": 600 } }],
//!   "items": [{ "item": { "kind": "card", "id": "10" }, "container": "3", "index": 0, "rect": { ... } }],
//!   "events": [{ "type": "down", "item": { "kind": "card", "id": "10" }, "x": 20, "y": 70 }, { "type": "move", "x": 320, "y": 70 }, { "type": "up" }]
//! }
//! ```

#[cfg(test)]
#[path = "replay_test.rs"]
mod tests;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use dnd::coordinator::{Coordinator, DndConfig};
use dnd::geometry::{Point, Rect};
use dnd::host::HeadlessHost;
use dnd::types::{ContainerRole, DraggableLocation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ErrorCode;
use crate::reconcile::{BoardDrop, DragItem};

// =============================================================================
// TRACE FORMAT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    /// Board the trace was recorded on; the CLI can override it.
    #[serde(default)]
    pub board_id: Option<String>,
    pub containers: Vec<TraceContainer>,
    pub items: Vec<TraceItem>,
    pub events: Vec<PointerEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceContainer {
    pub id: String,
    #[serde(default)]
    pub role: ContainerRole,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceItem {
    pub item: DragItem,
    pub container: String,
    pub index: usize,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { item: DragItem, x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Cancel,
}

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read trace {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid trace: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("pointer-down on an item the trace never registered: {0:?}")]
    UnknownItem(DragItem),
}

impl ErrorCode for ReplayError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "E_TRACE_READ",
            Self::Parse(_) => "E_TRACE_PARSE",
            Self::UnknownItem(_) => "E_TRACE_UNKNOWN_ITEM",
        }
    }
}

impl Trace {
    /// Parse a trace from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Parse`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a trace file.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Read`] or [`ReplayError::Parse`].
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let json = std::fs::read_to_string(path).map_err(|source| ReplayError::Read { path: path.to_path_buf(), source })?;
        Self::from_json(&json)
    }
}

// =============================================================================
// REPLAY
// =============================================================================

/// Feed the trace through a headless coordinator and return every drop it
/// emitted, in order. A gesture still active at the end of the trace is
/// cancelled when the coordinator is torn down.
///
/// # Errors
///
/// Returns [`ReplayError::UnknownItem`] when a pointer-down names an item
/// that is not in the trace's layout.
pub fn replay(trace: &Trace, config: DndConfig) -> Result<Vec<BoardDrop>, ReplayError> {
    let drops: Rc<RefCell<Vec<BoardDrop>>> = Rc::default();
    let sink = Rc::clone(&drops);
    let mut coordinator: Coordinator<DragItem, HeadlessHost> =
        Coordinator::new(HeadlessHost, config, Box::new(move |result| sink.borrow_mut().push(result)));

    for container in &trace.containers {
        let rect = container.rect;
        coordinator.register_container(container.id.clone(), container.role, move || rect);
    }
    for item in &trace.items {
        let rect = item.rect;
        coordinator.register_item(item.item.clone(), item.container.clone(), item.index, move || rect);
    }

    for event in &trace.events {
        match event {
            PointerEvent::Down { item, x, y } => {
                let Some(registered) = coordinator.registry().item(item) else {
                    return Err(ReplayError::UnknownItem(item.clone()));
                };
                let source = DraggableLocation::new(registered.container_id.clone(), registered.index);
                if !coordinator.start_drag(item.clone(), source, Point::new(*x, *y)) {
                    warn!(?item, "pointer-down during an active gesture");
                }
            }
            PointerEvent::Move { x, y } => {
                let destination = coordinator.pointer_move(Point::new(*x, *y)).cloned();
                debug!(x, y, ?destination, "pointer move");
            }
            PointerEvent::Up => coordinator.pointer_up(),
            PointerEvent::Cancel => coordinator.pointer_cancel(),
        }
    }

    drop(coordinator);
    Ok(drops.take())
}
