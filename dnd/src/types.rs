//! Data model shared between the engine and its consumers.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Identifier of a droppable container.
pub type ContainerId = String;

/// A slot: which container, and the ordinal position among its items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraggableLocation {
    pub container_id: ContainerId,
    pub index: usize,
}

impl DraggableLocation {
    #[must_use]
    pub fn new(container_id: impl Into<ContainerId>, index: usize) -> Self {
        Self { container_id: container_id.into(), index }
    }
}

/// Why a gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DropReason {
    /// Pointer released.
    Drop,
    /// Pointer cancelled by the platform, or the coordinator was torn down.
    Cancel,
}

/// Outcome of a finished gesture, handed to the reconciliation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropResult<K> {
    /// The dragged item.
    pub item: K,
    /// Where the item was picked up.
    pub source: DraggableLocation,
    /// Where the item would land. Always `None` for [`DropReason::Cancel`].
    pub destination: Option<DraggableLocation>,
    pub reason: DropReason,
}

impl<K> DropResult<K> {
    /// Build a result, clearing the destination when the gesture was cancelled.
    #[must_use]
    pub fn new(item: K, source: DraggableLocation, destination: Option<DraggableLocation>, reason: DropReason) -> Self {
        let destination = match reason {
            DropReason::Drop => destination,
            DropReason::Cancel => None,
        };
        Self { item, source, destination, reason }
    }

    /// True when applying this result cannot change any ordering: no
    /// destination, or a destination identical to the source.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.destination.as_ref().is_none_or(|dest| *dest == self.source)
    }
}

/// Which drag scope a container belongs to.
///
/// Items picked up in a top-level container may only land in that same
/// container; items from ordinary containers may land in any ordinary
/// container. The two scopes never cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerRole {
    /// Holds the containers themselves (the board's column strip).
    TopLevel,
    /// Holds ordinary items (cards within a list).
    #[default]
    Ordinary,
}
