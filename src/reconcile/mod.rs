//! Reconciliation: turns a finished drag into local reorders and the
//! commits that persist them.
//!
//! DESIGN
//! ======
//! `Reconciler` is pure and synchronous. It owns the board's local view
//! (column order plus each list's cards) and the last server-confirmed state,
//! applies every drop optimistically, and returns a [`Plan`] describing what
//! the async driver in `sync` must send. Responses are fed back through the
//! `column_order_*` and `card_commit_*` methods.
//!
//! Two drop kinds:
//! - Column drops reorder the column strip and commit the whole order in one
//!   call. Overlapping reorders share one rollback baseline and only the
//!   newest request token may commit or roll back.
//! - Card drops move one card within or across lists, renumber the touched
//!   lists, and commit each card whose placement differs from the confirmed
//!   one. Failures resynchronize the touched lists from the server.

pub mod cards;
pub mod columns;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use std::collections::HashMap;

use dnd::types::{DropReason, DropResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use cards::{CardCommit, Placement};
pub use columns::{ColumnOrderRequest, ColumnOutcome, ColumnSync};

use crate::api::{BoardId, Card, CardId, Column, ListId};

/// Container id the board registers its column strip under.
pub const COLUMN_STRIP: &str = "columns";

/// What is being dragged. The engine is keyed by this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DragItem {
    Column(ListId),
    Card(CardId),
}

/// A finished gesture over the board.
pub type BoardDrop = DropResult<DragItem>;

/// Work the driver must perform after a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Nothing changed locally; send nothing.
    Noop,
    /// Column strip reordered; commit the full order.
    ReorderColumns(ColumnOrderRequest),
    /// A card moved; commit the changed placements in these lists.
    MoveCards { card_id: CardId, touched: Vec<ListId> },
}

// =============================================================================
// RECONCILER
// =============================================================================

pub struct Reconciler {
    board_id: BoardId,
    columns: Vec<Column>,
    column_sync: ColumnSync,
    lists: HashMap<ListId, Vec<Card>>,
    confirmed: HashMap<CardId, Placement>,
}

impl Reconciler {
    #[must_use]
    pub fn new(board_id: impl Into<BoardId>) -> Self {
        Self {
            board_id: board_id.into(),
            columns: Vec::new(),
            column_sync: ColumnSync::Confirmed,
            lists: HashMap::new(),
            confirmed: HashMap::new(),
        }
    }

    // --- Hydration ---

    /// Replace the column strip with server state. Any pending reorder is
    /// forgotten; its response will be treated as stale.
    pub fn load_columns(&mut self, mut columns: Vec<Column>) {
        columns.sort_by_key(|c| c.position);
        for column in &columns {
            self.lists.entry(column.id.clone()).or_default();
        }
        debug!(board_id = %self.board_id, count = columns.len(), "columns loaded");
        self.columns = columns;
        self.column_sync = ColumnSync::Confirmed;
    }

    /// Replace one list's cards with server state and record their placements
    /// as confirmed. Cards now in this list are dropped from any other list's
    /// view.
    pub fn load_cards(&mut self, list_id: &str, mut cards: Vec<Card>) {
        cards.sort_by_key(|c| c.position);
        for other in self.lists.iter_mut().filter(|(id, _)| id.as_str() != list_id) {
            other.1.retain(|c| !cards.iter().any(|fetched| fetched.id == c.id));
        }
        for card in &cards {
            self.confirmed.insert(card.id.clone(), Placement::of(card));
        }
        debug!(list_id, count = cards.len(), "cards loaded");
        self.lists.insert(list_id.to_string(), cards);
    }

    // --- Drops ---

    /// Apply a finished drop to local state and return the commits it needs.
    ///
    /// Cancelled drops, drops without a destination and drops back onto the
    /// source slot change nothing.
    pub fn apply_drop(&mut self, drop: &BoardDrop) -> Plan {
        if drop.reason == DropReason::Cancel || drop.is_noop() {
            return Plan::Noop;
        }
        let Some(destination) = &drop.destination else {
            return Plan::Noop;
        };

        match &drop.item {
            DragItem::Column(list_id) => {
                if destination.container_id != drop.source.container_id {
                    warn!(list_id, to = %destination.container_id, "column dropped outside the strip; ignoring");
                    return Plan::Noop;
                }
                self.reorder_columns(list_id, destination.index)
            }
            DragItem::Card(card_id) => self.move_card(
                card_id,
                &drop.source.container_id,
                &destination.container_id,
                destination.index,
            ),
        }
    }

    // --- Reads ---

    #[must_use]
    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    /// Local column order, including optimistic reorders.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column_ids(&self) -> Vec<ListId> {
        self.columns.iter().map(|c| c.id.clone()).collect()
    }

    #[must_use]
    pub fn column_sync(&self) -> &ColumnSync {
        &self.column_sync
    }

    /// Local cards of a list, including optimistic moves.
    #[must_use]
    pub fn cards(&self, list_id: &str) -> &[Card] {
        self.lists.get(list_id).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn card_ids(&self, list_id: &str) -> Vec<CardId> {
        self.cards(list_id).iter().map(|c| c.id.clone()).collect()
    }

    /// Last server-confirmed placement of a card.
    #[must_use]
    pub fn confirmed(&self, card_id: &str) -> Option<&Placement> {
        self.confirmed.get(card_id)
    }
}
