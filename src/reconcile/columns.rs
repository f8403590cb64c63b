//! Column strip reorders with token-guarded optimistic commits.

#[cfg(test)]
#[path = "columns_test.rs"]
mod tests;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{Plan, Reconciler};
use crate::api::types::position_to_wire;
use crate::api::{BoardId, Column, ListId};

/// Commit request for the full column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOrderRequest {
    /// Identifies this request; only the newest token may resolve.
    pub token: Uuid,
    pub board_id: BoardId,
    /// Every list id in the new order; positions are the indices.
    pub ordered: Vec<ListId>,
}

/// Confirmation state of the column strip.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnSync {
    /// Local order matches what the server last confirmed.
    #[default]
    Confirmed,
    /// One or more optimistic reorders are outstanding.
    Pending {
        /// Order before the first outstanding reorder. Kept across
        /// overlapping reorders so a rollback undoes all of them.
        baseline: Vec<Column>,
        /// Token of the newest request.
        token: Uuid,
    },
}

impl ColumnSync {
    #[must_use]
    pub fn pending_token(&self) -> Option<Uuid> {
        match self {
            Self::Confirmed => None,
            Self::Pending { token, .. } => Some(*token),
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// How a column-order response was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnOutcome {
    /// Server order adopted.
    Committed,
    /// Local order reverted to the baseline.
    RolledBack,
    /// Response belonged to a superseded request and was ignored.
    Stale,
}

impl Reconciler {
    /// Move column `list_id` to `to` (clamped), renumber, and open or extend
    /// the pending chain.
    pub(super) fn reorder_columns(&mut self, list_id: &str, to: usize) -> Plan {
        let Some(from) = self.columns.iter().position(|c| c.id == list_id) else {
            warn!(list_id, "dropped column is not on the board; ignoring");
            return Plan::Noop;
        };

        let mut next = self.columns.clone();
        let moved = next.remove(from);
        let to = to.min(next.len());
        if to == from {
            return Plan::Noop;
        }
        next.insert(to, moved);
        for (i, column) in next.iter_mut().enumerate() {
            column.position = position_to_wire(i);
        }

        let baseline = match std::mem::take(&mut self.column_sync) {
            ColumnSync::Pending { baseline, .. } => baseline,
            ColumnSync::Confirmed => std::mem::take(&mut self.columns),
        };
        let token = Uuid::new_v4();
        self.columns = next;
        self.column_sync = ColumnSync::Pending { baseline, token };

        debug!(list_id, from, to, %token, "columns reordered optimistically");
        Plan::ReorderColumns(ColumnOrderRequest {
            token,
            board_id: self.board_id.clone(),
            ordered: self.column_ids(),
        })
    }

    /// The server accepted request `token` and returned `server` as the
    /// authoritative order.
    pub fn column_order_succeeded(&mut self, token: Uuid, mut server: Vec<Column>) -> ColumnOutcome {
        if self.column_sync.pending_token() != Some(token) {
            debug!(%token, "ignoring stale column order response");
            return ColumnOutcome::Stale;
        }
        server.sort_by_key(|c| c.position);
        info!(board_id = %self.board_id, %token, count = server.len(), "column order committed");
        self.columns = server;
        self.column_sync = ColumnSync::Confirmed;
        ColumnOutcome::Committed
    }

    /// Request `token` failed. Rolls back to the baseline when it is the
    /// newest request.
    pub fn column_order_failed(&mut self, token: Uuid) -> ColumnOutcome {
        match std::mem::take(&mut self.column_sync) {
            ColumnSync::Pending { baseline, token: pending } if pending == token => {
                warn!(board_id = %self.board_id, %token, "column order rejected; restoring last confirmed order");
                self.columns = baseline;
                ColumnOutcome::RolledBack
            }
            other => {
                debug!(%token, "ignoring stale column order failure");
                self.column_sync = other;
                ColumnOutcome::Stale
            }
        }
    }
}
