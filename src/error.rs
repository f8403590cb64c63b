//! Error codes shared by every surfaced failure.
//!
//! Each error enum maps its variants to a grepable `E_*` code. Nothing here
//! is retried automatically: a failed reorder or move is terminal for the
//! gesture that caused it and the user re-attempts the action.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

use crate::api::{ApiError, CardId, ListId};

/// Grepable error code and retryable flag.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// SYNC ERRORS
// =============================================================================

/// Reconciliation failures surfaced to the user after local state has been
/// rolled back or resynchronized.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Column reorder rejected; local order reverted to the last confirmed one.
    #[error("column reorder failed, order restored: {source}")]
    ColumnReorder {
        #[source]
        source: ApiError,
    },

    /// At least one card commit failed; touched lists were refetched.
    #[error("card move failed for {failed} of {attempted} card(s); lists refetched")]
    CardMove {
        failed: usize,
        attempted: usize,
        #[source]
        first: ApiError,
    },

    /// An earlier batch failed and its resync overwrote this move before it
    /// was committed; the card shows its server placement.
    #[error("card move for {card_id} discarded after an earlier move failed; lists refetched")]
    CardMoveDiscarded { card_id: CardId },

    /// Refetch after a failed card move also failed; the list view may be stale.
    #[error("refetch of list {list_id} failed: {source}")]
    Refetch {
        list_id: ListId,
        #[source]
        source: ApiError,
    },

    /// Initial board load failed.
    #[error("board load failed: {0}")]
    Load(#[source] ApiError),
}

impl ErrorCode for SyncError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnReorder { .. } => "E_COLUMN_REORDER",
            Self::CardMove { .. } => "E_CARD_MOVE",
            Self::CardMoveDiscarded { .. } => "E_CARD_MOVE_DISCARDED",
            Self::Refetch { .. } => "E_REFETCH",
            Self::Load(_) => "E_BOARD_LOAD",
        }
    }
}
