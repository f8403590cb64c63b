//! Board API: the collaborator the reconciliation layer commits against.
//!
//! `BoardApi` is the seam: the sync driver only ever talks to the trait, so
//! tests substitute an in-memory fake and the binary plugs in
//! [`http::HttpBoardApi`].

pub mod http;
pub mod types;


pub use http::HttpBoardApi;
pub use types::{ApiError, BoardId, Card, CardId, Column, ListId};

/// Reads and commits for one board's lists and cards.
#[async_trait::async_trait]
pub trait BoardApi: Send + Sync {
    /// Lists of a board, in server order.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or is rejected.
    async fn list_columns(&self, board_id: &str) -> Result<Vec<Column>, ApiError>;

    /// Cards of a list, in server order. Also used to resynchronize a list
    /// after a failed move.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or is rejected.
    async fn list_cards(&self, list_id: &str) -> Result<Vec<Card>, ApiError>;

    /// Persist one card's list membership and position.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or is rejected.
    async fn commit_card_move(&self, card_id: &str, list_id: &str, position: usize) -> Result<(), ApiError>;

    /// Persist the full order of a board's lists. Returns the authoritative
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or is rejected.
    async fn commit_column_order(&self, board_id: &str, ordered: &[ListId]) -> Result<Vec<Column>, ApiError>;
}
