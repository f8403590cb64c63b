//! Async driver that executes reconciliation plans against a [`BoardApi`].
//!
//! The reconciler sits behind a mutex that is never held across a network
//! call. Column reorders may overlap freely; their tokens sort out which
//! response wins. Card-move batches run one at a time through `card_lane`:
//! the optimistic move is applied immediately, but commits are diffed and
//! sent only once the previous batch (including any refetch) has finished.
//! A failed batch refetches its own lists plus every list a queued batch
//! touched, and those queued batches then report their move as discarded.

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;

use std::collections::{BTreeSet, HashMap};

use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::api::{ApiError, BoardApi, CardId, ListId};
use crate::error::SyncError;
use crate::reconcile::{BoardDrop, ColumnOrderRequest, ColumnOutcome, Plan, Reconciler};

/// What a handled drop ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing to persist.
    Noop,
    /// The server confirmed the new column order.
    ColumnsCommitted,
    /// A newer reorder superseded this one; its response was discarded.
    ColumnsSuperseded,
    /// Card placements persisted.
    CardsCommitted { commits: usize },
    /// An earlier batch already persisted every placement this move changed.
    CardsAlreadyCommitted,
}

/// Reconciler plus the card-lane bookkeeping that must change atomically
/// with it.
struct BoardState {
    reconciler: Reconciler,
    /// Lists touched by card moves applied locally but not yet finished.
    queued: HashMap<ListId, usize>,
    /// Bumped by every failure refetch. A batch applied under an older value
    /// had its optimistic move overwritten.
    resyncs: u64,
}

impl BoardState {
    fn enqueue(&mut self, lists: &[ListId]) {
        for list_id in lists {
            *self.queued.entry(list_id.clone()).or_default() += 1;
        }
    }

    fn dequeue(&mut self, lists: &[ListId]) {
        for list_id in lists {
            if let Some(count) = self.queued.get_mut(list_id) {
                *count -= 1;
                if *count == 0 {
                    self.queued.remove(list_id);
                }
            }
        }
    }

    /// `touched` first, then every other list a queued batch depends on.
    fn resync_set(&self, touched: &[ListId]) -> Vec<ListId> {
        let others: BTreeSet<&ListId> = self.queued.keys().filter(|id| !touched.contains(*id)).collect();
        touched.iter().cloned().chain(others.into_iter().cloned()).collect()
    }
}

pub struct BoardSync<A: BoardApi> {
    api: A,
    state: Mutex<BoardState>,
    card_lane: Mutex<()>,
}

impl<A: BoardApi> BoardSync<A> {
    #[must_use]
    pub fn new(api: A, board_id: impl Into<String>) -> Self {
        let state = BoardState { reconciler: Reconciler::new(board_id), queued: HashMap::new(), resyncs: 0 };
        Self { api, state: Mutex::new(state), card_lane: Mutex::new(()) }
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Run `f` against the current reconciler state.
    pub async fn read<R>(&self, f: impl FnOnce(&Reconciler) -> R) -> R {
        f(&self.state.lock().await.reconciler)
    }

    /// Load the board's lists and every list's cards. Nothing is applied
    /// unless every fetch succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Load`] if any fetch fails.
    pub async fn hydrate(&self) -> Result<(), SyncError> {
        let board_id = self.state.lock().await.reconciler.board_id().to_string();
        let columns = self.api.list_columns(&board_id).await.map_err(SyncError::Load)?;
        let list_ids: Vec<ListId> = columns.iter().map(|c| c.id.clone()).collect();

        let fetched = join_all(list_ids.iter().map(|id| self.api.list_cards(id)))
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map_err(SyncError::Load)?;

        let mut state = self.state.lock().await;
        state.reconciler.load_columns(columns);
        for (list_id, cards) in list_ids.iter().zip(fetched) {
            state.reconciler.load_cards(list_id, cards);
        }
        info!(board_id, lists = list_ids.len(), "board hydrated");
        Ok(())
    }

    /// Apply a finished drop optimistically and persist it.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ColumnReorder`] after a rollback,
    /// [`SyncError::CardMove`] after a resync, [`SyncError::CardMoveDiscarded`]
    /// when an earlier failed batch's resync overwrote this move, or
    /// [`SyncError::Refetch`] when the resync itself failed.
    pub async fn handle_drop(&self, drop: &BoardDrop) -> Result<SyncOutcome, SyncError> {
        let (plan, resyncs) = {
            let mut state = self.state.lock().await;
            let plan = state.reconciler.apply_drop(drop);
            if let Plan::MoveCards { touched, .. } = &plan {
                state.enqueue(touched);
            }
            (plan, state.resyncs)
        };
        match plan {
            Plan::Noop => Ok(SyncOutcome::Noop),
            Plan::ReorderColumns(request) => self.commit_columns(request).await,
            Plan::MoveCards { card_id, touched } => {
                let _lane = self.card_lane.lock().await;
                let result = self.commit_cards(&card_id, &touched, resyncs).await;
                self.state.lock().await.dequeue(&touched);
                result
            }
        }
    }

    async fn commit_columns(&self, request: ColumnOrderRequest) -> Result<SyncOutcome, SyncError> {
        let response = self
            .api
            .commit_column_order(&request.board_id, &request.ordered)
            .await;

        let mut state = self.state.lock().await;
        let reconciler = &mut state.reconciler;
        match response {
            Ok(columns) => match reconciler.column_order_succeeded(request.token, columns) {
                ColumnOutcome::Committed => Ok(SyncOutcome::ColumnsCommitted),
                ColumnOutcome::RolledBack | ColumnOutcome::Stale => Ok(SyncOutcome::ColumnsSuperseded),
            },
            Err(e) => match reconciler.column_order_failed(request.token) {
                ColumnOutcome::RolledBack => Err(SyncError::ColumnReorder { source: e }),
                ColumnOutcome::Committed | ColumnOutcome::Stale => Ok(SyncOutcome::ColumnsSuperseded),
            },
        }
    }

    /// Diff, commit concurrently, and resync on failure. Caller holds the
    /// card lane.
    async fn commit_cards(&self, card_id: &str, touched: &[ListId], resyncs: u64) -> Result<SyncOutcome, SyncError> {
        let commits = {
            let state = self.state.lock().await;
            if state.resyncs != resyncs {
                warn!(card_id, "card move overwritten by an earlier resync; not committing");
                return Err(SyncError::CardMoveDiscarded { card_id: card_id.to_string() });
            }
            state.reconciler.diff(touched)
        };
        if commits.is_empty() {
            info!(card_id, "placements already persisted by an earlier batch");
            return Ok(SyncOutcome::CardsAlreadyCommitted);
        }
        info!(card_id, lists = ?touched, commits = commits.len(), "committing card move");

        let results = join_all(
            commits
                .iter()
                .map(|c| self.api.commit_card_move(&c.card_id, &c.list_id, c.position)),
        )
        .await;

        let attempted = commits.len();
        let mut failures: Vec<(CardId, ApiError)> = Vec::new();
        let resync = {
            let mut state = self.state.lock().await;
            for (commit, result) in commits.iter().zip(results) {
                match result {
                    Ok(()) => state.reconciler.card_commit_succeeded(commit),
                    Err(e) => failures.push((commit.card_id.clone(), e)),
                }
            }
            state.resync_set(touched)
        };

        if failures.is_empty() {
            return Ok(SyncOutcome::CardsCommitted { commits: attempted });
        }
        let failed = failures.len();
        let (failed_card, first) = failures.swap_remove(0);
        warn!(failed, attempted, card_id = %failed_card, error = %first, lists = ?resync, "card commit failed; refetching lists");

        self.refetch(&resync).await?;
        Err(SyncError::CardMove { failed, attempted, first })
    }

    async fn refetch(&self, lists: &[ListId]) -> Result<(), SyncError> {
        let fetched = join_all(lists.iter().map(|id| self.api.list_cards(id))).await;
        let mut state = self.state.lock().await;
        state.resyncs += 1;
        let mut first_error = None;
        for (list_id, result) in lists.iter().zip(fetched) {
            match result {
                Ok(cards) => state.reconciler.load_cards(list_id, cards),
                Err(e) => {
                    error!(list_id, error = %e, "refetch failed; list view may be stale");
                    if first_error.is_none() {
                        first_error = Some(SyncError::Refetch { list_id: list_id.clone(), source: e });
                    }
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
