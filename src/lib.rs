//! Task board drag-and-drop reconciliation.
//!
//! The `dnd` crate turns pointer gestures into [`dnd::types::DropResult`]s.
//! This crate takes those results and keeps a board of lists and cards in
//! step with its backend.
//!
//! | module      | role                                                         |
//! |-------------|--------------------------------------------------------------|
//! | `api`       | wire types and the [`api::BoardApi`] seam, plus an HTTP client |
//! | `config`    | environment-driven [`config::BoardConfig`]                   |
//! | `error`     | [`error::ErrorCode`] and the sync error type                 |
//! | `reconcile` | pure optimistic reorders, rollback and commit diffing        |
//! | `sync`      | async driver running reconcile plans against the API         |
//! | `replay`    | headless replay of recorded pointer traces                   |

pub mod api;
pub mod config;
pub mod error;
pub mod reconcile;
pub mod replay;
pub mod sync;
