use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dnd::coordinator::DndConfig;
use dnd::geometry::Axis;
use dnd::types::{DraggableLocation, DropReason, DropResult};
use taskboard::api::{ApiError, HttpBoardApi};
use taskboard::config::{BoardConfig, ConfigError};
use taskboard::error::{ErrorCode, SyncError};
use taskboard::reconcile::{BoardDrop, COLUMN_STRIP, DragItem};
use taskboard::replay::{ReplayError, Trace, replay};
use taskboard::sync::{BoardSync, SyncOutcome};
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing board id; pass --board, set TASKBOARD_BOARD_ID, or record boardId in the trace")]
    MissingBoard,
    #[error("card {0} is not on this board")]
    UnknownCard(String),
    #[error("list {0} is not on this board")]
    UnknownList(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

impl ErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingBoard => "E_MISSING_BOARD",
            Self::UnknownCard(_) => "E_UNKNOWN_CARD",
            Self::UnknownList(_) => "E_UNKNOWN_LIST",
            Self::Config(e) => e.error_code(),
            Self::Api(e) => e.error_code(),
            Self::Sync(e) => e.error_code(),
            Self::Replay(e) => e.error_code(),
            Self::Output(_) => "E_OUTPUT",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "taskboard", about = "Task board drag-and-drop replay and reorder CLI")]
struct Cli {
    #[arg(long, global = true, env = "TASKBOARD_BOARD_ID")]
    board: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a recorded pointer trace and print the resulting drops.
    Replay {
        trace: PathBuf,
        /// Also reconcile each drop against the live board.
        #[arg(long, default_value_t = false)]
        apply: bool,
        /// Lay out single-item containers horizontally.
        #[arg(long, default_value_t = false)]
        horizontal: bool,
    },
    /// Move a card to a list and index.
    MoveCard {
        #[arg(long)]
        card: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        index: usize,
    },
    /// Move a list to an index in the column strip.
    MoveColumn {
        #[arg(long)]
        list: String,
        #[arg(long)]
        index: usize,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "ignoring unreadable .env"),
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.error_code(), "{e}");
            eprintln!("{}: {e}", e.error_code());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Replay { trace, apply, horizontal } => {
            run_replay(cli.board, &trace, apply, horizontal).await
        }
        Command::MoveCard { card, to, index } => {
            let sync = connect(cli.board).await?;
            let drop = card_drop(&sync, card, to, index).await?;
            report(sync.handle_drop(&drop).await?);
            Ok(())
        }
        Command::MoveColumn { list, index } => {
            let sync = connect(cli.board).await?;
            let drop = column_drop(&sync, list, index).await?;
            report(sync.handle_drop(&drop).await?);
            Ok(())
        }
    }
}

async fn run_replay(
    board: Option<String>,
    path: &std::path::Path,
    apply: bool,
    horizontal: bool,
) -> Result<(), CliError> {
    let trace = Trace::load(path)?;
    let mut config = DndConfig::default();
    if horizontal {
        config.default_axis = Axis::Horizontal;
    }
    let drops = replay(&trace, config)?;
    info!(trace = %path.display(), drops = drops.len(), "trace replayed");
    println!("{}", serde_json::to_string_pretty(&drops)?);

    if !apply {
        return Ok(());
    }
    let sync = connect(board.or_else(|| trace.board_id.clone())).await?;
    for drop in &drops {
        // A failed drop is already rolled back or resynced; keep replaying.
        match sync.handle_drop(drop).await {
            Ok(outcome) => report(outcome),
            Err(e) => warn!(code = e.error_code(), item = ?drop.item, "{e}"),
        }
    }
    Ok(())
}

async fn connect(board: Option<String>) -> Result<BoardSync<HttpBoardApi>, CliError> {
    let board = board.ok_or(CliError::MissingBoard)?;
    let config = BoardConfig::from_env()?;
    let api = HttpBoardApi::new(&config)?;
    info!(api_url = api.base_url(), board = %board, "connecting");
    let sync = BoardSync::new(api, board);
    sync.hydrate().await?;
    Ok(sync)
}

async fn card_drop(
    sync: &BoardSync<HttpBoardApi>,
    card: String,
    to: String,
    index: usize,
) -> Result<BoardDrop, CliError> {
    let (source, known_target) = sync
        .read(|rec| {
            let source = rec.confirmed(&card).and_then(|placement| {
                let from = rec.card_ids(&placement.list_id).iter().position(|id| *id == card)?;
                Some(DraggableLocation::new(placement.list_id.clone(), from))
            });
            (source, rec.column_ids().iter().any(|id| *id == to))
        })
        .await;
    let source = source.ok_or_else(|| CliError::UnknownCard(card.clone()))?;
    if !known_target {
        return Err(CliError::UnknownList(to));
    }
    Ok(DropResult::new(DragItem::Card(card), source, Some(DraggableLocation::new(to, index)), DropReason::Drop))
}

async fn column_drop(sync: &BoardSync<HttpBoardApi>, list: String, index: usize) -> Result<BoardDrop, CliError> {
    let from = sync.read(|rec| rec.column_ids().iter().position(|id| *id == list)).await;
    let from = from.ok_or_else(|| CliError::UnknownList(list.clone()))?;
    Ok(DropResult::new(
        DragItem::Column(list),
        DraggableLocation::new(COLUMN_STRIP, from),
        Some(DraggableLocation::new(COLUMN_STRIP, index)),
        DropReason::Drop,
    ))
}

fn report(outcome: SyncOutcome) {
    match outcome {
        SyncOutcome::Noop => println!("nothing to do"),
        SyncOutcome::ColumnsCommitted => println!("column order saved"),
        SyncOutcome::ColumnsSuperseded => println!("column order superseded by a newer reorder"),
        SyncOutcome::CardsCommitted { commits } => println!("saved {commits} card placement(s)"),
        SyncOutcome::CardsAlreadyCommitted => println!("placements already saved by an earlier move"),
    }
}
