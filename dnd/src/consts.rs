//! Shared constants for the dnd crate.

use crate::geometry::Axis;

// ── Destination inference ───────────────────────────────────────

/// Axis used when a container holds fewer than two siblings and the
/// spread of their centers cannot decide one.
pub const DEFAULT_AXIS: Axis = Axis::Vertical;

/// Axis forced for top-level containers (the board's column strip).
pub const TOP_LEVEL_AXIS: Axis = Axis::Horizontal;

// ── Registry ────────────────────────────────────────────────────

/// First registration id handed out by a fresh registry.
pub const FIRST_REGISTRATION: u64 = 1;
