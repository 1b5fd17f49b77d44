//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be used
//! from the resolution core, the terminal front end and the headless adapter alike.
//!
//! # Coordinates
//!
//! Boards are `width × height` grids indexed by [`Pos`]:
//!
//! - `(0, 0)` is the **bottom-left** cell
//! - `x` grows to the right, `y` grows upward
//! - gravity pulls tiles toward `y = 0`, refills enter from `y = height - 1`
//!
//! # Session Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_WIDTH` | 8 | Board columns |
//! | `DEFAULT_HEIGHT` | 8 | Board rows |
//! | `DEFAULT_BLOCKER_ROWS` | 4 | Bottom rows seeded with blockers |
//! | `DEFAULT_MOVE_BUDGET` | 30 | Moves available per session |
//! | `DEFAULT_PALETTE_SIZE` | 5 | Distinct tile colours |
//! | `INITIAL_PLACEMENT_RETRIES` | 10 | Attempts to avoid a run during initial fill |
//!
//! # Text Form
//!
//! Every tile has a one-character code used by tests, replays and the adapter:
//!
//! | Tile | Char |
//! |------|------|
//! | `Empty` | `.` |
//! | `Colored(0..=7)` | `A`..=`H` |
//! | `Blocker` | `#` |
//! | `LineRow` | `-` |
//! | `LineColumn` | `\|` |
//! | `Wildcard` | `*` |
//!
//! # Examples
//!
//! ```
//! use tile_cascade_types::{Pos, Tile, SpecialKind};
//!
//! let tile = Tile::from_char('C').unwrap();
//! assert_eq!(tile, Tile::Colored(2));
//! assert_eq!(tile.as_char(), 'C');
//!
//! // A horizontal run of four spawns a column-clearing tile.
//! assert_eq!(SpecialKind::for_run(4, true), Some(SpecialKind::LineColumn));
//!
//! assert!(Pos::new(3, 2).is_adjacent(Pos::new(3, 3)));
//! assert!(!Pos::new(3, 2).is_adjacent(Pos::new(4, 3)));
//! ```

use std::fmt;

/// Default board width in cells (8 columns)
pub const DEFAULT_WIDTH: u8 = 8;

/// Default board height in cells (8 rows)
pub const DEFAULT_HEIGHT: u8 = 8;

/// Default number of bottom rows seeded with blockers
pub const DEFAULT_BLOCKER_ROWS: u8 = 4;

/// Default move budget per session
pub const DEFAULT_MOVE_BUDGET: u32 = 30;

/// Default number of tile colours
pub const DEFAULT_PALETTE_SIZE: u8 = 5;

/// Smallest palette that still allows a match-free initial fill
pub const MIN_PALETTE_SIZE: u8 = 2;

/// Largest palette (bounded by the `A`..=`H` text codes)
pub const MAX_PALETTE_SIZE: u8 = 8;

/// Largest supported board dimension
pub const MAX_BOARD_DIM: u8 = 32;

/// Shortest sequence of identical colours that counts as a run
pub const MIN_RUN_LEN: usize = 3;

/// Colour draws attempted per cell before the initial fill accepts a run
pub const INITIAL_PLACEMENT_RETRIES: u32 = 10;

/// Colour index into the session palette
pub type ColorId = u8;

/// A board cell position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two cells
    pub fn distance(self, other: Pos) -> u16 {
        (self.x.abs_diff(other.x) as u16) + (self.y.abs_diff(other.y) as u16)
    }

    /// True when the cells share an edge
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.distance(other) == 1
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis cleared by a line tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineOrientation {
    Row,
    Column,
}

impl LineOrientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineOrientation::Row => "row",
            LineOrientation::Column => "column",
        }
    }
}

/// Contents of a single board cell
///
/// - **Empty**: transient hole, only observable mid-cascade
/// - **Colored**: ordinary matchable tile
/// - **Blocker**: never swapped or matched; destroyed by adjacent clears
/// - **LineRow / LineColumn**: clears its full row / column when triggered
/// - **Wildcard**: clears every tile of one colour when triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tile {
    #[default]
    Empty,
    Colored(ColorId),
    Blocker,
    LineRow,
    LineColumn,
    Wildcard,
}

impl Tile {
    /// Colour of a `Colored` tile
    pub fn color(&self) -> Option<ColorId> {
        match self {
            Tile::Colored(c) => Some(*c),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Tile::Empty)
    }

    pub fn is_blocker(&self) -> bool {
        matches!(self, Tile::Blocker)
    }

    /// Line, row or wildcard tiles
    pub fn is_special(&self) -> bool {
        matches!(self, Tile::LineRow | Tile::LineColumn | Tile::Wildcard)
    }

    /// Orientation cleared by a line tile
    pub fn line_orientation(&self) -> Option<LineOrientation> {
        match self {
            Tile::LineRow => Some(LineOrientation::Row),
            Tile::LineColumn => Some(LineOrientation::Column),
            _ => None,
        }
    }

    /// Whether the player may pick this tile up
    pub fn is_swappable(&self) -> bool {
        !matches!(self, Tile::Empty | Tile::Blocker)
    }

    /// One-character text code
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_cascade_types::Tile;
    ///
    /// assert_eq!(Tile::Colored(0).as_char(), 'A');
    /// assert_eq!(Tile::Blocker.as_char(), '#');
    /// assert_eq!(Tile::Wildcard.as_char(), '*');
    /// ```
    pub fn as_char(&self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Colored(c) => (b'A' + (*c).min(25)) as char,
            Tile::Blocker => '#',
            Tile::LineRow => '-',
            Tile::LineColumn => '|',
            Tile::Wildcard => '*',
        }
    }

    /// Parse a one-character text code (case-insensitive for colours)
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(Tile::Empty),
            '#' => Some(Tile::Blocker),
            '-' => Some(Tile::LineRow),
            '|' => Some(Tile::LineColumn),
            '*' => Some(Tile::Wildcard),
            c if c.is_ascii_alphabetic() => {
                let idx = (c.to_ascii_uppercase() as u8) - b'A';
                if idx < MAX_PALETTE_SIZE {
                    Some(Tile::Colored(idx))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Kind name used in event and protocol payloads
    pub fn kind_str(&self) -> &'static str {
        match self {
            Tile::Empty => "empty",
            Tile::Colored(_) => "colored",
            Tile::Blocker => "blocker",
            Tile::LineRow => "line_row",
            Tile::LineColumn => "line_column",
            Tile::Wildcard => "wildcard",
        }
    }
}

/// Special tile produced by a long run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKind {
    LineRow,
    LineColumn,
    Wildcard,
}

impl SpecialKind {
    /// Special produced by a run of `len` cells
    ///
    /// Runs of four produce a line tile perpendicular to the run, runs of five
    /// or more produce a wildcard, shorter runs produce nothing.
    pub fn for_run(len: usize, horizontal: bool) -> Option<Self> {
        match len {
            4 if horizontal => Some(SpecialKind::LineColumn),
            4 => Some(SpecialKind::LineRow),
            n if n >= 5 => Some(SpecialKind::Wildcard),
            _ => None,
        }
    }

    /// Offset within the run where the special appears
    pub fn spawn_offset(len: usize) -> usize {
        if len == 4 {
            1
        } else {
            len / 2
        }
    }

    pub fn tile(self) -> Tile {
        match self {
            SpecialKind::LineRow => Tile::LineRow,
            SpecialKind::LineColumn => Tile::LineColumn,
            SpecialKind::Wildcard => Tile::Wildcard,
        }
    }
}

/// Session result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionOutcome {
    #[default]
    Playing,
    /// Every blocker was destroyed
    Cleared,
    /// The move budget ran out first
    Failed,
}

impl SessionOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionOutcome::Playing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionOutcome::Playing => "playing",
            SessionOutcome::Cleared => "cleared",
            SessionOutcome::Failed => "failed",
        }
    }
}

/// Path a successful swap took through the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionPath {
    LineActivation,
    WildcardActivation,
    Match,
}

impl ResolutionPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionPath::LineActivation => "line",
            ResolutionPath::WildcardActivation => "wildcard",
            ResolutionPath::Match => "match",
        }
    }
}

/// Why a swap request was refused
///
/// Rejections are recovered locally: the board is left untouched and no move
/// is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapRejection {
    NotAdjacent,
    BlockerEndpoint,
    EmptyEndpoint,
    NotPlaying,
    NoMovesLeft,
    /// The swap produced no run and was reverted
    NoMatch,
}

impl SwapRejection {
    pub fn code(self) -> &'static str {
        match self {
            SwapRejection::NotAdjacent => "not_adjacent",
            SwapRejection::BlockerEndpoint => "blocker_endpoint",
            SwapRejection::EmptyEndpoint => "empty_endpoint",
            SwapRejection::NotPlaying => "not_playing",
            SwapRejection::NoMovesLeft => "no_moves_left",
            SwapRejection::NoMatch => "no_match",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            SwapRejection::NotAdjacent => "cells are not orthogonally adjacent",
            SwapRejection::BlockerEndpoint => "blockers cannot be swapped",
            SwapRejection::EmptyEndpoint => "cannot swap an empty cell",
            SwapRejection::NotPlaying => "session has ended",
            SwapRejection::NoMovesLeft => "move budget exhausted",
            SwapRejection::NoMatch => "swap produced no run and was reverted",
        }
    }
}

/// Event emitted by the core for rendering and UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    TileDestroyed { pos: Pos, tile: Tile },
    /// Refill drop or special tile creation
    TileSpawned { pos: Pos, tile: Tile },
    /// Gravity or accepted swap
    TileMoved { from: Pos, to: Pos, tile: Tile },
    MoveConsumed { moves_remaining: u32 },
    SessionEnded { outcome: SessionOutcome },
    SwapRejected { from: Pos, to: Pos, reason: SwapRejection },
    /// The cascade for one swap (or the initial layout) has settled
    CascadeSettled { rounds: u32 },
}

impl GameEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameEvent::TileDestroyed { .. } => "tile_destroyed",
            GameEvent::TileSpawned { .. } => "tile_spawned",
            GameEvent::TileMoved { .. } => "tile_moved",
            GameEvent::MoveConsumed { .. } => "move_consumed",
            GameEvent::SessionEnded { .. } => "session_ended",
            GameEvent::SwapRejected { .. } => "swap_rejected",
            GameEvent::CascadeSettled { .. } => "cascade_settled",
        }
    }
}
