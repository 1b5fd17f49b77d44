//! Terminal rendering for the puzzle.
//!
//! A small, game-oriented rendering layer: the session snapshot is drawn into
//! a plain framebuffer, which is then flushed to the terminal as a diff.
//!
//! - [`fb`]: styled character framebuffer
//! - [`game_view`]: board, counters, cursor and end-of-session banners
//! - [`renderer`]: crossterm output with changed-run diffing

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tile_cascade_core as core;
pub use tile_cascade_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Overlay, Viewport};
pub use renderer::{changed_runs, encode_diff_into, encode_full_into, TerminalRenderer};
