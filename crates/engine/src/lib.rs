//! Play helpers built on the resolution core.
//!
//! - [`hint`]: enumerate the swaps a session would accept, with their predicted
//!   cascade, by simulating each one on a fork of the session
//! - [`replay`]: run a text script of swaps against a seeded session and
//!   collect a transcript

pub mod hint;
pub mod replay;

pub use tile_cascade_core as core;
pub use tile_cascade_types as types;

pub use hint::{best_swap, find_swaps, has_valid_swap, SwapHint};
pub use replay::{autoplay, Replay, ReplayError, ReplayStep, Transcript, TranscriptEntry};
