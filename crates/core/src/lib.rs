//! Resolution core - pure, deterministic, and testable
//!
//! This crate contains the whole tile-matching rule set: the board, blocker
//! accounting, run detection, swap resolution and the cascade loop. It does no
//! I/O; every board change is reported through an [`EventSink`] and logged via
//! `tracing`.
//!
//! - **Deterministic**: one seed drives population and refill, so a seed plus a
//!   list of swaps reproduces a session exactly
//! - **Synchronous**: a swap resolves completely before `request_swap` returns
//!
//! # Module Structure
//!
//! - [`board`]: tile grid, gravity, text layout parsing
//! - [`blockers`]: blocker accounting and the win condition
//! - [`matcher`]: run detection and special-spawn placement
//! - [`swap`]: swap validation and resolution path selection
//! - [`cascade`]: the session object and the destroy/collapse/refill loop
//! - [`rng`]: seeded colour generation
//! - [`events`]: event sinks
//! - [`snapshot`]: read-only session copies for renderers and observers
//!
//! # Coordinates
//!
//! `(0, 0)` is the bottom-left cell. Gravity pulls toward `y = 0` and refill
//! enters from the top row.
//!
//! # Example
//!
//! ```
//! use tile_cascade_core::{CascadeEngine, SessionConfig};
//! use tile_cascade_core::types::SessionOutcome;
//!
//! let mut engine = CascadeEngine::new(SessionConfig::default()).unwrap();
//! assert_eq!(engine.moves_remaining(), 30);
//!
//! // Swapping a blocker is refused without using a move
//! let outcome = engine.request_swap(0, 0, 1, 0).unwrap();
//! assert!(!outcome.is_accepted());
//! assert_eq!(engine.moves_remaining(), 30);
//! assert_eq!(engine.outcome(), SessionOutcome::Playing);
//! ```

pub mod blockers;
pub mod board;
pub mod cascade;
pub mod config;
pub mod error;
pub mod events;
pub mod matcher;
pub mod rng;
pub mod snapshot;
pub mod swap;

pub use tile_cascade_types as types;

// Re-export commonly used types for convenience
pub use blockers::{BlockerHit, BlockerTracker};
pub use board::Board;
pub use cascade::{CascadeEngine, CascadeReport, SessionState, SwapOutcome};
pub use config::SessionConfig;
pub use error::EngineError;
pub use events::{EventCounts, EventSink, NullSink};
pub use matcher::{MatchResult, Run, SpecialSpawn};
pub use rng::{SimpleRng, TileGenerator};
pub use snapshot::SessionSnapshot;
pub use swap::SwapPlan;
