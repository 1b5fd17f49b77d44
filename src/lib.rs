//! Tile Cascade (workspace facade crate).
//!
//! Re-exports the member crates under `tile_cascade::{core,adapter,term,input,engine,types}` so
//! binaries, integration tests and benches share one import path.

pub use tile_cascade_adapter as adapter;
pub use tile_cascade_core as core;
pub use tile_cascade_engine as engine;
pub use tile_cascade_input as input;
pub use tile_cascade_term as term;
pub use tile_cascade_types as types;
