//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`InputAction`]s and keeps the cursor and
//! selection state that turns them into swap requests. Nothing here knows the
//! rules; the engine validates every request.

pub mod cursor;
pub mod map;

pub use tile_cascade_types as types;

pub use cursor::{CursorState, SwapRequest};
pub use map::{handle_key_event, should_quit, Direction, InputAction};
