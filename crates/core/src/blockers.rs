//! Blocker tracking
//!
//! Blockers never match and never move sideways. They are destroyed only by
//! adjacency damage from a destroyed matched/colour-cleared tile, or by a line
//! clear passing through them. The tracker owns the remaining count; clearing
//! the last one wins the session.

use crate::board::Board;
use crate::error::EngineError;
use crate::types::{Pos, Tile};

/// Result of hitting a cell with blocker damage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockerHit {
    /// The cell did not hold a blocker
    Missed,
    /// A blocker was removed and others remain
    Destroyed { remaining: u32 },
    /// The last blocker was removed
    Cleared,
}

impl BlockerHit {
    pub fn destroyed(&self) -> bool {
        !matches!(self, BlockerHit::Missed)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockerTracker {
    remaining: u32,
}

impl BlockerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the blockers already on `board`
    pub fn from_board(board: &Board) -> Self {
        Self {
            remaining: board.count_blockers() as u32,
        }
    }

    /// Record a blocker placed during population
    pub fn register(&mut self) {
        self.remaining += 1;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Remove the blocker at `pos`, if any.
    ///
    /// Fails when the board holds a blocker the tracker has no record of.
    pub fn destroy(&mut self, board: &mut Board, pos: Pos) -> Result<BlockerHit, EngineError> {
        if board.get(pos) != Tile::Blocker {
            return Ok(BlockerHit::Missed);
        }
        if self.remaining == 0 {
            return Err(EngineError::Invariant("blocker count underflow"));
        }

        board.set(pos, Tile::Empty);
        self.remaining -= 1;

        if self.remaining == 0 {
            Ok(BlockerHit::Cleared)
        } else {
            Ok(BlockerHit::Destroyed {
                remaining: self.remaining,
            })
        }
    }
}
