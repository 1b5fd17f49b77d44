use crate::board::Board;
use crate::types::{Pos, SessionOutcome, Tile};

/// Read-only copy of a session for renderers and observers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub width: u8,
    pub height: u8,
    /// Row-major tiles (y * width + x)
    pub tiles: Vec<Tile>,
    pub board_hash: u64,
    pub moves_remaining: u32,
    pub moves_made: u32,
    pub blockers_remaining: u32,
    pub outcome: SessionOutcome,
    pub seed: u32,
}

impl SessionSnapshot {
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.tiles.clear();
        self.board_hash = 0;
        self.moves_remaining = 0;
        self.moves_made = 0;
        self.blockers_remaining = 0;
        self.outcome = SessionOutcome::Playing;
        self.seed = 0;
    }

    /// Copy the board into this snapshot, reusing its allocation
    pub fn copy_board(&mut self, board: &Board) {
        self.width = board.width();
        self.height = board.height();
        self.tiles.clear();
        self.tiles.extend_from_slice(board.cells());
        self.board_hash = board.board_hash();
    }

    /// Tile at `pos`, `Empty` outside the board
    pub fn tile(&self, pos: Pos) -> Tile {
        if pos.x >= self.width || pos.y >= self.height {
            return Tile::Empty;
        }
        self.tiles[pos.y as usize * self.width as usize + pos.x as usize]
    }

    /// Text rows, top row first
    pub fn rows_top_down(&self) -> Vec<String> {
        (0..self.height)
            .rev()
            .map(|y| {
                (0..self.width)
                    .map(|x| self.tile(Pos::new(x, y)).as_char())
                    .collect()
            })
            .collect()
    }

    pub fn playable(&self) -> bool {
        self.outcome == SessionOutcome::Playing && self.moves_remaining > 0
    }
}
