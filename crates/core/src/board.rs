//! Board module - owns the tile grid
//!
//! The board is a `width × height` grid stored as a flat row-major vector
//! (`y * width + x`). `(0, 0)` is the bottom-left cell; gravity pulls toward
//! `y = 0`.
//!
//! Coordinates arriving from outside the core go through [`Board::checked_pos`].
//! A [`Pos`] that slips past validation and lands outside the grid is a
//! programming error: every accessor indexes the grid directly and panics.

use std::fmt;

use arrayvec::ArrayVec;

use crate::error::EngineError;
use crate::types::{Pos, Tile, MAX_BOARD_DIM};

/// A single gravity step produced by [`Board::collapse_column`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fall {
    pub from: Pos,
    pub to: Pos,
    pub tile: Tile,
}

/// The tile grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    height: u8,
    /// Row-major cells (y * width + x)
    cells: Vec<Tile>,
}

impl Board {
    /// Create a board filled with `Empty`
    pub fn new(width: u8, height: u8) -> Self {
        Self::filled(width, height, Tile::Empty)
    }

    /// Create a board with every cell set to `tile`
    pub fn filled(width: u8, height: u8, tile: Tile) -> Self {
        assert!(
            width > 0 && height > 0 && width <= MAX_BOARD_DIM && height <= MAX_BOARD_DIM,
            "board dimensions {}x{} out of range",
            width,
            height
        );
        Self {
            width,
            height,
            cells: vec![tile; width as usize * height as usize],
        }
    }

    /// Parse a board from its text form.
    ///
    /// Lines are listed top row first, so the last line is `y = 0`. Blank lines
    /// and surrounding whitespace are ignored; every row must have the same width.
    ///
    /// ```
    /// use tile_cascade_core::Board;
    /// use tile_cascade_core::types::{Pos, Tile};
    ///
    /// let board = Board::parse("AB\n#C").unwrap();
    /// assert_eq!(board.get(Pos::new(0, 0)), Tile::Blocker);
    /// assert_eq!(board.get(Pos::new(1, 1)), Tile::Colored(1));
    /// ```
    pub fn parse(text: &str) -> Result<Self, EngineError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let height = rows.len();
        if height == 0 {
            return Err(EngineError::InvalidLayout("no rows".to_string()));
        }
        let width = rows[0].chars().count();
        if width == 0 || width > MAX_BOARD_DIM as usize || height > MAX_BOARD_DIM as usize {
            return Err(EngineError::InvalidLayout(format!(
                "unsupported size {}x{}",
                width, height
            )));
        }

        let mut board = Board::new(width as u8, height as u8);
        for (row_idx, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(EngineError::InvalidLayout(format!(
                    "row {} has {} cells, expected {}",
                    row_idx,
                    row.chars().count(),
                    width
                )));
            }
            let y = (height - 1 - row_idx) as u8;
            for (x, ch) in row.chars().enumerate() {
                let tile = Tile::from_char(ch).ok_or_else(|| {
                    EngineError::InvalidLayout(format!("unknown tile code {:?}", ch))
                })?;
                board.set(Pos::new(x as u8, y), tile);
            }
        }
        Ok(board)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    #[inline(always)]
    fn index(&self, pos: Pos) -> usize {
        assert!(
            self.contains(pos),
            "position {} outside {}x{} board",
            pos,
            self.width,
            self.height
        );
        (pos.y as usize) * (self.width as usize) + (pos.x as usize)
    }

    /// Check raw coordinates against the board bounds
    pub fn in_bounds(&self, x: i16, y: i16) -> bool {
        x >= 0 && y >= 0 && x < self.width as i16 && y < self.height as i16
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Validate raw coordinates into a [`Pos`]
    pub fn checked_pos(&self, x: i16, y: i16) -> Result<Pos, EngineError> {
        if self.in_bounds(x, y) {
            Ok(Pos::new(x as u8, y as u8))
        } else {
            Err(EngineError::InvalidCoordinate { x, y })
        }
    }

    pub fn get(&self, pos: Pos) -> Tile {
        self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: Pos, tile: Tile) {
        let idx = self.index(pos);
        self.cells[idx] = tile;
    }

    /// Remove the tile at `pos`, leaving `Empty`
    pub fn take(&mut self, pos: Pos) -> Tile {
        let idx = self.index(pos);
        std::mem::take(&mut self.cells[idx])
    }

    /// Exchange two cells
    pub fn swap(&mut self, a: Pos, b: Pos) {
        let ia = self.index(a);
        let ib = self.index(b);
        self.cells.swap(ia, ib);
    }

    /// Tile at an offset from `pos`, if that offset is on the board
    pub fn get_offset(&self, pos: Pos, dx: i16, dy: i16) -> Option<Tile> {
        let x = pos.x as i16 + dx;
        let y = pos.y as i16 + dy;
        self.checked_pos(x, y).ok().map(|p| self.get(p))
    }

    /// Orthogonal neighbours in probe order: +x, -x, +y, -y
    pub fn neighbors(&self, pos: Pos) -> ArrayVec<Pos, 4> {
        let mut out = ArrayVec::new();
        for (dx, dy) in [(1i16, 0i16), (-1, 0), (0, 1), (0, -1)] {
            if let Ok(p) = self.checked_pos(pos.x as i16 + dx, pos.y as i16 + dy) {
                out.push(p);
            }
        }
        out
    }

    /// All positions, column by column, each column bottom to top
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let (w, h) = (self.width, self.height);
        (0..w).flat_map(move |x| (0..h).map(move |y| Pos::new(x, y)))
    }

    /// Positions of row `y`, left to right
    pub fn row(&self, y: u8) -> ArrayVec<Pos, { MAX_BOARD_DIM as usize }> {
        (0..self.width).map(|x| Pos::new(x, y)).collect()
    }

    /// Positions of column `x`, bottom to top
    pub fn column(&self, x: u8) -> ArrayVec<Pos, { MAX_BOARD_DIM as usize }> {
        (0..self.height).map(|y| Pos::new(x, y)).collect()
    }

    pub fn count(&self, pred: impl Fn(&Tile) -> bool) -> usize {
        self.cells.iter().filter(|t| pred(t)).count()
    }

    pub fn count_blockers(&self) -> usize {
        self.count(Tile::is_blocker)
    }

    pub fn count_empty(&self) -> usize {
        self.count(Tile::is_empty)
    }

    /// Let every tile in column `x` fall toward `y = 0`.
    ///
    /// Relative order is preserved and all `Empty` cells end up at the top of
    /// the column. Returns one [`Fall`] per tile that changed row, bottom first.
    pub fn collapse_column(&mut self, x: u8) -> ArrayVec<Fall, { MAX_BOARD_DIM as usize }> {
        let mut falls = ArrayVec::new();
        let mut write_y = 0u8;

        for read_y in 0..self.height {
            let from = Pos::new(x, read_y);
            let tile = self.get(from);
            if tile.is_empty() {
                continue;
            }
            if write_y != read_y {
                let to = Pos::new(x, write_y);
                self.set(to, tile);
                self.set(from, Tile::Empty);
                falls.push(Fall { from, to, tile });
            }
            write_y += 1;
        }

        falls
    }

    /// Read-only view of the row-major cells
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    /// Text rows, top row first
    pub fn rows_top_down(&self) -> Vec<String> {
        (0..self.height)
            .rev()
            .map(|y| {
                (0..self.width)
                    .map(|x| self.get(Pos::new(x, y)).as_char())
                    .collect()
            })
            .collect()
    }

    /// Stable 64-bit FNV-1a hash of the dimensions and tile codes
    pub fn board_hash(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
        const PRIME: u64 = 0x100000001b3;

        let mut h = OFFSET_BASIS;
        let header = [self.width, self.height];
        let body = self.cells.iter().map(|t| t.as_char() as u8);
        for b in header.into_iter().chain(body) {
            h ^= b as u64;
            h = h.wrapping_mul(PRIME);
        }
        h
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows_top_down() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_is_row_major() {
        let board = Board::new(4, 3);
        assert_eq!(board.index(Pos::new(0, 0)), 0);
        assert_eq!(board.index(Pos::new(3, 0)), 3);
        assert_eq!(board.index(Pos::new(0, 1)), 4);
        assert_eq!(board.index(Pos::new(3, 2)), 11);
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_access_panics() {
        let board = Board::new(4, 3);
        let _ = board.get(Pos::new(4, 0));
    }

    #[test]
    fn test_checked_pos() {
        let board = Board::new(4, 3);
        assert_eq!(board.checked_pos(3, 2), Ok(Pos::new(3, 2)));
        assert_eq!(
            board.checked_pos(-1, 0),
            Err(EngineError::InvalidCoordinate { x: -1, y: 0 })
        );
        assert!(board.checked_pos(0, 3).is_err());
    }

    #[test]
    fn test_parse_puts_last_line_at_bottom() {
        let board = Board::parse("ABC\nDEF").unwrap();
        assert_eq!(board.width(), 3);
        assert_eq!(board.height(), 2);
        assert_eq!(board.get(Pos::new(0, 1)), Tile::Colored(0));
        assert_eq!(board.get(Pos::new(0, 0)), Tile::Colored(3));
        assert_eq!(board.rows_top_down(), vec!["ABC", "DEF"]);
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        assert!(matches!(
            Board::parse("AB\nC"),
            Err(EngineError::InvalidLayout(_))
        ));
        assert!(Board::parse("A?").is_err());
        assert!(Board::parse("").is_err());
    }

    #[test]
    fn test_neighbors_probe_order_and_edges() {
        let board = Board::new(3, 3);
        let mid: Vec<Pos> = board.neighbors(Pos::new(1, 1)).into_iter().collect();
        assert_eq!(
            mid,
            vec![Pos::new(2, 1), Pos::new(0, 1), Pos::new(1, 2), Pos::new(1, 0)]
        );
        assert_eq!(board.neighbors(Pos::new(0, 0)).len(), 2);
    }

    #[test]
    fn test_collapse_column_preserves_order() {
        let mut board = Board::parse(
            "A\n\
             .\n\
             B\n\
             .\n\
             C",
        )
        .unwrap();

        let falls = board.collapse_column(0);
        assert_eq!(board.rows_top_down(), vec![".", ".", "A", "B", "C"]);
        assert_eq!(falls.len(), 2);
        assert_eq!(falls[0].from, Pos::new(0, 2));
        assert_eq!(falls[0].to, Pos::new(0, 1));
        assert_eq!(falls[1].tile, Tile::Colored(0));
        assert_eq!(falls[1].to, Pos::new(0, 2));
    }

    #[test]
    fn test_board_hash_tracks_contents() {
        let a = Board::parse("AB\nCD").unwrap();
        let mut b = a.clone();
        assert_eq!(a.board_hash(), b.board_hash());
        b.swap(Pos::new(0, 0), Pos::new(1, 0));
        assert_ne!(a.board_hash(), b.board_hash());
    }
}
