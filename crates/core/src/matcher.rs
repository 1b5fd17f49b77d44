//! Match detection
//!
//! A run is three or more orthogonally consecutive `Colored` tiles of the same
//! colour in one row or column. `Empty`, `Blocker` and special tiles break runs.
//!
//! Every row is scanned left to right, then every column bottom to top. A cell
//! belonging to both a horizontal and a vertical run is reported once. Runs of
//! four or more also record where a special tile should appear after the
//! matched cells are cleared:
//!
//! | Run              | Special       | Offset from run start |
//! |------------------|---------------|-----------------------|
//! | 4 horizontal     | `LineColumn`  | 1                     |
//! | 4 vertical       | `LineRow`     | 1                     |
//! | 5+ either        | `Wildcard`    | `len / 2`             |

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::types::{ColorId, Pos, SpecialKind, MAX_BOARD_DIM, MIN_RUN_LEN};

type Line = ArrayVec<Pos, { MAX_BOARD_DIM as usize }>;

/// A maximal run of one colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub start: Pos,
    pub len: u8,
    pub horizontal: bool,
    pub color: ColorId,
}

impl Run {
    /// Cells covered by the run, from `start` outward
    pub fn cells(&self) -> impl Iterator<Item = Pos> {
        let Run {
            start, horizontal, ..
        } = *self;
        (0..self.len).map(move |i| {
            if horizontal {
                Pos::new(start.x + i, start.y)
            } else {
                Pos::new(start.x, start.y + i)
            }
        })
    }

    /// Special tile this run produces, if it is long enough
    pub fn special(&self) -> Option<SpecialSpawn> {
        let len = self.len as usize;
        let kind = SpecialKind::for_run(len, self.horizontal)?;
        let pos = self.cells().nth(SpecialKind::spawn_offset(len))?;
        Some(SpecialSpawn { pos, kind })
    }
}

/// A special tile to place once the round's destruction is done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialSpawn {
    pub pos: Pos,
    pub kind: SpecialKind,
}

/// Result of a full-board scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    runs: Vec<Run>,
    /// Deduplicated, column by column, bottom to top
    cells: Vec<Pos>,
    spawns: Vec<SpecialSpawn>,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn cells(&self) -> &[Pos] {
        &self.cells
    }

    /// Special spawns in scan order; a later spawn on the same cell wins
    pub fn spawns(&self) -> &[SpecialSpawn] {
        &self.spawns
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.cells.contains(&pos)
    }

    pub fn into_parts(self) -> (Vec<Pos>, Vec<SpecialSpawn>) {
        (self.cells, self.spawns)
    }
}

fn scan_line(board: &Board, line: &Line, horizontal: bool, out: &mut Vec<Run>) {
    let mut i = 0;
    while i + MIN_RUN_LEN <= line.len() {
        let Some(color) = board.get(line[i]).color() else {
            i += 1;
            continue;
        };

        let mut len = 1;
        while i + len < line.len() && board.get(line[i + len]).color() == Some(color) {
            len += 1;
        }

        if len >= MIN_RUN_LEN {
            out.push(Run {
                start: line[i],
                len: len as u8,
                horizontal,
                color,
            });
        }
        i += len;
    }
}

/// All maximal runs: rows first, then columns
pub fn find_runs(board: &Board) -> Vec<Run> {
    let mut runs = Vec::new();
    for y in 0..board.height() {
        scan_line(board, &board.row(y), true, &mut runs);
    }
    for x in 0..board.width() {
        scan_line(board, &board.column(x), false, &mut runs);
    }
    runs
}

/// Scan the whole board for runs
pub fn scan(board: &Board) -> MatchResult {
    let runs = find_runs(board);
    if runs.is_empty() {
        return MatchResult::default();
    }

    let width = board.width() as usize;
    let mut marked = vec![false; width * board.height() as usize];
    for run in &runs {
        for p in run.cells() {
            marked[p.y as usize * width + p.x as usize] = true;
        }
    }

    let cells = board
        .positions()
        .filter(|p| marked[p.y as usize * width + p.x as usize])
        .collect();
    let spawns = runs.iter().filter_map(Run::special).collect();

    MatchResult {
        runs,
        cells,
        spawns,
    }
}

/// Whether any run exists on the board
pub fn has_run(board: &Board) -> bool {
    !find_runs(board).is_empty()
}

/// Whether `pos` belongs to a horizontal or vertical run
pub fn run_through(board: &Board, pos: Pos) -> bool {
    let Some(color) = board.get(pos).color() else {
        return false;
    };
    let same = |dx: i16, dy: i16| board.get_offset(pos, dx, dy).and_then(|t| t.color()) == Some(color);

    let extent = |dx: i16, dy: i16| {
        let mut n = 0i16;
        while same(dx * (n + 1), dy * (n + 1)) {
            n += 1;
        }
        n as usize
    };

    let horizontal = 1 + extent(1, 0) + extent(-1, 0);
    let vertical = 1 + extent(0, 1) + extent(0, -1);
    horizontal >= MIN_RUN_LEN || vertical >= MIN_RUN_LEN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tile;

    #[test]
    fn test_no_runs_on_checkerboard() {
        let board = Board::parse(
            "ABAB\n\
             BABA\n\
             ABAB",
        )
        .unwrap();
        assert!(scan(&board).is_empty());
        assert!(!has_run(&board));
    }

    #[test]
    fn test_run_of_three_has_no_special() {
        let board = Board::parse("AAAB").unwrap();
        let result = scan(&board);
        assert_eq!(result.cells(), &[Pos::new(0, 0), Pos::new(1, 0), Pos::new(2, 0)]);
        assert!(result.spawns().is_empty());
    }

    #[test]
    fn test_horizontal_four_spawns_line_column_at_offset_one() {
        let board = Board::parse("BAAAA").unwrap();
        let result = scan(&board);
        assert_eq!(result.runs().len(), 1);
        assert_eq!(
            result.spawns(),
            &[SpecialSpawn {
                pos: Pos::new(2, 0),
                kind: SpecialKind::LineColumn
            }]
        );
    }

    #[test]
    fn test_vertical_four_spawns_line_row() {
        let board = Board::parse("A\nA\nA\nA\nB").unwrap();
        let result = scan(&board);
        assert_eq!(
            result.spawns(),
            &[SpecialSpawn {
                pos: Pos::new(0, 2),
                kind: SpecialKind::LineRow
            }]
        );
    }

    #[test]
    fn test_long_runs_spawn_wildcard_in_middle() {
        let five = scan(&Board::parse("AAAAA").unwrap());
        assert_eq!(five.spawns()[0].pos, Pos::new(2, 0));
        assert_eq!(five.spawns()[0].kind, SpecialKind::Wildcard);

        let seven = scan(&Board::parse("CAAAAAAA").unwrap());
        assert_eq!(seven.spawns()[0].pos, Pos::new(4, 0));
    }

    #[test]
    fn test_cross_cells_are_deduplicated() {
        let board = Board::parse(
            ".A.\n\
             AAA\n\
             .A.",
        )
        .unwrap();
        let result = scan(&board);
        assert_eq!(result.runs().len(), 2);
        assert_eq!(result.cells().len(), 5);
        // column-major order
        assert_eq!(result.cells()[0], Pos::new(0, 1));
        assert_eq!(result.cells()[1], Pos::new(1, 0));
    }

    #[test]
    fn test_blockers_and_specials_break_runs() {
        assert!(scan(&Board::parse("AA#A").unwrap()).is_empty());
        assert!(scan(&Board::parse("AA*AA").unwrap()).is_empty());
        assert!(scan(&Board::parse("A.AA").unwrap()).is_empty());
    }

    #[test]
    fn test_run_through() {
        let board = Board::parse(
            "B..\n\
             BAA\n\
             BCA",
        )
        .unwrap();
        assert!(run_through(&board, Pos::new(0, 0)));
        assert!(run_through(&board, Pos::new(0, 2)));
        assert!(!run_through(&board, Pos::new(1, 1)));
        assert!(!run_through(&board, Pos::new(2, 2)));
    }

    #[test]
    fn test_run_through_ignores_non_colored() {
        let mut board = Board::parse("AAA").unwrap();
        board.set(Pos::new(1, 0), Tile::Wildcard);
        assert!(!run_through(&board, Pos::new(1, 0)));
        assert!(!run_through(&board, Pos::new(0, 0)));
    }
}
