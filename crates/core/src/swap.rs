//! Swap resolution
//!
//! Decides what an attempted swap of two adjacent tiles does, in priority order:
//!
//! 1. **Line activation** - either tile is a line tile
//! 2. **Wildcard activation** - either tile is a wildcard
//! 3. **Match** - the swap creates a run through either endpoint
//!
//! The board is left swapped when a plan is returned and restored when the swap
//! is rejected. Turning a plan into destruction is the cascade's job.
//! Session-level checks (outcome, move budget, coordinate bounds) happen before
//! this module is reached.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::matcher::{self, MatchResult};
use crate::types::{ColorId, LineOrientation, Pos, ResolutionPath, SwapRejection, Tile};

/// What an accepted swap will destroy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapPlan {
    Line {
        /// Cell the line clears pass through
        target: Pos,
        /// Distinct orientations to clear, in endpoint order
        orientations: ArrayVec<LineOrientation, 2>,
        /// Post-swap cells of the line tiles being used up
        consumed: ArrayVec<Pos, 2>,
    },
    Wildcard {
        /// Post-swap cells of the wildcards being used up
        wildcards: ArrayVec<Pos, 2>,
        /// Colour to clear; `None` for wildcard on wildcard
        color: Option<ColorId>,
    },
    Match(MatchResult),
}

impl SwapPlan {
    pub fn path(&self) -> ResolutionPath {
        match self {
            SwapPlan::Line { .. } => ResolutionPath::LineActivation,
            SwapPlan::Wildcard { .. } => ResolutionPath::WildcardActivation,
            SwapPlan::Match(_) => ResolutionPath::Match,
        }
    }
}

/// Check the board-level swap preconditions without touching the board
pub fn precheck(board: &Board, a: Pos, b: Pos) -> Result<(), SwapRejection> {
    if !a.is_adjacent(b) {
        return Err(SwapRejection::NotAdjacent);
    }
    let (ta, tb) = (board.get(a), board.get(b));
    if ta.is_blocker() || tb.is_blocker() {
        return Err(SwapRejection::BlockerEndpoint);
    }
    if ta.is_empty() || tb.is_empty() {
        return Err(SwapRejection::EmptyEndpoint);
    }
    Ok(())
}

/// Swap `a` and `b` and decide the resolution path.
///
/// On `Err` the board is unchanged.
pub fn attempt_swap(board: &mut Board, a: Pos, b: Pos) -> Result<SwapPlan, SwapRejection> {
    precheck(board, a, b)?;

    let (ta, tb) = (board.get(a), board.get(b));
    board.swap(a, b);
    // `ta` now sits at `b`, `tb` at `a`.

    if ta.line_orientation().is_some() || tb.line_orientation().is_some() {
        let target = if ta.line_orientation().is_some() { b } else { a };
        let mut orientations = ArrayVec::new();
        let mut consumed = ArrayVec::new();
        for (tile, at) in [(ta, b), (tb, a)] {
            if let Some(o) = tile.line_orientation() {
                consumed.push(at);
                if !orientations.contains(&o) {
                    orientations.push(o);
                }
            }
        }
        return Ok(SwapPlan::Line {
            target,
            orientations,
            consumed,
        });
    }

    if ta == Tile::Wildcard || tb == Tile::Wildcard {
        let mut wildcards = ArrayVec::new();
        let mut color = None;
        for (tile, at) in [(ta, b), (tb, a)] {
            if tile == Tile::Wildcard {
                wildcards.push(at);
            } else {
                color = tile.color();
            }
        }
        return Ok(SwapPlan::Wildcard { wildcards, color });
    }

    if matcher::run_through(board, a) || matcher::run_through(board, b) {
        return Ok(SwapPlan::Match(matcher::scan(board)));
    }

    board.swap(a, b);
    Err(SwapRejection::NoMatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_adjacent() {
        let mut board = Board::parse("ABAB").unwrap();
        assert_eq!(
            attempt_swap(&mut board, Pos::new(0, 0), Pos::new(2, 0)),
            Err(SwapRejection::NotAdjacent)
        );
        assert_eq!(
            attempt_swap(&mut board, Pos::new(0, 0), Pos::new(0, 0)),
            Err(SwapRejection::NotAdjacent)
        );
    }

    #[test]
    fn test_rejects_blocker_and_empty_endpoints() {
        let mut board = Board::parse("A#.").unwrap();
        assert_eq!(
            attempt_swap(&mut board, Pos::new(0, 0), Pos::new(1, 0)),
            Err(SwapRejection::BlockerEndpoint)
        );
        assert_eq!(
            attempt_swap(&mut board, Pos::new(1, 0), Pos::new(2, 0)),
            Err(SwapRejection::BlockerEndpoint)
        );
        let mut board = Board::parse("A.").unwrap();
        assert_eq!(
            attempt_swap(&mut board, Pos::new(0, 0), Pos::new(1, 0)),
            Err(SwapRejection::EmptyEndpoint)
        );
    }

    #[test]
    fn test_no_match_restores_board() {
        let mut board = Board::parse(
            "AB\n\
             CD",
        )
        .unwrap();
        let before = board.clone();
        assert_eq!(
            attempt_swap(&mut board, Pos::new(0, 0), Pos::new(1, 0)),
            Err(SwapRejection::NoMatch)
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_match_path_keeps_swap() {
        let mut board = Board::parse(
            "AABA\n\
             CDAC",
        )
        .unwrap();
        let plan = attempt_swap(&mut board, Pos::new(2, 1), Pos::new(2, 0)).unwrap();
        assert_eq!(plan.path(), ResolutionPath::Match);
        assert_eq!(board.rows_top_down(), vec!["AAAA", "CDBC"]);
        match plan {
            SwapPlan::Match(result) => assert_eq!(result.cells().len(), 4),
            other => panic!("unexpected plan {:?}", other),
        }
    }

    #[test]
    fn test_line_target_follows_line_tile() {
        let mut board = Board::parse("-A").unwrap();
        let plan = attempt_swap(&mut board, Pos::new(0, 0), Pos::new(1, 0)).unwrap();
        match plan {
            SwapPlan::Line {
                target,
                orientations,
                consumed,
            } => {
                assert_eq!(target, Pos::new(1, 0));
                assert_eq!(orientations.as_slice(), &[LineOrientation::Row]);
                assert_eq!(consumed.as_slice(), &[Pos::new(1, 0)]);
            }
            other => panic!("unexpected plan {:?}", other),
        }
    }

    #[test]
    fn test_line_on_line_uses_both_orientations() {
        let mut board = Board::parse("A|\nB-").unwrap();
        let plan = attempt_swap(&mut board, Pos::new(1, 1), Pos::new(1, 0)).unwrap();
        match plan {
            SwapPlan::Line {
                target,
                orientations,
                consumed,
            } => {
                // first endpoint was a line, so the target is where it landed
                assert_eq!(target, Pos::new(1, 0));
                assert_eq!(
                    orientations.as_slice(),
                    &[LineOrientation::Column, LineOrientation::Row]
                );
                assert_eq!(consumed.len(), 2);
            }
            other => panic!("unexpected plan {:?}", other),
        }
    }

    #[test]
    fn test_line_beats_wildcard() {
        let mut board = Board::parse("*|").unwrap();
        let plan = attempt_swap(&mut board, Pos::new(0, 0), Pos::new(1, 0)).unwrap();
        assert_eq!(plan.path(), ResolutionPath::LineActivation);
    }

    #[test]
    fn test_wildcard_takes_partner_color() {
        let mut board = Board::parse("*C").unwrap();
        let plan = attempt_swap(&mut board, Pos::new(1, 0), Pos::new(0, 0)).unwrap();
        assert_eq!(
            plan,
            SwapPlan::Wildcard {
                wildcards: [Pos::new(1, 0)].into_iter().collect(),
                color: Some(2),
            }
        );
    }

    #[test]
    fn test_double_wildcard_has_no_color() {
        let mut board = Board::parse("**").unwrap();
        let plan = attempt_swap(&mut board, Pos::new(0, 0), Pos::new(1, 0)).unwrap();
        match plan {
            SwapPlan::Wildcard { wildcards, color } => {
                assert_eq!(wildcards.len(), 2);
                assert_eq!(color, None);
            }
            other => panic!("unexpected plan {:?}", other),
        }
    }
}
