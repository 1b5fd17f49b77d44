use tracing::debug;

use crate::core::{swap, Board, CascadeEngine, CascadeReport, EventSink, SwapOutcome};
use crate::types::{Pos, ResolutionPath, SessionOutcome};

/// A swap the engine would accept, with its predicted result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapHint {
    pub from: Pos,
    pub to: Pos,
    pub path: ResolutionPath,
    pub report: CascadeReport,
}

/// Every unordered pair of orthogonal neighbours, column by column
pub fn candidate_pairs(board: &Board) -> Vec<(Pos, Pos)> {
    let mut pairs = Vec::new();
    for a in board.positions() {
        if a.x + 1 < board.width() {
            pairs.push((a, Pos::new(a.x + 1, a.y)));
        }
        if a.y + 1 < board.height() {
            pairs.push((a, Pos::new(a.x, a.y + 1)));
        }
    }
    pairs
}

/// Whether any swap on `board` would be accepted
pub fn has_valid_swap(board: &Board) -> bool {
    let mut scratch = board.clone();
    candidate_pairs(board)
        .into_iter()
        .any(|(a, b)| swap::attempt_swap(&mut scratch, a, b).is_ok())
}

/// Simulate every candidate swap on a fork of `engine`.
///
/// Each fork carries the session's colour source, so the reported cascade is
/// exactly what the real swap would produce next.
pub fn find_swaps<S: EventSink>(engine: &CascadeEngine<S>) -> Vec<SwapHint> {
    if engine.outcome() != SessionOutcome::Playing || engine.moves_remaining() == 0 {
        return Vec::new();
    }

    let hints: Vec<SwapHint> = candidate_pairs(engine.board())
        .into_iter()
        .filter(|&(a, b)| swap::precheck(engine.board(), a, b).is_ok())
        .filter_map(|(from, to)| match engine.fork().swap(from, to) {
            Ok(SwapOutcome::Resolved { path, report }) => Some(SwapHint {
                from,
                to,
                path,
                report,
            }),
            _ => None,
        })
        .collect();

    debug!(candidates = hints.len(), "hint search finished");
    hints
}

/// Swap that destroys the most blockers, then the most tiles.
///
/// Ties go to the earliest candidate.
pub fn best_swap<S: EventSink>(engine: &CascadeEngine<S>) -> Option<SwapHint> {
    let mut best: Option<SwapHint> = None;
    for hint in find_swaps(engine) {
        let key = (hint.report.blockers_destroyed, hint.report.tiles_destroyed);
        let better = match &best {
            Some(b) => key > (b.report.blockers_destroyed, b.report.tiles_destroyed),
            None => true,
        };
        if better {
            best = Some(hint);
        }
    }
    best
}
