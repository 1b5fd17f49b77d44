//! Cursor and selection state.
//!
//! Turns a stream of [`InputAction`]s into swap requests:
//!
//! - arrows move the cursor while nothing is selected
//! - `Select` picks up the tile under the cursor
//! - with a tile picked up, an arrow swaps it with its neighbour in that
//!   direction, and `Select` on an adjacent cell swaps with that cell
//! - `Cancel` drops the selection

use crate::map::{Direction, InputAction};
use crate::types::Pos;

/// A swap the player asked for; coordinates are raw so the engine validates them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapRequest {
    pub from: (i16, i16),
    pub to: (i16, i16),
}

impl SwapRequest {
    fn between(a: Pos, b: (i16, i16)) -> Self {
        Self {
            from: (a.x as i16, a.y as i16),
            to: b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorState {
    width: u8,
    height: u8,
    cursor: Pos,
    selected: Option<Pos>,
}

impl CursorState {
    /// Cursor starts in the middle of the board
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cursor: Pos::new(width / 2, height / 2),
            selected: None,
        }
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    pub fn selected(&self) -> Option<Pos> {
        self.selected
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.width, self.height);
    }

    /// Place the cursor directly, e.g. on a hint
    pub fn jump_to(&mut self, pos: Pos) {
        if pos.x < self.width && pos.y < self.height {
            self.cursor = pos;
        }
    }

    fn step(&self, from: Pos, dir: Direction) -> (i16, i16) {
        let (dx, dy) = dir.delta();
        (from.x as i16 + dx, from.y as i16 + dy)
    }

    fn clamp(&self, (x, y): (i16, i16)) -> Pos {
        Pos::new(
            x.clamp(0, self.width as i16 - 1) as u8,
            y.clamp(0, self.height as i16 - 1) as u8,
        )
    }

    /// Apply one action; returns a swap when the action completes one.
    ///
    /// Restart and Hint are not cursor actions and return `None`.
    pub fn apply(&mut self, action: InputAction) -> Option<SwapRequest> {
        match action {
            InputAction::Move(dir) => match self.selected.take() {
                Some(sel) => {
                    // Off-board targets still go to the engine, which rejects them
                    let target = self.step(sel, dir);
                    self.cursor = self.clamp(target);
                    Some(SwapRequest::between(sel, target))
                }
                None => {
                    self.cursor = self.clamp(self.step(self.cursor, dir));
                    None
                }
            },
            InputAction::Select => match self.selected {
                None => {
                    self.selected = Some(self.cursor);
                    None
                }
                Some(sel) if sel == self.cursor => {
                    self.selected = None;
                    None
                }
                Some(sel) if sel.is_adjacent(self.cursor) => {
                    self.selected = None;
                    Some(SwapRequest::between(
                        sel,
                        (self.cursor.x as i16, self.cursor.y as i16),
                    ))
                }
                Some(_) => {
                    self.selected = Some(self.cursor);
                    None
                }
            },
            InputAction::Cancel => {
                self.selected = None;
                None
            }
            InputAction::Hint | InputAction::Restart => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_moves_and_clamps() {
        let mut c = CursorState::new(4, 4);
        assert_eq!(c.cursor(), Pos::new(2, 2));
        for _ in 0..5 {
            assert_eq!(c.apply(InputAction::Move(Direction::Right)), None);
        }
        assert_eq!(c.cursor(), Pos::new(3, 2));
        c.apply(InputAction::Move(Direction::Down));
        assert_eq!(c.cursor(), Pos::new(3, 1));
    }

    #[test]
    fn test_select_then_arrow_requests_swap() {
        let mut c = CursorState::new(4, 4);
        c.apply(InputAction::Select);
        assert_eq!(c.selected(), Some(Pos::new(2, 2)));

        let req = c.apply(InputAction::Move(Direction::Up));
        assert_eq!(
            req,
            Some(SwapRequest {
                from: (2, 2),
                to: (2, 3)
            })
        );
        assert_eq!(c.selected(), None);
        assert_eq!(c.cursor(), Pos::new(2, 3));
    }

    #[test]
    fn test_arrow_off_board_is_forwarded() {
        let mut c = CursorState::new(2, 2);
        c.jump_to(Pos::new(0, 0));
        c.apply(InputAction::Select);
        let req = c.apply(InputAction::Move(Direction::Left)).unwrap();
        assert_eq!(req.to, (-1, 0));
        assert_eq!(c.cursor(), Pos::new(0, 0));
    }

    #[test]
    fn test_select_twice_toggles() {
        let mut c = CursorState::new(4, 4);
        c.apply(InputAction::Select);
        c.apply(InputAction::Select);
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn test_cancel_clears_selection() {
        let mut c = CursorState::new(4, 4);
        c.apply(InputAction::Select);
        c.apply(InputAction::Cancel);
        assert_eq!(c.selected(), None);
        assert_eq!(c.apply(InputAction::Move(Direction::Left)), None);
    }

    #[test]
    fn test_reset_restores_center() {
        let mut c = CursorState::new(8, 8);
        c.jump_to(Pos::new(0, 7));
        c.apply(InputAction::Select);
        c.reset();
        assert_eq!(c.cursor(), Pos::new(4, 4));
        assert_eq!(c.selected(), None);
    }
}
