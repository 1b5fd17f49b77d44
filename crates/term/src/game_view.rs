//! GameView: maps a `SessionSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). Board row `y = 0` is drawn at the bottom of
//! the frame.

use crate::core::SessionSnapshot;
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{Pos, SessionOutcome, Tile};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Interaction state drawn over the board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overlay<'a> {
    pub cursor: Option<Pos>,
    pub selected: Option<Pos>,
    pub hint: Option<(Pos, Pos)>,
    /// One-line status under the side panel
    pub status: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// A lightweight terminal renderer for the puzzle board.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const CURSOR_BG: Rgb = Rgb::new(70, 70, 90);
const SELECTED_BG: Rgb = Rgb::new(120, 100, 40);
const HINT_BG: Rgb = Rgb::new(40, 80, 60);

const PALETTE: [Rgb; 8] = [
    Rgb::new(220, 80, 80),
    Rgb::new(80, 120, 220),
    Rgb::new(100, 220, 120),
    Rgb::new(240, 220, 80),
    Rgb::new(200, 120, 220),
    Rgb::new(80, 220, 220),
    Rgb::new(255, 165, 0),
    Rgb::new(230, 230, 230),
];

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Board frame size in terminal cells, border included
    pub fn frame_size(&self, snap: &SessionSnapshot) -> (u16, u16) {
        (
            snap.width as u16 * self.cell_w + 2,
            snap.height as u16 * self.cell_h + 2,
        )
    }

    /// Render into an existing framebuffer, resizing it to `viewport`.
    pub fn render_into(
        &self,
        snap: &SessionSnapshot,
        overlay: &Overlay<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let (frame_w, frame_h) = self.frame_size(snap);
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };

        let border = CellStyle::text(Rgb::new(200, 200, 200));
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        for y in 0..snap.height {
            for x in 0..snap.width {
                let pos = Pos::new(x, y);
                let bg = if overlay.selected == Some(pos) {
                    SELECTED_BG
                } else if overlay.cursor == Some(pos) {
                    CURSOR_BG
                } else if overlay.hint.is_some_and(|(a, b)| a == pos || b == pos) {
                    HINT_BG
                } else {
                    BOARD_BG
                };
                self.draw_tile(fb, start_x, start_y, snap, pos, bg);
            }
        }

        self.draw_side_panel(fb, snap, overlay, viewport, start_x, start_y, frame_w);

        match snap.outcome {
            SessionOutcome::Cleared => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "CLEARED")
            }
            SessionOutcome::Failed => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "FAILED")
            }
            SessionOutcome::Playing => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &SessionSnapshot,
        overlay: &Overlay<'_>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, overlay, viewport, &mut fb);
        fb
    }

    /// Terminal cell of the top-left corner of board cell `pos`
    pub fn cell_origin(&self, snap: &SessionSnapshot, start: (u16, u16), pos: Pos) -> (u16, u16) {
        let row = (snap.height - 1 - pos.y) as u16;
        (
            start.0 + 1 + pos.x as u16 * self.cell_w,
            start.1 + 1 + row * self.cell_h,
        )
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_tile(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        snap: &SessionSnapshot,
        pos: Pos,
        bg: Rgb,
    ) {
        let (glyph, fg, bold) = tile_glyph(snap.tile(pos));
        let style = CellStyle {
            fg,
            bg,
            bold,
            dim: snap.tile(pos).is_empty(),
        };
        let (px, py) = self.cell_origin(snap, (start_x, start_y), pos);
        fb.fill_block(px, py, self.cell_w, self.cell_h, glyph, style);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        overlay: &Overlay<'_>,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 10 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::text(Rgb::new(200, 200, 200));

        let mut y = start_y;
        for (name, v) in [
            ("MOVES", snap.moves_remaining),
            ("BLOCKERS", snap.blockers_remaining),
            ("MADE", snap.moves_made),
        ] {
            y = fb.put_counter(panel_x, y, name, v, label, value);
        }
        y = fb.put_counter(panel_x, y, "SEED", snap.seed, label, value.dim());

        if let Some(status) = overlay.status {
            fb.put_str(panel_x, y, status, value);
        }
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        fb.put_centered(start_x, frame_w, mid_y, text, CellStyle::text(Rgb::WHITE).bold());
    }
}

/// Glyph, colour and weight for a tile
fn tile_glyph(tile: Tile) -> (char, Rgb, bool) {
    match tile {
        Tile::Empty => ('·', Rgb::new(90, 90, 100), false),
        Tile::Colored(c) => ('█', PALETTE[c as usize % PALETTE.len()], false),
        Tile::Blocker => ('▒', Rgb::new(150, 140, 130), false),
        Tile::LineRow => ('═', Rgb::WHITE, true),
        Tile::LineColumn => ('║', Rgb::WHITE, true),
        Tile::Wildcard => ('✦', Rgb::new(255, 215, 0), true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Board;

    fn snapshot(layout: &str) -> SessionSnapshot {
        let mut snap = SessionSnapshot {
            moves_remaining: 12,
            blockers_remaining: 3,
            ..Default::default()
        };
        snap.copy_board(&Board::parse(layout).unwrap());
        snap
    }

    #[test]
    fn test_frame_size_includes_border() {
        let view = GameView::default();
        assert_eq!(view.frame_size(&snapshot("AB\nCD\nEF")), (6, 5));
    }

    #[test]
    fn test_bottom_row_drawn_last() {
        let view = GameView::default().with_anchor_y(AnchorY::Top);
        let snap = snapshot("A-\n#*");
        let fb = view.render(&snap, &Overlay::default(), Viewport::new(6, 4));

        assert_eq!(fb.row_text(0), "┌────┐");
        assert_eq!(fb.row_text(1), "│██══│");
        assert_eq!(fb.row_text(2), "│▒▒✦✦│");
        assert_eq!(fb.row_text(3), "└────┘");
    }

    #[test]
    fn test_cursor_and_selection_change_background() {
        let view = GameView::default().with_anchor_y(AnchorY::Top);
        let snap = snapshot("AB\nCD");
        let overlay = Overlay {
            cursor: Some(Pos::new(0, 0)),
            selected: Some(Pos::new(1, 1)),
            ..Default::default()
        };
        let fb = view.render(&snap, &overlay, Viewport::new(6, 4));
        // (0, 0) is the bottom-left board cell
        assert_eq!(fb.get(1, 2).map(|c| c.style.bg), Some(CURSOR_BG));
        assert_eq!(fb.get(3, 1).map(|c| c.style.bg), Some(SELECTED_BG));
        assert_eq!(fb.get(3, 2).map(|c| c.style.bg), Some(BOARD_BG));
    }
}
