//! Character grid the puzzle screen is drawn into.
//!
//! Terminal rows count down from the top, so the board view flips board rows
//! before writing. Each board tile covers a block of cells
//! ([`FrameBuffer::fill_block`]); the side panel is a column of labelled
//! counters ([`FrameBuffer::put_counter`]).

/// 24-bit terminal colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    /// Panel and banner text
    pub const TEXT: Rgb = Rgb::new(220, 220, 220);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Colours and weight of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
    pub dim: bool,
}

impl CellStyle {
    pub const fn new(fg: Rgb, bg: Rgb) -> Self {
        Self {
            fg,
            bg,
            bold: false,
            dim: false,
        }
    }

    /// `fg` on the black screen background
    pub const fn text(fg: Rgb) -> Self {
        Self::new(fg, Rgb::BLACK)
    }

    pub const fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    pub const fn dim(self) -> Self {
        Self { dim: true, ..self }
    }
}

impl Default for CellStyle {
    fn default() -> Self {
        Self::text(Rgb::TEXT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Cell {
    pub const fn new(ch: char, style: CellStyle) -> Self {
        Self { ch, style }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(' ', CellStyle::default())
    }
}

/// Row-major grid of styled cells; writes outside the grid are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Match the terminal size, reusing the cell buffer
    pub fn resize(&mut self, width: u16, height: u16) {
        if (self.width, self.height) == (width, height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.cells
            .resize(width as usize * height as usize, Cell::default());
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    pub fn clear(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    pub fn put_char(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        self.set(x, y, Cell::new(ch, style));
    }

    /// Write `s` from `(x, y)`, clipped at the right edge
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: CellStyle) {
        for (ch, cx) in s.chars().zip(x..self.width) {
            self.put_char(cx, y, ch, style);
        }
    }

    /// Write `s` centred within `width` columns starting at `x`
    pub fn put_centered(&mut self, x: u16, width: u16, y: u16, s: &str, style: CellStyle) {
        let len = s.chars().count() as u16;
        let left = x.saturating_add(width.saturating_sub(len) / 2);
        self.put_str(left, y, s, style);
    }

    /// Write `v` in decimal, left-aligned at `(x, y)`, without allocating
    pub fn put_u32(&mut self, x: u16, y: u16, v: u32, style: CellStyle) {
        let mut digits = [0u8; 10];
        let mut n = v;
        let mut len = 0;
        loop {
            digits[len] = b'0' + (n % 10) as u8;
            len += 1;
            n /= 10;
            if n == 0 {
                break;
            }
        }
        for (i, d) in digits[..len].iter().rev().enumerate() {
            self.put_char(x.saturating_add(i as u16), y, *d as char, style);
        }
    }

    /// Side-panel entry: `label` on row `y`, `value` below it.
    ///
    /// Returns the row for the next entry, leaving one blank row between.
    pub fn put_counter(
        &mut self,
        x: u16,
        y: u16,
        label: &str,
        value: u32,
        label_style: CellStyle,
        value_style: CellStyle,
    ) -> u16 {
        self.put_str(x, y, label, label_style);
        self.put_u32(x, y.saturating_add(1), value, value_style);
        y.saturating_add(3)
    }

    /// Paint a `w` x `h` block with one glyph, as used for a board tile
    pub fn fill_block(&mut self, x: u16, y: u16, w: u16, h: u16, ch: char, style: CellStyle) {
        for dy in 0..h {
            for dx in 0..w {
                self.put_char(x.saturating_add(dx), y.saturating_add(dy), ch, style);
            }
        }
    }

    /// Text of row `y`, trailing blanks included
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(|c| c.ch)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_str_clips_at_edge() {
        let mut fb = FrameBuffer::new(4, 1);
        fb.put_str(2, 0, "abc", CellStyle::default());
        assert_eq!(fb.row_text(0), "  ab");
    }

    #[test]
    fn test_put_u32() {
        let mut fb = FrameBuffer::new(12, 2);
        fb.put_u32(0, 0, 0, CellStyle::default());
        fb.put_u32(0, 1, 4_294_967_295, CellStyle::default());
        assert_eq!(fb.row_text(0).trim_end(), "0");
        assert_eq!(fb.row_text(1).trim_end(), "4294967295");
    }

    #[test]
    fn test_counter_leaves_a_gap_row() {
        let mut fb = FrameBuffer::new(8, 6);
        let style = CellStyle::default();
        let next = fb.put_counter(0, 0, "MOVES", 30, style.bold(), style);
        fb.put_counter(0, next, "MADE", 4, style.bold(), style);
        assert_eq!(next, 3);
        assert_eq!(fb.row_text(1).trim_end(), "30");
        assert_eq!(fb.row_text(2).trim_end(), "");
        assert_eq!(fb.row_text(3).trim_end(), "MADE");
        assert!(fb.get(0, 0).is_some_and(|c| c.style.bold));
    }

    #[test]
    fn test_put_centered() {
        let mut fb = FrameBuffer::new(9, 1);
        fb.put_centered(1, 8, 0, "WIN", CellStyle::default());
        assert_eq!(fb.row_text(0), "   WIN   ");
    }

    #[test]
    fn test_fill_block_paints_a_tile() {
        let mut fb = FrameBuffer::new(4, 2);
        fb.fill_block(1, 0, 2, 1, '█', CellStyle::default().dim());
        assert_eq!(fb.row_text(0), " ██ ");
        assert!(fb.get(2, 0).is_some_and(|c| c.style.dim));
    }

    #[test]
    fn test_out_of_range_writes_are_ignored() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.put_char(5, 5, 'x', CellStyle::default());
        assert!(fb.cells().iter().all(|c| c.ch == ' '));
        assert_eq!(fb.get(5, 5), None);
    }

    #[test]
    fn test_resize_keeps_dimensions_consistent() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.resize(3, 4);
        assert_eq!(fb.cells().len(), 12);
        assert_eq!((fb.width(), fb.height()), (3, 4));
    }
}
