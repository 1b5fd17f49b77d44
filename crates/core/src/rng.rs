//! RNG module - seeded colour generation
//!
//! Every random decision in a session (initial population and refill) flows
//! through one [`TileGenerator`], so a seed fully determines a session.
//!
//! The underlying [`SimpleRng`] is a plain LCG. Tests can swap in a scripted
//! colour sequence with [`TileGenerator::scripted`].

use crate::board::Board;
use crate::types::{ColorId, Pos, Tile};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // Low LCG bits cycle quickly; take the high half.
        (self.next_u32() >> 16) % max.max(1)
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

#[derive(Debug, Clone)]
enum ColorSource {
    Seeded(SimpleRng),
    /// Fixed sequence, repeated from the start once exhausted
    Scripted { colors: Vec<ColorId>, cursor: usize },
}

/// Colour source for population and refill
#[derive(Debug, Clone)]
pub struct TileGenerator {
    source: ColorSource,
    palette_size: u8,
}

impl TileGenerator {
    /// Uniform colours in `0..palette_size` from a seeded LCG
    pub fn seeded(seed: u32, palette_size: u8) -> Self {
        Self {
            source: ColorSource::Seeded(SimpleRng::new(seed)),
            palette_size: palette_size.max(1),
        }
    }

    /// Replay `colors` in order, wrapping around at the end.
    ///
    /// Colours are reduced modulo `palette_size`. An empty script yields colour 0.
    pub fn scripted(colors: Vec<ColorId>, palette_size: u8) -> Self {
        let palette_size = palette_size.max(1);
        let colors = if colors.is_empty() {
            vec![0]
        } else {
            colors.into_iter().map(|c| c % palette_size).collect()
        };
        Self {
            source: ColorSource::Scripted { colors, cursor: 0 },
            palette_size,
        }
    }

    pub fn palette_size(&self) -> u8 {
        self.palette_size
    }

    /// Draw the next colour
    pub fn next_color(&mut self) -> ColorId {
        match &mut self.source {
            ColorSource::Seeded(rng) => rng.next_range(self.palette_size as u32) as ColorId,
            ColorSource::Scripted { colors, cursor } => {
                let c = colors[*cursor % colors.len()];
                *cursor = (*cursor + 1) % colors.len();
                c
            }
        }
    }

    /// Draw a colour for `pos` that does not complete a run with the two cells
    /// to its left or the two cells below it.
    ///
    /// Gives up after `retries` draws and returns one more unconstrained draw,
    /// so population always terminates.
    pub fn next_non_matching(&mut self, board: &Board, pos: Pos, retries: u32) -> ColorId {
        for _ in 0..retries {
            let color = self.next_color();
            if !completes_run(board, pos, color) {
                return color;
            }
        }
        self.next_color()
    }
}

/// Whether placing `color` at `pos` would extend two same-coloured cells to
/// the left or below into a run of three.
pub fn completes_run(board: &Board, pos: Pos, color: ColorId) -> bool {
    let same = |dx: i16, dy: i16| board.get_offset(pos, dx, dy) == Some(Tile::Colored(color));
    (same(-1, 0) && same(-2, 0)) || (same(0, -1) && same(0, -2))
}
