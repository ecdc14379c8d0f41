use fastrand::Rng;

use crate::config::RainConfig;
use crate::paint::{Color, Fill, Paint, Point, Surface, Viewport};

const TRAIL_FADE: Color = Color::Rgba(15, 23, 42, 0.05);
const GLYPH_COLOR: Color = Color::Rgba(14, 165, 233, 1.0);
/// Chance per tick that a column past the bottom edge restarts at the top.
const RESTART_CHANCE: f64 = 0.025;

/// Falling glyph columns. Each entry in `drops` is the current row of one column.
pub struct MatrixRain {
    drops: Vec<u32>,
    font_px: f64,
    charset: Vec<char>,
    rng: Rng,
}

impl MatrixRain {
    /// The column count is fixed from `vp` and not recomputed on resize.
    pub fn new(cfg: &RainConfig, vp: Viewport, rng: Rng) -> Self {
        let columns = if cfg.font_px > 0.0 {
            (vp.width / cfg.font_px).floor().max(0.0) as usize
        } else {
            0
        };
        Self {
            drops: vec![1; columns],
            font_px: cfg.font_px,
            charset: cfg.charset.chars().collect(),
            rng,
        }
    }

    pub fn drops(&self) -> &[u32] {
        &self.drops
    }

    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let vp = surface.viewport();
        surface.paint(&Paint::Cover {
            fill: Fill::Solid(TRAIL_FADE),
            alpha: 1.0,
        });
        if self.charset.is_empty() {
            return;
        }
        for (col, row) in self.drops.iter_mut().enumerate() {
            let ch = self.charset[self.rng.usize(..self.charset.len())];
            let at = Point::new(col as f64 * self.font_px, *row as f64 * self.font_px);
            surface.paint(&Paint::Glyph {
                ch,
                at,
                font_px: self.font_px,
                color: GLYPH_COLOR,
            });
            *row = advance(*row, self.font_px, vp, self.rng.f64());
        }
    }
}

/// Next row for a column given a uniform sample `roll` in `[0, 1)`.
fn advance(row: u32, font_px: f64, vp: Viewport, roll: f64) -> u32 {
    let past_bottom = row as f64 * font_px > vp.height;
    let restart = past_bottom && roll > 1.0 - RESTART_CHANCE;
    let row = if restart { 0 } else { row };
    row.saturating_add(1)
}
