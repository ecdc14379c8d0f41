//! Backend-neutral draw commands.
//!
//! Layers produce [`Paint`] values that carry their complete style (fill, stroke,
//! alpha, font). A [`Surface`] applies each command on its own, so nothing set for
//! one command leaks into the next.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Rgba(u8, u8, u8, f64),
    /// Hue in degrees, saturation and lightness in percent.
    Hsl(f64, f64, f64),
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Color::Rgba(r, g, b, a) => write!(f, "rgba({r}, {g}, {b}, {a})"),
            Color::Hsl(h, s, l) => write!(f, "hsl({h}, {s}%, {l}%)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Color,
}

pub const fn stop(offset: f64, color: Color) -> GradientStop {
    GradientStop { offset, color }
}

/// Radial gradient from radius 0 to `radius` around `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradient {
    pub center: Point,
    pub radius: f64,
    pub stops: &'static [GradientStop],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(Color),
    Radial(RadialGradient),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pixel dimensions of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    /// Erase the whole surface to transparent.
    Clear,
    /// Fill the whole surface.
    Cover { fill: Fill, alpha: f64 },
    Line {
        from: Point,
        to: Point,
        color: Color,
        width: f64,
    },
    Disc {
        center: Point,
        radius: f64,
        fill: Fill,
        alpha: f64,
    },
    /// A single character with its top-left baseline at `at`.
    Glyph {
        ch: char,
        at: Point,
        font_px: f64,
        color: Color,
    },
}

pub trait Surface {
    fn viewport(&self) -> Viewport;
    fn paint(&mut self, cmd: &Paint);
}

/// Surface that records commands instead of rasterising them.
#[derive(Debug, Default)]
pub struct Recorder {
    pub viewport: Viewport,
    pub commands: Vec<Paint>,
}

impl Recorder {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            commands: Vec::new(),
        }
    }
}

impl Surface for Recorder {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn paint(&mut self, cmd: &Paint) {
        self.commands.push(*cmd);
    }
}
