//! Full-page background: nebula glow, drifting grid, pulsing orbs and a particle
//! field, painted back to front every display frame.

use fastrand::Rng;

use crate::paint::{
    stop, Color, Fill, GradientStop, Paint, Point, RadialGradient, Surface, Viewport,
};
use crate::particles::ParticleField;

pub const GRID_CELL: f64 = 50.0;

static NEBULA_STOPS: [GradientStop; 4] = [
    stop(0.0, Color::Rgba(15, 23, 42, 0.8)),
    stop(0.3, Color::Rgba(30, 41, 59, 0.6)),
    stop(0.6, Color::Rgba(51, 65, 85, 0.4)),
    stop(1.0, Color::Rgba(15, 23, 42, 0.0)),
];

static ORB_STOPS: [GradientStop; 3] = [
    stop(0.0, Color::Rgba(59, 130, 246, 0.1)),
    stop(0.5, Color::Rgba(99, 102, 241, 0.05)),
    stop(1.0, Color::Rgba(15, 23, 42, 0.0)),
];

const GRID_COLOR: Color = Color::Rgba(100, 116, 139, 0.1);

/// (x fraction, y fraction, base radius, pulse speed)
const ORBS: [(f64, f64, f64, f64); 3] = [
    (0.2, 0.3, 200.0, 0.0003),
    (0.8, 0.6, 150.0, 0.0004),
    (0.4, 0.8, 180.0, 0.0005),
];

pub fn nebula(vp: Viewport, t: f64) -> Paint {
    let gradient = RadialGradient {
        center: Point::new(vp.width * 0.3, vp.height * 0.7),
        radius: vp.width * 0.8,
        stops: &NEBULA_STOPS,
    };
    Paint::Cover {
        fill: Fill::Radial(gradient),
        alpha: 0.3 + (t * 0.0005).sin() * 0.1,
    }
}

/// Vertical then horizontal lines, scrolled by a time-dependent offset.
pub fn grid(vp: Viewport, t: f64) -> Vec<Paint> {
    let offset_x = (t * 0.02) % GRID_CELL;
    let offset_y = (t * 0.01) % GRID_CELL;
    let line = |from, to| Paint::Line {
        from,
        to,
        color: GRID_COLOR,
        width: 0.5,
    };

    let mut out = Vec::new();
    let mut x = -offset_x;
    while x < vp.width {
        out.push(line(Point::new(x, 0.0), Point::new(x, vp.height)));
        x += GRID_CELL;
    }
    let mut y = -offset_y;
    while y < vp.height {
        out.push(line(Point::new(0.0, y), Point::new(vp.width, y)));
        y += GRID_CELL;
    }
    out
}

pub fn orbs(vp: Viewport, t: f64) -> [Paint; 3] {
    ORBS.map(|(fx, fy, size, speed)| {
        let center = Point::new(vp.width * fx, vp.height * fy);
        let radius = size * orb_pulse(t, speed);
        let gradient = RadialGradient {
            center,
            radius,
            stops: &ORB_STOPS,
        };
        Paint::Disc {
            center,
            radius,
            fill: Fill::Radial(gradient),
            alpha: 0.4,
        }
    })
}

/// Pulse factor in `[0.4, 1.0]`.
pub fn orb_pulse(t: f64, speed: f64) -> f64 {
    (t * speed).sin() * 0.3 + 0.7
}

pub struct CosmicScene {
    field: ParticleField,
}

impl CosmicScene {
    pub fn new(rng: &mut Rng, particle_count: usize, vp: Viewport) -> Self {
        Self {
            field: ParticleField::new(rng, particle_count, vp),
        }
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Paint one frame. `t` is the frame timestamp in milliseconds and drives
    /// the layers; `wall_ms` is wall-clock time and drives particle opacity.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S, t: f64, wall_ms: f64) {
        let vp = surface.viewport();
        surface.paint(&Paint::Clear);
        if vp.is_empty() {
            return;
        }
        surface.paint(&nebula(vp, t));
        for cmd in grid(vp, t) {
            surface.paint(&cmd);
        }
        for cmd in orbs(vp, t) {
            surface.paint(&cmd);
        }
        self.field.step(vp, wall_ms, |cmd| surface.paint(cmd));
    }
}
