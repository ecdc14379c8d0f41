use fastrand::Rng;

use crate::paint::{Color, Fill, Paint, Point, Viewport};

/// A drifting dot in the background field.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Point,
    pub vel: Point,
    pub radius: f64,
    pub alpha: f64,
    pub color: Color,
}

impl Particle {
    pub fn spawn(rng: &mut Rng, bounds: Viewport) -> Self {
        Self {
            pos: Point::new(rng.f64() * bounds.width, rng.f64() * bounds.height),
            vel: Point::new((rng.f64() - 0.5) * 2.0, (rng.f64() - 0.5) * 2.0),
            radius: rng.f64() * 2.0 + 0.5,
            alpha: rng.f64() * 0.5 + 0.1,
            color: Color::Hsl(rng.f64() * 60.0 + 200.0, 70.0, 60.0),
        }
    }

    /// Advance one tick. A velocity component is negated when the step would
    /// carry the coordinate outward past `[0, bound]`, so particles stranded
    /// outside by a shrinking viewport still drift back in.
    ///
    /// Opacity twinkles with `wall_ms`, wall-clock milliseconds since the epoch.
    pub fn update(&mut self, bounds: Viewport, wall_ms: f64) {
        self.vel.x = reflect(self.pos.x, self.vel.x, bounds.width);
        self.vel.y = reflect(self.pos.y, self.vel.y, bounds.height);
        self.pos.x += self.vel.x;
        self.pos.y += self.vel.y;
        self.alpha = twinkle(wall_ms, self.pos.x);
    }

    pub fn paint(&self) -> Paint {
        Paint::Disc {
            center: self.pos,
            radius: self.radius,
            fill: Fill::Solid(self.color),
            alpha: self.alpha,
        }
    }
}

/// Opacity in `[0, 0.2]` for a particle at `x` at wall-clock time `wall_ms`.
pub fn twinkle(wall_ms: f64, x: f64) -> f64 {
    0.1 + (wall_ms * 0.001 + x * 0.01).sin() * 0.1
}

fn reflect(pos: f64, vel: f64, bound: f64) -> f64 {
    let next = pos + vel;
    if (next < 0.0 && vel < 0.0) || (next > bound && vel > 0.0) {
        -vel
    } else {
        vel
    }
}

#[derive(Debug)]
pub struct ParticleField {
    pub particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(rng: &mut Rng, count: usize, bounds: Viewport) -> Self {
        Self {
            particles: (0..count).map(|_| Particle::spawn(rng, bounds)).collect(),
        }
    }

    /// Update then emit every particle.
    pub fn step(&mut self, bounds: Viewport, wall_ms: f64, mut emit: impl FnMut(&Paint)) {
        for p in &mut self.particles {
            p.update(bounds, wall_ms);
            emit(&p.paint());
        }
    }
}
