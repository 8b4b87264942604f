//! Hazard contract (destructible objects the ball can knock into)

use glam::Vec2;

/// What a ball needs from a hazard
pub trait Hazard {
    /// The ball touched this hazard
    fn touch(&mut self);

    fn intersects_with_circle(&self, point: Vec2, radius: f32) -> bool;

    /// Surface normal to bounce off, given the ball's position and velocity
    fn normal(&self, point: Vec2, velocity: Vec2) -> Vec2;
}

/// Axis-aligned box hazard (a crate of TNT)
#[derive(Debug, Clone, PartialEq)]
pub struct BoxHazard {
    pub min: Vec2,
    pub max: Vec2,
    /// Times a ball has touched it
    pub touches: u32,
}

impl BoxHazard {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
            touches: 0,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

impl Hazard for BoxHazard {
    fn touch(&mut self) {
        self.touches += 1;
        log::debug!("hazard at {:?} touched ({})", self.center(), self.touches);
    }

    fn intersects_with_circle(&self, point: Vec2, radius: f32) -> bool {
        (point - self.closest_point(point)).length_squared() < radius * radius
    }

    fn normal(&self, point: Vec2, velocity: Vec2) -> Vec2 {
        let away = point - self.closest_point(point);
        if away.length_squared() > 1e-8 {
            return away.normalize();
        }
        // Centre inside the box: send it back the way it came
        let back = -velocity.normalize_or_zero();
        if back == Vec2::ZERO {
            (point - self.center()).normalize_or(Vec2::NEG_Y)
        } else {
            back
        }
    }
}
