//! Collision response math
//!
//! Pure functions shared by the terrain, hazard and peer-ball paths in
//! [`super::tick`]. None of them touch entity state.

use glam::Vec2;

use super::terrain::Material;
use crate::tuning::BallTuning;
use crate::{dot, len, normalize};

/// Normal used when two balls sit exactly on top of each other (screen "up")
pub const PEER_FALLBACK_NORMAL: Vec2 = Vec2::NEG_Y;

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * normal * dot(velocity, normal)
}

/// Restitution factor for terrain of the given material
pub fn restitution_for(material: Option<Material>, tuning: &BallTuning) -> f32 {
    match material {
        Some(Material::Bouncy) => tuning.bouncy_restitution,
        Some(Material::Slow) => tuning.slow_restitution,
        Some(Material::Sticky) => tuning.sticky_restitution,
        _ => tuning.restitution,
    }
}

/// Velocity after bouncing off a surface with normal `normal` (any length)
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, factor: f32, tuning: &BallTuning) -> Vec2 {
    let impact_speed = len(velocity);
    let normal = normalize(normal);
    let reflect = reflect_velocity(velocity, normal);

    // Both bands currently resolve the same
    let mut bounce = Vec2::ZERO;
    if impact_speed > tuning.min_bounce_speed && impact_speed < tuning.hard_bounce_speed {
        // bounce a little
        bounce = reflect * factor;
    } else if impact_speed >= tuning.hard_bounce_speed {
        // bounce a lot
        bounce = reflect * factor;
    }

    // Grazing hit: nudge off the surface so the ball doesn't skim along it
    if dot(normal, normalize(reflect)) < tuning.grazing_dot {
        bounce += normal;
    }

    bounce
}

/// Whether two circles overlap
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    (a - b).length_squared() < (radius_a + radius_b) * (radius_a + radius_b)
}

/// Position and velocity of a ball after rebounding off a peer at `other`
pub fn peer_rebound(
    position: Vec2,
    velocity: Vec2,
    other: Vec2,
    tuning: &BallTuning,
) -> (Vec2, Vec2) {
    let impact_speed = len(velocity) + tuning.peer_impact_bias;
    let impact_direction = normalize(velocity);
    let position = position - velocity * tuning.peer_pushback;

    let normal = normalize(position - other);
    let normal = if normal == Vec2::ZERO {
        PEER_FALLBACK_NORMAL
    } else {
        normal
    };

    let reflect = reflect_velocity(impact_direction, normal);
    (position, reflect * impact_speed * tuning.peer_damping)
}
