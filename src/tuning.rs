//! Data-driven ball tuning
//!
//! Every constant the ball physics depends on, with defaults matching the
//! shipped game feel. Loaded as part of [`crate::Settings`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Ball behaviour constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallTuning {
    /// Collision radius
    pub radius: f32,
    /// Overall speed cap (units/frame)
    pub max_speed: f32,
    /// Downward (+y) speed cap
    pub terminal_velocity: f32,
    /// Launch speed cap is `max_launch_speed - 2`
    pub max_launch_speed: f32,
    /// Drag distance per unit of launch speed
    pub launch_divisor: f32,
    /// Speed above which the ball is not controllable
    pub min_move_speed: f32,
    /// Velocity multiplier applied every frame
    pub damping: f32,

    /// Per-frame displacement that restarts the settle timer
    pub jitter_threshold: f32,
    /// Seconds without significant motion before the ball settles
    pub rest_dwell_secs: f32,

    /// Restitution for Normal/Thin terrain and hazards
    pub restitution: f32,
    pub bouncy_restitution: f32,
    pub slow_restitution: f32,
    pub sticky_restitution: f32,

    /// Bounce bands: below `min_bounce_speed` a bounce yields no reflection
    pub min_bounce_speed: f32,
    /// Boundary between the "bounce a little" and "bounce a lot" bands
    pub hard_bounce_speed: f32,
    /// `dot(normal, reflect)` below this adds the normal (grazing correction)
    pub grazing_dot: f32,

    /// Thin terrain breaks above this impact speed
    pub break_speed: f32,
    /// Speed lost punching through thin terrain
    pub break_speed_loss: f32,

    /// Peer rebound: push back `peer_pushback * velocity`
    pub peer_pushback: f32,
    /// Peer rebound damping
    pub peer_damping: f32,
    /// Added to impact speed on peer rebound
    pub peer_impact_bias: f32,
    /// Hazard rebound: push back `hazard_pushback * velocity`
    pub hazard_pushback: f32,
}

impl Default for BallTuning {
    fn default() -> Self {
        Self {
            radius: BALL_RADIUS,
            max_speed: BALL_MAX_SPEED,
            terminal_velocity: BALL_TERM_VEL,
            max_launch_speed: BALL_MAX_LAUNCH_SPEED,
            launch_divisor: 15.0,
            min_move_speed: MIN_MOVE_SPEED,
            damping: 0.995,

            jitter_threshold: 1.5,
            rest_dwell_secs: 1.0,

            restitution: 0.6,
            bouncy_restitution: 1.2,
            slow_restitution: 0.3,
            sticky_restitution: 0.0,

            min_bounce_speed: 0.2,
            hard_bounce_speed: 3.1,
            grazing_dot: 0.3,

            break_speed: 9.0,
            break_speed_loss: 7.0,

            peer_pushback: 1.1,
            peer_damping: 0.6,
            peer_impact_bias: 0.1,
            hazard_pushback: 1.5,
        }
    }
}

impl BallTuning {
    /// Fastest launch a drag can produce
    pub fn launch_speed_cap(&self) -> f32 {
        self.max_launch_speed - 2.0
    }
}
