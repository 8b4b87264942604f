//! Ballfling - a fling-the-ball physics core
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (ball motion, terrain/peer/hazard collisions, events)
//! - `tuning`: Data-driven ball behaviour constants
//! - `settings`: Session configuration (JSON)
//! - `assets`: Shared sprite cache

pub mod assets;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use assets::{AssetCache, AssetError, AssetId, BallSprites};
pub use settings::{ConfigError, Settings};
pub use tuning::BallTuning;

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Frames per second the simulation is stepped at
    pub const FRAME_RATE: f32 = 60.0;
    /// Fixed frame duration
    pub const FRAME_DT: f32 = 1.0 / FRAME_RATE;

    /// Window dimensions (camera centring)
    pub const WINDOW_WIDTH: f32 = 800.0;
    pub const WINDOW_HEIGHT: f32 = 600.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_HP: i32 = 10;
    /// Overall speed cap (units/frame)
    pub const BALL_MAX_SPEED: f32 = 16.0;
    /// Downward speed cap (units/frame)
    pub const BALL_TERM_VEL: f32 = 12.0;
    /// Launches are clamped to this minus 2
    pub const BALL_MAX_LAUNCH_SPEED: f32 = 14.0;
    /// Above this speed the player may not drag the ball
    pub const MIN_MOVE_SPEED: f32 = 0.5;

    /// World gravity per frame (screen space, +y is down)
    pub const GRAVITY_Y: f32 = 0.15;
    /// Camera easing factor per frame
    pub const CAMERA_FOLLOW: f32 = 0.05;
}

/// Length of a vector
#[inline]
pub fn len(v: Vec2) -> f32 {
    v.length()
}

/// Unit vector in the direction of `v`; the zero vector stays zero
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

#[inline]
pub fn dot(a: Vec2, b: Vec2) -> f32 {
    a.dot(b)
}

/// -1, 0 or 1
#[inline]
pub fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Clamp without panicking on an inverted range (`lo` wins)
#[inline]
pub fn clamp(x: f32, lo: f32, hi: f32) -> f32 {
    x.min(hi).max(lo)
}

/// Uniform random value in `[lo, hi)`; an empty range yields `lo`
pub fn rnd<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        return lo;
    }
    rng.random_range(lo..hi)
}
