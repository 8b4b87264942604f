//! Session settings
//!
//! Persisted as JSON next to the game. Missing fields fall back to defaults so
//! older files keep loading.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::tuning::BallTuning;

/// Failure reading or writing a settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen / camera ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Fraction of the camera error closed each frame
    pub camera_follow: f32,

    // === World ===
    /// Gravity added to ball velocity every frame
    pub gravity: Vec2,
    /// Frames per second (drives the settle timer)
    pub frame_rate: f32,

    // === Ball ===
    pub ball: BallTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: WINDOW_WIDTH,
            screen_height: WINDOW_HEIGHT,
            camera_follow: CAMERA_FOLLOW,

            gravity: Vec2::new(0.0, GRAVITY_Y),
            frame_rate: FRAME_RATE,

            ball: BallTuning::default(),
        }
    }
}

impl Settings {
    /// Duration of one frame in seconds
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.frame_rate
    }

    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(ConfigError::Invalid {
                field: "frame_rate",
                reason: format!("must be positive, got {}", self.frame_rate),
            });
        }
        if !(self.ball.radius > 0.0) {
            return Err(ConfigError::Invalid {
                field: "ball.radius",
                reason: format!("must be positive, got {}", self.ball.radius),
            });
        }
        if !(self.ball.max_speed > 0.0) {
            return Err(ConfigError::Invalid {
                field: "ball.max_speed",
                reason: format!("must be positive, got {}", self.ball.max_speed),
            });
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("Using default settings");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
