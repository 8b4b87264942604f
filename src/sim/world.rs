//! World context shared by every entity in a session

use glam::Vec2;

use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub gravity: Vec2,
    pub paused: bool,
    /// Top-left of the view in world space
    pub camera: Vec2,
    pub screen_size: Vec2,
    /// Fraction of the camera error closed per frame
    pub camera_follow: f32,
}

impl Default for World {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl World {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            gravity: settings.gravity,
            paused: false,
            camera: Vec2::ZERO,
            screen_size: settings.screen_size(),
            camera_follow: settings.camera_follow,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Ease the camera toward centring `target` (no-op while paused)
    pub fn follow(&mut self, target: Vec2) {
        if self.is_paused() {
            return;
        }
        let delta = (target - self.screen_size / 2.0) - self.camera;
        self.camera += delta * self.camera_follow;
    }
}
