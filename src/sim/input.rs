//! Raw input events the ball reacts to
//!
//! Device polling lives with the platform; the simulation only sees these.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// One input event, positions in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyPressed(Key),
    MousePressed { button: MouseButton, position: Vec2 },
    MouseReleased { button: MouseButton, position: Vec2 },
}

impl InputEvent {
    pub fn left_press(x: f32, y: f32) -> Self {
        InputEvent::MousePressed {
            button: MouseButton::Left,
            position: Vec2::new(x, y),
        }
    }

    pub fn left_release(x: f32, y: f32) -> Self {
        InputEvent::MouseReleased {
            button: MouseButton::Left,
            position: Vec2::new(x, y),
        }
    }

    pub fn space() -> Self {
        InputEvent::KeyPressed(Key::Space)
    }
}
