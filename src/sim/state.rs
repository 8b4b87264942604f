//! Ball state
//!
//! The ball is the only entity whose physics is simulated here. Everything it
//! collides with is reached through the contracts in `terrain` and `hazard`.

use glam::Vec2;

use crate::assets::BallSprites;
use crate::consts::BALL_HP;
use crate::tuning::BallTuning;

/// Stable identifier of an entity within a session
pub type EntityId = u32;

/// Index of the terrain in the session's entity list (non-owning)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainHandle(pub usize);

/// Control/motion state of a ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BallState {
    /// Settled: physics frozen, player may drag
    AtRest,
    /// Moving under physics; `can_move` once slow enough to be flung again
    InFlight { can_move: bool },
    /// Player is pulling back a launch from `start` (screen space).
    /// `resting` keeps physics frozen underneath the drag.
    Dragging { start: Vec2, resting: bool },
}

/// A ball entity
#[derive(Debug, Clone)]
pub struct Ball {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Last stable position; restored on reset and water
    pub prev_rest: Vec2,
    pub radius: f32,
    pub state: BallState,
    /// Seconds since the ball last moved more than the jitter threshold
    pub settle_timer: f32,
    /// Last terrain contact (debug overlay)
    pub contact_point: Option<Vec2>,
    /// Shared entity contract; physics never changes these
    pub hp: i32,
    pub max_hp: i32,
    pub invulnerable: bool,
    /// Bound lazily on the first frame that finds a terrain
    pub terrain: Option<TerrainHandle>,
    pub sprites: BallSprites,
    pub tuning: BallTuning,
}

impl Ball {
    pub fn new(id: EntityId, position: Vec2, velocity: Vec2, sprites: BallSprites) -> Self {
        Self::with_tuning(id, position, velocity, sprites, BallTuning::default())
    }

    pub fn with_tuning(
        id: EntityId,
        position: Vec2,
        velocity: Vec2,
        sprites: BallSprites,
        tuning: BallTuning,
    ) -> Self {
        Self {
            id,
            position,
            velocity,
            prev_rest: position,
            radius: tuning.radius,
            state: BallState::InFlight { can_move: false },
            settle_timer: 0.0,
            contact_point: None,
            hp: BALL_HP,
            max_hp: BALL_HP,
            invulnerable: true,
            terrain: None,
            sprites,
            tuning,
        }
    }

    pub fn is_at_rest(&self) -> bool {
        match self.state {
            BallState::AtRest => true,
            BallState::Dragging { resting, .. } => resting,
            BallState::InFlight { .. } => false,
        }
    }

    /// Whether the player may start a drag
    pub fn can_move(&self) -> bool {
        match self.state {
            BallState::AtRest | BallState::Dragging { .. } => true,
            BallState::InFlight { can_move } => can_move,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, BallState::Dragging { .. })
    }

    pub fn drag_start(&self) -> Option<Vec2> {
        match self.state {
            BallState::Dragging { start, .. } => Some(start),
            _ => None,
        }
    }

    /// Freeze physics (keeps an in-progress drag)
    pub(crate) fn settle(&mut self) {
        self.state = match self.state {
            BallState::Dragging { start, .. } => BallState::Dragging {
                start,
                resting: true,
            },
            _ => BallState::AtRest,
        };
    }

    /// Unfreeze physics; a settled ball stays controllable until it speeds up
    pub(crate) fn unsettle(&mut self) {
        self.state = match self.state {
            BallState::AtRest => BallState::InFlight { can_move: true },
            BallState::Dragging { start, .. } => BallState::Dragging {
                start,
                resting: false,
            },
            moving => moving,
        };
    }

    pub(crate) fn set_can_move(&mut self, value: bool) {
        if let BallState::InFlight { can_move } = &mut self.state {
            *can_move = value;
        }
    }

    pub(crate) fn restart_settle_timer(&mut self) {
        self.settle_timer = 0.0;
    }

    /// Clamp speed to the tuning maximum, keeping direction
    pub(crate) fn cap_speed(&mut self) {
        if self.velocity.length() > self.tuning.max_speed {
            self.velocity = crate::normalize(self.velocity) * self.tuning.max_speed;
        }
    }
}
