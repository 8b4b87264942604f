//! Frame-stepped simulation module
//!
//! All gameplay logic lives here:
//! - One step per frame, motion in units per frame
//! - Stable iteration order (entity-list order)
//! - No rendering or platform dependencies
//! - Side effects leave through the event bus

pub mod collision;
pub mod events;
pub mod hazard;
pub mod input;
pub mod session;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod world;

pub use collision::{
    bounce_velocity, circles_overlap, peer_rebound, reflect_velocity, restitution_for,
};
pub use events::{EventBus, EventLog, GameEvent, Observer, SubscriptionId};
pub use hazard::{BoxHazard, Hazard};
pub use input::{InputEvent, Key, MouseButton};
pub use session::{Entity, Session};
pub use state::{Ball, BallState, EntityId, TerrainHandle};
pub use terrain::{Contact, GridTerrain, Material, Terrain};
pub use world::World;
