//! Session: the entity list, world context and event bus for one level
//!
//! Balls are shared (`Rc<RefCell<_>>`) so they can sit in the entity list,
//! listen on the bus and be stepped against the rest of the list at once.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use super::events::{EventBus, GameEvent, SubscriptionId};
use super::hazard::Hazard;
use super::input::InputEvent;
use super::state::{Ball, EntityId};
use super::terrain::Terrain;
use super::world::World;
use crate::assets::BallSprites;
use crate::settings::Settings;

/// Everything a ball can meet during its step
pub enum Entity {
    Terrain(Box<dyn Terrain>),
    Ball(Rc<RefCell<Ball>>),
    Hazard(Box<dyn Hazard>),
}

impl Entity {
    pub fn as_ball(&self) -> Option<&Rc<RefCell<Ball>>> {
        match self {
            Entity::Ball(ball) => Some(ball),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Terrain(_) => "terrain",
            Entity::Ball(_) => "ball",
            Entity::Hazard(_) => "hazard",
        }
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::Ball(ball) => match ball.try_borrow() {
                Ok(ball) => write!(f, "Ball({} @ {:?})", ball.id, ball.position),
                Err(_) => f.write_str("Ball(<stepping>)"),
            },
            other => f.write_str(other.kind()),
        }
    }
}

pub struct Session {
    pub world: World,
    settings: Settings,
    sprites: BallSprites,
    bus: EventBus,
    entities: Vec<Entity>,
    subscriptions: Vec<(EntityId, SubscriptionId)>,
    next_id: EntityId,
    frame: u64,
}

impl Session {
    pub fn new(settings: Settings, sprites: BallSprites) -> Self {
        Self {
            world: World::from_settings(&settings),
            settings,
            sprites,
            bus: EventBus::new(),
            entities: Vec::new(),
            subscriptions: Vec::new(),
            next_id: 1,
            frame: 0,
        }
    }

    /// Shared bus; clone it into terrain that reports its own changes
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Returns the entity index
    pub fn add_terrain(&mut self, terrain: impl Terrain + 'static) -> usize {
        self.entities.push(Entity::Terrain(Box::new(terrain)));
        self.entities.len() - 1
    }

    pub fn add_hazard(&mut self, hazard: impl Hazard + 'static) -> usize {
        self.entities.push(Entity::Hazard(Box::new(hazard)));
        self.entities.len() - 1
    }

    /// Spawn a ball with the session's tuning and subscribe it to the bus
    pub fn spawn_ball(&mut self, position: Vec2, velocity: Vec2) -> Rc<RefCell<Ball>> {
        let id = self.next_id;
        self.next_id += 1;

        let ball = Rc::new(RefCell::new(Ball::with_tuning(
            id,
            position,
            velocity,
            self.sprites,
            self.settings.ball,
        )));
        let subscription = self.bus.subscribe(ball.clone());
        self.subscriptions.push((id, subscription));
        self.entities.push(Entity::Ball(ball.clone()));

        log::debug!("spawned ball {} at {:?}", id, position);
        ball
    }

    /// Remove a ball and its bus subscription
    pub fn despawn_ball(&mut self, id: EntityId) -> bool {
        let Some(index) = self
            .entities
            .iter()
            .position(|e| e.as_ball().is_some_and(|b| b.borrow().id == id))
        else {
            return false;
        };
        self.entities.remove(index);
        if let Some(slot) = self.subscriptions.iter().position(|(owner, _)| *owner == id) {
            let (_, subscription) = self.subscriptions.remove(slot);
            self.bus.unsubscribe(subscription);
        }
        // Indices past the removed slot shifted; let balls rebind
        for ball in self.balls() {
            ball.borrow_mut().terrain = None;
        }
        true
    }

    pub fn balls(&self) -> impl Iterator<Item = &Rc<RefCell<Ball>>> {
        self.entities.iter().filter_map(Entity::as_ball)
    }

    pub fn ball(&self, id: EntityId) -> Option<Rc<RefCell<Ball>>> {
        self.balls().find(|b| b.borrow().id == id).cloned()
    }

    /// Route an input event to every ball
    pub fn handle_input(&mut self, event: &InputEvent) {
        for ball in self.entities.iter().filter_map(Entity::as_ball) {
            ball.borrow_mut().handle_input(event, &self.bus);
        }
    }

    /// Step every ball once, in entity-list order
    ///
    /// `dt` only advances settle timers; motion is per frame.
    pub fn tick(&mut self, dt: f32) {
        self.frame += 1;

        let balls: Vec<_> = self.balls().cloned().collect();
        for ball in balls {
            ball.borrow_mut()
                .step(&mut self.world, &mut self.entities, &self.bus, dt);
        }
    }

    /// Tell every listener the terrain was edited from outside the simulation
    pub fn terrain_changed(&self) {
        self.bus.notify(&GameEvent::TerrainChanged);
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.world.paused != paused {
            log::info!("session {}", if paused { "paused" } else { "resumed" });
        }
        self.world.paused = paused;
    }
}
