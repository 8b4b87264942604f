//! Per-frame ball step and input transitions
//!
//! Motion is explicit Euler in units per frame; `dt` only drives the settle
//! timer. Order within a frame: camera, rest early-out, integration and rest
//! detection, forces, entity scan (peers and hazards, lazy terrain binding),
//! water check, terrain contact, final speed cap.

use glam::Vec2;

use super::collision::{bounce_velocity, circles_overlap, peer_rebound, restitution_for};
use super::events::{EventBus, GameEvent, Observer};
use super::input::{InputEvent, Key, MouseButton};
use super::session::Entity;
use super::state::{Ball, BallState, TerrainHandle};
use super::terrain::Material;
use super::world::World;
use crate::{clamp, len, normalize};

impl Ball {
    /// Advance the ball by one frame
    pub fn step(&mut self, world: &mut World, entities: &mut [Entity], bus: &EventBus, dt: f32) {
        world.follow(self.position);

        if self.is_at_rest() {
            return;
        }

        self.integrate(world, bus, dt);
        self.scan_entities(entities, bus);
        self.resolve_terrain(entities, bus);

        // Bouncy restitution can push past the cap
        self.cap_speed();
    }

    fn integrate(&mut self, world: &World, bus: &EventBus, dt: f32) {
        let old_pos = self.position;
        self.position += self.velocity;
        self.settle_timer += dt;

        if len(old_pos - self.position) > self.tuning.jitter_threshold {
            self.restart_settle_timer();
            self.unsettle();
            bus.notify(&GameEvent::StartedMoving);
        }
        if self.settle_timer >= self.tuning.rest_dwell_secs {
            self.settle();
            self.prev_rest = self.position;
            bus.notify(&GameEvent::RestPositionUpdated(self.position));
        }

        if len(self.velocity) > self.tuning.min_move_speed {
            self.set_can_move(false);
        }
        bus.notify(&GameEvent::CanMoveChanged(self.can_move()));
        bus.notify(&GameEvent::RestPositionUpdated(self.position));

        self.velocity += world.gravity;

        if self.velocity.y > self.tuning.terminal_velocity {
            self.velocity.y = self.tuning.terminal_velocity;
        }

        self.cap_speed();

        // air resistance
        self.velocity *= self.tuning.damping;
    }

    /// Peers and hazards; binds the terrain the first time one is seen
    fn scan_entities(&mut self, entities: &mut [Entity], bus: &EventBus) {
        for (index, entity) in entities.iter_mut().enumerate() {
            match entity {
                Entity::Terrain(_) => {
                    if self.terrain.is_none() {
                        log::debug!("ball {} bound terrain at entity {}", self.id, index);
                        self.terrain = Some(TerrainHandle(index));
                        break;
                    }
                }
                Entity::Ball(other) => {
                    // The ball being stepped is mutably borrowed by the caller
                    let Ok(other) = other.try_borrow() else {
                        continue;
                    };
                    let overlapping =
                        circles_overlap(self.position, self.radius, other.position, other.radius);
                    if other.id == self.id || !overlapping {
                        continue;
                    }
                    let (position, velocity) =
                        peer_rebound(self.position, self.velocity, other.position, &self.tuning);
                    self.position = position;
                    self.velocity = velocity;
                }
                Entity::Hazard(hazard) => {
                    if !hazard.intersects_with_circle(self.position, self.radius) {
                        continue;
                    }
                    hazard.touch();
                    self.position -= self.velocity * self.tuning.hazard_pushback;
                    let normal = hazard.normal(self.position, self.velocity);
                    let factor = self.tuning.restitution;
                    self.velocity = bounce_velocity(self.velocity, normal, factor, &self.tuning);
                    self.refresh_can_move();
                    bus.notify(&GameEvent::CanMoveChanged(self.can_move()));
                    bus.notify(&GameEvent::RestPositionUpdated(self.position));
                }
            }
        }
    }

    fn resolve_terrain(&mut self, entities: &mut [Entity], bus: &EventBus) {
        let Some(TerrainHandle(index)) = self.terrain else {
            return;
        };
        let Some(Entity::Terrain(terrain)) = entities.get_mut(index) else {
            return;
        };

        // water
        if terrain.material_at(self.position) == Some(Material::Kill) {
            log::debug!("ball {} hit water at {:?}", self.id, self.position);
            self.settle();
            self.position = self.prev_rest;
            bus.notify(&GameEvent::HitWater);
            bus.notify(&GameEvent::RestPositionUpdated(self.position));
        }

        let Some(contact) = terrain.intersects_circle(self.position, self.velocity, self.radius)
        else {
            return;
        };
        self.position = contact.corrected;
        self.contact_point = Some(contact.point);

        let material = terrain.material_at(contact.point);
        let factor = restitution_for(material, &self.tuning);
        if material == Some(Material::Sticky) {
            self.settle();
            self.prev_rest = self.position;
            bus.notify(&GameEvent::RestPositionUpdated(self.position));
        }

        if material == Some(Material::Thin) {
            let impact_speed = len(self.velocity);
            if impact_speed > self.tuning.break_speed {
                log::debug!("ball {} smashed door at {:?}", self.id, contact.point);
                terrain.remove_cell_at(contact.point);
                self.velocity = normalize(self.velocity)
                    * (impact_speed - self.tuning.break_speed_loss).max(0.0);
                bus.notify(&GameEvent::SmashedDoor);
                return;
            }
            bus.notify(&GameEvent::BouncedOffDoor);
        }

        let normal = terrain.normal_at(contact.point);
        self.velocity = bounce_velocity(self.velocity, normal, factor, &self.tuning);
        self.refresh_can_move();
        bus.notify(&GameEvent::CanMoveChanged(self.can_move()));
        bus.notify(&GameEvent::RestPositionUpdated(self.position));
    }

    fn refresh_can_move(&mut self) {
        if len(self.velocity) < self.tuning.min_move_speed {
            self.set_can_move(true);
        }
    }

    /// React to a raw input event
    pub fn handle_input(&mut self, event: &InputEvent, bus: &EventBus) {
        match *event {
            InputEvent::KeyPressed(Key::Space) => self.reset_to_rest(bus),
            InputEvent::MousePressed {
                button: MouseButton::Left,
                position,
            } => self.begin_drag(position, bus),
            InputEvent::MouseReleased {
                button: MouseButton::Left,
                position,
            } => self.release_drag(position, bus),
            _ => {}
        }
    }

    /// Snap back to the last rest position and hand control to the player
    pub fn reset_to_rest(&mut self, bus: &EventBus) {
        self.settle();
        self.position = self.prev_rest;
        bus.notify(&GameEvent::RestPositionUpdated(self.position));
        bus.notify(&GameEvent::PressedSpace);
        bus.notify(&GameEvent::CanMoveChanged(self.can_move()));
    }

    pub fn begin_drag(&mut self, start: Vec2, bus: &EventBus) {
        if self.is_dragging() || !self.can_move() {
            return;
        }
        self.state = BallState::Dragging {
            start,
            resting: self.is_at_rest(),
        };
        bus.notify(&GameEvent::DragStarted(start));
    }

    /// Finish a drag, launching away from the release point
    pub fn release_drag(&mut self, release: Vec2, bus: &EventBus) {
        let BallState::Dragging { start, resting } = self.state else {
            return;
        };
        self.state = if resting {
            BallState::AtRest
        } else {
            BallState::InFlight { can_move: true }
        };
        bus.notify(&GameEvent::DragEnded);

        let dir = start - release;
        if len(dir) == 0.0 {
            return;
        }
        let speed = clamp(
            len(dir) / self.tuning.launch_divisor,
            0.0,
            self.tuning.launch_speed_cap(),
        );
        self.velocity = normalize(dir) * speed;
        self.unsettle();
        self.restart_settle_timer();
        bus.notify(&GameEvent::StartedMoving);
        self.prev_rest = self.position;
    }
}

impl Observer for Ball {
    fn on_notify(&mut self, event: &GameEvent) {
        if *event == GameEvent::TerrainChanged {
            self.unsettle();
            self.restart_settle_timer();
        }
    }
}
