//! Publish/subscribe event bus
//!
//! Entities raise [`GameEvent`]s; every subscribed [`Observer`] receives them
//! synchronously, in subscription order, on the calling thread. Payloads are
//! plain values, so nothing an observer sees can outlive the call by reference.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

/// Externally observable state changes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Ball controllability after a recompute (sent even when unchanged)
    CanMoveChanged(bool),
    /// Ball rest/anchor position
    RestPositionUpdated(Vec2),
    /// Drag gesture began at this screen point
    DragStarted(Vec2),
    DragEnded,
    /// Reset to last rest position requested
    PressedSpace,
    StartedMoving,
    /// Ball fell into water and was returned to its rest position
    HitWater,
    /// Ball broke through thin terrain
    SmashedDoor,
    /// Ball bounced off thin terrain without breaking it
    BouncedOffDoor,
    /// Terrain cells were removed
    TerrainChanged,
}

/// Receiver of bus events
pub trait Observer {
    fn on_notify(&mut self, event: &GameEvent);
}

/// Ticket returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    observer: Rc<RefCell<dyn Observer>>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

/// Session-wide event bus
///
/// Clones share one registry, so any entity holding a clone can raise events
/// that every subscriber sees.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Rc<RefCell<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: Rc<RefCell<dyn Observer>>) -> SubscriptionId {
        let mut registry = self.registry.borrow_mut();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.subscribers.push(Subscriber { id, observer });
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.borrow_mut();
        let before = registry.subscribers.len();
        registry.subscribers.retain(|s| s.id != id);
        registry.subscribers.len() != before
    }

    /// Deliver `event` to every subscriber
    ///
    /// A subscriber that is already borrowed (it is the one raising the event)
    /// does not receive its own event.
    pub fn notify(&self, event: &GameEvent) {
        // Snapshot so handlers may (un)subscribe while we iterate
        let observers: Vec<_> = self
            .registry
            .borrow()
            .subscribers
            .iter()
            .map(|s| Rc::clone(&s.observer))
            .collect();

        for observer in observers {
            match observer.try_borrow_mut() {
                Ok(mut observer) => observer.on_notify(event),
                Err(_) => log::trace!("skipping busy observer for {:?}", event),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.len())
            .finish()
    }
}

/// Observer that keeps a copy of every event it sees
#[derive(Debug, Default)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: a shared log already subscribed to `bus`
    pub fn attach(bus: &EventBus) -> Rc<RefCell<EventLog>> {
        let log = Rc::new(RefCell::new(Self::new()));
        bus.subscribe(log.clone());
        log
    }

    pub fn count(&self, event: &GameEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }

    pub fn contains(&self, event: &GameEvent) -> bool {
        self.events.contains(event)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Observer for EventLog {
    fn on_notify(&mut self, event: &GameEvent) {
        self.events.push(*event);
    }
}
