//! Simulation events and their publish/subscribe distribution
//!
//! The core announces everything the presentation layer needs through
//! `SimEvent`s. Delivery is an explicit bus: observers subscribe and receive
//! every subsequent event over a channel. The goal-reached and
//! no-longer-actual events are fleet-wide broadcasts keyed by the serving car
//! so every floor panel watching that car can reset its button highlight.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::types::{CarId, Direction};

/// Announcement from the simulation core to external observers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// A car's cabin arrived at a serviced floor index (or started there)
    FloorChanged { car: CarId, floor: i32 },
    /// A car ran out of pending requests
    EnteredIdle { car: CarId },
    /// A car computed a new travel direction
    DirectionChanged { car: CarId, direction: Direction },
    /// A request was served by a completed stop; `direction: None` marks the
    /// initial position announcement of a freshly initialized car
    GoalFloorReached {
        car: CarId,
        floor: i32,
        direction: Option<Direction>,
    },
    /// A request was satisfied without a stop of its own (duplicate or
    /// absorbed by a same-floor stop); panels reset the matching button
    RequestNoLongerActual {
        car: CarId,
        floor: i32,
        direction: Direction,
    },
    /// A cabin call was accepted by its car
    CabinFloorRequested { car: CarId, floor: i32 },
    /// Doors opened at a stop; the serving cabin becomes visible
    DoorsOpened { car: CarId, floor: i32 },
    /// Doors finished closing; the serving cabin hides again
    DoorsClosed { car: CarId, floor: i32 },
}

/// Fan-out channel from the core to any number of observers
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Sender<SimEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; it receives every event published after this call
    pub fn subscribe(&mut self) -> Receiver<SimEvent> {
        let (sender, receiver) = unbounded();
        self.subscribers.push(sender);
        receiver
    }

    /// Deliver an event to all live subscribers, pruning disconnected ones
    pub fn publish(&mut self, event: SimEvent) {
        self.subscribers.retain(|sender| sender.send(event).is_ok());
    }
}
