//! Standalone elevator simulation module
//!
//! This module contains all the core scheduling and dispatch logic, which
//! runs independently of any rendering layer. A UI subscribes to the event
//! bus and drives `SimWorld::tick` once per frame; the core never depends on
//! it for correctness.

mod car;
mod config;
mod dispatcher;
mod events;
mod request_queue;
mod types;
mod world;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use car::{CarState, SimCar};
#[allow(unused_imports)]
pub use config::{
    SimConfig, DEFAULT_CAR_COUNT, DEFAULT_DOOR_HOLD_SECS, DEFAULT_FLOOR_COUNT, DEFAULT_SPEED,
    MAX_CARS, MAX_FLOORS, MIN_CARS, MIN_FLOORS,
};
#[allow(unused_imports)]
pub use dispatcher::SimDispatcher;
#[allow(unused_imports)]
pub use events::{EventBus, SimEvent};
#[allow(unused_imports)]
pub use request_queue::RequestQueue;
#[allow(unused_imports)]
pub use types::{CarId, Direction, Request, FLOOR_HEIGHT};
pub use world::SimWorld;
