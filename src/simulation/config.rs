//! Scalar configuration for a simulation run
//!
//! Covers the whole restart surface: fleet size, floor count, cabin travel
//! speed and the door hold interval. Values are validated before a (re)start
//! is accepted; a rejected configuration leaves the running fleet untouched.

use anyhow::{bail, Result};

/// Fleet size bounds
pub const MIN_CARS: usize = 1;
pub const MAX_CARS: usize = 3;

/// Floor count bounds
pub const MIN_FLOORS: i32 = 2;
pub const MAX_FLOORS: i32 = 6;

pub const DEFAULT_CAR_COUNT: usize = 1;
pub const DEFAULT_FLOOR_COUNT: i32 = 6;
pub const DEFAULT_SPEED: f32 = 8.0;
pub const DEFAULT_DOOR_HOLD_SECS: f32 = 1.0;

/// Validated settings for one simulation run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub car_count: usize,
    pub floor_count: i32,
    /// Cabin travel speed in world units per second
    pub speed: f32,
    /// How long doors stay open at a stop
    pub door_hold_secs: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            car_count: DEFAULT_CAR_COUNT,
            floor_count: DEFAULT_FLOOR_COUNT,
            speed: DEFAULT_SPEED,
            door_hold_secs: DEFAULT_DOOR_HOLD_SECS,
        }
    }
}

impl SimConfig {
    /// Check every field against its bounds
    /// Returns the first violation; callers must reject the whole config
    pub fn validate(&self) -> Result<()> {
        if !(MIN_CARS..=MAX_CARS).contains(&self.car_count) {
            bail!("car count should be {} .. {}", MIN_CARS, MAX_CARS);
        }
        if !(MIN_FLOORS..=MAX_FLOORS).contains(&self.floor_count) {
            bail!("floor count should be {} .. {}", MIN_FLOORS, MAX_FLOORS);
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            bail!("speed should be a positive number, got {}", self.speed);
        }
        if !self.door_hold_secs.is_finite() || self.door_hold_secs <= 0.0 {
            bail!(
                "door hold should be a positive number, got {}",
                self.door_hold_secs
            );
        }
        Ok(())
    }
}
