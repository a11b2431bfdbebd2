//! Core types for the elevator simulation
//!
//! Standalone types shared by the car, dispatcher and world modules.

use std::fmt;

/// A unique identifier for an elevator car
/// Car ids are 1-based and stable for the lifetime of one fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CarId(pub usize);

/// Travel direction a request is qualified under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Signed unit step along the shaft: +1 for Up, -1 for Down
    pub fn step(self) -> i32 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

/// A floor-service request: the target floor plus the travel direction the
/// request is qualified under
///
/// Cabin calls arrive unqualified and are resolved against the car's current
/// floor before a `Request` is built, so a stored request always carries a
/// direction. Requests are consumed when serviced or invalidated, never
/// mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Request {
    pub direction: Direction,
    pub floor: i32,
}

impl Request {
    pub fn new(direction: Direction, floor: i32) -> Self {
        Self { direction, floor }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            Direction::Up => "up",
            Direction::Down => "down",
        };
        write!(f, "{} {}", self.floor, direction)
    }
}

/// Vertical distance between adjacent floor stops in world units
pub const FLOOR_HEIGHT: f32 = 4.0;
