//! Elevator Simulation Library
//!
//! An elevator scheduling and dispatch library that runs headless; a UI can
//! subscribe to its events and drive its per-tick update.

pub mod simulation;
