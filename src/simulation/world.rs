//! Main simulation world that ties everything together
//!
//! This is the entry point for running the elevator simulation: it owns the
//! configuration, the dispatcher with its fleet, and the event bus, and it
//! drives every car synchronously once per tick.

use anyhow::{Context, Result};
use crossbeam_channel::Receiver;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::car::{CarState, SimCar};
use super::config::SimConfig;
use super::dispatcher::SimDispatcher;
use super::events::{EventBus, SimEvent};
use super::types::{CarId, Direction};

/// The main simulation world
pub struct SimWorld {
    config: SimConfig,
    dispatcher: SimDispatcher,
    events: EventBus,
    /// Simulation time
    time: f32,
    /// Optional seeded RNG for reproducible traffic generation
    rng: Option<StdRng>,
}

impl SimWorld {
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate().context("invalid configuration")?;
        let mut world = Self {
            config,
            dispatcher: SimDispatcher::new(Vec::new()),
            events: EventBus::new(),
            time: 0.0,
            rng: None,
        };
        world.rebuild_fleet();
        Ok(world)
    }

    /// Create a new SimWorld with a seeded RNG for reproducible runs
    pub fn new_with_seed(config: SimConfig, seed: u64) -> Result<Self> {
        let mut world = Self::new(config)?;
        world.rng = Some(StdRng::seed_from_u64(seed));
        Ok(world)
    }

    /// Tear the fleet down and rebuild it under a new configuration. An
    /// invalid configuration is rejected and the running fleet stays active.
    pub fn restart(&mut self, config: SimConfig) -> Result<()> {
        config.validate().context("restart rejected")?;
        self.config = config;
        self.time = 0.0;
        self.rebuild_fleet();
        Ok(())
    }

    fn rebuild_fleet(&mut self) {
        let floors: Vec<i32> = (1..=self.config.floor_count).collect();
        let cars = (1..=self.config.car_count)
            .map(|num| {
                SimCar::new(
                    CarId(num),
                    &floors,
                    self.config.floor_count,
                    self.config.speed,
                    self.config.door_hold_secs,
                )
            })
            .collect();
        self.dispatcher = SimDispatcher::new(cars);
        self.pump_events();
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn cars(&self) -> &[SimCar] {
        self.dispatcher.cars()
    }

    pub fn car(&self, id: CarId) -> Option<&SimCar> {
        self.dispatcher.car(id)
    }

    /// Whether every car in the fleet is idle
    pub fn is_idle(&self) -> bool {
        self.cars().iter().all(SimCar::is_idle)
    }

    /// Register an observer of the simulation's event stream
    pub fn subscribe(&mut self) -> Receiver<SimEvent> {
        self.events.subscribe()
    }

    /// Hall call from a floor panel; the dispatcher picks the serving car
    pub fn add_hall_request(&mut self, floor: i32, direction: Direction, origin: CarId) {
        self.dispatcher.add_hall_request(floor, direction, origin);
        self.pump_events();
    }

    /// Cabin call from inside a car; bypasses the dispatcher
    pub fn add_cabin_request(&mut self, car: CarId, floor: i32) -> Result<()> {
        let car = self
            .dispatcher
            .car_mut(car)
            .with_context(|| format!("unknown car id {}", car.0))?;
        car.add_request(floor, None);
        self.pump_events();
        Ok(())
    }

    /// Main simulation tick: advances every car synchronously in fleet order
    pub fn tick(&mut self, delta_secs: f32) {
        self.time += delta_secs;
        self.dispatcher.update_all(delta_secs);
        self.pump_events();
    }

    /// Forward buffered car announcements to the bus, in fleet order
    fn pump_events(&mut self) {
        for car in self.dispatcher.cars_mut() {
            for event in car.take_events() {
                self.events.publish(event);
            }
        }
    }

    /// Get a random value in the given range, using the seeded RNG if present
    fn random_range(&mut self, range: std::ops::Range<i32>) -> i32 {
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    /// Inject one randomly generated hall or cabin call (headless traffic)
    pub fn spawn_random_call(&mut self) {
        let floor_count = self.config.floor_count;
        let car_count = self.config.car_count as i32;
        let floor = self.random_range(1..floor_count + 1);
        let car = CarId(self.random_range(1..car_count + 1) as usize);

        // Roughly one call in three comes from inside a cabin
        if self.random_range(0..3) == 0 {
            let _ = self.add_cabin_request(car, floor);
            return;
        }

        let direction = if floor == floor_count {
            Direction::Down
        } else if floor == 1 {
            Direction::Up
        } else if self.random_range(0..2) == 0 {
            Direction::Up
        } else {
            Direction::Down
        };
        self.add_hall_request(floor, direction, car);
    }

    /// Print a summary of the fleet state
    pub fn print_summary(&self) {
        println!("=== Elevator Simulation Summary ===");
        println!("Time: {:.2}s", self.time);
        println!(
            "Cars: {}, Floors: {}",
            self.cars().len(),
            self.config.floor_count
        );
        for car in self.cars() {
            let state = match car.state() {
                CarState::Idle => "idle",
                CarState::Moving => "moving",
                CarState::DoorCycle { .. } => "doors",
            };
            println!(
                "  car #{}: floor {}, state: {}, pending: {}",
                car.id().0,
                car.current_floor(),
                state,
                car.pending_requests()
            );
        }
    }
}
