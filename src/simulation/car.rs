//! Car scheduling and motion logic
//!
//! One `SimCar` owns its directional request queues, classifies every incoming
//! request into them, and advances floor-by-floor toward its current target,
//! cycling its doors at each stop. The car announces state changes through
//! buffered `SimEvent`s which the world pumps to the event bus after each
//! operation.

use log::{debug, warn};
use ordered_float::OrderedFloat;
use std::collections::HashSet;

use super::events::SimEvent;
use super::request_queue::RequestQueue;
use super::types::{CarId, Direction, Request, FLOOR_HEIGHT};

/// Operating state of a car's motion state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarState {
    /// No pending requests
    Idle,
    /// Advancing toward the current request's floor
    Moving,
    /// Doors open, holding, then closing at a stop
    DoorCycle { hold_remaining: f32 },
}

/// Primary and delayed request queues for one travel direction
#[derive(Debug, Clone)]
struct DirectionQueues {
    primary: RequestQueue,
    delayed: RequestQueue,
}

impl DirectionQueues {
    fn new(direction: Direction) -> Self {
        Self {
            primary: RequestQueue::new(direction),
            delayed: RequestQueue::new(direction),
        }
    }

    fn clear(&mut self) {
        self.primary.clear();
        self.delayed.clear();
    }

    fn len(&self) -> usize {
        self.primary.len() + self.delayed.len()
    }
}

fn dir_index(direction: Direction) -> usize {
    match direction {
        Direction::Up => 0,
        Direction::Down => 1,
    }
}

/// Cabin position of a floor stop along the shaft
fn position_of(floor: i32) -> OrderedFloat<f32> {
    OrderedFloat((floor - 1) as f32 * FLOOR_HEIGHT)
}

/// Constant-speed step toward `target`, clamping exactly onto it
fn move_towards(
    position: OrderedFloat<f32>,
    target: OrderedFloat<f32>,
    max_step: f32,
) -> OrderedFloat<f32> {
    let delta = target.into_inner() - position.into_inner();
    if delta.abs() <= max_step {
        target
    } else {
        OrderedFloat(position.into_inner() + max_step * delta.signum())
    }
}

/// One elevator car
#[derive(Debug, Clone)]
pub struct SimCar {
    id: CarId,
    /// Floor indices this car physically serves; absent indices are passed
    /// without stopping or announcing
    floors: HashSet<i32>,
    top_floor: i32,
    speed: f32,
    door_hold_secs: f32,
    state: CarState,
    /// Physical travel direction; may oppose the current request's direction
    /// while the car detours to the start of a sweep
    moving_direction: Option<Direction>,
    /// Direction whose queue pair currently drives the car
    active: Direction,
    /// {primary, delayed} per direction, indexed via `dir_index`
    queues: [DirectionQueues; 2],
    /// Requests parked while doors are cycling, merged back on door close
    pending: Vec<Request>,
    /// The request presently being honored or traveled toward
    current: Option<Request>,
    current_floor: i32,
    /// Next intermediate stop along the shaft, always a serviced floor
    next_floor: i32,
    position: OrderedFloat<f32>,
    events: Vec<SimEvent>,
}

impl SimCar {
    pub fn new(
        id: CarId,
        served_floors: &[i32],
        top_floor: i32,
        speed: f32,
        door_hold_secs: f32,
    ) -> Self {
        let mut car = Self {
            id,
            floors: HashSet::new(),
            top_floor: 1,
            speed: 0.0,
            door_hold_secs: 0.0,
            state: CarState::Idle,
            moving_direction: None,
            active: Direction::Up,
            queues: [
                DirectionQueues::new(Direction::Up),
                DirectionQueues::new(Direction::Down),
            ],
            pending: Vec::new(),
            current: None,
            current_floor: 1,
            next_floor: 1,
            position: position_of(1),
            events: Vec::new(),
        };
        car.initialize(served_floors, top_floor, speed, door_hold_secs);
        car
    }

    /// (Re)configure the car: clears every queue, parks the cabin at floor 1
    /// and announces the starting floor and door state
    pub fn initialize(
        &mut self,
        served_floors: &[i32],
        top_floor: i32,
        speed: f32,
        door_hold_secs: f32,
    ) {
        for pair in &mut self.queues {
            pair.clear();
        }
        self.pending.clear();
        self.floors = served_floors.iter().copied().collect();
        self.top_floor = top_floor;
        self.speed = speed;
        self.door_hold_secs = door_hold_secs;
        self.moving_direction = None;
        self.current = None;
        self.current_floor = 1;
        self.next_floor = 1;
        self.position = position_of(1);
        self.state = CarState::Idle;
        self.events.push(SimEvent::EnteredIdle { car: self.id });
        self.events.push(SimEvent::FloorChanged {
            car: self.id,
            floor: self.current_floor,
        });
        self.events.push(SimEvent::GoalFloorReached {
            car: self.id,
            floor: self.current_floor,
            direction: None,
        });
    }

    pub fn id(&self) -> CarId {
        self.id
    }

    pub fn state(&self) -> CarState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, CarState::Idle)
    }

    pub fn current_floor(&self) -> i32 {
        self.current_floor
    }

    pub fn moving_direction(&self) -> Option<Direction> {
        self.moving_direction
    }

    pub fn serves_floor(&self, floor: i32) -> bool {
        self.floors.contains(&floor)
    }

    /// Total queued requests across all four queues (dispatcher load metric)
    pub fn pending_requests(&self) -> usize {
        self.queues.iter().map(DirectionQueues::len).sum()
    }

    /// Whether an equal request is anywhere in this car's bookkeeping
    pub fn holds_request(&self, request: Request) -> bool {
        self.current == Some(request)
            || self
                .queues
                .iter()
                .any(|pair| pair.primary.contains(request) || pair.delayed.contains(request))
            || self.pending.contains(&request)
    }

    /// Drain announcements accumulated since the last call
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Entry point for both hall calls (routed here by the dispatcher) and
    /// cabin calls (`direction: None`, resolved against the current floor).
    /// Requests for floors this car does not serve are dropped.
    pub fn add_request(&mut self, floor: i32, direction: Option<Direction>) {
        if !self.floors.contains(&floor) {
            debug!(
                "car #{}: request for unserved floor {} dropped",
                self.id.0, floor
            );
            return;
        }

        let direction = match direction {
            Some(direction) => direction,
            None => {
                if floor == self.current_floor {
                    return;
                }
                self.events
                    .push(SimEvent::CabinFloorRequested { car: self.id, floor });
                self.direction_to(floor)
            }
        };

        let request = Request::new(direction, floor);

        if self.is_idle() {
            // Seed of a new sweep; all queues are empty while idle
            self.active = request.direction;
            self.primary_mut().enqueue(request);
            self.current = Some(request);
            self.set_state(CarState::Moving);
            self.log_queues();
            return;
        }

        if matches!(self.state, CarState::DoorCycle { .. }) {
            // The primary head may be dequeued mid-cycle; park the request
            // and merge it back once the doors have closed
            if !self.pending.contains(&request) {
                self.pending.push(request);
            }
            return;
        }

        if self.current == Some(request) {
            // Idempotent duplicate of the request being honored
            self.events.push(SimEvent::RequestNoLongerActual {
                car: self.id,
                floor,
                direction,
            });
            return;
        }

        if self.holds_request(request) {
            return;
        }

        self.classify(request);

        if let Some(head) = self.primary().peek() {
            self.current = Some(head);
        }
        self.log_queues();
    }

    /// Advance the state machine by one time step
    pub fn update(&mut self, delta_secs: f32) {
        match self.state {
            CarState::Idle => {}
            CarState::Moving => self.move_cabin(delta_secs),
            CarState::DoorCycle { .. } => self.doors_update(delta_secs),
        }
    }

    /// Route a request into the proper queue. The car is moving and the
    /// request is not a duplicate.
    fn classify(&mut self, request: Request) {
        let current_direction = self.current.map(|current| current.direction);
        if current_direction != Some(request.direction) {
            // Always safe to queue on the opposite side
            self.opposite_mut().enqueue(request);
        } else if self.moving_direction != Some(request.direction) {
            // Detouring against the nominal direction; served once the car
            // resumes its sweep
            self.primary_mut().enqueue(request);
        } else if self.is_ahead(request.floor) {
            // Reachable en route without a detour
            self.primary_mut().enqueue(request);
        } else {
            // Behind the sweep: wait for the next pass in this direction
            self.delayed_mut().enqueue(request);
        }
    }

    fn is_ahead(&self, floor: i32) -> bool {
        match self.moving_direction {
            Some(direction) => (floor - self.current_floor) * direction.step() > 0,
            None => false,
        }
    }

    fn direction_to(&self, floor: i32) -> Direction {
        if floor > self.current_floor {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    fn set_state(&mut self, state: CarState) {
        if self.state == state {
            return;
        }
        self.state = state;
        match self.state {
            CarState::Idle => {
                self.moving_direction = None;
                self.current = None;
                self.events.push(SimEvent::EnteredIdle { car: self.id });
            }
            CarState::Moving => self.on_start_moving(),
            CarState::DoorCycle { .. } => self.open_doors(),
        }
    }

    fn on_start_moving(&mut self) {
        let Some(goal) = self.current else {
            warn!("car #{}: moving with no current request", self.id.0);
            self.state = CarState::Idle;
            self.moving_direction = None;
            return;
        };
        let direction = self.direction_to(goal.floor);
        self.moving_direction = Some(direction);
        self.events
            .push(SimEvent::DirectionChanged { car: self.id, direction });
        self.next_floor = self.next_serviced_floor(self.current_floor, direction);
    }

    /// Next serviced floor index from `from` along `direction`, clamped to
    /// the shaft; floor indices absent from the serviced set are skipped
    fn next_serviced_floor(&self, from: i32, direction: Direction) -> i32 {
        let mut next = from + direction.step();
        while (1..=self.top_floor).contains(&next) && !self.floors.contains(&next) {
            next += direction.step();
        }
        next.clamp(1, self.top_floor)
    }

    fn move_cabin(&mut self, delta_secs: f32) {
        let Some(goal) = self.current else {
            warn!("car #{}: moving with no target, entering idle", self.id.0);
            self.set_state(CarState::Idle);
            return;
        };

        // Both the floor index and the exact cabin position must coincide,
        // so a pass-through at speed never counts as an arrival
        if self.current_floor == goal.floor && self.position == position_of(self.current_floor) {
            self.on_reach_goal_floor(goal);
            return;
        }

        if self.position == position_of(self.next_floor) {
            self.current_floor = self.next_floor;
            self.events.push(SimEvent::FloorChanged {
                car: self.id,
                floor: self.current_floor,
            });
            if self.current_floor != goal.floor {
                if let Some(direction) = self.moving_direction {
                    self.next_floor = self.next_serviced_floor(self.current_floor, direction);
                }
            }
            return;
        }

        let target = position_of(self.next_floor);
        self.position = move_towards(self.position, target, self.speed * delta_secs);
    }

    fn on_reach_goal_floor(&mut self, served: Request) {
        self.primary_mut().dequeue();
        self.set_state(CarState::DoorCycle {
            hold_remaining: self.door_hold_secs,
        });
        self.events.push(SimEvent::GoalFloorReached {
            car: self.id,
            floor: served.floor,
            direction: Some(served.direction),
        });
        self.log_queues();
    }

    fn open_doors(&mut self) {
        if !self.floors.contains(&self.current_floor)
            || self.position != position_of(self.current_floor)
        {
            warn!(
                "car #{}: refusing to open doors away from a serviced floor stop",
                self.id.0
            );
            return;
        }
        self.events.push(SimEvent::DoorsOpened {
            car: self.id,
            floor: self.current_floor,
        });
    }

    fn doors_update(&mut self, delta_secs: f32) {
        let CarState::DoorCycle { hold_remaining } = self.state else {
            return;
        };
        let remaining = hold_remaining - delta_secs;
        if remaining <= 0.0 {
            self.on_doors_closed();
        } else {
            self.state = CarState::DoorCycle {
                hold_remaining: remaining,
            };
        }
    }

    fn on_doors_closed(&mut self) {
        self.events.push(SimEvent::DoorsClosed {
            car: self.id,
            floor: self.current_floor,
        });
        self.flush_pending();
        self.jump_to_next_request();
    }

    /// Merge requests parked during the door cycle back into the queues.
    /// A parked request already satisfied by this stop is announced fulfilled
    /// instead of re-queued.
    fn flush_pending(&mut self) {
        let parked = std::mem::take(&mut self.pending);
        for request in parked {
            let satisfied_here = request.floor == self.current_floor
                && (request.direction == self.active || self.primary().is_empty());
            if satisfied_here {
                self.events.push(SimEvent::RequestNoLongerActual {
                    car: self.id,
                    floor: request.floor,
                    direction: request.direction,
                });
            } else if !self.holds_request(request) {
                self.classify(request);
            }
        }
    }

    /// Pick the next target after a completed stop: continue the sweep, else
    /// reverse into the opposite direction, else promote delayed work, else
    /// go idle.
    fn jump_to_next_request(&mut self) {
        loop {
            // Heads already satisfied by the stop just completed
            while let Some(head) = self.primary().peek() {
                if head.floor != self.current_floor {
                    break;
                }
                self.events.push(SimEvent::RequestNoLongerActual {
                    car: self.id,
                    floor: head.floor,
                    direction: head.direction,
                });
                self.primary_mut().dequeue();
            }

            if let Some(head) = self.primary().peek() {
                self.current = Some(head);
                self.set_state(CarState::Moving);
                self.log_queues();
                return;
            }

            // An opposite-direction request for the floor just left was
            // satisfied by the same open doors
            let opposite_here = Request::new(self.active.opposite(), self.current_floor);
            if self.opposite_mut().remove(opposite_here) {
                self.events.push(SimEvent::RequestNoLongerActual {
                    car: self.id,
                    floor: opposite_here.floor,
                    direction: opposite_here.direction,
                });
            }

            let opposite = self.active.opposite();
            let pair = self.queue_pair(opposite);
            if !pair.primary.is_empty() || !pair.delayed.is_empty() {
                self.active = opposite;
                self.merge_delayed();
                continue;
            }

            if !self.delayed().is_empty() {
                self.merge_delayed();
                continue;
            }

            self.set_state(CarState::Idle);
            return;
        }
    }

    /// Promote deferred same-direction work into the live sweep
    fn merge_delayed(&mut self) {
        let index = dir_index(self.active);
        let DirectionQueues { primary, delayed } = &mut self.queues[index];
        primary.absorb(delayed);
    }

    fn queue_pair(&self, direction: Direction) -> &DirectionQueues {
        &self.queues[dir_index(direction)]
    }

    fn primary(&self) -> &RequestQueue {
        &self.queue_pair(self.active).primary
    }

    fn primary_mut(&mut self) -> &mut RequestQueue {
        &mut self.queues[dir_index(self.active)].primary
    }

    fn opposite_mut(&mut self) -> &mut RequestQueue {
        &mut self.queues[dir_index(self.active.opposite())].primary
    }

    fn delayed(&self) -> &RequestQueue {
        &self.queue_pair(self.active).delayed
    }

    fn delayed_mut(&mut self) -> &mut RequestQueue {
        &mut self.queues[dir_index(self.active)].delayed
    }

    fn log_queues(&self) {
        let format = |queue: &RequestQueue| {
            queue
                .iter()
                .map(|request| request.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        debug!(
            "car #{}, floor: {}, current: [{}] || opposite: [{}] || delayed: [{}]",
            self.id.0,
            self.current_floor,
            format(self.primary()),
            format(&self.queue_pair(self.active.opposite()).primary),
            format(self.delayed()),
        );
    }
}
