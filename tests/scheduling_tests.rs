//! Scheduling behavior tests
//!
//! These drive a single-car world through the call sequences the scheduler
//! must order correctly: sweep folding, opposite-direction deferral, delayed
//! promotion after reversals, same-floor absorption and duplicate
//! suppression. Visited floors are collected from the event stream.

use crossbeam_channel::Receiver;
use elevator_sim::simulation::{CarId, CarState, Direction, SimConfig, SimEvent, SimWorld};

const CAR: CarId = CarId(1);
const DELTA: f32 = 0.05;
const MAX_TICKS: u32 = 20_000;

fn single_car_world() -> SimWorld {
    let config = SimConfig {
        car_count: 1,
        floor_count: 6,
        speed: 8.0,
        door_hold_secs: 0.5,
    };
    SimWorld::new(config).expect("valid test configuration")
}

/// Tick until the car's cabin reports the given floor
fn tick_until_floor(world: &mut SimWorld, floor: i32) {
    for _ in 0..MAX_TICKS {
        if world.car(CAR).expect("car exists").current_floor() == floor {
            return;
        }
        world.tick(DELTA);
    }
    panic!("car never reached floor {}", floor);
}

/// Tick until the car's doors are open at a stop
fn tick_until_doors_open(world: &mut SimWorld) {
    for _ in 0..MAX_TICKS {
        let state = world.car(CAR).expect("car exists").state();
        if matches!(state, CarState::DoorCycle { .. }) {
            return;
        }
        world.tick(DELTA);
    }
    panic!("doors never opened");
}

/// Tick until every car in the fleet is idle
fn tick_until_idle(world: &mut SimWorld) {
    for _ in 0..MAX_TICKS {
        if world.is_idle() {
            return;
        }
        world.tick(DELTA);
    }
    panic!("fleet never went idle");
}

/// Floors visited by completed stops, in order
fn visited_floors(events: &Receiver<SimEvent>) -> Vec<i32> {
    events
        .try_iter()
        .filter_map(|event| match event {
            SimEvent::GoalFloorReached { floor, .. } => Some(floor),
            _ => None,
        })
        .collect()
}

/// Requests satisfied without a stop of their own, in order
fn fulfilled_without_stop(events: &Receiver<SimEvent>) -> Vec<(i32, Direction)> {
    events
        .try_iter()
        .filter_map(|event| match event {
            SimEvent::RequestNoLongerActual { floor, direction, .. } => Some((floor, direction)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_down_calls_fold_into_one_downward_sweep() {
    let mut world = single_car_world();
    let events = world.subscribe();

    world.add_hall_request(6, Direction::Down, CAR);
    tick_until_floor(&mut world, 2);
    world.add_hall_request(4, Direction::Down, CAR);
    tick_until_floor(&mut world, 4);
    world.add_hall_request(3, Direction::Down, CAR);
    world.add_hall_request(2, Direction::Down, CAR);

    tick_until_idle(&mut world);

    assert_eq!(visited_floors(&events), vec![6, 4, 3, 2]);
}

#[test]
fn test_opposite_call_deferred_until_up_sweep_completes() {
    let mut world = single_car_world();
    let events = world.subscribe();

    world.add_hall_request(6, Direction::Up, CAR);
    world.tick(DELTA);
    world.add_hall_request(5, Direction::Up, CAR);
    world.add_hall_request(3, Direction::Down, CAR);
    tick_until_floor(&mut world, 2);
    // Behind the sweep with opposite work booked: deferred to the next pass
    world.add_hall_request(1, Direction::Up, CAR);

    tick_until_idle(&mut world);

    assert_eq!(visited_floors(&events), vec![5, 6, 3, 1]);
}

#[test]
fn test_down_calls_descending_then_up_calls_ascending() {
    let mut world = single_car_world();
    let events = world.subscribe();

    world.add_hall_request(6, Direction::Down, CAR);
    world.tick(DELTA);
    world.add_hall_request(5, Direction::Down, CAR);
    world.add_hall_request(4, Direction::Up, CAR);
    world.add_hall_request(3, Direction::Up, CAR);

    tick_until_idle(&mut world);

    assert_eq!(visited_floors(&events), vec![6, 5, 3, 4]);
}

#[test]
fn test_up_calls_ascending_then_down_calls_descending() {
    let mut world = single_car_world();
    let events = world.subscribe();

    world.add_hall_request(5, Direction::Up, CAR);
    tick_until_floor(&mut world, 2);
    world.add_hall_request(3, Direction::Up, CAR);
    world.add_hall_request(4, Direction::Down, CAR);
    world.add_hall_request(6, Direction::Down, CAR);

    tick_until_idle(&mut world);

    assert_eq!(visited_floors(&events), vec![3, 5, 6, 4]);
}

#[test]
fn test_up_calls_wait_while_car_rides_up_for_down_calls() {
    let mut world = single_car_world();
    let events = world.subscribe();

    world.add_hall_request(3, Direction::Down, CAR);
    tick_until_floor(&mut world, 2);
    world.add_hall_request(6, Direction::Down, CAR);
    world.add_hall_request(4, Direction::Down, CAR);
    world.add_hall_request(1, Direction::Up, CAR);
    world.add_hall_request(2, Direction::Up, CAR);

    tick_until_idle(&mut world);

    assert_eq!(visited_floors(&events), vec![6, 4, 3, 1, 2]);
}

#[test]
fn test_same_floor_opposite_calls_resolve_in_one_stop() {
    let mut world = single_car_world();
    let events = world.subscribe();

    world.add_hall_request(3, Direction::Down, CAR);
    world.tick(DELTA);
    world.add_hall_request(3, Direction::Up, CAR);

    tick_until_idle(&mut world);

    // One stop, two notifications
    assert_eq!(visited_floors(&events), vec![3]);
    assert_eq!(fulfilled_without_stop(&events), vec![(3, Direction::Up)]);
}

#[test]
fn test_same_floor_opposite_calls_then_continue_up() {
    let mut world = single_car_world();
    let events = world.subscribe();

    world.add_hall_request(3, Direction::Down, CAR);
    world.tick(DELTA);
    world.add_hall_request(3, Direction::Up, CAR);
    world.add_hall_request(4, Direction::Up, CAR);

    tick_until_idle(&mut world);

    assert_eq!(visited_floors(&events), vec![3, 4]);
}

#[test]
fn test_duplicate_calls_add_no_stop() {
    let mut world = single_car_world();
    let events = world.subscribe();

    world.add_hall_request(3, Direction::Down, CAR);
    tick_until_floor(&mut world, 2);
    world.add_hall_request(4, Direction::Down, CAR);
    world.add_hall_request(3, Direction::Down, CAR);
    world.add_hall_request(1, Direction::Up, CAR);
    world.add_hall_request(1, Direction::Up, CAR);

    tick_until_idle(&mut world);

    assert_eq!(visited_floors(&events), vec![4, 3, 1]);
}

#[test]
fn test_calls_during_door_cycle_are_merged_after_close() {
    let mut world = single_car_world();
    let events = world.subscribe();

    world.add_hall_request(6, Direction::Down, CAR);
    tick_until_floor(&mut world, 6);
    tick_until_doors_open(&mut world);
    // Parked while the doors cycle at 6, classified after they close
    world.add_hall_request(1, Direction::Up, CAR);
    world.add_hall_request(3, Direction::Up, CAR);
    world.add_hall_request(5, Direction::Up, CAR);
    world.add_hall_request(2, Direction::Up, CAR);

    tick_until_idle(&mut world);

    assert_eq!(visited_floors(&events), vec![6, 1, 2, 3, 5]);
}

#[test]
fn test_same_floor_call_during_door_cycle_absorbed_by_stop() {
    let mut world = single_car_world();
    let events = world.subscribe();

    world.add_hall_request(5, Direction::Down, CAR);
    tick_until_floor(&mut world, 5);
    world.add_hall_request(4, Direction::Up, CAR);
    tick_until_floor(&mut world, 4);
    tick_until_doors_open(&mut world);
    // Doors are open at 4; this call is satisfied by the ongoing stop
    world.add_hall_request(4, Direction::Down, CAR);
    tick_until_idle(&mut world);
    world.add_hall_request(3, Direction::Down, CAR);

    tick_until_idle(&mut world);

    assert_eq!(visited_floors(&events), vec![5, 4, 3]);
    assert!(fulfilled_without_stop(&events).contains(&(4, Direction::Down)));
}

#[test]
fn test_delayed_work_survives_reversals() {
    let mut world = single_car_world();
    let events = world.subscribe();

    world.add_hall_request(6, Direction::Down, CAR);
    tick_until_floor(&mut world, 6);
    world.add_hall_request(3, Direction::Down, CAR);
    tick_until_floor(&mut world, 4);
    // Behind the downward sweep: parked for the next pass down
    world.add_hall_request(5, Direction::Down, CAR);
    world.add_hall_request(2, Direction::Up, CAR);
    world.add_hall_request(4, Direction::Up, CAR);
    tick_until_floor(&mut world, 3);
    // Cabin passenger at 3 asks for 6, folding into the up sweep
    world.add_hall_request(6, Direction::Up, CAR);

    tick_until_idle(&mut world);

    assert_eq!(visited_floors(&events), vec![6, 3, 2, 4, 6, 5]);
}

#[test]
fn test_cabin_call_resolves_direction_from_current_floor() {
    let mut world = single_car_world();
    let events = world.subscribe();

    world.add_cabin_request(CAR, 4).expect("car exists");
    tick_until_idle(&mut world);

    assert_eq!(visited_floors(&events), vec![4]);

    // And back down again
    world.add_cabin_request(CAR, 2).expect("car exists");
    tick_until_idle(&mut world);

    assert_eq!(visited_floors(&events), vec![2]);
}

#[test]
fn test_cabin_call_announces_button_press() {
    let mut world = single_car_world();
    let events = world.subscribe();

    world.add_cabin_request(CAR, 3).expect("car exists");

    let announced: Vec<SimEvent> = events.try_iter().collect();
    assert!(announced
        .iter()
        .any(|event| matches!(event, SimEvent::CabinFloorRequested { floor: 3, .. })));
}

#[test]
fn test_cabin_call_for_current_floor_ignored() {
    let mut world = single_car_world();
    let events = world.subscribe();

    world.add_cabin_request(CAR, 1).expect("car exists");
    for _ in 0..50 {
        world.tick(DELTA);
    }

    assert!(world.is_idle());
    assert_eq!(visited_floors(&events), Vec::<i32>::new());
}

#[test]
fn test_hall_call_for_current_floor_opens_doors_in_place() {
    let mut world = single_car_world();
    let events = world.subscribe();

    world.add_hall_request(1, Direction::Up, CAR);
    tick_until_idle(&mut world);

    assert_eq!(visited_floors(&events), vec![1]);
    assert_eq!(world.car(CAR).expect("car exists").current_floor(), 1);
}

#[test]
fn test_duplicate_of_request_being_honored_is_reannounced() {
    let mut world = single_car_world();
    let events = world.subscribe();

    world.add_cabin_request(CAR, 5).expect("car exists");
    world.tick(DELTA);
    // Same floor again from the cabin panel: no second booking
    world.add_cabin_request(CAR, 5).expect("car exists");

    tick_until_idle(&mut world);

    assert_eq!(visited_floors(&events), vec![5]);
}

#[test]
fn test_unserved_floor_request_is_dropped() {
    let mut world = single_car_world();
    let events = world.subscribe();

    world.add_hall_request(9, Direction::Down, CAR);
    world.add_cabin_request(CAR, 0).expect("car exists");
    for _ in 0..50 {
        world.tick(DELTA);
    }

    assert!(world.is_idle());
    assert_eq!(visited_floors(&events), Vec::<i32>::new());
}

#[test]
fn test_initialization_announces_floor_and_idle_state() {
    let mut world = single_car_world();
    let events = world.subscribe();

    world
        .restart(SimConfig {
            car_count: 1,
            floor_count: 6,
            speed: 8.0,
            door_hold_secs: 0.5,
        })
        .expect("valid restart");

    let announced: Vec<SimEvent> = events.try_iter().collect();
    assert!(announced
        .iter()
        .any(|event| matches!(event, SimEvent::EnteredIdle { .. })));
    assert!(announced
        .iter()
        .any(|event| matches!(event, SimEvent::FloorChanged { floor: 1, .. })));
    // The starting announcement is direction-free so no hall button resets
    assert!(announced.iter().any(|event| matches!(
        event,
        SimEvent::GoalFloorReached {
            floor: 1,
            direction: None,
            ..
        }
    )));
}

#[test]
fn test_doors_cycle_announced_once_per_stop() {
    let mut world = single_car_world();
    let events = world.subscribe();

    world.add_hall_request(4, Direction::Up, CAR);
    tick_until_idle(&mut world);

    let announced: Vec<SimEvent> = events.try_iter().collect();
    let opened = announced
        .iter()
        .filter(|event| matches!(event, SimEvent::DoorsOpened { .. }))
        .count();
    let closed = announced
        .iter()
        .filter(|event| matches!(event, SimEvent::DoorsClosed { .. }))
        .count();
    assert_eq!(opened, 1);
    assert_eq!(closed, 1);
}
