//! Fleet dispatch: choosing which car answers a hall call
//!
//! The dispatcher owns the cars for the lifetime of one simulation run and
//! routes every hall call to exactly one of them. It only reads car state to
//! decide; all queue mutation happens through the chosen car's `add_request`.

use log::debug;

use super::car::SimCar;
use super::types::{CarId, Direction, Request};

pub struct SimDispatcher {
    cars: Vec<SimCar>,
}

impl SimDispatcher {
    pub fn new(cars: Vec<SimCar>) -> Self {
        Self { cars }
    }

    pub fn cars(&self) -> &[SimCar] {
        &self.cars
    }

    pub fn cars_mut(&mut self) -> &mut [SimCar] {
        &mut self.cars
    }

    pub fn car(&self, id: CarId) -> Option<&SimCar> {
        self.cars.iter().find(|car| car.id() == id)
    }

    pub fn car_mut(&mut self, id: CarId) -> Option<&mut SimCar> {
        self.cars.iter_mut().find(|car| car.id() == id)
    }

    /// Advance every car by one time step, in fixed fleet order
    pub fn update_all(&mut self, delta_secs: f32) {
        for car in &mut self.cars {
            car.update(delta_secs);
        }
    }

    /// Assign a hall call to the closest available car. `origin` is the car
    /// whose floor panel raised the call, used only for tie-breaking.
    pub fn add_hall_request(&mut self, floor: i32, direction: Direction, origin: CarId) {
        let request = Request::new(direction, floor);
        let Some(index) = self.select_car(request, origin) else {
            return;
        };
        self.cars[index].add_request(floor, Some(direction));
    }

    /// Nearest-available selection with id tie-breaking. Returns no car when
    /// an equal request is already booked somewhere in the fleet.
    fn select_car(&self, request: Request, origin: CarId) -> Option<usize> {
        // Cars that can fold the call into their current sweep
        let mut candidates = Vec::new();
        let mut others = Vec::new();

        for (index, car) in self.cars.iter().enumerate() {
            if car.holds_request(request) {
                debug!(
                    "hall call {} already booked on car #{}",
                    request,
                    car.id().0
                );
                return None;
            }
            if car.is_idle() || car.moving_direction() == Some(request.direction) {
                candidates.push(index);
            } else {
                others.push(index);
            }
        }

        if !candidates.is_empty() {
            // Minimal floor distance; ties go to the shaft closest to the
            // panel that raised the call
            return candidates.into_iter().min_by_key(|&index| {
                let car = &self.cars[index];
                (
                    (car.current_floor() - request.floor).abs(),
                    car.id().0.abs_diff(origin.0),
                )
            });
        }

        // Everyone is busy sweeping the other way; balance by load
        others
            .into_iter()
            .min_by_key(|&index| self.cars[index].pending_requests())
    }
}
