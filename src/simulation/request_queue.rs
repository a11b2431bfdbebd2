//! Directional request queue
//!
//! A duplicate-free priority queue of requests ordered by proximity along one
//! travel direction: ascending floors for an Up queue, descending for a Down
//! queue. Each car holds two of these per direction (primary + delayed).

use sorted_vec::SortedSet;

use super::types::{Direction, Request};

/// Priority queue of requests for a single travel direction
///
/// Backed by a sorted unique set of signed floor keys: the floor itself for
/// Up, negated for Down, so the smallest key is always the next stop of the
/// sweep and one `i32` ordering serves both heap order and uniqueness.
#[derive(Debug, Clone)]
pub struct RequestQueue {
    direction: Direction,
    keys: SortedSet<i32>,
}

impl RequestQueue {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            keys: SortedSet::new(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn key(&self, floor: i32) -> i32 {
        match self.direction {
            Direction::Up => floor,
            Direction::Down => -floor,
        }
    }

    fn floor(&self, key: i32) -> i32 {
        match self.direction {
            Direction::Up => key,
            Direction::Down => -key,
        }
    }

    /// Insert a request; duplicates are ignored. Returns whether it was added.
    pub fn enqueue(&mut self, request: Request) -> bool {
        debug_assert_eq!(request.direction, self.direction);
        if self.contains(request) {
            return false;
        }
        let _ = self.keys.find_or_insert(self.key(request.floor));
        true
    }

    /// The next stop of the sweep, without removing it
    pub fn peek(&self) -> Option<Request> {
        self.keys
            .first()
            .map(|&key| Request::new(self.direction, self.floor(key)))
    }

    pub fn dequeue(&mut self) -> Option<Request> {
        if self.keys.is_empty() {
            return None;
        }
        let key = self.keys.remove_index(0);
        Some(Request::new(self.direction, self.floor(key)))
    }

    pub fn contains(&self, request: Request) -> bool {
        request.direction == self.direction && self.keys.contains(&self.key(request.floor))
    }

    /// Remove an arbitrary entry; O(n), not a hot path
    pub fn remove(&mut self, request: Request) -> bool {
        if request.direction != self.direction {
            return false;
        }
        self.keys.remove_item(&self.key(request.floor)).is_some()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Queue contents in service order
    pub fn iter(&self) -> impl Iterator<Item = Request> + '_ {
        self.keys
            .iter()
            .map(move |&key| Request::new(self.direction, self.floor(key)))
    }

    /// Drain every entry of `other` into this queue (delayed-queue promotion)
    pub fn absorb(&mut self, other: &mut RequestQueue) {
        debug_assert_eq!(self.direction, other.direction);
        let drained: Vec<Request> = other.iter().collect();
        other.clear();
        for request in drained {
            self.enqueue(request);
        }
    }
}
