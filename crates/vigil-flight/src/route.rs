//! Straight-line waypoint stepping.

use vigil_core::types::Position;

/// Move from `from` toward `to` by at most `distance`.
///
/// Returns the new position and the distance still left to `to` after the
/// move. The remainder is zero or negative once the waypoint is reached, in
/// which case the position snaps exactly onto `to`.
pub fn step_toward(from: &Position, to: &Position, distance: f64) -> (Position, f64) {
    let delta = to.as_dvec3() - from.as_dvec3();
    let total = delta.length();
    let remaining = total - distance;
    if remaining <= 0.0 {
        return (*to, remaining);
    }
    let moved = from.as_dvec3() + delta / total * distance;
    (Position::from(moved), remaining)
}

/// Ordered waypoints plus the index of the next one to reach.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    waypoints: Vec<Position>,
    next: usize,
}

impl Route {
    pub fn new(waypoints: Vec<Position>) -> Self {
        Self { waypoints, next: 0 }
    }

    pub fn waypoints(&self) -> &[Position] {
        &self.waypoints
    }

    /// First waypoint: launch point and home.
    pub fn home(&self) -> Option<Position> {
        self.waypoints.first().copied()
    }

    pub fn next_index(&self) -> usize {
        self.next
    }

    pub fn set_next_index(&mut self, next: usize) {
        self.next = next.min(self.waypoints.len());
    }

    pub fn is_exhausted(&self) -> bool {
        self.next >= self.waypoints.len()
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}
