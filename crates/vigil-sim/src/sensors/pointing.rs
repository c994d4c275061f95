//! Directable narrow field-of-view sensing shared by the EO sensor and the laser.
//!
//! StandBy → (guide) → Guide → (target in view) → Track → (target lost) → StandBy.

use serde::{Deserialize, Serialize};
use tracing::debug;

use vigil_core::config::{AerBounds, Fov};
use vigil_core::enums::PointingState;
use vigil_core::types::{Aer, ClockInfo, Direction, EntityId, Position};
use vigil_core::view::EntityView;

use crate::detector::{detect_all, Detector};
use crate::entity::Peers;

/// Current lock of a tracking sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lock {
    pub time: f64,
    pub aer: Aer,
    pub target: EntityId,
}

#[derive(Debug, Clone)]
pub struct Pointing {
    origin: Position,
    fov: Fov,
    bounds: AerBounds,
    initial: Direction,
    direction: Direction,
    state: PointingState,
    pending: Option<Direction>,
    lock: Option<Lock>,
    // Per-tick scratch.
    best: Option<(f64, EntityId, Aer)>,
    followed: Option<Aer>,
}

impl Pointing {
    pub fn new(origin: Position, fov: Fov, bounds: AerBounds, direction: Direction) -> Self {
        Self {
            origin,
            fov,
            bounds,
            initial: direction,
            direction,
            state: PointingState::StandBy,
            pending: None,
            lock: None,
            best: None,
            followed: None,
        }
    }

    pub fn state(&self) -> PointingState {
        self.state
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Position) {
        self.origin = origin;
    }

    pub fn pending_guide(&self) -> Option<Direction> {
        self.pending
    }

    pub fn lock(&self) -> Option<&Lock> {
        self.lock.as_ref()
    }

    pub fn locked_target(&self) -> Option<EntityId> {
        self.lock.map(|l| l.target)
    }

    /// Command a new search direction. Applied at the next self-update
    /// unless `immediate`. Taking effect releases any current target.
    pub fn guide(&mut self, direction: Direction, immediate: bool) {
        if immediate {
            self.pending = None;
            self.apply_guide(direction);
        } else {
            self.pending = Some(direction);
        }
    }

    pub fn release(&mut self) {
        self.pending = None;
        self.lock = None;
        self.state = PointingState::StandBy;
    }

    /// Self-update: apply a pending guide.
    pub fn update(&mut self) {
        if let Some(direction) = self.pending.take() {
            self.apply_guide(direction);
        }
    }

    pub fn interact(&mut self, time: &ClockInfo, peers: &Peers) {
        self.best = None;
        self.followed = None;
        if self.state == PointingState::StandBy {
            return;
        }
        detect_all(self, time, peers);
    }

    pub fn reset(&mut self) {
        self.direction = self.initial;
        self.release();
    }

    fn apply_guide(&mut self, direction: Direction) {
        self.direction = direction;
        self.lock = None;
        self.state = PointingState::Guide;
    }
}

impl Detector for Pointing {
    type Measurement = Aer;

    fn need_evaluate(&self, _time: &ClockInfo, target: &EntityView) -> bool {
        match self.state {
            PointingState::StandBy => false,
            PointingState::Guide => target.position.is_some(),
            PointingState::Track => self.locked_target() == Some(target.id),
        }
    }

    fn evaluate(&mut self, _time: &ClockInfo, target: &EntityView) -> Option<Aer> {
        let aer = self.origin.aer_to(&target.position?);
        if aer.range <= 0.0 || !self.bounds.contains(&aer) {
            return None;
        }
        self.fov
            .contains(&self.direction, &aer.direction())
            .then_some(aer)
    }

    fn accept(&mut self, _time: &ClockInfo, target: EntityId, measurement: Option<Aer>) {
        let Some(aer) = measurement else {
            return;
        };
        match self.state {
            PointingState::Guide => {
                let offset = self.direction.offset_to(&aer.direction());
                // Peers arrive in id order, so a strict comparison keeps the lowest id on ties.
                if self.best.map_or(true, |(best, _, _)| offset < best) {
                    self.best = Some((offset, target, aer));
                }
            }
            PointingState::Track => self.followed = Some(aer),
            PointingState::StandBy => {}
        }
    }

    fn finalize(&mut self, time: &ClockInfo, _peers: &Peers) {
        match self.state {
            PointingState::Guide => {
                if let Some((_, target, aer)) = self.best.take() {
                    debug!(target_id = %target, now = time.now, range = aer.range, "lock acquired");
                    self.state = PointingState::Track;
                    self.direction = aer.direction();
                    self.lock = Some(Lock {
                        time: time.now,
                        aer,
                        target,
                    });
                }
            }
            PointingState::Track => match (self.followed.take(), self.lock) {
                (Some(aer), Some(lock)) => {
                    self.direction = aer.direction();
                    self.lock = Some(Lock {
                        time: time.now,
                        aer,
                        target: lock.target,
                    });
                }
                _ => {
                    debug!(target_id = ?self.locked_target(), now = time.now, "lock lost");
                    self.lock = None;
                    self.state = PointingState::StandBy;
                }
            },
            PointingState::StandBy => {}
        }
    }
}
