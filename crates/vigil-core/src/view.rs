//! Read-only entity views, the per-tick interaction snapshot, and the
//! serializable world snapshot handed to observers.

use serde::{Deserialize, Serialize};

use crate::enums::{EntityKind, JammerKind};
use crate::types::{ClockInfo, EntityId, Position, Velocity};

/// Everything interaction rules may read about another entity.
///
/// Optional fields are capabilities: a radar only sees peers with a
/// `cross_section`, a receiver only peers with a `signal`, and only peers
/// with `damage` can be destroyed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    pub active: bool,
    pub position: Option<Position>,
    pub velocity: Option<Velocity>,
    /// Radar cross section (m²).
    pub cross_section: Option<f64>,
    /// Emitted signal strength.
    pub signal: Option<f64>,
    /// Remaining structural damage capacity.
    pub damage: Option<f64>,
    pub jammer: Option<JammerView>,
    pub beam: Option<BeamView>,
}

/// Jamming capability of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JammerView {
    pub kind: JammerKind,
    pub power_on: bool,
    pub power: f64,
    pub max_range: f64,
}

/// Output of a directed-energy emitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamView {
    pub power_on: bool,
    /// Locked target, if any.
    pub target: Option<EntityId>,
    /// Damage per second delivered to `target`.
    pub damage_rate: f64,
}

impl BeamView {
    /// Damage per second this beam currently delivers to `id`.
    pub fn rate_on(&self, id: EntityId) -> f64 {
        if self.power_on && self.target == Some(id) {
            self.damage_rate
        } else {
            0.0
        }
    }
}

/// State of the whole scenario at one instant, ordered by entity id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: ClockInfo,
    pub entities: Vec<EntityView>,
}

impl WorldSnapshot {
    pub fn get(&self, id: EntityId) -> Option<&EntityView> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn active(&self) -> impl Iterator<Item = &EntityView> {
        self.entities.iter().filter(|e| e.active)
    }
}
