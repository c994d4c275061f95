//! The entity abstraction and the per-hook step context.
//!
//! Entities never hold a reference to their scenario. Everything a hook
//! may touch outside its own fields arrives through [`StepContext`] (clock,
//! outgoing messages, self-deactivation) and [`Peers`] (the frozen
//! snapshot of everyone else).

use std::any::Any;

use vigil_core::enums::EntityKind;
use vigil_core::messages::Message;
use vigil_core::types::{ClockInfo, EntityId};
use vigil_core::view::EntityView;

use crate::bus::{EntityRef, MessageBus};

/// Identity shared by every entity implementation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    /// Assigned when the entity is first added to a scenario, then fixed.
    pub id: Option<EntityId>,
    pub name: String,
}

impl Header {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Id, or the default id before the entity has been added anywhere.
    pub fn id(&self) -> EntityId {
        self.id.unwrap_or_default()
    }

    /// Base view with identity filled in and every capability absent.
    pub fn view(&self, kind: EntityKind) -> EntityView {
        EntityView {
            id: self.id(),
            name: self.name.clone(),
            kind,
            active: true,
            ..EntityView::default()
        }
    }
}

/// A simulated object stepped by a [`crate::Scenario`].
///
/// Hooks run in a fixed order each tick: [`Entity::update`] for every
/// active entity, then [`Entity::interact`] against a snapshot taken after
/// all updates, then [`Entity::on_message`] for queued deliveries.
pub trait Entity: Send + Sync + 'static {
    fn header(&self) -> &Header;
    fn header_mut(&mut self) -> &mut Header;

    fn kind(&self) -> EntityKind;

    /// Read-only view used for interaction snapshots and observers.
    fn view(&self) -> EntityView;

    /// Self-update with the current clock.
    fn update(&mut self, _ctx: &mut StepContext) {}

    /// Pairwise interaction against this tick's snapshot, self excluded.
    fn interact(&mut self, _ctx: &mut StepContext, _peers: &Peers) {}

    fn on_message(&mut self, _ctx: &mut StepContext, _sender: Option<EntityId>, _message: &Message) {}

    /// Return to the initial state. The scenario reactivates the entity first.
    fn reset(&mut self, _ctx: &mut StepContext) {}

    /// Called once when the entity leaves the active set.
    fn on_deactivate(&mut self) {}

    /// Assign a named attribute from a batch action. Returns `false` when
    /// the attribute is unknown or the value has the wrong shape.
    fn set_attribute(&mut self, _name: &str, _value: &serde_json::Value) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// What a hook may do besides mutating its own entity.
pub struct StepContext<'a> {
    id: EntityId,
    time: ClockInfo,
    bus: &'a mut MessageBus,
    deactivate: bool,
}

impl<'a> StepContext<'a> {
    pub fn new(id: EntityId, time: ClockInfo, bus: &'a mut MessageBus) -> Self {
        Self {
            id,
            time,
            bus,
            deactivate: false,
        }
    }

    /// Id of the entity running the hook.
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn time(&self) -> ClockInfo {
        self.time
    }

    pub fn now(&self) -> f64 {
        self.time.now
    }

    pub fn dt(&self) -> f64 {
        self.time.dt
    }

    /// Queue a message for delivery after this tick's interaction phase.
    pub fn send(&mut self, receiver: impl Into<EntityRef>, message: Message) {
        self.bus.push(Some(self.id), receiver.into(), message);
    }

    /// Leave the active set once the hook returns.
    pub fn deactivate(&mut self) {
        self.deactivate = true;
    }

    pub fn is_deactivated(&self) -> bool {
        self.deactivate
    }
}

/// The interaction snapshot as seen by one entity: every active entity
/// except itself, ordered by id.
#[derive(Clone, Copy)]
pub struct Peers<'a> {
    all: &'a [EntityView],
    skip: EntityId,
}

impl<'a> Peers<'a> {
    pub fn new(all: &'a [EntityView], skip: EntityId) -> Self {
        Self { all, skip }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a EntityView> + 'a {
        let skip = self.skip;
        self.all.iter().filter(move |v| v.id != skip)
    }

    pub fn get(&self, id: EntityId) -> Option<&'a EntityView> {
        if id == self.skip {
            return None;
        }
        self.all.iter().find(|v| v.id == id)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
