//! The scenario kernel.
//!
//! `Scenario` owns a hecs world holding every entity (an [`Identity`] plus
//! its boxed behaviour in a [`Body`]), the clock, the message bus and the
//! step listeners. Each [`Scenario::step`] runs, in order:
//!
//! 1. clock advance (finished → `None`, nothing else runs)
//! 2. self-update of every active entity
//! 3. snapshot of the entities still active
//! 4. interaction of every active entity against that snapshot
//! 5. message delivery to active receivers
//! 6. step listeners, in registration order
//!
//! Entities are visited in id order in every phase, and interaction only
//! reads the snapshot, so the outcome of a tick does not depend on the
//! order entities were added in.

use hecs::World;
use tracing::{debug, info, trace};

use vigil_core::config::{ScenarioConfig, Validate};
use vigil_core::error::ConfigResult;
use vigil_core::messages::Message;
use vigil_core::types::{ClockInfo, EntityId};
use vigil_core::view::{EntityView, WorldSnapshot};

use crate::bus::{EntityRef, MessageBus};
use crate::clock::Clock;
use crate::entity::{Entity, Peers, StepContext};
use crate::ids::IdAllocator;
use crate::listeners::Listener;

/// Identity and activity of one stored entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: EntityId,
    pub active: bool,
}

/// The entity behaviour stored in the world.
pub struct Body(pub Box<dyn Entity>);

pub struct Scenario {
    world: World,
    clock: Clock,
    ids: IdAllocator,
    bus: MessageBus,
    listeners: Vec<Listener>,
}

impl Scenario {
    pub fn new(config: ScenarioConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            world: World::new(),
            clock: Clock::new(&config),
            ids: IdAllocator::new(),
            bus: MessageBus::new(),
            listeners: Vec::new(),
        })
    }

    pub fn from_json(value: &serde_json::Value) -> ConfigResult<Self> {
        Self::new(vigil_core::config::from_json(value)?)
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn clock_info(&self) -> ClockInfo {
        self.clock.info()
    }

    /// Get a read-only reference to the entity store.
    pub fn world(&self) -> &World {
        &self.world
    }

    // --- Membership ---

    /// Add an entity and return its id. An entity keeps the id it already
    /// carries unless another entity here holds it, in which case it is
    /// given a fresh one.
    pub fn add(&mut self, entity: impl Entity) -> EntityId {
        self.add_boxed(Box::new(entity))
    }

    pub fn add_boxed(&mut self, mut entity: Box<dyn Entity>) -> EntityId {
        let id = match entity.header().id {
            Some(id) if self.handle(&EntityRef::Id(id), false).is_none() => {
                self.ids.observe(id);
                id
            }
            taken => {
                let id = self.ids.allocate();
                if let Some(old) = taken {
                    debug!(%old, new = %id, "entity id already taken, reassigned");
                }
                entity.header_mut().id = Some(id);
                id
            }
        };
        debug!(%id, name = %entity.header().name, kind = ?entity.kind(), "entity added");
        self.world.spawn((Identity { id, active: true }, Body(entity)));
        id
    }

    /// Remove an entity, handing it back. It keeps its id.
    pub fn remove(&mut self, entity: impl Into<EntityRef>) -> Option<Box<dyn Entity>> {
        let handle = self.handle(&entity.into(), false)?;
        let (identity, body) = self.world.remove::<(Identity, Body)>(handle).ok()?;
        let _ = self.world.despawn(handle);
        debug!(id = %identity.id, "entity removed");
        Some(body.0)
    }

    pub fn clear(&mut self) {
        self.world.clear();
        self.bus.clear();
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }

    // --- Lookup ---

    /// Id of the entity named by `entity`, skipping inactive ones when `active_only`.
    pub fn find(&self, entity: impl Into<EntityRef>, active_only: bool) -> Option<EntityId> {
        let handle = self.handle(&entity.into(), active_only)?;
        self.world.get::<&Identity>(handle).ok().map(|i| i.id)
    }

    pub fn is_active(&self, entity: impl Into<EntityRef>) -> bool {
        self.find(entity, true).is_some()
    }

    /// hecs handle of an entity.
    pub fn handle(&self, entity: &EntityRef, active_only: bool) -> Option<hecs::Entity> {
        match entity {
            EntityRef::Handle(handle) => {
                let identity = self.world.get::<&Identity>(*handle).ok()?;
                (!active_only || identity.active).then_some(*handle)
            }
            EntityRef::Id(id) => self
                .world
                .query::<&Identity>()
                .iter()
                .find(|(_, identity)| identity.id == *id && (!active_only || identity.active))
                .map(|(handle, _)| handle),
            EntityRef::Name(name) => self
                .world
                .query::<(&Identity, &Body)>()
                .iter()
                .filter(|(_, (identity, body))| {
                    body.0.header().name == *name && (!active_only || identity.active)
                })
                .min_by_key(|(_, (identity, _))| identity.id)
                .map(|(handle, _)| handle),
        }
    }

    /// Run `f` on a concrete entity type.
    pub fn inspect<T: Entity, R>(
        &self,
        entity: impl Into<EntityRef>,
        f: impl FnOnce(&T) -> R,
    ) -> Option<R> {
        let handle = self.handle(&entity.into(), false)?;
        let body = self.world.get::<&Body>(handle).ok()?;
        body.0.as_any().downcast_ref::<T>().map(f)
    }

    /// Mutable access to a concrete entity type, for use between steps.
    pub fn get_mut<T: Entity>(&mut self, entity: impl Into<EntityRef>) -> Option<&mut T> {
        let handle = self.handle(&entity.into(), false)?;
        let body = self.world.query_one_mut::<&mut Body>(handle).ok()?;
        body.0.as_any_mut().downcast_mut::<T>()
    }

    /// All entity ids, ascending.
    pub fn entities(&self) -> Vec<EntityId> {
        self.ordered(false).into_iter().map(|(id, _)| id).collect()
    }

    pub fn active_entities(&self) -> Vec<EntityId> {
        self.ordered(true).into_iter().map(|(id, _)| id).collect()
    }

    /// Views of all (or only active) entities, ascending by id.
    pub fn views(&self, active_only: bool) -> Vec<EntityView> {
        let mut views: Vec<EntityView> = self
            .world
            .query::<(&Identity, &Body)>()
            .iter()
            .filter(|(_, (identity, _))| !active_only || identity.active)
            .map(|(_, (identity, body))| {
                let mut view = body.0.view();
                view.id = identity.id;
                view.active = identity.active;
                view
            })
            .collect();
        views.sort_by_key(|v| v.id);
        views
    }

    /// Serializable state of the whole scenario.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            time: self.clock.info(),
            entities: self.views(false),
        }
    }

    // --- Control ---

    /// Queue a message from outside the scenario for the next delivery phase.
    pub fn post(&mut self, receiver: impl Into<EntityRef>, message: Message) {
        self.bus.push(None, receiver.into(), message);
    }

    pub fn pending_messages(&self) -> usize {
        self.bus.len()
    }

    /// Register a callback run at the end of every step.
    pub fn add_listener(&mut self, listener: impl FnMut(&mut Scenario) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply `"entity_name.attribute" -> value` assignments. Unknown
    /// entities, unknown attributes and malformed keys are skipped.
    /// Returns how many assignments took effect.
    pub fn apply_actions(&mut self, actions: &serde_json::Map<String, serde_json::Value>) -> usize {
        let mut applied = 0;
        for (key, value) in actions {
            let Some((name, attribute)) = key.split_once('.') else {
                debug!(%key, "action dropped: expected entity.attribute");
                continue;
            };
            let Some(handle) = self.handle(&EntityRef::from(name), false) else {
                debug!(%key, "action dropped: no such entity");
                continue;
            };
            let time = self.clock.info();
            let Ok((identity, body)) = self.world.query_one_mut::<(&mut Identity, &mut Body)>(handle)
            else {
                continue;
            };
            let done = if attribute == "active" {
                match value.as_bool() {
                    Some(active) => {
                        if identity.active && !active {
                            body.0.on_deactivate();
                        }
                        identity.active = active;
                        true
                    }
                    None => false,
                }
            } else {
                body.0.set_attribute(attribute, value)
            };
            if done {
                applied += 1;
            } else {
                debug!(%key, now = time.now, "action dropped: attribute rejected");
            }
        }
        applied
    }

    /// Reactivate every entity, reset its state and the clock. Queued
    /// messages are discarded.
    pub fn reset(&mut self) -> ClockInfo {
        let time = self.clock.reset();
        self.bus.clear();
        for (_, handle) in self.ordered(false) {
            if let Ok(identity) = self.world.query_one_mut::<&mut Identity>(handle) {
                identity.active = true;
            }
            self.run_hook(handle, time, |body, ctx| body.reset(ctx));
        }
        info!(now = time.now, entities = self.len(), "scenario reset");
        time
    }

    /// Advance one tick. Returns `None` once the clock is finished.
    pub fn step(&mut self) -> Option<ClockInfo> {
        let time = self.clock.advance()?;
        trace!(now = time.now, dt = time.dt, "step");

        for (_, handle) in self.ordered(true) {
            self.run_hook(handle, time, |body, ctx| body.update(ctx));
        }

        let snapshot = self.views(true);
        for (id, handle) in self.ordered(true) {
            let peers = Peers::new(&snapshot, id);
            self.run_hook(handle, time, |body, ctx| body.interact(ctx, &peers));
        }

        self.deliver(time);
        self.notify_listeners();
        Some(time)
    }

    /// Step until the clock finishes. With no end time this never returns.
    pub fn run(&mut self) -> ClockInfo {
        let mut ticks = 0u64;
        while self.step().is_some() {
            ticks += 1;
        }
        let time = self.clock.info();
        info!(ticks, now = time.now, "run complete");
        time
    }

    // --- Internals ---

    fn ordered(&self, active_only: bool) -> Vec<(EntityId, hecs::Entity)> {
        let mut order: Vec<(EntityId, hecs::Entity)> = self
            .world
            .query::<&Identity>()
            .iter()
            .filter(|(_, identity)| !active_only || identity.active)
            .map(|(handle, identity)| (identity.id, handle))
            .collect();
        order.sort_by_key(|(id, _)| *id);
        order
    }

    /// Run one hook with a fresh context, then apply a requested deactivation.
    fn run_hook(
        &mut self,
        handle: hecs::Entity,
        time: ClockInfo,
        hook: impl FnOnce(&mut dyn Entity, &mut StepContext),
    ) {
        let Ok((identity, body)) = self.world.query_one_mut::<(&mut Identity, &mut Body)>(handle)
        else {
            return;
        };
        let mut ctx = StepContext::new(identity.id, time, &mut self.bus);
        hook(body.0.as_mut(), &mut ctx);
        if ctx.is_deactivated() && identity.active {
            identity.active = false;
            body.0.on_deactivate();
            debug!(id = %identity.id, now = time.now, "entity deactivated");
        }
    }

    fn deliver(&mut self, time: ClockInfo) {
        for envelope in self.bus.drain() {
            let Some(handle) = self.handle(&envelope.receiver, true) else {
                debug!(receiver = ?envelope.receiver, "message dropped: receiver missing or inactive");
                continue;
            };
            let sender = envelope.sender;
            let message = envelope.message;
            self.run_hook(handle, time, |body, ctx| body.on_message(ctx, sender, &message));
        }
    }

    fn notify_listeners(&mut self) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in listeners.iter_mut() {
            listener(self);
        }
        // Keep listeners registered from inside a callback.
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
    }
}
