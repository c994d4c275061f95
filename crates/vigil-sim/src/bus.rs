//! Deferred point-to-point message delivery.

use vigil_core::messages::Message;
use vigil_core::types::EntityId;

/// Ways to name an entity inside a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    Id(EntityId),
    /// First match by name, lowest id winning among duplicates.
    Name(String),
    Handle(hecs::Entity),
}

impl From<EntityId> for EntityRef {
    fn from(id: EntityId) -> Self {
        EntityRef::Id(id)
    }
}

impl From<&str> for EntityRef {
    fn from(name: &str) -> Self {
        EntityRef::Name(name.to_owned())
    }
}

impl From<String> for EntityRef {
    fn from(name: String) -> Self {
        EntityRef::Name(name)
    }
}

impl From<hecs::Entity> for EntityRef {
    fn from(handle: hecs::Entity) -> Self {
        EntityRef::Handle(handle)
    }
}

/// One queued delivery. `sender` is `None` for messages posted from outside
/// the scenario.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub sender: Option<EntityId>,
    pub receiver: EntityRef,
    pub message: Message,
}

/// Messages queued during a tick, flushed once after interaction.
#[derive(Debug, Default)]
pub struct MessageBus {
    queue: Vec<Envelope>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sender: Option<EntityId>, receiver: EntityRef, message: Message) {
        self.queue.push(Envelope {
            sender,
            receiver,
            message,
        });
    }

    /// Take everything queued so far. Messages pushed while the returned
    /// batch is being delivered wait for the next flush.
    pub fn drain(&mut self) -> Vec<Envelope> {
        std::mem::take(&mut self.queue)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
