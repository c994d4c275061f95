//! Entity id allocation, owned by one scenario.

use vigil_core::types::EntityId;

/// Hands out increasing entity ids starting at 1.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// Record an id assigned elsewhere so it is never handed out again.
    pub fn observe(&mut self, id: EntityId) {
        if id.0 >= self.next {
            self.next = id.0 + 1;
        }
    }
}
