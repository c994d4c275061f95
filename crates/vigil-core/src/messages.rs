//! Messages exchanged between entities through the scenario's bus.
//!
//! Messages are queued during a tick and delivered once, after the
//! interaction phase, to receivers that are still active.

use serde::{Deserialize, Serialize};

use crate::types::Direction;

/// Payload of one queued delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    // --- Directable sensors ---
    /// Point the sensor at `direction`. Applied on the receiver's next
    /// self-update unless `immediate`.
    Guide {
        direction: Direction,
        #[serde(default)]
        immediate: bool,
    },
    /// Drop any lock and return to standby.
    Release,

    // --- Emitters ---
    /// Switch emission on or off. `None` toggles.
    Power {
        #[serde(default)]
        on: Option<bool>,
    },

    // --- Free form ---
    Text { body: String },
    Custom { payload: serde_json::Value },
}
