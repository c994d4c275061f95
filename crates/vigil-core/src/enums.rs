//! Enumeration types shared by the kernel and the sensors.

use serde::{Deserialize, Serialize};

/// Confirmation state of one radar batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackState {
    /// Newly detected, awaiting confirmation.
    #[default]
    Searching,
    /// Confirmed after enough consecutive hits.
    Tracking,
    /// Dropped. Reported once, then removed.
    Cancelled,
}

/// Operating state of a directable sensor (EO or laser).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointingState {
    #[default]
    StandBy,
    /// Searching around a commanded direction.
    Guide,
    /// Locked on a target and following it.
    Track,
}

/// Flight state of a UAV.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UavState {
    /// Following the waypoint route.
    #[default]
    Normal,
    /// Returning to the first waypoint.
    Back,
    /// Arrived back at the first waypoint. Terminal.
    Home,
    /// Navigation denied; drifting on the last velocity.
    GpsLost,
    /// One-way route exhausted. Terminal.
    Over,
}

impl UavState {
    pub fn is_terminal(self) -> bool {
        matches!(self, UavState::Home | UavState::Over)
    }
}

/// What a jammer denies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JammerKind {
    /// Command/control link. Link-budget gated.
    #[default]
    DataLink,
    /// Satellite navigation. Range gated.
    Gps,
}

/// Coarse type tag carried in snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[default]
    Target,
    Radar,
    Optronic,
    Laser,
    Receiver,
    Jammer,
    Uav,
    Custom,
}
