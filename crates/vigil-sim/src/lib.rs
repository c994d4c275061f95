//! Scenario stepping kernel for VIGIL.
//!
//! Owns the entity store and the clock, runs the three-phase tick
//! (self-update, snapshot interaction, deferred delivery), and provides
//! the detector framework with its concrete sensors and actors.

pub mod actors;
pub mod bus;
pub mod clock;
pub mod detector;
pub mod entity;
pub mod ids;
pub mod listeners;
pub mod rules;
pub mod scenario;
pub mod sensors;

pub use vigil_core as core;

pub use bus::{EntityRef, MessageBus};
pub use entity::{Entity, Header, Peers, StepContext};
pub use scenario::Scenario;
