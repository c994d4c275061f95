//! Core types for the VIGIL scenario kernel.
//!
//! This crate defines the vocabulary shared by the flight controller and
//! the simulation: geometry, state enums, configuration, messages and
//! snapshot views. It has no dependency on the stepping kernel.

pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod messages;
pub mod types;
pub mod view;

pub use error::{ConfigError, ConfigResult};
