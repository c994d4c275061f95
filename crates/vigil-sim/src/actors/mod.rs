//! Effectors and moving bodies.

pub mod jammer;
pub mod target;
pub mod uav;

pub use jammer::Jammer;
pub use target::Target;
pub use uav::Uav;
