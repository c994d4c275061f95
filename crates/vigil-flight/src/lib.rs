//! UAV flight control for VIGIL.
//!
//! Route following and the jam-response state machine, as pure functions
//! over plain data. The simulation owns the UAV entity and feeds these
//! functions once per tick.

pub mod fsm;
pub mod route;

pub use vigil_core as core;

#[cfg(test)]
mod tests;
