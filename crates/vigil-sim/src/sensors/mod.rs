//! Concrete detectors.

pub mod laser;
pub mod optronic;
pub mod pointing;
pub mod radar;
pub mod receiver;

pub use laser::Laser;
pub use optronic::Optronic;
pub use pointing::{Lock, Pointing};
pub use radar::{Radar, RadarReport, RadarTrack};
pub use receiver::{Receiver, ReceiverReport};
