//! Generic per-tick detection protocol.
//!
//! A detector looks at every peer in the interaction snapshot: it decides
//! whether the peer is due for evaluation, evaluates it, and accepts the
//! (possibly empty) measurement. After all peers, [`Detector::finalize`]
//! turns the tick's raw results into public state.

use vigil_core::types::{ClockInfo, EntityId};
use vigil_core::view::EntityView;

use crate::entity::Peers;

pub trait Detector {
    type Measurement;

    fn need_evaluate(&self, time: &ClockInfo, target: &EntityView) -> bool;

    /// Measure one target. `None` means "not detected", never an error.
    fn evaluate(&mut self, time: &ClockInfo, target: &EntityView) -> Option<Self::Measurement>;

    /// Record the outcome for every evaluated target, hit or miss.
    fn accept(&mut self, time: &ClockInfo, target: EntityId, measurement: Option<Self::Measurement>);

    /// Post-process once after every peer has been considered.
    fn finalize(&mut self, time: &ClockInfo, peers: &Peers);
}

/// Run one tick of `detector` over the snapshot, in id order.
pub fn detect_all<D: Detector + ?Sized>(detector: &mut D, time: &ClockInfo, peers: &Peers) {
    for target in peers.iter() {
        if detector.need_evaluate(time, target) {
            let measurement = detector.evaluate(time, target);
            detector.accept(time, target.id, measurement);
        }
    }
    detector.finalize(time, peers);
}
