//! Step listeners: callbacks run at the end of every tick.

use vigil_core::constants::TIME_EVENT_TOLERANCE;

use crate::scenario::Scenario;

pub type Listener = Box<dyn FnMut(&mut Scenario)>;

fn is_due(scenario: &Scenario, at: f64) -> bool {
    let now = scenario.clock_info().now;
    (now - at).abs() <= TIME_EVENT_TOLERANCE * scenario.clock().dt()
}

/// Listener firing on the tick at simulated time `at`.
pub fn at_time(
    at: f64,
    mut f: impl FnMut(&mut Scenario) + 'static,
) -> impl FnMut(&mut Scenario) + 'static {
    move |scenario: &mut Scenario| {
        if is_due(scenario, at) {
            f(scenario);
        }
    }
}

/// Listener firing on each tick matching one of `times`.
pub fn at_times(
    times: &[f64],
    mut f: impl FnMut(&mut Scenario) + 'static,
) -> impl FnMut(&mut Scenario) + 'static {
    let times = times.to_vec();
    move |scenario: &mut Scenario| {
        if times.iter().any(|&at| is_due(scenario, at)) {
            f(scenario);
        }
    }
}
