//! Default parameters and tolerances.

// --- Scenario clock ---

pub const DEFAULT_START: f64 = 0.0;
pub const DEFAULT_END: f64 = 10.0;
pub const DEFAULT_DT: f64 = 0.1;

/// Fraction of `dt` by which `now` may overshoot `end` and still run.
pub const CLOCK_END_TOLERANCE: f64 = 1e-6;

/// Fraction of `dt` within which a time-triggered listener fires.
pub const TIME_EVENT_TOLERANCE: f64 = 0.1;

// --- Radar ---

/// Seconds per full 360° search revolution.
pub const RADAR_SEARCH_RATE: f64 = 6.0;

/// Seconds between updates of a confirmed track.
pub const RADAR_TRACK_RATE: f64 = 1.0;

/// Consecutive hits needed to confirm a batch.
pub const RADAR_SEARCH_NUM: u32 = 3;

/// Consecutive misses that cancel a confirmed batch.
pub const RADAR_CANCEL_NUM: u32 = 3;

/// Slack on the search revisit interval (multiples of `dt`).
pub const RADAR_REVISIT_SLACK: f64 = 1.01;

// --- EO / laser ---

/// Default cone half angle (1°).
pub const DEFAULT_FOV_HALF_ANGLE: f64 = std::f64::consts::PI / 180.0;

pub const LASER_POWER: f64 = 1.0;

/// Seconds of continuous emission on a full battery.
pub const LASER_WORK_SECS: f64 = 120.0;

/// Seconds to recharge from empty.
pub const LASER_RECOVER_SECS: f64 = 300.0;

pub const LASER_NEAR_RANGE: f64 = 200.0;
pub const LASER_NEAR_KILL_SECS: f64 = 1.0;
pub const LASER_FAR_RANGE: f64 = 1000.0;
pub const LASER_FAR_KILL_SECS: f64 = 2.0;

// --- Receiver ---

/// Seconds between refreshed bearings per emitter.
pub const RECEIVER_RATE: f64 = 1.0;

// --- Jammer ---

pub const JAMMER_POWER: f64 = 10.0;
pub const JAMMER_MAX_RANGE: f64 = 100.0;

// --- UAV ---

pub const UAV_SPEED: f64 = 1.0;
pub const UAV_LIFE_SECS: f64 = 60.0;
pub const UAV_CROSS_SECTION: f64 = 0.01;

/// Received jammer power (power / d²) above which the data link is lost.
pub const UAV_LINK_MARGIN: f64 = 0.01;

/// Floor on jammer distance in the link budget.
pub const LINK_MIN_DISTANCE: f64 = 1.0;
