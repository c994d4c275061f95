//! Construction parameters for the scenario and every entity type.
//!
//! Every struct deserializes from a flat JSON object; absent fields keep
//! their documented defaults. Call [`Validate::validate`] (or
//! [`from_json`]) before handing a config to a constructor.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::JammerKind;
use crate::error::{ConfigError, ConfigResult};
use crate::types::{angle_diff, Aer, Direction, Position, Velocity};

/// Configuration checks shared by all parameter structs.
pub trait Validate {
    fn validate(&self) -> ConfigResult<()>;
}

/// Deserialize and validate a config from JSON.
pub fn from_json<T: DeserializeOwned + Validate>(value: &serde_json::Value) -> ConfigResult<T> {
    let config: T = serde_json::from_value(value.clone())?;
    config.validate()?;
    Ok(config)
}

fn finite(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> ConfigResult<()> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> ConfigResult<()> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn at_least(field: &'static str, min: u32, value: u32) -> ConfigResult<()> {
    if value >= min {
        Ok(())
    } else {
        Err(ConfigError::TooSmall { field, min, value })
    }
}

fn ordered(field: &'static str, min: Option<f64>, max: Option<f64>) -> ConfigResult<()> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(ConfigError::InvalidBounds { field, min, max }),
        _ => Ok(()),
    }
}

// --- Gates ---

/// Inclusive azimuth / elevation / range window. Unset limits are open.
///
/// Azimuths are in `[0, 2π)`. A window whose `min_azimuth` exceeds its
/// `max_azimuth` wraps through North.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AerBounds {
    pub min_azimuth: Option<f64>,
    pub max_azimuth: Option<f64>,
    pub min_elevation: Option<f64>,
    pub max_elevation: Option<f64>,
    pub min_range: Option<f64>,
    pub max_range: Option<f64>,
}

impl AerBounds {
    /// Range-only gate.
    pub fn within(max_range: f64) -> Self {
        Self {
            max_range: Some(max_range),
            ..Self::default()
        }
    }

    pub fn contains(&self, aer: &Aer) -> bool {
        let azimuth_ok = match (self.min_azimuth, self.max_azimuth) {
            (Some(min), Some(max)) if min > max => aer.azimuth >= min || aer.azimuth <= max,
            (min, max) => {
                min.map_or(true, |m| aer.azimuth >= m) && max.map_or(true, |m| aer.azimuth <= m)
            }
        };
        azimuth_ok
            && self.min_elevation.map_or(true, |m| aer.elevation >= m)
            && self.max_elevation.map_or(true, |m| aer.elevation <= m)
            && self.min_range.map_or(true, |m| aer.range >= m)
            && self.max_range.map_or(true, |m| aer.range <= m)
    }
}

impl Validate for AerBounds {
    fn validate(&self) -> ConfigResult<()> {
        ordered("elevation", self.min_elevation, self.max_elevation)?;
        ordered("range", self.min_range, self.max_range)?;
        if let Some(r) = self.min_range {
            non_negative("min_range", r)?;
        }
        Ok(())
    }
}

/// Field of view of a directable sensor, relative to its boresight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Fov {
    Cone { half_angle: f64 },
    Rect { half_azimuth: f64, half_elevation: f64 },
}

impl Default for Fov {
    fn default() -> Self {
        Fov::Cone {
            half_angle: DEFAULT_FOV_HALF_ANGLE,
        }
    }
}

impl Fov {
    pub fn contains(&self, boresight: &Direction, target: &Direction) -> bool {
        match *self {
            Fov::Cone { half_angle } => boresight.offset_to(target) <= half_angle,
            Fov::Rect {
                half_azimuth,
                half_elevation,
            } => {
                angle_diff(target.azimuth, boresight.azimuth).abs() <= half_azimuth
                    && (target.elevation - boresight.elevation).abs() <= half_elevation
            }
        }
    }
}

impl Validate for Fov {
    fn validate(&self) -> ConfigResult<()> {
        match *self {
            Fov::Cone { half_angle } => positive("fov.half_angle", half_angle),
            Fov::Rect {
                half_azimuth,
                half_elevation,
            } => {
                positive("fov.half_azimuth", half_azimuth)?;
                positive("fov.half_elevation", half_elevation)
            }
        }
    }
}

// --- Scenario ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub start: f64,
    /// `None` runs until the caller stops stepping.
    pub end: Option<f64>,
    pub dt: f64,
    /// Pace `run()` against the wall clock.
    pub realtime: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            start: DEFAULT_START,
            end: Some(DEFAULT_END),
            dt: DEFAULT_DT,
            realtime: false,
        }
    }
}

impl Validate for ScenarioConfig {
    fn validate(&self) -> ConfigResult<()> {
        finite("start", self.start)?;
        positive("dt", self.dt)?;
        if let Some(end) = self.end {
            finite("end", end)?;
            if end < self.start {
                return Err(ConfigError::EndBeforeStart {
                    start: self.start,
                    end,
                });
            }
        }
        Ok(())
    }
}

// --- Radar ---

/// Standard deviations of the Gaussian measurement errors. Zero disables an axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarNoise {
    pub azimuth_sigma: f64,
    pub elevation_sigma: f64,
    pub range_sigma: f64,
}

impl RadarNoise {
    pub fn is_off(&self) -> bool {
        self.azimuth_sigma == 0.0 && self.elevation_sigma == 0.0 && self.range_sigma == 0.0
    }
}

impl Validate for RadarNoise {
    fn validate(&self) -> ConfigResult<()> {
        non_negative("noise.azimuth_sigma", self.azimuth_sigma)?;
        non_negative("noise.elevation_sigma", self.elevation_sigma)?;
        non_negative("noise.range_sigma", self.range_sigma)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub name: String,
    pub position: Position,
    /// Seconds per search revolution.
    pub search_rate: f64,
    /// Seconds between confirmed-track updates.
    pub track_rate: f64,
    pub search_num: u32,
    pub cancel_num: u32,
    /// Doppler gate: targets slower than this along the line of sight are invisible.
    pub min_radial_speed: Option<f64>,
    pub bounds: AerBounds,
    pub noise: RadarNoise,
    /// Seed of the measurement noise generator.
    pub seed: u64,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            name: "radar".into(),
            position: Position::default(),
            search_rate: RADAR_SEARCH_RATE,
            track_rate: RADAR_TRACK_RATE,
            search_num: RADAR_SEARCH_NUM,
            cancel_num: RADAR_CANCEL_NUM,
            min_radial_speed: None,
            bounds: AerBounds::default(),
            noise: RadarNoise::default(),
            seed: 0,
        }
    }
}

impl Validate for RadarConfig {
    fn validate(&self) -> ConfigResult<()> {
        positive("search_rate", self.search_rate)?;
        positive("track_rate", self.track_rate)?;
        at_least("search_num", 1, self.search_num)?;
        at_least("cancel_num", 1, self.cancel_num)?;
        if let Some(speed) = self.min_radial_speed {
            non_negative("min_radial_speed", speed)?;
        }
        self.bounds.validate()?;
        self.noise.validate()
    }
}

// --- Electro-optical ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptronicConfig {
    pub name: String,
    pub position: Position,
    pub fov: Fov,
    pub bounds: AerBounds,
    /// Initial boresight.
    pub direction: Direction,
}

impl Default for OptronicConfig {
    fn default() -> Self {
        Self {
            name: "eo".into(),
            position: Position::default(),
            fov: Fov::default(),
            bounds: AerBounds::default(),
            direction: Direction::default(),
        }
    }
}

impl Validate for OptronicConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.fov.validate()?;
        self.bounds.validate()
    }
}

// --- Laser ---

/// One point of a laser's capacity curve: time to destroy one unit of
/// damage at the given range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityPoint {
    pub range: f64,
    pub kill_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaserConfig {
    pub name: String,
    pub position: Position,
    pub fov: Fov,
    pub bounds: AerBounds,
    pub direction: Direction,
    pub power: f64,
    /// Seconds of emission a full battery sustains.
    pub work: f64,
    /// Seconds to recharge an empty battery.
    pub recover: f64,
    pub near: CapacityPoint,
    pub far: CapacityPoint,
    pub power_on: bool,
}

impl Default for LaserConfig {
    fn default() -> Self {
        Self {
            name: "laser".into(),
            position: Position::default(),
            fov: Fov::default(),
            bounds: AerBounds::default(),
            direction: Direction::default(),
            power: LASER_POWER,
            work: LASER_WORK_SECS,
            recover: LASER_RECOVER_SECS,
            near: CapacityPoint {
                range: LASER_NEAR_RANGE,
                kill_time: LASER_NEAR_KILL_SECS,
            },
            far: CapacityPoint {
                range: LASER_FAR_RANGE,
                kill_time: LASER_FAR_KILL_SECS,
            },
            power_on: false,
        }
    }
}

impl LaserConfig {
    /// Damage per second delivered at `range`.
    ///
    /// `power / kill_time`, with the kill time constant inside the near
    /// range, linear between the two capacity points and the rate zero past
    /// the far range.
    pub fn damage_rate(&self, range: f64) -> f64 {
        if range > self.far.range {
            return 0.0;
        }
        let kill_time = if range <= self.near.range {
            self.near.kill_time
        } else {
            let t = (range - self.near.range) / (self.far.range - self.near.range);
            self.near.kill_time + t * (self.far.kill_time - self.near.kill_time)
        };
        self.power / kill_time
    }
}

impl Validate for LaserConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.fov.validate()?;
        self.bounds.validate()?;
        non_negative("power", self.power)?;
        positive("work", self.work)?;
        positive("recover", self.recover)?;
        positive("near.kill_time", self.near.kill_time)?;
        positive("far.kill_time", self.far.kill_time)?;
        non_negative("near.range", self.near.range)?;
        if self.near.range >= self.far.range {
            return Err(ConfigError::InvalidBounds {
                field: "capacity range",
                min: self.near.range,
                max: self.far.range,
            });
        }
        Ok(())
    }
}

// --- Receiver ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    pub name: String,
    pub position: Position,
    /// Minimum seconds between refreshed bearings of one emitter. Zero refreshes every tick.
    pub rate: f64,
    pub bounds: AerBounds,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            name: "receiver".into(),
            position: Position::default(),
            rate: RECEIVER_RATE,
            bounds: AerBounds::default(),
        }
    }
}

impl Validate for ReceiverConfig {
    fn validate(&self) -> ConfigResult<()> {
        non_negative("rate", self.rate)?;
        self.bounds.validate()
    }
}

// --- Jammer ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JammerConfig {
    pub name: String,
    pub position: Position,
    pub kind: JammerKind,
    pub power: f64,
    pub max_range: f64,
    pub power_on: bool,
}

impl Default for JammerConfig {
    fn default() -> Self {
        Self {
            name: "jammer".into(),
            position: Position::default(),
            kind: JammerKind::default(),
            power: JAMMER_POWER,
            max_range: JAMMER_MAX_RANGE,
            power_on: false,
        }
    }
}

impl Validate for JammerConfig {
    fn validate(&self) -> ConfigResult<()> {
        non_negative("power", self.power)?;
        positive("max_range", self.max_range)
    }
}

// --- UAV ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UavConfig {
    pub name: String,
    /// Route; the first waypoint is both start and home.
    pub waypoints: Vec<Position>,
    pub speed: f64,
    /// Endurance in seconds.
    pub life: f64,
    pub cross_section: Option<f64>,
    pub signal: Option<f64>,
    pub damage: Option<f64>,
    /// Return home when the route is exhausted instead of ending the mission.
    pub two_way: bool,
    pub link_margin: f64,
}

impl Default for UavConfig {
    fn default() -> Self {
        Self {
            name: "uav".into(),
            waypoints: Vec::new(),
            speed: UAV_SPEED,
            life: UAV_LIFE_SECS,
            cross_section: Some(UAV_CROSS_SECTION),
            signal: None,
            damage: None,
            two_way: true,
            link_margin: UAV_LINK_MARGIN,
        }
    }
}

impl Validate for UavConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.waypoints.len() < 2 {
            return Err(ConfigError::RouteTooShort(self.waypoints.len()));
        }
        positive("speed", self.speed)?;
        positive("life", self.life)?;
        positive("link_margin", self.link_margin)
    }
}

// --- Scripted target ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub name: String,
    pub position: Position,
    pub velocity: Velocity,
    pub cross_section: Option<f64>,
    pub signal: Option<f64>,
    pub damage: Option<f64>,
    /// Seconds before the target deactivates on its own.
    pub life: Option<f64>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            name: "target".into(),
            position: Position::default(),
            velocity: Velocity::default(),
            cross_section: None,
            signal: None,
            damage: None,
            life: None,
        }
    }
}

impl Validate for TargetConfig {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(life) = self.life {
            positive("life", life)?;
        }
        Ok(())
    }
}
