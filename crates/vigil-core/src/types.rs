//! Fundamental geometric and timing types.

use std::f64::consts::{PI, TAU};
use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Stable identity of an entity inside one scenario.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 3D position in simulation space (meters, Cartesian).
/// x = East, y = North, z = Up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

/// 3D velocity (m/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

/// Azimuth / elevation / range of one point as seen from another.
/// Azimuth is measured from North, clockwise, in `[0, 2π)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aer {
    pub azimuth: f64,
    pub elevation: f64,
    pub range: f64,
}

/// Pointing direction of a directable sensor (radians).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    pub azimuth: f64,
    pub elevation: f64,
}

/// Current simulated time and the effective step that led to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClockInfo {
    pub now: f64,
    pub dt: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Range to another position (3D distance).
    pub fn range_to(&self, other: &Position) -> f64 {
        (other.as_dvec3() - self.as_dvec3()).length()
    }

    /// Bearing to another position in radians (0 = North, clockwise).
    pub fn bearing_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx.atan2(dy).rem_euclid(TAU)
    }

    /// Azimuth, elevation and range of `other` seen from `self`.
    pub fn aer_to(&self, other: &Position) -> Aer {
        let d = other.as_dvec3() - self.as_dvec3();
        let horizontal = d.x.hypot(d.y);
        Aer {
            azimuth: self.bearing_to(other),
            elevation: d.z.atan2(horizontal),
            range: d.length(),
        }
    }

    pub fn as_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Parses either a `[x, y]` / `[x, y, z]` array or an `{x, y, z}` object.
    pub fn from_json(value: &serde_json::Value) -> Option<Position> {
        if let Some(items) = value.as_array() {
            let coords: Option<Vec<f64>> = items.iter().map(|v| v.as_f64()).collect();
            return match coords?.as_slice() {
                [x, y] => Some(Position::new(*x, *y, 0.0)),
                [x, y, z] => Some(Position::new(*x, *y, *z)),
                _ => None,
            };
        }
        serde_json::from_value(value.clone()).ok()
    }
}

impl From<DVec3> for Position {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Speed magnitude.
    pub fn speed(&self) -> f64 {
        self.as_dvec3().length()
    }

    pub fn as_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Component of this velocity along the line of sight `from -> to`.
    /// Negative when closing.
    pub fn radial_speed(&self, from: &Position, to: &Position) -> f64 {
        let los = to.as_dvec3() - from.as_dvec3();
        if los.length_squared() == 0.0 {
            return 0.0;
        }
        self.as_dvec3().dot(los.normalize())
    }
}

impl From<DVec3> for Velocity {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl Aer {
    pub fn direction(&self) -> Direction {
        Direction::new(self.azimuth, self.elevation)
    }
}

impl Direction {
    pub fn new(azimuth: f64, elevation: f64) -> Self {
        Self { azimuth, elevation }
    }

    /// Unit vector in East/North/Up coordinates.
    pub fn unit_vector(&self) -> DVec3 {
        let (sin_el, cos_el) = self.elevation.sin_cos();
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        DVec3::new(cos_el * sin_az, cos_el * cos_az, sin_el)
    }

    /// Total angle between two directions (radians, `[0, π]`).
    pub fn offset_to(&self, other: &Direction) -> f64 {
        self.unit_vector().angle_between(other.unit_vector())
    }
}

/// Wrap an angle to `(-π, π]`.
pub fn wrap_pi(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a > PI {
        a - TAU
    } else {
        a
    }
}

/// Signed smallest difference `a - b` between two angles.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    wrap_pi(a - b)
}
