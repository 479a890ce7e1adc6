//! Math value types the host emits pre-typed.
//!
//! These cross the boundary as their own tagged-value variants, never as
//! generic composites, so they stay plain data carriers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 3D position / direction vector, f32 components as the host sends them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Rotation in radians. The host emits rotations as a plain vector; the
/// component mapping (x, y, z) -> (roll, pitch, yaw) happens at coercion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl Rotation {
    pub const ZERO: Rotation = Rotation {
        roll: 0.0,
        pitch: 0.0,
        yaw: 0.0,
    };

    #[must_use]
    pub const fn new(roll: f32, pitch: f32, yaw: f32) -> Self {
        Self { roll, pitch, yaw }
    }
}

impl From<Vec3> for Rotation {
    fn from(v: Vec3) -> Self {
        Rotation {
            roll: v.x,
            pitch: v.y,
            yaw: v.z,
        }
    }
}

impl From<Rotation> for Vec3 {
    fn from(r: Rotation) -> Self {
        Vec3 {
            x: r.roll,
            y: r.pitch,
            z: r.yaw,
        }
    }
}

/// RGBA color, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const ZERO: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}
