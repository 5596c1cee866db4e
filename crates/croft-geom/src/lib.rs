//! Minimal geometry types for the building core (no renderer dependency).
#![forbid(unsafe_code)]

use core::ops::{Add, AddAssign, Mul, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
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

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn length_sq(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    #[inline]
    pub fn distance_sq(self, other: Vec3) -> f32 {
        (self - other).length_sq()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Rotate a vector by yaw degrees around the Y axis, preserving Y.
#[inline]
pub fn rotate_yaw(v: Vec3, yaw_deg: f32) -> Vec3 {
    let r = yaw_deg.to_radians();
    let (s, c) = r.sin_cos();
    Vec3 {
        x: v.x * c - v.z * s,
        y: v.y,
        z: v.x * s + v.z * c,
    }
}

#[inline]
pub fn rotate_yaw_inv(v: Vec3, yaw_deg: f32) -> Vec3 {
    rotate_yaw(v, -yaw_deg)
}

/// Rigid placement of a piece in the world: translation plus a yaw about Y.
/// Building geometry only ever rotates in 90-degree steps, but the type does
/// not assume that.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    pub pos: Vec3,
    pub yaw_deg: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        pos: Vec3::ZERO,
        yaw_deg: 0.0,
    };

    #[inline]
    pub const fn new(pos: Vec3, yaw_deg: f32) -> Self {
        Self { pos, yaw_deg }
    }

    #[inline]
    pub const fn from_pos(pos: Vec3) -> Self {
        Self { pos, yaw_deg: 0.0 }
    }

    /// Map a local-space point into the parent space.
    #[inline]
    pub fn apply(&self, p: Vec3) -> Vec3 {
        rotate_yaw(p, self.yaw_deg) + self.pos
    }

    /// Rotate a local-space direction (no translation).
    #[inline]
    pub fn apply_dir(&self, d: Vec3) -> Vec3 {
        rotate_yaw(d, self.yaw_deg)
    }

    /// Compose with a child transform so that
    /// `self.then(child).apply(p) == self.apply(child.apply(p))`.
    #[inline]
    pub fn then(&self, child: Transform) -> Transform {
        Transform {
            pos: self.pos + rotate_yaw(child.pos, self.yaw_deg),
            yaw_deg: self.yaw_deg + child.yaw_deg,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing a single point.
    #[inline]
    pub const fn at_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    #[inline]
    pub fn expand_point(&mut self, p: Vec3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }
}
