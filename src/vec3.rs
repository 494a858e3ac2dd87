use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

pub type Float = f32;

/// Minimum accepted hit distance; rejects self-intersections of the
/// origin triangle.
pub const EPSILON: Float = 1e-4;

#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

pub type Point = Vec3;

impl fmt::Debug for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vec3: {{ x={:.3} y={:.3} z={:.3} }}", self.x, self.y, self.z)
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3 {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Mul<Float> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: Float) -> Vec3 {
        Vec3 {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

impl Div<Float> for Vec3 {
    type Output = Vec3;

    fn div(self, rhs: Float) -> Vec3 {
        Vec3 {
            x: self.x / rhs,
            y: self.y / rhs,
            z: self.z / rhs,
        }
    }
}

impl AddAssign<Vec3> for Vec3 {
    fn add_assign(&mut self, other: Vec3) {
        *self = *self + other;
    }
}

impl Vec3 {
    pub fn new(x: Float, y: Float, z: Float) -> Vec3 {
        Vec3 { x, y, z }
    }
    pub fn zero() -> Vec3 {
        Vec3 { x: 0.0, y: 0.0, z: 0.0 }
    }
    pub fn unit_x() -> Vec3 {
        Vec3 { x: 1.0, y: 0.0, z: 0.0 }
    }
    pub fn unit_y() -> Vec3 {
        Vec3 { x: 0.0, y: 1.0, z: 0.0 }
    }
    pub fn unit_z() -> Vec3 {
        Vec3 { x: 0.0, y: 0.0, z: 1.0 }
    }
    pub fn dot(self, rhs: Vec3) -> Float {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }
    pub fn norm2(self) -> Float {
        self.dot(self)
    }
    pub fn norm(self) -> Float {
        self.norm2().sqrt()
    }
    pub fn normalize(self) -> Vec3 {
        let norm = self.norm();
        assert!(norm > 0.0);
        self / norm
    }
    pub fn min(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.x.min(rhs.x),
            y: self.y.min(rhs.y),
            z: self.z.min(rhs.z),
        }
    }
    pub fn max(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.x.max(rhs.x),
            y: self.y.max(rhs.y),
            z: self.z.max(rhs.z),
        }
    }
    pub fn comp_mul(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.x * rhs.x,
            y: self.y * rhs.y,
            z: self.z * rhs.z,
        }
    }
    pub fn comp_div(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.x / rhs.x,
            y: self.y / rhs.y,
            z: self.z / rhs.z,
        }
    }
    pub fn recip(self) -> Vec3 {
        Vec3 {
            x: 1.0 / self.x,
            y: 1.0 / self.y,
            z: 1.0 / self.z,
        }
    }
}

/*
 * Rotation quaternion: s = cos(angle/2), v = axis * sin(angle/2).
 * The axis must be unit length.
 */
#[derive(Debug, Clone, Copy)]
pub struct Quat {
    pub s: Float,
    pub v: Vec3,
}

impl Quat {
    pub fn from_axis_angle(axis: Vec3, angle: Float) -> Quat {
        Quat {
            s: (angle / 2.0).cos(),
            v: axis * (angle / 2.0).sin(),
        }
    }
    pub fn from_vector(v: Vec3) -> Quat {
        Quat { s: 0.0, v }
    }
    pub fn conjugate(self) -> Quat {
        Quat { s: self.s, v: -self.v }
    }
    pub fn rotate(self, p: Vec3) -> Vec3 {
        (self * Quat::from_vector(p) * self.conjugate()).v
    }
}

impl Mul for Quat {
    type Output = Quat;

    fn mul(self, q: Quat) -> Quat {
        Quat {
            s: self.s * q.s - self.v.dot(q.v),
            v: q.v * self.s + self.v * q.s + self.v.cross(q.v),
        }
    }
}
