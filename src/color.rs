use crate::vec3::Float;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul};

/// HDR color; components are unclamped until tone mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RGB {
    pub r: Float,
    pub g: Float,
    pub b: Float,
}

impl Add for RGB {
    type Output = RGB;

    fn add(self, other: RGB) -> RGB {
        RGB {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl AddAssign for RGB {
    fn add_assign(&mut self, other: RGB) {
        *self = *self + other;
    }
}

impl Mul for RGB {
    type Output = RGB;

    fn mul(self, other: RGB) -> RGB {
        RGB {
            r: self.r * other.r,
            g: self.g * other.g,
            b: self.b * other.b,
        }
    }
}

impl Mul<Float> for RGB {
    type Output = RGB;

    fn mul(self, rhs: Float) -> RGB {
        RGB {
            r: self.r * rhs,
            g: self.g * rhs,
            b: self.b * rhs,
        }
    }
}

impl Div<Float> for RGB {
    type Output = RGB;

    fn div(self, rhs: Float) -> RGB {
        RGB {
            r: self.r / rhs,
            g: self.g / rhs,
            b: self.b / rhs,
        }
    }
}

impl RGB {
    pub fn new(r: Float, g: Float, b: Float) -> RGB {
        RGB { r, g, b }
    }
    pub fn zero() -> RGB {
        RGB { r: 0.0, g: 0.0, b: 0.0 }
    }
    pub fn is_zero(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }
    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}
