use rand::Rng;
use std::f32::consts::PI;

use crate::vec3::{Float, Quat, Vec3};

/// Random direction sampling biased by a cos^n distribution around a
/// main axis: n = 1 for a Lambertian hemisphere, larger n for a tight
/// specular lobe.
pub struct RandomDirection {
    direction: Vec3,
    tangent: Vec3,
    n: Float,
}

impl RandomDirection {
    pub fn new(direction: Vec3, n: Float) -> RandomDirection {
        let direction = direction.normalize();
        // unit vector orthogonal to the axis, with fallbacks for axes
        // aligned with world x
        let mut tangent = Vec3::unit_x();
        tangent = tangent - direction * direction.dot(tangent);
        if tangent.norm() < Float::EPSILON * 10.0 {
            tangent = Vec3::unit_y();
            tangent = tangent - direction * direction.dot(tangent);
            if tangent.norm() < Float::EPSILON * 10.0 {
                tangent = Vec3::unit_z();
                tangent = tangent - direction * direction.dot(tangent);
            }
        }
        RandomDirection {
            direction,
            tangent: tangent.normalize(),
            n,
        }
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> Vec3 {
        let (theta, phi) = self.random_polar(rng);
        let tilted = Quat::from_axis_angle(self.tangent, theta).rotate(self.direction);
        Quat::from_axis_angle(self.direction, phi).rotate(tilted)
    }

    fn random_polar<R: Rng>(&self, rng: &mut R) -> (Float, Float) {
        let u1: Float = rng.gen();
        let theta = u1.powf(1.0 / (self.n + 1.0)).acos();
        let u2: Float = rng.gen();
        let phi = 2.0 * PI * u2;
        (theta, phi)
    }
}
