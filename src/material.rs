use crate::color::RGB;
use crate::vec3::Float;
use serde::{Deserialize, Serialize};

fn default_shininess() -> Float {
    1.0
}

/// Immutable surface description, built at scene setup and shared by
/// every triangle of a shape through an `Arc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    #[serde(default)]
    pub ka: RGB,
    #[serde(default)]
    pub kd: RGB,
    #[serde(default)]
    pub ks: RGB,
    #[serde(default = "default_shininess")]
    pub shininess: Float,
    #[serde(default)]
    pub ke: RGB,
    #[serde(default)]
    pub eta: Float,
}

impl Material {
    pub fn new(ka: RGB, kd: RGB, ks: RGB, shininess: Float, ke: RGB, eta: Float) -> Material {
        Material { ka, kd, ks, shininess, ke, eta }
    }
    pub fn diffuse(kd: RGB) -> Material {
        Material::new(RGB::zero(), kd, RGB::zero(), 1.0, RGB::zero(), 0.0)
    }
    pub fn specular(ks: RGB, shininess: Float) -> Material {
        Material::new(RGB::zero(), RGB::zero(), ks, shininess, RGB::zero(), 0.0)
    }
    pub fn emissive(ke: RGB) -> Material {
        Material::new(RGB::zero(), RGB::zero(), RGB::zero(), 1.0, ke, 0.0)
    }
    pub fn refractive(ks: RGB, shininess: Float, eta: Float) -> Material {
        Material::new(RGB::zero(), RGB::zero(), ks, shininess, RGB::zero(), eta)
    }
    pub fn has_emission(&self) -> bool {
        !self.ke.is_zero()
    }
    pub fn is_refractive(&self) -> bool {
        self.eta != 0.0
    }
}
