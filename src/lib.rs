pub mod aabb;
pub mod camera;
pub mod color;
pub mod image;
pub mod light;
pub mod material;
pub mod mesh;
pub mod render;
pub mod sampler;
pub mod scene;
pub mod shapes;
pub mod vec3;

use std::sync::atomic::AtomicBool;

use vec3::Float;
use vec3::Point;
use vec3::Vec3;

/// Cooperative stop flag, checked between rows of a pass.
pub static CANCEL: AtomicBool = AtomicBool::new(false);

pub struct ProgressFunc {
    pub func: Box<dyn Fn(f32) + Send + Sync>,
}

impl Default for ProgressFunc {
    fn default() -> Self {
        ProgressFunc { func: Box::new(|_| {}) }
    }
}

#[derive(Debug, Clone)]
pub struct Ray {
    pub orig: Point,
    pub dir: Vec3,
    pub inv_dir: Vec3, // aabb slab optimization
    pub sign: [usize; 3],
}

impl Ray {
    pub fn new(orig: Point, dir: Vec3) -> Ray {
        let dir = dir.normalize();
        Ray {
            orig,
            dir,
            inv_dir: dir.recip(),
            sign: [
                (dir.x < 0.0) as usize,
                (dir.y < 0.0) as usize,
                (dir.z < 0.0) as usize,
            ],
        }
    }
    pub fn at(&self, t: Float) -> Point {
        self.orig + self.dir * t
    }
}

#[derive(Clone, Copy, Default)]
pub struct RenderStats {
    pub num_rays_primary: u64,
    pub num_rays_diffuse: u64,
    pub num_rays_specular: u64,
    pub num_rays_refracted: u64,
    pub num_rays_shadow: u64,
    pub num_rays_max_depth: u64,
    pub num_intersects_triangle: u64,
    pub num_intersects_aabb: u64,
    pub num_aabb_culled: u64,
}

impl RenderStats {
    pub fn add(&mut self, other: RenderStats) {
        self.num_rays_primary += other.num_rays_primary;
        self.num_rays_diffuse += other.num_rays_diffuse;
        self.num_rays_specular += other.num_rays_specular;
        self.num_rays_refracted += other.num_rays_refracted;
        self.num_rays_shadow += other.num_rays_shadow;
        self.num_rays_max_depth += other.num_rays_max_depth;
        self.num_intersects_triangle += other.num_intersects_triangle;
        self.num_intersects_aabb += other.num_intersects_aabb;
        self.num_aabb_culled += other.num_aabb_culled;
    }
}
