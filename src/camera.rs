use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use crate::vec3::{Float, Point, Quat, Vec3};
use crate::Ray;

fn default_plane() -> Float {
    1.0
}

/// Pinhole camera. The projection basis is derived from position and
/// target with a world +z up convention and must be recomputed through
/// `init` after any mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub position: Point,
    pub target: Point,
    #[serde(default = "default_plane")]
    pub plane_distance: Float,
    #[serde(default = "default_plane")]
    pub plane_width: Float,
    #[serde(default = "default_plane")]
    pub plane_height: Float,
    #[serde(skip)]
    front: Vec3,
    #[serde(skip)]
    right: Vec3,
    #[serde(skip)]
    down: Vec3,
    #[serde(skip)]
    width_vec: Vec3,
    #[serde(skip)]
    height_vec: Vec3,
    #[serde(skip)]
    up_left: Point,
}

impl Default for Camera {
    fn default() -> Camera {
        Camera::new(Point::zero(), Point::unit_y(), 1.0, 1.0, 1.0)
    }
}

impl Camera {
    pub fn new(
        position: Point,
        target: Point,
        plane_distance: Float,
        plane_width: Float,
        plane_height: Float,
    ) -> Camera {
        let mut camera = Camera {
            position,
            target,
            plane_distance,
            plane_width,
            plane_height,
            front: Vec3::zero(),
            right: Vec3::zero(),
            down: Vec3::zero(),
            width_vec: Vec3::zero(),
            height_vec: Vec3::zero(),
            up_left: Point::zero(),
        };
        camera.init();
        camera
    }

    pub fn init(&mut self) {
        self.front = (self.target - self.position).normalize();
        self.right = Quat::from_axis_angle(Vec3::unit_z(), -FRAC_PI_2)
            .rotate(self.front)
            .normalize();
        self.down = self.front.cross(self.right).normalize();
        self.width_vec = self.right * self.plane_width;
        self.height_vec = self.down * self.plane_height;
        self.up_left = self.position + self.front * self.plane_distance
            - self.width_vec * 0.5
            - self.height_vec * 0.5;
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
        self.init();
    }

    pub fn set_target(&mut self, target: Point) {
        self.target = target;
        self.init();
    }

    pub fn set_plane(&mut self, distance: Float, width: Float, height: Float) {
        self.plane_distance = distance;
        self.plane_width = width;
        self.plane_height = height;
        self.init();
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }
    pub fn right(&self) -> Vec3 {
        self.right
    }
    pub fn down(&self) -> Vec3 {
        self.down
    }

    /// Primary ray through normalized screen coordinates, (0,0) at the
    /// top-left corner and (1,1) at the bottom-right.
    pub fn get_ray(&self, cx: Float, cy: Float) -> Ray {
        Ray::new(
            self.position,
            self.up_left + self.width_vec * cx + self.height_vec * cy - self.position,
        )
    }

    pub fn display(&self) {
        let s = format!(
            "pos {:?} target {:?} plane d={} {}x{}",
            self.position, self.target, self.plane_distance, self.plane_width, self.plane_height
        )
        .dimmed();
        println!("-- {:12}: {s}", "camera".blue());
    }
}
