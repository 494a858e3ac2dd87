use std::sync::Arc;

use crate::material::Material;
use crate::vec3::{Float, Point, Quat, Vec3, EPSILON};
use crate::Ray;

const DET_EPSILON: Float = 1e-9;

/// A triangle addressing its vertices by index into the owning mesh's
/// vertex pool. `vertex0`, the edge axes and the unit normal are cached;
/// the mesh recomputes them through `update` after any vertex mutation.
#[derive(Debug, Clone)]
pub struct Triangle {
    indices: [usize; 3],
    vertex0: Point,
    u_axis: Vec3,
    v_axis: Vec3,
    normal: Vec3,
    material: Arc<Material>,
}

impl Triangle {
    pub fn new(indices: [usize; 3], vertices: &[Point], material: Arc<Material>) -> Triangle {
        let mut triangle = Triangle {
            indices,
            vertex0: Point::zero(),
            u_axis: Vec3::zero(),
            v_axis: Vec3::zero(),
            normal: Vec3::zero(),
            material,
        };
        triangle.update(vertices);
        triangle
    }

    pub fn update(&mut self, vertices: &[Point]) {
        let v0 = vertices[self.indices[0]];
        let v1 = vertices[self.indices[1]];
        let v2 = vertices[self.indices[2]];
        self.vertex0 = v0;
        self.u_axis = v1 - v0;
        self.v_axis = v2 - v0;
        self.normal = self.u_axis.cross(self.v_axis).normalize();
    }

    pub fn indices(&self) -> [usize; 3] {
        self.indices
    }
    pub fn vertex0(&self) -> Point {
        self.vertex0
    }
    pub fn u_axis(&self) -> Vec3 {
        self.u_axis
    }
    pub fn v_axis(&self) -> Vec3 {
        self.v_axis
    }
    pub fn normal(&self) -> Vec3 {
        self.normal
    }
    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    /// Face normal directed toward the half space containing `point`.
    pub fn normal_toward(&self, point: Point) -> Vec3 {
        if self.normal.dot(point - self.vertex0) <= 0.0 {
            return -self.normal;
        }
        self.normal
    }

    /// Moller-Trumbore; returns (t, u, v) for hits with t >= EPSILON.
    pub fn intersection(&self, ray: &Ray) -> Option<(Float, Float, Float)> {
        let edge1 = self.u_axis;
        let edge2 = self.v_axis;

        let pvec = ray.dir.cross(edge2);
        let det = edge1.dot(pvec);
        // near-zero determinant: ray parallel to the triangle plane
        if det.abs() < DET_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = ray.orig - self.vertex0;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(edge1);
        let v = ray.dir.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(qvec) * inv_det;
        if t < EPSILON {
            return None;
        }
        Some((t, u, v))
    }

    /// Mirror direction of `dir` across the triangle plane.
    pub fn reflection_direction(&self, dir: Vec3) -> Vec3 {
        dir - self.normal * (2.0 * dir.dot(self.normal))
    }

    /// Mirror direction of the ray, with the normal flipped toward the
    /// ray origin.
    pub fn reflection_direction_ray(&self, ray: &Ray) -> Vec3 {
        let mut n = self.normal;
        if n.dot(ray.orig - self.vertex0) <= 0.0 {
            n = -n;
        }
        ray.dir - n * (2.0 * ray.dir.dot(n))
    }

    /// Transmitted direction through the surface. Falls back to the
    /// mirror direction on total internal reflection so no NaN can reach
    /// the accumulator.
    pub fn refraction_direction(&self, ray: &Ray) -> Vec3 {
        let mut n = self.normal;
        if n.dot(ray.orig - self.vertex0) <= 0.0 {
            n = -n;
        }
        let eta = 1.0 / self.material.eta;
        let alpha = n.dot(-ray.dir);
        let radicand = 1.0 - eta * eta * (1.0 - alpha * alpha);
        if radicand < 0.0 {
            return ray.dir - n * (2.0 * ray.dir.dot(n));
        }
        let beta = radicand.sqrt();
        ray.dir * eta + n * (eta * alpha - beta)
    }
}

/// Intersection between a ray and the closest triangle found by the
/// scene query. An invalid hit compares greater than any valid one.
#[derive(Clone, Copy)]
pub struct Hit<'a> {
    pub t: Float,
    pub u: Float,
    pub v: Float,
    pub triangle: Option<&'a Triangle>,
    pub ray: &'a Ray,
}

impl<'a> Hit<'a> {
    pub fn none(ray: &'a Ray) -> Hit<'a> {
        Hit {
            t: Float::MAX,
            u: 0.0,
            v: 0.0,
            triangle: None,
            ray,
        }
    }
    pub fn new(t: Float, u: Float, v: Float, triangle: &'a Triangle, ray: &'a Ray) -> Hit<'a> {
        Hit {
            t,
            u,
            v,
            triangle: Some(triangle),
            ray,
        }
    }
    pub fn is_valid(&self) -> bool {
        self.triangle.is_some()
    }
    pub fn point(&self) -> Point {
        self.ray.at(self.t)
    }
}

/// An ordered vertex pool plus the triangles indexing into it.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: Vec<Point>,
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Mesh {
        Default::default()
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn add_vertex(&mut self, vertex: Point) -> usize {
        self.vertices.push(vertex);
        self.vertices.len() - 1
    }

    pub fn add_triangle(&mut self, i0: usize, i1: usize, i2: usize, material: &Arc<Material>) {
        assert!(i0 < self.vertices.len());
        assert!(i1 < self.vertices.len());
        assert!(i2 < self.vertices.len());
        self.triangles
            .push(Triangle::new([i0, i1, i2], &self.vertices, material.clone()));
    }

    pub fn add_triangle_points(&mut self, p0: Point, p1: Point, p2: Point, material: &Arc<Material>) {
        let i0 = self.add_vertex(p0);
        let i1 = self.add_vertex(p1);
        let i2 = self.add_vertex(p2);
        self.add_triangle(i0, i1, i2, material);
    }

    /// Appends the other mesh's vertices (each exactly once) and its
    /// triangles with indices shifted into this pool.
    pub fn merge(&mut self, other: &Mesh) {
        let base = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);
        for triangle in &other.triangles {
            let [i0, i1, i2] = triangle.indices();
            self.triangles.push(Triangle::new(
                [base + i0, base + i1, base + i2],
                &self.vertices,
                triangle.material().clone(),
            ));
        }
    }

    fn update_triangles(&mut self) {
        let Mesh { vertices, triangles } = self;
        for triangle in triangles.iter_mut() {
            triangle.update(vertices);
        }
    }

    pub fn translate(&mut self, t: Vec3) {
        for vertex in &mut self.vertices {
            *vertex += t;
        }
        self.update_triangles();
    }

    pub fn scale(&mut self, f: Float) {
        for vertex in &mut self.vertices {
            *vertex = *vertex * f;
        }
        self.update_triangles();
    }

    pub fn scale_x(&mut self, f: Float) {
        for vertex in &mut self.vertices {
            vertex.x *= f;
        }
        self.update_triangles();
    }

    pub fn scale_y(&mut self, f: Float) {
        for vertex in &mut self.vertices {
            vertex.y *= f;
        }
        self.update_triangles();
    }

    pub fn scale_z(&mut self, f: Float) {
        for vertex in &mut self.vertices {
            vertex.z *= f;
        }
        self.update_triangles();
    }

    pub fn rotate(&mut self, q: Quat) {
        for vertex in &mut self.vertices {
            *vertex = q.rotate(*vertex);
        }
        self.update_triangles();
    }
}
