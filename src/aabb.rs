use crate::mesh::Mesh;
use crate::vec3::{Float, Point, Vec3};
use crate::Ray;

/*
 * Axis-Aligned Bounding Box over a mesh's vertex pool. Pure pruning
 * structure: the slab test never reports an intersection point.
 */
#[derive(Debug, Clone)]
pub struct AABB {
    bounds: [Point; 2],
}

impl AABB {
    pub fn new(p_min: Point, p_max: Point) -> AABB {
        AABB { bounds: [p_min, p_max] }
    }

    pub fn from_mesh(mesh: &Mesh) -> AABB {
        let vertices = mesh.vertices();
        assert!(!vertices.is_empty());
        let mut p_min = vertices[0];
        let mut p_max = vertices[0];
        for vertex in vertices {
            p_min = p_min.min(*vertex);
            p_max = p_max.max(*vertex);
        }
        AABB { bounds: [p_min, p_max] }
    }

    pub fn p_min(&self) -> Point {
        self.bounds[0]
    }
    pub fn p_max(&self) -> Point {
        self.bounds[1]
    }

    // Slab test folding the y then z intervals into x. Division by a
    // zero direction component yields infinities that still compare
    // correctly, so axis-parallel rays need no special casing.
    pub fn intersect(&self, ray: &Ray, t0: Float, t1: Float) -> bool {
        let sign = ray.sign;
        let near = Vec3::new(
            self.bounds[sign[0]].x,
            self.bounds[sign[1]].y,
            self.bounds[sign[2]].z,
        );
        let far = Vec3::new(
            self.bounds[1 - sign[0]].x,
            self.bounds[1 - sign[1]].y,
            self.bounds[1 - sign[2]].z,
        );
        let mut tmin = (near - ray.orig).comp_mul(ray.inv_dir);
        let mut tmax = (far - ray.orig).comp_mul(ray.inv_dir);

        if tmin.x > tmax.y || tmin.y > tmax.x {
            return false;
        }
        if tmin.y > tmin.x {
            tmin.x = tmin.y;
        }
        if tmax.y < tmax.x {
            tmax.x = tmax.y;
        }

        if tmin.x > tmax.z || tmin.z > tmax.x {
            return false;
        }
        if tmin.z > tmin.x {
            tmin.x = tmin.z;
        }
        if tmax.z < tmax.x {
            tmax.x = tmax.z;
        }
        tmin.x < t1 && tmax.x > t0
    }
}
