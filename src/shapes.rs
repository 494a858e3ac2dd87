use std::f32::consts::PI;
use std::sync::Arc;

use crate::material::Material;
use crate::mesh::Mesh;
use crate::vec3::{Float, Point, Quat, Vec3};

// Builders emit unit-size shapes centered at the origin with outward
// normals (inward for the Cornell box); callers scale, rotate and
// translate the returned mesh.

fn quad(mesh: &mut Mesh, a: usize, b: usize, c: usize, d: usize, material: &Arc<Material>) {
    mesh.add_triangle(a, b, c, material);
    mesh.add_triangle(a, c, d, material);
}

fn cube_vertices(mesh: &mut Mesh) -> [usize; 8] {
    let h = 0.5;
    let mut indices = [0; 8];
    for (i, index) in indices.iter_mut().enumerate() {
        *index = mesh.add_vertex(Point::new(
            if i & 1 != 0 { h } else { -h },
            if i & 2 != 0 { h } else { -h },
            if i & 4 != 0 { h } else { -h },
        ));
    }
    indices
}

pub fn cube(material: &Arc<Material>) -> Mesh {
    let mut mesh = Mesh::new();
    let v = cube_vertices(&mut mesh);
    quad(&mut mesh, v[1], v[3], v[7], v[5], material); // +x
    quad(&mut mesh, v[0], v[4], v[6], v[2], material); // -x
    quad(&mut mesh, v[2], v[6], v[7], v[3], material); // +y
    quad(&mut mesh, v[0], v[1], v[5], v[4], material); // -y
    quad(&mut mesh, v[4], v[5], v[7], v[6], material); // +z
    quad(&mut mesh, v[0], v[2], v[3], v[1], material); // -z
    mesh
}

/// Closed box with inward-facing walls, material order:
/// floor (-z), ceiling (+z), left (+y), right (-y), front (+x), back (-x).
pub fn cornell(walls: [&Arc<Material>; 6]) -> Mesh {
    let mut mesh = Mesh::new();
    let v = cube_vertices(&mut mesh);
    quad(&mut mesh, v[1], v[3], v[2], v[0], walls[0]); // floor, faces +z
    quad(&mut mesh, v[6], v[7], v[5], v[4], walls[1]); // ceiling, faces -z
    quad(&mut mesh, v[3], v[7], v[6], v[2], walls[2]); // left, faces -y
    quad(&mut mesh, v[4], v[5], v[1], v[0], walls[3]); // right, faces +y
    quad(&mut mesh, v[5], v[7], v[3], v[1], walls[4]); // front, faces -x
    quad(&mut mesh, v[2], v[6], v[4], v[0], walls[5]); // back, faces +x
    mesh
}

/// Disk of diameter 1.0 in the z = 0 plane, facing +z. The ring
/// vertices occupy pool slots 1..=nb_div in order.
pub fn disk(nb_div: u32, material: &Arc<Material>) -> Mesh {
    assert!(nb_div >= 3);
    let mut mesh = Mesh::new();
    let center = mesh.add_vertex(Point::zero());
    let mut ring = Vec::with_capacity(nb_div as usize);
    for i in 0..nb_div {
        let phi = i as Float * 2.0 * PI / nb_div as Float;
        ring.push(mesh.add_vertex(Point::new(0.5 * phi.cos(), 0.5 * phi.sin(), 0.0)));
    }
    for i in 0..nb_div as usize {
        let next = (i + 1) % nb_div as usize;
        mesh.add_triangle(center, ring[i], ring[next], material);
    }
    mesh
}

/// Cylinder of height 1.0 centered at the origin; the radii scale the
/// 0.5 base radius of the two cap disks.
pub fn cylinder(nb_div: u32, r_bottom: Float, r_top: Float, material: &Arc<Material>) -> Mesh {
    assert!(nb_div >= 3);
    let mut mesh = Mesh::new();

    let mut top = disk(nb_div, material);
    top.scale(r_top);
    top.translate(Vec3::new(0.0, 0.0, 0.5));

    let mut bottom = disk(nb_div, material);
    bottom.rotate(Quat::from_axis_angle(Vec3::unit_x(), PI));
    bottom.scale(r_bottom);
    bottom.translate(Vec3::new(0.0, 0.0, -0.5));

    mesh.merge(&top);
    mesh.merge(&bottom);

    for i in 0..nb_div {
        let phi0 = i as Float * 2.0 * PI / nb_div as Float;
        let phi1 = (i + 1) as Float * 2.0 * PI / nb_div as Float;
        let t0 = Point::new(0.5 * r_top * phi0.cos(), 0.5 * r_top * phi0.sin(), 0.5);
        let t1 = Point::new(0.5 * r_top * phi1.cos(), 0.5 * r_top * phi1.sin(), 0.5);
        let b0 = Point::new(0.5 * r_bottom * phi0.cos(), 0.5 * r_bottom * phi0.sin(), -0.5);
        let b1 = Point::new(0.5 * r_bottom * phi1.cos(), 0.5 * r_bottom * phi1.sin(), -0.5);
        mesh.add_triangle_points(b0, b1, t1, material);
        mesh.add_triangle_points(b0, t1, t0, material);
    }
    mesh
}

/// Cone of height 1.0, apex up, base disk of diameter 1.0 at z = -0.5.
pub fn cone(nb_div: u32, material: &Arc<Material>) -> Mesh {
    assert!(nb_div >= 3);
    let mut mesh = Mesh::new();

    let mut base = disk(nb_div, material);
    base.rotate(Quat::from_axis_angle(Vec3::unit_x(), PI));
    base.translate(Vec3::new(0.0, 0.0, -0.5));
    mesh.merge(&base);

    let apex = mesh.add_vertex(Point::new(0.0, 0.0, 0.5));
    for i in 0..nb_div {
        let phi0 = i as Float * 2.0 * PI / nb_div as Float;
        let phi1 = (i + 1) as Float * 2.0 * PI / nb_div as Float;
        let b0 = mesh.add_vertex(Point::new(0.5 * phi0.cos(), 0.5 * phi0.sin(), -0.5));
        let b1 = mesh.add_vertex(Point::new(0.5 * phi1.cos(), 0.5 * phi1.sin(), -0.5));
        mesh.add_triangle(b0, b1, apex, material);
    }
    mesh
}

/// Lat-long sphere of diameter 1.0 with single pole vertices.
pub fn sphere(nb_div: u32, material: &Arc<Material>) -> Mesh {
    assert!(nb_div >= 3);
    let mut mesh = Mesh::new();
    let top = mesh.add_vertex(Point::new(0.0, 0.0, 0.5));
    let bottom = mesh.add_vertex(Point::new(0.0, 0.0, -0.5));

    let mut rings: Vec<Vec<usize>> = Vec::new();
    for row in 1..nb_div {
        let theta = row as Float * PI / nb_div as Float;
        let mut ring = Vec::with_capacity(nb_div as usize);
        for col in 0..nb_div {
            let phi = col as Float * 2.0 * PI / nb_div as Float;
            ring.push(mesh.add_vertex(Point::new(
                0.5 * theta.sin() * phi.cos(),
                0.5 * theta.sin() * phi.sin(),
                0.5 * theta.cos(),
            )));
        }
        rings.push(ring);
    }

    let n = nb_div as usize;
    for i in 0..n {
        let next = (i + 1) % n;
        mesh.add_triangle(top, rings[0][i], rings[0][next], material);
        let last = rings.len() - 1;
        mesh.add_triangle(bottom, rings[last][next], rings[last][i], material);
    }
    for row in 0..rings.len() - 1 {
        for i in 0..n {
            let next = (i + 1) % n;
            let a0 = rings[row][i];
            let a1 = rings[row][next];
            let b0 = rings[row + 1][i];
            let b1 = rings[row + 1][next];
            mesh.add_triangle(a0, b0, b1, material);
            mesh.add_triangle(a0, b1, a1, material);
        }
    }
    mesh
}
