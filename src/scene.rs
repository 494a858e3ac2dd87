use colored::Colorize;
use rand::Rng;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::aabb::AABB;
use crate::camera::Camera;
use crate::color::RGB;
use crate::light::PointLight;
use crate::material::Material;
use crate::mesh::{Hit, Mesh, Triangle};
use crate::render::{RenderConfig, RenderJob};
use crate::sampler::RandomDirection;
use crate::shapes;
use crate::vec3::{Float, Point, Quat, Vec3};
use crate::{Ray, RenderStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Monte Carlo global illumination (indirect diffuse + specular).
    Global,
    /// Classical Lambert/Phong shading from point lights with shadow rays.
    Direct,
}

impl FromStr for Shading {
    type Err = String;

    fn from_str(s: &str) -> Result<Shading, String> {
        match s {
            "global" => Ok(Shading::Global),
            "direct" => Ok(Shading::Direct),
            _ => Err(format!("unknown shading mode '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TraceParams {
    pub max_depth: u32,
    pub samples: u32,
    pub shading: Shading,
}

/// The renderable world: meshes with their bounding boxes, point
/// lights and a camera. Immutable while a render is in flight.
#[derive(Default)]
pub struct Scene {
    geometries: Vec<(AABB, Mesh)>,
    lights: Vec<PointLight>,
    camera: Camera,
}

impl Scene {
    pub fn new() -> Scene {
        Default::default()
    }

    pub fn add(&mut self, mesh: Mesh) {
        let bbox = AABB::from_mesh(&mesh);
        self.geometries.push((bbox, mesh));
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn geometries(&self) -> &[(AABB, Mesh)] {
        &self.geometries
    }

    pub fn num_triangles(&self) -> usize {
        self.geometries.iter().map(|(_, m)| m.triangles().len()).sum()
    }

    /// Closest valid intersection over the whole scene. Mesh traversal
    /// is gated on the slab test against the best distance found so far.
    pub fn closest_hit<'a>(&'a self, stats: &mut RenderStats, ray: &'a Ray) -> Hit<'a> {
        let mut best = Hit::none(ray);
        for (bbox, mesh) in &self.geometries {
            stats.num_intersects_aabb += 1;
            let t1 = if best.is_valid() { best.t } else { Float::MAX };
            if !bbox.intersect(ray, 0.0, t1) {
                stats.num_aabb_culled += 1;
                continue;
            }
            for triangle in mesh.triangles() {
                stats.num_intersects_triangle += 1;
                if let Some((t, u, v)) = triangle.intersection(ray) {
                    if !best.is_valid() || t < best.t {
                        best = Hit::new(t, u, v, triangle, ray);
                    }
                }
            }
        }
        best
    }

    /// Recursive shader. A miss is a black absorber; emission is always
    /// collected; the depth budget bounds every recursion path.
    pub fn send_ray<R: Rng>(
        &self,
        stats: &mut RenderStats,
        rng: &mut R,
        ray: &Ray,
        depth: u32,
        params: &TraceParams,
    ) -> RGB {
        let hit = self.closest_hit(stats, ray);
        let Some(triangle) = hit.triangle else {
            return RGB::zero();
        };
        let material = triangle.material();

        let mut result = RGB::zero();
        if material.has_emission() {
            result += material.ke;
        }
        if depth >= params.max_depth {
            stats.num_rays_max_depth += 1;
            return result;
        }

        // a refractive surface replaces every other secondary ray with
        // the single transmitted one
        if material.is_refractive() {
            stats.num_rays_refracted += 1;
            let refracted = Ray::new(hit.point(), triangle.refraction_direction(ray));
            return result + self.send_ray(stats, rng, &refracted, depth + 1, params);
        }

        match params.shading {
            Shading::Global => {
                result
                    + self.indirect_diffuse(stats, rng, ray, triangle, &hit, depth, params)
                    + self.indirect_specular(stats, rng, ray, triangle, &hit, depth, params)
            }
            Shading::Direct => {
                result
                    + self.direct_diffuse(stats, ray, triangle, &hit)
                    + self.direct_specular(stats, rng, ray, triangle, &hit, depth, params)
            }
        }
    }

    /// Hemispheric estimate of the incoming diffuse radiance,
    /// cosine-weighted around the surface normal.
    fn indirect_diffuse<R: Rng>(
        &self,
        stats: &mut RenderStats,
        rng: &mut R,
        ray: &Ray,
        triangle: &Triangle,
        hit: &Hit,
        depth: u32,
        params: &TraceParams,
    ) -> RGB {
        let kd = triangle.material().kd;
        if kd.is_zero() {
            return RGB::zero();
        }
        let position = ray.at(hit.t);
        let mut normal = triangle.normal();
        if triangle.reflection_direction_ray(ray).dot(normal) < 0.0 {
            normal = -normal;
        }
        let sampler = RandomDirection::new(normal, 1.0);

        let mut acc = RGB::zero();
        for _ in 0..params.samples {
            let sample_ray = Ray::new(position, sampler.generate(rng));
            let sample_hit = self.closest_hit(stats, &sample_ray);
            if !sample_hit.is_valid() {
                continue;
            }
            stats.num_rays_diffuse += 1;
            let incoming = acc + self.send_ray(stats, rng, &sample_ray, depth + 1, params);

            let to_sample = sample_hit.point() - position;
            let dist = to_sample.norm();
            let incident = to_sample / dist;
            let mut cos = triangle.normal().dot(incident);
            if incident.dot(triangle.normal()) < 0.0 {
                cos = -cos;
            }
            acc += incoming * kd * cos / dist / params.samples as Float;
        }
        acc
    }

    /// Lobe-shaped estimate of the incoming specular radiance around
    /// the mirror direction, weighted by cos^shininess.
    fn indirect_specular<R: Rng>(
        &self,
        stats: &mut RenderStats,
        rng: &mut R,
        ray: &Ray,
        triangle: &Triangle,
        hit: &Hit,
        depth: u32,
        params: &TraceParams,
    ) -> RGB {
        let ks = triangle.material().ks;
        if ks.is_zero() {
            return RGB::zero();
        }
        let exponent = triangle.material().shininess;
        let position = ray.at(hit.t);
        let sampler = RandomDirection::new(triangle.reflection_direction_ray(ray), exponent);

        let mut acc = RGB::zero();
        for _ in 0..params.samples {
            let sample_ray = Ray::new(position, sampler.generate(rng));
            let sample_hit = self.closest_hit(stats, &sample_ray);
            if !sample_hit.is_valid() {
                continue;
            }
            stats.num_rays_specular += 1;
            let incoming = acc + self.send_ray(stats, rng, &sample_ray, depth + 1, params);

            let to_sample = sample_hit.point() - position;
            let dist = to_sample.norm();
            let incident = to_sample / dist;
            let mut cos = (-ray.dir).dot(triangle.reflection_direction(incident));
            if incident.dot(triangle.normal()) < 0.0 {
                cos = -cos;
            }
            let lobe = cos.max(0.0).powf(exponent);
            acc += incoming * ks * lobe / dist / params.samples as Float;
        }
        acc
    }

    fn occluded(&self, stats: &mut RenderStats, position: Point, incident: Vec3, dist: Float) -> bool {
        stats.num_rays_shadow += 1;
        let shadow_ray = Ray::new(position, incident);
        let shadow_hit = self.closest_hit(stats, &shadow_ray);
        shadow_hit.is_valid() && shadow_hit.t < dist
    }

    /// Lambert shading from the point lights.
    fn direct_diffuse(
        &self,
        stats: &mut RenderStats,
        ray: &Ray,
        triangle: &Triangle,
        hit: &Hit,
    ) -> RGB {
        let kd = triangle.material().kd;
        if kd.is_zero() {
            return RGB::zero();
        }
        let position = ray.at(hit.t);
        let normal = triangle.normal_toward(ray.orig);

        let mut acc = RGB::zero();
        for light in &self.lights {
            let to_light = light.pos - position;
            let dist = to_light.norm();
            let incident = to_light / dist;
            let cos = normal.dot(incident).max(0.0);
            if cos == 0.0 {
                continue;
            }
            if self.occluded(stats, position, incident, dist) {
                continue;
            }
            acc += light.rgb * kd * cos / dist;
        }
        acc
    }

    /// Phong shading from the point lights, plus the ideal mirror bounce.
    fn direct_specular<R: Rng>(
        &self,
        stats: &mut RenderStats,
        rng: &mut R,
        ray: &Ray,
        triangle: &Triangle,
        hit: &Hit,
        depth: u32,
        params: &TraceParams,
    ) -> RGB {
        let ks = triangle.material().ks;
        if ks.is_zero() {
            return RGB::zero();
        }
        let exponent = triangle.material().shininess;
        let position = ray.at(hit.t);

        let mut acc = RGB::zero();
        for light in &self.lights {
            let to_light = light.pos - position;
            let dist = to_light.norm();
            let incident = to_light / dist;
            let mut cos = (-ray.dir).dot(triangle.reflection_direction(incident));
            if incident.dot(triangle.normal()) < 0.0 {
                cos = -cos;
            }
            if self.occluded(stats, position, incident, dist) {
                continue;
            }
            let mirror = Ray::new(position, triangle.reflection_direction_ray(ray));
            stats.num_rays_specular += 1;
            acc += light.rgb * ks * cos.max(0.0).powf(exponent) / dist
                + self.send_ray(stats, rng, &mirror, depth + 1, params);
        }
        acc
    }
}

/*
 * Scene description loading, JSON with keyed entries:
 * "material.N", "point-light.N", "cube.N", "sphere.N", "cylinder.N",
 * "cone.N", "disk.N", "cornell.N", "obj.N".
 */

fn default_div() -> u32 {
    16
}
fn default_scale() -> [Float; 3] {
    [1.0; 3]
}
fn default_radius() -> Float {
    1.0
}

#[derive(Debug, Deserialize)]
struct Placement {
    #[serde(default = "default_scale")]
    scale: [Float; 3],
    #[serde(default)]
    rot_x: Float,
    #[serde(default)]
    rot_y: Float,
    #[serde(default)]
    rot_z: Float,
    #[serde(default)]
    translate: [Float; 3],
}

#[derive(Debug, Deserialize)]
struct ShapeParams {
    material: usize,
    #[serde(default = "default_div")]
    div: u32,
    #[serde(default = "default_radius")]
    r_bottom: Float,
    #[serde(default = "default_radius")]
    r_top: Float,
    #[serde(flatten)]
    place: Placement,
}

#[derive(Debug, Deserialize)]
struct CornellParams {
    materials: [usize; 6],
    #[serde(flatten)]
    place: Placement,
}

#[derive(Debug, Deserialize)]
struct ObjParams {
    path: String,
    material: usize,
    #[serde(flatten)]
    place: Placement,
}

fn place(mesh: &mut Mesh, p: &Placement) {
    mesh.scale_x(p.scale[0]);
    mesh.scale_y(p.scale[1]);
    mesh.scale_z(p.scale[2]);
    if p.rot_x != 0.0 {
        mesh.rotate(Quat::from_axis_angle(Vec3::unit_x(), p.rot_x.to_radians()));
    }
    if p.rot_y != 0.0 {
        mesh.rotate(Quat::from_axis_angle(Vec3::unit_y(), p.rot_y.to_radians()));
    }
    if p.rot_z != 0.0 {
        mesh.rotate(Quat::from_axis_angle(Vec3::unit_z(), p.rot_z.to_radians()));
    }
    mesh.translate(Vec3::new(p.translate[0], p.translate[1], p.translate[2]));
}

fn load_materials(json: &serde_json::Value) -> Vec<Arc<Material>> {
    let mut materials = vec![];
    loop {
        let s = format!("material.{}", materials.len());
        match serde_json::from_value::<Material>(json[&s].clone()) {
            Err(_error) => break,
            Ok(mat) => materials.push(Arc::new(mat)),
        }
    }
    materials
}

fn load_lights(scene: &mut Scene, json: &serde_json::Value) -> u32 {
    let mut num_lights = 0;
    loop {
        let s = format!("point-light.{}", num_lights);
        match serde_json::from_value::<PointLight>(json[&s].clone()) {
            Err(_error) => break,
            Ok(mut light) => {
                light.name = s;
                scene.add_light(light);
                num_lights += 1;
            }
        }
    }
    num_lights
}

fn load_shapes(scene: &mut Scene, materials: &[Arc<Material>], json: &serde_json::Value) {
    let builders: [(&str, fn(&ShapeParams, &Arc<Material>) -> Mesh); 5] = [
        ("cube", |_p, mat| shapes::cube(mat)),
        ("sphere", |p, mat| shapes::sphere(p.div, mat)),
        ("cylinder", |p, mat| shapes::cylinder(p.div, p.r_bottom, p.r_top, mat)),
        ("cone", |p, mat| shapes::cone(p.div, mat)),
        ("disk", |p, mat| shapes::disk(p.div, mat)),
    ];
    for (kind, build) in builders {
        let mut count = 0;
        loop {
            let s = format!("{}.{}", kind, count);
            match serde_json::from_value::<ShapeParams>(json[&s].clone()) {
                Err(_error) => break,
                Ok(p) => {
                    let mut mesh = build(&p, &materials[p.material]);
                    place(&mut mesh, &p.place);
                    scene.add(mesh);
                    count += 1;
                }
            }
        }
        if count > 0 {
            println!("-- {:8} x{}", kind.green(), count);
        }
    }

    let mut count = 0;
    loop {
        let s = format!("cornell.{}", count);
        match serde_json::from_value::<CornellParams>(json[&s].clone()) {
            Err(_error) => break,
            Ok(p) => {
                let walls: Vec<&Arc<Material>> =
                    p.materials.iter().map(|&i| &materials[i]).collect();
                let mut mesh = shapes::cornell(walls.try_into().unwrap());
                place(&mut mesh, &p.place);
                scene.add(mesh);
                count += 1;
            }
        }
    }
    if count > 0 {
        println!("-- {:8} x{}", "cornell".green(), count);
    }
}

fn load_objs(scene: &mut Scene, materials: &[Arc<Material>], json: &serde_json::Value) {
    let mut num_objs = 0;
    loop {
        let s = format!("obj.{}", num_objs);
        let p = match serde_json::from_value::<ObjParams>(json[&s].clone()) {
            Err(_error) => break,
            Ok(p) => p,
        };
        let opt = tobj::LoadOptions {
            triangulate: true, // converts polygons into triangles
            ignore_lines: true,
            ignore_points: true,
            ..Default::default()
        };
        let (models, _obj_materials) = tobj::load_obj(&p.path, &opt).expect("obj load");
        let material = &materials[p.material];

        for m in &models {
            let obj_mesh = &m.mesh;
            let n = obj_mesh.indices.len() / 3;
            assert!(obj_mesh.indices.len() % 3 == 0);
            println!(
                "-- model {:12} has {} triangles w/ {} vertices",
                m.name.blue(),
                n,
                obj_mesh.positions.len() / 3
            );

            let mut mesh = Mesh::new();
            for i in 0..obj_mesh.positions.len() / 3 {
                mesh.add_vertex(Point::new(
                    obj_mesh.positions[3 * i] as Float,
                    obj_mesh.positions[3 * i + 1] as Float,
                    obj_mesh.positions[3 * i + 2] as Float,
                ));
            }
            let mut num_skipped = 0;
            for i in 0..n {
                let i0 = obj_mesh.indices[3 * i] as usize;
                let i1 = obj_mesh.indices[3 * i + 1] as usize;
                let i2 = obj_mesh.indices[3 * i + 2] as usize;
                let degenerate = {
                    let v = mesh.vertices();
                    v[i0] == v[i1] || v[i0] == v[i2] || v[i1] == v[i2]
                };
                if degenerate {
                    num_skipped += 1;
                    continue;
                }
                mesh.add_triangle(i0, i1, i2, material);
            }
            if num_skipped > 0 {
                println!("-- skipped {} malformed triangles", num_skipped);
            }
            place(&mut mesh, &p.place);
            scene.add(mesh);
        }
        println!("-- loaded {}", p.path.green());
        num_objs += 1;
    }
}

fn load_resolution(cfg: &mut RenderConfig, json: &serde_json::Value) {
    if cfg.res_x == 0 && cfg.res_y == 0 {
        if let Some(array) = json["resolution"].as_array() {
            cfg.res_x = array[0].as_u64().unwrap() as u32;
            cfg.res_y = array[1].as_u64().unwrap() as u32;
        }
    }
    let res_str = format!("{}x{}", cfg.res_x, cfg.res_y).bold();
    println!("-- img resolution: {}", res_str);
}

pub fn load_scene(cfg: RenderConfig) -> std::io::Result<RenderJob> {
    let mut cfg = cfg;
    if !cfg.scene_file.is_file() {
        println!("file '{}' not found.", cfg.scene_file.display());
        println!("pwd={}", std::env::current_dir()?.display());
        panic!("scene file {} not present.", cfg.scene_file.display());
    }
    println!(
        "loading scene file {}",
        cfg.scene_file.display().to_string().bold()
    );

    let data = fs::read_to_string(&cfg.scene_file)?;
    let json: serde_json::Value = serde_json::from_str(&data)?;
    let mut scene = Scene::new();

    load_resolution(&mut cfg, &json);

    let mut camera: Camera = serde_json::from_value(json["camera"].clone()).unwrap();
    camera.init();
    scene.set_camera(camera);

    let materials = load_materials(&json);
    let num_lights = load_lights(&mut scene, &json);
    load_shapes(&mut scene, &materials, &json);
    load_objs(&mut scene, &materials, &json);

    println!(
        "-- meshes={} triangles={} lights={} materials={}",
        scene.geometries().len(),
        scene.num_triangles(),
        num_lights,
        materials.len()
    );
    scene.camera().display();
    scene.lights().iter().for_each(|light| light.display());

    Ok(RenderJob::new(scene, cfg))
}

/// Writes the emissive Cornell reference scene: six colored diffuse
/// walls scaled x10, two emissive white cubes, four glossy colored
/// cubes and three point lights.
pub fn generate_scene(scene_file: PathBuf) -> std::io::Result<()> {
    let mut json = serde_json::json!({ "resolution": [600, 600] });

    let walls = [
        RGB::new(1.0, 0.0, 0.0),
        RGB::new(0.0, 1.0, 0.0),
        RGB::new(0.0, 1.0, 1.0),
        RGB::new(1.0, 0.0, 1.0),
        RGB::new(1.0, 1.0, 0.0),
        RGB::new(0.0, 0.0, 1.0),
    ];
    for (i, kd) in walls.iter().enumerate() {
        let name = format!("material.{}", i);
        json[name] = serde_json::to_value(Material::diffuse(*kd)).unwrap();
    }
    json["material.6"] =
        serde_json::to_value(Material::emissive(RGB::new(500.0, 500.0, 500.0))).unwrap();
    let cubes = [
        RGB::new(1.0, 0.0, 0.0),
        RGB::new(0.0, 0.0, 1.0),
        RGB::new(1.0, 0.0, 1.0),
        RGB::new(0.0, 1.0, 0.0),
    ];
    for (i, c) in cubes.iter().enumerate() {
        let name = format!("material.{}", 7 + i);
        let mat = Material::new(RGB::zero(), *c, *c, 20.0, RGB::zero(), 0.0);
        json[name] = serde_json::to_value(mat).unwrap();
    }

    json["cornell.0"] = serde_json::json!({
        "materials": [0, 1, 2, 3, 4, 5],
        "scale": [10.0, 10.0, 10.0],
    });
    json["cube.0"] = serde_json::json!({ "material": 6, "translate": [4.0, -4.0, -4.0] });
    json["cube.1"] = serde_json::json!({ "material": 6, "translate": [-4.0, 4.0, 4.0] });
    json["cube.2"] = serde_json::json!({ "material": 7, "translate": [0.0, 1.0, -1.0] });
    json["cube.3"] = serde_json::json!({ "material": 8, "translate": [0.0, 1.0, 1.0] });
    json["cube.4"] = serde_json::json!({ "material": 9, "translate": [0.0, -1.0, -1.0] });
    json["cube.5"] = serde_json::json!({ "material": 10, "translate": [0.0, -1.0, 1.0] });

    let lights = [
        Point::new(-2.0, 1.0, 1.0),
        Point::new(4.0, 0.0, 0.0),
        Point::new(-3.0, 2.0, 1.0),
    ];
    for (i, pos) in lights.iter().enumerate() {
        let name = format!("point-light.{}", i);
        let light = PointLight::new(*pos, RGB::new(0.5, 0.5, 0.5));
        json[name] = serde_json::to_value(&light).unwrap();
    }

    let camera = Camera::new(Point::new(-4.0, 0.0, 0.0), Point::zero(), 0.3, 1.0, 1.0);
    json["camera"] = serde_json::to_value(&camera).unwrap();

    let s0 = serde_json::to_string_pretty(&json)?;
    println!("Writing scene file {}", scene_file.display());
    fs::write(&scene_file, s0)
}
