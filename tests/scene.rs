use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use raypath::camera::Camera;
use raypath::color::RGB;
use raypath::image::Framebuffer;
use raypath::light::PointLight;
use raypath::material::Material;
use raypath::mesh::Mesh;
use raypath::render::{RenderConfig, RenderJob};
use raypath::scene::{Scene, Shading, TraceParams};
use raypath::shapes;
use raypath::vec3::{Point, Vec3};
use raypath::{ProgressFunc, Ray, RenderStats};

fn triangle_mesh(material: Material) -> Mesh {
    let mat = Arc::new(material);
    let mut mesh = Mesh::new();
    let a = mesh.add_vertex(Point::zero());
    let b = mesh.add_vertex(Point::new(1.0, 0.0, 0.0));
    let c = mesh.add_vertex(Point::new(0.0, 1.0, 0.0));
    mesh.add_triangle(a, b, c, &mat);
    mesh
}

fn params(max_depth: u32, samples: u32, shading: Shading) -> TraceParams {
    TraceParams { max_depth, samples, shading }
}

fn primary() -> Ray {
    Ray::new(Point::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, -1.0))
}

#[test]
fn exhausted_depth_budget_returns_black_on_a_plain_hit() {
    let mut scene = Scene::new();
    scene.add(triangle_mesh(Material::diffuse(RGB::new(1.0, 1.0, 1.0))));
    let mut stats = RenderStats::default();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let c = scene.send_ray(&mut stats, &mut rng, &primary(), 0, &params(0, 8, Shading::Global));
    assert_eq!(c, RGB::zero());
}

#[test]
fn emissive_hit_returns_the_emission() {
    let mut scene = Scene::new();
    scene.add(triangle_mesh(Material::emissive(RGB::new(1.0, 2.0, 3.0))));
    let mut stats = RenderStats::default();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let c = scene.send_ray(&mut stats, &mut rng, &primary(), 0, &params(0, 8, Shading::Global));
    assert_eq!(c, RGB::new(1.0, 2.0, 3.0));
}

#[test]
fn primary_miss_is_a_black_absorber() {
    let mut scene = Scene::new();
    scene.add(triangle_mesh(Material::emissive(RGB::new(1.0, 1.0, 1.0))));
    let away = Ray::new(Point::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, 1.0));
    let mut stats = RenderStats::default();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let c = scene.send_ray(&mut stats, &mut rng, &away, 0, &params(5, 8, Shading::Global));
    assert_eq!(c, RGB::zero());
}

#[test]
fn facing_mirrors_with_zero_samples_stay_black() {
    let mirror = Material::specular(RGB::new(1.0, 1.0, 1.0), 1000.0);
    let mut scene = Scene::new();
    scene.add(triangle_mesh(mirror.clone()));
    let mut upper = triangle_mesh(mirror);
    upper.translate(Vec3::new(0.0, 0.0, 1.0));
    scene.add(upper);

    let between = Ray::new(Point::new(0.25, 0.25, 0.75), Vec3::new(0.0, 0.0, -1.0));
    let mut stats = RenderStats::default();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let c = scene.send_ray(&mut stats, &mut rng, &between, 0, &params(5, 0, Shading::Global));
    assert_eq!(c, RGB::zero());
}

#[test]
fn direct_lighting_matches_the_lambert_term() {
    let mut scene = Scene::new();
    scene.add(triangle_mesh(Material::diffuse(RGB::new(1.0, 1.0, 1.0))));
    // light straight above the hit point, nothing occluding
    scene.add_light(PointLight::new(Point::new(0.25, 0.25, 2.0), RGB::new(1.0, 1.0, 1.0)));

    let mut stats = RenderStats::default();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let c = scene.send_ray(&mut stats, &mut rng, &primary(), 0, &params(1, 0, Shading::Direct));

    // I * kd * max(0, n.l) / d with cos = 1 and d = 2
    assert!((c.r - 0.5).abs() < 1e-4);
    assert!((c.g - 0.5).abs() < 1e-4);
    assert!((c.b - 0.5).abs() < 1e-4);
}

#[test]
fn direct_lighting_respects_shadows() {
    let mut scene = Scene::new();
    scene.add(triangle_mesh(Material::diffuse(RGB::new(1.0, 1.0, 1.0))));
    // opaque blocker between the surface and the light
    let mut blocker = triangle_mesh(Material::diffuse(RGB::new(1.0, 1.0, 1.0)));
    blocker.translate(Vec3::new(0.0, 0.0, 1.5));
    scene.add(blocker);
    scene.add_light(PointLight::new(Point::new(0.25, 0.25, 2.0), RGB::new(1.0, 1.0, 1.0)));

    let mut stats = RenderStats::default();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let start = Ray::new(Point::new(0.25, 0.25, 0.5), Vec3::new(0.0, 0.0, -1.0));
    let c = scene.send_ray(&mut stats, &mut rng, &start, 0, &params(1, 0, Shading::Direct));
    assert_eq!(c, RGB::zero());
}

#[test]
fn camera_basis_is_right_handed_and_orthonormal() {
    let camera = Camera::new(Point::new(-4.0, 0.0, 0.0), Point::zero(), 0.3, 1.0, 1.0);
    let f = camera.front();
    let r = camera.right();
    let d = camera.down();
    assert!((f.norm() - 1.0).abs() < 1e-5);
    assert!((r.norm() - 1.0).abs() < 1e-5);
    assert!((d.norm() - 1.0).abs() < 1e-5);
    assert!(f.dot(r).abs() < 1e-5);
    assert!(f.dot(d).abs() < 1e-5);
    assert!(r.dot(d).abs() < 1e-5);
    assert!((f.cross(r) - d).norm() < 1e-5);

    // the center of the projection plane lies straight ahead
    let center = camera.get_ray(0.5, 0.5);
    assert!((center.dir - Vec3::unit_x()).norm() < 1e-5);
    assert_eq!(center.orig, camera.position);
}

#[test]
fn camera_mutation_recomputes_the_projection() {
    let mut camera = Camera::new(Point::new(-4.0, 0.0, 0.0), Point::zero(), 0.3, 1.0, 1.0);
    camera.set_target(Point::new(-4.0, 5.0, 0.0));
    assert!((camera.front() - Vec3::unit_y()).norm() < 1e-5);

    camera.set_plane(2.0, 1.0, 1.0);
    let center = camera.get_ray(0.5, 0.5);
    assert!((center.dir - Vec3::unit_y()).norm() < 1e-5);

    camera.set_position(Point::new(-4.0, -1.0, 0.0));
    assert!((camera.front() - Vec3::unit_y()).norm() < 1e-5);
}

fn cornell_scene() -> Scene {
    let wall = Arc::new(Material::diffuse(RGB::new(0.8, 0.8, 0.8)));
    let lamp = Arc::new(Material::emissive(RGB::new(5.0, 5.0, 5.0)));
    let mut scene = Scene::new();

    let mut walls = shapes::cornell([&wall; 6]);
    walls.scale(10.0);
    scene.add(walls);

    let mut cube = shapes::cube(&lamp);
    cube.translate(Vec3::new(2.0, 0.0, 0.0));
    scene.add(cube);

    scene.set_camera(Camera::new(Point::new(-4.0, 0.0, 0.0), Point::zero(), 0.3, 1.0, 1.0));
    scene
}

fn test_cfg(res: u32, max_depth: u32, samples: u32, subpixel: u32, seed: u64) -> RenderConfig {
    RenderConfig {
        scene_file: PathBuf::new(),
        res_x: res,
        res_y: res,
        max_depth,
        samples,
        subpixel,
        use_gamma: false,
        shading: Shading::Global,
        seed,
    }
}

#[test]
fn renders_are_bitwise_deterministic_for_a_fixed_seed() {
    let mut job1 = RenderJob::new(cornell_scene(), test_cfg(8, 1, 2, 1, 7));
    let mut job2 = RenderJob::new(cornell_scene(), test_cfg(8, 1, 2, 1, 7));
    job1.render_scene();
    job2.render_scene();

    let img1 = job1.image();
    let img2 = job2.image();
    let img1 = img1.lock().unwrap();
    let img2 = img2.lock().unwrap();
    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(img1.pixel(x, y), img2.pixel(x, y));
        }
    }
}

#[test]
fn passes_average_the_subpixel_samples() {
    let res = 4;
    let k = 2;
    let mut job = RenderJob::new(cornell_scene(), test_cfg(res, 0, 0, k, 0));
    job.render_scene();
    let img = job.image();
    let img = img.lock().unwrap();

    // with no depth budget the shader is sample-free, so the expected
    // pixel is the plain average over the subpixel offsets
    let scene = cornell_scene();
    let p = params(0, 0, Shading::Global);
    let step = 1.0 / k as f32;
    for y in 0..res {
        for x in 0..res {
            let mut sum = RGB::zero();
            for i in 0..k {
                for j in 0..k {
                    let xp = -0.5 + i as f32 * step;
                    let yp = -0.5 + j as f32 * step;
                    let ray = scene.camera().get_ray(
                        (x as f32 + xp) / res as f32,
                        (y as f32 + yp) / res as f32,
                    );
                    let mut stats = RenderStats::default();
                    let mut rng = ChaCha8Rng::seed_from_u64(0);
                    sum += scene.send_ray(&mut stats, &mut rng, &ray, 0, &p);
                }
            }
            assert_eq!(img.pixel(x, y), sum / (k * k) as f32);
        }
    }
}

struct CountingSink {
    width: u32,
    height: u32,
    plots: u64,
    updates: u64,
}

impl Framebuffer for CountingSink {
    fn width(&self) -> u32 {
        self.width
    }
    fn height(&self) -> u32 {
        self.height
    }
    fn plot(&mut self, _x: u32, _y: u32, _c: RGB) {
        self.plots += 1;
    }
    fn update(&mut self) {
        self.updates += 1;
    }
}

#[test]
fn sink_is_updated_per_row_and_per_pass() {
    let res = 4;
    let k = 2;
    let mut job = RenderJob::new(cornell_scene(), test_cfg(res, 0, 0, k, 0));
    let sink = Arc::new(Mutex::new(CountingSink {
        width: res,
        height: res,
        plots: 0,
        updates: 0,
    }));
    job.set_sink(sink.clone());

    let rows = Arc::new(Mutex::new(0u64));
    let rows_seen = rows.clone();
    job.set_progress(ProgressFunc {
        func: Box::new(move |_| *rows_seen.lock().unwrap() += 1),
    });

    job.render_scene();

    let sink = sink.lock().unwrap();
    let passes = (k * k) as u64;
    assert_eq!(sink.plots, (res * res) as u64 * passes);
    assert_eq!(sink.updates, (res as u64 + 1) * passes);
    assert_eq!(*rows.lock().unwrap(), res as u64 * passes);
}

#[test]
fn shading_mode_parses_from_the_command_line_form() {
    assert_eq!("global".parse::<Shading>().unwrap(), Shading::Global);
    assert_eq!("direct".parse::<Shading>().unwrap(), Shading::Direct);
    assert!("phong".parse::<Shading>().is_err());
}

#[test]
fn cornell_smoke_produces_a_finite_lit_image() {
    let res = 16;
    let mut job = RenderJob::new(cornell_scene(), test_cfg(res, 1, 4, 1, 3));
    job.render_scene();

    assert_eq!(job.stats().num_rays_primary, (res * res) as u64);

    let img = job.image();
    let img = img.lock().unwrap();
    let mut lit = 0;
    for y in 0..res {
        for x in 0..res {
            let c = img.pixel(x, y);
            assert!(c.is_finite());
            assert!(c.r >= 0.0 && c.g >= 0.0 && c.b >= 0.0);
            if c.r > 0.0 {
                lit += 1;
            }
        }
    }
    assert!(lit > 0);
}
