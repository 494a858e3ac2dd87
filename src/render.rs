use colored::Colorize;
use indicatif::ProgressBar;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::color::RGB;
use crate::image::{Framebuffer, Image};
use crate::scene::{Scene, Shading, TraceParams};
use crate::vec3::Float;
use crate::{ProgressFunc, RenderStats, CANCEL};

pub struct RenderConfig {
    pub scene_file: PathBuf,
    pub res_x: u32,
    pub res_y: u32,
    pub max_depth: u32,
    pub samples: u32,
    pub subpixel: u32,
    pub use_gamma: bool,
    pub shading: Shading,
    pub seed: u64,
}

fn mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

// One RNG stream per (pass, pixel): images are reproducible for a given
// seed whatever the worker count.
fn pixel_seed(base: u64, pass: u32, x: u32, y: u32) -> u64 {
    mix(base ^ mix(((pass as u64) << 40) ^ ((y as u64) << 20) ^ x as u64))
}

pub struct RenderJob {
    pub scene: Scene,
    pub cfg: RenderConfig,
    image: Arc<Mutex<Image>>,
    sink: Arc<Mutex<dyn Framebuffer + Send>>,
    total_stats: Mutex<RenderStats>,
    progress_func: ProgressFunc,
}

impl RenderJob {
    pub fn new(scene: Scene, cfg: RenderConfig) -> RenderJob {
        let image = Arc::new(Mutex::new(Image::new(cfg.use_gamma, cfg.res_x, cfg.res_y)));
        let sink: Arc<Mutex<dyn Framebuffer + Send>> = image.clone();
        RenderJob {
            scene,
            cfg,
            image,
            sink,
            total_stats: Mutex::new(Default::default()),
            progress_func: Default::default(),
        }
    }

    pub fn set_sink(&mut self, sink: Arc<Mutex<dyn Framebuffer + Send>>) {
        self.sink = sink;
    }

    pub fn set_progress(&mut self, progress_func: ProgressFunc) {
        self.progress_func = progress_func;
    }

    pub fn image(&self) -> Arc<Mutex<Image>> {
        self.image.clone()
    }

    pub fn stats(&self) -> RenderStats {
        *self.total_stats.lock().unwrap()
    }

    /// Runs subpixel^2 sequential passes; rows within a pass render in
    /// parallel, each worker owning its row of the accumulator.
    pub fn render_scene(&mut self) {
        let start_time = Instant::now();
        let (width, height) = {
            let sink = self.sink.lock().unwrap();
            (sink.width(), sink.height())
        };
        let k = self.cfg.subpixel.max(1);
        let step = 1.0 / k as Float;
        let params = TraceParams {
            max_depth: self.cfg.max_depth,
            samples: self.cfg.samples,
            shading: self.cfg.shading,
        };

        let mut accum: Vec<(u32, RGB)> = vec![(0, RGB::zero()); (width * height) as usize];
        let pb = ProgressBar::new(width as u64 * height as u64 * (k * k) as u64);
        let rows_done = Mutex::new(0u64);
        let total_rows = height as u64 * (k * k) as u64;

        let mut pass: u32 = 0;
        for i in 0..k {
            for j in 0..k {
                let xp = -0.5 + i as Float * step;
                let yp = -0.5 + j as Float * step;

                accum
                    .par_chunks_mut(width as usize)
                    .enumerate()
                    .for_each(|(y, row)| {
                        if CANCEL.load(Ordering::SeqCst) {
                            pb.inc(width as u64);
                            return;
                        }
                        let y = y as u32;
                        let mut stats = RenderStats::default();
                        for x in 0..width {
                            let mut rng = ChaCha8Rng::seed_from_u64(pixel_seed(
                                self.cfg.seed,
                                pass,
                                x,
                                y,
                            ));
                            let ray = self.scene.camera().get_ray(
                                (x as Float + xp) / width as Float,
                                (y as Float + yp) / height as Float,
                            );
                            stats.num_rays_primary += 1;
                            let c = self.scene.send_ray(&mut stats, &mut rng, &ray, 0, &params);

                            let cell = &mut row[x as usize];
                            cell.0 += 1;
                            cell.1 += c;
                            self.sink.lock().unwrap().plot(x, y, cell.1 / cell.0 as Float);
                        }
                        self.sink.lock().unwrap().update();
                        pb.inc(width as u64);
                        self.total_stats.lock().unwrap().add(stats);

                        let mut done = rows_done.lock().unwrap();
                        *done += 1;
                        (self.progress_func.func)(*done as f32 / total_rows as f32);
                    });

                self.sink.lock().unwrap().update();
                pass += 1;
            }
        }

        pb.finish_and_clear();
        self.print_stats(start_time);
    }

    fn print_stats(&self, start_time: Instant) {
        let pretty_print = |n: u64| {
            let mut precision = 3;
            let suffix;
            let val;
            if n > 1_000_000_000_000 {
                val = n as f64 / 1_000_000_000_000.0;
                suffix = "T";
            } else if n > 1_000_000_000 {
                val = n as f64 / 1_000_000_000.0;
                suffix = "G";
            } else if n >= 1_000_000 {
                val = n as f64 / 1_000_000.0;
                suffix = "M";
            } else {
                val = n as f64;
                suffix = " ";
                precision = 0
            }
            format!("{:6.precision$} {suffix}", val)
        };
        let stats = self.stats();
        let elapsed = start_time.elapsed();
        let num_rays = stats.num_rays_primary
            + stats.num_rays_diffuse
            + stats.num_rays_specular
            + stats.num_rays_refracted
            + stats.num_rays_shadow;
        let tot_lat_str = format!("{:.2} sec", elapsed.as_millis() as f64 / 1000.0);
        let ray_lat_str = format!(
            "{:.3} usec",
            elapsed.as_micros() as f64 / num_rays.max(1) as f64
        );
        let kray_per_secs = num_rays as f64 / elapsed.as_secs_f64().max(1e-9) / 1_000_f64;
        let mut v = kray_per_secs;
        let mut suffix = "K";
        if kray_per_secs >= 1000.0 {
            v = kray_per_secs / 1000.0;
            suffix = "M";
        }
        println!(
            "duration: {} -- {} per ray -- {:.3} {}rays/sec",
            tot_lat_str.bold(),
            ray_lat_str.bold(),
            v,
            suffix
        );

        let intersect_stats = [
            ("Triangle", stats.num_intersects_triangle),
            ("AABB", stats.num_intersects_aabb),
            ("AABB-culled", stats.num_aabb_culled),
        ];
        for (s, n) in intersect_stats {
            println!(
                "num_intersects {:<12}{:>12}",
                format!("{}:", s),
                pretty_print(n)
            );
        }

        let ray_stats = [
            ("num_rays_primary", stats.num_rays_primary),
            ("num_rays_diffuse", stats.num_rays_diffuse),
            ("num_rays_specular", stats.num_rays_specular),
            ("num_rays_refracted", stats.num_rays_refracted),
            ("num_rays_shadow", stats.num_rays_shadow),
            ("num_rays_max_depth", stats.num_rays_max_depth),
        ];
        for (s, n) in ray_stats {
            println!(
                "{:<24} {:>12} -- {:3}%",
                format!("{}:", s),
                pretty_print(n),
                100 * n / num_rays.max(1)
            );
        }
    }

    pub fn save_image(&self, img_file: PathBuf) -> std::io::Result<()> {
        self.image.lock().unwrap().save_image(img_file)
    }
}
