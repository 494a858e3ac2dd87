use colored::Colorize;
use image::{Rgb, RgbImage};
use std::path::PathBuf;
use std::time::Instant;

use crate::color::RGB;
use crate::vec3::Float;

const GAMMA: Float = 2.2;

/// Rendering target consumed opaquely by the render driver.
pub trait Framebuffer {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn plot(&mut self, x: u32, y: u32, c: RGB);
    fn update(&mut self);
}

fn gamma_encode(linear: Float) -> Float {
    linear.powf(1.0 / GAMMA)
}

/// In-memory HDR framebuffer; tone mapping happens only on export.
pub struct Image {
    use_gamma: bool,
    res_x: u32,
    res_y: u32,
    pixels: Vec<RGB>,
}

impl Image {
    pub fn new(use_gamma: bool, res_x: u32, res_y: u32) -> Image {
        Image {
            use_gamma,
            res_x,
            res_y,
            pixels: vec![RGB::zero(); (res_x * res_y) as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> RGB {
        self.pixels[(y * self.res_x + x) as usize]
    }

    pub fn save_image(&self, file: PathBuf) -> std::io::Result<()> {
        let start_time = Instant::now();
        let mut img = RgbImage::new(self.res_x, self.res_y);

        for y in 0..self.res_y {
            for x in 0..self.res_x {
                let c = self.pixel(x, y);
                let (mut rf, mut gf, mut bf) = (c.r, c.g, c.b);
                if self.use_gamma {
                    rf = gamma_encode(rf);
                    gf = gamma_encode(gf);
                    bf = gamma_encode(bf);
                }
                let r = (255.0 * rf).clamp(0.0, 255.0) as u8;
                let g = (255.0 * gf).clamp(0.0, 255.0) as u8;
                let b = (255.0 * bf).clamp(0.0, 255.0) as u8;
                img.put_pixel(x, y, Rgb([r, g, b]));
            }
        }

        img.save(file.clone()).expect("png write");
        let elapsed = start_time.elapsed();
        println!(
            "writing '{}' took {} sec",
            file.display().to_string().bold(),
            elapsed.as_millis() as f64 / 1000.0
        );
        Ok(())
    }
}

impl Framebuffer for Image {
    fn width(&self) -> u32 {
        self.res_x
    }
    fn height(&self) -> u32 {
        self.res_y
    }
    fn plot(&mut self, x: u32, y: u32, c: RGB) {
        self.pixels[(y * self.res_x + x) as usize] = c;
    }
    fn update(&mut self) {}
}
