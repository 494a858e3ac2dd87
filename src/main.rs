use colored::Colorize;
use std::path::PathBuf;
use structopt::StructOpt;

use raypath::render::RenderConfig;
use raypath::scene::{self, Shading};

#[derive(StructOpt, Debug)]
#[structopt(name = "raypath", about = "CPU path tracer with Monte Carlo global illumination")]
struct Options {
    #[structopt(long, default_value = "pic.png")]
    img_file: PathBuf,
    #[structopt(long, default_value = "scenes/cornell-emissive.json")]
    scene_file: PathBuf,
    #[structopt(short = "x", long, default_value = "0")]
    res_x: u32,
    #[structopt(short = "y", long, default_value = "0")]
    res_y: u32,
    #[structopt(short = "d", long, default_value = "1")]
    max_depth: u32,
    #[structopt(short = "s", long, default_value = "16")]
    samples: u32,
    #[structopt(short = "k", long, default_value = "1")]
    subpixel: u32,
    #[structopt(short = "g", long)]
    use_gamma: bool,
    #[structopt(long, default_value = "global")]
    shading: Shading,
    #[structopt(long, default_value = "0")]
    seed: u64,
    #[structopt(long)]
    generate: bool,
}

fn print_opt(opt: &Options) {
    println!("scene-file: {}", opt.scene_file.display());
    println!("image-file: {}", opt.img_file.display());
    println!("resolution: {}x{}", opt.res_x, opt.res_y);
    println!("gamma-correction: {}", opt.use_gamma);
    println!(
        "bounces: max-depth={} samples={} subpixel={}x{}",
        opt.max_depth, opt.samples, opt.subpixel, opt.subpixel
    );
    println!("shading: {:?} seed={}", opt.shading, opt.seed);
}

fn main() -> std::io::Result<()> {
    let opt = Options::from_args();

    if opt.generate {
        return scene::generate_scene(opt.scene_file);
    }

    print_opt(&opt);

    let cfg = RenderConfig {
        scene_file: opt.scene_file.clone(),
        res_x: opt.res_x,
        res_y: opt.res_y,
        max_depth: opt.max_depth,
        samples: opt.samples,
        subpixel: opt.subpixel,
        use_gamma: opt.use_gamma,
        shading: opt.shading,
        seed: opt.seed,
    };

    let mut job = scene::load_scene(cfg)?;
    println!("rendering {}", "...".bold());
    job.render_scene();
    job.save_image(opt.img_file)
}
