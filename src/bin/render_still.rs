use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use kaleidoscope_tui::scene::Scene;
use kaleidoscope_tui::share;
use kaleidoscope_tui::visual::{FrameDriver, FrameInputs};

const DEFAULT_OUTPUT: &str = "still.png";
const MAX_DIM: usize = 8192;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "render_still",
    version,
    about = "Render one kaleidoscope frame to a PNG file"
)]
struct Cli {
    #[arg(long, default_value_t = 1280)]
    width: usize,

    #[arg(long, default_value_t = 720)]
    height: usize,

    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    time: f32,

    #[arg(long)]
    scene: Option<PathBuf>,

    #[arg(long, value_name = "TOKEN")]
    load: Option<String>,

    #[arg(long, value_name = "PNG", default_value = DEFAULT_OUTPUT)]
    out: PathBuf,
}

fn validate_args(args: &Cli) -> Result<()> {
    if args.width == 0 || args.width > MAX_DIM {
        bail!("--width must be in 1..={MAX_DIM}");
    }
    if args.height == 0 || args.height > MAX_DIM {
        bail!("--height must be in 1..={MAX_DIM}");
    }
    if !args.time.is_finite() {
        bail!("--time must be a finite number of seconds");
    }
    Ok(())
}

// Unlike the interactive host, a bad scene or token is an error here.
fn load_scene(args: &Cli) -> Result<Scene> {
    let mut scene = Scene::default();
    if let Some(path) = args.scene.as_deref() {
        scene = Scene::load(path).with_context(|| format!("load scene {}", path.display()))?;
    }
    if let Some(token) = args.load.as_deref() {
        scene = share::decode(token).context("decode share token")?;
    }
    Ok(scene)
}

fn write_png(path: &Path, rgba: &[u8], width: usize, height: usize) -> Result<()> {
    let mut parent = path.parent().unwrap_or_else(|| Path::new(""));
    if parent == Path::new("") {
        parent = Path::new(".");
    }
    fs::create_dir_all(parent)
        .with_context(|| format!("create output directory {}", parent.display()))?;

    let mut png_bytes = Vec::new();
    PngEncoder::new(&mut png_bytes)
        .write_image(
            rgba,
            width as u32,
            height as u32,
            image::ExtendedColorType::Rgba8,
        )
        .context("encode png")?;
    fs::write(path, png_bytes).with_context(|| format!("write {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();
    validate_args(&args)?;

    let scene = load_scene(&args)?;
    let inputs = FrameInputs::new(
        args.time,
        args.width,
        args.height,
        scene.params,
        scene.camera,
        kaleidoscope_tui::mirror::MirrorSet::from_points(&scene.mirrors),
    );

    let mut driver = FrameDriver::new();
    let rgba = driver.render(&inputs);
    write_png(&args.out, rgba, args.width, args.height)?;
    log::info!(
        "wrote {}x{} frame at t={:.2}s to {}",
        args.width,
        args.height,
        args.time,
        args.out.display()
    );
    Ok(())
}
