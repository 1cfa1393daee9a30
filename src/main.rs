use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use maskscribe::draw::Bitmap;
use maskscribe::{Config, MaskEngine, script};

#[derive(Parser, Debug)]
#[command(name = "maskscribe")]
#[command(
    version,
    long_version = env!("MASKSCRIBE_LONG_VERSION"),
    about = "Stroke-based mask authoring for photo inpainting"
)]
struct Cli {
    /// Source image (PNG)
    #[arg(long, short = 'i', value_name = "PNG")]
    image: PathBuf,

    /// Committed strokes to apply (JSON stroke file)
    #[arg(
        long,
        value_name = "JSON",
        conflicts_with = "script",
        required_unless_present = "script"
    )]
    strokes: Option<PathBuf>,

    /// Gesture script to replay through the touch state machine (JSON)
    #[arg(long, value_name = "JSON")]
    script: Option<PathBuf>,

    /// Where to write the black/white mask (PNG)
    #[arg(long, short = 'm', value_name = "PNG")]
    mask: PathBuf,

    /// Also write the composited mask buffer (PNG)
    #[arg(long, value_name = "PNG")]
    composite: Option<PathBuf>,

    /// Also write the resulting stroke list (JSON)
    #[arg(long, value_name = "JSON")]
    save_strokes: Option<PathBuf>,

    /// Config file (defaults to ~/.config/maskscribe/config.toml)
    #[arg(long, short = 'c', value_name = "TOML")]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn read_image(path: &Path) -> Result<Bitmap> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Bitmap::read_png(&mut BufReader::new(file))
        .with_context(|| format!("failed to decode PNG {}", path.display()))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let image = read_image(&cli.image)?;
    let mut engine = MaskEngine::new(image, config).context("failed to start mask session")?;

    if let Some(path) = &cli.strokes {
        engine.set_strokes(script::load_strokes(path)?)?;
    } else if let Some(path) = &cli.script {
        let steps = script::load_script(path)?;
        let summary = script::replay(&mut engine, &steps, Instant::now())?;
        log::info!(
            "Replayed {} step(s): {} consumed, {} forwarded, {} ignored pointer event(s)",
            steps.len(),
            summary.consumed,
            summary.forwarded,
            summary.ignored
        );
    }

    let mask = engine.extract_binary_mask()?;
    if mask.is_empty() {
        log::warn!("No marked pixels; mask is entirely black");
    }
    mask.write_png(&mut create(&cli.mask)?)
        .with_context(|| format!("failed to write mask {}", cli.mask.display()))?;

    if let Some(path) = &cli.composite {
        engine
            .composite_bitmap()?
            .write_png(&mut create(path)?)
            .with_context(|| format!("failed to write composite {}", path.display()))?;
    }

    if let Some(path) = &cli.save_strokes {
        script::save_strokes(path, engine.strokes())?;
    }

    println!(
        "Mask written to {} ({} stroke(s), {} marked pixel(s))",
        cli.mask.display(),
        engine.strokes().len(),
        mask.marked_count()
    );
    Ok(())
}
