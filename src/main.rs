use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use lasergen::{init_logging, svg_to_gcode, ConvertOptions, LaserSettings, ParseOptions};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SVG file to convert
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Write G-code to this file instead of stdout
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Laser settings file (.toml or .json)
    #[arg(short, long, value_name = "SETTINGS")]
    config: Option<PathBuf>,

    /// Number of passes over the geometry
    #[arg(short, long, default_value_t = 1)]
    passes: u32,

    /// Canvas height used for the origin flip, overriding the document
    #[arg(long, value_name = "HEIGHT")]
    canvas_height: Option<f64>,

    /// Keep SVG coordinates (y down) instead of flipping to machine coordinates
    #[arg(long)]
    no_origin_flip: bool,

    /// Draw elements hidden with visibility:hidden
    #[arg(long)]
    draw_hidden: bool,

    /// Use the fan-controlled dialect (M7 air assist)
    #[arg(long)]
    fan: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_settings(config: Option<&PathBuf>) -> anyhow::Result<LaserSettings> {
    if let Some(path) = config {
        return lasergen_settings::load_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()));
    }

    match lasergen_settings::default_settings_path() {
        Ok(path) if path.exists() => {
            info!("Using settings from {}", path.display());
            lasergen_settings::load_from_file(&path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))
        }
        Ok(path) => {
            debug!("No settings at {}, using defaults", path.display());
            Ok(LaserSettings::default())
        }
        Err(e) => {
            debug!("No settings directory ({}), using defaults", e);
            Ok(LaserSettings::default())
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;
    debug!("lasergen {} (built {})", lasergen::VERSION, lasergen::BUILD_DATE);

    let settings = load_settings(args.config.as_ref())?;
    let svg = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let options = ConvertOptions {
        parse: ParseOptions {
            transform_origin: !args.no_origin_flip,
            canvas_height: args.canvas_height,
            draw_hidden: args.draw_hidden,
        },
        passes: args.passes,
        fan_dialect: args.fan,
        ..Default::default()
    };
    let gcode = svg_to_gcode(&svg, &options, &settings)
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &gcode)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote G-code to {}", path.display());
        }
        None => {
            std::io::stdout()
                .lock()
                .write_all(gcode.as_bytes())
                .context("Failed to write G-code to stdout")?;
        }
    }

    Ok(())
}
