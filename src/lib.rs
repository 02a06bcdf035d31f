//! # Lasergen
//!
//! Converts SVG vector paths into G-code for laser cutters.
//!
//! ## Architecture
//!
//! Lasergen is organized as a workspace with multiple crates:
//!
//! 1. **lasergen-core** - Vectors, matrices, tolerances and machine enums
//! 2. **lasergen-geometry** - Transformations, curves, chains and polyline approximation
//! 3. **lasergen-svg** - Path data grammar, basic shapes and SVG document traversal
//! 4. **lasergen-settings** - Laser settings, validation and TOML/JSON persistence
//! 5. **lasergen-camtools** - Machine interfaces, G-code dialects and the instruction compiler
//! 6. **lasergen** - This facade and the command line binary

pub use lasergen_camtools as camtools;
pub use lasergen_geometry as geometry;
pub use lasergen_settings as settings;
pub use lasergen_svg as svg;

pub use lasergen_camtools::{
    BoundsReport, Compiler, FanControlledGcode, Gcode, Interface, RasterScanlines,
};
pub use lasergen_geometry::ApproximationSettings;
pub use lasergen_settings::LaserSettings;
pub use lasergen_svg::{DocumentItem, ParseOptions, SvgDocument};

use anyhow::Context;
use tracing::{debug, info};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Options for a whole SVG to G-code conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    pub parse: ParseOptions,
    pub approximation: ApproximationSettings,
    /// Number of times the body is repeated.
    pub passes: u32,
    /// Use the fan-controlled dialect (M7 air assist, "Cut at" comments).
    pub fan_dialect: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            approximation: ApproximationSettings::default(),
            passes: 1,
            fan_dialect: false,
        }
    }
}

/// Convert an SVG document into a complete G-code program.
pub fn svg_to_gcode(
    svg: &str,
    options: &ConvertOptions,
    settings: &LaserSettings,
) -> anyhow::Result<String> {
    let document =
        lasergen_svg::parse_string(svg, &options.parse).context("Failed to parse SVG document")?;
    info!(
        "Parsed SVG document with {} item(s), canvas height {:?}",
        document.items.len(),
        document.canvas_height
    );

    if options.fan_dialect {
        compile_document(FanControlledGcode::new(), &document, options, settings)
    } else {
        compile_document(Gcode::new(), &document, options, settings)
    }
}

fn compile_document<I: Interface + Clone>(
    interface: I,
    document: &SvgDocument,
    options: &ConvertOptions,
    settings: &LaserSettings,
) -> anyhow::Result<String> {
    let mut compiler = Compiler::new(interface, settings.clone())
        .context("Invalid laser settings")?
        .with_approximation(options.approximation);

    for item in &document.items {
        match item {
            DocumentItem::Curves(curves) => {
                debug!("Appending {} curve(s)", curves.len());
                compiler.append_curves(curves)?;
            }
            DocumentItem::Image(image) => {
                if settings.showimage {
                    info!(
                        "Image {}x{} px at ({}, {}) size {}x{}",
                        image.image.width(),
                        image.image.height(),
                        image.x,
                        image.y,
                        image.width,
                        image.height
                    );
                }
                let raster = RasterScanlines::from_image(
                    image,
                    settings.pixel_size,
                    settings.raster_power_fraction(),
                )
                .context("Failed to rasterize embedded image")?;
                compiler.append_raster(&raster)?;
            }
        }
    }

    compiler
        .compile(options.passes)
        .context("Failed to compile G-code")
}

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr so generated G-code on stdout stays clean
/// - RUST_LOG environment variable support
/// - INFO level by default, DEBUG when `verbose` is set
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(verbose);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
