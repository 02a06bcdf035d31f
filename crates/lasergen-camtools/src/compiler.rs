//! The instruction compiler.
//!
//! Drives an [`Interface`] over approximated geometry and raster scanlines,
//! collecting the generated commands into a body that [`Compiler::compile`]
//! wraps with a header, repeated passes and a footer.

use std::path::Path;

use lasergen_core::{DistanceMode, Vector, TOLERANCES};
use lasergen_geometry::{
    line_segment_approximation, ApproximationSettings, BoundingBox, Curve, LineSegmentChain, PathCurve,
};
use lasergen_settings::LaserSettings;
use tracing::{info, warn};

use crate::error::{BoundsWarning, CompileError, Result};
use crate::interface::{Interface, MachineParameters};
use crate::raster::RasterScanlines;

/// Outcome of checking the geometry against the machine travel.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundsReport {
    /// Nothing has been drawn.
    Empty,
    Within,
    Exceeded(Vec<BoundsWarning>),
    /// No travel limits are configured.
    LimitsUndefined,
    /// Incremental coordinates cannot be checked.
    Incremental,
}

/// Compiles geometry into an instruction stream for the interface `I`.
#[derive(Debug, Clone)]
pub struct Compiler<I: Interface> {
    interface: I,
    settings: LaserSettings,
    approximation: ApproximationSettings,
    movement_speed: f64,
    header: Vec<String>,
    body: Vec<String>,
    generated: String,
}

impl<I: Interface> Compiler<I> {
    /// Create a compiler. Fails with [`CompileError::InvalidConfiguration`]
    /// when the power range or movement speed is missing or out of range.
    pub fn new(mut interface: I, settings: LaserSettings) -> Result<Self> {
        settings
            .validate_for_compile()
            .map_err(|e| CompileError::InvalidConfiguration(e.to_string()))?;
        let movement_speed = settings
            .movement_speed
            .ok_or_else(|| CompileError::InvalidConfiguration("movement_speed is mandatory".to_string()))?
            as f64;

        interface.set_machine_parameters(MachineParameters::from_settings(&settings));

        let mut header = vec![
            interface.code_initialize(),
            interface.set_unit(settings.unit),
            interface.set_distance_mode(settings.distance_mode),
            interface.set_movement_speed(movement_speed),
            interface.laser_off(),
        ];
        header.extend(settings.custom_header.iter().cloned());

        Ok(Self {
            interface,
            approximation: ApproximationSettings::default(),
            movement_speed,
            header,
            body: Vec::new(),
            generated: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            settings,
        })
    }

    /// Replace the approximation parameters used by [`Compiler::append_curves`].
    pub fn with_approximation(mut self, approximation: ApproximationSettings) -> Self {
        self.approximation = approximation;
        self
    }

    pub fn interface(&self) -> &I {
        &self.interface
    }

    pub fn settings(&self) -> &LaserSettings {
        &self.settings
    }

    pub fn body(&self) -> &[String] {
        &self.body
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.interface.state().bounding_box
    }

    /// Laser off, travel to `start` and restore speed and laser mode.
    fn travel_to(&mut self, start: Vector, speed: f64, dwell: bool, code: &mut Vec<String>) -> Result<()> {
        let first_motion = self.interface.position().is_none();
        let dwell_time = if dwell { self.settings.dwell_time } else { 0.0 };

        if dwell_time > 0.0 && !self.settings.dwell_before_cut {
            code.push(self.interface.dwell(dwell_time));
        }
        code.push(self.interface.laser_off());

        if self.settings.rapid_move || first_motion {
            code.push(self.interface.rapid_move(Some(start.x), Some(start.y), None)?);
        } else {
            code.push(self.interface.set_laser_power(0.0)?);
            code.push(self.interface.set_movement_speed(self.movement_speed));
            code.push(self.interface.linear_move(Some(start.x), Some(start.y), None)?);
        }

        if dwell_time > 0.0 && self.settings.dwell_before_cut {
            code.push(self.interface.dwell(dwell_time));
        }
        code.push(self.interface.set_movement_speed(speed));
        code.push(self.interface.set_laser_mode(self.settings.laser_mode));

        self.interface.state_mut().track(start);
        Ok(())
    }

    /// Cut along a chain of line segments.
    pub fn append_line_chain(&mut self, chain: &LineSegmentChain) -> Result<()> {
        let Some(first) = chain.first() else {
            warn!("Attempted to append an empty line chain");
            return Ok(());
        };
        let start = first.start;

        let mut code = Vec::new();
        let needs_travel = self
            .interface
            .position()
            .is_none_or(|position| position.distance_to(start) > TOLERANCES.operation);
        if needs_travel {
            self.travel_to(start, self.movement_speed, true, &mut code)?;
            code.push(self.interface.set_laser_power(self.settings.laser_power)?);
        }

        for line in chain {
            code.push(self.interface.linear_move(Some(line.end.x), Some(line.end.y), None)?);
            self.interface.state_mut().track(line.end);
        }

        self.body.extend(code.into_iter().filter(|c| !c.is_empty()));
        Ok(())
    }

    /// Approximate each curve with line segments and cut it. Curves that
    /// cannot be approximated are skipped with a warning.
    pub fn append_curves<'a, C>(&mut self, curves: C) -> Result<()>
    where
        C: IntoIterator<Item = &'a PathCurve>,
    {
        for curve in curves {
            match line_segment_approximation(curve, &self.approximation) {
                Ok(chain) => self.append_line_chain(&chain)?,
                Err(err) => warn!("Skipping {} from {}: {}", curve.kind(), curve.start(), err),
            }
        }
        Ok(())
    }

    /// Scan raster lines, alternating direction on every line that has
    /// powered cells.
    pub fn append_raster(&mut self, raster: &RasterScanlines) -> Result<()> {
        let speed = self
            .settings
            .raster_speed()
            .map(f64::from)
            .unwrap_or(self.movement_speed);

        let mut code = Vec::new();
        let mut reverse = false;
        for scanline in &raster.scanlines {
            let mut runs = scanline.runs();
            if runs.is_empty() {
                continue;
            }
            if reverse {
                runs = runs.into_iter().rev().map(|run| run.reversed()).collect();
            }
            reverse = !reverse;

            self.travel_to(runs[0].from, speed, false, &mut code)?;
            for run in runs {
                code.push(self.interface.set_laser_power(run.power)?);
                code.push(self.interface.linear_move(Some(run.to.x), Some(run.to.y), None)?);
                self.interface.state_mut().track(run.to);
            }
        }

        if code.is_empty() {
            warn!("Raster has no powered pixels");
        }
        self.body.extend(code.into_iter().filter(|c| !c.is_empty()));
        Ok(())
    }

    /// Check the drawn geometry against the configured machine travel.
    pub fn bounds_report(&self) -> BoundsReport {
        let Some(bbox) = self.bounding_box() else {
            return BoundsReport::Empty;
        };
        if self.settings.distance_mode == DistanceMode::Incremental {
            return BoundsReport::Incremental;
        }
        if self.settings.x_axis_maximum_travel.is_none() && self.settings.y_axis_maximum_travel.is_none() {
            return BoundsReport::LimitsUndefined;
        }

        let axes = [
            ('X', bbox.min.x, bbox.max.x, self.settings.x_axis_maximum_travel),
            ('Y', bbox.min.y, bbox.max.y, self.settings.y_axis_maximum_travel),
        ];
        let warnings: Vec<BoundsWarning> = axes
            .into_iter()
            .filter_map(|(axis, min, max, travel)| {
                let travel = travel? as f64;
                let tolerance = TOLERANCES.operation;
                (min < -tolerance || max > travel + tolerance).then_some(BoundsWarning {
                    axis,
                    min,
                    max,
                    travel,
                })
            })
            .collect();

        if warnings.is_empty() {
            BoundsReport::Within
        } else {
            BoundsReport::Exceeded(warnings)
        }
    }

    fn comment_block(&self, passes: u32) -> Vec<String> {
        let mut lines = vec![
            self.interface
                .comment(&format!("lasergen {}", env!("CARGO_PKG_VERSION"))),
            self.interface.comment(&format!("Generated: {}", self.generated)),
            self.interface.comment(&format!(
                "Passes: {}, pass depth: {}",
                passes, self.settings.pass_depth
            )),
        ];

        match self.bounding_box() {
            Some(bbox) => lines.push(self.interface.comment(&format!("Bounding box: {}", bbox))),
            None => lines.push(self.interface.comment("Bounding box: empty")),
        }

        let report = self.bounds_report();
        match &report {
            BoundsReport::Exceeded(warnings) => {
                for warning in warnings {
                    warn!("{}", warning);
                    lines.push(self.interface.comment(&format!("WARNING: {}", warning)));
                }
            }
            BoundsReport::LimitsUndefined => {
                lines.push(self.interface.comment(
                    "Travel limits undefined, bounds not checked (set x_axis_maximum_travel and y_axis_maximum_travel)",
                ));
            }
            BoundsReport::Incremental => {
                lines.push(self.interface.comment("Incremental distance mode, bounds not checked"));
            }
            BoundsReport::Within | BoundsReport::Empty => {}
        }

        if matches!(report, BoundsReport::Within | BoundsReport::Exceeded(_)) {
            for (axis, travel) in [
                ('X', self.settings.x_axis_maximum_travel),
                ('Y', self.settings.y_axis_maximum_travel),
            ] {
                if travel.is_none() {
                    lines.push(self.interface.comment(&format!("{} travel limit undefined, axis not checked", axis)));
                }
            }
        }

        lines
    }
}

impl<I: Interface + Clone> Compiler<I> {
    /// Assemble header, `passes` repetitions of the body and footer.
    ///
    /// Between passes the laser is switched off and, with a pass depth, Z
    /// steps down by that depth. Calling this repeatedly yields the same text.
    pub fn compile(&self, passes: u32) -> Result<String> {
        let passes = passes.max(1);
        if self.body.is_empty() {
            warn!("Compiling with an empty body (no curves). Is this intentional?");
        }
        if passes > 1 && self.settings.distance_mode == DistanceMode::Incremental {
            warn!("Repeating passes in incremental distance mode offsets every pass");
        }

        let mut lines = self.comment_block(passes);
        lines.extend(self.header.iter().cloned());

        for pass in 0..passes {
            if passes > 1 {
                lines.push(self.interface.comment(&format!("Pass {} of {}", pass + 1, passes)));
            }
            lines.extend(self.body.iter().cloned());

            // Every pass ends in the state the body left behind; emit from a
            // copy so the compiler itself is untouched.
            let mut interface = self.interface.clone();
            if pass + 1 < passes {
                lines.push(interface.laser_off());
                if self.settings.pass_depth > 0.0 {
                    lines.push(interface.set_distance_mode(DistanceMode::Incremental));
                    lines.push(interface.linear_move(None, None, Some(-self.settings.pass_depth))?);
                    lines.push(interface.set_distance_mode(self.settings.distance_mode));
                }
            } else {
                lines.push(interface.laser_off());
                lines.extend(self.settings.custom_footer.iter().cloned());
                lines.push(interface.program_end());
            }
        }

        let mut output = lines
            .into_iter()
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        output.push('\n');

        info!(
            "Compiled {} body line(s) x {} pass(es)",
            self.body.len(),
            passes
        );
        Ok(output)
    }

    /// [`Compiler::compile`] and write the result to `path`.
    pub fn compile_to_file(&self, path: impl AsRef<Path>, passes: u32) -> Result<()> {
        let output = self.compile(passes)?;
        std::fs::write(path.as_ref(), output)?;
        info!("Wrote G-code to {}", path.as_ref().display());
        Ok(())
    }
}
