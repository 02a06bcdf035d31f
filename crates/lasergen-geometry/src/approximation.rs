//! Adaptive approximation of curves by line segments.

use crate::chain::LineSegmentChain;
use crate::curve::{max_distance, Curve, DEFAULT_SAMPLES};
use crate::error::{GeometryError, Result};
use crate::line::Line;
use lasergen_core::TOLERANCES;
use tracing::trace;

/// Parameters of [`line_segment_approximation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximationSettings {
    /// Factor the step grows or shrinks by. Must be greater than 1.
    pub growth_factor: f64,
    /// Maximum deviation allowed between the curve and any segment.
    pub error_cap: f64,
    /// Deviation below which the step grows. Defaults to
    /// `(growth_factor - 1) * error_cap`.
    pub error_floor: Option<f64>,
    /// Grow the step when a segment is well under the floor.
    pub minimize_lines: bool,
    /// First step, as a fraction of the parameter range.
    pub initial_increment: f64,
    /// Smallest step tried before giving up.
    pub minimum_increment: f64,
    /// Interior samples per segment used to measure deviation.
    pub samples: usize,
}

impl Default for ApproximationSettings {
    fn default() -> Self {
        Self {
            growth_factor: 1.5,
            error_cap: TOLERANCES.approximation,
            error_floor: None,
            minimize_lines: true,
            initial_increment: 0.1,
            minimum_increment: 1e-9,
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl ApproximationSettings {
    pub fn with_error_cap(mut self, error_cap: f64) -> Self {
        self.error_cap = error_cap;
        self
    }

    pub fn floor(&self) -> f64 {
        self.error_floor
            .unwrap_or((self.growth_factor - 1.0) * self.error_cap)
    }

    pub fn validate(&self) -> Result<()> {
        if self.growth_factor.is_nan() || self.growth_factor <= 1.0 {
            return Err(GeometryError::InvalidParameters(format!(
                "growth factor must be greater than 1, got {}",
                self.growth_factor
            )));
        }
        if self.error_cap.is_nan() || self.error_cap <= 0.0 {
            return Err(GeometryError::InvalidParameters(format!(
                "error cap must be positive, got {}",
                self.error_cap
            )));
        }
        if !(0.0..=1.0).contains(&self.initial_increment) || self.initial_increment == 0.0 {
            return Err(GeometryError::InvalidParameters(format!(
                "initial increment must be in (0, 1], got {}",
                self.initial_increment
            )));
        }
        if self.samples == 0 {
            return Err(GeometryError::InvalidParameters(
                "at least one sample is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Approximate `curve` by connected line segments whose deviation from the
/// curve does not exceed `settings.error_cap`.
///
/// A curve that is already a line is returned as a single segment. Otherwise
/// the step size adapts: a segment over the cap is retried with a smaller
/// step, and an accepted segment under the floor grows the next step.
pub fn line_segment_approximation<C>(
    curve: &C,
    settings: &ApproximationSettings,
) -> Result<LineSegmentChain>
where
    C: Curve + ?Sized,
{
    settings.validate()?;
    let mut chain = LineSegmentChain::new();

    if let Some(line) = curve.as_line() {
        chain.append(line)?;
        return Ok(chain);
    }

    let floor = settings.floor();
    let mut t = 0.0;
    let mut increment = settings.initial_increment;
    let mut line_start = curve.start();

    while t < 1.0 {
        let new_t = (t + increment).min(1.0);
        if new_t <= t {
            return Err(GeometryError::ApproximationStalled { t, increment });
        }

        let line_end = curve.point(new_t);
        let line = Line::new(line_start, line_end);
        let distance = max_distance(curve, &line, (t, new_t), (0.0, 1.0), settings.samples);

        if !distance.is_finite() {
            return Err(GeometryError::DegenerateGeometry(format!(
                "curve evaluates to a non-finite point near t={}",
                new_t
            )));
        }

        if distance > settings.error_cap {
            increment /= settings.growth_factor;
            if increment < settings.minimum_increment {
                return Err(GeometryError::ApproximationStalled { t, increment });
            }
            continue;
        }

        if distance < floor && settings.minimize_lines {
            increment *= settings.growth_factor;
        }

        chain.append(line)?;
        line_start = line_end;
        t = new_t;
    }

    trace!(segments = chain.chain_size(), "approximated curve");
    Ok(chain)
}
