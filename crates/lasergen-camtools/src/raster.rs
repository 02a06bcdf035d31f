//! Raster scanlines.
//!
//! A scanline is a straight segment divided into equal cells, each with a
//! laser power in [0, 1]. The compiler scans them in alternating directions.

use lasergen_core::Vector;
use lasergen_svg::RasterImage;
use tracing::debug;

use crate::error::{CompileError, Result};

/// A stretch of constant power along a scanline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Run {
    pub from: Vector,
    pub to: Vector,
    pub power: f64,
}

impl Run {
    pub fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            power: self.power,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scanline {
    pub start: Vector,
    pub end: Vector,
    /// One power per cell, from `start` to `end`.
    pub powers: Vec<f64>,
}

impl Scanline {
    pub fn new(start: Vector, end: Vector, powers: Vec<f64>) -> Self {
        Self { start, end, powers }
    }

    /// Boundary between cells `index - 1` and `index`.
    pub fn boundary(&self, index: usize) -> Vector {
        let cells = self.powers.len().max(1) as f64;
        self.start + (self.end - self.start) * (index as f64 / cells)
    }

    /// Consecutive cells of equal power merged into runs, with unpowered
    /// cells at either end dropped.
    pub fn runs(&self) -> Vec<Run> {
        let first = self.powers.iter().position(|&p| p > 0.0);
        let last = self.powers.iter().rposition(|&p| p > 0.0);
        let (Some(first), Some(last)) = (first, last) else {
            return Vec::new();
        };

        let mut runs = Vec::new();
        let mut begin = first;
        for index in first + 1..=last + 1 {
            if index > last || self.powers[index] != self.powers[begin] {
                runs.push(Run {
                    from: self.boundary(begin),
                    to: self.boundary(index),
                    power: self.powers[begin],
                });
                begin = index;
            }
        }
        runs
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RasterScanlines {
    pub scanlines: Vec<Scanline>,
}

impl RasterScanlines {
    pub fn new(scanlines: Vec<Scanline>) -> Self {
        Self { scanlines }
    }

    pub fn is_empty(&self) -> bool {
        self.scanlines.iter().all(|line| line.runs().is_empty())
    }

    /// Sample an image into scanlines `pixel_size` apart.
    ///
    /// Power is the inverted luminance (black burns) scaled by `power_scale`.
    /// Scanlines run along the image's rows, top row first.
    pub fn from_image(image: &RasterImage, pixel_size: f64, power_scale: f64) -> Result<Self> {
        if !pixel_size.is_finite() || pixel_size <= 0.0 {
            return Err(CompileError::InvalidRaster(format!(
                "pixel size must be positive, got {}",
                pixel_size
            )));
        }
        let (width_px, height_px) = image.image.dimensions();
        if width_px == 0 || height_px == 0 {
            return Err(CompileError::InvalidRaster("image has no pixels".to_string()));
        }

        let width = image.map(0.0, 0.5).distance_to(image.map(1.0, 0.5));
        let height = image.map(0.5, 0.0).distance_to(image.map(0.5, 1.0));
        let columns = ((width / pixel_size).round() as usize).max(1);
        let rows = ((height / pixel_size).round() as usize).max(1);
        debug!(
            "Rasterizing {}x{} px image into {} scanlines of {} cells",
            width_px, height_px, rows, columns
        );

        let scale = power_scale.clamp(0.0, 1.0);
        let scanlines = (0..rows)
            .map(|row| {
                let v = (row as f64 + 0.5) / rows as f64;
                let py = ((v * height_px as f64) as u32).min(height_px - 1);
                let powers = (0..columns)
                    .map(|column| {
                        let u = (column as f64 + 0.5) / columns as f64;
                        let px = ((u * width_px as f64) as u32).min(width_px - 1);
                        let luma = image.image.get_pixel(px, py).0[0];
                        (255 - luma) as f64 / 255.0 * scale
                    })
                    .collect();
                Scanline::new(image.map(0.0, v), image.map(1.0, v), powers)
            })
            .collect();

        Ok(Self { scanlines })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use lasergen_geometry::Transformation;

    #[test]
    fn test_runs_merge_and_trim() {
        let line = Scanline::new(
            Vector::new(0.0, 0.0),
            Vector::new(6.0, 0.0),
            vec![0.0, 0.5, 0.5, 1.0, 0.0, 0.0],
        );
        let runs = line.runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].from, Vector::new(1.0, 0.0));
        assert_eq!(runs[0].to, Vector::new(3.0, 0.0));
        assert_eq!(runs[0].power, 0.5);
        assert_eq!(runs[1].from, Vector::new(3.0, 0.0));
        assert_eq!(runs[1].to, Vector::new(4.0, 0.0));
        assert_eq!(runs[1].power, 1.0);
    }

    #[test]
    fn test_interior_gap_kept() {
        let line = Scanline::new(Vector::ZERO, Vector::new(3.0, 0.0), vec![1.0, 0.0, 1.0]);
        let powers: Vec<f64> = line.runs().iter().map(|r| r.power).collect();
        assert_eq!(powers, vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_blank_line_has_no_runs() {
        let line = Scanline::new(Vector::ZERO, Vector::new(3.0, 0.0), vec![0.0; 3]);
        assert!(line.runs().is_empty());
        assert!(RasterScanlines::new(vec![line]).is_empty());
    }

    #[test]
    fn test_from_image() {
        let mut pixels = GrayImage::new(2, 2);
        pixels.put_pixel(0, 0, Luma([0]));
        pixels.put_pixel(1, 0, Luma([255]));
        pixels.put_pixel(0, 1, Luma([255]));
        pixels.put_pixel(1, 1, Luma([0]));
        let image = RasterImage {
            image: pixels,
            x: 0.0,
            y: 0.0,
            width: 2.0,
            height: 2.0,
            transformation: Transformation::new(),
        };

        let raster = RasterScanlines::from_image(&image, 0.5, 0.5).unwrap();
        assert_eq!(raster.scanlines.len(), 4);
        let top = &raster.scanlines[0];
        assert_eq!(top.powers, vec![0.5, 0.5, 0.0, 0.0]);
        assert!((top.start.y - 0.25).abs() < 1e-12);
        let bottom = &raster.scanlines[3];
        assert_eq!(bottom.powers, vec![0.0, 0.0, 0.5, 0.5]);

        assert!(RasterScanlines::from_image(&image, 0.0, 1.0).is_err());
    }
}
