//! Basic SVG shapes expressed as path data.
//!
//! Each shape is converted to a `d` string so that it goes through the same
//! parser and transformation handling as `<path>` elements.

use crate::scanner::Scanner;

/// `<rect>` with optional rounded corners. Returns `None` for an empty rect.
pub fn rect_path(x: f64, y: f64, width: f64, height: f64, rx: Option<f64>, ry: Option<f64>) -> Option<String> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }

    // A missing radius takes the value of the other one.
    let (rx, ry) = match (rx, ry) {
        (Some(rx), Some(ry)) => (rx, ry),
        (Some(r), None) | (None, Some(r)) => (r, r),
        (None, None) => (0.0, 0.0),
    };
    let rx = rx.abs().min(width / 2.0);
    let ry = ry.abs().min(height / 2.0);

    if rx == 0.0 || ry == 0.0 {
        return Some(format!(
            "M{x},{y} H{} V{} H{x} Z",
            x + width,
            y + height
        ));
    }

    let right = x + width;
    let bottom = y + height;
    Some(format!(
        "M{},{y} H{} A{rx},{ry} 0 0 1 {right},{} V{} A{rx},{ry} 0 0 1 {},{bottom} H{} A{rx},{ry} 0 0 1 {x},{} V{} A{rx},{ry} 0 0 1 {},{y} Z",
        x + rx,
        right - rx,
        y + ry,
        bottom - ry,
        right - rx,
        x + rx,
        bottom - ry,
        y + ry,
        x + rx,
    ))
}

/// `<ellipse>` as two half arcs. Returns `None` when a radius is not positive.
pub fn ellipse_path(cx: f64, cy: f64, rx: f64, ry: f64) -> Option<String> {
    if rx <= 0.0 || ry <= 0.0 {
        return None;
    }
    Some(format!(
        "M{},{cy} A{rx},{ry} 0 1 0 {},{cy} A{rx},{ry} 0 1 0 {},{cy} Z",
        cx - rx,
        cx + rx,
        cx - rx
    ))
}

/// `<circle>`.
pub fn circle_path(cx: f64, cy: f64, r: f64) -> Option<String> {
    ellipse_path(cx, cy, r, r)
}

/// `<line>`.
pub fn line_path(x1: f64, y1: f64, x2: f64, y2: f64) -> String {
    format!("M{x1},{y1} L{x2},{y2}")
}

/// `<polyline>` (`close = false`) or `<polygon>` (`close = true`).
///
/// An odd trailing coordinate is ignored, as SVG renderers do.
pub fn poly_path(points: &str, close: bool) -> Option<String> {
    let mut scanner = Scanner::new(points);
    let mut values = Vec::new();
    loop {
        scanner.skip_separators();
        match scanner.read_number() {
            Some(v) => values.push(v),
            None => break,
        }
    }

    let mut pairs = values.chunks_exact(2);
    let first = pairs.next()?;
    let mut d = format!("M{},{}", first[0], first[1]);
    for pair in pairs {
        d.push_str(&format!(" L{},{}", pair[0], pair[1]));
    }
    if close {
        d.push_str(" Z");
    }
    Some(d)
}
