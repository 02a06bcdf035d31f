//! SVG document traversal.
//!
//! Walks the element tree depth-first, composing transforms and visibility
//! down the tree, and turns every drawable element into curves or raster
//! images in document order.

use std::collections::HashMap;
use std::path::Path as FsPath;
use std::sync::LazyLock;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::GrayImage;
use lasergen_core::Vector;
use lasergen_geometry::{PathCurve, Transformation};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::SvgError;
use crate::path::Path;
use crate::shapes;

static LENGTH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)\s*(mm|cm|in|px|pt|pc)?\s*$")
        .expect("invalid length regex")
});

/// Options controlling how a document is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Map the SVG frame (y down) onto the machine frame (y up).
    pub transform_origin: bool,
    /// Overrides the height read from the root element.
    pub canvas_height: Option<f64>,
    /// Draw elements hidden through `visibility`.
    pub draw_hidden: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            transform_origin: true,
            canvas_height: None,
            draw_hidden: false,
        }
    }
}

/// A grayscale image placed on the canvas by an `<image>` element.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub image: GrayImage,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Maps the image's SVG placement into machine coordinates.
    pub transformation: Transformation,
}

impl RasterImage {
    /// Machine coordinates of a point given as fractions of the image box,
    /// `u` across from the left edge and `v` down from the top edge.
    pub fn map(&self, u: f64, v: f64) -> Vector {
        self.transformation
            .apply_affine(Vector::new(self.x + u * self.width, self.y + v * self.height))
    }

    /// Size of one source pixel in SVG units.
    pub fn pixel_extent(&self) -> (f64, f64) {
        (
            self.width / self.image.width().max(1) as f64,
            self.height / self.image.height().max(1) as f64,
        )
    }
}

/// One drawable element.
#[derive(Debug, Clone)]
pub enum DocumentItem {
    /// The curves of a path or basic shape, in drawing order.
    Curves(Vec<PathCurve>),
    Image(RasterImage),
}

/// A parsed SVG document.
#[derive(Debug, Clone, Default)]
pub struct SvgDocument {
    pub canvas_height: Option<f64>,
    pub items: Vec<DocumentItem>,
}

impl SvgDocument {
    /// All curves, flattened across elements.
    pub fn curves(&self) -> impl Iterator<Item = &PathCurve> {
        self.items.iter().flat_map(|item| match item {
            DocumentItem::Curves(curves) => curves.as_slice(),
            DocumentItem::Image(_) => &[] as &[PathCurve],
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &RasterImage> {
        self.items.iter().filter_map(|item| match item {
            DocumentItem::Image(image) => Some(image),
            DocumentItem::Curves(_) => None,
        })
    }

    pub fn into_curves(self) -> Vec<PathCurve> {
        self.items
            .into_iter()
            .flat_map(|item| match item {
                DocumentItem::Curves(curves) => curves,
                DocumentItem::Image(_) => Vec::new(),
            })
            .collect()
    }
}

/// Parse an SVG document from a string.
pub fn parse_string(svg: &str, options: &ParseOptions) -> Result<SvgDocument, SvgError> {
    let mut reader = Reader::from_str(svg);
    reader.config_mut().trim_text(true);

    let mut walker = Walker::new(options);
    let mut buf = Vec::new();
    // Depth inside a subtree that is not drawn at all.
    let mut skip_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if skip_depth > 0 {
                    skip_depth += 1;
                } else {
                    match walker.enter(Element::from_tag(e))? {
                        Some(scope) => walker.stack.push(scope),
                        None => skip_depth = 1,
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                if skip_depth == 0 {
                    walker.enter(Element::from_tag(e))?;
                }
            }
            Ok(Event::End(_)) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                } else {
                    walker.stack.pop();
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    if !walker.root_seen {
        return Err(SvgError::Xml("document has no root element".to_string()));
    }

    info!(
        "Parsed SVG: {} element(s), {} curve(s), {} image(s)",
        walker.document.items.len(),
        walker.document.curves().count(),
        walker.document.images().count()
    );
    Ok(walker.document)
}

/// Parse an SVG document from a file.
pub fn parse_file(path: impl AsRef<FsPath>, options: &ParseOptions) -> Result<SvgDocument, SvgError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    parse_string(&contents, options)
}

/// Parse a length such as `100`, `100mm` or `12.5px`, dropping the unit.
pub fn parse_length(value: &str) -> Option<f64> {
    let captures = LENGTH_REGEX.captures(value)?;
    captures.get(1)?.as_str().parse().ok()
}

struct Element {
    name: String,
    attributes: HashMap<String, String>,
}

impl Element {
    fn from_tag(e: &BytesStart) -> Self {
        let name = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
        let mut attributes = HashMap::new();
        for attr in e.attributes().flatten() {
            let key = std::str::from_utf8(attr.key.local_name().as_ref())
                .unwrap_or("")
                .to_string();
            let value = std::str::from_utf8(&attr.value).unwrap_or("").to_string();
            attributes.insert(key, value);
        }
        Self { name, attributes }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    fn length(&self, key: &str) -> Result<Option<f64>, SvgError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => parse_length(value).map(Some).ok_or_else(|| SvgError::InvalidAttribute {
                element: self.name.clone(),
                attribute: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    fn length_or_zero(&self, key: &str) -> Result<f64, SvgError> {
        Ok(self.length(key)?.unwrap_or(0.0))
    }

    /// True when `key` is set to `value` by attribute or inline style.
    fn has_style(&self, key: &str, value: &str) -> bool {
        if self.get(key).map(str::trim) == Some(value) {
            return true;
        }
        self.get("style").is_some_and(|style| {
            style.split(';').any(|declaration| {
                declaration
                    .split_once(':')
                    .is_some_and(|(k, v)| k.trim() == key && v.trim() == value)
            })
        })
    }
}

/// Inherited state of an open element.
#[derive(Debug, Clone)]
struct Scope {
    transformation: Option<Transformation>,
    visible: bool,
}

struct Walker<'a> {
    options: &'a ParseOptions,
    canvas_height: f64,
    root_seen: bool,
    stack: Vec<Scope>,
    document: SvgDocument,
}

impl<'a> Walker<'a> {
    fn new(options: &'a ParseOptions) -> Self {
        Self {
            options,
            canvas_height: 0.0,
            root_seen: false,
            stack: Vec::new(),
            document: SvgDocument::default(),
        }
    }

    /// Process an element. Returns the scope its children inherit, or `None`
    /// when the whole subtree is skipped.
    fn enter(&mut self, element: Element) -> Result<Option<Scope>, SvgError> {
        if !self.root_seen {
            self.root_seen = true;
            self.read_canvas_height(&element)?;
        }

        // display cannot be overridden by descendants
        if element.name == "defs" || element.has_style("display", "none") {
            debug!(element = %element.name, "skipping subtree");
            return Ok(None);
        }

        let parent = self.stack.last().cloned().unwrap_or(Scope {
            transformation: None,
            visible: true,
        });

        let mut transformation = parent.transformation;
        if let Some(transform) = element.get("transform") {
            let mut composed = transformation.unwrap_or_default();
            if let Err(err) = composed.parse(transform) {
                warn!("Skipping <{}> with invalid transform '{}': {}", element.name, transform, err);
                return Ok(None);
            }
            transformation = Some(composed);
        }

        let hidden = element.has_style("visibility", "hidden") || element.has_style("visibility", "collapse");
        let visible = (parent.visible && !hidden) || element.has_style("visibility", "visible");

        if self.options.draw_hidden || visible {
            if let Err(err) = self.draw(&element, transformation.as_ref()) {
                warn!("Skipping <{}>: {}", element.name, err);
            }
        }

        Ok(Some(Scope {
            transformation,
            visible,
        }))
    }

    fn read_canvas_height(&mut self, root: &Element) -> Result<(), SvgError> {
        let height = self
            .options
            .canvas_height
            .or_else(|| root.get("height").and_then(parse_length))
            .or_else(|| {
                // Fall back to the viewBox height when the root has none.
                root.get("viewBox").and_then(|view_box| {
                    view_box
                        .split(|c: char| c == ',' || c.is_whitespace())
                        .filter(|part| !part.is_empty())
                        .nth(3)
                        .and_then(parse_length)
                })
            });

        match height {
            Some(height) => {
                self.canvas_height = height;
                self.document.canvas_height = Some(height);
            }
            None if self.options.transform_origin => return Err(SvgError::MissingCanvasHeight),
            None => {}
        }
        Ok(())
    }

    /// The origin flip followed by the element's own transformation.
    fn placement(&self, transformation: Option<&Transformation>) -> Transformation {
        let mut composed = Transformation::new();
        if self.options.transform_origin {
            composed
                .add_translation(0.0, self.canvas_height)
                .add_scale(1.0, -1.0);
        }
        if let Some(element) = transformation {
            composed.extend(element);
        }
        composed
    }

    fn draw(&mut self, element: &Element, transformation: Option<&Transformation>) -> Result<(), SvgError> {
        if element.name == "image" {
            let image = self.raster_image(element, transformation)?;
            self.document.items.push(DocumentItem::Image(image));
            return Ok(());
        }

        let Some(d) = self.path_data(element)? else {
            return Ok(());
        };

        let path = Path::parse_with(&d, self.placement(transformation));
        if !path.skipped.is_empty() {
            warn!("<{}>: skipped {} malformed command(s)", element.name, path.skipped.len());
        }
        if !path.curves.is_empty() {
            self.document.items.push(DocumentItem::Curves(path.curves));
        }
        Ok(())
    }

    fn path_data(&self, element: &Element) -> Result<Option<String>, SvgError> {
        let d = match element.name.as_str() {
            "path" => element.get("d").map(str::to_string),
            "rect" => {
                let (Some(width), Some(height)) = (element.length("width")?, element.length("height")?) else {
                    return Ok(None);
                };
                shapes::rect_path(
                    element.length_or_zero("x")?,
                    element.length_or_zero("y")?,
                    width,
                    height,
                    element.length("rx")?,
                    element.length("ry")?,
                )
            }
            "circle" => shapes::circle_path(
                element.length_or_zero("cx")?,
                element.length_or_zero("cy")?,
                element.length_or_zero("r")?,
            ),
            "ellipse" => shapes::ellipse_path(
                element.length_or_zero("cx")?,
                element.length_or_zero("cy")?,
                element.length_or_zero("rx")?,
                element.length_or_zero("ry")?,
            ),
            "line" => Some(shapes::line_path(
                element.length_or_zero("x1")?,
                element.length_or_zero("y1")?,
                element.length_or_zero("x2")?,
                element.length_or_zero("y2")?,
            )),
            "polyline" => element.get("points").and_then(|points| shapes::poly_path(points, false)),
            "polygon" => element.get("points").and_then(|points| shapes::poly_path(points, true)),
            _ => None,
        };
        Ok(d)
    }

    fn raster_image(&self, element: &Element, transformation: Option<&Transformation>) -> Result<RasterImage, SvgError> {
        let href = element
            .get("href")
            .ok_or_else(|| SvgError::Image("<image> has no href".to_string()))?;
        let image = decode_data_url(href)?;

        let width = element.length("width")?.unwrap_or(image.width() as f64);
        let height = element.length("height")?.unwrap_or(image.height() as f64);

        Ok(RasterImage {
            x: element.length_or_zero("x")?,
            y: element.length_or_zero("y")?,
            width,
            height,
            transformation: self.placement(transformation),
            image,
        })
    }
}

/// Decode a base64 `data:` URL into a grayscale image.
fn decode_data_url(href: &str) -> Result<GrayImage, SvgError> {
    let (meta, payload) = href
        .trim()
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(|| SvgError::Image("only embedded data: URLs are supported".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(SvgError::Image(format!("unsupported image encoding '{}'", meta)));
    }

    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| SvgError::Image(format!("invalid base64: {}", e)))?;
    let decoded = image::load_from_memory(&bytes).map_err(|e| SvgError::Image(e.to_string()))?;
    Ok(decoded.to_luma8())
}
