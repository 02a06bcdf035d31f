use lasergen_core::Vector;
use lasergen_geometry::{Curve, PathCurve};
use lasergen_svg::{parse_file, parse_string, DocumentItem, ParseOptions, SvgError};

const PIXELS_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAIAAAABCAAAAADRSSBWAAAAC0lEQVR4nGNg+A8AAQIBAEK+vGgAAAAASUVORK5CYII=";

fn wrap(height: &str, body: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" height="{}">{}</svg>"#,
        height, body
    )
}

fn starts(curves: &[PathCurve]) -> Vec<Vector> {
    curves.iter().map(|c| c.start()).collect()
}

#[test]
fn test_fixture_file_skips_defs_and_display_none() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/square.svg");
    let document = parse_file(path, &ParseOptions::default()).unwrap();

    assert_eq!(document.canvas_height, Some(100.0));
    let curves: Vec<PathCurve> = document.into_curves();
    assert_eq!(curves.len(), 4);

    // Translated by the group, then flipped into the machine frame.
    assert!(curves[0].start().approx_eq(Vector::new(10.0, 100.0), 1e-9));
    assert!(curves[0].end().approx_eq(Vector::new(20.0, 100.0), 1e-9));
    assert!(curves[1].end().approx_eq(Vector::new(20.0, 90.0), 1e-9));
}

#[test]
fn test_nested_transforms_compose() {
    let svg = wrap(
        "50",
        r#"<g transform="translate(5,0)"><g transform="scale(2)"><path d="M1 1 L2 1"/></g></g>"#,
    );
    let options = ParseOptions {
        transform_origin: false,
        ..Default::default()
    };
    let curves = parse_string(&svg, &options).unwrap().into_curves();
    assert_eq!(curves.len(), 1);
    assert!(curves[0].start().approx_eq(Vector::new(7.0, 2.0), 1e-9));
    assert!(curves[0].end().approx_eq(Vector::new(9.0, 2.0), 1e-9));
}

#[test]
fn test_sibling_transforms_do_not_leak() {
    let svg = wrap(
        "50",
        r#"<g transform="translate(5,0)"><path d="M0 0 L1 0"/></g><path d="M0 0 L1 0"/>"#,
    );
    let options = ParseOptions {
        transform_origin: false,
        ..Default::default()
    };
    let curves = parse_string(&svg, &options).unwrap().into_curves();
    assert_eq!(
        starts(&curves),
        vec![Vector::new(5.0, 0.0), Vector::new(0.0, 0.0)]
    );
}

#[test]
fn test_visibility_inheritance() {
    let svg = wrap(
        "50",
        r#"<g visibility="hidden">
             <path d="M0 0 L1 0"/>
             <path style="visibility:visible" d="M2 0 L3 0"/>
           </g>
           <path visibility="collapse" d="M4 0 L5 0"/>"#,
    );
    let options = ParseOptions {
        transform_origin: false,
        ..Default::default()
    };
    let curves = parse_string(&svg, &options).unwrap().into_curves();
    assert_eq!(starts(&curves), vec![Vector::new(2.0, 0.0)]);

    let all = ParseOptions {
        transform_origin: false,
        draw_hidden: true,
        ..Default::default()
    };
    assert_eq!(parse_string(&svg, &all).unwrap().into_curves().len(), 3);
}

#[test]
fn test_display_none_is_not_overridable() {
    let svg = wrap(
        "50",
        r#"<g display="none"><path style="visibility:visible" d="M0 0 L1 0"/></g>"#,
    );
    let options = ParseOptions {
        draw_hidden: true,
        ..Default::default()
    };
    assert!(parse_string(&svg, &options).unwrap().items.is_empty());
}

#[test]
fn test_missing_canvas_height() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0 L1 1"/></svg>"#;
    let err = parse_string(svg, &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, SvgError::MissingCanvasHeight));

    // Not needed without the origin flip.
    let options = ParseOptions {
        transform_origin: false,
        ..Default::default()
    };
    assert_eq!(parse_string(svg, &options).unwrap().into_curves().len(), 1);

    // Supplied explicitly.
    let options = ParseOptions {
        canvas_height: Some(10.0),
        ..Default::default()
    };
    let curves = parse_string(svg, &options).unwrap().into_curves();
    assert!(curves[0].start().approx_eq(Vector::new(0.0, 10.0), 1e-9));
}

#[test]
fn test_view_box_height_fallback() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 40 30"><path d="M0 0 L1 0"/></svg>"#;
    let document = parse_string(svg, &ParseOptions::default()).unwrap();
    assert_eq!(document.canvas_height, Some(30.0));
}

#[test]
fn test_basic_shapes() {
    let svg = wrap(
        "100",
        r#"<rect x="1" y="1" width="4" height="2"/>
           <circle cx="10" cy="10" r="3"/>
           <ellipse cx="20" cy="20" rx="3" ry="1"/>
           <line x1="0" y1="0" x2="5" y2="5"/>
           <polyline points="0,0 1,1 2,0"/>
           <polygon points="0,0 1,1 2,0"/>"#,
    );
    let options = ParseOptions {
        transform_origin: false,
        ..Default::default()
    };
    let document = parse_string(&svg, &options).unwrap();
    let counts: Vec<usize> = document
        .items
        .iter()
        .map(|item| match item {
            DocumentItem::Curves(curves) => curves.len(),
            DocumentItem::Image(_) => 0,
        })
        .collect();
    assert_eq!(counts, vec![4, 2, 2, 1, 2, 3]);
}

#[test]
fn test_invalid_element_is_skipped() {
    let svg = wrap(
        "100",
        r#"<rect x="abc" width="4" height="2"/><path d="M0 0 L1 0"/>"#,
    );
    let document = parse_string(&svg, &ParseOptions::default()).unwrap();
    assert_eq!(document.items.len(), 1);
}

#[test]
fn test_invalid_transform_skips_subtree() {
    let svg = wrap(
        "100",
        r#"<g transform="wobble(3)"><path d="M0 0 L1 0"/></g><path d="M0 0 L1 0"/>"#,
    );
    let document = parse_string(&svg, &ParseOptions::default()).unwrap();
    assert_eq!(document.items.len(), 1);
}

#[test]
fn test_embedded_image() {
    let body = format!(
        r#"<image x="2" y="4" width="10" height="5" xlink:href="data:image/png;base64,{}"/>"#,
        PIXELS_PNG
    );
    let svg = wrap("20", &body);
    let document = parse_string(&svg, &ParseOptions::default()).unwrap();

    let images: Vec<_> = document.images().collect();
    assert_eq!(images.len(), 1);
    let image = images[0];
    assert_eq!(image.image.dimensions(), (2, 1));
    assert_eq!(image.image.get_pixel(0, 0).0[0], 0);
    assert_eq!(image.image.get_pixel(1, 0).0[0], 255);
    // Top-left corner of the box lands at y = 20 - 4 after the flip.
    assert!(image.map(0.0, 0.0).approx_eq(Vector::new(2.0, 16.0), 1e-9));
}

#[test]
fn test_external_image_is_skipped() {
    let svg = wrap("20", r#"<image width="1" height="1" href="picture.png"/>"#);
    let document = parse_string(&svg, &ParseOptions::default()).unwrap();
    assert!(document.items.is_empty());
}

#[test]
fn test_malformed_xml() {
    let err = parse_string("<svg height=\"10\"><path d=\"M0 0\"></svg>", &ParseOptions::default());
    assert!(matches!(err, Err(SvgError::Xml(_))));
}
