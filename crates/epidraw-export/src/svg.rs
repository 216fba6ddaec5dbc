//! SVG export serializer.
//!
//! Renders up to three layers on a square surface using the [`svg`]
//! crate for document construction, XML escaping, and path data
//! formatting:
//!
//! - `<g id="drawing">`: the stroke as the user drew it
//! - `<g id="trace">`: the pen trail reconstructed by the epicycles
//! - `<g id="epicycles">`: one snapshot of the chain, a circle and an
//!   arm per component
//!
//! Optional [`SvgMetadata`] embeds `<title>`, `<desc>`, and the
//! serialized configuration so exported files can be reproduced.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Circle, Description, Element, Group, Line, Path, Title};
use svg::node::{Node, Text, Value};

use epidraw_pipeline::{DrawnPath, Point, Polyline};

/// Namespace of the `<epidraw:config>` metadata element.
const CONFIG_NAMESPACE: &str = "urn:epidraw:config";

/// Metadata to embed in the SVG document.
///
/// Text values are XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,

    /// Serialized `EpicycleConfig` JSON, emitted inside
    /// `<metadata><epidraw:config>`.
    pub config_json: Option<&'a str>,
}

/// A snapshot of the epicycle chain: the anchor and the arm tips in
/// chain order, as in a playback `Scene`.
#[derive(Debug, Clone, Copy)]
pub struct Chain<'a> {
    /// Anchor of the first arm.
    pub origin: Point,
    /// Cumulative arm tips.
    pub arms: &'a [Point],
}

/// Layers to render. Every layer is in surface pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgLayers<'a> {
    /// The drawn stroke (see [`drawing_to_pixels`]).
    pub drawing: Option<&'a Polyline>,
    /// The reconstructed pen trail.
    pub trace: Option<&'a Polyline>,
    /// The epicycle chain.
    pub chain: Option<Chain<'a>>,
}

/// Convert a drawn path from grid cells to surface pixels, placing each
/// point at its cell center.
#[must_use]
pub fn drawing_to_pixels(path: &DrawnPath, cell_size: f64) -> Polyline {
    path.cells()
        .iter()
        .map(|cell| cell.center().scale(cell_size))
        .collect()
}

/// Build an SVG path `d` attribute string from a polyline.
///
/// Uses `M` for the first point and `L` for subsequent points.
/// Returns an empty string for polylines with fewer than 2 points.
///
/// # Examples
///
/// ```
/// use epidraw_pipeline::{Point, Polyline};
/// use epidraw_export::build_path_data;
///
/// let polyline = Polyline::new(vec![
///     Point::new(10.0, 20.0),
///     Point::new(30.0, 40.0),
/// ]);
/// assert_eq!(build_path_data(&polyline), "M10,20 L30,40");
/// ```
#[must_use]
pub fn build_path_data(polyline: &Polyline) -> String {
    let points = polyline.points();
    if points.len() < 2 {
        return String::new();
    }

    let first = &points[0];
    let mut data = Data::new().move_to((first.x, first.y));
    for p in &points[1..] {
        data = data.line_to((p.x, p.y));
    }
    String::from(Value::from(data))
}

fn polyline_group(id: &str, polyline: &Polyline, stroke: &str) -> Option<Group> {
    let d = build_path_data(polyline);
    if d.is_empty() {
        return None;
    }
    let path = Path::new()
        .set("d", d)
        .set("fill", "none")
        .set("stroke", stroke)
        .set("stroke-width", 1);
    Some(Group::new().set("id", id).add(path))
}

fn chain_group(chain: Chain<'_>) -> Option<Group> {
    if chain.arms.is_empty() {
        return None;
    }
    let mut circles = Group::new()
        .set("fill", "none")
        .set("stroke", "#999999")
        .set("stroke-width", 0.5);
    let mut arms = Group::new().set("stroke", "black").set("stroke-width", 1);

    let mut joint = chain.origin;
    for &tip in chain.arms {
        let radius = joint.distance(tip);
        if radius > 0.0 {
            circles = circles.add(
                Circle::new()
                    .set("cx", joint.x)
                    .set("cy", joint.y)
                    .set("r", radius),
            );
        }
        arms = arms.add(
            Line::new()
                .set("x1", joint.x)
                .set("y1", joint.y)
                .set("x2", tip.x)
                .set("y2", tip.y),
        );
        joint = tip;
    }

    Some(
        Group::new()
            .set("id", "epicycles")
            .add(circles)
            .add(arms),
    )
}

/// Serialize the given layers into an SVG document string.
///
/// The document is `surface_size` pixels square with a matching
/// `viewBox`. Layers are emitted in drawing, trace, epicycles order so
/// the chain paints on top. Polylines with fewer than 2 points and
/// empty chains are skipped.
#[must_use]
pub fn to_svg(layers: &SvgLayers<'_>, surface_size: f64, metadata: &SvgMetadata<'_>) -> String {
    let mut doc = Document::new()
        .set("width", surface_size)
        .set("height", surface_size)
        .set("viewBox", format!("0 0 {surface_size} {surface_size}"));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    if let Some(config_json) = metadata.config_json {
        let mut config_el = Element::new("epidraw:config");
        config_el.assign("xmlns:epidraw", CONFIG_NAMESPACE);
        config_el.append(Text::new(config_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(config_el);
        doc = doc.add(metadata_el);
    }

    if let Some(group) = layers
        .drawing
        .and_then(|p| polyline_group("drawing", p, "#1f77b4"))
    {
        doc = doc.add(group);
    }
    if let Some(group) = layers
        .trace
        .and_then(|p| polyline_group("trace", p, "#d62728"))
    {
        doc = doc.add(group);
    }
    if let Some(group) = layers.chain.and_then(chain_group) {
        doc = doc.add(group);
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}
