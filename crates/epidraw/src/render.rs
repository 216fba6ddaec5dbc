//! Raster rendering of one playback tick via tiny-skia.

use epidraw_pipeline::Point;
use image::{Rgba, RgbaImage};
use tiny_skia::{Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// One tick's worth of geometry, owned so it outlives the session
/// borrow.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Anchor of the chain.
    pub origin: Point,
    /// Cumulative arm tips.
    pub arms: Vec<Point>,
    /// Pen trail, oldest first.
    pub trail: Vec<Point>,
}

fn paint(r: u8, g: u8, b: u8, a: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

#[allow(clippy::cast_possible_truncation)]
fn stroke(width: f64) -> Stroke {
    Stroke {
        width: width as f32,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn polyline_path(points: &[Point]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    pb.finish()
}

/// Render the chain and trail on a white square of `size` pixels.
///
/// Circles are light gray, arms black, and the trail red. Returns
/// `None` if `size` is zero.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn render_snapshot(snapshot: &Snapshot, size: u32) -> Option<RgbaImage> {
    let mut pixmap = Pixmap::new(size, size)?;
    pixmap.fill(Color::WHITE);

    let thin = stroke(1.0);
    let circle_paint = paint(200, 200, 200, 255);
    let mut joint = snapshot.origin;
    for &tip in &snapshot.arms {
        let radius = joint.distance(tip) as f32;
        if let Some(circle) = PathBuilder::from_circle(joint.x as f32, joint.y as f32, radius) {
            pixmap.stroke_path(&circle, &circle_paint, &thin, Transform::identity(), None);
        }
        joint = tip;
    }

    if snapshot.trail.len() >= 2
        && let Some(path) = polyline_path(&snapshot.trail)
    {
        pixmap.stroke_path(
            &path,
            &paint(214, 39, 40, 255),
            &stroke(2.0),
            Transform::identity(),
            None,
        );
    }

    let mut chain = Vec::with_capacity(snapshot.arms.len() + 1);
    chain.push(snapshot.origin);
    chain.extend_from_slice(&snapshot.arms);
    if let Some(path) = polyline_path(&chain) {
        pixmap.stroke_path(&path, &paint(0, 0, 0, 255), &thin, Transform::identity(), None);
    }

    Some(to_rgba_image(&pixmap))
}

/// Convert a pixmap (premultiplied RGBA) to an `RgbaImage` (straight
/// RGBA).
#[allow(clippy::cast_possible_truncation)]
fn to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let data = pixmap.data();
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (i, pixel) in img.pixels_mut().enumerate() {
        let off = i * 4;
        let a = data[off + 3];
        if a == 0 {
            *pixel = Rgba([0, 0, 0, 0]);
        } else {
            let r = u16::from(data[off]) * 255 / u16::from(a);
            let g = u16::from(data[off + 1]) * 255 / u16::from(a);
            let b = u16::from(data[off + 2]) * 255 / u16::from(a);
            *pixel = Rgba([r as u8, g as u8, b as u8, a]);
        }
    }
    img
}
