//! Integration test: draw a square, decompose it, and export the
//! drawing, the reconstructed trace, and the first chain snapshot.

#![allow(clippy::unwrap_used)]

use epidraw_export::{Chain, SvgLayers, SvgMetadata, drawing_to_pixels, to_svg};
use epidraw_pipeline::simulate::trace;
use epidraw_pipeline::{EpicycleConfig, GridCell, Session};

#[test]
fn exported_square_has_every_layer() {
    let config = EpicycleConfig {
        max_components: 12,
        ..EpicycleConfig::default()
    };
    let mut session = Session::new(config).unwrap();
    session.gesture_start(GridCell::new(40, 40));
    for cell in [(40, 110), (110, 110), (110, 40), (40, 40)] {
        session.gesture_extend(GridCell::new(cell.0, cell.1));
    }
    session.gesture_end();
    session.regenerate().unwrap();

    let config = session.config().clone();
    let drawing = drawing_to_pixels(session.drawn_path(), config.cell_size());
    let traced = trace(session.frames());
    let first = &session.frames()[0];
    let layers = SvgLayers {
        drawing: Some(&drawing),
        trace: Some(&traced),
        chain: Some(Chain {
            origin: config.origin(),
            arms: first.arms(),
        }),
    };
    let config_json = r#"{"max_components":12}"#;
    let meta = SvgMetadata {
        title: Some("square"),
        description: None,
        config_json: Some(config_json),
    };

    let svg = to_svg(&layers, config.surface_size, &meta);
    assert!(svg.contains(r#"id="drawing""#));
    assert!(svg.contains(r#"id="trace""#));
    assert!(svg.contains(r#"id="epicycles""#));
    assert_eq!(svg.matches("<line").count(), 12);
    assert!(svg.matches("<circle").count() <= 12);
    assert!(svg.contains("<title>square</title>"));
}
