//! epidraw-export: Pure format serializers (sans-IO)
//!
//! Converts drawn paths, reconstructed traces, and epicycle chains into
//! SVG documents.

pub mod svg;

pub use svg::{Chain, SvgLayers, SvgMetadata, build_path_data, drawing_to_pixels, to_svg};
