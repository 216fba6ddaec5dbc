//! Shared types for the epidraw epicycle pipeline.

use serde::{Deserialize, Serialize};

/// A discrete cell on the drawing surface grid.
///
/// Rows grow downward and columns grow rightward, matching the pixel
/// layout of the surface the cells were captured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    /// Row index (cells from the top edge).
    pub row: i32,
    /// Column index (cells from the left edge).
    pub col: i32,
}

impl GridCell {
    /// Create a new cell.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The continuous point at the center of this cell, in grid units.
    ///
    /// Cell `(row, col)` maps to `(col + 0.5, row + 0.5)`.
    #[must_use]
    pub fn center(self) -> Point {
        Point::new(f64::from(self.col) + 0.5, f64::from(self.row) + 0.5)
    }

    /// Whether the cell lies inside a `grid_size` x `grid_size` surface.
    #[must_use]
    pub fn in_bounds(self, grid_size: u32) -> bool {
        let size = i64::from(grid_size);
        (0..size).contains(&i64::from(self.row)) && (0..size).contains(&i64::from(self.col))
    }

    /// Clamp the cell into a `grid_size` x `grid_size` surface.
    #[must_use]
    pub fn clamped(self, grid_size: u32) -> Self {
        let max = i32::try_from(grid_size.saturating_sub(1)).unwrap_or(i32::MAX);
        Self::new(self.row.clamp(0, max), self.col.clamp(0, max))
    }
}

/// A 2D point in continuous coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position (grows downward on the surface).
    pub y: f64,
}

impl Point {
    /// The origin `(0, 0)`.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation toward `other`: `t = 0` is `self`, `t = 1`
    /// is `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            (other.x - self.x).mul_add(t, self.x),
            (other.y - self.y).mul_add(t, self.y),
        )
    }

    /// Scale both coordinates by `factor`.
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// An ordered sequence of connected points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline(Vec<Point>);

impl Polyline {
    /// Create a new polyline from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the polyline has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the polyline.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    /// Returns the last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the polyline and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }

    /// Total length of the polyline: the sum of consecutive distances.
    #[must_use]
    pub fn arc_length(&self) -> f64 {
        self.0.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// Arithmetic mean of all points, or `None` for an empty polyline.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn centroid(&self) -> Option<Point> {
        if self.0.is_empty() {
            return None;
        }
        let n = self.0.len() as f64;
        let (sx, sy) = self
            .0
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point::new(sx / n, sy / n))
    }
}

impl FromIterator<Point> for Polyline {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One bin of the discrete Fourier transform of a sampled path.
///
/// When re-expanded as `amp * e^(i * (freq * t + phase))` the component
/// is a single arm of the epicycle chain rotating at `freq` turns per
/// period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FourierComponent {
    /// Signed harmonic index in `(-N/2, N/2]`.
    pub freq: i64,
    /// Arm length: `hypot(re, im)`.
    pub amp: f64,
    /// Arm angle at `t = 0`: `atan2(im, re)`.
    pub phase: f64,
    /// Real part of the coefficient.
    pub re: f64,
    /// Imaginary part of the coefficient.
    pub im: f64,
}

/// Cumulative chain positions at one simulation time.
///
/// Entry `k` is the tip of arm `k` after every earlier arm has been
/// added, so the last entry is the pen position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrame(Vec<Point>);

impl AnimationFrame {
    /// Create a frame from arm tip positions.
    #[must_use]
    pub const fn new(arms: Vec<Point>) -> Self {
        Self(arms)
    }

    /// Arm tip positions in chain order.
    #[must_use]
    pub fn arms(&self) -> &[Point] {
        &self.0
    }

    /// Number of arms in the chain.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the chain has no arms.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The pen position: the tip of the last arm.
    #[must_use]
    pub fn tip(&self) -> Option<Point> {
        self.0.last().copied()
    }
}

/// Configuration for drawing, decomposition, and playback.
///
/// Defaults reproduce a 156-cell square grid on a 500px surface with
/// 200 samples, 200 precomputed frames, and 0.3 frames per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpicycleConfig {
    /// Number of cells along each side of the drawing surface.
    pub grid_size: u32,

    /// Side length of the square drawing and playback surfaces, in
    /// pixels.
    pub surface_size: f64,

    /// Number of uniformly spaced samples taken from the drawn path
    /// before the transform. This is also the number of DFT bins.
    pub sample_count: usize,

    /// Upper bound on how many components (ranked by amplitude) are
    /// kept for the epicycle chain.
    pub max_components: usize,

    /// Number of precomputed animation frames per revolution.
    pub frame_count: usize,

    /// Fractional frames advanced per playback tick.
    pub playback_speed: f64,
}

impl EpicycleConfig {
    /// Default grid size in cells.
    pub const DEFAULT_GRID_SIZE: u32 = 156;
    /// Default surface side length in pixels.
    pub const DEFAULT_SURFACE_SIZE: f64 = 500.0;
    /// Default resample count.
    pub const DEFAULT_SAMPLE_COUNT: usize = 200;
    /// Default top-K bound.
    pub const DEFAULT_MAX_COMPONENTS: usize = 1000;
    /// Default number of frames per revolution.
    pub const DEFAULT_FRAME_COUNT: usize = 200;
    /// Default playback speed in frames per tick.
    pub const DEFAULT_PLAYBACK_SPEED: f64 = 0.3;

    /// Size of one grid cell in pixels.
    ///
    /// This is the linear unit that converts grid coordinates to
    /// surface pixels, and therefore also scales epicycle arm lengths.
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.surface_size / f64::from(self.grid_size)
    }

    /// Center of the playback surface, where the epicycle chain is
    /// anchored.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.surface_size / 2.0, self.surface_size / 2.0)
    }

    /// Check the configuration for values the pipeline cannot use.
    ///
    /// # Errors
    ///
    /// Returns [`EpicycleError::InvalidConfig`] describing the first
    /// offending field.
    pub fn validate(&self) -> Result<(), EpicycleError> {
        if self.grid_size == 0 {
            return Err(EpicycleError::InvalidConfig(
                "grid_size must be at least 1".to_string(),
            ));
        }
        if !self.surface_size.is_finite() || self.surface_size <= 0.0 {
            return Err(EpicycleError::InvalidConfig(format!(
                "surface_size must be positive and finite, got {}",
                self.surface_size
            )));
        }
        if self.sample_count < 2 {
            return Err(EpicycleError::InvalidConfig(format!(
                "sample_count must be at least 2, got {}",
                self.sample_count
            )));
        }
        if !self.playback_speed.is_finite() || self.playback_speed <= 0.0 {
            return Err(EpicycleError::InvalidConfig(format!(
                "playback_speed must be positive and finite, got {}",
                self.playback_speed
            )));
        }
        Ok(())
    }
}

impl Default for EpicycleConfig {
    fn default() -> Self {
        Self {
            grid_size: Self::DEFAULT_GRID_SIZE,
            surface_size: Self::DEFAULT_SURFACE_SIZE,
            sample_count: Self::DEFAULT_SAMPLE_COUNT,
            max_components: Self::DEFAULT_MAX_COMPONENTS,
            frame_count: Self::DEFAULT_FRAME_COUNT,
            playback_speed: Self::DEFAULT_PLAYBACK_SPEED,
        }
    }
}

/// Errors raised by the epicycle pipeline.
///
/// None of these are fatal. The [`Session`](crate::Session) leaves its
/// state untouched when one occurs, so a caller that ignores the error
/// simply sees the requested feature not activate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum EpicycleError {
    /// Fewer than two drawn points were available.
    #[error("at least two drawn points are required")]
    InsufficientInput,

    /// The drawn path has zero total length and cannot be resampled.
    #[error("drawn path has zero length")]
    DegeneratePath,

    /// Playback was requested before any frames were computed.
    #[error("no animation frames to play")]
    EmptyAnimation,

    /// Configuration is invalid.
    #[error("invalid epicycle configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cell_center_is_offset_by_half() {
        let p = GridCell::new(2, 7).center();
        assert_eq!(p, Point::new(7.5, 2.5));
    }

    #[test]
    fn cell_bounds() {
        assert!(GridCell::new(0, 0).in_bounds(4));
        assert!(GridCell::new(3, 3).in_bounds(4));
        assert!(!GridCell::new(4, 0).in_bounds(4));
        assert!(!GridCell::new(0, -1).in_bounds(4));
        assert!(!GridCell::new(0, 0).in_bounds(0));
    }

    #[test]
    fn cell_clamped_into_grid() {
        assert_eq!(GridCell::new(-3, 12).clamped(10), GridCell::new(0, 9));
        assert_eq!(GridCell::new(4, 5).clamped(10), GridCell::new(4, 5));
    }

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
        assert!((distance(b, a) - 5.0).abs() < f64::EPSILON);
        assert!((a.distance_squared(b) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn point_lerp_endpoints_and_midpoint() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(5.0, -2.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Point::new(3.0, 0.0));
    }

    #[test]
    fn polyline_arc_length() {
        let pl = Polyline::new(vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 4.0),
        ]);
        assert!((pl.arc_length() - 7.0).abs() < 1e-12);
        assert!(Polyline::default().arc_length().abs() < f64::EPSILON);
    }

    #[test]
    fn polyline_centroid() {
        let pl: Polyline = [Point::new(0.0, 0.0), Point::new(4.0, 2.0)]
            .into_iter()
            .collect();
        assert_eq!(pl.centroid(), Some(Point::new(2.0, 1.0)));
        assert_eq!(Polyline::default().centroid(), None);
    }

    #[test]
    fn frame_tip_is_last_arm() {
        let frame = AnimationFrame::new(vec![Point::new(1.0, 1.0), Point::new(2.0, 3.0)]);
        assert_eq!(frame.tip(), Some(Point::new(2.0, 3.0)));
        assert_eq!(frame.len(), 2);
        assert_eq!(AnimationFrame::default().tip(), None);
    }

    // --- EpicycleConfig ---

    #[test]
    fn config_defaults() {
        let config = EpicycleConfig::default();
        assert_eq!(config.grid_size, 156);
        assert!((config.surface_size - 500.0).abs() < f64::EPSILON);
        assert_eq!(config.sample_count, 200);
        assert_eq!(config.max_components, 1000);
        assert_eq!(config.frame_count, 200);
        assert!((config.playback_speed - 0.3).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_cell_size_and_origin() {
        let config = EpicycleConfig {
            grid_size: 100,
            surface_size: 250.0,
            ..EpicycleConfig::default()
        };
        assert!((config.cell_size() - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.origin(), Point::new(125.0, 125.0));
    }

    #[test]
    fn config_rejects_bad_values() {
        let bad = [
            EpicycleConfig {
                grid_size: 0,
                ..EpicycleConfig::default()
            },
            EpicycleConfig {
                surface_size: -1.0,
                ..EpicycleConfig::default()
            },
            EpicycleConfig {
                surface_size: f64::NAN,
                ..EpicycleConfig::default()
            },
            EpicycleConfig {
                sample_count: 1,
                ..EpicycleConfig::default()
            },
            EpicycleConfig {
                playback_speed: 0.0,
                ..EpicycleConfig::default()
            },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(EpicycleError::InvalidConfig(_))),
                "expected InvalidConfig for {config:?}",
            );
        }
    }

    #[test]
    fn config_partial_json_fills_defaults() {
        let config: EpicycleConfig = serde_json::from_str(r#"{"sample_count": 64}"#).unwrap();
        assert_eq!(config.sample_count, 64);
        assert_eq!(config.grid_size, EpicycleConfig::DEFAULT_GRID_SIZE);
    }

    #[test]
    fn config_serde_round_trip() {
        let config = EpicycleConfig {
            grid_size: 80,
            surface_size: 320.0,
            sample_count: 128,
            max_components: 40,
            frame_count: 90,
            playback_speed: 0.5,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: EpicycleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    // --- EpicycleError ---

    #[test]
    fn error_display() {
        assert_eq!(
            EpicycleError::InsufficientInput.to_string(),
            "at least two drawn points are required",
        );
        assert_eq!(
            EpicycleError::DegeneratePath.to_string(),
            "drawn path has zero length"
        );
        assert_eq!(
            EpicycleError::EmptyAnimation.to_string(),
            "no animation frames to play"
        );
        assert_eq!(
            EpicycleError::InvalidConfig("grid_size".to_string()).to_string(),
            "invalid epicycle configuration: grid_size",
        );
    }

    #[test]
    fn error_result_serde_round_trip() {
        let result: Result<(), EpicycleError> = Err(EpicycleError::DegeneratePath);
        let json = serde_json::to_string(&result).unwrap();
        let back: Result<(), EpicycleError> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Err(EpicycleError::DegeneratePath));
    }
}
