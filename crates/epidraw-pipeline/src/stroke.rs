//! Stroke recording: turn drawing-surface gestures into a [`DrawnPath`].
//!
//! A stroke is recorded between one gesture start and the matching
//! gesture end. Pointer samples in between are joined by
//! [`rasterize_line`] and consecutive duplicate cells are dropped. Once
//! the gesture ends the path is frozen until [`StrokeRecorder::clear`].

use serde::{Deserialize, Serialize};

use crate::geometry::rasterize_line;
use crate::types::{GridCell, Polyline};

/// An ordered, gap-free sequence of grid cells with no two consecutive
/// entries equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnPath(Vec<GridCell>);

impl DrawnPath {
    /// Build a path from cells, dropping consecutive duplicates.
    #[must_use]
    pub fn from_cells(cells: impl IntoIterator<Item = GridCell>) -> Self {
        let mut path = Self::default();
        for cell in cells {
            path.push(cell);
        }
        path
    }

    /// Append a cell unless it repeats the last one. Returns whether the
    /// cell was appended.
    fn push(&mut self, cell: GridCell) -> bool {
        if self.0.last() == Some(&cell) {
            return false;
        }
        self.0.push(cell);
        true
    }

    /// Recorded cells in drawing order.
    #[must_use]
    pub fn cells(&self) -> &[GridCell] {
        &self.0
    }

    /// Number of recorded cells.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing has been drawn.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cell centers as a continuous polyline in grid units.
    #[must_use]
    pub fn to_polyline(&self) -> Polyline {
        self.0.iter().map(|c| c.center()).collect()
    }
}

/// Where the recorder is within the gesture lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeState {
    /// No gesture in progress and nothing frozen.
    #[default]
    Ready,
    /// A gesture is in progress.
    Drawing,
    /// The gesture ended; the path is immutable.
    Finished,
}

/// Builds a [`DrawnPath`] from gesture events.
#[derive(Debug, Clone, Default)]
pub struct StrokeRecorder {
    path: DrawnPath,
    state: StrokeState,
    last_cell: Option<GridCell>,
}

impl StrokeRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a gesture at `cell`.
    ///
    /// Ignored once the stroke is finished. Starting again after a
    /// cancel continues the same path: the segment from the last
    /// recorded cell to `cell` is rasterized so the path stays gap-free.
    pub fn start(&mut self, cell: GridCell) {
        if self.state == StrokeState::Finished {
            return;
        }
        self.state = StrokeState::Drawing;
        self.last_cell = Some(cell);
        match self.path.0.last().copied() {
            Some(prev) => {
                for c in rasterize_line(prev, cell) {
                    self.path.push(c);
                }
            }
            None => {
                self.path.push(cell);
            }
        }
    }

    /// Extend the gesture to `cell`, rasterizing the segment from the
    /// previous sample.
    ///
    /// Returns the cells that were newly appended, which is what a
    /// drawing surface needs to paint. Outside a gesture, or when the
    /// pointer stays inside the previous cell, nothing is appended.
    pub fn extend(&mut self, cell: GridCell) -> Vec<GridCell> {
        if self.state != StrokeState::Drawing {
            return Vec::new();
        }
        let Some(last) = self.last_cell else {
            return Vec::new();
        };
        if last == cell {
            return Vec::new();
        }

        let added: Vec<GridCell> = rasterize_line(last, cell)
            .into_iter()
            .filter(|&c| self.path.push(c))
            .collect();
        self.last_cell = Some(cell);
        added
    }

    /// End the gesture and freeze the path.
    pub fn end(&mut self) {
        self.state = StrokeState::Finished;
        self.last_cell = None;
    }

    /// Abort the gesture without freezing the path.
    pub fn cancel(&mut self) {
        if self.state == StrokeState::Drawing {
            self.state = StrokeState::Ready;
        }
        self.last_cell = None;
    }

    /// Discard the recorded path and accept a new stroke.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The path recorded so far.
    #[must_use]
    pub const fn path(&self) -> &DrawnPath {
        &self.path
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> StrokeState {
        self.state
    }
}
