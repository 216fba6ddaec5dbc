//! The session controller: one object owning the stroke, the
//! decomposition, and playback.
//!
//! A UI layer forwards gestures and button presses here and hands each
//! [`Scene`] from [`Session::tick`] to its renderer. All mutation goes
//! through `&mut self`, so regeneration always completes before the
//! next tick reads the frames.

use crate::diagnostics::{DecompositionDiagnostics, decompose_with_diagnostics};
use crate::geometry::cell_at;
use crate::playback::{PlaybackPhase, Player, Scene, Scheduler};
use crate::stroke::{DrawnPath, StrokeRecorder};
use crate::types::{
    AnimationFrame, EpicycleConfig, EpicycleError, FourierComponent, GridCell, Point, Polyline,
};

/// Drawing, decomposition, and playback state for one drawing surface.
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: EpicycleConfig,
    stroke: StrokeRecorder,
    samples: Polyline,
    components: Vec<FourierComponent>,
    frames: Vec<AnimationFrame>,
    player: Player,
}

impl Session {
    /// Create a session with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EpicycleError::InvalidConfig`] if `config` fails
    /// [`EpicycleConfig::validate`].
    pub fn new(config: EpicycleConfig) -> Result<Self, EpicycleError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    // --- Drawing surface hooks ---

    /// Pointer pressed on `cell`. Cells outside the grid are clamped.
    pub fn gesture_start(&mut self, cell: GridCell) {
        self.stroke.start(cell.clamped(self.config.grid_size));
    }

    /// Pointer moved to `cell`. Returns the cells newly added to the
    /// drawn path so the surface can paint them.
    pub fn gesture_extend(&mut self, cell: GridCell) -> Vec<GridCell> {
        self.stroke.extend(cell.clamped(self.config.grid_size))
    }

    /// Pointer pressed at `position`, in surface pixels. Positions off
    /// the surface land on the border cells.
    pub fn pointer_start(&mut self, position: Point) {
        self.gesture_start(self.cell_under(position));
    }

    /// Pointer moved to `position`, in surface pixels. Returns the cells
    /// newly added to the drawn path.
    pub fn pointer_extend(&mut self, position: Point) -> Vec<GridCell> {
        self.gesture_extend(self.cell_under(position))
    }

    fn cell_under(&self, position: Point) -> GridCell {
        cell_at(position, self.config.cell_size(), self.config.grid_size)
    }

    /// Pointer released: the drawn path is frozen.
    pub fn gesture_end(&mut self) {
        self.stroke.end();
    }

    /// Pointer capture lost: stop drawing without freezing the path.
    pub fn gesture_cancel(&mut self) {
        self.stroke.cancel();
    }

    // --- UI operations ---

    /// Decompose the drawn path into epicycles and precompute frames.
    ///
    /// On success the previous decomposition is discarded and playback
    /// is stopped and rewound; call [`start_playback`](Self::start_playback)
    /// to animate the new chain.
    ///
    /// # Errors
    ///
    /// Returns [`EpicycleError::InsufficientInput`] if fewer than two
    /// cells were drawn and [`EpicycleError::DegeneratePath`] if the
    /// path has no length. On error the session is left unchanged.
    pub fn regenerate(&mut self) -> Result<DecompositionDiagnostics, EpicycleError> {
        let path = self.stroke.path();
        if path.len() < 2 {
            tracing::debug!(cells = path.len(), "regenerate ignored: not enough drawn cells");
            return Err(EpicycleError::InsufficientInput);
        }

        let (decomposition, diagnostics) =
            decompose_with_diagnostics(&path.to_polyline(), &self.config).inspect_err(|e| {
                tracing::debug!(error = %e, "regenerate ignored");
            })?;

        self.samples = decomposition.samples;
        self.components = decomposition.components;
        self.frames = decomposition.frames;
        self.player.reset();

        tracing::info!(
            cells = diagnostics.summary.drawn_points,
            components = diagnostics.summary.component_count,
            frames = diagnostics.summary.frame_count,
            elapsed_ms = diagnostics.total_duration.as_secs_f64() * 1000.0,
            "regenerated epicycles"
        );
        Ok(diagnostics)
    }

    /// Start animating from frame 0 and request the first tick.
    ///
    /// # Errors
    ///
    /// Returns [`EpicycleError::EmptyAnimation`] if no frames have been
    /// computed. Nothing is scheduled in that case.
    pub fn start_playback(&mut self, scheduler: &mut impl Scheduler) -> Result<(), EpicycleError> {
        self.player.start(self.frames.len()).inspect_err(|e| {
            tracing::debug!(error = %e, "playback not started");
        })?;
        tracing::info!(frames = self.frames.len(), "playback started");
        scheduler.schedule_next_tick();
        Ok(())
    }

    /// Run one playback tick and request the next one.
    ///
    /// Returns `None`, and schedules nothing, while playback is idle.
    pub fn tick(&mut self, scheduler: &mut impl Scheduler) -> Option<Scene<'_>> {
        let scene = self.player.tick(
            &self.frames,
            self.config.origin(),
            self.config.playback_speed,
        )?;
        if scene.wrapped {
            tracing::trace!("playback revolution complete");
        }
        scheduler.schedule_next_tick();
        Some(scene)
    }

    /// Clear the drawing, the decomposition, and playback.
    pub fn reset_all(&mut self) {
        self.stroke.clear();
        self.samples = Polyline::default();
        self.components.clear();
        self.frames.clear();
        self.player.reset();
        tracing::info!("session reset");
    }

    // --- Accessors ---

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EpicycleConfig {
        &self.config
    }

    /// Cells drawn so far.
    #[must_use]
    pub const fn drawn_path(&self) -> &DrawnPath {
        self.stroke.path()
    }

    /// The resampled, centered samples from the last regeneration, in
    /// grid units.
    #[must_use]
    pub const fn samples(&self) -> &Polyline {
        &self.samples
    }

    /// Ranked components from the last regeneration.
    #[must_use]
    pub fn components(&self) -> &[FourierComponent] {
        &self.components
    }

    /// Precomputed frames from the last regeneration.
    #[must_use]
    pub fn frames(&self) -> &[AnimationFrame] {
        &self.frames
    }

    /// Playback state.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Playback phase.
    #[must_use]
    pub const fn phase(&self) -> PlaybackPhase {
        self.player.phase()
    }
}
