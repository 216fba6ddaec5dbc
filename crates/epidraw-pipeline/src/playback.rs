//! Playback: interpolate between precomputed frames once per display
//! tick and accumulate the pen trail.
//!
//! The core never blocks or sleeps. The host owns the loop (a browser
//! animation-frame callback, a game loop, a timer, a test) and is told
//! to come back through [`Scheduler::schedule_next_tick`]. Each tick
//! yields a [`Scene`] that a rendering collaborator draws.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::types::{AnimationFrame, EpicycleError, Point};

/// Host hook for requesting the next playback tick.
pub trait Scheduler {
    /// Ask the host to call back into the player on its next frame.
    fn schedule_next_tick(&mut self);
}

/// A [`Scheduler`] that records requests without any event loop.
///
/// The caller drains requests with [`take`](Self::take) and runs one
/// tick per request. Used by the CLI and by tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualScheduler {
    pending: usize,
    requested: usize,
}

impl ManualScheduler {
    /// Create a scheduler with nothing pending.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: 0,
            requested: 0,
        }
    }

    /// Consume one pending request. Returns `false` if none is pending.
    pub const fn take(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        self.pending -= 1;
        true
    }

    /// Requests not yet consumed.
    #[must_use]
    pub const fn pending(&self) -> usize {
        self.pending
    }

    /// Total requests received.
    #[must_use]
    pub const fn requested(&self) -> usize {
        self.requested
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_next_tick(&mut self) {
        self.pending += 1;
        self.requested += 1;
    }
}

/// Playback lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackPhase {
    /// Not animating.
    #[default]
    Idle,
    /// Animating; every tick reschedules itself.
    Playing,
}

/// What one tick asks the renderer to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene<'a> {
    /// Anchor of the chain.
    pub origin: Point,
    /// Interpolated arm tips, in chain order.
    pub arms: Vec<Point>,
    /// Pen positions since the current revolution began, oldest first.
    /// Drawn as a plain connected polyline. On a wrapping tick this owns
    /// the completed revolution, taken from the now empty player trail.
    pub trail: Cow<'a, [Point]>,
    /// Whether this tick completed a revolution.
    pub wrapped: bool,
}

impl Scene<'_> {
    /// The interpolated pen position.
    #[must_use]
    pub fn pen(&self) -> Point {
        self.arms.last().copied().unwrap_or(self.origin)
    }
}

/// Playback state machine: fractional frame index plus pen trail.
#[derive(Debug, Clone, Default)]
pub struct Player {
    phase: PlaybackPhase,
    index: f64,
    trail: Vec<Point>,
    wraps: u64,
}

impl Player {
    /// Create an idle player.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin playback from frame 0 with an empty trail.
    ///
    /// # Errors
    ///
    /// Returns [`EpicycleError::EmptyAnimation`] and stays in its
    /// current phase if `frame_count` is zero.
    pub fn start(&mut self, frame_count: usize) -> Result<(), EpicycleError> {
        if frame_count == 0 {
            return Err(EpicycleError::EmptyAnimation);
        }
        self.rewind();
        self.phase = PlaybackPhase::Playing;
        Ok(())
    }

    /// Stop playback and clear all state.
    pub fn reset(&mut self) {
        self.rewind();
        self.phase = PlaybackPhase::Idle;
    }

    fn rewind(&mut self) {
        self.index = 0.0;
        self.trail.clear();
        self.wraps = 0;
    }

    /// Advance one tick.
    ///
    /// Interpolates every arm between frame `floor(index)` and the next
    /// frame (wrapping to frame 0), appends the pen to the trail, then
    /// advances the index by `speed`. When the index reaches the frame
    /// count it returns to 0 and the trail starts over.
    ///
    /// Returns `None` while idle or when `frames` is empty.
    pub fn tick<'a>(
        &'a mut self,
        frames: &[AnimationFrame],
        origin: Point,
        speed: f64,
    ) -> Option<Scene<'a>> {
        if self.phase != PlaybackPhase::Playing || frames.is_empty() {
            return None;
        }
        let frame_count = frames.len();
        // `index` stays in [0, frame_count).
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let i = (self.index.floor() as usize).min(frame_count - 1);
        let j = (i + 1) % frame_count;
        #[allow(clippy::cast_precision_loss)]
        let t = self.index - i as f64;

        let arms: Vec<Point> = frames[i]
            .arms()
            .iter()
            .zip(frames[j].arms())
            .map(|(a, b)| a.lerp(*b, t))
            .collect();
        self.trail.push(arms.last().copied().unwrap_or(origin));

        self.index += speed;
        #[allow(clippy::cast_precision_loss)]
        let wrapped = self.index >= frame_count as f64;
        let trail = if wrapped {
            self.index = 0.0;
            self.wraps += 1;
            Cow::Owned(std::mem::take(&mut self.trail))
        } else {
            Cow::Borrowed(self.trail.as_slice())
        };

        Some(Scene {
            origin,
            arms,
            trail,
            wrapped,
        })
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// Fractional frame position of the next tick.
    #[must_use]
    pub const fn index(&self) -> f64 {
        self.index
    }

    /// Pen positions accumulated in the current revolution. Empty right
    /// after a wrapping tick.
    #[must_use]
    pub fn trail(&self) -> &[Point] {
        &self.trail
    }

    /// Revolutions completed since the last start or reset.
    #[must_use]
    pub const fn wraps(&self) -> u64 {
        self.wraps
    }
}
