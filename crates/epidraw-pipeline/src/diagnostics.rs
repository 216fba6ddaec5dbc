//! Decomposition diagnostics: timing and counts for each pipeline stage.
//!
//! Every call to [`decompose_with_diagnostics`] collects these alongside
//! the decomposition, and [`Session::regenerate`](crate::Session::regenerate)
//! returns them to the caller.
//!
//! Timestamps come from the `web-time` crate, which uses
//! `performance.now()` on WASM and `std::time::Instant` on native.
//! Durations are serialized as fractional seconds (`f64`) because
//! `std::time::Duration` does not implement serde traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::types::{EpicycleConfig, EpicycleError, Polyline};
use crate::{Decomposition, center, dft, resample, simulate};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from one decomposition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecompositionDiagnostics {
    /// Arc-length resampling.
    pub resample: StageDiagnostics,
    /// Centroid removal.
    pub center: StageDiagnostics,
    /// DFT over all samples.
    pub transform: StageDiagnostics,
    /// Ranking and top-K truncation.
    pub select: StageDiagnostics,
    /// Epicycle frame precomputation.
    pub frames: StageDiagnostics,
    /// Wall-clock duration of the whole decomposition.
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary across stages.
    pub summary: DecompositionSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Arc-length resampling.
    Resample {
        /// Points in the drawn path.
        input_points: usize,
        /// Total drawn length in grid units.
        arc_length: f64,
        /// Spacing between output samples.
        step: f64,
        /// Samples produced.
        output_points: usize,
    },
    /// Centroid removal.
    Center {
        /// X offset removed.
        centroid_x: f64,
        /// Y offset removed.
        centroid_y: f64,
    },
    /// DFT.
    Transform {
        /// Number of bins computed.
        bins: usize,
    },
    /// Ranking and truncation.
    Select {
        /// Configured upper bound.
        limit: usize,
        /// Components kept.
        kept: usize,
        /// Fraction of total squared amplitude carried by the kept
        /// components (1.0 when nothing was dropped).
        retained_energy: f64,
    },
    /// Frame precomputation.
    Frames {
        /// Frames produced.
        steps: usize,
        /// Arms per frame.
        arms: usize,
        /// Pixels per grid unit applied to arm lengths.
        scale: f64,
    },
}

/// High-level summary of one decomposition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecompositionSummary {
    /// Points in the drawn path.
    pub drawn_points: usize,
    /// Samples fed to the transform.
    pub sample_count: usize,
    /// Components in the epicycle chain.
    pub component_count: usize,
    /// Precomputed frames.
    pub frame_count: usize,
    /// Frequency of the longest arm, if any.
    pub dominant_freq: Option<i64>,
    /// Length of the longest arm in grid units.
    pub dominant_amp: f64,
}

/// Run resample, center, transform, select, and frame precomputation on
/// a drawn path (cell centers in grid units), timing every stage.
///
/// # Errors
///
/// Returns [`EpicycleError::InsufficientInput`] for fewer than two
/// points and [`EpicycleError::DegeneratePath`] for a zero-length path.
pub fn decompose_with_diagnostics(
    path: &Polyline,
    config: &EpicycleConfig,
) -> Result<(Decomposition, DecompositionDiagnostics), EpicycleError> {
    let start = Instant::now();

    // 1. Resample.
    let t = Instant::now();
    let resampled = resample::resample(path, config.sample_count)?;
    let arc_length = path.arc_length();
    #[allow(clippy::cast_precision_loss)]
    let resample_diag = StageDiagnostics {
        duration: t.elapsed(),
        metrics: StageMetrics::Resample {
            input_points: path.len(),
            arc_length,
            step: arc_length / config.sample_count as f64,
            output_points: resampled.len(),
        },
    };

    // 2. Center.
    let t = Instant::now();
    let offset = resampled.centroid().unwrap_or(crate::Point::ORIGIN);
    let samples = center::center(&resampled);
    let center_diag = StageDiagnostics {
        duration: t.elapsed(),
        metrics: StageMetrics::Center {
            centroid_x: offset.x,
            centroid_y: offset.y,
        },
    };

    // 3. Transform.
    let t = Instant::now();
    let all = dft::transform(&samples);
    let bins = all.len();
    let total_energy: f64 = all.iter().map(|c| c.amp * c.amp).sum();
    let transform_diag = StageDiagnostics {
        duration: t.elapsed(),
        metrics: StageMetrics::Transform { bins },
    };

    // 4. Select.
    let t = Instant::now();
    let components = dft::select_top(all, config.max_components);
    let kept_energy: f64 = components.iter().map(|c| c.amp * c.amp).sum();
    let select_diag = StageDiagnostics {
        duration: t.elapsed(),
        metrics: StageMetrics::Select {
            limit: config.max_components,
            kept: components.len(),
            retained_energy: if total_energy > 0.0 {
                kept_energy / total_energy
            } else {
                1.0
            },
        },
    };

    // 5. Frames.
    let t = Instant::now();
    let scale = config.cell_size();
    let frames = simulate::build_frames(&components, config.frame_count, scale, config.origin());
    let frames_diag = StageDiagnostics {
        duration: t.elapsed(),
        metrics: StageMetrics::Frames {
            steps: frames.len(),
            arms: components.len(),
            scale,
        },
    };

    let summary = DecompositionSummary {
        drawn_points: path.len(),
        sample_count: samples.len(),
        component_count: components.len(),
        frame_count: frames.len(),
        dominant_freq: components.first().map(|c| c.freq),
        dominant_amp: components.first().map_or(0.0, |c| c.amp),
    };

    let diagnostics = DecompositionDiagnostics {
        resample: resample_diag,
        center: center_diag,
        transform: transform_diag,
        select: select_diag,
        frames: frames_diag,
        total_duration: start.elapsed(),
        summary,
    };

    Ok((
        Decomposition {
            samples,
            components,
            frames,
        },
        diagnostics,
    ))
}

impl DecompositionDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Decomposition Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Drawn points: {}  |  Samples: {}  |  Components: {}  |  Frames: {}",
            self.summary.drawn_points,
            self.summary.sample_count,
            self.summary.component_count,
            self.summary.frame_count,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<16} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(72));

        let total_ms = duration_ms(self.total_duration);
        let stages = [
            ("Resample", &self.resample),
            ("Center", &self.center),
            ("Transform", &self.transform),
            ("Select", &self.select),
            ("Frames", &self.frames),
        ];
        for (name, diag) in stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<16} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        match self.summary.dominant_freq {
            Some(freq) => lines.push(format!(
                "Dominant component: freq={freq} amp={:.3}",
                self.summary.dominant_amp,
            )),
            None => lines.push("Dominant component: none".to_string()),
        }

        lines.join("\n")
    }
}

fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Resample {
            input_points,
            arc_length,
            step,
            output_points,
        } => format!(
            "{input_points} -> {output_points} pts, length={arc_length:.2} step={step:.4}"
        ),
        StageMetrics::Center {
            centroid_x,
            centroid_y,
        } => format!("centroid=({centroid_x:.2}, {centroid_y:.2})"),
        StageMetrics::Transform { bins } => format!("{bins} bins"),
        StageMetrics::Select {
            limit,
            kept,
            retained_energy,
        } => format!(
            "kept {kept} (limit {limit}), {:.2}% energy",
            retained_energy * 100.0
        ),
        StageMetrics::Frames { steps, arms, scale } => {
            format!("{steps} frames x {arms} arms, scale={scale:.3}")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn square() -> Polyline {
        Polyline::new(vec![
            Point::new(10.5, 10.5),
            Point::new(30.5, 10.5),
            Point::new(30.5, 30.5),
            Point::new(10.5, 30.5),
            Point::new(10.5, 10.5),
        ])
    }

    #[test]
    fn counts_match_config() {
        let config = EpicycleConfig {
            sample_count: 64,
            max_components: 10,
            frame_count: 32,
            ..EpicycleConfig::default()
        };
        let (d, diag) = decompose_with_diagnostics(&square(), &config).unwrap();
        assert_eq!(d.samples.len(), 64);
        assert_eq!(d.components.len(), 10);
        assert_eq!(d.frames.len(), 32);
        assert_eq!(diag.summary.sample_count, 64);
        assert_eq!(diag.summary.component_count, 10);
        assert_eq!(diag.summary.frame_count, 32);
        assert_eq!(diag.summary.drawn_points, 5);
        assert!(diag.summary.dominant_amp > 0.0);
    }

    #[test]
    fn centroid_metric_reports_removed_offset() {
        let (_, diag) = decompose_with_diagnostics(&square(), &EpicycleConfig::default()).unwrap();
        let StageMetrics::Center {
            centroid_x,
            centroid_y,
        } = diag.center.metrics
        else {
            unreachable!("center stage always reports Center metrics");
        };
        assert!((centroid_x - 20.5).abs() < 0.2);
        assert!((centroid_y - 20.5).abs() < 0.2);
    }

    #[test]
    fn retained_energy_is_full_without_truncation() {
        let (_, diag) = decompose_with_diagnostics(&square(), &EpicycleConfig::default()).unwrap();
        let StageMetrics::Select {
            retained_energy, ..
        } = diag.select.metrics
        else {
            unreachable!("select stage always reports Select metrics");
        };
        assert!((retained_energy - 1.0).abs() < 1e-12);
    }

    #[test]
    fn errors_propagate() {
        let single = Polyline::new(vec![Point::new(1.0, 1.0)]);
        assert!(matches!(
            decompose_with_diagnostics(&single, &EpicycleConfig::default()),
            Err(EpicycleError::InsufficientInput)
        ));
    }

    #[test]
    fn report_lists_every_stage() {
        let (_, diag) = decompose_with_diagnostics(&square(), &EpicycleConfig::default()).unwrap();
        let report = diag.report();
        for stage in ["Resample", "Center", "Transform", "Select", "Frames"] {
            assert!(report.contains(stage), "missing {stage} in:\n{report}");
        }
        assert!(report.contains("Dominant component: freq="));
    }

    #[test]
    fn diagnostics_serde_round_trip() {
        let (_, diag) = decompose_with_diagnostics(&square(), &EpicycleConfig::default()).unwrap();
        let json = serde_json::to_string(&diag).unwrap();
        let back: DecompositionDiagnostics = serde_json::from_str(&json).unwrap();
        assert_eq!(back.summary.sample_count, diag.summary.sample_count);
        assert_eq!(back.summary.dominant_freq, diag.summary.dominant_freq);
    }
}
