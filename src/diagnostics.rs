//! Serializable summaries of a transform and its timings.
//!
//! Used by the demo binary to write a JSON report next to the layer images.
use crate::filters::FilterKind;
use crate::image::{Plane, WorkingFloat};
use crate::transform::MultiscaleLinearTransform;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Wall-clock time spent in one transform call.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub stage: String,
    pub elapsed_ms: f64,
}

/// Decompose/reconstruct durations of one run and their sum.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn record(&mut self, stage: &str, elapsed: Duration) {
        let elapsed_ms = elapsed.as_secs_f64() * 1e3;
        self.total_ms += elapsed_ms;
        self.stages.push(StageTiming {
            stage: stage.to_string(),
            elapsed_ms,
        });
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerRole {
    Detail,
    Residual,
}

/// Sample statistics for one allocated layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStats {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl LayerStats {
    pub fn from_plane<F: WorkingFloat>(plane: &Plane<F>) -> Self {
        let n = plane.data.len();
        if n == 0 {
            return Self::default();
        }
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in plane.data.iter().map(|v| v.widen()) {
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        let mean = sum / n as f64;
        let var = plane
            .data
            .iter()
            .map(|v| {
                let d = v.widen() - mean;
                d * d
            })
            .sum::<f64>()
            / n as f64;
        Self {
            mean,
            std_dev: var.sqrt(),
            min,
            max,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerReport {
    pub index: usize,
    pub role: LayerRole,
    pub enabled: bool,
    /// Kernel half size of the smoothing that produced the layer.
    pub filter_half_size: Option<usize>,
    pub width: usize,
    pub height: usize,
    /// `None` when the slot is empty.
    pub stats: Option<LayerStats>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformReport {
    pub detail_layers: usize,
    pub scaling_sequence: i32,
    pub filter: FilterKind,
    pub precision: String,
    pub layers: Vec<LayerReport>,
    pub timings: TimingBreakdown,
    /// Largest absolute round-trip error, when measured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_reconstruction_error: Option<f64>,
}

impl TransformReport {
    pub fn from_transform<F: WorkingFloat>(
        transform: &MultiscaleLinearTransform<F>,
        timings: TimingBreakdown,
    ) -> Self {
        let n = transform.detail_layers();
        let layers = transform
            .layers()
            .enumerate()
            .map(|(index, layer)| {
                // the residual is produced by the last smoothing pass
                let pass = if index < n { index } else { n.saturating_sub(1) };
                LayerReport {
                    index,
                    role: if index == n {
                        LayerRole::Residual
                    } else {
                        LayerRole::Detail
                    },
                    enabled: transform
                        .is_layer_enabled(index as isize)
                        .unwrap_or(false),
                    filter_half_size: transform.filter_half_size(pass).ok(),
                    width: layer.map_or(0, |l| l.w),
                    height: layer.map_or(0, |l| l.h),
                    stats: layer.map(LayerStats::from_plane),
                }
            })
            .collect();
        Self {
            detail_layers: n,
            scaling_sequence: transform.scaling_sequence().param(),
            filter: transform.filter_kind(),
            precision: F::NAME.to_string(),
            layers,
            timings,
            max_reconstruction_error: None,
        }
    }
}
