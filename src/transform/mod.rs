//! Redundant multiscale linear transform.
//!
//! Purpose
//! - Split an image into `N` detail layers and one residual layer whose sum
//!   reproduces the image: `Σ layer[j] == image` up to rounding.
//!
//! Design
//! - Iteration `j = 1..=N` smooths the previous smoothed image with a
//!   Gaussian or block-average kernel of size `2s + 1`, where `s` follows the
//!   dyadic or linear scaling sequence ([`ScalingSequence`]).
//! - Detail layer `j - 1` is the difference between consecutive smoothings;
//!   the residual (index `N`) is the last smoothing. With `N = 0` the
//!   transform is a single smoothing pass stored as the residual.
//! - Layers are full resolution (no decimation), stored in a [`LayerSet`] of
//!   `N + 1` optional planes with a per-layer enabled mask. Disabled layers
//!   are skipped on decomposition and omitted on reconstruction.
//! - Decomposition is all-or-nothing: any error leaves every slot empty.
//!
//! The transform is a plain value: cloning deep-copies the layers. It holds no
//! lock; concurrent calls on the same instance must be serialized by the
//! caller.

mod decompose;
pub mod layers;
pub mod params;
mod reconstruct;

pub use layers::LayerSet;
pub use params::{ScalingSequence, TransformParams};

use crate::error::Result;
use crate::filters::FilterKind;
use crate::image::{Plane, WorkingFloat};

#[derive(Clone, Debug)]
pub struct MultiscaleLinearTransform<F: WorkingFloat = f32> {
    params: TransformParams,
    scaling: ScalingSequence,
    layers: LayerSet<F>,
}

impl<F: WorkingFloat> Default for MultiscaleLinearTransform<F> {
    fn default() -> Self {
        Self {
            params: TransformParams::default(),
            scaling: ScalingSequence::Dyadic,
            layers: LayerSet::new(TransformParams::default().layers + 1),
        }
    }
}

impl<F: WorkingFloat> MultiscaleLinearTransform<F> {
    /// Transform with `layers` detail layers.
    pub fn new(layers: usize, scaling_sequence: i32, use_mean_filters: bool) -> Result<Self> {
        Self::from_params(
            TransformParams::new(layers)
                .with_scaling_sequence(scaling_sequence)
                .with_mean_filters(use_mean_filters),
        )
    }

    /// Fails when the scaling sequence is invalid or when the kernel of the
    /// last smoothing pass would exceed the largest supported size.
    pub fn from_params(params: TransformParams) -> Result<Self> {
        let scaling = ScalingSequence::from_param(params.scaling_sequence)?;
        scaling.half_size(params.layers.max(1))?;
        let layers = LayerSet::new(params.layers + 1);
        Ok(Self {
            params,
            scaling,
            layers,
        })
    }

    pub fn params(&self) -> &TransformParams {
        &self.params
    }

    /// Number of detail layers `N`.
    pub fn detail_layers(&self) -> usize {
        self.params.layers
    }

    /// Always `N + 1`, whether or not any layer has been computed.
    pub fn number_of_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn scaling_sequence(&self) -> ScalingSequence {
        self.scaling
    }

    pub fn filter_kind(&self) -> FilterKind {
        self.params.filter_kind()
    }

    pub fn uses_mean_filters(&self) -> bool {
        self.params.use_mean_filters
    }

    /// Kernel half size used to produce detail layer `j` (and, for `j == N`,
    /// the residual when `N == 0`).
    pub fn filter_half_size(&self, j: usize) -> Result<usize> {
        self.scaling.half_size(j + 1)
    }

    /// Kernel size `2s + 1` used to produce detail layer `j`.
    pub fn filter_size(&self, j: usize) -> Result<usize> {
        Ok(2 * self.filter_half_size(j)? + 1)
    }

    pub fn layer_set(&self) -> &LayerSet<F> {
        &self.layers
    }

    /// Layer slots in index order; the last one is the residual.
    pub fn layers(&self) -> impl Iterator<Item = Option<&Plane<F>>> + '_ {
        self.layers.iter()
    }

    pub fn layer(&self, j: isize) -> Result<&Plane<F>> {
        self.layers.get(j)
    }

    pub fn layer_mut(&mut self, j: isize) -> Result<&mut Plane<F>> {
        self.layers.get_mut(j)
    }

    pub fn set_layer(&mut self, j: isize, plane: Plane<F>) -> Result<()> {
        self.layers.set(j, plane)
    }

    pub fn is_layer_allocated(&self, j: isize) -> Result<bool> {
        self.layers.is_allocated(j)
    }

    pub fn is_layer_enabled(&self, j: isize) -> Result<bool> {
        self.layers.is_enabled(j)
    }

    pub fn set_layer_enabled(&mut self, j: isize, enabled: bool) -> Result<()> {
        self.layers.set_enabled(j, enabled)
    }

    pub fn enable_layer(&mut self, j: isize) -> Result<()> {
        self.layers.set_enabled(j, true)
    }

    pub fn disable_layer(&mut self, j: isize) -> Result<()> {
        self.layers.set_enabled(j, false)
    }

    /// Move layer `j` out of the transform, leaving its slot empty.
    pub fn release_layer(&mut self, j: isize) -> Result<Option<Plane<F>>> {
        self.layers.take(j)
    }

    pub fn delete_layer(&mut self, j: isize) -> Result<()> {
        self.layers.take(j).map(drop)
    }

    /// Drop every layer; the enabled mask is preserved.
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    pub fn delete_layers(&mut self) {
        self.clear();
    }

    /// Scale layer `j` by `1 + k` for `k > 0` or by `1 / (1 - k)` for `k < 0`.
    pub fn bias_layer(&mut self, j: isize, k: f64) -> Result<()> {
        let layer = self.layers.get_mut(j)?;
        let factor = if k > 0.0 {
            1.0 + k
        } else if k < 0.0 {
            1.0 / (1.0 - k)
        } else {
            return Ok(());
        };
        layer.scale(F::narrow(factor));
        Ok(())
    }
}
