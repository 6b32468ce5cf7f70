//! Parameters configuring the multiscale linear transform.
//!
//! The scaling sequence decides the kernel half size `s` used at each
//! smoothing iteration `j` (1-based):
//!
//! - `0` → dyadic: `s = 2^(j-1)` (1, 2, 4, 8, ...)
//! - `d > 0` → linear: `s = d·j` (d, 2d, 3d, ...)
//!
//! Negative values are rejected when the transform is built.
use crate::convolution::ConvolutionStrategy;
use crate::error::{Result, TransformError};
use crate::filters::{validated_size, FilterKind};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingSequence {
    Dyadic,
    /// Constant step between consecutive half sizes (always > 0).
    Linear(usize),
}

impl Default for ScalingSequence {
    fn default() -> Self {
        ScalingSequence::Dyadic
    }
}

impl ScalingSequence {
    pub fn from_param(value: i32) -> Result<Self> {
        match value {
            0 => Ok(ScalingSequence::Dyadic),
            d if d > 0 => Ok(ScalingSequence::Linear(d as usize)),
            _ => Err(TransformError::InvalidScalingSequence { value }),
        }
    }

    /// Integer form accepted by [`ScalingSequence::from_param`].
    pub fn param(&self) -> i32 {
        match *self {
            ScalingSequence::Dyadic => 0,
            ScalingSequence::Linear(d) => d as i32,
        }
    }

    /// Kernel half size at 1-based iteration `j`.
    ///
    /// Fails with `InvalidFilterSize` once the half size overflows or exceeds
    /// [`crate::filters::MAX_HALF_SIZE`].
    pub fn half_size(&self, j: usize) -> Result<usize> {
        debug_assert!(j >= 1, "iterations are 1-based");
        let s = match *self {
            ScalingSequence::Dyadic => u32::try_from(j.saturating_sub(1))
                .ok()
                .and_then(|shift| 1usize.checked_shl(shift)),
            ScalingSequence::Linear(d) => d.checked_mul(j),
        };
        match s {
            Some(s) => validated_size(s).map(|_| s),
            None => Err(TransformError::InvalidFilterSize { size: usize::MAX }),
        }
    }
}

/// Construction parameters for [`crate::MultiscaleLinearTransform`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformParams {
    /// Number of detail layers `N` (the transform holds `N + 1` layers).
    pub layers: usize,
    /// `0` for the dyadic sequence, `d > 0` for the linear sequence.
    pub scaling_sequence: i32,
    /// Block-average kernels instead of Gaussian kernels.
    pub use_mean_filters: bool,
    /// Forces a convolution form; `auto` picks by kernel size.
    pub convolution: ConvolutionStrategy,
    /// Allow multi-threaded convolution.
    pub parallel: bool,
    /// Upper bound on convolution threads; `0` uses all available.
    pub max_threads: usize,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            layers: 4,
            scaling_sequence: 0,
            use_mean_filters: false,
            convolution: ConvolutionStrategy::Auto,
            parallel: true,
            max_threads: 0,
        }
    }
}

impl TransformParams {
    pub fn new(layers: usize) -> Self {
        Self {
            layers,
            ..Default::default()
        }
    }

    pub fn with_scaling_sequence(mut self, scaling_sequence: i32) -> Self {
        self.scaling_sequence = scaling_sequence;
        self
    }

    pub fn with_mean_filters(mut self, use_mean_filters: bool) -> Self {
        self.use_mean_filters = use_mean_filters;
        self
    }

    pub fn with_convolution(mut self, convolution: ConvolutionStrategy) -> Self {
        self.convolution = convolution;
        self
    }

    pub fn with_parallel(mut self, parallel: bool, max_threads: usize) -> Self {
        self.parallel = parallel;
        self.max_threads = max_threads;
        self
    }

    pub fn filter_kind(&self) -> FilterKind {
        if self.use_mean_filters {
            FilterKind::Mean
        } else {
            FilterKind::Gaussian
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::MAX_HALF_SIZE;

    #[test]
    fn dyadic_sequence() {
        let seq = ScalingSequence::from_param(0).unwrap();
        let sizes: Vec<usize> = (1..=4).map(|j| seq.half_size(j).unwrap()).collect();
        assert_eq!(sizes, vec![1, 2, 4, 8]);
    }

    #[test]
    fn linear_sequence() {
        let seq = ScalingSequence::from_param(3).unwrap();
        let sizes: Vec<usize> = (1..=4).map(|j| seq.half_size(j).unwrap()).collect();
        assert_eq!(sizes, vec![3, 6, 9, 12]);
        assert_eq!(seq.param(), 3);
    }

    #[test]
    fn half_size_overflow_is_an_error() {
        let dyadic = ScalingSequence::Dyadic;
        assert_eq!(dyadic.half_size(16).unwrap(), MAX_HALF_SIZE);
        for j in [17, 64, 65, 1000] {
            assert!(matches!(
                dyadic.half_size(j),
                Err(TransformError::InvalidFilterSize { .. })
            ));
        }
        let linear = ScalingSequence::Linear(usize::MAX / 2);
        assert!(matches!(
            linear.half_size(3),
            Err(TransformError::InvalidFilterSize { size: usize::MAX })
        ));
    }

    #[test]
    fn negative_sequence_is_rejected() {
        let err = ScalingSequence::from_param(-2).unwrap_err();
        assert!(matches!(
            err,
            TransformError::InvalidScalingSequence { value: -2 }
        ));
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let p: TransformParams =
            serde_json::from_str(r#"{ "layers": 6, "use_mean_filters": true }"#).unwrap();
        assert_eq!(p.layers, 6);
        assert_eq!(p.scaling_sequence, 0);
        assert_eq!(p.filter_kind(), FilterKind::Mean);
        assert_eq!(p.convolution, ConvolutionStrategy::Auto);
        assert!(p.parallel);
    }
}
