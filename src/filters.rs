//! Normalised smoothing kernels of odd size `2s + 1`.
//!
//! Both kernel kinds are separable: the 2-D kernel is the outer product of the
//! 1-D taps with themselves, so the convolution module can apply either form
//! and obtain the same result.
//!
//! The Gaussian standard deviation is derived from the half size so that the
//! outermost (unnormalised) coefficient equals [`GAUSSIAN_EPSILON`]:
//! `sigma = s / sqrt(-2 ln epsilon)`.
use crate::error::{Result, TransformError};
use crate::image::plane::allocate;
use crate::image::WorkingFloat;
use serde::{Deserialize, Serialize};

/// Relative value of the outermost Gaussian coefficient.
pub const GAUSSIAN_EPSILON: f64 = 0.01;

/// Largest accepted kernel half size (kernel size 65537).
pub const MAX_HALF_SIZE: usize = 1 << 15;

/// Trait implemented by separable 1D filters.
pub trait SeparableFilter<F> {
    /// Return the 1D taps (in left-to-right order). The kernel is assumed to be
    /// symmetric around its centre, but the convolution does not rely on it.
    fn taps(&self) -> &[F];
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    #[default]
    Gaussian,
    /// Block average.
    Mean,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KernelFilter<F> {
    kind: FilterKind,
    half_size: usize,
    taps: Vec<F>,
}

impl<F: WorkingFloat> KernelFilter<F> {
    pub fn new(kind: FilterKind, half_size: usize) -> Result<Self> {
        match kind {
            FilterKind::Gaussian => Self::gaussian(half_size),
            FilterKind::Mean => Self::mean(half_size),
        }
    }

    pub fn gaussian(half_size: usize) -> Result<Self> {
        let size = validated_size(half_size)?;
        let sigma = gaussian_sigma(half_size);
        let two_var = 2.0 * sigma * sigma;
        let mut raw = allocate(size, 1, 0.0f64)?;
        for (k, v) in raw.iter_mut().enumerate() {
            let d = k as f64 - half_size as f64;
            *v = (-d * d / two_var).exp();
        }
        let norm: f64 = raw.iter().sum();
        let mut taps = allocate(size, 1, F::zero())?;
        for (t, &v) in taps.iter_mut().zip(&raw) {
            *t = F::narrow(v / norm);
        }
        Ok(Self {
            kind: FilterKind::Gaussian,
            half_size,
            taps,
        })
    }

    pub fn mean(half_size: usize) -> Result<Self> {
        let size = validated_size(half_size)?;
        Ok(Self {
            kind: FilterKind::Mean,
            half_size,
            taps: allocate(size, 1, F::narrow(1.0 / size as f64))?,
        })
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn half_size(&self) -> usize {
        self.half_size
    }

    /// Kernel size `2s + 1`.
    pub fn size(&self) -> usize {
        self.taps.len()
    }

    /// Gaussian standard deviation, `None` for mean filters.
    pub fn sigma(&self) -> Option<f64> {
        (self.kind == FilterKind::Gaussian).then(|| gaussian_sigma(self.half_size))
    }

    /// Element `(i, j)` of the equivalent 2-D kernel.
    #[inline]
    pub fn coefficient(&self, i: usize, j: usize) -> F {
        self.taps[i] * self.taps[j]
    }
}

impl<F: WorkingFloat> SeparableFilter<F> for KernelFilter<F> {
    #[inline]
    fn taps(&self) -> &[F] {
        &self.taps
    }
}

/// Kernel size `2s + 1` for a half size in `1..=MAX_HALF_SIZE`.
pub(crate) fn validated_size(half_size: usize) -> Result<usize> {
    if half_size == 0 || half_size > MAX_HALF_SIZE {
        return Err(TransformError::InvalidFilterSize {
            size: half_size.saturating_mul(2).saturating_add(1),
        });
    }
    Ok(2 * half_size + 1)
}

fn gaussian_sigma(half_size: usize) -> f64 {
    half_size as f64 / (-2.0 * GAUSSIAN_EPSILON.ln()).sqrt()
}
