//! Redundant multiscale linear transform for 2-D images.
//!
//! An image is decomposed into `N` full-resolution detail layers and one
//! residual layer by iterative Gaussian or block-average smoothing at growing
//! scales; adding the enabled layers back together reconstructs it.

// Public modules (stable-ish surface)
pub mod error;
pub mod image;
pub mod status;
pub mod transform;
pub mod types;

// Building blocks, public for tools and tests.
pub mod config;
pub mod convolution;
pub mod diagnostics;
pub mod filters;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{Result, TransformError};
pub use crate::image::{Image, ImageF32, ImageF64, Plane};
pub use crate::status::{CancellationToken, NullMonitor, ProgressMonitor, StatusMonitor};
pub use crate::transform::{MultiscaleLinearTransform, ScalingSequence, TransformParams};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use multiscale_transform::prelude::*;
///
/// let image = Image::<f32>::from_fn(64, 64, |x, y| (x + y) as f32 / 126.0);
/// let mut transform = MultiscaleLinearTransform::<f32>::new(3, 0, false)?;
/// transform.decompose(&image)?;
///
/// let mut restored = Image::<f32>::empty();
/// transform.reconstruct(&mut restored)?;
/// assert!((restored.get(10, 20) - image.get(10, 20)).abs() < 1e-5);
/// # Ok::<(), multiscale_transform::TransformError>(())
/// ```
pub mod prelude {
    pub use crate::image::{Image, Plane, Sample};
    pub use crate::status::{ProgressMonitor, StatusMonitor};
    pub use crate::{MultiscaleLinearTransform, TransformParams};
}
