//! Separable and non-separable convolution of a working plane with a
//! [`KernelFilter`].
//!
//! Design
//! - Borders replicate the nearest edge sample (index clamping), so kernels
//!   larger than the image remain valid.
//! - The separable path runs a horizontal pass into a scratch plane and a
//!   vertical pass into the output; the non-separable path applies the full
//!   `size × size` outer-product kernel in one pass. With clamped borders both
//!   compute the same sum, differing only by floating-point rounding.
//! - `ConvolutionStrategy::Auto` switches to the separable form once the
//!   kernel reaches [`faster_than_nonseparable_filter_size`].
//!
//! Complexity
//! - Separable: O(W·H·2k); non-separable: O(W·H·k²) for kernel size k.

mod executor;
mod nonseparable;
mod separable;

pub(crate) use executor::Executor;

use crate::error::Result;
use crate::filters::KernelFilter;
use crate::image::{ImageView, Plane, WorkingFloat};
use crate::status::{run_monitored, ProgressMonitor};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvolutionStrategy {
    /// Pick by kernel size and thread count.
    #[default]
    Auto,
    Separable,
    #[serde(rename = "nonseparable")]
    NonSeparable,
}

/// Smallest kernel size for which the separable form is used by `Auto`.
///
/// Performance tuning only; both forms produce the same result.
pub fn faster_than_nonseparable_filter_size(threads: usize) -> usize {
    match threads {
        0 | 1 => 5,
        2..=4 => 7,
        _ => 9,
    }
}

/// Convolution front end bound to a strategy and a thread configuration.
#[derive(Debug)]
pub struct Convolver {
    strategy: ConvolutionStrategy,
    executor: Executor,
}

impl Default for Convolver {
    fn default() -> Self {
        Self::new(ConvolutionStrategy::Auto, true, 0)
    }
}

impl Convolver {
    /// `max_threads == 0` lets rayon choose; parallelism is only used when the
    /// `parallel` feature is enabled and more than one thread is available.
    pub fn new(strategy: ConvolutionStrategy, parallel: bool, max_threads: usize) -> Self {
        Self {
            strategy,
            executor: Executor::new(parallel, max_threads),
        }
    }

    pub fn threads(&self) -> usize {
        self.executor.threads()
    }

    /// Concrete strategy used for `filter`: never `Auto`.
    pub fn resolve<F: WorkingFloat>(&self, filter: &KernelFilter<F>) -> ConvolutionStrategy {
        match self.strategy {
            ConvolutionStrategy::Auto => {
                if filter.size() >= faster_than_nonseparable_filter_size(self.threads()) {
                    ConvolutionStrategy::Separable
                } else {
                    ConvolutionStrategy::NonSeparable
                }
            }
            forced => forced,
        }
    }

    /// Smooth `src` with `filter` using the resolved strategy.
    ///
    /// Advances `monitor` by one unit per output sample.
    pub fn smooth<F: WorkingFloat>(
        &self,
        src: &Plane<F>,
        filter: &KernelFilter<F>,
        monitor: &mut dyn ProgressMonitor,
    ) -> Result<Plane<F>> {
        let total = src.sample_count() as u64;
        run_monitored(monitor, "Convolution", total, |m| match self.resolve(filter) {
            ConvolutionStrategy::NonSeparable => {
                nonseparable::convolve(src, filter, &self.executor, m)
            }
            _ => separable::convolve(src, filter, &self.executor, m),
        })
    }
}

#[inline]
pub(crate) fn clamp_index(idx: isize, upper: usize) -> usize {
    if upper == 0 || idx < 0 {
        0
    } else if (idx as usize) >= upper {
        upper - 1
    } else {
        idx as usize
    }
}
