use super::MultiscaleLinearTransform;
use crate::convolution::Convolver;
use crate::error::{Result, TransformError};
use crate::filters::KernelFilter;
use crate::image::{Image, ImageView, Plane, Sample, WorkingFloat};
use crate::status::{advance_checked, run_monitored, NullMonitor, ProgressMonitor};
use log::debug;

impl<F: WorkingFloat> MultiscaleLinearTransform<F> {
    /// Decompose the selected region of `image` into the layer set.
    pub fn decompose<T: Sample>(&mut self, image: &Image<T>) -> Result<()> {
        self.decompose_with_monitor(image, &mut NullMonitor::default())
    }

    /// Decompose with progress reporting and cancellation through `monitor`.
    ///
    /// Previously computed layers are discarded first. An empty image or an
    /// empty selection leaves every slot empty and is not an error. On failure
    /// every slot is emptied before the error is returned.
    ///
    /// Samples whose working precision is wider than `F` (`f64` and
    /// `Complex64` into an `f32` transform) are rejected with
    /// `PrecisionLoss`; use a `MultiscaleLinearTransform<f64>` for them.
    pub fn decompose_with_monitor<T: Sample>(
        &mut self,
        image: &Image<T>,
        monitor: &mut dyn ProgressMonitor,
    ) -> Result<()> {
        self.layers.clear();
        if <T::Working as WorkingFloat>::MANTISSA_DIGITS > F::MANTISSA_DIGITS {
            return Err(TransformError::PrecisionLoss {
                sample: T::NAME,
                required: <T::Working as WorkingFloat>::NAME,
                layers: F::NAME,
            });
        }
        if image.is_empty() || image.has_empty_selection() {
            debug!("decompose: empty image or selection, no layers produced");
            return Ok(());
        }

        let total = image.selected_samples() as u64 * self.number_of_layers() as u64;
        let result = run_monitored(monitor, "Multiscale linear transform", total, |m| {
            self.decompose_selection(image, m)
        });
        if let Err(err) = &result {
            debug!("decompose: {err}; discarding partial layers");
            self.layers.clear();
        }
        result
    }

    fn decompose_selection<T: Sample>(
        &mut self,
        image: &Image<T>,
        monitor: &mut dyn ProgressMonitor,
    ) -> Result<()> {
        let n = self.detail_layers();
        let kind = self.filter_kind();
        let convolver = Convolver::new(
            self.params.convolution,
            self.params.parallel,
            self.params.max_threads,
        );

        let mut c0: Plane<F> = image.selection_to_plane()?;
        let samples = c0.sample_count() as u64;
        let iterations = n.max(1);
        debug!(
            "decompose: {}x{} {} -> {}, {} detail layers, {:?} {:?}, {} threads",
            c0.w,
            c0.h,
            T::NAME,
            F::NAME,
            n,
            self.scaling,
            kind,
            convolver.threads()
        );

        for j in 1..=iterations {
            let filter = KernelFilter::<F>::new(kind, self.scaling.half_size(j)?)?;
            debug!(
                "decompose: iteration {j}/{iterations}, kernel {} ({:?})",
                filter.size(),
                convolver.resolve(&filter)
            );
            let cj = convolver.smooth(&c0, &filter, monitor)?;

            let detail = j - 1;
            if detail < n && self.layers.slot_enabled(detail) {
                self.layers.store(detail, c0.difference(&cj)?);
            }
            if j == iterations {
                if self.layers.slot_enabled(n) {
                    self.layers.store(n, cj);
                }
                break;
            }
            c0 = cj;
        }

        // N smoothing passes account for N of the N + 1 units per sample.
        let remaining = (n + 1 - iterations) as u64 * samples;
        if remaining > 0 {
            advance_checked(monitor, remaining)?;
        }
        Ok(())
    }
}
