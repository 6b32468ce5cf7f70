use super::MultiscaleLinearTransform;
use crate::error::Result;
use crate::image::{Image, ImageView, Plane, Sample, WorkingFloat};
use crate::status::{advance_checked, run_monitored, NullMonitor, ProgressMonitor};
use log::debug;

impl<F: WorkingFloat> MultiscaleLinearTransform<F> {
    /// Add every allocated, enabled layer into `image`.
    pub fn reconstruct<T: Sample>(&self, image: &mut Image<T>) -> Result<()> {
        self.reconstruct_with_monitor(image, &mut NullMonitor::default())
    }

    /// Reconstruct with progress reporting and cancellation through `monitor`.
    ///
    /// - No contributing layer: the selection of `image` is zeroed.
    /// - `image` empty or with an empty selection: it is replaced by the sum
    ///   of the contributing layers.
    /// - Otherwise the sum is added onto the selected pixels, whose geometry
    ///   must match the layers.
    ///
    /// Accumulation runs in `T::Working` precision. `image` is only written
    /// once the whole sum succeeded.
    pub fn reconstruct_with_monitor<T: Sample>(
        &self,
        image: &mut Image<T>,
        monitor: &mut dyn ProgressMonitor,
    ) -> Result<()> {
        let Some((top, first)) = self.highest_contributing() else {
            debug!("reconstruct: no enabled layers, zeroing selection");
            image.zero_selection();
            return Ok(());
        };

        let total = first.sample_count() as u64 * self.number_of_layers() as u64;
        run_monitored(monitor, "Inverse multiscale linear transform", total, |m| {
            let acc = self.accumulate::<T::Working, T>(image, top, first, m)?;
            if image.is_empty() || image.has_empty_selection() {
                image.assign_plane(&acc)
            } else {
                image.write_selection(&acc)
            }
        })
    }

    /// Sum of the contributing layers as a new plane.
    ///
    /// Without contributing layers the result is a zero plane with the stored
    /// layers' geometry (or an empty plane when nothing is stored).
    pub fn reconstruct_to_plane(&self) -> Result<Plane<F>> {
        let Some((top, first)) = self.highest_contributing() else {
            let (w, h) = self.layers.geometry().unwrap_or((0, 0));
            return Plane::try_new(w, h);
        };
        let mut acc = first.try_clone()?;
        for j in (0..top).rev() {
            if let Some(layer) = self.layers.contributing(j) {
                acc.add_plane(layer)?;
            }
        }
        Ok(acc)
    }

    fn highest_contributing(&self) -> Option<(usize, &Plane<F>)> {
        (0..self.number_of_layers())
            .rev()
            .find_map(|j| self.layers.contributing(j).map(|layer| (j, layer)))
    }

    fn accumulate<W: WorkingFloat, T: Sample>(
        &self,
        image: &Image<T>,
        top: usize,
        first: &Plane<F>,
        monitor: &mut dyn ProgressMonitor,
    ) -> Result<Plane<W>> {
        let samples = first.sample_count() as u64;
        let skipped_above = (self.number_of_layers() - 1 - top) as u64;
        if skipped_above > 0 {
            advance_checked(monitor, skipped_above * samples)?;
        }

        let mut acc: Plane<W> = if image.is_empty() || image.has_empty_selection() {
            first.convert()?
        } else {
            let mut acc = image.selection_to_plane::<W>()?;
            acc.add_plane(first)?;
            acc
        };
        advance_checked(monitor, samples)?;

        for j in (0..top).rev() {
            if let Some(layer) = self.layers.contributing(j) {
                acc.add_plane(layer)?;
            }
            advance_checked(monitor, samples)?;
        }
        debug!(
            "reconstruct: summed layers 0..={top} into {}x{} {}",
            acc.w,
            acc.h,
            W::NAME
        );
        Ok(acc)
    }
}
