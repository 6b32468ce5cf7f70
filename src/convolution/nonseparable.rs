use super::{clamp_index, Executor};
use crate::error::Result;
use crate::filters::KernelFilter;
use crate::image::{ImageView, Plane, WorkingFloat};
use crate::status::ProgressMonitor;

/// Direct 2-D convolution with the `size × size` kernel.
///
/// Coefficients are formed from the taps on the fly, so memory stays linear
/// in the kernel size.
pub(super) fn convolve<F: WorkingFloat>(
    src: &Plane<F>,
    filter: &KernelFilter<F>,
    exec: &Executor,
    monitor: &mut dyn ProgressMonitor,
) -> Result<Plane<F>> {
    let (w, h) = src.dimensions();
    let size = filter.size();
    let radius = filter.half_size() as isize;

    let mut out = Plane::try_new(w, h)?;
    exec.for_each_row(&mut out, monitor, true, |y, dst| {
        dst.fill(F::zero());
        for ky in 0..size {
            let src_row = src.row(clamp_index(y as isize + ky as isize - radius, h));
            for (x, d) in dst.iter_mut().enumerate() {
                let mut acc = F::zero();
                for kx in 0..size {
                    let sx = clamp_index(x as isize + kx as isize - radius, w);
                    acc = acc + filter.coefficient(ky, kx) * src_row[sx];
                }
                *d = *d + acc;
            }
        }
    })?;
    Ok(out)
}
