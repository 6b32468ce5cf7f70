use super::{clamp_index, Executor};
use crate::error::Result;
use crate::filters::{KernelFilter, SeparableFilter};
use crate::image::{ImageView, Plane, WorkingFloat};
use crate::status::ProgressMonitor;

/// Horizontal pass into a scratch plane, then vertical pass into the output.
///
/// Only the vertical pass counts progress, one unit per output sample.
pub(super) fn convolve<F: WorkingFloat>(
    src: &Plane<F>,
    filter: &KernelFilter<F>,
    exec: &Executor,
    monitor: &mut dyn ProgressMonitor,
) -> Result<Plane<F>> {
    let (w, h) = src.dimensions();
    let taps = filter.taps();
    let radius = filter.half_size() as isize;

    let mut horiz = Plane::try_new(w, h)?;
    exec.for_each_row(&mut horiz, monitor, false, |y, dst| {
        filter_row(src.row(y), dst, taps, radius);
    })?;

    let mut out = Plane::try_new(w, h)?;
    exec.for_each_row(&mut out, monitor, true, |y, dst| {
        dst.fill(F::zero());
        for (k, &tap) in taps.iter().enumerate() {
            let sy = clamp_index(y as isize + k as isize - radius, h);
            for (d, &s) in dst.iter_mut().zip(horiz.row(sy)) {
                *d = *d + tap * s;
            }
        }
    })?;
    Ok(out)
}

fn filter_row<F: WorkingFloat>(row: &[F], out: &mut [F], taps: &[F], radius: isize) {
    let w = row.len();
    for (x, dst) in out.iter_mut().enumerate() {
        let mut acc = F::zero();
        for (k, &tap) in taps.iter().enumerate() {
            acc = acc + tap * row[clamp_index(x as isize + k as isize - radius, w)];
        }
        *dst = acc;
    }
}
