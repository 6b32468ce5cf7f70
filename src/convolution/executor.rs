//! Row-band scheduling for the convolution passes.
//!
//! Output rows are produced in bands. Inside a band rows are independent and
//! may run on a rayon pool; between bands the progress monitor is advanced and
//! polled for cancellation on the calling thread.
use crate::error::Result;
use crate::image::{Plane, WorkingFloat};
use crate::status::{advance_checked, poll_abort, ProgressMonitor};

/// Target number of samples per band.
const BAND_SAMPLES: usize = 1 << 14;

pub(crate) enum Executor {
    Sequential,
    #[cfg(feature = "parallel")]
    Parallel {
        pool: Option<rayon::ThreadPool>,
        threads: usize,
    },
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("threads", &self.threads())
            .finish()
    }
}

impl Executor {
    /// `max_threads == 0` uses rayon's global pool.
    #[cfg(feature = "parallel")]
    pub(crate) fn new(parallel: bool, max_threads: usize) -> Self {
        let available = rayon::current_num_threads();
        let threads = if max_threads == 0 {
            available
        } else {
            max_threads
        };
        if !parallel || threads <= 1 {
            return Executor::Sequential;
        }
        if max_threads == 0 {
            return Executor::Parallel {
                pool: None,
                threads,
            };
        }
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => Executor::Parallel {
                pool: Some(pool),
                threads,
            },
            Err(err) => {
                log::warn!("failed to build a {threads}-thread pool ({err}); using the global pool");
                Executor::Parallel {
                    pool: None,
                    threads: available,
                }
            }
        }
    }

    #[cfg(not(feature = "parallel"))]
    pub(crate) fn new(_parallel: bool, _max_threads: usize) -> Self {
        Executor::Sequential
    }

    pub(crate) fn threads(&self) -> usize {
        match self {
            Executor::Sequential => 1,
            #[cfg(feature = "parallel")]
            Executor::Parallel { threads, .. } => *threads,
        }
    }

    /// Fill every row of `out` with `row_fn(y, row)`.
    ///
    /// When `count_progress` is set, each finished band advances the monitor by
    /// its sample count; otherwise the monitor is only polled.
    pub(crate) fn for_each_row<F, K>(
        &self,
        out: &mut Plane<F>,
        monitor: &mut dyn ProgressMonitor,
        count_progress: bool,
        row_fn: K,
    ) -> Result<()>
    where
        F: WorkingFloat,
        K: Fn(usize, &mut [F]) + Sync,
    {
        let w = out.w;
        if w == 0 || out.h == 0 {
            return Ok(());
        }
        let band_rows = (BAND_SAMPLES / w).max(self.threads()).max(1);
        for (band_index, band) in out.data.chunks_mut(band_rows * w).enumerate() {
            let y0 = band_index * band_rows;
            self.run_band(band, w, y0, &row_fn);
            if count_progress {
                advance_checked(monitor, band.len() as u64)?;
            } else {
                poll_abort(monitor)?;
            }
        }
        Ok(())
    }

    fn run_band<F, K>(&self, band: &mut [F], w: usize, y0: usize, row_fn: &K)
    where
        F: WorkingFloat,
        K: Fn(usize, &mut [F]) + Sync,
    {
        match self {
            Executor::Sequential => {
                for (i, row) in band.chunks_mut(w).enumerate() {
                    row_fn(y0 + i, row);
                }
            }
            #[cfg(feature = "parallel")]
            Executor::Parallel { pool, .. } => {
                use rayon::prelude::*;

                let mut run = || {
                    band.par_chunks_mut(w)
                        .enumerate()
                        .for_each(|(i, row)| row_fn(y0 + i, row));
                };
                match pool {
                    Some(pool) => pool.install(run),
                    None => run(),
                }
            }
        }
    }
}
