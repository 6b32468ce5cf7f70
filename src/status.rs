//! Progress reporting and cooperative cancellation.
//!
//! The engine talks to its host exclusively through [`ProgressMonitor`]. The
//! top-level decomposition/reconstruction call initializes the monitor once
//! with the total unit count, then disables initialization so that the inner
//! convolution passes only advance the shared counter. Cancellation is polled
//! after every advance and surfaces as [`TransformError::Cancelled`].
use crate::error::{Result, TransformError};
use log::{debug, trace};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Sink for progress units and source of abort requests.
pub trait ProgressMonitor {
    /// Start a new monitored operation expecting `total` units of work.
    fn initialize(&mut self, label: &str, total: u64);

    /// Record `units` of completed work.
    fn advance(&mut self, units: u64);

    fn is_initialization_enabled(&self) -> bool;

    fn set_initialization_enabled(&mut self, enabled: bool);

    /// True once the host has requested the current operation to stop.
    fn is_aborted(&self) -> bool;
}

/// Advance the monitor and fail with `Cancelled` if an abort was requested.
pub(crate) fn advance_checked(monitor: &mut dyn ProgressMonitor, units: u64) -> Result<()> {
    monitor.advance(units);
    poll_abort(monitor)
}

pub(crate) fn poll_abort(monitor: &dyn ProgressMonitor) -> Result<()> {
    if monitor.is_aborted() {
        Err(TransformError::Cancelled)
    } else {
        Ok(())
    }
}

/// Initialize `monitor` if allowed, then run `f` with initialization disabled.
///
/// The previous initialization state is restored whatever `f` returns.
pub(crate) fn run_monitored<R>(
    monitor: &mut dyn ProgressMonitor,
    label: &str,
    total: u64,
    f: impl FnOnce(&mut dyn ProgressMonitor) -> R,
) -> R {
    let was_enabled = monitor.is_initialization_enabled();
    if was_enabled {
        monitor.initialize(label, total);
    }
    monitor.set_initialization_enabled(false);
    let out = f(&mut *monitor);
    monitor.set_initialization_enabled(was_enabled);
    out
}

/// Monitor that ignores progress and never aborts.
#[derive(Clone, Debug)]
pub struct NullMonitor {
    initialization_enabled: bool,
}

impl Default for NullMonitor {
    fn default() -> Self {
        Self {
            initialization_enabled: true,
        }
    }
}

impl ProgressMonitor for NullMonitor {
    fn initialize(&mut self, _label: &str, _total: u64) {}

    fn advance(&mut self, _units: u64) {}

    fn is_initialization_enabled(&self) -> bool {
        self.initialization_enabled
    }

    fn set_initialization_enabled(&mut self, enabled: bool) {
        self.initialization_enabled = enabled;
    }

    fn is_aborted(&self) -> bool {
        false
    }
}

/// Shareable abort flag. Cloning yields a handle to the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Counting monitor that logs through the `log` facade and honours a
/// [`CancellationToken`].
#[derive(Clone, Debug)]
pub struct StatusMonitor {
    label: String,
    total: u64,
    count: u64,
    initializations: usize,
    initialization_enabled: bool,
    last_decile: u64,
    token: CancellationToken,
}

impl Default for StatusMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusMonitor {
    pub fn new() -> Self {
        Self::with_token(CancellationToken::new())
    }

    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            label: String::new(),
            total: 0,
            count: 0,
            initializations: 0,
            initialization_enabled: true,
            last_decile: 0,
            token,
        }
    }

    /// Handle that can abort the monitored operation from another thread.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// How many times the counter was (re)initialized.
    pub fn initializations(&self) -> usize {
        self.initializations
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.count >= self.total
    }
}

impl ProgressMonitor for StatusMonitor {
    fn initialize(&mut self, label: &str, total: u64) {
        self.label = label.to_string();
        self.total = total;
        self.count = 0;
        self.last_decile = 0;
        self.initializations += 1;
        debug!("{}: {} units", self.label, self.total);
    }

    fn advance(&mut self, units: u64) {
        self.count = self.count.saturating_add(units);
        if self.total == 0 {
            return;
        }
        let decile = (self.count.min(self.total) * 10) / self.total;
        if decile > self.last_decile {
            self.last_decile = decile;
            if decile >= 10 {
                debug!("{}: done", self.label);
            } else {
                trace!("{}: {}%", self.label, decile * 10);
            }
        }
    }

    fn is_initialization_enabled(&self) -> bool {
        self.initialization_enabled
    }

    fn set_initialization_enabled(&mut self, enabled: bool) {
        self.initialization_enabled = enabled;
    }

    fn is_aborted(&self) -> bool {
        self.token.is_cancelled()
    }
}
