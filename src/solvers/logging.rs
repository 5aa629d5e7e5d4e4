//! Progress records for solver runs.
//!
//! With feature `obs_slog` and `RunOptions::verbose`, a [`RunLogger`] writes
//! structured `slog` records to the terminal (asynchronous drain): one at
//! start, one every `log_every` iterations with the reported objective, and
//! one at the end. Otherwise every call is a no-op and objective closures
//! are never evaluated.
#[cfg(feature = "obs_slog")]
use slog::{Drain, Logger, info, o};

use crate::solvers::options::RunOptions;

/// Per-run progress logger.
#[derive(Debug)]
pub struct RunLogger {
    log_every: usize,
    #[cfg(feature = "obs_slog")]
    logger: Option<Logger>,
}

impl RunLogger {
    #[cfg(feature = "obs_slog")]
    pub fn new(label: &str, opts: &RunOptions) -> Self {
        let logger = opts.verbose.then(|| terminal_logger().new(o!("solver" => label.to_string())));
        Self { log_every: opts.log_every, logger }
    }

    #[cfg(not(feature = "obs_slog"))]
    pub fn new(_label: &str, opts: &RunOptions) -> Self {
        Self { log_every: opts.log_every }
    }

    #[cfg(feature = "obs_slog")]
    pub fn is_enabled(&self) -> bool {
        self.logger.is_some()
    }

    #[cfg(not(feature = "obs_slog"))]
    pub fn is_enabled(&self) -> bool {
        false
    }

    /// Whether iteration `k` (1-based) falls on the logging cadence.
    ///
    /// `log_every == 0` disables per-iteration records.
    pub fn is_due(&self, k: usize) -> bool {
        self.log_every != 0 && k % self.log_every == 0
    }

    pub fn start<F: FnOnce() -> f64>(&self, n_iter: usize, obj: F) {
        #[cfg(feature = "obs_slog")]
        if let Some(logger) = &self.logger {
            info!(logger, "start"; "n_iter" => n_iter, "obj" => obj());
        }
        #[cfg(not(feature = "obs_slog"))]
        let _ = (n_iter, obj);
    }

    pub fn iteration<F: FnOnce() -> f64>(&self, k: usize, obj: F) {
        if !self.is_enabled() || !self.is_due(k) {
            return;
        }
        #[cfg(feature = "obs_slog")]
        if let Some(logger) = &self.logger {
            info!(logger, "iteration"; "iter" => k, "obj" => obj());
        }
        #[cfg(not(feature = "obs_slog"))]
        let _ = obj;
    }

    pub fn finish(&self, n_iter: usize, obj: f64) {
        #[cfg(feature = "obs_slog")]
        if let Some(logger) = &self.logger {
            info!(logger, "done"; "n_iter" => n_iter, "obj" => obj);
        }
        #[cfg(not(feature = "obs_slog"))]
        let _ = (n_iter, obj);
    }
}

#[cfg(feature = "obs_slog")]
fn terminal_logger() -> Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    Logger::root(drain, o!())
}
