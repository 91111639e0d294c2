//! The execution, collection, and reconciliation engine.
//!
//! A run walks a fixed sequence of states: dispatching, where every
//! submitted domain is admitted under the concurrency bound; draining,
//! where completions are consumed as they arrive and failures are
//! reconciled against the fallback; and finalized, where every domain is
//! accounted for and the statistics are frozen. No state is skipped and
//! nothing mutable survives into the next run.

use crate::engine::collector::Collector;
use crate::engine::gate::AsyncDispatcher;
use crate::engine::reconcile::Reconciler;
use crate::error::Error;
use crate::report::RunStats;
use crate::strategy::{AsyncResolve, BlockingResolve};
use std::sync::Arc;
use tracing::info;

pub mod collector;
pub mod gate;
pub mod pool;
pub mod reconcile;

//------------ Shootout ------------------------------------------------------

/// The per-run orchestrator.
///
/// A shootout carries the concurrency bound and the authoritative
/// fallback; each `run_*` call executes one complete, independent run of
/// one strategy over a slice of the corpus and returns its frozen
/// statistics. Every run builds its own collector and governor state.
pub struct Shootout<'a> {
    /// The maximum number of in-flight resolutions.
    concurrency: usize,

    /// How many threads drive async I/O. One is plenty.
    io_threads: usize,

    /// The strategy trusted as ground truth during reconciliation.
    fallback: &'a dyn BlockingResolve,
}

impl<'a> Shootout<'a> {
    /// Creates a shootout with the given bound and fallback.
    pub fn new(concurrency: usize, fallback: &'a dyn BlockingResolve) -> Self {
        Shootout {
            concurrency,
            io_threads: 1,
            fallback,
        }
    }

    /// Sets the number of I/O-driving threads for async runs.
    pub fn io_threads(mut self, io_threads: usize) -> Self {
        self.io_threads = io_threads;
        self
    }

    /// Runs a blocking strategy over the given domains.
    ///
    /// The concurrency bound is enforced by pool sizing: exactly
    /// `concurrency` workers exist and each runs one resolution to
    /// completion before pulling the next domain.
    pub fn run_blocking(
        &self,
        domains: &[String],
        strategy: Arc<dyn BlockingResolve>,
    ) -> Result<RunStats, Error> {
        info!(
            "Started resolving {} domains via {} (platform caching: {})",
            domains.len(),
            strategy.label(),
            strategy.caching()
        );
        let (publisher, mut collector) = Collector::new(domains.len());
        let workers = pool::dispatch(
            domains.to_vec(),
            self.concurrency,
            strategy,
            publisher,
        )?;
        let stats = Reconciler::new(self.fallback).drain(&mut collector)?;
        for worker in workers {
            // A worker that panicked has already surfaced through the
            // collector; its join result carries nothing further.
            let _ = worker.join();
        }
        stats.log();
        Ok(stats)
    }

    /// Runs a future-returning strategy over the given domains.
    ///
    /// The concurrency bound is enforced by the admission gate: one
    /// permit per in-flight resolution, released only after the record
    /// reached the collector.
    pub fn run_async(
        &self,
        domains: &[String],
        strategy: Arc<dyn AsyncResolve>,
    ) -> Result<RunStats, Error> {
        info!(
            "Started resolving {} domains via {} (platform caching: {})",
            domains.len(),
            strategy.label(),
            strategy.caching()
        );
        let dispatcher = AsyncDispatcher::new(self.io_threads)?;
        let (publisher, mut collector) = Collector::new(domains.len());
        dispatcher.dispatch(
            domains.to_vec(),
            self.concurrency,
            strategy,
            publisher,
        );
        let stats = Reconciler::new(self.fallback).drain(&mut collector)?;
        stats.log();
        Ok(stats)
    }
}
