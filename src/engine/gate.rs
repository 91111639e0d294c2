//! The async-mode governor: semaphore-gated dispatch onto an I/O runtime.

use crate::engine::collector::Publisher;
use crate::error::Error;
use crate::outcome::ResolutionRecord;
use crate::strategy::AsyncResolve;
use std::sync::Arc;
use tokio::runtime;
use tokio::sync::Semaphore;
use tracing::{debug, trace};

//------------ AsyncDispatcher -----------------------------------------------

/// Dispatches future-returning resolutions under an admission gate.
///
/// The underlying I/O multiplexer would happily accept unbounded work, so
/// a counting semaphore is the one and only enforcement point of the
/// concurrency bound: the submission loop acquires a permit before every
/// dispatch and blocks when none is free. A permit travels with its
/// resolution and is released when the resolution completes or is
/// cancelled, but only after the record is visible to the collector.
pub struct AsyncDispatcher {
    runtime: runtime::Runtime,
}

impl AsyncDispatcher {
    /// Creates a dispatcher with the given number of I/O-driving threads.
    pub fn new(io_threads: usize) -> Result<Self, Error> {
        let runtime = runtime::Builder::new_multi_thread()
            .worker_threads(io_threads)
            .thread_name("resolve-io")
            .enable_all()
            .build()?;
        Ok(AsyncDispatcher { runtime })
    }

    /// Submits all domains, at most `concurrency` in flight at a time.
    ///
    /// Returns once the submission loop is running; the caller drains the
    /// collector while completions stream in.
    pub fn dispatch(
        &self,
        domains: Vec<String>,
        concurrency: usize,
        strategy: Arc<dyn AsyncResolve>,
        publisher: Publisher,
    ) {
        let gate = Arc::new(Semaphore::new(concurrency));
        self.runtime.spawn(async move {
            for domain in domains {
                let permit =
                    match gate.clone().acquire_owned().await {
                        Ok(permit) => permit,
                        // The gate is never closed explicitly, so this
                        // only happens on external shutdown. The undone
                        // submissions then surface to the consumer as a
                        // collector disconnect.
                        Err(_) => break,
                    };
                let strategy = strategy.clone();
                let publisher = publisher.clone();
                tokio::spawn(async move {
                    let outcome = strategy.resolve(domain.clone()).await;
                    trace!("{} = {}", domain, outcome);
                    publisher.publish(ResolutionRecord {
                        domain,
                        strategy: strategy.label().into(),
                        outcome,
                    });
                    // Publish before release: a freed slot must never be
                    // observable before its record is.
                    drop(permit);
                });
            }
            debug!("all requests are published");
        });
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::engine::collector::Collector;
    use crate::outcome::Outcome;
    use crate::strategy::AsyncResolve;
    use futures_util::future::BoxFuture;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Tracks how many resolutions are in flight at once and completes
    /// them out of submission order.
    #[derive(Default)]
    struct InFlightProbe {
        current: AtomicUsize,
        peak: AtomicUsize,
        started: AtomicUsize,
    }

    impl AsyncResolve for Arc<InFlightProbe> {
        fn label(&self) -> &str {
            "probe"
        }

        fn resolve(&self, _domain: String) -> BoxFuture<'static, Outcome> {
            let probe = self.clone();
            Box::pin(async move {
                let now =
                    probe.current.fetch_add(1, Ordering::SeqCst) + 1;
                probe.peak.fetch_max(now, Ordering::SeqCst);
                // Alternating delays shuffle the completion order.
                let nth = probe.started.fetch_add(1, Ordering::SeqCst);
                let delay = if nth % 2 == 0 { 6 } else { 1 };
                tokio::time::sleep(Duration::from_millis(delay)).await;
                probe.current.fetch_sub(1, Ordering::SeqCst);
                Outcome::Success("192.0.2.1".parse().unwrap())
            })
        }
    }

    #[test]
    fn gate_bounds_concurrency_and_loses_nothing() {
        let probe = Arc::new(InFlightProbe::default());
        let domains: Vec<String> =
            (0..30).map(|i| format!("d{}.example", i)).collect();
        let dispatcher = AsyncDispatcher::new(1).unwrap();
        let (publisher, mut collector) = Collector::new(domains.len());
        dispatcher.dispatch(
            domains,
            4,
            Arc::new(probe.clone()),
            publisher,
        );

        let mut seen = HashSet::new();
        for _ in 0..collector.expected() {
            assert!(seen.insert(collector.take().unwrap().domain));
        }
        assert_eq!(seen.len(), 30);
        assert!(probe.peak.load(Ordering::SeqCst) <= 4);
        assert!(probe.peak.load(Ordering::SeqCst) >= 2);
    }
}
