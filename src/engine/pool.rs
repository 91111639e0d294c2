//! The blocking-mode governor: a fixed pool of worker threads.

use crate::engine::collector::Publisher;
use crate::error::Error;
use crate::outcome::ResolutionRecord;
use crate::strategy::BlockingResolve;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::vec::IntoIter;
use tracing::trace;

//------------ dispatch ------------------------------------------------------

/// Dispatches the domains onto a pool of exactly `concurrency` workers.
///
/// Each worker pulls the next domain, resolves it to completion, and
/// publishes the record; the pool size alone enforces the concurrency
/// bound, no separate admission gate is needed. The call returns as soon
/// as the workers are running; records stream into the publisher while
/// the caller drains the collector.
pub fn dispatch(
    domains: Vec<String>,
    concurrency: usize,
    strategy: Arc<dyn BlockingResolve>,
    publisher: Publisher,
) -> Result<Vec<JoinHandle<()>>, Error> {
    let queue = Arc::new(Mutex::new(domains.into_iter()));
    let mut workers = Vec::with_capacity(concurrency);
    for i in 0..concurrency {
        let queue = queue.clone();
        let strategy = strategy.clone();
        let publisher = publisher.clone();
        let handle = thread::Builder::new()
            .name(format!("resolve-{}", i))
            .spawn(move || {
                run_worker(&queue, &*strategy, &publisher)
            })?;
        workers.push(handle);
    }
    Ok(workers)
}

fn run_worker(
    queue: &Mutex<IntoIter<String>>,
    strategy: &dyn BlockingResolve,
    publisher: &Publisher,
) {
    loop {
        let domain = {
            let mut queue = match queue.lock() {
                Ok(queue) => queue,
                Err(poisoned) => poisoned.into_inner(),
            };
            queue.next()
        };
        let Some(domain) = domain else {
            break;
        };
        let outcome = strategy.resolve(&domain);
        trace!("{} = {}", domain, outcome);
        publisher.publish(ResolutionRecord {
            domain,
            strategy: strategy.label().into(),
            outcome,
        });
    }
}

//============ Testing =======================================================
