//! Collecting completed resolutions.

use crate::error::Error;
use crate::outcome::ResolutionRecord;
use std::sync::mpsc::{channel, Receiver, Sender};

//------------ Collector -----------------------------------------------------

/// The completion-order sink of a run.
///
/// Workers and future completions publish one record per submitted domain
/// through their [`Publisher`] handles; the single consumer performs
/// exactly as many blocking takes as domains were submitted. Records
/// arrive in completion order, which says nothing about submission order.
///
/// There is no polling and no timeout: every strategy bounds its own
/// calls, so every record arrives eventually. If all publishers disappear
/// with records still outstanding, something upstream died and
/// [`take()`][Self::take] reports the fatal fault instead of hanging.
pub struct Collector {
    rx: Receiver<ResolutionRecord>,
    expected: usize,
    received: usize,
}

impl Collector {
    /// Creates a collector expecting the given number of records.
    ///
    /// Returns the publisher handle to hand to producers along with the
    /// collector itself. The handle must be dropped (or moved into the
    /// producers) before draining, otherwise a lost record blocks the
    /// consumer forever instead of surfacing as an error.
    pub fn new(expected: usize) -> (Publisher, Collector) {
        let (tx, rx) = channel();
        (
            Publisher { tx },
            Collector {
                rx,
                expected,
                received: 0,
            },
        )
    }

    /// Returns the number of records the run submitted.
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Takes the next completed record, blocking until one arrives.
    pub fn take(&mut self) -> Result<ResolutionRecord, Error> {
        match self.rx.recv() {
            Ok(record) => {
                self.received += 1;
                Ok(record)
            }
            Err(_) => Err(Error::CollectorClosed {
                received: self.received,
                expected: self.expected,
            }),
        }
    }
}

//------------ Publisher -----------------------------------------------------

/// A producer-side handle onto the collector.
///
/// Clones freely; publishing requires no coordination between producers
/// beyond the queue's own thread safety.
#[derive(Clone)]
pub struct Publisher {
    tx: Sender<ResolutionRecord>,
}

impl Publisher {
    /// Publishes one completed record.
    pub fn publish(&self, record: ResolutionRecord) {
        // The consumer only disappears once the run has already failed,
        // in which case the record has nowhere to go anyway.
        let _ = self.tx.send(record);
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::outcome::Outcome;
    use std::thread;

    fn record(domain: &str) -> ResolutionRecord {
        ResolutionRecord {
            domain: domain.into(),
            strategy: "test".into(),
            outcome: Outcome::Success("192.0.2.1".parse().unwrap()),
        }
    }

    #[test]
    fn takes_from_many_producers() {
        let (publisher, mut collector) = Collector::new(6);
        let mut handles = Vec::new();
        for i in 0..3 {
            let publisher = publisher.clone();
            handles.push(thread::spawn(move || {
                publisher.publish(record(&format!("a{}.example", i)));
                publisher.publish(record(&format!("b{}.example", i)));
            }));
        }
        drop(publisher);

        let mut seen = Vec::new();
        for _ in 0..collector.expected() {
            seen.push(collector.take().unwrap().domain);
        }
        for handle in handles {
            handle.join().unwrap();
        }
        seen.sort();
        assert_eq!(
            seen,
            [
                "a0.example",
                "a1.example",
                "a2.example",
                "b0.example",
                "b1.example",
                "b2.example"
            ]
        );
    }

    #[test]
    fn disconnect_is_fatal_not_a_hang() {
        let (publisher, mut collector) = Collector::new(2);
        publisher.publish(record("only.example"));
        drop(publisher);

        assert!(collector.take().is_ok());
        match collector.take() {
            Err(Error::CollectorClosed { received, expected }) => {
                assert_eq!(received, 1);
                assert_eq!(expected, 2);
            }
            other => panic!("unexpected result: {:?}", other.map(|r| r.domain)),
        }
    }
}
