//! Re-checking failures against the authoritative fallback.

use crate::engine::collector::Collector;
use crate::error::Error;
use crate::outcome::{Outcome, Reconciled, ResolutionRecord};
use crate::report::RunStats;
use crate::strategy::BlockingResolve;
use tracing::trace;

//------------ Reconciler ----------------------------------------------------

/// The reconciliation pass of a run.
///
/// The reconciler drains the collector, one blocking take per submitted
/// domain, and re-resolves every failure exactly once through the
/// authoritative fallback: if the fallback finds an address the failure
/// was a false negative of the strategy under test, if the fallback fails
/// too it was a true negative. The pass runs strictly single-threaded, so
/// fallback calls are never concurrent with each other and no new
/// concurrency appears downstream of the governor.
///
/// Reconciliation is purely diagnostic. It never changes the original
/// record and a fallback failure is terminal for that one domain only.
pub struct Reconciler<'a> {
    fallback: &'a dyn BlockingResolve,
}

impl<'a> Reconciler<'a> {
    /// Creates a reconciler over the given fallback strategy.
    pub fn new(fallback: &'a dyn BlockingResolve) -> Self {
        Reconciler { fallback }
    }

    /// Drains the collector and returns the frozen statistics.
    ///
    /// Consumes exactly as many records as the run submitted. Anything
    /// that keeps the records from arriving is an engine fault and aborts
    /// the run rather than producing incorrect counts.
    pub fn drain(&self, collector: &mut Collector) -> Result<RunStats, Error> {
        let mut stats = RunStats::new();
        for i in 0..collector.expected() {
            let record = collector.take()?;
            let reconciled = self.reconcile(i, record);
            stats.count(&reconciled);
        }
        Ok(stats)
    }

    fn reconcile(&self, i: usize, record: ResolutionRecord) -> Reconciled {
        match &record.outcome {
            Outcome::Success(addr) => {
                trace!("{} Y {} : [{}]", i, record.domain, addr);
                Reconciled::Succeeded(record)
            }
            Outcome::Failure { message, .. } => {
                trace!("{} N {} : {}", i, record.domain, message);
                match self.fallback.resolve(&record.domain) {
                    Outcome::Success(address) => {
                        trace!("    !!! SYNC [{}]", address);
                        Reconciled::FalseNegative { record, address }
                    }
                    Outcome::Failure { .. } => {
                        Reconciled::TrueNegative(record)
                    }
                }
            }
        }
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::outcome::FailureKind;

    /// Resolves only domains containing "good".
    struct GoodOnly;

    impl BlockingResolve for GoodOnly {
        fn label(&self) -> &str {
            "good-only"
        }

        fn resolve(&self, domain: &str) -> Outcome {
            if domain.contains("good") {
                Outcome::Success("192.0.2.7".parse().unwrap())
            } else {
                Outcome::failure(FailureKind::UnknownHost, "not good")
            }
        }
    }

    fn failure(domain: &str) -> ResolutionRecord {
        ResolutionRecord {
            domain: domain.into(),
            strategy: "test".into(),
            outcome: Outcome::failure(FailureKind::Timeout, "too slow"),
        }
    }

    #[test]
    fn failures_are_reclassified_by_the_fallback() {
        let reconciler = Reconciler::new(&GoodOnly);

        match reconciler.reconcile(0, failure("good.example")) {
            Reconciled::FalseNegative { record, address } => {
                assert_eq!(record.domain, "good.example");
                assert_eq!(
                    address,
                    "192.0.2.7".parse::<std::net::IpAddr>().unwrap()
                );
                // The original record is untouched.
                assert!(!record.outcome.is_success());
            }
            other => panic!("unexpected class: {:?}", other),
        }

        match reconciler.reconcile(1, failure("bad.example")) {
            Reconciled::TrueNegative(record) => {
                assert_eq!(record.domain, "bad.example")
            }
            other => panic!("unexpected class: {:?}", other),
        }
    }

    #[test]
    fn successes_pass_through_unchanged() {
        let reconciler = Reconciler::new(&GoodOnly);
        let record = ResolutionRecord {
            domain: "bad.example".into(),
            strategy: "test".into(),
            // A success never reaches the fallback, even for a domain
            // the fallback would reject.
            outcome: Outcome::Success("192.0.2.9".parse().unwrap()),
        };
        match reconciler.reconcile(0, record) {
            Reconciled::Succeeded(record) => {
                assert!(record.outcome.is_success())
            }
            other => panic!("unexpected class: {:?}", other),
        }
    }
}
