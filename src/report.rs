//! Statistics of a finished run.

use crate::outcome::Reconciled;
use std::fmt;
use tracing::info;

//------------ RunStats ------------------------------------------------------

/// The aggregate counts of one run.
///
/// The counters grow monotonically while the reconciliation engine drains
/// records and are frozen once every submitted domain is accounted for.
/// They always satisfy the conservation law
/// `succeeded + false_negatives + true_negatives == submitted`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RunStats {
    succeeded: usize,
    false_negatives: usize,
    true_negatives: usize,
}

impl RunStats {
    /// Creates an empty set of counters.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Counts one reconciled record.
    pub(crate) fn count(&mut self, reconciled: &Reconciled) {
        match reconciled {
            Reconciled::Succeeded(_) => self.succeeded += 1,
            Reconciled::FalseNegative { .. } => self.false_negatives += 1,
            Reconciled::TrueNegative(_) => self.true_negatives += 1,
        }
    }

    /// Returns the number of domains the strategy itself resolved.
    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// Returns the number of failures the fallback disproved.
    pub fn false_negatives(&self) -> usize {
        self.false_negatives
    }

    /// Returns the number of failures the fallback confirmed.
    pub fn true_negatives(&self) -> usize {
        self.true_negatives
    }

    /// Returns the total number of domains accounted for.
    pub fn total(&self) -> usize {
        self.succeeded + self.false_negatives + self.true_negatives
    }

    /// Logs the summary at info level.
    pub fn log(&self) {
        info!("False negatives : {}", self.false_negatives);
        info!("True negatives  : {}", self.true_negatives);
        info!("Succeed         : {}", self.succeeded);
        info!("Total           : {}", self.total());
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "succeeded {}, false negatives {}, true negatives {}, \
             total {}",
            self.succeeded,
            self.false_negatives,
            self.true_negatives,
            self.total()
        )
    }
}

//============ Testing =======================================================
