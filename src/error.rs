//! Engine-level faults.

use std::error;
use std::fmt;
use std::io;

//------------ Error ---------------------------------------------------------

/// A fatal fault of the execution engine.
///
/// Per-domain failures never show up here: they are encoded into the
/// outcome of the affected domain and the run carries on. An `Error` means
/// the engine can no longer guarantee that its statistics account for every
/// submitted domain, so the run is aborted instead of reporting partial
/// counts.
#[derive(Debug)]
pub enum Error {
    /// The collector disconnected before all expected records arrived.
    ///
    /// This happens when every producer is gone, typically because a
    /// worker panicked, while records are still outstanding.
    CollectorClosed {
        /// The number of records that did arrive.
        received: usize,

        /// The number of records the run submitted.
        expected: usize,
    },

    /// The I/O runtime driving asynchronous resolutions could not be built.
    Runtime(io::Error),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::CollectorClosed { received, expected } => {
                write!(
                    f,
                    "collector closed after {} of {} records",
                    received, expected
                )
            }
            Error::Runtime(err) => {
                write!(f, "failed to start I/O runtime: {}", err)
            }
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Runtime(err)
    }
}
