//! The result of resolving a single domain name.

use std::fmt;
use std::io;
use std::net::IpAddr;

//------------ Outcome -------------------------------------------------------

/// What a single resolution attempt produced.
///
/// An outcome is immutable once created. A strategy produces exactly one
/// outcome per domain it is handed, either the first address it found or a
/// categorized failure.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The strategy found an address for the domain.
    Success(IpAddr),

    /// The strategy could not produce an address.
    Failure {
        /// The category of the failure.
        kind: FailureKind,

        /// A human-readable description of what went wrong.
        message: String,
    },
}

impl Outcome {
    /// Creates a failure outcome from its parts.
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Outcome::Failure {
            kind,
            message: message.into(),
        }
    }

    /// Creates the failure outcome for an unparsable domain name.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::failure(FailureKind::Malformed, message)
    }

    /// Creates a failure outcome from an I/O error of a resolver library.
    ///
    /// Timeouts keep their own category, everything else the library
    /// reports is a transport-level failure.
    pub fn from_io(err: io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::TimedOut => FailureKind::Timeout,
            _ => FailureKind::Protocol,
        };
        Self::failure(kind, err.to_string())
    }

    /// Returns whether the outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Success(addr) => write!(f, "[{}]", addr),
            Outcome::Failure { kind, message } => {
                write!(f, "{}: {}", kind, message)
            }
        }
    }
}

//------------ FailureKind ---------------------------------------------------

/// The category of a failed resolution attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureKind {
    /// The name exists in no backend the strategy consulted.
    UnknownHost,

    /// The upstream took longer than the strategy's own timeout.
    Timeout,

    /// The domain name could not be parsed.
    Malformed,

    /// A transport-level failure in the underlying resolver or native call.
    Protocol,

    /// The resolution future was cancelled before it completed.
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            FailureKind::UnknownHost => "unknown host",
            FailureKind::Timeout => "timeout",
            FailureKind::Malformed => "malformed name",
            FailureKind::Protocol => "protocol error",
            FailureKind::Cancelled => "cancelled",
        })
    }
}

//------------ ResolutionRecord ----------------------------------------------

/// One completed resolution attempt.
///
/// The engine produces exactly one record per submitted domain per run:
/// never zero, never two. Records arrive at the collector in completion
/// order, which is independent of submission order.
#[derive(Clone, Debug)]
pub struct ResolutionRecord {
    /// The domain that was resolved.
    pub domain: String,

    /// The label of the strategy that resolved it.
    pub strategy: String,

    /// What the strategy produced.
    pub outcome: Outcome,
}

//------------ Reconciled ----------------------------------------------------

/// A resolution record after the reconciliation pass.
///
/// Every failure record is re-resolved once through the authoritative
/// fallback and classified by whether the fallback agreed. Successful
/// records pass through unchanged.
#[derive(Clone, Debug)]
pub enum Reconciled {
    /// The strategy itself succeeded.
    Succeeded(ResolutionRecord),

    /// The strategy failed but the fallback found an address.
    FalseNegative {
        /// The failure as the strategy reported it.
        record: ResolutionRecord,

        /// The address the fallback found.
        address: IpAddr,
    },

    /// Both the strategy and the fallback failed.
    TrueNegative(ResolutionRecord),
}

impl Reconciled {
    /// Returns the original record.
    pub fn record(&self) -> &ResolutionRecord {
        match self {
            Reconciled::Succeeded(record) => record,
            Reconciled::FalseNegative { record, .. } => record,
            Reconciled::TrueNegative(record) => record,
        }
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn io_error_mapping() {
        let timeout = Outcome::from_io(io::Error::new(
            io::ErrorKind::TimedOut,
            "request timed out",
        ));
        match timeout {
            Outcome::Failure { kind, .. } => {
                assert_eq!(kind, FailureKind::Timeout)
            }
            _ => panic!("expected a failure"),
        }

        let other = Outcome::from_io(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        match other {
            Outcome::Failure { kind, .. } => {
                assert_eq!(kind, FailureKind::Protocol)
            }
            _ => panic!("expected a failure"),
        }
    }

    #[test]
    fn display() {
        let success = Outcome::Success("192.0.2.1".parse().unwrap());
        assert_eq!(format!("{}", success), "[192.0.2.1]");
        let failure =
            Outcome::failure(FailureKind::UnknownHost, "no such host");
        assert_eq!(format!("{}", failure), "unknown host: no such host");
    }
}
