//! A harness for comparing DNS name-resolution strategies.
//!
//! Several independent ways of turning a domain name into an address exist
//! on a typical host: the platform resolver, direct calls into the C
//! library, and library clients speaking to an upstream server over UDP or
//! TCP, synchronously or through futures. They do not always agree. This
//! crate runs a shared corpus of domain names through each strategy under a
//! configurable concurrency bound, collects the outcomes as they complete,
//! and re-checks every reported failure against an authoritative fallback
//! resolver to tell genuine failures apart from artifacts of the strategy
//! under test.
//!
//! The crate does not implement the DNS itself. Wire-level queries are
//! delegated to the [domain](https://crates.io/crates/domain) crate and the
//! platform's own resolution routines.
//!
//! # Modules
//!
//! * [corpus] loads the shared domain-name corpus,
//! * [strategy] provides the resolver strategies under test,
//! * [engine] dispatches, collects, and reconciles resolutions, and
//! * [report] renders the final statistics of a run.

pub mod corpus;
pub mod engine;
pub mod error;
pub mod logging;
pub mod outcome;
pub mod report;
pub mod strategy;

pub use self::corpus::Corpus;
pub use self::engine::Shootout;
pub use self::error::Error;
pub use self::outcome::{FailureKind, Outcome, Reconciled, ResolutionRecord};
pub use self::report::RunStats;
pub use self::strategy::{AsyncResolve, BlockingResolve};
