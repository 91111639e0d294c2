//! The resolver strategies under test.
//!
//! A strategy is one independent way of turning a domain name into an
//! address, with its own upstream server, transport, and timeout. The
//! engine only ever sees the two traits defined here: [`BlockingResolve`]
//! for strategies that suspend inside the call and [`AsyncResolve`] for
//! strategies that hand back a future. Strategies never share mutable
//! state with each other; where a shared lower-level resource requires
//! serialization it is the strategy's own business (see [`native`]).
//!
//! Whether a strategy goes through a platform-level cache differs per
//! strategy and is part of what the harness measures, so every strategy
//! states it explicitly through [`caching()`][BlockingResolve::caching].

use crate::outcome::Outcome;
use futures_util::future::BoxFuture;

pub mod chain;
#[cfg(unix)]
pub mod native;
pub mod stub;
pub mod system;

//------------ BlockingResolve -----------------------------------------------

/// A resolver strategy that blocks until it has an outcome.
///
/// The call either returns a success or a categorized failure; it never
/// panics on a malformed name and performs no retries of its own. The
/// engine bounds how many calls are in flight at once, the strategy need
/// not.
pub trait BlockingResolve: Send + Sync {
    /// Returns the name the strategy is reported under.
    fn label(&self) -> &str;

    /// Returns whether resolutions may be served from a platform cache.
    fn caching(&self) -> bool {
        false
    }

    /// Resolves a single domain name.
    fn resolve(&self, domain: &str) -> Outcome;
}

//------------ AsyncResolve --------------------------------------------------

/// A resolver strategy that returns a future of its outcome.
///
/// The returned future completes exactly once, with a success or a
/// categorized failure, never both and never zero times. Dropping the
/// future before completion counts as cancellation and produces no
/// outcome, which the engine only does on external shutdown.
pub trait AsyncResolve: Send + Sync {
    /// Returns the name the strategy is reported under.
    fn label(&self) -> &str;

    /// Returns whether resolutions may be served from a platform cache.
    fn caching(&self) -> bool {
        false
    }

    /// Starts resolving a single domain name.
    fn resolve(&self, domain: String) -> BoxFuture<'static, Outcome>;
}
