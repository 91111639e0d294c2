//! The platform resolver.

use crate::outcome::{FailureKind, Outcome};
use crate::strategy::BlockingResolve;
use std::net::ToSocketAddrs;

//------------ SystemResolver ------------------------------------------------

/// The platform's own name resolution, caches and all.
///
/// Resolution goes through the system's `getaddrinfo` path, so whatever
/// name services and caches the host is configured with apply. This is the
/// most general-purpose resolver available and doubles as the
/// authoritative fallback during reconciliation.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemResolver;

impl SystemResolver {
    /// Creates a new system resolver.
    pub fn new() -> Self {
        SystemResolver
    }
}

impl BlockingResolve for SystemResolver {
    fn label(&self) -> &str {
        "system"
    }

    fn caching(&self) -> bool {
        true
    }

    fn resolve(&self, domain: &str) -> Outcome {
        // The port is irrelevant, we only want the address lookup.
        match (domain, 0u16).to_socket_addrs() {
            Ok(mut addrs) => match addrs.next() {
                Some(addr) => Outcome::Success(addr.ip()),
                None => Outcome::failure(
                    FailureKind::UnknownHost,
                    format!("no addresses for {}", domain),
                ),
            },
            Err(err) => {
                Outcome::failure(FailureKind::UnknownHost, err.to_string())
            }
        }
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resolves_literal_addresses() {
        // Address literals do not touch the network, which keeps this
        // test hermetic.
        match SystemResolver::new().resolve("192.0.2.1") {
            Outcome::Success(addr) => {
                assert_eq!(addr, "192.0.2.1".parse::<std::net::IpAddr>().unwrap())
            }
            other => panic!("unexpected outcome: {}", other),
        }
    }

    #[test]
    fn declares_platform_caching() {
        // The system path is the one strategy the platform may serve
        // from its cache, and the run log reports it as such.
        assert!(SystemResolver::new().caching());
    }

    #[test]
    fn rejects_nonsense() {
        assert!(!SystemResolver::new()
            .resolve("not a domain name")
            .is_success());
    }
}
