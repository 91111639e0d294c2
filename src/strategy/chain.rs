//! Resolution through an explicit list of backends.

use crate::outcome::{FailureKind, Outcome};
use crate::strategy::BlockingResolve;

//------------ BackendChain --------------------------------------------------

/// A strategy that consults a declared list of backends in order.
///
/// This models the "direct" resolution path: instead of asking the
/// platform to discover its name services at runtime, the backends are
/// statically declared and injected at construction time. Every backend is
/// consulted; the last successful answer wins. If none succeeds, the chain
/// fails as unknown host and carries the collected per-backend messages,
/// so a look at the failure shows what each backend had to say.
pub struct BackendChain {
    label: String,
    backends: Vec<Box<dyn BlockingResolve>>,
}

impl BackendChain {
    /// Creates a chain over the given backends, consulted in order.
    pub fn new(
        label: impl Into<String>,
        backends: Vec<Box<dyn BlockingResolve>>,
    ) -> Self {
        BackendChain {
            label: label.into(),
            backends,
        }
    }
}

impl BlockingResolve for BackendChain {
    fn label(&self) -> &str {
        &self.label
    }

    fn resolve(&self, domain: &str) -> Outcome {
        let mut found = None;
        let mut suppressed = Vec::new();
        for backend in &self.backends {
            match backend.resolve(domain) {
                Outcome::Success(addr) => found = Some(addr),
                Outcome::Failure { message, .. } => {
                    suppressed.push(format!("{}: {}", backend.label(), message))
                }
            }
        }
        match found {
            Some(addr) => Outcome::Success(addr),
            None => {
                let message = if suppressed.is_empty() {
                    format!("no backends declared for {}", domain)
                } else {
                    suppressed.join("; ")
                };
                Outcome::failure(FailureKind::UnknownHost, message)
            }
        }
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::net::IpAddr;

    struct Fixed {
        label: &'static str,
        outcome: Outcome,
    }

    impl Fixed {
        fn success(label: &'static str, addr: &str) -> Box<Self> {
            Box::new(Fixed {
                label,
                outcome: Outcome::Success(addr.parse::<IpAddr>().unwrap()),
            })
        }

        fn failure(label: &'static str, message: &str) -> Box<Self> {
            Box::new(Fixed {
                label,
                outcome: Outcome::failure(
                    FailureKind::UnknownHost,
                    message,
                ),
            })
        }
    }

    impl BlockingResolve for Fixed {
        fn label(&self) -> &str {
            self.label
        }

        fn resolve(&self, _domain: &str) -> Outcome {
            self.outcome.clone()
        }
    }

    #[test]
    fn last_success_wins() {
        let chain = BackendChain::new(
            "direct",
            vec![
                Fixed::success("first", "192.0.2.1"),
                Fixed::failure("second", "nope"),
                Fixed::success("third", "192.0.2.3"),
            ],
        );
        assert_eq!(
            chain.resolve("example.com"),
            Outcome::Success("192.0.2.3".parse().unwrap())
        );
    }

    #[test]
    fn collects_messages_on_total_failure() {
        let chain = BackendChain::new(
            "direct",
            vec![
                Fixed::failure("first", "not here"),
                Fixed::failure("second", "me neither"),
            ],
        );
        match chain.resolve("example.com") {
            Outcome::Failure { kind, message } => {
                assert_eq!(kind, FailureKind::UnknownHost);
                assert_eq!(message, "first: not here; second: me neither");
            }
            other => panic!("unexpected outcome: {}", other),
        }
    }

    #[test]
    fn empty_chain_fails() {
        let chain = BackendChain::new("direct", Vec::new());
        assert!(!chain.resolve("example.com").is_success());
    }

    #[test]
    fn bypasses_platform_caching() {
        let chain = BackendChain::new("direct", Vec::new());
        assert!(!chain.caching());
    }
}
