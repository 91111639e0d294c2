//! Library clients speaking to a configured upstream server.
//!
//! These strategies delegate the wire protocol to the `domain` crate's
//! stub resolver. Each client owns its own configuration: the upstream
//! server address, the transport, and the request timeout. Nothing is
//! normalized across clients; how a differently-configured client behaves
//! is exactly what the harness measures.

use crate::outcome::{FailureKind, Outcome};
use crate::strategy::{AsyncResolve, BlockingResolve};
use domain::base::name::Name;
use domain::resolv::stub::conf::{ResolvConf, ServerConf, Transport};
use domain::resolv::StubResolver;
use futures_util::future::BoxFuture;
use std::io;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime;

//------------ Configuration -------------------------------------------------

/// Builds a resolver configuration with a single upstream server.
fn single_server(
    addr: SocketAddr,
    transport: Transport,
    timeout: Duration,
) -> ResolvConf {
    let mut conf = ResolvConf::new();
    let mut server = ServerConf::new(addr, transport);
    server.request_timeout = timeout;
    conf.servers.push(server);
    conf
}

//------------ StubClient ----------------------------------------------------

/// A blocking client over the `domain` stub resolver.
///
/// The client owns a single-worker runtime that drives its lookups, the
/// equivalent of one dedicated I/O thread. Calls block until the lookup
/// completes or the configured request timeout fires, so the worker pool
/// of the engine is what bounds concurrency.
pub struct StubClient {
    label: &'static str,
    resolver: StubResolver,
    runtime: runtime::Runtime,
}

impl StubClient {
    /// Creates a client querying the given server over UDP.
    ///
    /// Truncated answers retry over TCP, which is the closest to a pure
    /// UDP client the underlying library offers.
    pub fn udp(
        server: SocketAddr,
        timeout: Duration,
    ) -> Result<Self, io::Error> {
        Self::new("udp-client", server, Transport::UdpTcp, timeout)
    }

    /// Creates a client querying the given server over TCP.
    pub fn tcp(
        server: SocketAddr,
        timeout: Duration,
    ) -> Result<Self, io::Error> {
        Self::new("tcp-client", server, Transport::Tcp, timeout)
    }

    fn new(
        label: &'static str,
        server: SocketAddr,
        transport: Transport,
        timeout: Duration,
    ) -> Result<Self, io::Error> {
        let runtime = runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name(label)
            .enable_all()
            .build()?;
        Ok(StubClient {
            label,
            resolver: StubResolver::from_conf(single_server(
                server, transport, timeout,
            )),
            runtime,
        })
    }
}

impl BlockingResolve for StubClient {
    fn label(&self) -> &str {
        self.label
    }

    fn resolve(&self, domain: &str) -> Outcome {
        let name = match Name::<Vec<u8>>::from_str(domain) {
            Ok(name) => name,
            Err(err) => return Outcome::malformed(err.to_string()),
        };
        match self.runtime.block_on(self.resolver.lookup_host(&name)) {
            Ok(found) => match found.iter().next() {
                Some(addr) => Outcome::Success(addr),
                None => Outcome::failure(
                    FailureKind::UnknownHost,
                    format!("no addresses for {}", domain),
                ),
            },
            Err(err) => Outcome::from_io(err),
        }
    }
}

//------------ AsyncStubClient -----------------------------------------------

/// A future-returning client over the `domain` stub resolver.
///
/// The returned futures are driven by whatever runtime the engine's
/// async governor provides; the client itself owns no thread. The
/// resolver sits behind an arc so every future can carry its own handle.
#[derive(Clone, Debug)]
pub struct AsyncStubClient {
    label: &'static str,
    resolver: Arc<StubResolver>,
}

impl AsyncStubClient {
    /// Creates a client querying the given server over UDP.
    ///
    /// Truncated answers retry over TCP, as with [`StubClient::udp`].
    pub fn udp(server: SocketAddr, timeout: Duration) -> Self {
        AsyncStubClient {
            label: "async-udp-client",
            resolver: Arc::new(StubResolver::from_conf(single_server(
                server,
                Transport::UdpTcp,
                timeout,
            ))),
        }
    }
}

impl AsyncResolve for AsyncStubClient {
    fn label(&self) -> &str {
        self.label
    }

    fn resolve(&self, domain: String) -> BoxFuture<'static, Outcome> {
        let resolver = self.resolver.clone();
        Box::pin(async move {
            let name = match Name::<Vec<u8>>::from_str(&domain) {
                Ok(name) => name,
                Err(err) => return Outcome::malformed(err.to_string()),
            };
            match resolver.lookup_host(&name).await {
                Ok(found) => match found.iter().next() {
                    Some(addr) => Outcome::Success(addr),
                    None => Outcome::failure(
                        FailureKind::UnknownHost,
                        format!("no addresses for {}", domain),
                    ),
                },
                Err(err) => Outcome::from_io(err),
            }
        })
    }
}

//============ Testing =======================================================
