//! Races every resolver strategy over a corpus of real domains.
//!
//! Usage: shootout <corpus.txt.gz> [server] [count] [concurrency]
//!
//! The corpus is a gzip-compressed, newline-delimited list of domain
//! names. The server is the upstream the library clients query; the
//! system and native strategies keep using the host's own configuration
//! regardless.

use resolver_shootout::corpus::Corpus;
use resolver_shootout::engine::Shootout;
use resolver_shootout::logging;
use resolver_shootout::strategy::chain::BackendChain;
use resolver_shootout::strategy::stub::{AsyncStubClient, StubClient};
use resolver_shootout::strategy::system::SystemResolver;
use resolver_shootout::strategy::{AsyncResolve, BlockingResolve};
use std::env;
use std::net::SocketAddr;
use std::process::exit;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_SERVER: &str = "8.8.8.8:53";
const DEFAULT_COUNT: usize = 1000;
const DEFAULT_CONCURRENCY: usize = 64;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

fn main() {
    logging::init_logging();

    let mut args = env::args().skip(1);
    let corpus_path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!(
                "Usage: shootout <corpus.txt.gz> [server] [count] \
                 [concurrency]"
            );
            exit(1);
        }
    };
    let server: SocketAddr = parse_arg(args.next(), DEFAULT_SERVER);
    let count: usize = parse_arg(args.next(), &DEFAULT_COUNT.to_string());
    let concurrency: usize =
        parse_arg(args.next(), &DEFAULT_CONCURRENCY.to_string());

    let corpus = match Corpus::load_gzip(&corpus_path) {
        Ok(corpus) => corpus,
        Err(err) => {
            eprintln!("Failed to load {}: {}", corpus_path, err);
            exit(1);
        }
    };
    let domains = corpus.prefix(count);

    let fallback = SystemResolver::new();
    let shootout = Shootout::new(concurrency, &fallback);

    let blocking: Vec<Arc<dyn BlockingResolve>> = blocking_strategies(server);
    for strategy in blocking {
        let label = strategy.label().to_string();
        let caching = strategy.caching();
        match shootout.run_blocking(domains, strategy) {
            Ok(stats) => {
                println!("{:18} caching={:5} {}", label, caching, stats)
            }
            Err(err) => {
                eprintln!("{}: run aborted: {}", label, err);
                exit(1);
            }
        }
    }

    let asynchronous: Arc<dyn AsyncResolve> =
        Arc::new(AsyncStubClient::udp(server, REQUEST_TIMEOUT));
    let label = asynchronous.label().to_string();
    let caching = asynchronous.caching();
    match shootout.run_async(domains, asynchronous) {
        Ok(stats) => {
            println!("{:18} caching={:5} {}", label, caching, stats)
        }
        Err(err) => {
            eprintln!("{}: run aborted: {}", label, err);
            exit(1);
        }
    }
}

/// The statically-declared roster of blocking strategies.
fn blocking_strategies(server: SocketAddr) -> Vec<Arc<dyn BlockingResolve>> {
    let mut strategies: Vec<Arc<dyn BlockingResolve>> =
        vec![Arc::new(SystemResolver::new())];

    strategies.push(Arc::new(BackendChain::new(
        "direct",
        direct_backends(),
    )));

    #[cfg(unix)]
    strategies.push(Arc::new(
        resolver_shootout::strategy::native::NativeUnsafeResolver::new(),
    ));
    #[cfg(target_os = "linux")]
    strategies.push(Arc::new(
        resolver_shootout::strategy::native::NativeSafeResolver::new(),
    ));

    match StubClient::udp(server, REQUEST_TIMEOUT) {
        Ok(client) => strategies.push(Arc::new(client)),
        Err(err) => eprintln!("skipping udp-client: {}", err),
    }
    match StubClient::tcp(server, REQUEST_TIMEOUT) {
        Ok(client) => strategies.push(Arc::new(client)),
        Err(err) => eprintln!("skipping tcp-client: {}", err),
    }

    strategies
}

/// The backends behind the "direct" chain, in consulted order.
fn direct_backends() -> Vec<Box<dyn BlockingResolve>> {
    let mut backends: Vec<Box<dyn BlockingResolve>> = Vec::new();
    #[cfg(target_os = "linux")]
    backends.push(Box::new(
        resolver_shootout::strategy::native::NativeSafeResolver::new(),
    ));
    backends.push(Box::new(SystemResolver::new()));
    backends
}

fn parse_arg<T: std::str::FromStr>(arg: Option<String>, default: &str) -> T {
    let text = arg.unwrap_or_else(|| default.to_string());
    match text.parse() {
        Ok(value) => value,
        Err(_) => {
            eprintln!("Invalid argument: {}", text);
            exit(1);
        }
    }
}
