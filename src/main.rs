//! Headless frontvisor host.
//!
//! Runs the lifecycle controller on null collaborators: it idles until SIGINT,
//! SIGTERM or SIGQUIT (Ctrl-C on Windows), then shuts down. Log verbosity follows
//! `RUST_LOG` (default `info`).

use std::sync::Arc;

use frontvisor::{Config, Frontend, Subscribe};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();

    #[cfg(feature = "logging")]
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(frontvisor::LogWriter::new())];
    #[cfg(not(feature = "logging"))]
    let subs: Vec<Arc<dyn Subscribe>> = Vec::new();

    let frontend = Frontend::builder(Config::default())
        .with_subscribers(subs)
        .build();

    let code = frontend.run_main(std::env::args().collect(), None).await;
    std::process::exit(code);
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}
