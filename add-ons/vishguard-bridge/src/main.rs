//! vishguard-bridge: multiplexes simulator sessions over stdin/stdout.
//!
//! One JSON request per input line, one JSON response per output line, in
//! order. The process exits only at EOF; per-request failures are answered
//! as data. A simulator backend is wired in here; without one, every
//! request reports the unavailability reason.

mod bridge;
mod error;
mod simulator;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bridge::SessionBridge;
use simulator::UnavailableFactory;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[vishguard-bridge] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Stdout carries responses only; the simulator backend is swapped in at
    // this wiring point by builds that link one.
    let factory = UnavailableFactory::new(
        "no simulator backend is linked into this build",
    );
    tracing::warn!("simulator backend missing; init/chat requests will be refused");

    let mut bridge = SessionBridge::new(factory);
    tracing::info!("vishguard bridge started; reading requests from stdin");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    bridge.run_loop(stdin, tokio::io::stdout()).await
}
