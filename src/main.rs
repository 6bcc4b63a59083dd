//! pollotally service entrypoint.

use clap::Parser;
use tracing::error;

/// Pollo counter bot core: tallies image posts and ships monthly leaderboards.
#[derive(Parser, Debug)]
#[command(name = "pollotally", version = env!("CARGO_PKG_VERSION"), long_about = None)]
struct Args {
    /// Override database path (useful for tests or custom DB)
    #[arg(long = "db")]
    db: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = pollotally::run(args.db).await {
        error!("fatal: {e}");
        std::process::exit(1);
    }
}
