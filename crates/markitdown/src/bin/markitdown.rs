//! markitdown binary
//!
//! Run with: cargo run -p markitdown -- <inputs>... [-q QUERY] [-o FILE] [-v]

use clap::Parser;
use markitdown::cli::{self, Cli};
use markitdown::config::load_dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    load_dotenv();

    // Logs go to stderr so stdout carries only the result
    let default_filter = if cli.verbose {
        "markitdown=debug"
    } else {
        "markitdown=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    cli::run(cli).await?;

    Ok(())
}
