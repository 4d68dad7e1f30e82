//! `leakcheck` - query the LeakCheck breach lookup API from the shell.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::Cli;

/// Initialize tracing subscriber for logging
///
/// `RUST_LOG` wins when set; otherwise the level follows `-v` flags.
fn init_tracing(verbosity: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = match verbosity {
        0 => "warn",
        1 => "info,leakcheck=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    tracing::debug!("Starting leakcheck v{}", env!("CARGO_PKG_VERSION"));

    commands::run(cli).await
}
