//! carlot binary - parses server arguments, sets up tracing, and serves

use anyhow::{anyhow, Result};
use carlot_server::{run_server, ServerArgs};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_tracing(debug: bool) -> Result<()> {
    let default_level = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();
    init_tracing(args.debug)?;

    run_server(args).await
}
