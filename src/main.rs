mod api;
mod commands;
mod config;
mod error;
mod formats;
mod poller;
mod revision;

use commands::Command;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Stdout carries response bodies, so logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    commands::Main::from_args().execute()
}
