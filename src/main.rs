mod cli;
mod selection;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let _cli = Cli::parse();

    if let Err(e) = selection::run() {
        tracing::error!(error = %e, "selection query failed");
        eprintln!("xselowner: {e}");
        std::process::exit(1);
    }
}
