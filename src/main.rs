mod address;
mod allocate;
mod cli;
mod config;
mod error;
mod generate;
mod ingest;
mod output;
mod serialize;
mod upload;

// std
use std::{io, process};
// crates.io
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
	color_eyre::install().map_err(|e| anyhow::anyhow!("{e}"))?;
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with_writer(io::stderr)
		.init();

	let cli = match cli::Cli::try_parse() {
		Ok(cli) => cli,
		Err(e) if e.use_stderr() => {
			e.print()?;
			process::exit(1);
		},
		// Help and version.
		Err(e) => e.exit(),
	};

	cli.run()
}
