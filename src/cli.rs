// std
use std::{
	fs,
	path::{Path, PathBuf},
};
// crates.io
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
// srt
use crate::{
	address::Address,
	allocate::{self, Allocation},
	config::{RewardsTable, CELO},
	generate::{self, Format},
	ingest, output, serialize, upload,
};

#[derive(Debug, Parser)]
#[command(
	version = concat!(
		env!("CARGO_PKG_VERSION"),
		"-",
		env!("VERGEN_GIT_SHA"),
		"-",
		env!("VERGEN_CARGO_TARGET_TRIPLE"),
	),
	about,
	rename_all = "kebab",
)]
pub struct Cli {
	#[command(subcommand)]
	pub subcmd: SubCmd,
}
impl Cli {
	pub fn run(&self) -> Result<()> {
		match &self.subcmd {
			SubCmd::ProcessRewards { input, output, chain, rewards_config, strict } =>
				process_rewards(input, output.as_deref(), *chain, rewards_config.as_deref(), *strict)?,
			SubCmd::UploadRewards { input, contract, output, format } =>
				upload_rewards(input, contract, output.as_deref(), *format)?,
		}

		Ok(())
	}
}

#[derive(Debug, Parser)]
pub enum SubCmd {
	/// Allocate the season reward pool across a block explorer holder export.
	ProcessRewards {
		/// Path to the holder CSV.
		#[clap(long, value_name = "PATH")]
		input: PathBuf,
		/// Output file, `.csv` is appended if missing [default: <INPUT>_processed.csv].
		#[clap(long, value_name = "PATH")]
		output: Option<PathBuf>,
		/// Chain whose rewards configuration applies.
		#[clap(long, value_name = "CHAIN_ID", default_value_t = CELO)]
		chain: u64,
		/// JSON rewards configuration keyed by chain ID, replaces the built-in one.
		#[clap(long, value_name = "PATH", env = "REWARDS_CONFIG")]
		rewards_config: Option<PathBuf>,
		/// Fail instead of skipping malformed holder rows.
		#[clap(long)]
		strict: bool,
	},
	/// Generate the batched `setSeasonRewards` transactions from a processed rewards CSV.
	UploadRewards {
		/// Path to the processed rewards CSV.
		#[clap(long, value_name = "PATH")]
		input: PathBuf,
		/// Season rewards contract.
		#[clap(long, value_name = "ADDRESS", default_value = "0x0000000000000000000000000000000000000000")]
		contract: Address,
		/// Output file, printed to stdout if absent. Raw lists use it as a base name.
		#[clap(long, value_name = "PATH")]
		output: Option<PathBuf>,
		/// Output format.
		#[clap(long, value_enum, default_value_t = Format::Foundry)]
		format: Format,
	},
}

fn process_rewards(
	input: &Path,
	output: Option<&Path>,
	chain: u64,
	rewards_config: Option<&Path>,
	strict: bool,
) -> Result<()> {
	let table = match rewards_config {
		Some(p) => RewardsTable::from_path(p)?,
		None => RewardsTable::builtin(),
	};

	debug!("rewards configured for chains {:?}", table.chain_ids().collect::<Vec<_>>());

	let content =
		fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;
	let ingested = ingest::parse_holders(&content)
		.with_context(|| format!("failed to parse {}", input.display()))?;

	info!("read {} holders from {}", ingested.holders.len(), input.display());

	if !ingested.skipped.is_empty() || !ingested.defaulted.is_empty() {
		warn!(
			"{} rows skipped and {} quantities read as 0",
			ingested.skipped.len(),
			ingested.defaulted.len()
		);
	}
	if strict {
		ingested.ensure_clean()?;
	}

	let allocation = allocate::process_rewards(&ingested.holders, chain, &table)?;
	let csv = serialize::generate_csv(&allocation.rewards)?;
	let path = output::processed_csv_path(input, output);

	output::write_atomic(&[(&path, csv)])?;
	print_allocation(&allocation);
	println!("Rewards written to {}", path.display());

	Ok(())
}

fn print_allocation(allocation: &Allocation) {
	let currency = &allocation.config.currency;

	println!(
		"{} recipients out of {} eligible holders (max {}), pool {} {currency}",
		allocation.rewards.len(),
		allocation.eligible,
		allocation.config.max_winners,
		allocation.config.total_reward,
	);
	println!(
		"Distributed {} {currency}, undistributed {} {currency}",
		generate::format_tokens(&allocation.total_wei()),
		generate::format_tokens(&allocation.residual_wei()),
	);

	for (i, r) in allocation.rewards.iter().take(5).enumerate() {
		println!("{:>3}. {} score {} -> {} {currency}", i + 1, r.address, r.score, r.reward_readable);
	}
	if allocation.rewards.len() > 5 {
		println!("     ... and {} more", allocation.rewards.len() - 5);
	}
}

fn upload_rewards(
	input: &Path,
	contract: &Address,
	output: Option<&Path>,
	format: Format,
) -> Result<()> {
	let data = upload::read_csv(input)?;

	info!(
		"{} recipients, {} reward tokens in total",
		data.total_recipients,
		generate::format_tokens(&data.total_wei())
	);

	if data.rewards.is_empty() {
		warn!("{} has no recipients", input.display());
	}
	if contract.is_zero() && format != Format::Raw {
		warn!("target contract is the zero address");
	}

	match format {
		Format::Foundry | Format::Cast => {
			let script = if format == Format::Foundry {
				generate::generate_foundry(&data, contract)
			} else {
				generate::generate_cast(&data, contract)
			};

			match output {
				Some(o) => {
					let path = output::script_path(format, o);

					output::write_atomic(&[(&path, script)])?;
					println!("Script written to {}", path.display());
				},
				None => print!("{script}"),
			}
		},
		Format::Raw => {
			let raw = generate::generate_raw(&data);
			let (addresses, amounts) = output::raw_paths(output);

			output::write_atomic(&[(&addresses, raw.addresses), (&amounts, raw.amounts)])?;
			println!("Addresses written to {}", addresses.display());
			println!("Amounts written to {}", amounts.display());
		},
	}

	Ok(())
}
