// std
use std::{collections::HashSet, fs, path::Path};
// crates.io
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Trim};
use num_bigint::BigUint;
use tracing::warn;
// srt
use crate::{address::Address, error::Error, serialize::HEADER};

/// A reward line read back from a rewards CSV, with a validated address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChecksummedReward {
	pub address: Address,
	pub score: String,
	pub reward_wei: BigUint,
	pub reward_readable: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardsData {
	/// When this file was read.
	pub generated_at: DateTime<Utc>,
	pub total_recipients: usize,
	pub rewards: Vec<ChecksummedReward>,
}
impl RewardsData {
	pub fn new(rewards: Vec<ChecksummedReward>) -> Self {
		Self { generated_at: Utc::now(), total_recipients: rewards.len(), rewards }
	}

	pub fn total_wei(&self) -> BigUint {
		self.rewards.iter().map(|r| &r.reward_wei).sum()
	}
}

/// Read a rewards CSV, failing on the first row that does not validate.
pub fn read_csv<P>(path: P) -> Result<RewardsData>
where
	P: AsRef<Path>,
{
	let path = path.as_ref();
	let content =
		fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
	let rewards =
		parse_rewards(&content).with_context(|| format!("failed to load {}", path.display()))?;

	Ok(RewardsData::new(rewards))
}

pub fn parse_rewards(content: &str) -> Result<Vec<ChecksummedReward>, Error> {
	let mut rdr = ReaderBuilder::new()
		.has_headers(true)
		.flexible(true)
		.trim(Trim::All)
		.from_reader(content.as_bytes());
	let mut rewards = Vec::new();
	let mut seen = HashSet::new();

	for result in rdr.records() {
		let record = result?;
		let line = record.position().map(|p| p.line() as usize).unwrap_or_default();

		if record.iter().all(str::is_empty) {
			continue;
		}
		if record.len() != HEADER.len() {
			return Err(Error::MalformedRow { line, fields: record.len(), expected: HEADER.len() });
		}

		let address = record[0]
			.parse::<Address>()
			.map_err(|_| Error::InvalidAddress { line, address: record[0].to_owned() })?;
		let reward_wei = parse_wei(&record[2])
			.ok_or_else(|| Error::InvalidAmount { line, amount: record[2].to_owned() })?;

		if !seen.insert(address) {
			warn!("line {line}: duplicate recipient {address}");
		}

		rewards.push(ChecksummedReward {
			address,
			score: record[1].to_owned(),
			reward_wei,
			reward_readable: record[3].to_owned(),
		});
	}

	Ok(rewards)
}

/// Base-10 digits only, no sign, point or exponent.
fn parse_wei(s: &str) -> Option<BigUint> {
	if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}

	BigUint::parse_bytes(s.as_bytes(), 10)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{allocate, config::RewardsConfig, ingest, serialize};

	const A: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
	const B: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

	#[test]
	fn checksums_addresses() {
		let csv = format!(
			"Address,Score,RewardWei,RewardReadable\n\
			{},300,60000000000000000000,60.00\n\
			\n\
			{},200,40000000000000000000,40.00\n",
			A.to_ascii_lowercase(),
			&B[2..]
		);
		let rewards = parse_rewards(&csv).unwrap();

		assert_eq!(rewards.len(), 2);
		assert_eq!(rewards[0].address.to_string(), A);
		assert_eq!(rewards[1].address.to_string(), B);
		assert_eq!(rewards[1].score, "200");
		assert_eq!(rewards[1].reward_readable, "40.00");
	}

	#[test]
	fn rejects_invalid_address() {
		let csv = format!(
			"Address,Score,RewardWei,RewardReadable\n\
			{A},1,10000000000000000,0.01\n\
			0xZZZZ6053f3e94c9b9a09f33669435e7ef1beaed,1,10000000000000000,0.01\n"
		);

		assert!(matches!(parse_rewards(&csv), Err(Error::InvalidAddress { line: 3, .. })));

		let csv = "Address,Score,RewardWei,RewardReadable\n0xaaa1,1,1,0.00\n";

		assert!(matches!(parse_rewards(csv), Err(Error::InvalidAddress { line: 2, .. })));
	}

	#[test]
	fn rejects_bad_amounts_and_shapes() {
		for wei in ["6e19", "1.5", "-1", ""] {
			let csv = format!("Address,Score,RewardWei,RewardReadable\n{A},1,{wei},0.01\n");

			assert!(matches!(parse_rewards(&csv), Err(Error::InvalidAmount { .. })), "{wei}");
		}

		let csv = format!("Address,Score,RewardWei,RewardReadable\n{A},1,1\n");

		assert!(matches!(
			parse_rewards(&csv),
			Err(Error::MalformedRow { line: 2, fields: 3, expected: 4 })
		));
	}

	#[test]
	fn read_csv_stamps_fresh_time() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("rewards.csv");

		fs::write(&path, format!("Address,Score,RewardWei,RewardReadable\n{A},1,1,0.00\n")).unwrap();

		let before = Utc::now();
		let data = read_csv(&path).unwrap();

		assert!(data.generated_at >= before);
		assert_eq!(data.total_recipients, 1);
		assert!(read_csv(dir.path().join("missing.csv")).is_err());
	}

	#[test]
	fn round_trips_allocator_output() {
		let holders = (1..=25)
			.map(|i| {
				let address = format!("0x{:040x}", i * 7_919);

				format!("{i},{address},,\"{},000.5\",1%,", 30 - i)
			})
			.collect::<Vec<_>>()
			.join("\n");
		let csv = format!("Rank,Address,Nametag,Quantity,Percentage,Value\n{holders}\n");
		let ingested = ingest::parse_holders(&csv).unwrap();
		let allocation = allocate::allocate(
			&ingested.holders,
			RewardsConfig { total_reward: 1_000., currency: "cUSD".into(), max_winners: 20 },
		);
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("rewards.csv");

		fs::write(&path, serialize::generate_csv(&allocation.rewards).unwrap()).unwrap();

		let data = read_csv(&path).unwrap();

		assert_eq!(data.total_recipients, 20);
		assert_eq!(data.total_wei(), allocation.total_wei());

		for (read, allocated) in data.rewards.iter().zip(&allocation.rewards) {
			assert_eq!(read.address.to_lower_hex(), allocated.address[2..]);
			assert_eq!(read.score, allocated.score);
			assert_eq!(read.reward_wei, allocated.reward_wei);
			assert_eq!(read.reward_readable, allocated.reward_readable);
		}
	}
}
