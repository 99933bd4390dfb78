// std
use std::{collections::BTreeMap, fs, path::Path};
// crates.io
use anyhow::{Context, Result};
use serde::Deserialize;
// srt
use crate::error::Error;

pub const CELO: u64 = 42_220;
pub const CELO_ALFAJORES: u64 = 44_787;

/// Reward pool settings of a single chain.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardsConfig {
	/// Pool size in whole tokens.
	pub total_reward: f64,
	pub currency: String,
	pub max_winners: usize,
}

/// Chain ID keyed rewards configurations.
#[derive(Clone, Debug, PartialEq)]
pub struct RewardsTable(BTreeMap<u64, RewardsConfig>);
impl RewardsTable {
	pub fn builtin() -> Self {
		Self(BTreeMap::from([
			(
				CELO,
				RewardsConfig {
					total_reward: 100.,
					currency: "cUSD".into(),
					max_winners: 100,
				},
			),
			(
				CELO_ALFAJORES,
				RewardsConfig { total_reward: 10., currency: "cUSD".into(), max_winners: 10 },
			),
		]))
	}

	/// Load a table from a JSON object keyed by chain ID.
	///
	/// ```json
	/// { "42220": { "totalReward": 100, "currency": "cUSD", "maxWinners": 100 } }
	/// ```
	pub fn from_path<P>(path: P) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let path = path.as_ref();
		let json = fs::read_to_string(path)
			.with_context(|| format!("failed to read rewards config {}", path.display()))?;

		Self::from_json(&json)
			.with_context(|| format!("failed to load rewards config {}", path.display()))
	}

	pub fn from_json(json: &str) -> Result<Self> {
		let map = serde_json::from_str::<BTreeMap<u64, RewardsConfig>>(json)?;

		for (&chain_id, c) in &map {
			if !c.total_reward.is_finite() || c.total_reward < 0. {
				return Err(Error::InvalidConfig {
					chain_id,
					reason: format!("totalReward must be a non-negative number, got {}", c.total_reward),
				}
				.into());
			}
			if c.max_winners == 0 {
				return Err(Error::InvalidConfig {
					chain_id,
					reason: "maxWinners must be at least 1".into(),
				}
				.into());
			}
		}

		Ok(Self(map))
	}

	pub fn get(&self, chain_id: u64) -> Result<&RewardsConfig, Error> {
		self.0.get(&chain_id).ok_or(Error::UnsupportedChain { chain_id })
	}

	pub fn chain_ids(&self) -> impl Iterator<Item = u64> + '_ {
		self.0.keys().copied()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unknown_chain_is_rejected() {
		let table = RewardsTable::builtin();

		assert!(table.get(CELO).is_ok());
		assert!(matches!(table.get(8_453), Err(Error::UnsupportedChain { chain_id: 8_453 })));
	}

	#[test]
	fn json_table_replaces_builtin() {
		let table = RewardsTable::from_json(
			r#"{ "8453": { "totalReward": 250.5, "currency": "USDC", "maxWinners": 3 } }"#,
		)
		.unwrap();

		assert_eq!(
			table.get(8_453).unwrap(),
			&RewardsConfig { total_reward: 250.5, currency: "USDC".into(), max_winners: 3 }
		);
		assert!(table.get(CELO).is_err());
		assert_eq!(table.chain_ids().collect::<Vec<_>>(), vec![8_453]);
	}

	#[test]
	fn json_table_is_validated() {
		assert!(RewardsTable::from_json(
			r#"{ "1": { "totalReward": -1, "currency": "X", "maxWinners": 3 } }"#
		)
		.is_err());
		assert!(RewardsTable::from_json(
			r#"{ "1": { "totalReward": 1, "currency": "X", "maxWinners": 0 } }"#
		)
		.is_err());
		assert!(RewardsTable::from_json(r#"{ "celo": {} }"#).is_err());
	}
}
