// crates.io
use clap::ValueEnum;
use num_bigint::BigUint;
// srt
use crate::{
	address::Address,
	upload::{ChecksummedReward, RewardsData},
};

/// Recipients per `setSeasonRewards` call.
pub const CHUNK_SIZE: usize = 100;

const SIGNATURE: &str = "setSeasonRewards(address[],uint256[])";
const WEI_PER_MICRO_TOKEN: u64 = 1_000_000_000_000;
const MICROS_PER_TOKEN: u64 = 1_000_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
	/// Foundry Solidity script.
	#[default]
	Foundry,
	/// Shell script of `cast send` commands.
	Cast,
	/// Index aligned address and amount lists.
	Raw,
}

/// Newline separated lists, `addresses[i]` receives `amounts[i]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawLists {
	pub addresses: String,
	pub amounts: String,
}

pub fn batches(rewards: &[ChecksummedReward]) -> impl Iterator<Item = &[ChecksummedReward]> {
	rewards.chunks(CHUNK_SIZE)
}

fn batch_count(rewards: &[ChecksummedReward]) -> usize {
	rewards.len().div_ceil(CHUNK_SIZE)
}

/// `wei / 10^18` with six decimals, rounded up so a funding figure never falls short.
pub fn format_tokens(wei: &BigUint) -> String {
	let micros = (wei + (WEI_PER_MICRO_TOKEN - 1)) / WEI_PER_MICRO_TOKEN;
	let whole = &micros / MICROS_PER_TOKEN;
	let frac = &micros % MICROS_PER_TOKEN;

	format!("{whole}.{:0>6}", frac.to_string())
}

pub fn generate_foundry(data: &RewardsData, contract: &Address) -> String {
	let total = batch_count(&data.rewards);
	let mut lines = vec![
		"// SPDX-License-Identifier: MIT".to_owned(),
		"pragma solidity ^0.8.13;".to_owned(),
		String::new(),
		"import {Script, console} from \"forge-std/Script.sol\";".to_owned(),
		String::new(),
		format!("// Generated at {}.", data.generated_at.to_rfc3339()),
		format!("// {} recipients in {total} batches of up to {CHUNK_SIZE}.", data.total_recipients),
		String::new(),
		"interface ISeasonRewards {".to_owned(),
		"    function setSeasonRewards(address[] calldata users, uint256[] calldata amounts) external;"
			.to_owned(),
		"}".to_owned(),
		String::new(),
		"contract UploadSeasonRewards is Script {".to_owned(),
		"    ISeasonRewards public rewards;".to_owned(),
		String::new(),
		"    function setUp() public {".to_owned(),
		format!("        rewards = ISeasonRewards({contract});"),
		"    }".to_owned(),
		String::new(),
		"    function run() public {".to_owned(),
		"        uint256 deployerPrivateKey = vm.envUint(\"PRIVATE_KEY\");".to_owned(),
		String::new(),
		"        vm.startBroadcast(deployerPrivateKey);".to_owned(),
	];

	for (i, batch) in batches(&data.rewards).enumerate() {
		let n = batch.len();

		lines.push(String::new());
		lines.push(format!("        // Batch {}/{total}", i + 1));
		lines.push("        {".to_owned());
		lines.push(format!("            address[] memory users = new address[]({n});"));
		lines.push(format!("            uint256[] memory amounts = new uint256[]({n});"));

		for (j, r) in batch.iter().enumerate() {
			lines.push(format!("            users[{j}] = {};", r.address));
			lines.push(format!("            amounts[{j}] = {}; // {}", r.reward_wei, r.reward_readable));
		}

		lines.push("            rewards.setSeasonRewards(users, amounts);".to_owned());
		lines.push(format!(
			"            console.log(\"Uploaded batch {}/{total} ({n} recipients)\");",
			i + 1
		));
		lines.push("        }".to_owned());
	}

	lines.extend([
		String::new(),
		"        vm.stopBroadcast();".to_owned(),
		String::new(),
		format!("        console.log(\"Total recipients: {}\");", data.total_recipients),
		format!(
			"        console.log(\"Make sure the contract holds at least {} reward tokens\");",
			format_tokens(&data.total_wei())
		),
		"    }".to_owned(),
		"}".to_owned(),
	]);

	lines.join("\n") + "\n"
}

pub fn generate_cast(data: &RewardsData, contract: &Address) -> String {
	let total = batch_count(&data.rewards);
	let mut lines = vec![
		"#!/bin/sh".to_owned(),
		"set -e".to_owned(),
		String::new(),
		format!("# Generated at {}.", data.generated_at.to_rfc3339()),
		format!("# {} recipients in {total} batches of up to {CHUNK_SIZE}.", data.total_recipients),
		format!(
			"# The contract must hold at least {} reward tokens.",
			format_tokens(&data.total_wei())
		),
		String::new(),
		": \"${PRIVATE_KEY:?PRIVATE_KEY is not set}\"".to_owned(),
		": \"${RPC_URL:?RPC_URL is not set}\"".to_owned(),
	];

	for (i, batch) in batches(&data.rewards).enumerate() {
		let users = batch.iter().map(|r| r.address.to_string()).collect::<Vec<_>>().join(",");
		let amounts = batch.iter().map(|r| r.reward_wei.to_string()).collect::<Vec<_>>().join(",");

		lines.push(String::new());
		lines.push(format!("# Batch {}/{total}: {} recipients", i + 1, batch.len()));
		lines.push(format!("echo \"Uploading batch {}/{total}...\"", i + 1));
		lines.push(format!(
			"cast send {contract} \"{SIGNATURE}\" \"[{users}]\" \"[{amounts}]\" \
			--private-key \"$PRIVATE_KEY\" --rpc-url \"$RPC_URL\""
		));
	}

	lines.push(String::new());
	lines.push(format!("echo \"Uploaded {} recipients.\"", data.total_recipients));

	lines.join("\n") + "\n"
}

pub fn generate_raw(data: &RewardsData) -> RawLists {
	RawLists {
		addresses: data.rewards.iter().map(|r| r.address.to_string()).collect::<Vec<_>>().join("\n"),
		amounts: data.rewards.iter().map(|r| r.reward_wei.to_string()).collect::<Vec<_>>().join("\n"),
	}
}
