// crates.io
use num_bigint::BigUint;
use tracing::{debug, warn};
// srt
use crate::{
	config::{RewardsConfig, RewardsTable},
	error::Result,
	ingest::Holder,
};

/// Wei per cent of an 18-decimal token.
const WEI_PER_CENT: u64 = 10_000_000_000_000_000;

/// One computed reward line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocatedReward {
	/// Lowercased, not yet checksummed.
	pub address: String,
	/// The holder's raw quantity, as written to the rewards CSV.
	pub score: String,
	/// Always `reward_cents * 10^16`.
	pub reward_wei: BigUint,
	/// Two decimal places, rounded down.
	pub reward_readable: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Allocation {
	pub rewards: Vec<AllocatedReward>,
	pub config: RewardsConfig,
	pub eligible: usize,
	pub total_score: f64,
}
impl Allocation {
	pub fn total_wei(&self) -> BigUint {
		self.rewards.iter().map(|r| &r.reward_wei).sum()
	}

	pub fn pool_wei(&self) -> BigUint {
		cents_to_wei(to_cents(self.config.total_reward))
	}

	/// What the pool keeps after every payout has been rounded down.
	pub fn residual_wei(&self) -> BigUint {
		let pool = self.pool_wei();
		let total = self.total_wei();

		if pool > total {
			pool - total
		} else {
			BigUint::default()
		}
	}
}

/// Allocate the pool of `chain_id` across the top holders, proportionally to their quantity.
pub fn process_rewards(holders: &[Holder], chain_id: u64, table: &RewardsTable) -> Result<Allocation> {
	let config = table.get(chain_id)?.clone();

	Ok(allocate(holders, config))
}

/// Allocate `config.total_reward` across the top `config.max_winners` holders.
///
/// Each reward is floored to a cent before it is scaled to wei, so the sum of all rewards never
/// exceeds the pool. Holders past the cutoff, and holders with a non-positive quantity, get no row.
pub fn allocate(holders: &[Holder], config: RewardsConfig) -> Allocation {
	let mut sorted = holders.iter().collect::<Vec<_>>();

	// Stable, ties keep their input order.
	sorted.sort_by(|a, b| b.quantity.total_cmp(&a.quantity));
	sorted.truncate(config.max_winners);

	let eligible = sorted.len();
	// Non-positive quantities get no row and must not shrink the denominator.
	let total_score = sorted.iter().map(|h| h.quantity).filter(|q| *q > 0.).sum::<f64>();

	debug!("{eligible} eligible holders with a total score of {total_score}");

	if total_score == 0. {
		warn!("total score of the {eligible} eligible holders is 0, nothing to distribute");

		return Allocation { rewards: Vec::new(), config, eligible, total_score };
	}

	let rewards = sorted
		.into_iter()
		.filter(|h| h.quantity > 0.)
		.map(|h| {
			let proportion = h.quantity / total_score;
			let cents = to_cents(config.total_reward * proportion);

			AllocatedReward {
				address: h.address.clone(),
				score: h.quantity.to_string(),
				reward_wei: cents_to_wei(cents),
				reward_readable: format!("{}.{:02}", cents / 100, cents % 100),
			}
		})
		.collect();

	Allocation { rewards, config, eligible, total_score }
}

/// `floor(amount * 100)`, saturating at zero.
fn to_cents(amount: f64) -> u128 {
	let cents = (amount * 100.).floor();

	if cents.is_finite() && cents > 0. {
		cents as u128
	} else {
		0
	}
}

fn cents_to_wei(cents: u128) -> BigUint {
	BigUint::from(cents) * WEI_PER_CENT
}
