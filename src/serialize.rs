// std
use std::io;
// crates.io
use csv::{QuoteStyle, WriterBuilder};
// srt
use crate::{
	allocate::AllocatedReward,
	error::{Error, Result},
};

pub const HEADER: [&str; 4] = ["Address", "Score", "RewardWei", "RewardReadable"];

/// Render rewards as `Address,Score,RewardWei,RewardReadable` rows, in the order given.
///
/// Fields are never quoted. A field that would need quoting is rejected.
pub fn generate_csv(rewards: &[AllocatedReward]) -> Result<String> {
	let mut wtr = WriterBuilder::new().quote_style(QuoteStyle::Never).from_writer(Vec::new());

	wtr.write_record(HEADER)?;

	for r in rewards {
		let wei = r.reward_wei.to_string();
		let record = [r.address.as_str(), &r.score, &wei, &r.reward_readable];

		if let Some(field) = record.iter().find(|f| needs_quoting(f)) {
			return Err(Error::UnsafeField { field: field.to_string() });
		}

		wtr.write_record(record)?;
	}

	let bytes = wtr.into_inner().map_err(|e| e.into_error())?;

	String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

fn needs_quoting(field: &str) -> bool {
	field.contains([',', '"', '\n', '\r'])
}
