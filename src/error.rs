// crates.io
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
	#[error("chain {chain_id} has no rewards configuration")]
	UnsupportedChain { chain_id: u64 },

	#[error("invalid rewards configuration for chain {chain_id}: {reason}")]
	InvalidConfig { chain_id: u64, reason: String },

	#[error("line {line}: invalid address {address:?}")]
	InvalidAddress { line: usize, address: String },

	#[error("line {line}: invalid wei amount {amount:?}")]
	InvalidAmount { line: usize, amount: String },

	#[error("line {line}: expected {expected} fields, found {fields}")]
	MalformedRow { line: usize, fields: usize, expected: usize },

	#[error("field {field:?} cannot be written without quoting")]
	UnsafeField { field: String },

	#[error("{skipped} holder rows were skipped and {defaulted} quantities were read as 0 during ingestion")]
	SkippedRows { skipped: usize, defaulted: usize },

	#[error(transparent)]
	Csv(#[from] csv::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}
