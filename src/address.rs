// std
use std::{fmt, str::FromStr};
// crates.io
use sha3::{Digest, Keccak256};

/// A 20-byte account identifier, rendered in mixed-case checksum form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 20]);
impl Address {
	pub const ZERO: Self = Self([0; 20]);

	/// Lowercase hex without the `0x` prefix.
	pub fn to_lower_hex(&self) -> String {
		array_bytes::bytes2hex("", self.0)
	}

	pub fn to_checksum(&self) -> String {
		to_checksum(&self.to_lower_hex())
	}

	pub fn is_zero(&self) -> bool {
		*self == Self::ZERO
	}
}
impl FromStr for Address {
	type Err = InvalidAddress;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let lower = s.trim().to_ascii_lowercase();
		let hex = lower.strip_prefix("0x").unwrap_or(&lower);

		if !is_lower_hex_40(hex) {
			return Err(InvalidAddress(s.to_owned()));
		}

		array_bytes::hex2bytes(hex)
			.ok()
			.and_then(|bytes| <[u8; 20]>::try_from(bytes).ok())
			.map(Self)
			.ok_or_else(|| InvalidAddress(s.to_owned()))
	}
}
impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.to_checksum())
	}
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid address {0:?}, expected 20 bytes of hex")]
pub struct InvalidAddress(pub String);

fn is_lower_hex_40(hex: &str) -> bool {
	hex.len() == 40 && hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Encode a lowercase, unprefixed hex address into its `0x`-prefixed checksum form.
///
/// The keccak-256 digest of the ASCII hex string selects the case of every letter: a hash nibble of 8
/// or more uppercases the digit at the same position. Digits `0-9` are left as they are.
pub fn to_checksum(lower_hex: &str) -> String {
	let hash = array_bytes::bytes2hex("", Keccak256::digest(lower_hex.as_bytes()));
	let mut checksummed = String::with_capacity(lower_hex.len() + 2);

	checksummed.push_str("0x");

	for (c, h) in lower_hex.chars().zip(hash.chars()) {
		if c.is_ascii_alphabetic() && h.to_digit(16).unwrap_or(0) >= 8 {
			checksummed.push(c.to_ascii_uppercase());
		} else {
			checksummed.push(c);
		}
	}

	checksummed
}
