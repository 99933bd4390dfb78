// crates.io
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::warn;
// srt
use crate::error::{Error, Result};

const MIN_FIELDS: usize = 5;

/// One row of a block explorer token holder export.
#[derive(Clone, Debug, PartialEq)]
pub struct Holder {
	/// As reported by the explorer, not trusted.
	pub rank: u64,
	/// Lowercased.
	pub address: String,
	pub nametag: String,
	/// The holder's score.
	pub quantity: f64,
	pub percentage: f64,
	pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRow {
	/// 1-based line in the source file.
	pub line: u64,
	pub fields: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ingested {
	pub holders: Vec<Holder>,
	/// Rows dropped for having fewer than five fields.
	pub skipped: Vec<SkippedRow>,
	/// Lines whose quantity could not be parsed and was read as zero.
	pub defaulted: Vec<u64>,
}
impl Ingested {
	/// Fail if anything was dropped or coerced.
	pub fn ensure_clean(&self) -> Result<()> {
		let (skipped, defaulted) = (self.skipped.len(), self.defaulted.len());

		if skipped == 0 && defaulted == 0 {
			Ok(())
		} else {
			Err(Error::SkippedRows { skipped, defaulted })
		}
	}
}

/// Parse a holder export.
///
/// The first line is the header and is always skipped. Fields may be quoted, quoted fields may contain
/// commas. Blank lines are ignored. Input order is preserved.
pub fn parse_holders(content: &str) -> Result<Ingested> {
	let mut rdr = ReaderBuilder::new()
		.has_headers(true)
		.flexible(true)
		.trim(Trim::All)
		.from_reader(content.as_bytes());
	let mut ingested = Ingested::default();

	for result in rdr.records() {
		let record = result?;
		let line = record.position().map(|p| p.line()).unwrap_or_default();

		if is_blank(&record) {
			continue;
		}
		if record.len() < MIN_FIELDS {
			warn!("line {line}: expected at least {MIN_FIELDS} fields, found {}, skipped", record.len());

			ingested.skipped.push(SkippedRow { line, fields: record.len() });

			continue;
		}

		let quantity = parse_quantity(&record[3]).unwrap_or_else(|| {
			warn!("line {line}: unparseable quantity {:?}, read as 0", &record[3]);

			ingested.defaulted.push(line);

			0.
		});

		ingested.holders.push(Holder {
			rank: record[0].parse().unwrap_or_default(),
			address: record[1].to_ascii_lowercase(),
			nametag: record[2].to_owned(),
			quantity,
			percentage: parse_percentage(&record[4]).unwrap_or_default(),
			value: record.get(5).unwrap_or_default().to_owned(),
		});
	}

	Ok(ingested)
}

fn is_blank(record: &StringRecord) -> bool {
	record.iter().all(str::is_empty)
}

/// `"1,234.5"` -> `1234.5`.
fn parse_quantity(s: &str) -> Option<f64> {
	parse_finite(&s.replace(',', ""))
}

/// `"12.5%"` -> `12.5`.
fn parse_percentage(s: &str) -> Option<f64> {
	parse_finite(s.trim_end_matches('%'))
}

fn parse_finite(s: &str) -> Option<f64> {
	s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}
