// std
use std::{
	ffi::OsString,
	io::Write,
	path::{Path, PathBuf},
};
// crates.io
use anyhow::{Context, Result};
use tempfile::NamedTempFile;
// srt
use crate::generate::Format;

/// Write every file only once all of them have been fully written to temporary files next to their
/// destinations. A failure before that point leaves the destinations untouched.
pub fn write_atomic<P, C>(files: &[(P, C)]) -> Result<()>
where
	P: AsRef<Path>,
	C: AsRef<[u8]>,
{
	let mut staged = Vec::with_capacity(files.len());

	for (path, contents) in files {
		let path = path.as_ref();
		let dir = match path.parent() {
			Some(p) if !p.as_os_str().is_empty() => p,
			_ => Path::new("."),
		};
		let mut tmp = NamedTempFile::new_in(dir)
			.with_context(|| format!("failed to create a temporary file in {}", dir.display()))?;

		tmp.write_all(contents.as_ref())
			.and_then(|_| tmp.as_file().sync_all())
			.with_context(|| format!("failed to write {}", path.display()))?;
		staged.push((tmp, path));
	}
	for (tmp, path) in staged {
		tmp.persist(path).with_context(|| format!("failed to write {}", path.display()))?;
	}

	Ok(())
}

/// `<output>.csv`, or `<input stem>_processed.csv` next to the input.
pub fn processed_csv_path(input: &Path, output: Option<&Path>) -> PathBuf {
	match output {
		Some(o) => with_suffix(o, ".csv", ".csv"),
		None => {
			let stem = input.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();

			input.with_file_name(format!("{stem}_processed.csv"))
		},
	}
}

/// Script destination for Foundry and cast output.
pub fn script_path(format: Format, output: &Path) -> PathBuf {
	match format {
		Format::Foundry => with_suffix(output, ".sol", ".s.sol"),
		Format::Cast => with_suffix(output, ".sh", ".sh"),
		Format::Raw => output.to_owned(),
	}
}

/// Address and amount list destinations for raw output.
pub fn raw_paths(output: Option<&Path>) -> (PathBuf, PathBuf) {
	match output {
		Some(o) => {
			let base = if o.extension().is_some_and(|e| e == "txt") {
				o.with_extension("")
			} else {
				o.to_owned()
			};

			(with_suffix(&base, "", "_addresses.txt"), with_suffix(&base, "", "_amounts.txt"))
		},
		None => (PathBuf::from("addresses.txt"), PathBuf::from("amounts.txt")),
	}
}

/// Append `append` unless the file name already ends with a non-empty `keep`.
fn with_suffix(path: &Path, keep: &str, append: &str) -> PathBuf {
	if !keep.is_empty() && path.to_string_lossy().ends_with(keep) {
		return path.to_owned();
	}

	let mut s = OsString::from(path.as_os_str());

	s.push(append);

	s.into()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn processed_csv_paths() {
		let input = Path::new("data/holders.csv");

		assert_eq!(processed_csv_path(input, None), Path::new("data/holders_processed.csv"));
		assert_eq!(processed_csv_path(input, Some(Path::new("season3"))), Path::new("season3.csv"));
		assert_eq!(
			processed_csv_path(input, Some(Path::new("out/season3.csv"))),
			Path::new("out/season3.csv")
		);
	}

	#[test]
	fn script_paths() {
		assert_eq!(script_path(Format::Foundry, Path::new("Upload")), Path::new("Upload.s.sol"));
		assert_eq!(script_path(Format::Foundry, Path::new("Upload.s.sol")), Path::new("Upload.s.sol"));
		assert_eq!(script_path(Format::Cast, Path::new("upload")), Path::new("upload.sh"));
		assert_eq!(script_path(Format::Cast, Path::new("upload.sh")), Path::new("upload.sh"));
	}

	#[test]
	fn raw_list_paths() {
		assert_eq!(raw_paths(None), (PathBuf::from("addresses.txt"), PathBuf::from("amounts.txt")));
		assert_eq!(
			raw_paths(Some(Path::new("out/season3.txt"))),
			(PathBuf::from("out/season3_addresses.txt"), PathBuf::from("out/season3_amounts.txt"))
		);
		assert_eq!(
			raw_paths(Some(Path::new("season3"))),
			(PathBuf::from("season3_addresses.txt"), PathBuf::from("season3_amounts.txt"))
		);
	}

	#[test]
	fn writes_all_files() {
		let dir = tempfile::tempdir().unwrap();
		let a = dir.path().join("a.txt");
		let b = dir.path().join("b.txt");

		write_atomic(&[(&a, "1"), (&b, "2")]).unwrap();

		assert_eq!(std::fs::read_to_string(&a).unwrap(), "1");
		assert_eq!(std::fs::read_to_string(&b).unwrap(), "2");
		assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
	}

	#[test]
	fn failed_write_leaves_nothing_behind() {
		let dir = tempfile::tempdir().unwrap();
		let a = dir.path().join("a.txt");
		let b = dir.path().join("missing").join("b.txt");

		assert!(write_atomic(&[(&a, "1"), (&b, "2")]).is_err());
		assert!(!a.exists());
		assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
	}
}
