use std::{fs, io, path::{Path, PathBuf}};

use log::{info, warn};
use thiserror::Error;
use walkdir::WalkDir;

use crate::FileEntry;

/// A required input (the list file) could not be read at all.
#[derive(Error, Debug)]
#[error("cannot read source {}: {source}", path.display())]
pub struct SourceUnavailable {
	pub path: PathBuf,
	pub source: io::Error,
}

/// Case-insensitive suffix filter over file names.
/// An empty filter accepts everything.
#[derive(Clone, Debug)]
pub struct ExtensionFilter {
	extensions: Vec<String>,
}

impl ExtensionFilter {
	pub fn new(extensions: impl IntoIterator<Item = String>) -> Self {
		Self {
			extensions: extensions.into_iter()
				.map(|extension| extension.to_lowercase())
				.collect(),
		}
	}

	pub fn match_all() -> Self {
		Self {
			extensions: Vec::new(),
		}
	}

	pub fn matches(&self, file_name: &str) -> bool {
		if self.extensions.is_empty() {
			return true;
		}

		let file_name = file_name.to_lowercase();
		self.extensions.iter().any(|extension| file_name.ends_with(extension))
	}
}

/// Reads entries from a newline-delimited list of paths.
///
/// Blank lines are skipped. Paths that don't exist or aren't regular files
/// are skipped with a warning; they never reach the allocator. Only an
/// unreadable list file itself is an error.
pub fn from_list_file(path: &Path) -> Result<Vec<FileEntry>, SourceUnavailable> {
	let contents = fs::read_to_string(path).map_err(|source| SourceUnavailable {
		path: path.to_owned(),
		source,
	})?;

	let mut entries = Vec::new();

	for line in contents.lines() {
		let line = line.trim();
		if line.is_empty() {
			continue;
		}

		match entry_for_path(Path::new(line)) {
			Some(entry) => entries.push(entry),
			None => warn!("file does not exist, skipping: {line}"),
		}
	}

	Ok(entries)
}

fn entry_for_path(path: &Path) -> Option<FileEntry> {
	let metadata = fs::metadata(path).ok()?;
	if !metadata.is_file() {
		return None;
	}

	let path = path.canonicalize().unwrap_or_else(|_| path.to_owned());

	Some(FileEntry {
		path,
		size: metadata.len(),
	})
}

/// Recursively gathers all files under `root` whose names pass the filter.
///
/// Directories are always descended into regardless of the filter. Entries
/// that can't be read mid-scan are skipped with a warning. A root that
/// doesn't exist yields an empty list rather than an error.
pub fn scan_directory(root: &Path, filter: &ExtensionFilter) -> Vec<FileEntry> {
	if !root.exists() {
		return Vec::new();
	}
	let root = root.canonicalize().unwrap_or_else(|_| root.to_owned());

	let mut entries = Vec::new();
	let mut total_size = 0;

	for entry in WalkDir::new(&root).follow_links(true) {
		let entry = match entry {
			Ok(entry) => entry,
			Err(error) => {
				warn!("skipping unreadable entry: {error}");
				continue;
			},
		};

		if !entry.file_type().is_file() {
			continue;
		}

		if !filter.matches(&entry.file_name().to_string_lossy()) {
			continue;
		}

		let size = match entry.metadata() {
			Ok(metadata) => metadata.len(),
			Err(error) => {
				warn!("skipping {}: {error}", entry.path().display());
				continue;
			},
		};

		total_size += size;
		entries.push(FileEntry {
			path: entry.path().to_owned(),
			size,
		});
	}

	let format = humansize::make_format(humansize::BINARY);
	info!("found {} files with a total size of {} in {}", entries.len(), format(total_size), root.display());

	entries
}
