use std::io::{self, Write};

use crate::{AllocationManager, FileGroup};

const MEBIBYTE: f64 = (1024 * 1024) as f64;
const RULE: &str = "**************************************************";

/// Writes one section per collection followed by an "Extra Files" section
/// for everything that found no room.
pub fn write_report(mut out: impl Write, manager: &AllocationManager, extras: &FileGroup) -> io::Result<()> {
	for (index, group) in manager.groups().iter().enumerate() {
		write_section(&mut out, &format!("Collection {}", index + 1), group)?;
	}

	write_section(&mut out, "Extra Files", extras)
}

/// One report section: a labelled size line, a rule, one path per line,
/// then a blank line.
pub fn write_section(out: &mut impl Write, label: &str, group: &FileGroup) -> io::Result<()> {
	writeln!(out, "{label}: {}", format_size(group.total_size()))?;
	writeln!(out, "{RULE}")?;

	for entry in group.entries() {
		writeln!(out, "{}", entry.path.display())?;
	}

	writeln!(out)
}

/// Renders a byte count as `2.93 MiB (3,070,230 bytes)`.
pub fn format_size(bytes: u64) -> String {
	let mebibytes = format!("{:.2}", bytes as f64 / MEBIBYTE);
	let (whole, fraction) = mebibytes.split_once('.').expect("a two-decimal float always has a decimal point");

	format!("{}.{fraction} MiB ({} bytes)", thousands(whole), thousands(&bytes.to_string()))
}

/// Inserts thousands separators into a string of decimal digits.
fn thousands(digits: &str) -> String {
	let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

	for (index, digit) in digits.chars().enumerate() {
		if index > 0 && (digits.len() - index) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(digit);
	}

	grouped
}
