use std::borrow::Cow;

use indicatif::{MultiProgress, ProgressBar, ProgressFinish, ProgressStyle};

pub struct ProgressDisplay {
	file_style: ProgressStyle,
	done_style: ProgressStyle,
	bars: MultiProgress,
	total: ProgressBar,
}

impl ProgressDisplay {
	pub fn new(total_bytes: u64) -> Self {
		let total_style = ProgressStyle::with_template("{prefix} ({binary_bytes}/{binary_total_bytes}):  [{wide_bar:.blue/blue}]  {percent}% ").unwrap()
			.progress_chars("##-");
		let file_style = ProgressStyle::with_template("{prefix}:  [{wide_bar:.yellow/yellow}]  {percent}% ").unwrap()
			.progress_chars("##-");
		let done_style = ProgressStyle::with_template("{prefix}  [{wide_bar:.green}]  {percent}% ").unwrap()
			.progress_chars("##-");

		let bars = MultiProgress::new();
		let total = ProgressBar::new(total_bytes)
			.with_finish(ProgressFinish::AndLeave)
			.with_prefix("Total")
			.with_style(total_style);
		bars.add(total.clone());

		Self {
			file_style,
			done_style,
			bars,
			total,
		}
	}

	pub fn new_tracker(&self, label: impl Into<Cow<'static, str>>, total_bytes: u64) -> ProgressTracker {
		let bar = ProgressBar::new(total_bytes)
			.with_finish(ProgressFinish::AndLeave)
			.with_style(self.file_style.clone())
			.with_prefix(label);
		self.bars.insert_from_back(1, bar.clone());

		ProgressTracker {
			display: self,
			bar,
			total_bytes,
		}
	}
}

pub struct ProgressTracker<'a> {
	display: &'a ProgressDisplay,
	bar: ProgressBar,
	total_bytes: u64,
}

impl ProgressTracker<'_> {
	pub fn advance(&self, amount: u64) {
		self.display.total.inc(amount);
		self.bar.inc(amount);

		if self.bar.position() == self.total_bytes {
			self.bar.set_style(self.display.done_style.clone());
			self.bar.finish();
		}
	}
}
