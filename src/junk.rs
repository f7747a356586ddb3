use std::{fs::{self, File}, io::{self, Write}, path::Path};

use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

use crate::progress::ProgressDisplay;

const FILL_BYTE: u8 = 42;
const BLOCK_SIZE: usize = 1024 * 1024;

pub struct JunkConfig {
	pub count: usize,
	pub min_size: u64,
	pub max_size: u64,
	pub extension: String,
	pub seed: u64,
}

/// Fills a directory with files of random size for exercising the allocator.
///
/// All sizes are sampled up front from the seed, so a given seed produces the
/// same set of files no matter how the parallel writes get scheduled.
pub fn generate(directory: &Path, config: &JunkConfig) -> io::Result<()> {
	fs::create_dir_all(directory)?;

	let mut rng = StdRng::seed_from_u64(config.seed);
	let sizes: Vec<u64> = (0..config.count)
		.map(|_| rng.gen_range(config.min_size..=config.max_size))
		.collect();

	let total_size = sizes.iter().sum();
	let progress_display = ProgressDisplay::new(total_size);

	sizes.into_par_iter()
		.enumerate()
		.map(|(i, size)| -> Result<_, io::Error> {
			let i = i + 1;
			let name = format!("Rand Song Size # {i}{}", config.extension);
			let tracker = progress_display.new_tracker(name.clone(), size);

			write_junk_file(&directory.join(name), size, |written| tracker.advance(written))?;

			Ok(())
		})
		.collect::<Result<(), _>>()?;

	Ok(())
}

fn write_junk_file(path: &Path, size: u64, mut progress: impl FnMut(u64)) -> io::Result<()> {
	let mut file = File::create_new(path)?;
	let block = vec![FILL_BYTE; BLOCK_SIZE];

	let mut remaining = size;
	while remaining > 0 {
		let chunk = remaining.min(BLOCK_SIZE as u64) as usize;
		file.write_all(&block[..chunk])?;
		progress(chunk as u64);
		remaining -= chunk as u64;
	}

	Ok(())
}
