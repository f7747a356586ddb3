use std::{fs::File, io::{self, BufWriter, Write}, path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rand::{SeedableRng, rngs::StdRng};

use volsplit::{AllocationManager, Assignment, ExtensionFilter, FileGroup, junk::{self, JunkConfig}, report, source};

fn parse_size(arg: &str) -> Result<u64, parse_size::Error> {
	parse_size::Config::new()
		.with_binary()
		.parse_size(arg)
}

#[derive(Parser, Debug)]
#[command(version, propagate_version = true, author, about)]
struct VolsplitArgs {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Clone, Debug)]
enum Commands {
	Collect(CollectArgs),
	List(ListArgs),
	Junk(JunkArgs),
}

/// Distribute files across fixed-size collections
#[derive(Args, Clone, Debug)]
struct CollectArgs {
	/// Number of collections to fill
	collections: usize,
	/// Maximum total size per collection, in bytes if no unit is given
	#[arg(value_parser = parse_size)]
	size: u64,
	/// Text file listing one path per line, or a directory to scan recursively
	source: PathBuf,
	/// Only include files with these extensions when scanning a directory (e.g. .mp3)
	#[arg(short, long = "ext")]
	extensions: Vec<String>,
	/// Seed for the assignment shuffle, for reproducible runs
	#[arg(long)]
	seed: Option<u64>,
	/// Also write the report to this file
	#[arg(short, long)]
	out: Option<PathBuf>,
}

/// List files under a directory into a newline-delimited text file
#[derive(Args, Clone, Debug)]
struct ListArgs {
	/// Directory to scan recursively
	source: PathBuf,
	/// File to write the list to
	target: PathBuf,
	/// Extensions to include (e.g. .mp3 .flac); matches everything when omitted
	extensions: Vec<String>,
}

/// Generate junk files for trying out the allocator
#[derive(Args, Clone, Debug)]
struct JunkArgs {
	/// Directory to create the files in
	directory: PathBuf,
	/// How many files to generate
	#[arg(short, long, default_value_t = 50)]
	count: usize,
	/// Smallest file size, in bytes if no unit is given
	#[arg(long, value_parser = parse_size, default_value = "512KiB")]
	min_size: u64,
	/// Largest file size, in bytes if no unit is given
	#[arg(long, value_parser = parse_size, default_value = "5MiB")]
	max_size: u64,
	/// Extension for the generated file names
	#[arg(long, default_value = ".mp3")]
	ext: String,
	/// Seed for the size sampling, for reproducible fixtures
	#[arg(long)]
	seed: Option<u64>,
}

fn main() -> ExitCode {
	env_logger::init();

	let args = VolsplitArgs::parse();

	let result = match args.command {
		Commands::Collect(collect_args) => collect(collect_args),
		Commands::List(list_args) => list(list_args),
		Commands::Junk(junk_args) => generate_junk(junk_args),
	};

	if let Err(error) = result {
		eprintln!("error: {error:#}");
		return ExitCode::FAILURE;
	}

	ExitCode::SUCCESS
}

fn collect(args: CollectArgs) -> anyhow::Result<()> {
	println!("Now building collection:");
	println!("**************************");
	println!("# Collections:       {}", args.collections);
	println!("Size per Collection: {}", args.size);
	println!("Source:              {}", args.source.display());
	println!();

	let filter = ExtensionFilter::new(args.extensions);
	let mut entries = if args.source.is_dir() {
		source::scan_directory(&args.source, &filter)
	} else {
		source::from_list_file(&args.source)?
	};

	// Largest first packs tighter.
	entries.sort_by(|left, right| right.size.cmp(&left.size));

	let mut rng = match args.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_entropy(),
	};

	let mut manager = AllocationManager::new(args.collections, args.size);
	let mut extras = FileGroup::new();

	for entry in entries {
		if let Assignment::NoRoom(entry) = manager.assign(entry, &mut rng) {
			extras.push(entry);
		}
	}

	manager.sort_groups_by_size();
	extras.sort_descending_by_size();

	report::write_report(io::stdout().lock(), &manager, &extras)?;

	if let Some(out) = &args.out {
		let file = File::create(out)
			.with_context(|| format!("cannot write report to {}", out.display()))?;
		report::write_report(BufWriter::new(file), &manager, &extras)?;
	}

	Ok(())
}

fn list(args: ListArgs) -> anyhow::Result<()> {
	println!("Statistics on Files Found:");
	println!("**************************");
	println!("Source Path:   {}", args.source.display());
	println!("Target Path:   {}", args.target.display());
	println!("Extensions:    {}", args.extensions.join(" "));

	let filter = ExtensionFilter::new(args.extensions);
	let entries = source::scan_directory(&args.source, &filter);
	let total_size: u64 = entries.iter().map(|entry| entry.size).sum();

	println!("Files Found:   {}", entries.len());
	println!("Total size:    {}", report::format_size(total_size));
	println!();
	println!("Files:");
	println!("*****************");
	for entry in &entries {
		println!("{}", entry.path.display());
	}
	println!();

	println!("Writing file list to output file: {}", args.target.display());
	let file = File::create(&args.target)
		.with_context(|| format!("cannot write file list to {}", args.target.display()))?;
	let mut out = BufWriter::new(file);
	for entry in &entries {
		writeln!(out, "{}", entry.path.display())?;
	}
	out.flush()?;

	Ok(())
}

fn generate_junk(args: JunkArgs) -> anyhow::Result<()> {
	anyhow::ensure!(args.min_size <= args.max_size, "--min-size must not exceed --max-size");

	let config = JunkConfig {
		count: args.count,
		min_size: args.min_size,
		max_size: args.max_size,
		extension: args.ext,
		seed: args.seed.unwrap_or_else(rand::random),
	};

	junk::generate(&args.directory, &config)
		.with_context(|| format!("cannot generate junk files in {}", args.directory.display()))
}
