use anyhow::{bail, Context, Result};
use clap::Parser;
use csv_vcard::logging::{init_logging, LogConfig};
use csv_vcard::{DirectoryTarget, FileTarget, Pipeline, Summary, Target};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Convert a CSV export of contacts into vCard 3.0 files
#[derive(Parser)]
#[command(name = "csv-vcard", version, about)]
struct Cli {
	/// CSV (or .tsv) file to convert
	#[arg(value_name = "INPUT")]
	input: PathBuf,

	/// Output file, or output directory with --split.
	/// Defaults to <INPUT stem>.vcf, or <INPUT stem>_vcards/ with --split
	#[arg(short, long, value_name = "PATH")]
	output: Option<PathBuf>,

	/// Write one .vcf file per contact
	#[arg(long)]
	split: bool,

	/// More logging (-v for debug, -vv for trace)
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,

	/// Only log errors
	#[arg(short, long, conflicts_with = "verbose")]
	quiet: bool,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	let mut log_config = LogConfig::from_verbosity(cli.verbose, cli.quiet);
	log_config.ignore_env = cli.verbose > 0 || cli.quiet;
	log_config.with_ansi = io::stderr().is_terminal();
	if let Err(error) = init_logging(&log_config) {
		eprintln!("error: failed to initialize logging: {error}");
		return ExitCode::FAILURE;
	}

	match run(&cli) {
		Ok(summary) if summary.has_failures() => ExitCode::from(2),
		Ok(_) => ExitCode::SUCCESS,
		Err(error) => {
			tracing::error!("{:#}", error);
			ExitCode::FAILURE
		}
	}
}

fn run(cli: &Cli) -> Result<Summary> {
	if !cli.input.is_file() {
		bail!("Input file {} does not exist", cli.input.display());
	}
	let output = match &cli.output {
		Some(output) => output.clone(),
		None => default_output(&cli.input, cli.split),
	};
	let target: Box<dyn Target> = match cli.split {
		true => Box::new(DirectoryTarget::new(&output)),
		false => Box::new(FileTarget::new(&output)),
	};
	tracing::info!(input = %cli.input.display(), output = %output.display(), split = cli.split, "Starting");

	let summary = Pipeline::from_path(&cli.input)
		.with_context(|| format!("Failed to read {}", cli.input.display()))?
		.flush(target)
		.run()
		.with_context(|| format!("Failed to write {}", output.display()))?;

	for failure in &summary.failures {
		eprintln!("row {}: {}", failure.row, failure.error);
	}
	eprintln!(
		"Converted {} contact(s) to {}{}",
		summary.converted,
		output.display(),
		match summary.failures.len() {
			0 => String::new(),
			n => format!(", {} failed", n),
		}
	);
	Ok(summary)
}

fn default_output(input: &Path, split: bool) -> PathBuf {
	let stem = input
		.file_stem()
		.map(|stem| stem.to_string_lossy().into_owned())
		.unwrap_or_else(|| "contacts".to_string());
	let name = match split {
		true => format!("{}_vcards", stem),
		false => format!("{}.vcf", stem),
	};
	input.with_file_name(name)
}

#[test]
fn default_output_paths() {
	let input = Path::new("exports/people.csv");
	assert_eq!(default_output(input, false), Path::new("exports/people.vcf"));
	assert_eq!(default_output(input, true), Path::new("exports/people_vcards"));
}

#[test]
fn cli_parses() {
	let cli = Cli::parse_from(["csv-vcard", "in.csv", "--split", "-vv"]);
	assert!(cli.split);
	assert_eq!(cli.verbose, 2);
	assert_eq!(cli.output, None);
}
