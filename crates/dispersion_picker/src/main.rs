mod config;
mod io;

use std::fs;

use anyhow::{Context, Result};
use config::{Config, PairConfig};
use dispersion::{AnchoredReferencePredictor, ReferenceCurve, Resolution, TrackInputs, ZeroTables};
use rayon::prelude::*;
use tracing::{error, info, warn};

#[derive(Debug)]
struct PairSummary {
	picks: usize,
	offset: i32,
	resolution: Resolution,
}

fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
		)
		.init();

	info!("🚀 Starting dispersion picker");

	let config = Config::load("config.toml").context("Failed to load configuration")?;
	info!("✅ Configuration loaded");

	let tables = load_tables(&config)?;
	info!(max_order = tables.max_order(), "✅ Zero tables ready");

	let reference = io::read_reference(&config.input.reference, config.input.velocity_scale)
		.context("Failed to load reference curve")?;
	let (lo, hi) = reference.domain();
	info!(lo, hi, "✅ Reference curve loaded");

	fs::create_dir_all(&config.output.directory)
		.with_context(|| format!("Failed to create {}", config.output.directory.display()))?;

	let predictor = AnchoredReferencePredictor::default();

	let results: Vec<(&PairConfig, Result<PairSummary>)> = config
		.pairs
		.par_iter()
		.map(|pair| (pair, process_pair(&config, pair, &tables, &reference, &predictor)))
		.collect();

	let mut failed = 0;
	for (pair, result) in &results {
		match result {
			Ok(summary) => info!(
				pair = %pair.name,
				picks = summary.picks,
				offset = summary.offset,
				resolution = ?summary.resolution,
				"✅ Pair processed"
			),
			Err(e) => {
				failed += 1;
				error!(pair = %pair.name, "Failed to process pair: {e:#}");
			},
		}
	}

	if failed == results.len() {
		anyhow::bail!("No station pair could be processed");
	}

	info!(processed = results.len() - failed, failed, "Done");

	Ok(())
}

fn load_tables(config: &Config) -> Result<ZeroTables> {
	match (&config.input.j0_zeros, &config.input.j1_zeros) {
		(Some(j0), Some(j1)) => Ok(ZeroTables::new(io::read_zero_table(j0)?, io::read_zero_table(j1)?)),
		_ => ZeroTables::bessel(config.input.zero_count).context("Failed to generate Bessel zero tables"),
	}
}

fn process_pair(
	config: &Config,
	pair: &PairConfig,
	tables: &ZeroTables,
	reference: &ReferenceCurve,
	predictor: &AnchoredReferencePredictor,
) -> Result<PairSummary> {
	let signal = io::read_spectrum(&pair.spectrum)?;

	let inputs = TrackInputs { signal: &signal, tables, reference, predictor, distance: pair.distance };
	let outcome =
		dispersion::calibrate(&inputs, &config.tracker).with_context(|| format!("Calibration failed for {}", pair.name))?;

	if outcome.resolution != Resolution::Accepted {
		warn!(
			pair = %pair.name,
			offset = outcome.attempt.offset,
			score = outcome.attempt.score,
			tried = outcome.scores.len(),
			"Mode order did not converge, using best attempt"
		);
	}

	let picks = dispersion::annotate(&outcome.attempt.picks, pair.distance, tables);

	let format = config.output.format;
	let path = config.output.directory.join(format!("{}.{}", pair.name, format.extension()));
	io::write_picks(&path, &picks, format)?;

	Ok(PairSummary { picks: picks.len(), offset: outcome.attempt.offset, resolution: outcome.resolution })
}
