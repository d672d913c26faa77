use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dispersion::TrackerConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub input: InputConfig,
	pub output: OutputConfig,
	#[serde(default)]
	pub tracker: TrackerConfig,
	pub pairs: Vec<PairConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
	/// Two-column `frequency velocity` file.
	pub reference: PathBuf,
	/// Multiplier applied to reference velocities (e.g. 0.001 for m/s input).
	#[serde(default = "default_velocity_scale")]
	pub velocity_scale: f64,
	/// Optional precomputed zero tables; generated when absent.
	pub j0_zeros: Option<PathBuf>,
	pub j1_zeros: Option<PathBuf>,
	#[serde(default = "default_zero_count")]
	pub zero_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
	pub directory: PathBuf,
	#[serde(default)]
	pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
	#[default]
	Text,
	Json,
}

impl OutputFormat {
	pub const fn extension(self) -> &'static str {
		match self {
			Self::Text => "rayleigh",
			Self::Json => "json",
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairConfig {
	pub name: String,
	pub spectrum: PathBuf,
	/// Inter-station distance (km).
	pub distance: f64,
}

const fn default_velocity_scale() -> f64 {
	1.0
}

const fn default_zero_count() -> usize {
	512
}

impl Config {
	pub fn load(path: &str) -> Result<Self> {
		let content = fs::read_to_string(path).with_context(|| format!("Failed to read config file: {path}"))?;

		let config = Self::parse(&content)?;

		Ok(config)
	}

	pub fn parse(content: &str) -> Result<Self> {
		let config: Self = toml::from_str(content).with_context(|| "Failed to parse config file")?;

		config.validate()?;

		Ok(config)
	}

	fn validate(&self) -> Result<()> {
		self.tracker.validate().context("Invalid [tracker] section")?;

		if !(self.input.velocity_scale > 0.0) {
			anyhow::bail!("input.velocity_scale must be positive");
		}

		if self.input.j0_zeros.is_some() != self.input.j1_zeros.is_some() {
			anyhow::bail!("input.j0_zeros and input.j1_zeros must be given together");
		}

		if self.input.j0_zeros.is_none() && self.input.zero_count < 2 {
			anyhow::bail!("input.zero_count must be at least 2");
		}

		if self.pairs.is_empty() {
			anyhow::bail!("pairs must contain at least one station pair");
		}

		for pair in &self.pairs {
			if !(pair.distance > 0.0) {
				anyhow::bail!("pair {} distance must be positive", pair.name);
			}
		}

		Ok(())
	}
}
