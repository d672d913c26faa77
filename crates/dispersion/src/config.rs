use serde::Deserialize;

use crate::error::ConfigError;

/// Tunable thresholds of the tracker, seed selector and calibration loop.
///
/// Every field has a default, so a `[tracker]` table may override only what it needs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
	/// Minimum extremum magnitude, as a fraction of the seed magnitude.
	pub amplitude_threshold: f64,
	/// Maximum relative deviation between observed and reference velocity change.
	pub max_gradient_deviation: f64,
	/// Lower bound on the reference velocity change used as the gradient denominator.
	pub gradient_floor: f64,
	/// Search half-width as a fraction of the predicted feature spacing.
	pub window_half_width: f64,
	/// Trusted band the seed extremum is drawn from (Hz).
	pub seed_band: [f64; 2],
	/// Frequency floor for backward tracking (Hz).
	pub freq_min: f64,
	/// Frequency ceiling for forward tracking (Hz).
	pub freq_max: f64,
	/// First-trough amplitude threshold, as a fraction of the peak signal magnitude.
	pub trough_threshold: f64,
	/// Relaxed threshold used when the first trough is found too high in frequency.
	pub relaxed_trough_threshold: f64,
	/// Frequency above which the relaxed trough threshold kicks in (Hz).
	pub relaxed_trough_frequency: f64,
	/// Band over which the consistency score compares the track to the reference (Hz).
	pub score_band: [f64; 2],
	pub score_samples: usize,
	pub score_degree: usize,
}

impl Default for TrackerConfig {
	fn default() -> Self {
		Self {
			amplitude_threshold: 0.075,
			max_gradient_deviation: 5.0,
			gradient_floor: 0.02,
			window_half_width: 0.5,
			seed_band: [0.075, 0.2],
			freq_min: 1.0 / 40.0,
			freq_max: 0.35,
			trough_threshold: 0.25,
			relaxed_trough_threshold: 0.10,
			relaxed_trough_frequency: 0.10,
			score_band: [0.05, 0.075],
			score_samples: 32,
			score_degree: 6,
		}
	}
}

impl TrackerConfig {
	pub fn validate(&self) -> Result<(), ConfigError> {
		check_fraction("amplitude_threshold", self.amplitude_threshold)?;
		check_fraction("trough_threshold", self.trough_threshold)?;
		check_fraction("relaxed_trough_threshold", self.relaxed_trough_threshold)?;

		if !(self.max_gradient_deviation > 0.0) {
			return Err(ConfigError::Zero { name: "max_gradient_deviation" });
		}

		if !(self.gradient_floor > 0.0) {
			return Err(ConfigError::Zero { name: "gradient_floor" });
		}

		if !(self.window_half_width > 0.0) {
			return Err(ConfigError::Zero { name: "window_half_width" });
		}

		check_band("seed_band", self.seed_band)?;
		check_band("score_band", self.score_band)?;
		check_band("freq_min/freq_max", [self.freq_min, self.freq_max])?;

		if self.score_samples == 0 {
			return Err(ConfigError::Zero { name: "score_samples" });
		}

		Ok(())
	}
}

fn check_fraction(name: &'static str, value: f64) -> Result<(), ConfigError> {
	if value > 0.0 && value <= 1.0 {
		Ok(())
	} else {
		Err(ConfigError::OutOfRange { name, value, low: 0.0, high: 1.0 })
	}
}

fn check_band(name: &'static str, [low, high]: [f64; 2]) -> Result<(), ConfigError> {
	if low.is_finite() && high.is_finite() && low >= 0.0 && low < high {
		Ok(())
	} else {
		Err(ConfigError::InvertedBand { name, low, high })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_config_is_valid() {
		assert!(TrackerConfig::default().validate().is_ok());
	}

	#[test]
	fn test_partial_toml_keeps_defaults() {
		let config: TrackerConfig = toml::from_str("amplitude_threshold = 0.05\nfreq_max = 0.3\n").unwrap();

		assert_eq!(config.amplitude_threshold, 0.05);
		assert_eq!(config.freq_max, 0.3);
		assert_eq!(config.max_gradient_deviation, 5.0);
		assert_eq!(config.seed_band, [0.075, 0.2]);
	}

	#[test]
	fn test_rejects_inverted_band() {
		let config = TrackerConfig { seed_band: [0.2, 0.1], ..TrackerConfig::default() };

		assert!(matches!(config.validate(), Err(ConfigError::InvertedBand { name: "seed_band", .. })));
	}

	#[test]
	fn test_rejects_threshold_above_one() {
		let config = TrackerConfig { amplitude_threshold: 1.5, ..TrackerConfig::default() };

		assert!(matches!(config.validate(), Err(ConfigError::OutOfRange { name: "amplitude_threshold", .. })));
	}
}
