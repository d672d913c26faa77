use thiserror::Error;

use crate::pick::Feature;

pub type TrackResult<T> = Result<T, TrackError>;

/// Failures that abort a tracking run.
///
/// Feature rejections never surface here; they are handled inside the tracker by
/// falling through to the next feature type or finishing the direction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
	/// The predictor placed the zero crossing on the wrong side of the extremum it brackets.
	#[error(
		"predictor ordering violated for {feature} at order {order}: zero crossing at {zero_frequency:.9} \
		 vs extremum at {extremum_frequency:.9} (from {frequency:.9} Hz, {velocity:.9} km/s)"
	)]
	PredictorOrdering {
		feature: Feature,
		order: u32,
		frequency: f64,
		velocity: f64,
		extremum_frequency: f64,
		zero_frequency: f64,
	},

	/// No usable extremum inside the trusted seed band.
	#[error("no seed extremum in band [{low:.4}, {high:.4}] Hz")]
	NoSeed { low: f64, high: f64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
	#[error("frequency and amplitude lengths differ ({frequency} vs {amplitude})")]
	LengthMismatch { frequency: usize, amplitude: usize },

	#[error("signal needs at least two samples, got {0}")]
	TooShort(usize),

	#[error("frequency must be strictly increasing (index {0})")]
	NotIncreasing(usize),

	#[error("non-finite sample at index {0}")]
	NonFinite(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZeroTableError {
	#[error("zero table is empty")]
	Empty,

	#[error("zero table must be strictly increasing and positive (index {0})")]
	NotIncreasing(usize),

	#[error("unsupported Bessel order {0}, only 0 and 1 are tabulated")]
	UnsupportedOrder(u32),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
	#[error("reference curve needs at least two points, got {0}")]
	TooShort(usize),

	#[error("frequency and velocity lengths differ ({frequency} vs {velocity})")]
	LengthMismatch { frequency: usize, velocity: usize },

	#[error("reference frequencies must be strictly increasing (index {0})")]
	NotIncreasing(usize),

	#[error("reference velocity must be positive and finite (index {0})")]
	InvalidVelocity(usize),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
	#[error("{name} must lie in ({low}, {high}], got {value}")]
	OutOfRange { name: &'static str, value: f64, low: f64, high: f64 },

	#[error("{name} must be an increasing pair, got [{low}, {high}]")]
	InvertedBand { name: &'static str, low: f64, high: f64 },

	#[error("{name} must be greater than 0")]
	Zero { name: &'static str },
}
