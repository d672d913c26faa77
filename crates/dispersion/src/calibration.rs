//! Mode-order calibration.
//!
//! A track seeded at the wrong mode order is self-consistent but offset by a whole
//! number of orders. The first clear trough of the track is compared against where the
//! reference curve puts the same trough; the mismatch is applied to the seed offset and
//! the track is rebuilt until the mismatch vanishes or an offset repeats.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use tracing::{debug, info, warn};

use crate::config::TrackerConfig;
use crate::error::{TrackError, TrackResult};
use crate::fit::polyfit;
use crate::pick::{Feature, Pick};
use crate::reference::ReferenceCurve;
use crate::seed::{Seed, select_seed};
use crate::signal::Signal;
use crate::tracker::{TrackInputs, Tracker};

/// One complete track built from a given seed offset.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackAttempt {
	pub offset: i32,
	pub seed: Seed,
	pub picks: Vec<Pick>,
	/// Order correction suggested by the first trough (0 means consistent).
	pub first_trough_delta: i32,
	/// Distance from the reference over the score band; lower is better.
	pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
	/// The attempt reported no order correction.
	Accepted,
	/// The suggested offset had already been tried.
	CycleFallback,
	/// The suggested offset could not be seeded.
	ReseedFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationOutcome {
	pub attempt: TrackAttempt,
	pub resolution: Resolution,
	/// Consistency score of every offset tried.
	pub scores: BTreeMap<i32, f64>,
}

/// Builds a track, corrects its mode order and returns the accepted (or best) attempt.
pub fn calibrate(inputs: &TrackInputs<'_>, config: &TrackerConfig) -> TrackResult<CalibrationOutcome> {
	let outcome = resolve_offset(|offset| {
		let Some(seed) = select_seed(inputs, config, offset) else {
			return Ok(None);
		};

		let picks = Tracker::new(*inputs, config, seed.magnitude).track(seed.pick)?;
		let first_trough_delta = first_trough_offset(&picks, inputs, config);
		let score = consistency_score(&picks, inputs.reference, config);

		info!(offset, picks = picks.len(), delta = first_trough_delta, score, "Track attempt");

		Ok(Some(TrackAttempt { offset, seed, picks, first_trough_delta, score }))
	})?;

	let [low, high] = config.seed_band;
	outcome.ok_or(TrackError::NoSeed { low, high })
}

/// Drives the offset search. `run` builds the attempt for an offset, or `None` when that
/// offset cannot be seeded. Returns `None` only if offset 0 cannot be seeded.
pub fn resolve_offset<F>(mut run: F) -> TrackResult<Option<CalibrationOutcome>>
where
	F: FnMut(i32) -> TrackResult<Option<TrackAttempt>>,
{
	let mut attempts: BTreeMap<i32, TrackAttempt> = BTreeMap::new();
	let mut offset = 0;

	loop {
		let Some(attempt) = run(offset)? else {
			if attempts.is_empty() {
				return Ok(None);
			}

			warn!(offset, "Suggested offset cannot be seeded, falling back to best attempt");
			return Ok(best_attempt(attempts, Resolution::ReseedFallback));
		};

		let delta = attempt.first_trough_delta;
		if delta == 0 {
			let mut scores = scores(&attempts);
			scores.insert(offset, attempt.score);

			info!(offset, tried = scores.len(), "Mode order accepted");
			return Ok(Some(CalibrationOutcome { attempt, resolution: Resolution::Accepted, scores }));
		}

		attempts.insert(offset, attempt);
		offset += delta;
		if attempts.contains_key(&offset) {
			warn!(offset, tried = attempts.len(), "Offset cycle detected, falling back to best attempt");
			return Ok(best_attempt(attempts, Resolution::CycleFallback));
		}
	}
}

fn scores(attempts: &BTreeMap<i32, TrackAttempt>) -> BTreeMap<i32, f64> {
	attempts.iter().map(|(&offset, attempt)| (offset, attempt.score)).collect()
}

/// Lowest score wins; ties go to the lowest offset.
fn best_attempt(mut attempts: BTreeMap<i32, TrackAttempt>, resolution: Resolution) -> Option<CalibrationOutcome> {
	let scores = scores(&attempts);
	let offset = scores.iter().min_by(|a, b| a.1.total_cmp(b.1)).map(|(&offset, _)| offset)?;
	let attempt = attempts.remove(&offset)?;

	debug!(offset, score = attempt.score, ?resolution, "Fallback attempt chosen");
	Some(CalibrationOutcome { attempt, resolution, scores })
}

/// Order correction implied by the first clear trough of a track.
pub fn first_trough_offset(picks: &[Pick], inputs: &TrackInputs<'_>, config: &TrackerConfig) -> i32 {
	let signal = inputs.signal;
	let max = signal.max_magnitude();

	let strict = first_trough(picks, signal, config.trough_threshold * max);
	let trough = match strict {
		Some(trough) if trough.frequency <= config.relaxed_trough_frequency => Some(trough),
		_ => first_trough(picks, signal, config.relaxed_trough_threshold * max)
			.or(strict)
			.or_else(|| picks.iter().find(|p| p.feature == Feature::Trough)),
	};

	let Some(trough) = trough else {
		return 0;
	};

	let j1 = &inputs.tables.j1;
	let distance_at = |order: i64| -> Option<f64> {
		let zero = j1.get(u32::try_from(order).ok()?)?;
		Some((trough.frequency - reference_trough(signal, inputs.reference, inputs.distance, zero)?).abs())
	};

	let Some(f_ref) = j1.get(trough.order).and_then(|zero| reference_trough(signal, inputs.reference, inputs.distance, zero))
	else {
		return 0;
	};

	let start = i64::from(trough.order);
	let step = if trough.frequency > f_ref { 2 } else { -2 };
	let mut best = (trough.frequency - f_ref).abs();

	let mut order = start;
	while let Some(distance) = distance_at(order + step) {
		if distance >= best {
			break;
		}
		best = distance;
		order += step;
	}

	debug!(frequency = trough.frequency, order = trough.order, corrected = order, "First trough");

	(order - start) as i32
}

fn first_trough<'p>(picks: &'p [Pick], signal: &Signal, threshold: f64) -> Option<&'p Pick> {
	picks
		.iter()
		.filter(|p| p.feature == Feature::Trough)
		.find(|p| signal.amplitude_at(signal.nearest_index(p.frequency)) < -threshold)
}

/// Signal frequency at which the reference curve places the extremum of kernel zero `zero`.
pub fn reference_trough(signal: &Signal, reference: &ReferenceCurve, distance: f64, zero: f64) -> Option<f64> {
	signal
		.frequency()
		.iter()
		.filter_map(|&f| reference.velocity(f).map(|v| (f, (f - v * zero / (2.0 * PI * distance)).abs())))
		.min_by(|a, b| a.1.total_cmp(&b.1))
		.map(|(f, _)| f)
}

/// RMS-style distance between a polynomial fit of the track and the reference over the score band.
///
/// `f64::INFINITY` when the track does not span the band, is too short to fit, or the fit fails.
pub fn consistency_score(picks: &[Pick], reference: &ReferenceCurve, config: &TrackerConfig) -> f64 {
	let [low, high] = config.score_band;

	let spans = picks.first().is_some_and(|p| p.frequency <= low) && picks.last().is_some_and(|p| p.frequency >= high);
	if !spans {
		return f64::INFINITY;
	}

	let x: Vec<f64> = picks.iter().map(|p| p.frequency).collect();
	let y: Vec<f64> = picks.iter().map(|p| p.velocity).collect();
	let Some(poly) = polyfit(&x, &y, config.score_degree) else {
		return f64::INFINITY;
	};

	let samples = config.score_samples.max(1);
	let step = if samples > 1 { (high - low) / (samples - 1) as f64 } else { 0.0 };

	let mut sum = 0.0;
	for k in 0..samples {
		let f = (k as f64).mul_add(step, low);
		let Some(expected) = reference.velocity(f) else {
			return f64::INFINITY;
		};
		sum += (poly.eval(f) - expected).powi(2);
	}

	sum.sqrt()
}
