//! Bidirectional feature tracker.
//!
//! Starting from a seed pick, the tracker walks the spectrum one feature at a time.
//! From a peak or trough it first looks for the zero crossing that should follow,
//! then falls back through alternating extrema of increasing (forward) or decreasing
//! (backward) mode order until a candidate passes validation or the branch runs out.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::config::TrackerConfig;
use crate::error::{TrackError, TrackResult};
use crate::locator::{self, Crossing, Extremum};
use crate::pick::{Feature, Pick};
use crate::predictor::{Prediction, Predictor};
use crate::reference::ReferenceCurve;
use crate::signal::Signal;
use crate::window::Window;
use crate::zeros::ZeroTables;

/// Read-only inputs shared by every stage of a calibration run.
#[derive(Clone, Copy)]
pub struct TrackInputs<'a> {
	pub signal: &'a Signal,
	pub tables: &'a ZeroTables,
	pub reference: &'a ReferenceCurve,
	pub predictor: &'a dyn Predictor,
	/// Inter-station distance (km).
	pub distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	Forward,
	Backward,
}

impl Direction {
	/// Whether `candidate` lies strictly beyond `current` in this direction.
	fn is_beyond(self, current: f64, candidate: f64) -> bool {
		match self {
			Self::Forward => candidate > current,
			Self::Backward => candidate < current,
		}
	}
}

/// Outcome of one search attempt.
enum Attempt {
	Found(Pick),
	/// Candidate missing or rejected; the caller may fall through to the next feature.
	Missed,
	/// No further feature can exist in this direction.
	Exhausted,
}

pub struct Tracker<'a> {
	inputs: TrackInputs<'a>,
	config: &'a TrackerConfig,
	min_amplitude: f64,
}

impl<'a> Tracker<'a> {
	/// `seed_magnitude` is the amplitude reference extrema are thresholded against.
	pub fn new(inputs: TrackInputs<'a>, config: &'a TrackerConfig, seed_magnitude: f64) -> Self {
		Self { inputs, config, min_amplitude: seed_magnitude * config.amplitude_threshold }
	}

	/// Extends the seed backward to the frequency floor, then forward to the ceiling.
	pub fn track(&self, seed: Pick) -> TrackResult<Vec<Pick>> {
		let mut picks = VecDeque::from([seed]);

		while let Some(front) = picks.front().copied() {
			match self.step(Direction::Backward, &front)? {
				Some(pick) => picks.push_front(pick),
				None => break,
			}
		}

		while let Some(back) = picks.back().copied() {
			match self.step(Direction::Forward, &back)? {
				Some(pick) => picks.push_back(pick),
				None => break,
			}
		}

		debug!(
			picks = picks.len(),
			first = picks.front().map(|p| p.frequency),
			last = picks.back().map(|p| p.frequency),
			"Track complete"
		);

		Ok(picks.into())
	}

	/// Next accepted pick after `last` in `direction`, or `None` when the direction is finished.
	pub fn step(&self, direction: Direction, last: &Pick) -> TrackResult<Option<Pick>> {
		let (feature, order) = match last.feature {
			Feature::Peak | Feature::Trough => {
				match self.seek_crossing(direction, last) {
					Attempt::Found(pick) => return Ok(Some(pick)),
					Attempt::Exhausted => return Ok(None),
					Attempt::Missed => {},
				}

				let order = match direction {
					Direction::Forward => last.order + 1,
					Direction::Backward if last.order == 0 => return Ok(None),
					Direction::Backward => last.order - 1,
				};
				(last.feature.opposite(), order)
			},
			Feature::ZeroCross => match direction {
				Direction::Forward => (Feature::extremum_for_order(last.order), last.order),
				Direction::Backward if last.order == 0 => return Ok(None),
				Direction::Backward => (Feature::extremum_for_order(last.order - 1), last.order - 1),
			},
		};

		self.seek_extremum(direction, last, feature, order)
	}

	/// Looks for the zero crossing adjacent to a peak or trough.
	fn seek_crossing(&self, direction: Direction, last: &Pick) -> Attempt {
		let (zero_order, crossing) = match (direction, last.feature) {
			(Direction::Forward, Feature::Peak) => (last.order + 1, Crossing::Falling),
			(Direction::Forward, _) => (last.order + 1, Crossing::Rising),
			(Direction::Backward, Feature::Peak) => (last.order, Crossing::Rising),
			(Direction::Backward, _) => (last.order, Crossing::Falling),
		};

		let Some(zero) = self.inputs.tables.j0.get(zero_order) else {
			return Attempt::Exhausted;
		};

		let Some(estimate) = self.predict(last, zero) else {
			return Attempt::Exhausted;
		};

		if !direction.is_beyond(last.frequency, estimate.frequency) || !self.in_range(estimate.frequency) {
			trace!(order = zero_order, estimate = estimate.frequency, "Crossing estimate out of range");
			return Attempt::Exhausted;
		}

		let half_width = (estimate.frequency - last.frequency).abs() * self.config.window_half_width;
		let signal = self.inputs.signal;
		let Some(window) =
			Window::spanning(signal.frequency(), estimate.frequency - half_width, estimate.frequency + half_width)
		else {
			return Attempt::Missed;
		};

		let Some(index) = locator::find_zero_cross(signal, crossing, window) else {
			trace!(order = zero_order, ?crossing, "No zero crossing in window");
			return Attempt::Missed;
		};

		let frequency = locator::interpolate_crossing(signal, index);
		let Some(candidate) =
			Pick::on_table(Feature::ZeroCross, frequency, zero_order, self.inputs.distance, self.inputs.tables)
		else {
			return Attempt::Missed;
		};

		self.validate(direction, last, candidate)
	}

	/// Alternates between peaks and troughs, moving one mode order per attempt.
	fn seek_extremum(
		&self,
		direction: Direction,
		last: &Pick,
		mut feature: Feature,
		mut order: u32,
	) -> TrackResult<Option<Pick>> {
		loop {
			match self.try_extremum(direction, last, feature, order)? {
				Attempt::Found(pick) => return Ok(Some(pick)),
				Attempt::Exhausted => return Ok(None),
				Attempt::Missed => {},
			}

			feature = feature.opposite();
			order = match direction {
				Direction::Forward => order + 1,
				Direction::Backward if order == 0 => return Ok(None),
				Direction::Backward => order - 1,
			};
		}
	}

	fn try_extremum(&self, direction: Direction, last: &Pick, feature: Feature, order: u32) -> TrackResult<Attempt> {
		let tables = self.inputs.tables;

		// Window width comes from the crossing on the near side: below the extremum going
		// forward, above it going backward.
		let zero_order = match direction {
			Direction::Forward => order,
			Direction::Backward => order + 1,
		};

		let (Some(extremum_zero), Some(crossing_zero)) = (tables.j1.get(order), tables.j0.get(zero_order)) else {
			return Ok(Attempt::Exhausted);
		};

		let Some(extremum) = self.predict(last, extremum_zero) else {
			return Ok(Attempt::Exhausted);
		};

		if !self.in_range(extremum.frequency) {
			trace!(%feature, order, estimate = extremum.frequency, "Extremum estimate out of range");
			return Ok(Attempt::Exhausted);
		}

		let Some(crossing) = self.predict(last, crossing_zero) else {
			return Ok(Attempt::Exhausted);
		};

		let misordered = match direction {
			Direction::Forward => crossing.frequency > extremum.frequency,
			Direction::Backward => extremum.frequency > crossing.frequency,
		};
		if misordered {
			return Err(TrackError::PredictorOrdering {
				feature,
				order,
				frequency: last.frequency,
				velocity: last.velocity,
				extremum_frequency: extremum.frequency,
				zero_frequency: crossing.frequency,
			});
		}

		let half_width = (extremum.frequency - crossing.frequency).abs() * self.config.window_half_width;
		let signal = self.inputs.signal;
		let Some(window) =
			Window::spanning(signal.frequency(), extremum.frequency - half_width, extremum.frequency + half_width)
		else {
			return Ok(Attempt::Missed);
		};

		let located = match feature {
			Feature::Peak => locator::find_peak(signal, window)
				.filter(|&i| signal.amplitude_at(i) > self.min_amplitude)
				.map(|i| locator::walk_edge(signal, window, i, Extremum::Maximum)),
			_ => locator::find_trough(signal, window)
				.filter(|&i| signal.amplitude_at(i) < -self.min_amplitude)
				.map(|i| locator::walk_edge(signal, window, i, Extremum::Minimum)),
		};

		let Some(index) = located else {
			trace!(%feature, order, "No extremum above amplitude threshold");
			return Ok(Attempt::Missed);
		};

		let frequency = signal.frequency_at(index);
		if !self.in_range(frequency) {
			trace!(%feature, order, frequency, "Extremum out of range");
			return Ok(Attempt::Exhausted);
		}

		let Some(candidate) = Pick::on_table(feature, frequency, order, self.inputs.distance, tables) else {
			return Ok(Attempt::Exhausted);
		};

		Ok(self.validate(direction, last, candidate))
	}

	fn predict(&self, last: &Pick, zero: f64) -> Option<Prediction> {
		self.inputs.predictor.predict(last.frequency, last.velocity, zero, self.inputs.distance, self.inputs.reference)
	}

	fn in_range(&self, frequency: f64) -> bool {
		frequency >= self.config.freq_min && frequency <= self.config.freq_max
	}

	/// Ordering and gradient checks shared by every candidate.
	fn validate(&self, direction: Direction, last: &Pick, candidate: Pick) -> Attempt {
		if !direction.is_beyond(last.frequency, candidate.frequency) {
			trace!(feature = %candidate.feature, frequency = candidate.frequency, "Candidate does not advance");
			return Attempt::Missed;
		}

		match self.gradient_deviation(last, &candidate) {
			Some(deviation) if deviation <= self.config.max_gradient_deviation => Attempt::Found(candidate),
			deviation => {
				debug!(
					feature = %candidate.feature,
					order = candidate.order,
					frequency = candidate.frequency,
					velocity = candidate.velocity,
					?deviation,
					"Rejected candidate on velocity gradient"
				);
				Attempt::Missed
			},
		}
	}

	/// Relative deviation between observed and reference velocity change, `None` outside the reference.
	fn gradient_deviation(&self, last: &Pick, candidate: &Pick) -> Option<f64> {
		let reference = self.inputs.reference;
		let expected = reference.velocity(candidate.frequency)? - reference.velocity(last.frequency)?;
		let observed = candidate.velocity - last.velocity;

		Some((observed - expected).abs() / expected.abs().max(self.config.gradient_floor))
	}
}
