use tracing::debug;

use crate::config::TrackerConfig;
use crate::pick::{Feature, Pick, phase_velocity};
use crate::tracker::TrackInputs;

/// Starting pick of a track and the amplitude it was selected with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seed {
	pub pick: Pick,
	pub magnitude: f64,
}

/// Picks the strongest extremum in the trusted band and assigns its mode order.
///
/// The order is the one (of matching parity) whose implied velocity is closest to the
/// reference, shifted by `offset`. A band holding a single sample is enough. Returns
/// `None` when the band holds no samples, the
/// extremum lies outside the reference curve, or the shifted order leaves the table.
pub fn select_seed(inputs: &TrackInputs<'_>, config: &TrackerConfig, offset: i32) -> Option<Seed> {
	let signal = inputs.signal;
	let [band_lo, band_hi] = config.seed_band;

	let frequency = signal.frequency();
	let amplitude = signal.amplitude();
	let band = frequency.partition_point(|&f| f < band_lo)..frequency.partition_point(|&f| f <= band_hi);

	let peak = band.clone().reduce(|best, i| if amplitude[i] > amplitude[best] { i } else { best })?;
	let trough = band.reduce(|best, i| if amplitude[i] < amplitude[best] { i } else { best })?;

	let (feature, index) = if -signal.amplitude_at(trough) > signal.amplitude_at(peak) {
		(Feature::Trough, trough)
	} else {
		(Feature::Peak, peak)
	};

	let magnitude = signal.amplitude_at(index).abs();
	if magnitude <= 0.0 {
		return None;
	}

	let frequency = signal.frequency_at(index);
	let reference_velocity = inputs.reference.velocity(frequency)?;

	let first = match feature {
		Feature::Peak => 1,
		_ => 0,
	};
	let nearest = inputs
		.tables
		.j1
		.as_slice()
		.iter()
		.enumerate()
		.skip(first)
		.step_by(2)
		.map(|(order, &zero)| (order, (phase_velocity(frequency, inputs.distance, zero) - reference_velocity).abs()))
		.min_by(|a, b| a.1.total_cmp(&b.1))?
		.0;

	let order = u32::try_from(nearest as i64 + i64::from(offset)).ok()?;
	let pick = Pick::on_table(feature, frequency, order, inputs.distance, inputs.tables)?;

	debug!(%feature, frequency, order, nearest, offset, velocity = pick.velocity, "Seed selected");

	Some(Seed { pick, magnitude })
}
