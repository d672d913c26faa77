//! Windowed search primitives over a [`Signal`].
//!
//! All searches are read-only and return `None` for "not found"; a crossing in the
//! wrong direction is an ordinary miss, never an error.

use crate::signal::Signal;
use crate::window::Window;

/// Direction in which the amplitude passes through zero, in increasing-index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
	/// Negative to positive.
	Rising,
	/// Positive to negative.
	Falling,
}

impl Crossing {
	fn matches(self, left: f64, right: f64) -> bool {
		match self {
			Self::Rising => left < 0.0 && right > 0.0,
			Self::Falling => left > 0.0 && right < 0.0,
		}
	}
}

/// Index of the maximum amplitude in the window (first occurrence on ties).
pub fn find_peak(signal: &Signal, window: Window) -> Option<usize> {
	let amplitude = signal.amplitude();
	window.indices().reduce(|best, i| if amplitude[i] > amplitude[best] { i } else { best })
}

/// Index of the minimum amplitude in the window (first occurrence on ties).
pub fn find_trough(signal: &Signal, window: Window) -> Option<usize> {
	let amplitude = signal.amplitude();
	window.indices().reduce(|best, i| if amplitude[i] < amplitude[best] { i } else { best })
}

/// Index `i` where `amplitude[i]` and `amplitude[i + 1]` straddle zero in `direction`.
///
/// With several qualifying crossings the one closest to the window midpoint wins.
pub fn find_zero_cross(signal: &Signal, direction: Crossing, window: Window) -> Option<usize> {
	let amplitude = signal.amplitude();
	let midpoint = window.midpoint();

	(window.lo()..window.hi())
		.filter(|&i| direction.matches(amplitude[i], amplitude[i + 1]))
		.min_by_key(|&i| i.abs_diff(midpoint))
}

/// Frequency of the zero crossing between samples `index` and `index + 1`, linearly interpolated.
pub fn interpolate_crossing(signal: &Signal, index: usize) -> f64 {
	let (a0, a1) = (signal.amplitude_at(index), signal.amplitude_at(index + 1));
	let (f0, f1) = (signal.frequency_at(index), signal.frequency_at(index + 1));

	let t = -a0 / (a1 - a0);
	(f1 - f0).mul_add(t, f0)
}

/// Extremum kind used by [`walk_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
	Maximum,
	Minimum,
}

/// Follows the signal outward from a window edge while it keeps climbing (maximum) or
/// falling (minimum). Interior indices are returned unchanged.
pub fn walk_edge(signal: &Signal, window: Window, index: usize, extremum: Extremum) -> usize {
	let amplitude = signal.amplitude();
	let improves = |next: usize, current: usize| match extremum {
		Extremum::Maximum => amplitude[next] > amplitude[current],
		Extremum::Minimum => amplitude[next] < amplitude[current],
	};

	let mut current = index;
	if index == window.lo() {
		while current > 0 && improves(current - 1, current) {
			current -= 1;
		}
	} else if index == window.hi() {
		while current + 1 < signal.len() && improves(current + 1, current) {
			current += 1;
		}
	}

	current
}
