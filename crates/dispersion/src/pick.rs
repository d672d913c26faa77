use std::f64::consts::PI;
use std::fmt;

use serde::Serialize;

use crate::zeros::ZeroTables;

/// Kind of spectral feature a pick sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
	Peak,
	ZeroCross,
	Trough,
}

impl Feature {
	pub const fn sign(self) -> i8 {
		match self {
			Self::Peak => 1,
			Self::ZeroCross => 0,
			Self::Trough => -1,
		}
	}

	/// Extremum expected at a given order-1 index: odd orders are peaks, even orders troughs.
	pub const fn extremum_for_order(order: u32) -> Self {
		if order % 2 == 1 { Self::Peak } else { Self::Trough }
	}

	/// The extremum of opposite sign. Zero crossings map onto themselves.
	pub const fn opposite(self) -> Self {
		match self {
			Self::Peak => Self::Trough,
			Self::Trough => Self::Peak,
			Self::ZeroCross => Self::ZeroCross,
		}
	}
}

impl fmt::Display for Feature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Peak => write!(f, "peak"),
			Self::ZeroCross => write!(f, "zero crossing"),
			Self::Trough => write!(f, "trough"),
		}
	}
}

/// Apparent phase velocity implied by a kernel zero at `frequency`.
pub fn phase_velocity(frequency: f64, distance: f64, zero: f64) -> f64 {
	2.0 * PI * frequency * distance / zero
}

/// One accepted sample of the dispersion curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pick {
	pub feature: Feature,
	pub frequency: f64,
	pub velocity: f64,
	pub order: u32,
}

impl Pick {
	/// Builds a pick whose velocity follows from the zero table matching `feature`.
	pub fn on_table(feature: Feature, frequency: f64, order: u32, distance: f64, tables: &ZeroTables) -> Option<Self> {
		let zero = match feature {
			Feature::ZeroCross => tables.j0.get(order)?,
			Feature::Peak | Feature::Trough => tables.j1.get(order)?,
		};

		Some(Self { feature, frequency, velocity: phase_velocity(frequency, distance, zero), order })
	}

	pub const fn sign(&self) -> i8 {
		self.feature.sign()
	}
}

/// A pick together with its uncertainty estimate, ready for output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnnotatedPick {
	#[serde(flatten)]
	pub pick: Pick,
	pub error: f64,
}

impl fmt::Display for AnnotatedPick {
	/// `frequency velocity sign order error` in the fixed-width layout of the downstream tooling.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{:15.9} {:15.9} {} {:4} {:15.9}",
			self.pick.frequency,
			self.pick.velocity,
			self.pick.sign(),
			self.pick.order,
			self.error
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_extremum_parity() {
		assert_eq!(Feature::extremum_for_order(0), Feature::Trough);
		assert_eq!(Feature::extremum_for_order(1), Feature::Peak);
		assert_eq!(Feature::extremum_for_order(6), Feature::Trough);
		assert_eq!(Feature::Peak.opposite(), Feature::Trough);
	}

	#[test]
	fn test_phase_velocity() {
		let v = phase_velocity(0.1, 100.0, 2.0 * PI * 0.1 * 100.0 / 3.0);
		assert!((v - 3.0).abs() < 1e-12);
	}

	#[test]
	fn test_pick_on_table_uses_matching_kernel() {
		let tables = ZeroTables::bessel(8).unwrap();

		let zero = Pick::on_table(Feature::ZeroCross, 0.1, 2, 100.0, &tables).unwrap();
		let trough = Pick::on_table(Feature::Trough, 0.1, 2, 100.0, &tables).unwrap();

		assert!((zero.velocity - phase_velocity(0.1, 100.0, tables.j0.as_slice()[2])).abs() < 1e-12);
		assert!((trough.velocity - phase_velocity(0.1, 100.0, tables.j1.as_slice()[2])).abs() < 1e-12);
		assert!(Pick::on_table(Feature::Peak, 0.1, 8, 100.0, &tables).is_none());
	}

	#[test]
	fn test_fixed_width_line() {
		let pick = Pick { feature: Feature::Trough, frequency: 0.05, velocity: 3.25, order: 4 };
		let line = AnnotatedPick { pick, error: -0.125 }.to_string();

		assert_eq!(line, "    0.050000000     3.250000000 -1    4    -0.125000000");
	}
}
