use std::f64::consts::PI;

use crate::bessel;
use crate::signal::Signal;
use crate::zeros::ZeroTables;

/// Synthetic spectrum `J0(2π f d / v(f))` sampled at `f = i · step`.
pub fn create_test_signal(n: usize, step: f64, distance: f64, velocity: impl Fn(f64) -> f64) -> Signal {
	let frequency: Vec<f64> = (0..n).map(|i| i as f64 * step).collect();
	let amplitude = frequency.iter().map(|&f| bessel::j0(2.0 * PI * f * distance / velocity(f))).collect();

	Signal::new(frequency, amplitude).unwrap()
}

pub fn create_test_tables() -> ZeroTables {
	ZeroTables::bessel(256).unwrap()
}
