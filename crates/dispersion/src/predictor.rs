use std::f64::consts::PI;

use crate::reference::ReferenceCurve;

/// Estimated location of the next feature of a given kernel zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
	pub frequency: f64,
	pub velocity: f64,
}

/// Local extrapolation oracle used by the tracker to place its search windows.
///
/// `None` means "no solution in the valid range" and terminates the current branch.
pub trait Predictor: Send + Sync {
	fn predict(
		&self,
		frequency: f64,
		velocity: f64,
		zero: f64,
		distance: f64,
		reference: &ReferenceCurve,
	) -> Option<Prediction>;
}

/// Follows the reference curve, rescaled to pass through the current pick.
///
/// Solves `2π f d / zero = ratio · ref(f)` with `ratio = velocity / ref(frequency)` and
/// returns the root closest to the current frequency.
#[derive(Debug, Clone, Copy)]
pub struct AnchoredReferencePredictor {
	grid_steps: usize,
}

impl AnchoredReferencePredictor {
	pub const fn new(grid_steps: usize) -> Self {
		Self { grid_steps }
	}
}

impl Default for AnchoredReferencePredictor {
	fn default() -> Self {
		Self::new(4096)
	}
}

impl Predictor for AnchoredReferencePredictor {
	fn predict(
		&self,
		frequency: f64,
		velocity: f64,
		zero: f64,
		distance: f64,
		reference: &ReferenceCurve,
	) -> Option<Prediction> {
		let ratio = velocity / reference.velocity(frequency)?;
		let residual = |f: f64| reference.velocity(f).map(|v| 2.0 * PI * f * distance - zero * ratio * v);

		let (lo, hi) = reference.domain();
		let steps = self.grid_steps.max(2);
		let step = (hi - lo) / steps as f64;

		let mut best: Option<f64> = None;
		let mut keep_closest = |root: f64| {
			if best.is_none_or(|b| (root - frequency).abs() < (b - frequency).abs()) {
				best = Some(root);
			}
		};

		let mut a = lo;
		let mut ra = residual(a)?;
		for k in 1..=steps {
			let b = if k == steps { hi } else { (k as f64).mul_add(step, lo) };
			let rb = residual(b)?;

			if ra == 0.0 {
				keep_closest(a);
			} else if ra.signum() != rb.signum() && rb != 0.0 {
				keep_closest(bisect(&residual, a, b, ra));
			}

			a = b;
			ra = rb;
		}
		if ra == 0.0 {
			keep_closest(a);
		}

		let root = best?;
		Some(Prediction { frequency: root, velocity: 2.0 * PI * root * distance / zero })
	}
}

fn bisect(residual: &impl Fn(f64) -> Option<f64>, mut a: f64, mut b: f64, mut ra: f64) -> f64 {
	for _ in 0..64 {
		let mid = 0.5 * (a + b);
		let Some(rm) = residual(mid) else { break };

		if rm == 0.0 {
			return mid;
		}

		if rm.signum() == ra.signum() {
			a = mid;
			ra = rm;
		} else {
			b = mid;
		}
	}

	0.5 * (a + b)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_constant_reference_prediction() {
		let reference = ReferenceCurve::constant(3.0, 0.0, 0.5).unwrap();
		let predictor = AnchoredReferencePredictor::default();

		// 2π f 100 / z = 3  =>  f = 3 z / (200 π)
		let zero = 10.173_468_135_062_722;
		let prediction = predictor.predict(0.02, 3.0, zero, 100.0, &reference).unwrap();

		assert!((prediction.frequency - 3.0 * zero / (200.0 * PI)).abs() < 1e-9);
		assert!((prediction.velocity - 3.0).abs() < 1e-9);
	}

	#[test]
	fn test_anchor_rescales_reference() {
		let reference = ReferenceCurve::constant(3.0, 0.0, 0.5).unwrap();
		let predictor = AnchoredReferencePredictor::default();

		// Current pick sits 10% above the reference, so the prediction follows 3.3 km/s.
		let zero = 20.0;
		let prediction = predictor.predict(0.1, 3.3, zero, 100.0, &reference).unwrap();

		assert!((prediction.velocity - 3.3).abs() < 1e-9);
	}

	#[test]
	fn test_no_root_in_domain() {
		let reference = ReferenceCurve::constant(3.0, 0.0, 0.5).unwrap();
		let predictor = AnchoredReferencePredictor::default();

		// Root would lie at f ≈ 4.8 Hz, far outside the reference domain.
		assert!(predictor.predict(0.1, 3.0, 1000.0, 100.0, &reference).is_none());
	}

	#[test]
	fn test_outside_reference_domain() {
		let reference = ReferenceCurve::constant(3.0, 0.05, 0.5).unwrap();
		let predictor = AnchoredReferencePredictor::default();

		assert!(predictor.predict(0.01, 3.0, 10.0, 100.0, &reference).is_none());
	}
}
