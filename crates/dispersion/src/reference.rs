use crate::error::ReferenceError;

/// Reference phase-velocity curve, linearly interpolated between tabulated points.
///
/// The curve is only defined on `[domain_lo, domain_hi]`; [`ReferenceCurve::velocity`]
/// returns `None` outside of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCurve {
	frequency: Vec<f64>,
	velocity: Vec<f64>,
}

impl ReferenceCurve {
	pub fn new(frequency: Vec<f64>, velocity: Vec<f64>) -> Result<Self, ReferenceError> {
		if frequency.len() != velocity.len() {
			return Err(ReferenceError::LengthMismatch { frequency: frequency.len(), velocity: velocity.len() });
		}

		if frequency.len() < 2 {
			return Err(ReferenceError::TooShort(frequency.len()));
		}

		if let Some(i) = frequency.windows(2).position(|w| !(w[1] > w[0]) || !w[1].is_finite()) {
			return Err(ReferenceError::NotIncreasing(i + 1));
		}

		if let Some(i) = velocity.iter().position(|v| !(*v > 0.0) || !v.is_finite()) {
			return Err(ReferenceError::InvalidVelocity(i));
		}

		Ok(Self { frequency, velocity })
	}

	/// Flat curve over `[f_lo, f_hi]`.
	pub fn constant(velocity: f64, f_lo: f64, f_hi: f64) -> Result<Self, ReferenceError> {
		Self::new(vec![f_lo, f_hi], vec![velocity, velocity])
	}

	pub fn domain(&self) -> (f64, f64) {
		(self.frequency[0], self.frequency[self.frequency.len() - 1])
	}

	pub fn contains(&self, frequency: f64) -> bool {
		let (lo, hi) = self.domain();
		frequency >= lo && frequency <= hi
	}

	pub fn velocity(&self, frequency: f64) -> Option<f64> {
		if !self.contains(frequency) {
			return None;
		}

		let upper = self.frequency.partition_point(|&f| f < frequency);
		if upper == 0 {
			return Some(self.velocity[0]);
		}

		let (f0, f1) = (self.frequency[upper - 1], self.frequency[upper]);
		let (v0, v1) = (self.velocity[upper - 1], self.velocity[upper]);
		let t = (frequency - f0) / (f1 - f0);

		Some((v1 - v0).mul_add(t, v0))
	}
}
