use crate::error::SignalError;

/// Real part of a cross-correlation spectrum sampled on a strictly increasing frequency axis.
#[derive(Debug, Clone)]
pub struct Signal {
	frequency: Vec<f64>,
	amplitude: Vec<f64>,
}

impl Signal {
	pub fn new(frequency: Vec<f64>, amplitude: Vec<f64>) -> Result<Self, SignalError> {
		if frequency.len() != amplitude.len() {
			return Err(SignalError::LengthMismatch { frequency: frequency.len(), amplitude: amplitude.len() });
		}

		if frequency.len() < 2 {
			return Err(SignalError::TooShort(frequency.len()));
		}

		if let Some(i) = frequency.iter().zip(&amplitude).position(|(f, a)| !f.is_finite() || !a.is_finite()) {
			return Err(SignalError::NonFinite(i));
		}

		if let Some(i) = frequency.windows(2).position(|w| w[1] <= w[0]) {
			return Err(SignalError::NotIncreasing(i + 1));
		}

		Ok(Self { frequency, amplitude })
	}

	pub fn len(&self) -> usize {
		self.frequency.len()
	}

	pub fn is_empty(&self) -> bool {
		self.frequency.is_empty()
	}

	pub fn frequency(&self) -> &[f64] {
		&self.frequency
	}

	pub fn amplitude(&self) -> &[f64] {
		&self.amplitude
	}

	pub fn frequency_at(&self, index: usize) -> f64 {
		self.frequency[index]
	}

	pub fn amplitude_at(&self, index: usize) -> f64 {
		self.amplitude[index]
	}

	/// Largest absolute amplitude over the whole spectrum.
	pub fn max_magnitude(&self) -> f64 {
		self.amplitude.iter().fold(0.0_f64, |acc, a| acc.max(a.abs()))
	}

	/// Index of the sample whose frequency is closest to `frequency`.
	pub fn nearest_index(&self, frequency: f64) -> usize {
		let upper = self.frequency.partition_point(|&f| f < frequency);
		if upper == 0 {
			return 0;
		}
		if upper >= self.len() {
			return self.len() - 1;
		}

		if (self.frequency[upper] - frequency).abs() < (frequency - self.frequency[upper - 1]).abs() {
			upper
		} else {
			upper - 1
		}
	}
}
