/// Inclusive index range `[lo, hi]` over a signal, validated against the signal length.
///
/// A window always holds at least two samples: `lo < hi < len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
	lo: usize,
	hi: usize,
}

impl Window {
	/// Clamps both bounds into `[0, len)`; `None` when nothing is left to search.
	pub fn clamped(lo: isize, hi: isize, len: usize) -> Option<Self> {
		if len == 0 {
			return None;
		}

		let last = (len - 1) as isize;
		let lo = lo.clamp(0, last) as usize;
		let hi = hi.clamp(0, last) as usize;

		(lo < hi).then_some(Self { lo, hi })
	}

	/// Index window covering `[f_lo, f_hi]` with one guard sample on either side.
	pub fn spanning(frequency: &[f64], f_lo: f64, f_hi: f64) -> Option<Self> {
		let lo = frequency.partition_point(|&f| f <= f_lo) as isize - 1;
		let hi = frequency.partition_point(|&f| f <= f_hi) as isize + 1;

		Self::clamped(lo, hi, frequency.len())
	}

	pub const fn lo(&self) -> usize {
		self.lo
	}

	pub const fn hi(&self) -> usize {
		self.hi
	}

	pub const fn midpoint(&self) -> usize {
		self.lo + (self.hi - self.lo) / 2
	}

	pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
		self.lo..=self.hi
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_clamped_bounds() {
		assert_eq!(Window::clamped(-5, 3, 10), Some(Window { lo: 0, hi: 3 }));
		assert_eq!(Window::clamped(4, 50, 10), Some(Window { lo: 4, hi: 9 }));
		assert_eq!(Window::clamped(9, 50, 10), None);
		assert_eq!(Window::clamped(5, 5, 10), None);
		assert_eq!(Window::clamped(0, 1, 0), None);
	}

	#[test]
	fn test_spanning_adds_guard_samples() {
		let frequency: Vec<f64> = (0..10).map(|i| f64::from(i) * 0.1).collect();
		let window = Window::spanning(&frequency, 0.25, 0.45).unwrap();

		assert_eq!(window.lo(), 2);
		assert_eq!(window.hi(), 6);
		assert_eq!(window.midpoint(), 4);
	}

	#[test]
	fn test_spanning_past_end_is_clamped() {
		let frequency: Vec<f64> = (0..10).map(|i| f64::from(i) * 0.1).collect();
		let window = Window::spanning(&frequency, 0.75, 5.0).unwrap();

		assert_eq!(window.lo(), 7);
		assert_eq!(window.hi(), 9);
		assert!(Window::spanning(&frequency, 2.0, 5.0).is_none());
	}
}
