use crate::bessel;
use crate::error::ZeroTableError;

/// Strictly increasing positive zero locations of one Bessel order, indexed by mode order.
#[derive(Debug, Clone, PartialEq)]
pub struct ZeroTable {
	zeros: Vec<f64>,
}

impl ZeroTable {
	pub fn new(zeros: Vec<f64>) -> Result<Self, ZeroTableError> {
		if zeros.is_empty() {
			return Err(ZeroTableError::Empty);
		}

		if !(zeros[0] > 0.0) || !zeros[0].is_finite() {
			return Err(ZeroTableError::NotIncreasing(0));
		}

		if let Some(i) = zeros.windows(2).position(|w| !(w[1] > w[0]) || !w[1].is_finite()) {
			return Err(ZeroTableError::NotIncreasing(i + 1));
		}

		Ok(Self { zeros })
	}

	/// Computes the first `count` zeros of `J_order`.
	pub fn bessel(order: u32, count: usize) -> Result<Self, ZeroTableError> {
		if order > 1 {
			return Err(ZeroTableError::UnsupportedOrder(order));
		}

		Self::new(bessel::zeros(order, count))
	}

	pub fn get(&self, order: u32) -> Option<f64> {
		self.zeros.get(order as usize).copied()
	}

	pub fn len(&self) -> usize {
		self.zeros.len()
	}

	pub fn is_empty(&self) -> bool {
		self.zeros.is_empty()
	}

	pub fn as_slice(&self) -> &[f64] {
		&self.zeros
	}
}

/// The order-0 and order-1 tables used together by the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct ZeroTables {
	/// Zero crossings of the kernel.
	pub j0: ZeroTable,
	/// Extrema of the kernel.
	pub j1: ZeroTable,
}

impl ZeroTables {
	pub const fn new(j0: ZeroTable, j1: ZeroTable) -> Self {
		Self { j0, j1 }
	}

	pub fn bessel(count: usize) -> Result<Self, ZeroTableError> {
		Ok(Self { j0: ZeroTable::bessel(0, count)?, j1: ZeroTable::bessel(1, count)? })
	}

	/// Highest order available in both tables.
	pub fn max_order(&self) -> u32 {
		(self.j0.len().min(self.j1.len()) - 1) as u32
	}
}
