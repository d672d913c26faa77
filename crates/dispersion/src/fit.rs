use nalgebra::{DMatrix, DVector};

/// Least-squares polynomial in the normalised variable `(x - shift) / scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
	shift: f64,
	scale: f64,
	coefficients: Vec<f64>,
}

impl Polynomial {
	pub fn eval(&self, x: f64) -> f64 {
		let t = (x - self.shift) / self.scale;
		self.coefficients.iter().rev().fold(0.0, |acc, &c| acc.mul_add(t, c))
	}
}

/// Fits a polynomial of `degree` to `(x, y)`.
///
/// Returns `None` with fewer than `degree + 1` points, a degenerate abscissa, or a failed solve.
pub fn polyfit(x: &[f64], y: &[f64], degree: usize) -> Option<Polynomial> {
	let n = x.len();
	if n != y.len() || n < degree + 1 {
		return None;
	}

	let shift = x.iter().sum::<f64>() / n as f64;
	let scale = x.iter().fold(0.0_f64, |acc, &v| acc.max((v - shift).abs()));
	if !(scale > 0.0) || !scale.is_finite() {
		return None;
	}

	let vandermonde = DMatrix::from_fn(n, degree + 1, |row, col| ((x[row] - shift) / scale).powi(col as i32));
	let rhs = DVector::from_column_slice(y);

	let solution = vandermonde.svd(true, true).solve(&rhs, 1e-12).ok()?;
	if solution.iter().any(|c| !c.is_finite()) {
		return None;
	}

	Some(Polynomial { shift, scale, coefficients: solution.iter().copied().collect() })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_recovers_exact_cubic() {
		let x: Vec<f64> = (0..20).map(|i| 0.04 + f64::from(i) * 0.002).collect();
		let y: Vec<f64> = x.iter().map(|&v| 2.0 - 3.0 * v + 50.0 * v * v - 400.0 * v * v * v).collect();

		let poly = polyfit(&x, &y, 3).unwrap();

		for (&xi, &yi) in x.iter().zip(&y) {
			assert!((poly.eval(xi) - yi).abs() < 1e-9);
		}
	}

	#[test]
	fn test_least_squares_line_through_noise() {
		let x = [0.0, 1.0, 2.0, 3.0];
		let y = [1.0, 3.0, 1.0, 3.0];

		let poly = polyfit(&x, &y, 1).unwrap();

		assert!((poly.eval(1.5) - 2.0).abs() < 1e-9);
	}

	#[test]
	fn test_too_few_points() {
		assert!(polyfit(&[0.0, 1.0, 2.0], &[1.0, 2.0, 3.0], 6).is_none());
		assert!(polyfit(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0], 1).is_none());
	}
}
