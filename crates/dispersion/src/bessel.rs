use std::f64::consts::PI;

/// Bessel function of the first kind of integer order `n`.
///
/// Evaluates Bessel's integral `J_n(x) = 1/π ∫₀^π cos(nτ − x sin τ) dτ` with the
/// trapezoidal rule. The integrand is smooth and periodic, so the rule converges
/// geometrically once the node count exceeds the oscillation count of the integrand.
pub fn jn(n: u32, x: f64) -> f64 {
	let order = f64::from(n);
	let intervals = 64 + x.abs().ceil() as usize + n as usize;
	let h = PI / intervals as f64;

	let integrand = |tau: f64| order.mul_add(tau, -x * tau.sin()).cos();

	let interior: f64 = (1..intervals).map(|k| integrand(k as f64 * h)).sum();
	let ends = 0.5 * (integrand(0.0) + integrand(PI));

	(ends + interior) / intervals as f64
}

pub fn j0(x: f64) -> f64 {
	jn(0, x)
}

pub fn j1(x: f64) -> f64 {
	jn(1, x)
}

/// First `count` positive zeros of `J_n` for `n` in {0, 1}.
///
/// McMahon's asymptotic expansion seeds each zero, Newton's method polishes it.
pub fn zeros(n: u32, count: usize) -> Vec<f64> {
	let mu = 4.0 * f64::from(n * n);

	(1..=count)
		.map(|s| {
			let beta = (s as f64 + f64::from(n) / 2.0 - 0.25) * PI;
			let eight_beta = 8.0 * beta;
			let guess = beta
				- (mu - 1.0) / eight_beta
				- 4.0 * (mu - 1.0) * 7.0f64.mul_add(mu, -31.0) / (3.0 * eight_beta.powi(3));

			polish_zero(n, guess)
		})
		.collect()
}

fn polish_zero(n: u32, mut x: f64) -> f64 {
	for _ in 0..32 {
		let value = jn(n, x);
		let slope = derivative(n, x);
		if slope == 0.0 {
			break;
		}

		let step = value / slope;
		x -= step;

		if step.abs() <= 1e-14 * x.abs() {
			break;
		}
	}

	x
}

fn derivative(n: u32, x: f64) -> f64 {
	match n {
		0 => -j1(x),
		_ => jn(n - 1, x) - f64::from(n) * jn(n, x) / x,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_known_values() {
		assert!((j0(0.0) - 1.0).abs() < 1e-14);
		assert!(j1(0.0).abs() < 1e-14);
		assert!((j0(1.0) - 0.765_197_686_557_966_6).abs() < 1e-12);
		assert!((j1(1.0) - 0.440_050_585_744_933_5).abs() < 1e-12);
		assert!((j0(10.0) - (-0.245_935_764_451_348_3)).abs() < 1e-12);
	}

	#[test]
	fn test_large_argument_stays_accurate() {
		// Asymptotic form J0(x) ~ sqrt(2 / (pi x)) cos(x - pi/4) is good to ~1e-4 at x = 500.
		let x = 500.0;
		let asymptotic = (2.0 / (PI * x)).sqrt() * (x - PI / 4.0).cos();
		assert!((j0(x) - asymptotic).abs() < 1e-4);
	}

	#[test]
	fn test_first_zeros_of_j0() {
		let z = zeros(0, 3);
		assert!((z[0] - 2.404_825_557_695_773).abs() < 1e-10);
		assert!((z[1] - 5.520_078_110_286_311).abs() < 1e-10);
		assert!((z[2] - 8.653_727_912_911_013).abs() < 1e-10);
	}

	#[test]
	fn test_first_zeros_of_j1() {
		let z = zeros(1, 3);
		assert!((z[0] - 3.831_705_970_207_512).abs() < 1e-10);
		assert!((z[1] - 7.015_586_669_815_619).abs() < 1e-10);
		assert!((z[2] - 10.173_468_135_062_722).abs() < 1e-10);
	}

	#[test]
	fn test_zeros_interlace() {
		let z0 = zeros(0, 200);
		let z1 = zeros(1, 200);

		for k in 0..200 {
			assert!(z0[k] < z1[k]);
			if k + 1 < 200 {
				assert!(z1[k] < z0[k + 1]);
			}
		}
	}
}
