//! Butterworth low-pass design via the bilinear transform
//!
//! The analog prototype has `n` poles evenly spaced on the left half of the
//! unit circle. The cutoff is pre-warped with `tan(pi * Wn / 2)` so that the
//! digital -3 dB point lands on the requested frequency, then the poles are
//! mapped with `z = (1 + s) / (1 - s)`. All `n` zeros end up at `z = -1`.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, warn};
use zpf_core::{invalid_spec, FilterSpec, ZpfResult};

/// Orders above this start losing precision in the expanded polynomial form
pub const PRECISION_WARNING_ORDER: usize = 10;

/// Largest accepted deviation of the designed DC gain from 1 and of the
/// cutoff gain from `1/sqrt(2)`
pub const DESIGN_TOLERANCE: f64 = 1e-6;

/// Transfer function `B(z) / A(z)` of a digital low-pass filter.
///
/// Both sequences are stored in ascending powers of `z^-1` and have length
/// `order + 1`; `a[0]` is always 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCoefficients {
    spec: FilterSpec,
    b: Vec<f64>,
    a: Vec<f64>,
}

impl FilterCoefficients {
    /// Feedforward (numerator) coefficients
    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Feedback (denominator) coefficients
    pub fn a(&self) -> &[f64] {
        &self.a
    }

    /// Specification these coefficients were designed from
    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    pub fn order(&self) -> usize {
        self.a.len() - 1
    }

    /// Edge padding used by the zero-phase pass: `3 * max(len(a), len(b))`
    pub fn pad_len(&self) -> usize {
        3 * self.a.len().max(self.b.len())
    }

    /// Complex response `H(e^{jw})` at `freq_hz`
    pub fn frequency_response(&self, freq_hz: f64) -> Complex64 {
        let w = 2.0 * PI * freq_hz / self.spec.sample_rate_hz;
        let z_inv = Complex64::from_polar(1.0, -w);
        eval_poly(&self.b, z_inv) / eval_poly(&self.a, z_inv)
    }

    /// Single-pass gain at `freq_hz` in dB
    pub fn magnitude_db(&self, freq_hz: f64) -> f64 {
        20.0 * self.frequency_response(freq_hz).norm().log10()
    }

    /// Gain at zero frequency
    pub fn dc_gain(&self) -> f64 {
        self.b.iter().sum::<f64>() / self.a.iter().sum::<f64>()
    }
}

/// Design a Butterworth low-pass filter for `spec`
pub fn design_lowpass(spec: &FilterSpec) -> ZpfResult<FilterCoefficients> {
    spec.validate()?;

    let n = spec.order;
    if n > PRECISION_WARNING_ORDER {
        warn!(
            order = n,
            "high filter order, transfer function coefficients may lose precision"
        );
    }

    // Pre-warp frequency for bilinear transform
    let warped = (PI * spec.normalized_cutoff() / 2.0).tan();

    let analog_poles: Vec<Complex64> = prototype_poles(n).into_iter().map(|p| p * warped).collect();
    let analog_gain = warped.powi(n as i32);

    let one = Complex64::new(1.0, 0.0);
    let digital_poles: Vec<Complex64> = analog_poles.iter().map(|&p| (one + p) / (one - p)).collect();
    // Conjugate pairs make this product real
    let denominator: Complex64 = analog_poles.iter().map(|&p| one - p).product();
    let gain = analog_gain / denominator.re;

    let b = binomial_row(n).into_iter().map(|c| gain * c).collect();
    let a = poly_from_roots(&digital_poles).into_iter().map(|c| c.re).collect();

    let coefficients = FilterCoefficients { spec: *spec, b, a };
    check_conditioning(&coefficients)?;
    debug!(
        spec = %spec,
        b = ?coefficients.b,
        a = ?coefficients.a,
        "designed Butterworth low-pass"
    );

    Ok(coefficients)
}

/// Reject coefficients whose expanded polynomials no longer describe the filter
///
/// Rounding in the polynomial expansion grows with order and shrinks with
/// cutoff; once it shows up in the DC or cutoff gain the recursion can be
/// biased or unstable.
fn check_conditioning(coefficients: &FilterCoefficients) -> ZpfResult<()> {
    let spec = coefficients.spec();
    let finite = coefficients.b.iter().chain(&coefficients.a).all(|c| c.is_finite());
    let dc_error = (coefficients.dc_gain() - 1.0).abs();
    let cutoff_error =
        (coefficients.frequency_response(spec.cutoff_hz).norm() - std::f64::consts::FRAC_1_SQRT_2).abs();

    if !finite || !(dc_error <= DESIGN_TOLERANCE) || !(cutoff_error <= DESIGN_TOLERANCE) {
        return Err(invalid_spec!(
            "order {} at {} Hz cutoff (fs = {} Hz) is numerically ill-conditioned: \
             DC gain off by {:.2e}, cutoff gain off by {:.2e}; lower the order or raise the cutoff",
            spec.order,
            spec.cutoff_hz,
            spec.sample_rate_hz,
            dc_error,
            cutoff_error
        ));
    }

    Ok(())
}

/// Poles of the normalised analog Butterworth prototype of order `n`
fn prototype_poles(n: usize) -> Vec<Complex64> {
    (0..n)
        .map(|k| {
            let m = 2.0 * k as f64 - (n as f64 - 1.0);
            -Complex64::from_polar(1.0, PI * m / (2.0 * n as f64))
        })
        .collect()
}

/// Coefficients of `(1 + z^-1)^n`
fn binomial_row(n: usize) -> Vec<f64> {
    let mut row = vec![1.0];
    for _ in 0..n {
        let mut next = vec![0.0; row.len() + 1];
        for (i, &c) in row.iter().enumerate() {
            next[i] += c;
            next[i + 1] += c;
        }
        row = next;
    }
    row
}

/// Coefficients of `prod(1 - r z^-1)` in ascending powers of `z^-1`
fn poly_from_roots(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &r in roots {
        let mut next = vec![Complex64::new(0.0, 0.0); coeffs.len() + 1];
        for (i, &c) in coeffs.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c * r;
        }
        coeffs = next;
    }
    coeffs
}

/// Horner evaluation of `sum c[k] * x^k`
fn eval_poly(coeffs: &[f64], x: Complex64) -> Complex64 {
    coeffs
        .iter()
        .rev()
        .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * x + c)
}
