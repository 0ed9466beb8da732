//! Zero-phase (forward-backward) filtering
//!
//! The signal is extended at both ends by an odd reflection about its end
//! samples, filtered forward, reversed, filtered again and reversed back.
//! Each pass starts from the filter's steady-state response to a step scaled
//! by the first sample it sees, so neither pass has a start-up transient.
//! The padding is cut off before returning, leaving a signal of the original
//! length with magnitude response `|H|^2` and no phase shift.

use crate::design::{design_lowpass, FilterCoefficients};
use crate::processor::SignalProcessor;
use std::sync::Arc;
use tracing::trace;
use zpf_core::{ensure_finite, FilterSpec, ZpfError, ZpfResult};

/// Steady-state delay line for a unit step input
///
/// Scaling the result by `x[0]` gives the state an infinitely long run of
/// `x[0]` would have left behind.
pub fn lfilter_zi(coefficients: &FilterCoefficients) -> Vec<f64> {
    let b = coefficients.b();
    let a = coefficients.a();
    let n = a.len().max(b.len());
    if n < 2 {
        return Vec::new();
    }

    let coeff = |c: &[f64], k: usize| c.get(k).copied().unwrap_or(0.0);
    let gain = coefficients.dc_gain();

    // z[k] holds sum over j > k of (b[j] - a[j] * gain)
    let mut zi = vec![0.0; n - 1];
    let mut acc = 0.0;
    for k in (1..n).rev() {
        acc += coeff(b, k) - coeff(a, k) * gain;
        zi[k - 1] = acc;
    }
    zi
}

/// Single forward pass in direct form II transposed
///
/// `state` is the delay line on entry and is left holding the final delay
/// line on return; its length must be `max(len(a), len(b)) - 1`.
pub fn lfilter(coefficients: &FilterCoefficients, input: &[f64], state: &mut [f64]) -> Vec<f64> {
    let b = coefficients.b();
    let a = coefficients.a();
    let coeff = |c: &[f64], k: usize| c.get(k).copied().unwrap_or(0.0);
    let last = state.len();

    let mut output = Vec::with_capacity(input.len());
    for &x in input {
        let y = coeff(b, 0) * x + state.first().copied().unwrap_or(0.0);
        for k in 0..last {
            let next = if k + 1 < last { state[k + 1] } else { 0.0 };
            state[k] = coeff(b, k + 1) * x - coeff(a, k + 1) * y + next;
        }
        output.push(y);
    }
    output
}

/// `x` with `pad` samples of odd reflection added on both sides
///
/// The left extension is `2 x[0] - x[pad..1]` and the right extension is
/// `2 x[N-1] - x[N-2..N-1-pad]`, so the signal and its slope stay continuous
/// at both joins.
///
/// # Panics
///
/// Panics when `pad >= x.len()`.
pub fn odd_extend(x: &[f64], pad: usize) -> Vec<f64> {
    let n = x.len();
    let first = x[0];
    let last = x[n - 1];

    let mut extended = Vec::with_capacity(n + 2 * pad);
    extended.extend((1..=pad).rev().map(|i| 2.0 * first - x[i]));
    extended.extend_from_slice(x);
    extended.extend((1..=pad).map(|i| 2.0 * last - x[n - 1 - i]));
    extended
}

/// Filter `input` forward and backward with edge padding
///
/// Returns a signal of the same length as `input`. Fails with
/// `SignalTooShort` unless the input is longer than the edge padding, and
/// with `NonFiniteInput` when it contains NaN or infinity.
pub fn filtfilt(coefficients: &FilterCoefficients, input: &[f64]) -> ZpfResult<Vec<f64>> {
    let pad = coefficients.pad_len();
    if input.len() <= pad {
        return Err(ZpfError::SignalTooShort {
            len: input.len(),
            required: pad + 1,
        });
    }
    ensure_finite(input)?;

    let zi = lfilter_zi(coefficients);
    let extended = odd_extend(input, pad);

    let mut state: Vec<f64> = zi.iter().map(|z| z * extended[0]).collect();
    let mut forward = lfilter(coefficients, &extended, &mut state);
    forward.reverse();

    let mut state: Vec<f64> = zi.iter().map(|z| z * forward[0]).collect();
    let mut backward = lfilter(coefficients, &forward, &mut state);
    backward.reverse();

    trace!(samples = input.len(), pad, "zero-phase pass complete");

    Ok(backward[pad..pad + input.len()].to_vec())
}

/// Zero-phase Butterworth low-pass filter
///
/// Coefficients are designed once and shared, so the processor can be cloned
/// into worker threads cheaply.
#[derive(Debug, Clone)]
pub struct ZeroPhaseLowpass {
    coefficients: Arc<FilterCoefficients>,
}

impl ZeroPhaseLowpass {
    /// Design the filter for `spec`
    pub fn new(spec: &FilterSpec) -> ZpfResult<Self> {
        Ok(Self::from_coefficients(Arc::new(design_lowpass(spec)?)))
    }

    pub fn from_coefficients(coefficients: Arc<FilterCoefficients>) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &FilterCoefficients {
        &self.coefficients
    }

    /// Filter one signal
    pub fn apply(&self, input: &[f64]) -> ZpfResult<Vec<f64>> {
        filtfilt(&self.coefficients, input)
    }
}

impl SignalProcessor for ZeroPhaseLowpass {
    fn process(&self, input: &[f64]) -> ZpfResult<Vec<f64>> {
        self.apply(input)
    }

    fn name(&self) -> &str {
        "butterworth_zero_phase_lowpass"
    }

    fn min_signal_len(&self) -> usize {
        self.coefficients.pad_len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn lowpass(cutoff: f64, fs: f64, order: usize) -> ZeroPhaseLowpass {
        ZeroPhaseLowpass::new(&FilterSpec::new(cutoff, fs, order).unwrap()).unwrap()
    }

    fn sine(freq: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f64 / fs).sin())
            .collect()
    }

    #[test]
    fn test_odd_extension_pads_both_sides() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let padded = odd_extend(&x, 3);

        assert_eq!(padded.len(), x.len() + 6);
        assert_eq!(&padded[..3], &[-2.0, -1.0, 0.0]);
        assert_eq!(&padded[3..8], &x);
        assert_eq!(&padded[8..], &[6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_zi_is_steady_state() {
        let filter = lowpass(8.0, 100.0, 4);
        let coefficients = filter.coefficients();

        let mut state: Vec<f64> = lfilter_zi(coefficients).iter().map(|z| z * 2.5).collect();
        let out = lfilter(coefficients, &[2.5; 20], &mut state);
        for y in out {
            assert_abs_diff_eq!(y, 2.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_lfilter_first_order_difference_equation() {
        // Wn = 0.5, order 1: y[n] = 0.5 x[n] + 0.5 x[n-1]
        let filter = lowpass(25.0, 100.0, 1);
        let mut state = vec![0.0];
        let out = lfilter(filter.coefficients(), &[1.0, 0.0, 0.0, 4.0], &mut state);

        for (got, want) in out.iter().zip([0.5, 0.5, 0.0, 2.0]) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(state[0], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_output_length_matches_input() {
        let filter = lowpass(8.0, 100.0, 4);
        for n in [16, 17, 100, 1001] {
            let out = filter.apply(&sine(1.0, 100.0, n)).unwrap();
            assert_eq!(out.len(), n);
        }
    }

    #[test]
    fn test_constant_passes_unchanged() {
        let filter = lowpass(8.0, 100.0, 4);
        let input = vec![3.7; 50];
        let out = filter.apply(&input).unwrap();

        for y in out {
            assert_abs_diff_eq!(y, 3.7, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_signal_at_pad_length_is_too_short() {
        let filter = lowpass(8.0, 100.0, 4);
        assert_eq!(filter.min_signal_len(), 16);

        match filter.apply(&[0.0; 15]) {
            Err(ZpfError::SignalTooShort { len, required }) => {
                assert_eq!(len, 15);
                assert_eq!(required, 16);
            }
            other => panic!("expected SignalTooShort, got {:?}", other),
        }
        assert!(filter.apply(&[0.0; 16]).is_ok());
    }

    #[test]
    fn test_empty_signal_is_too_short() {
        let filter = lowpass(8.0, 100.0, 2);
        assert!(matches!(filter.apply(&[]), Err(ZpfError::SignalTooShort { len: 0, .. })));
    }

    #[test]
    fn test_non_finite_sample_reported() {
        let filter = lowpass(8.0, 100.0, 4);
        let mut input = sine(1.0, 100.0, 40);
        input[17] = f64::NAN;

        match filter.apply(&input) {
            Err(ZpfError::NonFiniteInput { index, value }) => {
                assert_eq!(index, 17);
                assert!(value.is_nan());
            }
            other => panic!("expected NonFiniteInput, got {:?}", other),
        }
    }

    #[test]
    fn test_refiltering_attenuates_further() {
        let filter = lowpass(8.0, 100.0, 4);
        let input: Vec<f64> = sine(1.0, 100.0, 200)
            .iter()
            .zip(sine(9.0, 100.0, 200))
            .map(|(a, b)| a + b)
            .collect();

        let once = filter.apply(&input).unwrap();
        let twice = filter.apply(&once).unwrap();
        let diff: f64 = once.iter().zip(&twice).map(|(a, b)| (a - b).abs()).sum();
        assert!(diff > 1e-3);
    }

    #[test]
    fn test_processor_name() {
        assert_eq!(lowpass(8.0, 100.0, 4).name(), "butterworth_zero_phase_lowpass");
    }
}
