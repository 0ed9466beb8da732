//! Signal helpers: finiteness checks, time axes and per-channel statistics

use crate::error::{ZpfError, ZpfResult};
use serde::{Deserialize, Serialize};

/// Reject the first NaN or infinite sample, reporting where it sits
pub fn ensure_finite(samples: &[f64]) -> ZpfResult<()> {
    match samples.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(ZpfError::NonFiniteInput {
            index,
            value: samples[index],
        }),
        None => Ok(()),
    }
}

/// Time in seconds of each of `len` samples taken at `sample_rate_hz`
pub fn time_vector(len: usize, sample_rate_hz: f64) -> Vec<f64> {
    let dt = 1.0 / sample_rate_hz;
    (0..len).map(|i| i as f64 * dt).collect()
}

/// Basic statistics for a signal channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub mean: f64,
    pub rms: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub peak_to_peak: f64,
}

impl ChannelStats {
    pub fn calculate(data: &[f64]) -> Self {
        if data.is_empty() {
            return Self {
                mean: 0.0,
                rms: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
                peak_to_peak: 0.0,
            };
        }

        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;

        let sum_sq: f64 = data.iter().map(|x| x * x).sum();
        let rms = (sum_sq / n).sqrt();

        let variance: f64 = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        let min = data.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = data.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

        Self {
            mean,
            rms,
            std_dev,
            min,
            max,
            peak_to_peak: max - min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite(&[0.0, 1.5, -2.0]).is_ok());
        assert!(ensure_finite(&[]).is_ok());

        match ensure_finite(&[0.0, 1.0, f64::INFINITY, f64::NAN]) {
            Err(ZpfError::NonFiniteInput { index, value }) => {
                assert_eq!(index, 2);
                assert!(value.is_infinite());
            }
            other => panic!("expected NonFiniteInput, got {:?}", other),
        }
    }

    #[test]
    fn test_time_vector() {
        let t = time_vector(4, 100.0);
        assert_eq!(t.len(), 4);
        assert_abs_diff_eq!(t[3], 0.03, epsilon = 1e-12);
    }

    #[test]
    fn test_channel_stats() {
        let stats = ChannelStats::calculate(&[1.0, -1.0, 1.0, -1.0]);
        assert_abs_diff_eq!(stats.mean, 0.0);
        assert_abs_diff_eq!(stats.rms, 1.0);
        assert_abs_diff_eq!(stats.std_dev, 1.0);
        assert_eq!(stats.min, -1.0);
        assert_eq!(stats.max, 1.0);
        assert_eq!(stats.peak_to_peak, 2.0);
    }

    #[test]
    fn test_empty_stats() {
        let stats = ChannelStats::calculate(&[]);
        assert_eq!(stats.rms, 0.0);
        assert_eq!(stats.peak_to_peak, 0.0);
    }
}
