//! Amplitude spectra used to quantify how much of a column the filter removed

use rustfft::{num_complex::Complex, FftPlanner};

/// Stopband power below this fraction of the total counts as none
pub const NEGLIGIBLE_POWER_RATIO: f64 = 1e-12;

/// Single-sided amplitude spectrum of a real signal
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeSpectrum {
    /// Spacing between bins in Hz
    pub resolution_hz: f64,
    /// Peak amplitude of the sinusoid at each bin, DC first
    pub amplitudes: Vec<f64>,
    /// Number of samples the spectrum was computed from
    pub signal_len: usize,
    /// Sampling rate of the signal in Hz
    pub sample_rate_hz: f64,
}

impl AmplitudeSpectrum {
    /// Compute the spectrum of `signal` sampled at `sample_rate_hz`
    pub fn compute(signal: &[f64], sample_rate_hz: f64) -> Self {
        let n = signal.len();
        if n == 0 {
            return Self {
                resolution_hz: 0.0,
                amplitudes: Vec::new(),
                signal_len: 0,
                sample_rate_hz,
            };
        }

        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(n);

        let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
        fft.process(&mut buffer);

        let amplitudes = buffer[..=n / 2]
            .iter()
            .enumerate()
            .map(|(k, c)| {
                let scale = if k == 0 || 2 * k == n { 1.0 } else { 2.0 };
                scale * c.norm() / n as f64
            })
            .collect();

        Self {
            resolution_hz: sample_rate_hz / n as f64,
            amplitudes,
            signal_len: n,
            sample_rate_hz,
        }
    }

    /// Frequency of bin `k` in Hz
    pub fn frequency(&self, k: usize) -> f64 {
        if self.signal_len == 0 {
            return 0.0;
        }
        // k * fs / n keeps the Nyquist bin exactly at fs / 2
        k as f64 * self.sample_rate_hz / self.signal_len as f64
    }

    /// DC and, for even lengths, Nyquist have no mirrored negative-frequency bin
    fn is_unpaired(&self, k: usize) -> bool {
        k == 0 || 2 * k == self.signal_len
    }

    /// Amplitude at the bin nearest `freq_hz`
    pub fn amplitude_at(&self, freq_hz: f64) -> f64 {
        if self.amplitudes.is_empty() || self.resolution_hz <= 0.0 {
            return 0.0;
        }
        let k = (freq_hz / self.resolution_hz).round() as usize;
        self.amplitudes.get(k).copied().unwrap_or(0.0)
    }

    /// Mean power of the components between `low_hz` and `high_hz` inclusive
    pub fn band_power(&self, low_hz: f64, high_hz: f64) -> f64 {
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(k, _)| {
                let f = self.frequency(*k);
                f >= low_hz && f <= high_hz
            })
            .map(|(k, a)| if self.is_unpaired(k) { a * a } else { a * a / 2.0 })
            .sum()
    }
}

/// Amplitude of the `freq_hz` component of `signal`
///
/// Exact when `freq_hz` falls on a bin, i.e. the window spans a whole number
/// of periods.
pub fn tone_amplitude(signal: &[f64], sample_rate_hz: f64, freq_hz: f64) -> f64 {
    AmplitudeSpectrum::compute(signal, sample_rate_hz).amplitude_at(freq_hz)
}

/// Power removed above `stopband_start_hz`, in dB
///
/// `None` when the input carries no measurable power in that band relative
/// to its total power.
pub fn stopband_reduction_db(
    input: &[f64],
    output: &[f64],
    sample_rate_hz: f64,
    stopband_start_hz: f64,
) -> Option<f64> {
    let nyquist = sample_rate_hz / 2.0;
    if stopband_start_hz >= nyquist {
        return None;
    }

    let input_spectrum = AmplitudeSpectrum::compute(input, sample_rate_hz);
    let total = input_spectrum.band_power(0.0, nyquist);
    let before = input_spectrum.band_power(stopband_start_hz, nyquist);
    let after = AmplitudeSpectrum::compute(output, sample_rate_hz).band_power(stopband_start_hz, nyquist);

    if before <= total * NEGLIGIBLE_POWER_RATIO {
        return None;
    }

    Some(10.0 * (before / after.max(f64::MIN_POSITIVE)).log10())
}
