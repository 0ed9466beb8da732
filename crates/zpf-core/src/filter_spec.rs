//! FilterSpec: cutoff, sample rate and order of a low-pass filter

use crate::error::ZpfResult;
use crate::invalid_spec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameters of a Butterworth low-pass filter.
///
/// All three values must be supplied by the caller; there are no defaults.
/// A spec is only meaningful when `cutoff_hz` lies strictly between zero and
/// the Nyquist frequency `sample_rate_hz / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// -3 dB frequency of the filter in Hz
    pub cutoff_hz: f64,
    /// Sampling rate of the recording in Hz
    pub sample_rate_hz: f64,
    /// Filter order (number of poles)
    pub order: usize,
}

impl FilterSpec {
    /// Create a validated filter specification
    pub fn new(cutoff_hz: f64, sample_rate_hz: f64, order: usize) -> ZpfResult<Self> {
        let spec = Self {
            cutoff_hz,
            sample_rate_hz,
            order,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check the spec describes a realisable digital low-pass filter
    pub fn validate(&self) -> ZpfResult<()> {
        if !self.sample_rate_hz.is_finite() || self.sample_rate_hz <= 0.0 {
            return Err(invalid_spec!(
                "sample rate must be a positive number of Hz, got {}",
                self.sample_rate_hz
            ));
        }

        if !self.cutoff_hz.is_finite() || self.cutoff_hz <= 0.0 {
            return Err(invalid_spec!(
                "cutoff must be a positive number of Hz, got {}",
                self.cutoff_hz
            ));
        }

        if self.order < 1 {
            return Err(invalid_spec!("order must be at least 1, got {}", self.order));
        }

        let nyquist = self.nyquist_hz();
        if self.cutoff_hz >= nyquist {
            return Err(invalid_spec!(
                "cutoff {} Hz must be below the Nyquist frequency {} Hz (sample rate {} Hz)",
                self.cutoff_hz,
                nyquist,
                self.sample_rate_hz
            ));
        }

        Ok(())
    }

    /// Half the sample rate
    pub fn nyquist_hz(&self) -> f64 {
        self.sample_rate_hz / 2.0
    }

    /// Cutoff as a fraction of Nyquist, in (0, 1) for a valid spec
    pub fn normalized_cutoff(&self) -> f64 {
        self.cutoff_hz / self.nyquist_hz()
    }

    /// Samples of odd extension added at each signal edge during zero-phase filtering
    ///
    /// Three times the coefficient count, which is `order + 1`.
    pub fn pad_len(&self) -> usize {
        3 * (self.order + 1)
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "order-{} low-pass at {} Hz (fs = {} Hz)",
            self.order, self.cutoff_hz, self.sample_rate_hz
        )
    }
}
