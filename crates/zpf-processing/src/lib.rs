//! ZPF-Processing: zero-phase Butterworth low-pass filtering of tables
//!
//! Filter design, forward-backward application with edge padding, and the
//! column orchestration that filters every numeric column of a table.

pub mod design;
pub mod zero_phase;
pub mod processor;
pub mod spectrum;
pub mod config;
pub mod pipeline;

pub use pipeline::*;
pub use design::{design_lowpass, FilterCoefficients};
pub use zero_phase::{filtfilt, lfilter, lfilter_zi, odd_extend, ZeroPhaseLowpass};
pub use processor::{ProcessingMetrics, ProcessingTimer, SignalProcessor};
pub use spectrum::{stopband_reduction_db, tone_amplitude, AmplitudeSpectrum};
pub use config::{ErrorHandling, NonNumericPolicy, ProcessingConfig, DEFAULT_COLUMN_SUFFIX};
