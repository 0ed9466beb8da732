//! Signal processor trait and per-column processing metrics

use serde::{Deserialize, Serialize};
use std::time::Instant;
use zpf_core::{ChannelStats, ZpfResult};

/// Core trait for column processors
///
/// Processors are stateless between calls so one instance can be shared by
/// every column of a run, including across threads.
pub trait SignalProcessor: Send + Sync {
    /// Process one column of samples, returning a signal of the same length
    fn process(&self, input: &[f64]) -> ZpfResult<Vec<f64>>;

    /// Processor name for logs and reports
    fn name(&self) -> &str;

    /// Shortest input the processor accepts
    fn min_signal_len(&self) -> usize {
        1
    }

    /// Check if processor can handle a signal of this length
    fn can_process(&self, input: &[f64]) -> bool {
        input.len() >= self.min_signal_len()
    }
}

/// Performance and signal metrics for one processed column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMetrics {
    /// Actual processing time in microseconds
    pub processing_time_us: u64,
    /// Statistics of the input column
    pub input_stats: Option<ChannelStats>,
    /// Statistics of the filtered column
    pub output_stats: Option<ChannelStats>,
    /// Stopband power reduction from input to output in dB
    pub stopband_reduction_db: Option<f64>,
    /// Success/failure status
    pub success: bool,
    /// Error message if processing failed
    pub error_message: Option<String>,
}

impl ProcessingMetrics {
    pub fn new() -> Self {
        Self {
            processing_time_us: 0,
            input_stats: None,
            output_stats: None,
            stopband_reduction_db: None,
            success: true,
            error_message: None,
        }
    }

    /// Start timing a processing operation
    pub fn start_timing() -> ProcessingTimer {
        ProcessingTimer {
            start_time: Instant::now(),
            metrics: ProcessingMetrics::new(),
        }
    }
}

impl Default for ProcessingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper for timing processing operations
pub struct ProcessingTimer {
    start_time: Instant,
    metrics: ProcessingMetrics,
}

impl ProcessingTimer {
    /// Finish timing and return metrics
    pub fn finish(mut self) -> ProcessingMetrics {
        self.metrics.processing_time_us = self.start_time.elapsed().as_micros() as u64;
        self.metrics
    }

    /// Finish with error
    pub fn finish_with_error(mut self, error: &str) -> ProcessingMetrics {
        self.metrics.processing_time_us = self.start_time.elapsed().as_micros() as u64;
        self.metrics.success = false;
        self.metrics.error_message = Some(error.to_string());
        self.metrics
    }

    pub fn set_input_stats(&mut self, input: &[f64]) {
        self.metrics.input_stats = Some(ChannelStats::calculate(input));
    }

    pub fn set_output_stats(&mut self, output: &[f64]) {
        self.metrics.output_stats = Some(ChannelStats::calculate(output));
    }

    pub fn set_stopband_reduction(&mut self, reduction_db: Option<f64>) {
        self.metrics.stopband_reduction_db = reduction_db;
    }
}
