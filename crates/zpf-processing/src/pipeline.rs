//! Column orchestration: filter every numeric column of a table
//!
//! The pipeline owns one set of coefficients for the whole run. Each numeric
//! column is filtered independently and written out as `<name><suffix>`;
//! text columns and failing columns are handled by the explicit policies in
//! [`ProcessingConfig`]. Every input column ends up in the run report.

use crate::config::{ErrorHandling, NonNumericPolicy, ProcessingConfig};
use crate::design::{design_lowpass, FilterCoefficients};
use crate::processor::{ProcessingMetrics, SignalProcessor};
use crate::spectrum::stopband_reduction_db;
use crate::zero_phase::ZeroPhaseLowpass;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;
use zpf_core::{invalid_table, Column, FilterSpec, Table, ZpfError, ZpfResult};

/// What happened to one input column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ColumnOutcome {
    Filtered,
    Skipped { reason: String },
    Dropped,
    PassedThrough,
}

/// Per-column entry of the run report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnReport {
    /// Input column name
    pub name: String,
    /// Name in the output table, if the column was kept
    pub output_name: Option<String>,
    pub outcome: ColumnOutcome,
    /// Present for every column the filter was run on
    pub metrics: Option<ProcessingMetrics>,
}

/// Summary of one filtering run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub spec: FilterSpec,
    pub coefficients: FilterCoefficients,
    /// One entry per input column, in input order
    pub columns: Vec<ColumnReport>,
    pub total_time_us: u64,
}

impl RunReport {
    /// Entry for the input column `name`
    pub fn column(&self, name: &str) -> Option<&ColumnReport> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn filtered_count(&self) -> usize {
        self.count(|o| matches!(o, ColumnOutcome::Filtered))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, ColumnOutcome::Skipped { .. }))
    }

    pub fn dropped_count(&self) -> usize {
        self.count(|o| matches!(o, ColumnOutcome::Dropped))
    }

    fn count(&self, pred: impl Fn(&ColumnOutcome) -> bool) -> usize {
        self.columns.iter().filter(|c| pred(&c.outcome)).count()
    }

    /// Export the report as pretty-printed JSON
    pub fn to_json(&self) -> ZpfResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Output table and report of a run
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub table: Table,
    pub report: RunReport,
}

/// Result of running the processor on a single column
struct ColumnRun {
    result: ZpfResult<Vec<f64>>,
    metrics: ProcessingMetrics,
}

struct RunContext {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    start: Instant,
}

impl RunContext {
    fn begin() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            start: Instant::now(),
        }
    }
}

/// Filters all numeric columns of a table with one zero-phase low-pass
pub struct FilterPipeline {
    config: ProcessingConfig,
    coefficients: Arc<FilterCoefficients>,
    processor: Arc<dyn SignalProcessor>,
}

impl FilterPipeline {
    /// Validate `config` and design the filter once for the whole run
    pub fn new(config: ProcessingConfig) -> ZpfResult<Self> {
        config.validate()?;
        let coefficients = Arc::new(design_lowpass(&config.filter)?);
        let processor: Arc<dyn SignalProcessor> =
            Arc::new(ZeroPhaseLowpass::from_coefficients(Arc::clone(&coefficients)));

        Ok(Self {
            config,
            coefficients,
            processor,
        })
    }

    /// Use a custom column processor in place of the zero-phase low-pass
    pub fn with_processor(config: ProcessingConfig, processor: Arc<dyn SignalProcessor>) -> ZpfResult<Self> {
        config.validate()?;
        let coefficients = Arc::new(design_lowpass(&config.filter)?);

        Ok(Self {
            config,
            coefficients,
            processor,
        })
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    pub fn coefficients(&self) -> &FilterCoefficients {
        &self.coefficients
    }

    pub fn processor_name(&self) -> &str {
        self.processor.name()
    }

    /// Name a filtered copy of `column` gets in the output
    pub fn output_name(&self, column: &str) -> String {
        format!("{}{}", column, self.config.column_suffix)
    }

    /// Filter the columns one after another on the calling thread
    pub fn run(&self, table: &Table) -> ZpfResult<PipelineResult> {
        self.check_output_names(table)?;
        let context = RunContext::begin();
        let processor = Arc::clone(&self.processor);
        let spec = self.config.filter;

        self.assemble(table, context, |_, values| {
            Ok(filter_column(processor.as_ref(), values, &spec))
        })
    }

    /// Filter the columns concurrently on the blocking thread pool
    ///
    /// Produces the same table and outcomes as [`FilterPipeline::run`].
    pub async fn run_concurrent(&self, table: &Table) -> ZpfResult<PipelineResult> {
        self.check_output_names(table)?;
        let context = RunContext::begin();
        let spec = self.config.filter;

        let mut handles = Vec::new();
        for (index, (name, column)) in table.iter().enumerate() {
            if let Column::Numeric(values) = column {
                debug!(column = name, "spawning filter task");
                let processor = Arc::clone(&self.processor);
                let values = values.clone();
                let handle = tokio::task::spawn_blocking(move || {
                    filter_column(processor.as_ref(), &values, &spec)
                });
                handles.push((index, handle));
            }
        }

        let mut runs: Vec<Option<ColumnRun>> = (0..table.column_count()).map(|_| None).collect();
        for (index, handle) in handles {
            let run = handle.await.map_err(|e| ZpfError::Task {
                reason: e.to_string(),
            })?;
            runs[index] = Some(run);
        }

        self.assemble(table, context, |index, _| {
            runs[index].take().ok_or_else(|| ZpfError::Task {
                reason: format!("no result for column {}", index),
            })
        })
    }

    /// Reject tables where two kept columns would share an output name
    ///
    /// Runs before any filtering so a collision never costs a partial run.
    fn check_output_names(&self, table: &Table) -> ZpfResult<()> {
        let mut claimed: HashMap<String, &str> = HashMap::new();

        for (name, column) in table.iter() {
            let output_name = match (column, self.config.non_numeric) {
                (Column::Numeric(_), _) => self.output_name(name),
                (Column::Text(_), NonNumericPolicy::PassThrough) => name.to_string(),
                (Column::Text(_), NonNumericPolicy::Drop) => continue,
            };

            if let Some(previous) = claimed.insert(output_name.clone(), name) {
                return Err(invalid_table!(
                    "columns '{}' and '{}' would both be written as '{}'",
                    previous,
                    name,
                    output_name
                ));
            }
        }

        Ok(())
    }

    /// Apply the column policies in input order, pulling filter results from `filter`
    fn assemble<F>(&self, table: &Table, context: RunContext, mut filter: F) -> ZpfResult<PipelineResult>
    where
        F: FnMut(usize, &[f64]) -> ZpfResult<ColumnRun>,
    {
        let span = info_span!("filter_run", run_id = %context.run_id);
        let _enter = span.enter();

        let mut output = Table::new();
        let mut reports = Vec::with_capacity(table.column_count());

        for (index, (name, column)) in table.iter().enumerate() {
            let values = match column {
                Column::Numeric(values) => values,
                Column::Text(_) => {
                    reports.push(self.non_numeric_column(name, column, &mut output)?);
                    continue;
                }
            };

            let ColumnRun { result, metrics } = filter(index, values)?;
            match result {
                Ok(filtered) => {
                    let output_name = self.output_name(name);
                    info!(column = name, output = %output_name, "filtering column");
                    output.push_column(output_name.clone(), Column::Numeric(filtered))?;
                    reports.push(ColumnReport {
                        name: name.to_string(),
                        output_name: Some(output_name),
                        outcome: ColumnOutcome::Filtered,
                        metrics: Some(metrics),
                    });
                }
                Err(e) => match self.config.error_handling {
                    ErrorHandling::StrictMode => return Err(e.in_column(name)),
                    ErrorHandling::BypassMode => {
                        warn!(column = name, error = %e, "skipping column");
                        reports.push(ColumnReport {
                            name: name.to_string(),
                            output_name: None,
                            outcome: ColumnOutcome::Skipped { reason: e.to_string() },
                            metrics: Some(metrics),
                        });
                    }
                },
            }
        }

        let report = RunReport {
            run_id: context.run_id,
            started_at: context.started_at,
            spec: self.config.filter,
            coefficients: self.coefficients.as_ref().clone(),
            columns: reports,
            total_time_us: context.start.elapsed().as_micros() as u64,
        };

        info!(
            filtered = report.filtered_count(),
            skipped = report.skipped_count(),
            dropped = report.dropped_count(),
            total_time_us = report.total_time_us,
            "filter run complete"
        );

        Ok(PipelineResult { table: output, report })
    }

    fn non_numeric_column(&self, name: &str, column: &Column, output: &mut Table) -> ZpfResult<ColumnReport> {
        match self.config.non_numeric {
            NonNumericPolicy::Drop => {
                warn!(column = name, kind = column.kind(), "dropping non-numeric column");
                Ok(ColumnReport {
                    name: name.to_string(),
                    output_name: None,
                    outcome: ColumnOutcome::Dropped,
                    metrics: None,
                })
            }
            NonNumericPolicy::PassThrough => {
                debug!(column = name, "passing non-numeric column through");
                output.push_column(name, column.clone())?;
                Ok(ColumnReport {
                    name: name.to_string(),
                    output_name: Some(name.to_string()),
                    outcome: ColumnOutcome::PassedThrough,
                    metrics: None,
                })
            }
        }
    }
}

fn filter_column(processor: &dyn SignalProcessor, input: &[f64], spec: &FilterSpec) -> ColumnRun {
    let mut timer = ProcessingMetrics::start_timing();

    let processed = if processor.can_process(input) {
        processor.process(input)
    } else {
        Err(ZpfError::SignalTooShort {
            len: input.len(),
            required: processor.min_signal_len(),
        })
    };

    match processed {
        Ok(output) => {
            timer.set_input_stats(input);
            timer.set_output_stats(&output);
            timer.set_stopband_reduction(stopband_reduction_db(
                input,
                &output,
                spec.sample_rate_hz,
                spec.cutoff_hz,
            ));
            ColumnRun {
                result: Ok(output),
                metrics: timer.finish(),
            }
        }
        Err(e) => {
            let metrics = timer.finish_with_error(&e.to_string());
            ColumnRun {
                result: Err(e),
                metrics,
            }
        }
    }
}
