//! Processing configuration and column policies

use serde::{Deserialize, Serialize};
use std::path::Path;
use zpf_core::{FilterSpec, ZpfError, ZpfResult};

/// Suffix appended to the name of every filtered column
pub const DEFAULT_COLUMN_SUFFIX: &str = "_filt";

/// What happens to columns that are not numeric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonNumericPolicy {
    /// Leave the column out of the output
    #[default]
    Drop,
    /// Copy the column unchanged under its original name
    PassThrough,
}

/// Error handling strategies for per-column failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorHandling {
    /// Stop processing on the first failing column
    #[default]
    StrictMode,
    /// Skip failing columns, recording why in the run report
    BypassMode,
}

/// Everything a filtering run needs to know
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Filter applied to every numeric column
    pub filter: FilterSpec,
    /// Suffix appended to filtered column names
    #[serde(default = "default_suffix")]
    pub column_suffix: String,
    /// Treatment of non-numeric columns
    #[serde(default)]
    pub non_numeric: NonNumericPolicy,
    /// Treatment of columns that fail to filter
    #[serde(default)]
    pub error_handling: ErrorHandling,
    /// Filter columns on the blocking thread pool
    #[serde(default)]
    pub parallel: bool,
}

fn default_suffix() -> String {
    DEFAULT_COLUMN_SUFFIX.to_string()
}

impl ProcessingConfig {
    /// Configuration with default policies for `filter`
    pub fn new(filter: FilterSpec) -> Self {
        Self {
            filter,
            column_suffix: default_suffix(),
            non_numeric: NonNumericPolicy::default(),
            error_handling: ErrorHandling::default(),
            parallel: false,
        }
    }

    pub fn with_non_numeric(mut self, policy: NonNumericPolicy) -> Self {
        self.non_numeric = policy;
        self
    }

    pub fn with_error_handling(mut self, handling: ErrorHandling) -> Self {
        self.error_handling = handling;
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.column_suffix = suffix.into();
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validate the filter and the naming rules
    pub fn validate(&self) -> ZpfResult<()> {
        self.filter.validate()?;

        if self.column_suffix.is_empty() {
            return Err(ZpfError::Config {
                reason: "Column suffix cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Export configuration to JSON
    pub fn to_json(&self) -> ZpfResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ZpfError::Config {
            reason: format!("Failed to serialize configuration: {}", e),
        })
    }

    /// Import configuration from JSON
    pub fn from_json(json: &str) -> ZpfResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ZpfError::Config {
            reason: format!("Failed to deserialize configuration: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> ZpfResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
