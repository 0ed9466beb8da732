//! Error handling for the filtering workspace
//!
//! One error type covers specification checks, per-column signal checks,
//! table shape problems and the I/O collaborators around them.

use thiserror::Error;

/// Result type alias for filtering operations
pub type ZpfResult<T> = Result<T, ZpfError>;

/// Error type for all filtering operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ZpfError {
    /// Cutoff, sample rate or order do not describe a realisable low-pass filter
    #[error("Invalid filter specification: {reason}")]
    InvalidSpec {
        /// Description of the violated constraint
        reason: String,
    },

    /// Signal has too few samples for the edge padding the filter needs
    #[error("Signal too short: {len} samples, zero-phase filtering needs at least {required}")]
    SignalTooShort {
        /// Number of samples supplied
        len: usize,
        /// Minimum number of samples accepted
        required: usize,
    },

    /// Signal contains NaN or an infinite value
    #[error("Non-finite sample at index {index}: {value}")]
    NonFiniteInput {
        /// Position of the first offending sample
        index: usize,
        /// The offending value
        value: f64,
    },

    /// A per-column failure, tagged with the column it came from
    #[error("Column '{column}': {source}")]
    Column {
        /// Name of the input column
        column: String,
        /// Underlying failure
        #[source]
        source: Box<ZpfError>,
    },

    /// Table shape problem (ragged columns, duplicate names, ...)
    #[error("Invalid table: {reason}")]
    InvalidTable {
        /// Description of the table issue
        reason: String,
    },

    /// Processing configuration problem
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of the configuration issue
        reason: String,
    },

    /// A background filtering task did not complete
    #[error("Filtering task failed: {reason}")]
    Task {
        /// Description of the task failure
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ZpfError {
    /// Attach the column name to a per-column failure
    pub fn in_column(self, column: &str) -> Self {
        ZpfError::Column {
            column: column.to_string(),
            source: Box::new(self),
        }
    }

    /// The failure with any column tag stripped
    pub fn root(&self) -> &ZpfError {
        match self {
            ZpfError::Column { source, .. } => source.root(),
            other => other,
        }
    }

    /// Column name, when the error came from a single column
    pub fn column(&self) -> Option<&str> {
        match self {
            ZpfError::Column { column, .. } => Some(column),
            _ => None,
        }
    }
}

/// Convenience macro for creating specification errors
#[macro_export]
macro_rules! invalid_spec {
    ($($arg:tt)*) => {
        $crate::error::ZpfError::InvalidSpec {
            reason: format!($($arg)*),
        }
    };
}

/// Convenience macro for creating table errors
#[macro_export]
macro_rules! invalid_table {
    ($($arg:tt)*) => {
        $crate::error::ZpfError::InvalidTable {
            reason: format!($($arg)*),
        }
    };
}
