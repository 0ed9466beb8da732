//! ZPF-Core: Foundation types for zero-phase filtering of sensor recordings
//!
//! Filter specification, per-column signal statistics, the tabular data model
//! and CSV input/output shared by the processing and CLI crates.

pub mod error;
pub mod filter_spec;
pub mod signal;
pub mod table;
pub mod csv_io;

pub use error::{ZpfError, ZpfResult};
pub use filter_spec::FilterSpec;
pub use signal::{ensure_finite, time_vector, ChannelStats};
pub use table::{Column, Table};
pub use csv_io::{derive_output_path, read_table, read_table_from_path, write_table, write_table_to_path};
