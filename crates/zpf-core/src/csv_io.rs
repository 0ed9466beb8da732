//! CSV input/output for tables
//!
//! A column is numeric when every non-empty cell parses as a float and at
//! least one cell is non-empty. Empty cells inside a numeric column become
//! NaN so that the filtering stage reports them instead of guessing a value.

use crate::error::ZpfResult;
use crate::table::{Column, Table};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parse a CSV document with a header row into a table
pub fn read_table<R: Read>(reader: R) -> ZpfResult<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

    for record in reader.records() {
        let record = record?;
        for (column, field) in cells.iter_mut().zip(record.iter()) {
            column.push(field.to_string());
        }
    }

    let mut table = Table::new();
    for (name, raw) in headers.into_iter().zip(cells) {
        let column = classify(raw);
        debug!(column = %name, kind = column.kind(), rows = column.len(), "parsed column");
        table.push_column(name, column)?;
    }

    Ok(table)
}

/// Read a CSV file from disk
pub fn read_table_from_path(path: &Path) -> ZpfResult<Table> {
    let file = File::open(path)?;
    read_table(BufReader::new(file))
}

/// Write a table as CSV with a header row
pub fn write_table<W: Write>(table: &Table, writer: W) -> ZpfResult<()> {
    if table.is_empty() {
        return Ok(());
    }

    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(table.names())?;

    let rows = table.row_count().unwrap_or(0);
    for row in 0..rows {
        writer.write_record(table.iter().map(|(_, column)| column.cell(row)))?;
    }

    writer.flush()?;
    Ok(())
}

/// Write a table to a CSV file, replacing any existing file
pub fn write_table_to_path(table: &Table, path: &Path) -> ZpfResult<()> {
    let file = File::create(path)?;
    write_table(table, BufWriter::new(file))
}

/// `<dir>/<stem><suffix>.csv` next to the input file
pub fn derive_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{suffix}.csv"))
}

fn classify(raw: Vec<String>) -> Column {
    let any_value = raw.iter().any(|cell| !cell.is_empty());
    let all_numeric = raw
        .iter()
        .all(|cell| cell.is_empty() || cell.parse::<f64>().is_ok());

    if !(any_value && all_numeric) {
        return Column::Text(raw);
    }

    let values = raw
        .iter()
        .map(|cell| cell.parse::<f64>().unwrap_or(f64::NAN))
        .collect();
    Column::Numeric(values)
}
