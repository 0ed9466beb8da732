//! Table: ordered, named columns of equal length

use crate::error::ZpfResult;
use crate::invalid_table;

/// A single column of a table.
///
/// Column types are decided once at the table boundary; only `Numeric`
/// columns are ever filtered.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Real-valued samples
    Numeric(Vec<f64>),
    /// Anything that did not parse as a number
    Text(Vec<String>),
}

impl Column {
    /// Number of rows in the column
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    /// Samples of a numeric column
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Column::Numeric(values) => Some(values),
            Column::Text(_) => None,
        }
    }

    /// Short type name for logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            Column::Numeric(_) => "numeric",
            Column::Text(_) => "text",
        }
    }

    /// Cell at `row` rendered for tabular output
    ///
    /// Non-finite numbers render as an empty cell.
    pub fn cell(&self, row: usize) -> String {
        match self {
            Column::Numeric(values) => {
                let v = values[row];
                if v.is_finite() {
                    v.to_string()
                } else {
                    String::new()
                }
            }
            Column::Text(values) => values[row].clone(),
        }
    }
}

/// Ordered collection of uniquely named columns with a common row count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<(String, Column)>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, keeping names unique and row counts equal
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) -> ZpfResult<()> {
        let name = name.into();

        if self.column(&name).is_some() {
            return Err(invalid_table!("duplicate column '{}'", name));
        }

        if let Some(rows) = self.row_count() {
            if column.len() != rows {
                return Err(invalid_table!(
                    "column '{}' has {} rows, table has {}",
                    name,
                    column.len(),
                    rows
                ));
            }
        }

        self.columns.push((name, column));
        Ok(())
    }

    /// Builder-style `push_column`
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> ZpfResult<Self> {
        self.push_column(name, column)?;
        Ok(self)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// Columns in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }

    /// Column names in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Shared row count, `None` for a table without columns
    pub fn row_count(&self) -> Option<usize> {
        self.columns.first().map(|(_, c)| c.len())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
