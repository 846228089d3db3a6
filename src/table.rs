//! A column-major table of numeric series with missing values.
//!
//! Every ice core measurement file is loaded into a [`SeriesTable`] before
//! resampling. Cells are `Option<f64>`, where `None` marks a missing value.
use std::fmt;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// All the ways building a [`SeriesTable`] can fail
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("Column {name:?} has {found} values but the table has {expected} rows")]
    ColumnLengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Column {0:?} appears more than once")]
    DuplicateColumn(String),
}

#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeriesTable {
    names: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
}

impl SeriesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, values)` pairs, preserving column order.
    ///
    /// Non-finite values are stored as missing.
    pub fn from_columns<S, I>(columns: I) -> Result<Self, TableError>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Vec<Option<f64>>)>,
    {
        let mut table = Self::new();
        for (name, values) in columns {
            table.push_column(name, values)?;
        }
        Ok(table)
    }

    /// Assemble a table from parts already known to be well formed
    pub(crate) fn from_parts(names: Vec<String>, columns: Vec<Vec<Option<f64>>>) -> Self {
        debug_assert_eq!(names.len(), columns.len());
        debug_assert!(columns.windows(2).all(|w| w[0].len() == w[1].len()));
        Self { names, columns }
    }

    /// Append a column to the right of the table
    pub fn push_column<S: Into<String>>(
        &mut self,
        name: S,
        values: Vec<Option<f64>>,
    ) -> Result<(), TableError> {
        let name = name.into();
        if self.names.iter().any(|n| *n == name) {
            return Err(TableError::DuplicateColumn(name));
        }
        if !self.columns.is_empty() && values.len() != self.len() {
            return Err(TableError::ColumnLengthMismatch {
                expected: self.len(),
                found: values.len(),
                name,
            });
        }
        let values = values
            .into_iter()
            .map(|v| v.filter(|v| v.is_finite()))
            .collect();
        self.names.push(name);
        self.columns.push(values);
        Ok(())
    }

    /// The number of rows
    pub fn len(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn width(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.column_index(name).map(|i| self.columns[i].as_slice())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.names
            .iter()
            .map(|n| n.as_str())
            .zip(self.columns.iter().map(|c| c.as_slice()))
    }

    /// Collect the values of one row, in column order
    pub fn row(&self, row: usize) -> Vec<Option<f64>> {
        self.columns
            .iter()
            .map(|c| c.get(row).copied().flatten())
            .collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<Option<f64>>> + '_ {
        (0..self.len()).map(|i| self.row(i))
    }

    /// Reverse the order of the rows in place
    pub fn reverse_rows(&mut self) {
        self.columns.iter_mut().for_each(|c| c.reverse());
    }

    /// Keep only the rows where `predicate` holds for the value of the `key` column.
    ///
    /// Rows whose key is missing are dropped. Returns the number of rows removed, or
    /// `None` if `key` is not a column of this table.
    pub fn retain_rows_by_key<F>(&mut self, key: &str, predicate: F) -> Option<usize>
    where
        F: Fn(f64) -> bool,
    {
        let key_index = self.column_index(key)?;
        let keep: Vec<bool> = self.columns[key_index]
            .iter()
            .map(|v| v.map(&predicate).unwrap_or(false))
            .collect();
        let before = self.len();
        for column in self.columns.iter_mut() {
            let mut flags = keep.iter();
            column.retain(|_| *flags.next().unwrap_or(&false));
        }
        Some(before - self.len())
    }

    /// Drop every row whose `key` value is below `boundary`. The boundary row is kept.
    pub fn retain_key_at_least(&mut self, key: &str, boundary: f64) -> Option<usize> {
        self.retain_rows_by_key(key, |k| k >= boundary)
    }
}

impl fmt::Display for SeriesTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.names.join("\t"))?;
        for row in self.rows() {
            let cells: Vec<String> = row
                .iter()
                .map(|v| v.map(|v| v.to_string()).unwrap_or_else(|| "NaN".to_string()))
                .collect();
            writeln!(f, "{}", cells.join("\t"))?;
        }
        Ok(())
    }
}
