//! In-memory tabular data.
//!
//! A [`Table`] is an ordered set of named columns sharing one row count.
//! Cells keep whether they were numeric, textual or empty in the source so
//! that pass-through fields can be rendered back without inventing values.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use log::debug;

use crate::error::{ConvertError, Result};

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Missing value.
    #[default]
    Empty,
    /// Numeric value.
    Number(f64),
    /// Non-numeric text.
    Text(String),
}

impl Cell {
    /// Classify a raw field. Blank fields and non-finite numbers (`nan`,
    /// `inf`) are missing values.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Self::Number(v),
            Ok(_) => Self::Empty,
            Err(_) => Self::Text(trimmed.to_string()),
        }
    }

    /// Numeric value, if this cell holds a finite number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

/// Named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

/// Ordered collection of equally long named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table from named columns.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::RaggedTable`] if the columns differ in length.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Cell>)>,
        S: Into<String>,
    {
        let columns: Vec<Column> = columns
            .into_iter()
            .map(|(name, cells)| Column {
                name: name.into(),
                cells,
            })
            .collect();

        let n_rows = columns.first().map_or(0, |c| c.cells.len());
        if let Some(bad) = columns.iter().find(|c| c.cells.len() != n_rows) {
            return Err(ConvertError::RaggedTable {
                column: bad.name.clone(),
                expected: n_rows,
                actual: bad.cells.len(),
            });
        }

        Ok(Self { columns, n_rows })
    }

    /// Parse comma-separated text with a header row.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed CSV or rows with a different field count.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];

        for record in rdr.records() {
            let record = record?;
            for (column, field) in cells.iter_mut().zip(record.iter()) {
                column.push(Cell::parse(field));
            }
        }

        Self::from_columns(headers.into_iter().zip(cells))
    }

    /// Load a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let table = Self::from_reader(File::open(path)?)?;
        debug!(
            "Loaded {} columns x {} rows from {}",
            table.n_columns(),
            table.n_rows(),
            path.display()
        );
        Ok(table)
    }

    #[must_use]
    pub const fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[must_use]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in table order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Column with exactly this name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Cell]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.cells.as_slice())
    }
}
