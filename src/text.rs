//! Reading raw core tables from disk and writing resampled ones back out.
//!
//! Supported inputs are comma separated `.csv`, tab separated `.txt`, and, with
//! the `excel` feature, `.xlsx` workbooks. Resampled tables are written as CSV
//! into a directory tree laid out by [`OutputLayout`].
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

use crate::batch::Axis;
use crate::table::{SeriesTable, TableError};

/// All the ways reading an input table can fail
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Dataset {0:?} is not a .csv, .xlsx or .txt file, change file type")]
    UnsupportedFileType(PathBuf),
    #[error("Dataset has no header row")]
    MissingHeader,
    #[error("An I/O error occurred: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed delimited text: {0}")]
    Csv(#[from] csv::Error),
    #[cfg(feature = "excel")]
    #[error("Failed to read workbook: {0}")]
    Excel(#[from] calamine::Error),
    #[error("Workbook has no worksheets")]
    EmptyWorkbook,
    #[error(transparent)]
    Table(#[from] TableError),
}

/// All the ways writing resampled output can fail
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("An I/O error occurred: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to draw plot: {0}")]
    Plot(String),
}

/// The kinds of files a raw table can be read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma separated values
    Csv,
    /// A spreadsheet workbook, read from its first worksheet
    Excel,
    /// Tab separated values
    Delimited,
}

impl InputFormat {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension().and_then(OsStr::to_str)?;
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Excel),
            "txt" => Some(Self::Delimited),
            _ => None,
        }
    }

    pub fn delimiter(&self) -> Option<u8> {
        match self {
            InputFormat::Csv => Some(b','),
            InputFormat::Delimited => Some(b'\t'),
            InputFormat::Excel => None,
        }
    }
}

/// Parse one cell, mapping blanks and NaN markers to a missing value.
///
/// Returns `Err(())` when the cell holds text that is not a number.
fn parse_cell(cell: &str) -> Result<Option<f64>, ()> {
    let cell = cell.trim();
    match cell {
        "" | "NaN" | "nan" | "NAN" | "NA" | "N/A" | "na" | "n/a" => Ok(None),
        _ => cell
            .parse::<f64>()
            .map(|v| Some(v).filter(|v| v.is_finite()))
            .map_err(|_| ()),
    }
}

/// Accumulates text cells column by column and keeps only the numeric columns
#[derive(Debug)]
struct ColumnCollector {
    names: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
    numeric: Vec<bool>,
}

impl ColumnCollector {
    fn new(names: Vec<String>) -> Self {
        let n = names.len();
        Self {
            names,
            values: vec![Vec::new(); n],
            numeric: vec![true; n],
        }
    }

    fn push_cell(&mut self, column: usize, cell: &str) {
        if column >= self.names.len() {
            return;
        }
        match parse_cell(cell) {
            Ok(v) => self.values[column].push(v),
            Err(()) => {
                self.numeric[column] = false;
                self.values[column].push(None);
            }
        }
    }

    #[cfg_attr(not(feature = "excel"), allow(dead_code))]
    fn push_value(&mut self, column: usize, value: Option<f64>) {
        if let Some(values) = self.values.get_mut(column) {
            values.push(value);
        }
    }

    /// Pad short rows so every column keeps the same length
    fn end_row(&mut self, row: usize) {
        for values in self.values.iter_mut() {
            values.resize(row + 1, None);
        }
    }

    fn finish(self) -> Result<SeriesTable, TableError> {
        let mut table = SeriesTable::new();
        for ((name, values), numeric) in self.names.into_iter().zip(self.values).zip(self.numeric)
        {
            if numeric {
                table.push_column(name, values)?;
            } else {
                warn!("Skipping non-numeric column {name:?}");
            }
        }
        Ok(table)
    }
}

/// Read a delimited text table whose first record is the header.
///
/// Text columns are dropped. Blank cells and NaN markers become missing values.
pub fn read_delimited<R: io::Read>(reader: R, delimiter: u8) -> Result<SeriesTable, ReadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let names: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if names.is_empty() || names.iter().all(|n| n.is_empty()) {
        return Err(ReadError::MissingHeader);
    }
    let mut collector = ColumnCollector::new(names);
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        for (column, cell) in record.iter().enumerate() {
            collector.push_cell(column, cell);
        }
        collector.end_row(row);
    }
    Ok(collector.finish()?)
}

#[cfg(feature = "excel")]
fn read_workbook(path: &Path) -> Result<SeriesTable, ReadError> {
    use calamine::{open_workbook_auto, Data, Reader};

    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ReadError::EmptyWorkbook)??;
    let mut rows = range.rows();
    let names: Vec<String> = rows
        .next()
        .ok_or(ReadError::MissingHeader)?
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();
    let mut collector = ColumnCollector::new(names);
    for (row, cells) in rows.enumerate() {
        for (column, cell) in cells.iter().enumerate() {
            match cell {
                Data::Float(v) => collector.push_value(column, Some(*v)),
                Data::Int(v) => collector.push_value(column, Some(*v as f64)),
                Data::Empty => collector.push_value(column, None),
                other => collector.push_cell(column, &other.to_string()),
            }
        }
        collector.end_row(row);
    }
    Ok(collector.finish()?)
}

#[cfg(not(feature = "excel"))]
fn read_workbook(path: &Path) -> Result<SeriesTable, ReadError> {
    warn!("Reading spreadsheets requires the `excel` feature");
    Err(ReadError::UnsupportedFileType(path.to_path_buf()))
}

/// Read the table stored at `path`, picking the format from its extension
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<SeriesTable, ReadError> {
    let path = path.as_ref();
    let format = InputFormat::from_path(path)
        .ok_or_else(|| ReadError::UnsupportedFileType(path.to_path_buf()))?;
    debug!("Reading {} as {format:?}", path.display());
    match format.delimiter() {
        Some(delimiter) => read_delimited(io::BufReader::new(fs::File::open(path)?), delimiter),
        None => read_workbook(path),
    }
}

/// Write `table` as CSV with a header row. Missing values are written as empty fields.
pub fn write_table_csv<W: io::Write>(table: &SeriesTable, writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(table.names())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|v| match v {
            Some(v) => format!("{v:?}"),
            None => String::new(),
        }))?;
    }
    writer.flush()?;
    Ok(())
}

/// Format an increment the way it appears in output paths, e.g. `2.0` or `0.5`
pub fn format_increment(increment: f64) -> String {
    format!("{increment:?}")
}

/// Where the files for each resampled combination go.
///
/// The layout is `<root>/<stem>/Resampled_by_<Axis>/<increment>/<stem>_<column>_r<increment>`,
/// where the last component is a file stem that gets `.csv`, `.svg` and `_log.svg` appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub stem: String,
}

impl OutputLayout {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(root: P, stem: S) -> Self {
        Self {
            root: root.into(),
            stem: stem.into(),
        }
    }

    /// Build a layout rooted at `root` named after the input file at `input`
    pub fn for_input<P: Into<PathBuf>>(root: P, input: &Path) -> Self {
        let stem = input
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or("resampled")
            .to_string();
        Self::new(root, stem)
    }

    pub fn directory(&self, axis: Axis, increment: f64) -> PathBuf {
        self.root
            .join(&self.stem)
            .join(format!("Resampled_by_{}", axis.name()))
            .join(format_increment(increment))
    }

    /// The output file stem for one combination, without creating anything
    pub fn file_stem(&self, axis: Axis, column: &str, increment: f64) -> PathBuf {
        let name = format!(
            "{}_{}_r{}",
            self.stem,
            column.replace(' ', "_"),
            format_increment(increment)
        );
        self.directory(axis, increment).join(name)
    }

    /// Like [`OutputLayout::file_stem`], creating the directories leading to it
    pub fn create(&self, axis: Axis, column: &str, increment: f64) -> io::Result<PathBuf> {
        fs::create_dir_all(self.directory(axis, increment))?;
        Ok(self.file_stem(axis, column, increment))
    }
}

/// Append `suffix` to the final component of `stem`
pub fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut name = stem.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Write the CSV for one resampled table under `stem`, returning the path written
pub fn write_output_csv(table: &SeriesTable, stem: &Path) -> Result<PathBuf, OutputError> {
    let path = with_suffix(stem, ".csv");
    let file = fs::File::create(&path)?;
    write_table_csv(table, io::BufWriter::new(file))?;
    Ok(path)
}
