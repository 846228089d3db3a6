//! Re-bin an unevenly spaced series onto a fixed increment grid by averaging
//! every raw record that falls in each grid point's window.
//!
//! The grid runs from `floor(min(key))` to `floor(max(key))` in steps of the
//! increment. Grid point `g` owns the half-open window
//! `[g - increment / 2, g + increment / 2)`. Each window edge is computed once
//! from the grid counter and shared by the two windows it separates, so windows
//! never overlap or leave gaps and each raw record contributes to at most one
//! output row.
//!
//! ```
//! use icecore_resample::table::SeriesTable;
//! use icecore_resample::resample::resample;
//!
//! let table = SeriesTable::from_columns([
//!     ("depth", vec![Some(0.0), Some(0.4), Some(1.1), Some(2.0)]),
//!     ("Na", vec![Some(2.0), Some(4.0), Some(5.0), Some(7.0)]),
//! ]).unwrap();
//! let resampled = resample(&table, "depth", 1.0).unwrap();
//! assert_eq!(resampled.table.column("depth").unwrap(), &[Some(2.0), Some(1.0), Some(0.0)]);
//! assert_eq!(resampled.table.column("Na").unwrap(), &[Some(7.0), Some(5.0), Some(3.0)]);
//! ```
use std::fmt;
use std::str::FromStr;

use log::{debug, info};
use thiserror::Error;

#[cfg(feature = "parallelism")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::arrayops::{gridspace, minmax_finite, MeanAccumulator};
use crate::batch::ModeError;
use crate::search::find_between;
use crate::sparse::{RunCounting, SparseRegionDetector};
use crate::table::SeriesTable;

/// All the ways a single resample request can fail
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResampleError {
    #[error("{0:?} is not found as a column in the dataset")]
    ColumnNotFound(String),
    #[error("Invalid increment {0}, the increment must be a positive number")]
    InvalidIncrement(f64),
    #[error("Cannot establish resample range, column {0:?} has no numeric values")]
    EmptyRange(String),
    #[error(
        "Increment {increment} would need {points} grid points, more than the limit of {max}",
        max = MAX_GRID_POINTS
    )]
    GridTooLarge { increment: f64, points: f64 },
}

/// The most grid points a single resample request may produce
pub const MAX_GRID_POINTS: usize = 10_000_000;

/// The row order of a resampled table
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResultOrder {
    /// Grid order, lowest key first
    Ascending,
    /// Highest key first. This is the layout the ice core tooling has always
    /// produced, with the deepest/oldest sample on the first row.
    #[default]
    Descending,
}

impl fmt::Display for ResultOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultOrder::Ascending => write!(f, "ascending"),
            ResultOrder::Descending => write!(f, "descending"),
        }
    }
}

impl FromStr for ResultOrder {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Ok(Self::Ascending),
            "descending" | "desc" => Ok(Self::Descending),
            _ => Err(ModeError::UnknownOrder(s.to_string())),
        }
    }
}

/// The binned table along with the grid points whose windows were empty
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Resampled {
    pub table: SeriesTable,
    /// Grid points whose resampled row is entirely missing, in ascending grid order
    pub empty_windows: Vec<f64>,
}

/// A raw table projected onto its key column, sorted by key, with the non-key
/// columns kept in their original order.
struct KeyedRows<'a> {
    keys: Vec<f64>,
    rows: Vec<usize>,
    value_columns: Vec<(&'a str, &'a [Option<f64>])>,
}

impl<'a> KeyedRows<'a> {
    fn new(table: &'a SeriesTable, key: &str) -> Result<Self, ResampleError> {
        let key_values = table
            .column(key)
            .ok_or_else(|| ResampleError::ColumnNotFound(key.to_string()))?;

        let mut pairs: Vec<(f64, usize)> = key_values
            .iter()
            .enumerate()
            .filter_map(|(i, k)| k.filter(|k| k.is_finite()).map(|k| (k, i)))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let (keys, rows) = pairs.into_iter().unzip();

        let value_columns = table.columns().filter(|(name, _)| *name != key).collect();

        Ok(Self {
            keys,
            rows,
            value_columns,
        })
    }

    /// Average every value column over the records whose key lies in `[lo, hi)`.
    ///
    /// Returns the number of records in the window and one mean per value column.
    fn aggregate(&self, lo: f64, hi: f64) -> (usize, Vec<Option<f64>>) {
        let window = find_between(&self.keys, lo, hi);
        let selected = &self.rows[window];
        let means = self
            .value_columns
            .iter()
            .map(|(_, values)| {
                let mut acc = MeanAccumulator::default();
                selected.iter().for_each(|i| acc.push(values[*i]));
                acc.mean()
            })
            .collect();
        (selected.len(), means)
    }
}

/// One aggregated grid point
struct Bin {
    point: f64,
    count: usize,
    means: Vec<Option<f64>>,
}

impl Bin {
    fn is_empty(&self) -> bool {
        self.count == 0 || (!self.means.is_empty() && self.means.iter().all(|m| m.is_none()))
    }
}

fn validate_increment(increment: f64) -> Result<(), ResampleError> {
    if increment.is_finite() && increment > 0.0 {
        Ok(())
    } else {
        Err(ResampleError::InvalidIncrement(increment))
    }
}

/// The grid `resample` would use for `key` at `increment`
pub fn resample_grid(
    table: &SeriesTable,
    key: &str,
    increment: f64,
) -> Result<Vec<f64>, ResampleError> {
    validate_increment(increment)?;
    let key_values = table
        .column(key)
        .ok_or_else(|| ResampleError::ColumnNotFound(key.to_string()))?;
    let (min, max) =
        minmax_finite(key_values).ok_or_else(|| ResampleError::EmptyRange(key.to_string()))?;
    let (top, bot) = (min.floor(), max.floor());
    let points = (bot - top) / increment + 1.0;
    if points > MAX_GRID_POINTS as f64 {
        return Err(ResampleError::GridTooLarge { increment, points });
    }
    Ok(gridspace(top, bot, increment))
}

/// The `grid.len() + 1` window edges around a grid starting at `top`. Window `i`
/// is `[edges[i], edges[i + 1])`.
fn window_edges(top: f64, increment: f64, n: usize) -> Vec<f64> {
    (0..=n)
        .map(|i| top + (i as f64 - 0.5) * increment)
        .collect()
}

fn bin_at(rows: &KeyedRows<'_>, grid: &[f64], edges: &[f64], i: usize) -> Bin {
    let (count, means) = rows.aggregate(edges[i], edges[i + 1]);
    Bin {
        point: grid[i],
        count,
        means,
    }
}

fn bin_serial(rows: &KeyedRows<'_>, grid: &[f64], increment: f64) -> Vec<Bin> {
    let Some(top) = grid.first().copied() else {
        return Vec::new();
    };
    let edges = window_edges(top, increment, grid.len());
    (0..grid.len())
        .map(|i| bin_at(rows, grid, &edges, i))
        .collect()
}

#[cfg(feature = "parallelism")]
fn bin_parallel(rows: &KeyedRows<'_>, grid: &[f64], increment: f64) -> Vec<Bin> {
    let Some(top) = grid.first().copied() else {
        return Vec::new();
    };
    let edges = window_edges(top, increment, grid.len());
    (0..grid.len())
        .into_par_iter()
        .map(|i| bin_at(rows, grid, &edges, i))
        .collect()
}

fn assemble(key: &str, rows: &KeyedRows<'_>, bins: Vec<Bin>, order: ResultOrder) -> Resampled {
    let empty_windows: Vec<f64> = bins
        .iter()
        .filter(|b| b.is_empty())
        .map(|b| b.point)
        .collect();

    let n = bins.len();
    let mut key_column = Vec::with_capacity(n);
    let mut value_columns: Vec<Vec<Option<f64>>> = rows
        .value_columns
        .iter()
        .map(|_| Vec::with_capacity(n))
        .collect();
    for bin in bins {
        key_column.push(Some(bin.point));
        for (column, mean) in value_columns.iter_mut().zip(bin.means) {
            column.push(mean);
        }
    }

    let names = std::iter::once(key.to_string())
        .chain(rows.value_columns.iter().map(|(name, _)| name.to_string()))
        .collect();
    let columns = std::iter::once(key_column).chain(value_columns).collect();
    // Names come from an existing table and every column has one value per grid point
    let mut table = SeriesTable::from_parts(names, columns);
    if order == ResultOrder::Descending {
        table.reverse_rows();
    }
    debug!(
        "Resampled {} records by {key} onto {n} grid points, {} empty",
        rows.keys.len(),
        empty_windows.len()
    );
    Resampled {
        table,
        empty_windows,
    }
}

/// Resample `table` onto a grid over `key` with spacing `increment`, in the
/// requested row `order`.
pub fn resample_ordered(
    table: &SeriesTable,
    key: &str,
    increment: f64,
    order: ResultOrder,
) -> Result<Resampled, ResampleError> {
    let grid = resample_grid(table, key, increment)?;
    let rows = KeyedRows::new(table, key)?;
    let bins = bin_serial(&rows, &grid, increment);
    Ok(assemble(key, &rows, bins, order))
}

/// Resample `table` onto a grid over `key` with spacing `increment`.
///
/// The result is in [`ResultOrder::Descending`] order, while
/// [`Resampled::empty_windows`] stays in ascending grid order.
pub fn resample(
    table: &SeriesTable,
    key: &str,
    increment: f64,
) -> Result<Resampled, ResampleError> {
    resample_ordered(table, key, increment, ResultOrder::default())
}

/// Like [`resample_ordered`], but aggregates the windows on the rayon thread pool.
#[cfg(feature = "parallelism")]
pub fn resample_parallel(
    table: &SeriesTable,
    key: &str,
    increment: f64,
    order: ResultOrder,
) -> Result<Resampled, ResampleError> {
    let grid = resample_grid(table, key, increment)?;
    let rows = KeyedRows::new(table, key)?;
    let bins = bin_parallel(&rows, &grid, increment);
    Ok(assemble(key, &rows, bins, order))
}

// Can't inline cfg-if
cfg_if::cfg_if! {
    if #[cfg(feature = "parallelism")] {
        fn resample_with(
            table: &SeriesTable,
            key: &str,
            increment: f64,
            order: ResultOrder,
            parallel: bool,
        ) -> Result<Resampled, ResampleError> {
            if parallel {
                resample_parallel(table, key, increment, order)
            } else {
                resample_ordered(table, key, increment, order)
            }
        }
    } else {
        fn resample_with(
            table: &SeriesTable,
            key: &str,
            increment: f64,
            order: ResultOrder,
            _parallel: bool,
        ) -> Result<Resampled, ResampleError> {
            resample_ordered(table, key, increment, order)
        }
    }
}

/// The result of a full resample-detect-truncate cycle
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResampleOutcome {
    /// The key column the table was resampled by
    pub key: String,
    pub increment: f64,
    /// The resampled table, already truncated at [`ResampleOutcome::cutoff`]
    pub table: SeriesTable,
    pub cutoff: Option<f64>,
    /// Grid points whose windows were empty, in ascending grid order, before truncation
    pub empty_windows: Vec<f64>,
}

/// Resamples tables and truncates them where the raw data becomes too sparse
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Resampler {
    pub order: ResultOrder,
    pub detector: SparseRegionDetector,
    /// Aggregate windows in parallel when the `parallelism` feature is enabled
    pub parallel: bool,
}

/// A builder for configuring [`Resampler`]
#[derive(Debug, Clone, Default)]
pub struct ResamplerBuilder {
    order: ResultOrder,
    detector: SparseRegionDetector,
    parallel: bool,
}

impl ResamplerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order(&mut self, order: ResultOrder) -> &mut Self {
        self.order = order;
        self
    }

    pub fn run_length(&mut self, run_length: usize) -> &mut Self {
        self.detector.run_length = run_length;
        self
    }

    pub fn run_counting(&mut self, counting: RunCounting) -> &mut Self {
        self.detector.counting = counting;
        self
    }

    pub fn parallel(&mut self, parallel: bool) -> &mut Self {
        self.parallel = parallel;
        self
    }

    pub fn build(self) -> Resampler {
        Resampler::new(self.order, self.detector, self.parallel)
    }
}

impl From<ResamplerBuilder> for Resampler {
    fn from(value: ResamplerBuilder) -> Self {
        value.build()
    }
}

impl Resampler {
    pub fn new(order: ResultOrder, detector: SparseRegionDetector, parallel: bool) -> Self {
        Self {
            order,
            detector,
            parallel,
        }
    }

    pub fn builder() -> ResamplerBuilder {
        ResamplerBuilder::new()
    }

    /// Bin `table` by `key` at `increment` without looking for a cutoff
    pub fn resample(
        &self,
        table: &SeriesTable,
        key: &str,
        increment: f64,
    ) -> Result<Resampled, ResampleError> {
        resample_with(table, key, increment, self.order, self.parallel)
    }

    /// Resample `table` by `key` at `increment`, then keep only the rows keyed at
    /// or above the cutoff found in the empty windows. The cutoff row itself is
    /// kept.
    pub fn run(
        &self,
        table: &SeriesTable,
        key: &str,
        increment: f64,
    ) -> Result<ResampleOutcome, ResampleError> {
        let Resampled {
            mut table,
            empty_windows,
        } = self.resample(table, key, increment)?;
        let cutoff = self.detector.find_cutoff(&empty_windows, increment);
        if let Some(cutoff) = cutoff {
            let dropped = table.retain_key_at_least(key, cutoff).unwrap_or_default();
            info!("Not able to resample {key} below {cutoff}, dropped {dropped} rows");
        }
        Ok(ResampleOutcome {
            key: key.to_string(),
            increment,
            table,
            cutoff,
            empty_windows,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_data::{gapped_core, low_gap_core, series};
    use rstest::rstest;

    fn evenly_spaced() -> SeriesTable {
        series(
            (0..=10).map(|i| i as f64).collect(),
            (1..=11).map(|i| i as f64).collect(),
        )
    }

    #[test]
    fn test_scenario_increment_two() {
        let table = evenly_spaced();
        let result = resample_ordered(&table, "depth", 2.0, ResultOrder::Ascending).unwrap();
        let keys: Vec<f64> = result
            .table
            .column("depth")
            .unwrap()
            .iter()
            .map(|v| v.unwrap())
            .collect();
        assert_eq!(keys, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        let means: Vec<f64> = result
            .table
            .column("Na")
            .unwrap()
            .iter()
            .map(|v| v.unwrap())
            .collect();
        assert_eq!(means, vec![1.5, 3.5, 5.5, 7.5, 9.5, 11.0]);
        assert!(result.empty_windows.is_empty());

        let outcome = Resampler::default().run(&table, "depth", 2.0).unwrap();
        assert_eq!(outcome.cutoff, None);
        assert_eq!(outcome.table.len(), 6);
    }

    #[test]
    fn test_descending_by_default() {
        let table = evenly_spaced();
        let result = resample(&table, "depth", 2.0).unwrap();
        assert_eq!(
            result.table.column("depth").unwrap(),
            &[Some(10.0), Some(8.0), Some(6.0), Some(4.0), Some(2.0), Some(0.0)]
        );
        assert_eq!(result.table.names(), &["depth".to_string(), "Na".to_string()]);
    }

    #[rstest]
    #[case(0.5)]
    #[case(1.0)]
    #[case(3.0)]
    #[case(0.1)]
    fn test_grid_coverage(#[case] increment: f64) {
        let table = series(
            vec![0.3, 1.7, 2.2, 5.9, 7.05, 9.99],
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        );
        let grid = resample_grid(&table, "depth", increment).unwrap();
        assert_eq!(grid[0], 0.0);
        for pair in grid.windows(2) {
            assert!((pair[1] - pair[0] - increment).abs() < 1e-9);
        }
        assert!(grid.iter().all(|g| *g >= 0.0 && *g <= 9.0));
        assert!(9.0 - grid.last().unwrap() < increment);
    }

    #[rstest]
    #[case(0.05)]
    #[case(0.1)]
    #[case(0.3)]
    #[case(0.7)]
    fn test_windows_partition_records(#[case] increment: f64) {
        // Multiples of 0.05 up to 10, all inside the outermost window edges
        let keys: Vec<f64> = (0..=200).map(|i| i as f64 * 0.05).collect();
        let values: Vec<f64> = (0..=200).map(|i| i as f64).collect();
        let table = series(keys.clone(), values);
        let grid = resample_grid(&table, "depth", increment).unwrap();
        let rows = KeyedRows::new(&table, "depth").unwrap();
        let bins = bin_serial(&rows, &grid, increment);
        assert_eq!(bins.len(), grid.len());
        let counted: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(counted, keys.len());
    }

    #[test]
    fn test_record_on_rounded_edge_lands_in_one_window() {
        let table = series(vec![0.0, 0.25, 1.0], vec![1.0, 2.0, 3.0]);
        let result = resample_ordered(&table, "depth", 0.1, ResultOrder::Ascending).unwrap();
        let na = result.table.column("Na").unwrap();
        assert_eq!(na.len(), 11);
        assert_eq!(na.iter().filter(|v| **v == Some(2.0)).count(), 1);
        assert_eq!(na[3], Some(2.0));
        assert_eq!(result.empty_windows.len(), 8);

        let table = series(vec![0.0, 0.7499999999999999, 1.0], vec![1.0, 2.0, 3.0]);
        let result = resample_ordered(&table, "depth", 0.3, ResultOrder::Ascending).unwrap();
        assert_eq!(
            result.table.column("Na").unwrap(),
            &[Some(1.0), None, Some(2.0), Some(3.0)]
        );
        assert_eq!(result.empty_windows, vec![0.3]);
    }

    #[test]
    fn test_single_record_window_is_exact() {
        let table = SeriesTable::from_columns([
            ("depth", vec![Some(0.0), Some(5.0), Some(10.0)]),
            ("Na", vec![Some(0.123456789), Some(4.2), Some(-3.5)]),
            ("Cl", vec![Some(7.0), None, Some(1.0)]),
        ])
        .unwrap();
        let result = resample_ordered(&table, "depth", 5.0, ResultOrder::Ascending).unwrap();
        assert_eq!(result.table.row(0), vec![Some(0.0), Some(0.123456789), Some(7.0)]);
        assert_eq!(result.table.row(1), vec![Some(5.0), Some(4.2), None]);
        assert_eq!(result.table.row(2), vec![Some(10.0), Some(-3.5), Some(1.0)]);
        assert!(result.empty_windows.is_empty());
    }

    #[test]
    fn test_empty_windows_are_listed_ascending() {
        let table = series(vec![0.0, 1.0, 5.0, 6.0], vec![1.0, 2.0, 3.0, 4.0]);
        let result = resample(&table, "depth", 1.0).unwrap();
        assert_eq!(result.empty_windows, vec![2.0, 3.0, 4.0]);
        // Descending layout: 6, 5, 4, 3, 2, 1, 0
        for row in 2..5 {
            assert_eq!(result.table.row(row)[1], None);
        }
        assert_eq!(result.table.len(), 7);
    }

    #[test]
    fn test_missing_values_are_excluded_from_mean() {
        let table = SeriesTable::from_columns([
            ("depth", vec![Some(0.0), Some(0.2), None, Some(0.4)]),
            ("Na", vec![Some(1.0), None, Some(100.0), Some(3.0)]),
            ("Cl", vec![None, None, Some(5.0), None]),
        ])
        .unwrap();
        let result = resample(&table, "depth", 1.0).unwrap();
        assert_eq!(result.table.len(), 1);
        assert_eq!(result.table.row(0), vec![Some(0.0), Some(2.0), None]);
        assert!(result.empty_windows.is_empty());
    }

    #[test]
    fn test_already_gridded_is_unchanged() {
        let keys: Vec<f64> = (0..20).map(|i| 100.0 + i as f64 * 2.0).collect();
        let values: Vec<f64> = (0..20).map(|i| (i as f64).sqrt()).collect();
        let table = series(keys, values);
        let result = resample_ordered(&table, "depth", 2.0, ResultOrder::Ascending).unwrap();
        assert_eq!(result.table, table);
        assert!(result.empty_windows.is_empty());
    }

    fn keys_of(table: &SeriesTable) -> Vec<f64> {
        table
            .column("depth")
            .unwrap()
            .iter()
            .map(|v| v.unwrap())
            .collect()
    }

    #[test]
    fn test_low_end_gap_keeps_cutoff_and_above() {
        let table = low_gap_core();
        let outcome = Resampler::default().run(&table, "depth", 1.0).unwrap();
        assert_eq!(outcome.empty_windows, (1..=9).map(|i| i as f64).collect::<Vec<_>>());
        // Scanning down from 9, the fifth consecutive step lands on 4.
        assert_eq!(outcome.cutoff, Some(4.0));
        assert_eq!(
            keys_of(&outcome.table),
            (4..=20).rev().map(|i| i as f64).collect::<Vec<_>>()
        );
        let cutoff_row = outcome.table.row(outcome.table.len() - 1);
        assert_eq!(cutoff_row, vec![Some(4.0), None]);
        assert_eq!(outcome.table.row(0), vec![Some(20.0), Some(19.75)]);
    }

    #[test]
    fn test_cutoff_keeps_rows_from_cutoff_up() {
        let table = gapped_core();
        let outcome = Resampler::default().run(&table, "depth", 1.0).unwrap();
        // Populated 0..=20, empty 21..=29, one last sample at 30. The populated
        // section lies below the cutoff and is dropped.
        assert_eq!(outcome.empty_windows, (21..=29).map(|i| i as f64).collect::<Vec<_>>());
        assert_eq!(outcome.cutoff, Some(24.0));
        assert_eq!(
            keys_of(&outcome.table),
            (24..=30).rev().map(|i| i as f64).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_errors() {
        let table = evenly_spaced();
        assert_eq!(
            resample(&table, "age", 1.0).unwrap_err(),
            ResampleError::ColumnNotFound("age".into())
        );
        assert_eq!(
            resample(&table, "depth", 0.0).unwrap_err(),
            ResampleError::InvalidIncrement(0.0)
        );
        assert!(matches!(
            resample(&table, "depth", -2.0).unwrap_err(),
            ResampleError::InvalidIncrement(_)
        ));

        let table = SeriesTable::from_columns([
            ("depth", vec![None, Some(f64::NAN)]),
            ("Na", vec![Some(1.0), Some(2.0)]),
        ])
        .unwrap();
        assert_eq!(
            resample(&table, "depth", 1.0).unwrap_err(),
            ResampleError::EmptyRange("depth".into())
        );
        assert_eq!(
            resample(&SeriesTable::new(), "depth", 1.0).unwrap_err(),
            ResampleError::ColumnNotFound("depth".into())
        );
    }

    #[test]
    fn test_grid_too_large() {
        let table = series(vec![0.0, 1000.0], vec![1.0, 2.0]);
        assert!(matches!(
            resample(&table, "depth", 1e-12).unwrap_err(),
            ResampleError::GridTooLarge { .. }
        ));
        assert!(resample_grid(&table, "depth", 1e-12).is_err());
        assert_eq!(resample_grid(&table, "depth", 1.0).unwrap().len(), 1001);
    }

    #[test]
    fn test_key_only_table() {
        let table =
            SeriesTable::from_columns([("depth", vec![Some(0.0), Some(3.0)])]).unwrap();
        let result = resample(&table, "depth", 1.0).unwrap();
        assert_eq!(result.empty_windows, vec![1.0, 2.0]);
    }

    #[test]
    #[cfg(feature = "parallelism")]
    fn test_parallel_matches_serial() {
        let table = gapped_core();
        for order in [ResultOrder::Ascending, ResultOrder::Descending] {
            let serial = resample_ordered(&table, "depth", 0.5, order).unwrap();
            let parallel = resample_parallel(&table, "depth", 0.5, order).unwrap();
            assert_eq!(serial, parallel);
        }
    }

    #[test]
    fn test_builder() {
        let mut builder = Resampler::builder();
        builder
            .order(ResultOrder::Ascending)
            .run_length(3)
            .run_counting(RunCounting::Persist);
        let resampler: Resampler = builder.into();
        assert_eq!(resampler.order, ResultOrder::Ascending);
        assert_eq!(resampler.detector.run_length, 3);
        assert_eq!(resampler.detector.counting, RunCounting::Persist);
        assert!(!resampler.parallel);

        let outcome = resampler.run(&gapped_core(), "depth", 1.0).unwrap();
        assert_eq!(outcome.cutoff, Some(26.0));
        assert_eq!(
            outcome.table.column("depth").unwrap().first().copied().flatten(),
            Some(26.0)
        );
    }

    #[test]
    fn test_parse_order() {
        assert_eq!("ASC".parse::<ResultOrder>().unwrap(), ResultOrder::Ascending);
        assert_eq!("descending".parse::<ResultOrder>().unwrap(), ResultOrder::Descending);
        assert!("sideways".parse::<ResultOrder>().is_err());
    }
}
