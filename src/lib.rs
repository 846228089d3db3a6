//! `icecore_resample` is a library for re-binning unevenly spaced ice core
//! measurements onto a fixed depth or age increment.
//!
//! The binning engine in [`crate::resample`] averages every raw sample that falls
//! inside the window around each grid point. Where the raw record becomes too
//! sparse for the requested increment, the run of empty windows it leaves behind
//! is picked up by [`SparseRegionDetector`], and the resampled series is truncated
//! there.
//!
//! When a whole file has to be resampled by several key columns and increments,
//! [`crate::batch`] resolves the key columns from a [`ResampleBy`] mode and runs
//! each combination independently.
//!
//! # Usage
//! ```
//! use icecore_resample::{Resampler, SeriesTable};
//!
//! let depth: Vec<Option<f64>> = (0..=10).map(|i| Some(i as f64)).collect();
//! let sodium: Vec<Option<f64>> = (1..=11).map(|i| Some(i as f64)).collect();
//! let table = SeriesTable::from_columns([("depth", depth), ("Na", sodium)]).unwrap();
//!
//! let outcome = Resampler::default().run(&table, "depth", 2.0).unwrap();
//! assert_eq!(outcome.cutoff, None);
//! assert_eq!(
//!     outcome.table.column("Na").unwrap(),
//!     &[Some(11.0), Some(9.5), Some(7.5), Some(5.5), Some(3.5), Some(1.5)]
//! );
//! ```
//! ## Features
//! - `parallelism` (default) aggregates windows and batch jobs with `rayon`.
//! - `plot` (default) draws raw vs. resampled overlays as SVG with `plotters`.
//! - `excel` reads `.xlsx` workbooks with `calamine`.
//! - `serde` derives `Serialize` and `Deserialize` for the public data types.
pub mod arrayops;
pub mod batch;
#[cfg(feature = "plot")]
pub mod plot;
pub mod resample;
pub mod search;
pub mod sparse;
pub mod table;
pub mod text;

#[cfg(test)]
mod test_data;

pub use crate::batch::{plan_batch, run_batch, Axis, BatchJob, BatchResult, ResampleBy};
pub use crate::resample::{
    resample, ResampleError, ResampleOutcome, Resampled, Resampler, ResamplerBuilder,
    ResultOrder,
};
pub use crate::sparse::{find_cutoff, RunCounting, SparseRegionDetector};
pub use crate::table::{SeriesTable, TableError};
