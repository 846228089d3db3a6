//! Run many resample requests over one raw table.
//!
//! A request names a resample mode ([`ResampleBy`]) and a list of increments. The
//! mode is resolved to concrete key columns by matching column names against the
//! patterns of each [`Axis`], and every (column, increment) combination becomes an
//! independent [`BatchJob`]. A failing job never affects its siblings.
use std::fmt;
use std::str::FromStr;

use log::{info, warn};
use thiserror::Error;

#[cfg(feature = "parallelism")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::resample::{ResampleError, ResampleOutcome, Resampler};
use crate::table::SeriesTable;

/// Failures to interpret a user supplied option string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModeError {
    #[error("{0:?} is not found as year or depth, resample by depth, year or all")]
    UnknownMode(String),
    #[error("{0:?} is not a result order, use ascending or descending")]
    UnknownOrder(String),
    #[error("{0:?} is not a run counting rule, use reset or persist")]
    UnknownRunCounting(String),
}

/// An axis a core can be resampled along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    Depth,
    Year,
}

/// Lower case column name fragments identifying each axis. A column belongs to an
/// axis when its name starts or ends with one of them.
const AXIS_PATTERNS: &[(Axis, &[&str])] = &[
    (Axis::Depth, &["depth"]),
    (Axis::Year, &["year", "age", "time"]),
];

impl Axis {
    pub fn name(&self) -> &'static str {
        match self {
            Axis::Depth => "Depth",
            Axis::Year => "Year",
        }
    }

    pub fn patterns(&self) -> &'static [&'static str] {
        AXIS_PATTERNS
            .iter()
            .find(|(axis, _)| axis == self)
            .map(|(_, patterns)| *patterns)
            .unwrap_or_default()
    }

    /// Whether `column` names a key for this axis, ignoring case
    pub fn matches(&self, column: &str) -> bool {
        let column = column.trim().to_lowercase();
        self.patterns()
            .iter()
            .any(|p| column.starts_with(p) || column.ends_with(p))
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What to resample a table by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResampleBy {
    Depth,
    Year,
    /// Both depth and year
    Both,
}

/// Lower case prefixes of the mode strings accepted for each [`ResampleBy`]
const MODE_PREFIXES: &[(ResampleBy, &[&str])] = &[
    (ResampleBy::Depth, &["depth"]),
    (ResampleBy::Year, &["year", "age", "time"]),
    (ResampleBy::Both, &["all", "both"]),
];

impl ResampleBy {
    /// The axes this mode covers, depth first
    pub fn axes(&self) -> &'static [Axis] {
        match self {
            ResampleBy::Depth => &[Axis::Depth],
            ResampleBy::Year => &[Axis::Year],
            ResampleBy::Both => &[Axis::Depth, Axis::Year],
        }
    }
}

impl fmt::Display for ResampleBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResampleBy::Depth => f.write_str("Depth"),
            ResampleBy::Year => f.write_str("Year"),
            ResampleBy::Both => f.write_str("Year & Depth"),
        }
    }
}

impl FromStr for ResampleBy {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = s.trim().to_lowercase();
        MODE_PREFIXES
            .iter()
            .find(|(_, prefixes)| prefixes.iter().any(|p| mode.starts_with(p)))
            .map(|(by, _)| *by)
            .ok_or_else(|| ModeError::UnknownMode(s.to_string()))
    }
}

/// A concrete key column for one axis
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResolvedColumn {
    pub axis: Axis,
    pub column: String,
}

/// Find the key columns of `table` for every axis of `by`, in column order, depth first.
pub fn resolve_columns(table: &SeriesTable, by: ResampleBy) -> Vec<ResolvedColumn> {
    let mut resolved = Vec::new();
    for axis in by.axes() {
        let before = resolved.len();
        resolved.extend(
            table
                .names()
                .iter()
                .filter(|name| axis.matches(name))
                .map(|name| ResolvedColumn {
                    axis: *axis,
                    column: name.clone(),
                }),
        );
        if resolved.len() == before {
            warn!("No {axis} column found among {:?}", table.names());
        }
    }
    resolved
}

/// One (key column, increment) combination
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BatchJob {
    pub axis: Axis,
    pub column: String,
    pub increment: f64,
}

impl fmt::Display for BatchJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : {} at increment {}",
            self.axis, self.column, self.increment
        )
    }
}

/// Build one [`BatchJob`] per resolved key column and increment
pub fn plan_batch(table: &SeriesTable, by: ResampleBy, increments: &[f64]) -> Vec<BatchJob> {
    resolve_columns(table, by)
        .into_iter()
        .flat_map(|resolved| {
            increments.iter().map(move |increment| BatchJob {
                axis: resolved.axis,
                column: resolved.column.clone(),
                increment: *increment,
            })
        })
        .collect()
}

/// The outcome of one [`BatchJob`]
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub job: BatchJob,
    pub outcome: Result<ResampleOutcome, ResampleError>,
}

impl BatchResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

fn run_job(resampler: &Resampler, table: &SeriesTable, job: &BatchJob) -> BatchResult {
    info!("Resampling by {job}");
    let outcome = resampler.run(table, &job.column, job.increment);
    if let Err(e) = &outcome {
        warn!("Resampling by {job} failed: {e}");
    }
    BatchResult {
        job: job.clone(),
        outcome,
    }
}

// Can't inline cfg-if
cfg_if::cfg_if! {
    if #[cfg(feature = "parallelism")] {
        fn run_batch_inner(resampler: &Resampler, table: &SeriesTable, jobs: &[BatchJob]) -> Vec<BatchResult> {
            jobs.par_iter().map(|job| run_job(resampler, table, job)).collect()
        }
    } else {
        fn run_batch_inner(resampler: &Resampler, table: &SeriesTable, jobs: &[BatchJob]) -> Vec<BatchResult> {
            jobs.iter().map(|job| run_job(resampler, table, job)).collect()
        }
    }
}

/// Run every job against `table`, returning one [`BatchResult`] per job in job order.
pub fn run_batch(resampler: &Resampler, table: &SeriesTable, jobs: &[BatchJob]) -> Vec<BatchResult> {
    run_batch_inner(resampler, table, jobs)
}
