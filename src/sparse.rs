//! Detect where a resampled series runs out of raw data.
//!
//! Where raw samples thin out, a fine increment produces runs of empty windows.
//! [`SparseRegionDetector`] scans the empty-window grid points from the highest
//! key downward and reports the grid point at which a run of consecutive empty
//! windows becomes long enough. Truncation then keeps the rows keyed at or above
//! that cutoff, including the cutoff row, and drops everything below it.
use std::fmt;
use std::str::FromStr;

use log::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::arrayops::isclose;
use crate::batch::ModeError;

/// The number of consecutive single-step empty windows that ends a series
pub const DEFAULT_RUN_LENGTH: usize = 5;

/// How the run counter treats a pair of empty windows that are not adjacent
/// on the grid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RunCounting {
    /// A gap between empty windows resets the counter, so only a true run of
    /// consecutive empty windows triggers a cutoff.
    #[default]
    Reset,
    /// The counter never resets, and every adjacent pair is scanned. Any
    /// `run_length` single-step pairs trigger a cutoff, even when populated
    /// windows separate them.
    Persist,
}

impl fmt::Display for RunCounting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunCounting::Reset => write!(f, "reset"),
            RunCounting::Persist => write!(f, "persist"),
        }
    }
}

impl FromStr for RunCounting {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reset" => Ok(Self::Reset),
            "persist" => Ok(Self::Persist),
            _ => Err(ModeError::UnknownRunCounting(s.to_string())),
        }
    }
}

/// Finds the cutoff boundary of a resampled series from its empty windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SparseRegionDetector {
    /// How many consecutive single-step pairs of empty windows end the series
    pub run_length: usize,
    pub counting: RunCounting,
}

impl Default for SparseRegionDetector {
    fn default() -> Self {
        Self {
            run_length: DEFAULT_RUN_LENGTH,
            counting: RunCounting::default(),
        }
    }
}

impl SparseRegionDetector {
    pub fn new(run_length: usize, counting: RunCounting) -> Self {
        Self {
            run_length,
            counting,
        }
    }

    /// Scan `empty_windows`, given in ascending grid order, from the highest key
    /// downward and return the grid point at which the run counter reaches
    /// [`SparseRegionDetector::run_length`].
    ///
    /// Two neighbours in the scan count as consecutive when the lower one plus
    /// `increment` equals the higher one. Returns `None` when the counter never
    /// reaches the run length, which is always the case for fewer than two
    /// empty windows.
    pub fn find_cutoff(&self, empty_windows: &[f64], increment: f64) -> Option<f64> {
        if self.run_length == 0 {
            return None;
        }
        let mut z = 0usize;
        let mut scan = empty_windows.iter().rev().copied();
        let mut prev = scan.next()?;
        for cur in scan {
            if isclose(cur + increment, prev) {
                z += 1;
                if z == self.run_length {
                    info!(
                        "Due to decreasing resolution of the data, resampling stops at {cur}"
                    );
                    return Some(cur);
                }
            } else if self.counting == RunCounting::Reset {
                if z > 0 {
                    debug!("Run of {z} empty windows broken at {cur}");
                }
                z = 0;
            }
            prev = cur;
        }
        None
    }
}

/// Find the cutoff boundary using the default [`SparseRegionDetector`]
pub fn find_cutoff(empty_windows: &[f64], increment: f64) -> Option<f64> {
    SparseRegionDetector::default().find_cutoff(empty_windows, increment)
}
