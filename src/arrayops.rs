//! Small numeric helpers shared by the binning engine and the sparse-region detector.
use num_traits::{Float, FromPrimitive, ToPrimitive};

/// Build an evenly spaced grid from `start` to `end` (inclusive) with spacing `step`.
///
/// Points are computed as `start + i * step` from an integer counter rather than by
/// repeated addition, so the grid does not drift over many steps. The step count
/// tolerates a few ULPs of rounding in `(end - start) / step`. A final point that
/// lands past `end` by a rounding-sized amount is clamped onto `end`; one that lands
/// further out is dropped.
///
/// Returns an empty grid when `step` is not a positive finite number or when `end < start`.
pub fn gridspace<T: Float + ToPrimitive>(start: T, end: T, step: T) -> Vec<T> {
    if !(step > T::zero()) || !step.is_finite() || !start.is_finite() || !end.is_finite() {
        return Vec::new();
    }
    if end < start {
        return Vec::new();
    }
    let ulps = T::from(4.0).unwrap() * T::epsilon();
    let span = (end - start) / step;
    let steps = match (span + span * ulps).floor().to_usize() {
        Some(steps) => steps,
        None => return Vec::new(),
    };
    let overshoot = ulps * start.abs().max(end.abs()).max(step);
    let mut result = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let point = start + T::from(i).unwrap() * step;
        if point <= end {
            result.push(point);
        } else if point - end <= overshoot {
            result.push(end);
        } else {
            break;
        }
    }
    result
}

pub fn _isclose<T>(x: T, y: T, rtol: T, atol: T) -> bool
where
    T: Float,
{
    (x - y).abs() <= (atol + rtol * y.abs())
}

/// Whether `x` and `y` are equal up to a relative tolerance of `1e-9`
pub fn isclose<T>(x: T, y: T) -> bool
where
    T: Float + FromPrimitive,
{
    _isclose(x, y, T::from_f64(1e-9).unwrap(), T::from_f64(1e-12).unwrap())
}

/// The smallest and largest finite values in `values`, skipping missing entries.
pub fn minmax_finite<'a, I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = &'a Option<f64>>,
{
    values
        .into_iter()
        .filter_map(|v| v.filter(|v| v.is_finite()))
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}

/// Accumulates a mean over present values, ignoring missing ones.
#[derive(Debug, Default, Clone, Copy)]
pub struct MeanAccumulator {
    total: f64,
    count: usize,
}

impl MeanAccumulator {
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.total += v;
            self.count += 1;
        }
    }

    /// The mean of the values seen so far, or `None` if there were none
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.total / self.count as f64)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_gridspace_inclusive() {
        let grid = gridspace(0.0, 10.0, 2.0);
        assert_eq!(grid, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);

        let grid = gridspace(0.0, 9.0, 2.0);
        assert_eq!(grid, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_gridspace_no_drift() {
        let grid = gridspace(0.0, 100.0, 0.1);
        assert_eq!(grid.len(), 1001);
        assert_eq!(*grid.last().unwrap(), 100.0);
        for (i, x) in grid.iter().enumerate() {
            assert!(*x <= 100.0);
            assert!((x - i as f64 * 0.1).abs() < 1e-9);
        }
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_gridspace_degenerate_step(#[case] step: f64) {
        assert!(gridspace(0.0, 10.0, step).is_empty());
    }

    #[test]
    fn test_gridspace_single_point() {
        assert_eq!(gridspace(5.0, 5.0, 1.0), vec![5.0]);
        assert_eq!(gridspace(5.0, 5.5, 1.0), vec![5.0]);
        assert!(gridspace(5.0, 4.0, 1.0).is_empty());
    }

    #[test]
    fn test_minmax_finite() {
        let values = vec![Some(3.0), None, Some(-2.5), Some(f64::NAN), Some(7.0)];
        assert_eq!(minmax_finite(&values), Some((-2.5, 7.0)));
        let values: Vec<Option<f64>> = vec![None, None];
        assert_eq!(minmax_finite(&values), None);
    }

    #[test]
    fn test_mean_accumulator() {
        let mut acc = MeanAccumulator::default();
        assert_eq!(acc.mean(), None);
        [Some(1.0), None, Some(3.0)].into_iter().for_each(|v| acc.push(v));
        assert_eq!(acc.mean(), Some(2.0));
    }

    #[test]
    fn test_gridspace_long_grid_keeps_step() {
        let step = 1.000000001;
        let grid = gridspace(0.0, 1_000_000.0, step);
        assert_eq!(grid.len(), 1_000_000);
        let n = grid.len();
        assert!(grid[n - 1] <= 1_000_000.0);
        assert!((grid[n - 1] - grid[n - 2] - step).abs() < 1e-6);
    }

    #[test]
    fn test_gridspace_rounded_end_is_kept() {
        let grid = gridspace(0.0, 3.0, 0.1);
        assert_eq!(grid.len(), 31);
        assert_eq!(*grid.last().unwrap(), 3.0);
        let grid = gridspace(0.0, 1.0, 0.3);
        assert_eq!(grid.len(), 4);
        assert!((grid[3] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_isclose() {
        assert!(isclose(0.1 + 0.2, 0.3));
        assert!(!isclose(1.0, 1.001));
    }
}
