use std::ops::Range;

use num_traits::Float;

/// The first index `i` such that `array[i] >= q`, assuming `array` is sorted ascending
pub fn lower_bound<T: Float>(array: &[T], q: T) -> usize {
    array.partition_point(|x| *x < q)
}

/// Find the index range of the sorted `array` whose values lie in the half-open
/// interval `[lo, hi)`.
pub fn find_between<T: Float>(array: &[T], lo: T, hi: T) -> Range<usize> {
    let start = lower_bound(array, lo);
    let end = start + lower_bound(&array[start..], hi);
    start..end
}
