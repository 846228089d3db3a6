//! Synthetic ice core tables for tests.
use crate::table::SeriesTable;

/// A two column table, `depth` and `Na`
pub fn series(keys: Vec<f64>, values: Vec<f64>) -> SeriesTable {
    SeriesTable::from_columns([
        ("depth", keys.into_iter().map(Some).collect::<Vec<_>>()),
        ("Na", values.into_iter().map(Some).collect()),
    ])
    .unwrap()
}

/// Samples every half metre from 0 to 20 m, then a single sample at 30 m.
pub fn gapped_core() -> SeriesTable {
    let mut keys: Vec<f64> = (0..=40).map(|i| i as f64 * 0.5).collect();
    keys.push(30.0);
    let values = keys.iter().map(|k| 10.0 + k.sin()).collect();
    series(keys, values)
}

/// One sample at 0 m, nothing until 10 m, then a sample every half metre to 20 m.
/// Values equal depth.
pub fn low_gap_core() -> SeriesTable {
    let mut keys = vec![0.0];
    keys.extend((20..=40).map(|i| i as f64 * 0.5));
    let values = keys.clone();
    series(keys, values)
}

/// A core with depth, age and two chemistry columns, where resolution
/// degrades with depth.
pub fn ice_core() -> SeriesTable {
    let mut depth = Vec::new();
    let mut x = 0.0;
    while x < 60.0 {
        depth.push(x);
        x += if x < 30.0 { 0.25 } else { 3.5 };
    }
    let year: Vec<f64> = depth.iter().map(|d| 2018.0 - d * 12.5).collect();
    let na: Vec<Option<f64>> = depth
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 7 == 3 { None } else { Some(5.0 + d.cos()) })
        .collect();
    let cl: Vec<f64> = depth.iter().map(|d| 2.0 * d + 1.0).collect();
    SeriesTable::from_columns([
        ("Top Depth", depth.into_iter().map(Some).collect::<Vec<_>>()),
        ("Year AD", year.into_iter().map(Some).collect()),
        ("Na (ppb)", na),
        ("Cl (ppb)", cl.into_iter().map(Some).collect()),
    ])
    .unwrap()
}
