//! Descriptive statistics over `f64` samples.
//!
//! Standard deviations are population deviations and percentiles interpolate
//! linearly between the two closest ranks.

use algorithms::merge_sort_by;
use core_types::Station;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
}

/// Pairwise Euclidean distances between stations, measured in degrees.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DistanceMatrix {
    pub station_ids: Vec<String>,
    pub distances: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    pub fn get(&self, from: usize, to: usize) -> Option<f64> {
        self.distances.get(from)?.get(to).copied()
    }

    pub fn len(&self) -> usize {
        self.station_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.station_ids.is_empty()
    }
}

pub fn summary_stats(values: &[f64]) -> Option<SummaryStats> {
    let mean = mean(values)?;
    let sorted = sorted(values);
    let p50 = interpolate(&sorted, 50.0)?;

    Some(SummaryStats {
        mean,
        median: p50,
        std: std_dev(values, mean),
        p25: interpolate(&sorted, 25.0)?,
        p50,
        p75: interpolate(&sorted, 75.0)?,
    })
}

/// The `pct`-th percentile (0 to 100) of an unsorted sample.
pub fn percentile(values: &[f64], pct: f64) -> Option<f64> {
    interpolate(&sorted(values), pct)
}

/// Population z-scores. A sample without spread scores zero everywhere.
pub fn zscores(values: &[f64]) -> Vec<f64> {
    let Some(mean) = mean(values) else {
        return Vec::new();
    };
    let std = std_dev(values, mean);
    if std == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - mean) / std).collect()
}

/// Marks the values whose absolute z-score exceeds `threshold`.
pub fn zscore_outlier_mask(values: &[f64], threshold: f64) -> Vec<bool> {
    zscores(values)
        .into_iter()
        .map(|z| z.abs() > threshold)
        .collect()
}

pub fn station_distance_matrix(stations: &[Station]) -> DistanceMatrix {
    let distances = stations
        .iter()
        .map(|from| {
            stations
                .iter()
                .map(|to| (from.latitude - to.latitude).hypot(from.longitude - to.longitude))
                .collect()
        })
        .collect();

    DistanceMatrix {
        station_ids: stations.iter().map(|s| s.station_id.clone()).collect(),
        distances,
    }
}

/// Least-squares slope of `values` against their index.
pub fn linear_slope(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;

    let (covariance, variance) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(cov, var), (x, y)| {
            let dx = x as f64 - x_mean;
            (cov + dx * (y - y_mean), var + dx * dx)
        });
    Some(covariance / variance)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn std_dev(values: &[f64], mean: f64) -> f64 {
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn sorted(values: &[f64]) -> Vec<f64> {
    merge_sort_by(values, |a, b| a.total_cmp(b))
}

fn interpolate(sorted: &[f64], pct: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=100.0).contains(&pct) {
        return None;
    }
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn summary_of_small_sample() {
        let stats = summary_stats(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert!(close(stats.mean, 2.5));
        assert!(close(stats.median, 2.5));
        assert!(close(stats.p25, 1.75));
        assert!(close(stats.p75, 3.25));
        assert!(close(stats.std, 1.25f64.sqrt()));
        assert!(summary_stats(&[]).is_none());
    }

    #[test]
    fn percentile_bounds() {
        let values = [10.0, 30.0, 20.0];
        assert_eq!(percentile(&values, 0.0), Some(10.0));
        assert_eq!(percentile(&values, 100.0), Some(30.0));
        assert_eq!(percentile(&values, 50.0), Some(20.0));
        assert_eq!(percentile(&values, 101.0), None);
        assert_eq!(percentile(&[7.0], 25.0), Some(7.0));
    }

    #[test]
    fn outlier_mask_flags_extreme_values() {
        let mut values = vec![10.0; 20];
        values.push(100.0);
        let mask = zscore_outlier_mask(&values, 3.0);
        assert_eq!(mask.iter().filter(|m| **m).count(), 1);
        assert!(mask[20]);

        // No spread, no outliers.
        assert!(zscore_outlier_mask(&[5.0, 5.0, 5.0], 0.5).iter().all(|m| !m));
    }

    #[test]
    fn distance_matrix_is_symmetric_with_zero_diagonal() {
        let stations = vec![
            Station::new("A", "A", 5, 0.0, 0.0).unwrap(),
            Station::new("B", "B", 5, 3.0, 4.0).unwrap(),
        ];
        let matrix = station_distance_matrix(&stations);
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.get(0, 0), Some(0.0));
        assert!(close(matrix.get(0, 1).unwrap(), 5.0));
        assert_eq!(matrix.get(0, 1), matrix.get(1, 0));
        assert_eq!(matrix.get(2, 0), None);
    }

    #[test]
    fn slope_of_linear_series() {
        assert!(close(linear_slope(&[1.0, 3.0, 5.0, 7.0]).unwrap(), 2.0));
        assert!(close(linear_slope(&[4.0, 4.0]).unwrap(), 0.0));
        assert!(linear_slope(&[1.0]).is_none());
    }
}
