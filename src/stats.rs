//! Summary statistics used to turn estimator output into plotted points.
//!
//! Reductions go through trueno's SIMD vectors. Standard deviations are population
//! deviations (`ddof = 0`) unless noted, and percentiles interpolate linearly between
//! order statistics.

use trueno::Vector;

/// Arithmetic mean. NaN propagates; `None` for empty input.
#[must_use]
pub fn mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    Vector::from_slice(values).mean().ok()
}

/// Mean ignoring NaN entries. `None` when every entry is NaN.
#[must_use]
pub fn nanmean(values: &[f32]) -> Option<f32> {
    let present: Vec<f32> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    mean(&present)
}

/// Population standard deviation (`ddof = 0`).
#[must_use]
pub fn std(values: &[f32]) -> Option<f32> {
    deviation(values, 0)
}

/// Sample standard deviation (`ddof = 1`); `None` for fewer than two values.
#[must_use]
pub fn sample_std(values: &[f32]) -> Option<f32> {
    deviation(values, 1)
}

fn deviation(values: &[f32], ddof: usize) -> Option<f32> {
    if values.len() <= ddof {
        return None;
    }
    let mu = mean(values)?;
    let squares: Vec<f32> = values.iter().map(|v| (v - mu) * (v - mu)).collect();
    let mean_sq = Vector::from_slice(&squares).mean().ok()?;
    let n = values.len() as f32;
    Some((mean_sq * n / (n - ddof as f32)).sqrt())
}

/// Standard error of the mean: population std over the square root of the sample count.
///
/// A single value has zero standard error; `None` for empty input.
#[must_use]
pub fn standard_error(values: &[f32]) -> Option<f32> {
    Some(std(values)? / (values.len() as f32).sqrt())
}

/// Calculate percentile of sorted data using linear interpolation.
#[must_use]
pub fn percentile(sorted: &[f32], p: f32) -> f32 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let k = (p / 100.0) * (sorted.len() - 1) as f32;
    let f = k.floor() as usize;
    let c = k.ceil() as usize;

    if f == c || c >= sorted.len() {
        sorted[f.min(sorted.len() - 1)]
    } else {
        let d = k - f as f32;
        sorted[f] * (1.0 - d) + sorted[c] * d
    }
}

/// Finite values in ascending order.
#[must_use]
pub fn sorted_finite(values: &[f32]) -> Vec<f32> {
    let mut sorted: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f32::total_cmp);
    sorted
}

/// `n` evenly spaced values from `start` to `end` inclusive.
#[must_use]
pub fn linspace(start: f32, end: f32, n: usize) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f32;
            let mut values: Vec<f32> = (0..n).map(|i| start + step * i as f32).collect();
            values[n - 1] = end;
            values
        }
    }
}

/// Smallest and largest finite values.
#[must_use]
pub fn min_max(values: &[f32]) -> Option<(f32, f32)> {
    let finite: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    let v = Vector::from_slice(&finite);
    Some((v.min().ok()?, v.max().ok()?))
}

/// Smallest strictly positive finite value.
#[must_use]
pub fn min_positive(values: &[f32]) -> Option<f32> {
    let positive: Vec<f32> = values.iter().copied().filter(|v| v.is_finite() && *v > 0.0).collect();
    if positive.is_empty() {
        return None;
    }
    Vector::from_slice(&positive).min().ok()
}

/// Gaussian kernel density of `values` evaluated at `points`, with Scott's bandwidth
/// (`sample_std * n^(-1/5)`).
///
/// `None` when fewer than two finite values remain or they are all identical.
#[must_use]
pub fn gaussian_kde(values: &[f32], points: &[f32]) -> Option<Vec<f32>> {
    let clean: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let spread = sample_std(&clean)?;
    if spread <= 0.0 {
        return None;
    }

    let n = clean.len() as f32;
    let h = spread * n.powf(-0.2);
    let norm = 1.0 / (n * h * (2.0 * std::f32::consts::PI).sqrt());

    Some(
        points
            .iter()
            .map(|&x| {
                clean
                    .iter()
                    .map(|&xi| {
                        let u = (x - xi) / h;
                        (-0.5 * u * u).exp()
                    })
                    .sum::<f32>()
                    * norm
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values).unwrap(), 5.0, epsilon = 1e-6);
        assert_relative_eq!(std(&values).unwrap(), 2.0, epsilon = 1e-6);
        assert_relative_eq!(sample_std(&values).unwrap(), 2.138_09, epsilon = 1e-4);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_nanmean_skips_nan() {
        assert_relative_eq!(nanmean(&[1.0, f32::NAN, 3.0]).unwrap(), 2.0);
        assert_eq!(nanmean(&[f32::NAN, f32::NAN]), None);
    }

    #[test]
    fn test_standard_error() {
        assert_eq!(standard_error(&[3.0, 3.0, 3.0]), Some(0.0));
        assert_eq!(standard_error(&[42.0]), Some(0.0));
        assert_eq!(standard_error(&[]), None);
        let se = standard_error(&[1.0, 3.0]).unwrap();
        assert_relative_eq!(se, 1.0 / 2f32.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(percentile(&sorted, 50.0), 2.5);
        assert_relative_eq!(percentile(&sorted, 25.0), 1.75);
        assert_relative_eq!(percentile(&sorted, 100.0), 4.0);
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 10.0, 3), vec![0.0, 5.0, 10.0]);
        assert_eq!(linspace(2.0, 10.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_min_max_and_positive() {
        let values = [0.0, -1.0, f32::NAN, 0.5, 3.0];
        assert_eq!(min_max(&values), Some((-1.0, 3.0)));
        assert_eq!(min_positive(&values), Some(0.5));
        assert_eq!(min_positive(&[0.0, -2.0]), None);
        assert_eq!(min_max(&[f32::NAN]), None);
    }

    #[test]
    fn test_kde_integrates_to_one() {
        let values = [-1.0, -0.5, 0.0, 0.2, 0.4, 1.1];
        let grid = linspace(-6.0, 6.0, 1201);
        let density = gaussian_kde(&values, &grid).unwrap();
        let area: f32 = density.iter().sum::<f32>() * 0.01;
        assert_relative_eq!(area, 1.0, epsilon = 1e-2);
    }

    #[test]
    fn test_kde_degenerate() {
        assert!(gaussian_kde(&[1.0, 1.0, 1.0], &[1.0]).is_none());
        assert!(gaussian_kde(&[1.0], &[1.0]).is_none());
    }

    proptest! {
        #[test]
        fn prop_mean_within_extent(values in prop::collection::vec(-1.0e3f32..1.0e3, 1..64)) {
            let (lo, hi) = min_max(&values).unwrap();
            let mu = mean(&values).unwrap();
            prop_assert!(mu >= lo - 1e-2 && mu <= hi + 1e-2);
        }

        #[test]
        fn prop_standard_error_bounded_by_std(
            values in prop::collection::vec(-1.0e3f32..1.0e3, 1..64)
        ) {
            let se = standard_error(&values).unwrap();
            let sd = std(&values).unwrap();
            prop_assert!(se >= 0.0);
            prop_assert!(se <= sd + 1e-4);
        }

        #[test]
        fn prop_linspace_endpoints(
            start in -100f32..100.0,
            end in -100f32..100.0,
            n in 2usize..200
        ) {
            let grid = linspace(start, end, n);
            prop_assert_eq!(grid.len(), n);
            prop_assert_eq!(grid[0], start);
            prop_assert_eq!(grid[n - 1], end);
        }

        #[test]
        fn prop_percentile_between_quartiles(values in prop::collection::vec(-50f32..50.0, 2..40)) {
            let sorted = sorted_finite(&values);
            let q1 = percentile(&sorted, 25.0);
            let q2 = percentile(&sorted, 50.0);
            let q3 = percentile(&sorted, 75.0);
            prop_assert!(q1 <= q2 + 1e-5 && q2 <= q3 + 1e-5);
        }
    }
}
