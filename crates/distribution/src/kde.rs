//! Gaussian Kernel Density

/// Evaluation points along a density curve
pub const KDE_GRID_POINTS: usize = 200;

/// Gaussian kernel density estimate evaluated across the data range
///
/// Bandwidth follows Scott's rule: sample standard deviation times `n^(-1/5)`.
/// Returns `(x, density)` pairs spanning `[min, max]`; fewer than two values
/// or a zero spread yield an empty curve.
pub fn kde(values: &[f64], points: usize) -> Vec<(f64, f64)> {
    let n = values.len();
    if n < 2 || points < 2 {
        return Vec::new();
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let bandwidth = variance.sqrt() * (n as f64).powf(-0.2);
    if !bandwidth.is_finite() || bandwidth <= 0.0 {
        return Vec::new();
    }

    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let step = (hi - lo) / (points - 1) as f64;
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density = values
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm;
            (x, density)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_spans_range() {
        let curve = kde(&[1.0, 2.0, 2.5, 4.0], 50);
        assert_eq!(curve.len(), 50);
        assert_eq!(curve[0].0, 1.0);
        assert!((curve[49].0 - 4.0).abs() < 1e-9);
        assert!(curve.iter().all(|(_, d)| *d > 0.0));
    }

    #[test]
    fn test_symmetric_input_peaks_in_middle() {
        let curve = kde(&[-1.0, 0.0, 0.0, 1.0], 21);
        let peak = curve
            .iter()
            .cloned()
            .fold((0.0, f64::NEG_INFINITY), |best, p| if p.1 > best.1 { p } else { best });
        assert!(peak.0.abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_input() {
        assert!(kde(&[3.0], KDE_GRID_POINTS).is_empty());
        assert!(kde(&[3.0, 3.0, 3.0], KDE_GRID_POINTS).is_empty());
    }

    #[test]
    fn test_density_integrates_near_one_on_wide_data() {
        let values: Vec<f64> = (0..200).map(f64::from).collect();
        let curve = kde(&values, KDE_GRID_POINTS);
        let area: f64 = curve
            .windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
            .sum();
        assert!(area > 0.85 && area < 1.0);
    }
}
