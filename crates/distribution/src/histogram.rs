//! Equal-Width Histograms

use serde::Serialize;

/// Bin edges and per-bin counts (or densities)
///
/// `edges` has one more entry than `counts`. Every bin is half-open except the
/// last, which also includes its right edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<f64>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning their min and max
    pub fn compute(values: &[f64], bins: usize) -> Self {
        let edges = Self::edges_for(values, bins);
        Self::with_edges(values, edges)
    }

    /// Equal-width edges covering `values`; a constant input gets a unit-wide span
    pub fn edges_for(values: &[f64], bins: usize) -> Vec<f64> {
        let bins = bins.max(1);
        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if values.is_empty() {
            lo = 0.0;
            hi = 1.0;
        } else if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
        edges.push(hi);
        edges
    }

    /// Bin `values` on caller-supplied edges; values outside them are ignored
    pub fn with_edges(values: &[f64], edges: Vec<f64>) -> Self {
        let bins = edges.len().saturating_sub(1);
        let mut counts = vec![0.0; bins];
        if bins == 0 {
            return Self { edges, counts };
        }

        let lo = edges[0];
        let hi = edges[bins];
        for &v in values {
            if v < lo || v > hi {
                continue;
            }
            // Partition point gives the first edge strictly greater than v
            let idx = edges.partition_point(|&e| e <= v).saturating_sub(1).min(bins - 1);
            counts[idx] += 1.0;
        }
        Self { edges, counts }
    }

    /// Total number of binned values
    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }

    /// Convert counts to a density whose area integrates to one
    pub fn into_density(self) -> Self {
        let total = self.total();
        if total == 0.0 {
            return self;
        }
        let counts = self
            .counts
            .iter()
            .zip(self.edges.windows(2))
            .map(|(count, edge)| count / (total * (edge[1] - edge[0])))
            .collect();
        Self {
            edges: self.edges,
            counts,
        }
    }
}
