/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Percentile lookup over a pre-built histogram
//!
//! Histograms of detection statistics are binned upstream; this module only
//! reads percentiles back out of the binned counts, treating the mass inside
//! each bin as uniformly spread between its edges.

pub mod errors;

pub use errors::{HistogramError, Result};

/// A one-dimensional histogram with explicit bin edges
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<f64>,
    total: f64,
}

impl Histogram {
    /// Wrap existing bin edges and counts
    ///
    /// # Arguments
    ///
    /// * `edges` - Strictly increasing, finite bin edges (`n + 1` values)
    /// * `counts` - Non-negative bin contents (`n` values), not all zero
    pub fn new(edges: Vec<f64>, counts: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(HistogramError::InvalidEdges(format!(
                "need at least two edges, got {}",
                edges.len()
            )));
        }
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(HistogramError::InvalidEdges(
                "edges must be finite".to_string(),
            ));
        }
        if let Some(i) = edges.windows(2).position(|w| w[1] <= w[0]) {
            return Err(HistogramError::InvalidEdges(format!(
                "edges must be strictly increasing, edge {} is {} after {}",
                i + 1,
                edges[i + 1],
                edges[i]
            )));
        }
        if counts.len() + 1 != edges.len() {
            return Err(HistogramError::InvalidCounts(format!(
                "{} edges need {} counts, got {}",
                edges.len(),
                edges.len() - 1,
                counts.len()
            )));
        }
        if let Some(c) = counts.iter().find(|c| !(c.is_finite() && **c >= 0.0)) {
            return Err(HistogramError::InvalidCounts(format!(
                "counts must be finite and non-negative, got {}",
                c
            )));
        }

        let total: f64 = counts.iter().sum();
        if total <= 0.0 {
            return Err(HistogramError::InvalidCounts(
                "histogram is empty".to_string(),
            ));
        }

        Ok(Self {
            edges,
            counts,
            total,
        })
    }

    /// Bin edges
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Bin counts
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    /// Sum of all bin counts
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Value below which `q` percent of the histogram mass lies
    ///
    /// Empty bins never contain a percentile: `q = 0` gives the lower edge of
    /// the first populated bin and `q = 100` the upper edge of the last one.
    pub fn percentile(&self, q: f64) -> Result<f64> {
        if !(0.0..=100.0).contains(&q) {
            return Err(HistogramError::InvalidPercentile(q));
        }

        let target = q / 100.0 * self.total;
        let mut cumulative = 0.0;
        let mut last_populated = 0;

        for (i, &count) in self.counts.iter().enumerate() {
            if count == 0.0 {
                continue;
            }
            last_populated = i;
            if cumulative + count >= target {
                let fraction = ((target - cumulative) / count).clamp(0.0, 1.0);
                return Ok(self.edges[i] + fraction * (self.edges[i + 1] - self.edges[i]));
            }
            cumulative += count;
        }

        // Rounding left the target just above the accumulated mass
        Ok(self.edges[last_populated + 1])
    }

    /// Several percentiles at once
    pub fn percentiles(&self, qs: &[f64]) -> Result<Vec<f64>> {
        qs.iter().map(|&q| self.percentile(q)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform() -> Histogram {
        Histogram::new(vec![0.0, 1.0, 2.0, 3.0, 4.0], vec![5.0, 5.0, 5.0, 5.0]).unwrap()
    }

    #[test]
    fn test_uniform_percentiles() {
        let hist = uniform();
        assert_relative_eq!(hist.percentile(0.0).unwrap(), 0.0);
        assert_relative_eq!(hist.percentile(25.0).unwrap(), 1.0);
        assert_relative_eq!(hist.percentile(50.0).unwrap(), 2.0);
        assert_relative_eq!(hist.percentile(90.0).unwrap(), 3.6, epsilon = 1e-12);
        assert_relative_eq!(hist.percentile(100.0).unwrap(), 4.0);
    }

    #[test]
    fn test_interpolates_inside_bin() {
        let hist = Histogram::new(vec![10.0, 20.0, 40.0], vec![1.0, 3.0]).unwrap();
        // 25% of the mass sits in the first bin; 50% lands a third into the second
        assert_relative_eq!(hist.percentile(25.0).unwrap(), 20.0);
        assert_relative_eq!(hist.percentile(50.0).unwrap(), 20.0 + 20.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_edge_bins_are_skipped() {
        let hist = Histogram::new(vec![0.0, 1.0, 2.0, 3.0, 4.0], vec![0.0, 2.0, 2.0, 0.0]).unwrap();
        assert_relative_eq!(hist.percentile(0.0).unwrap(), 1.0);
        assert_relative_eq!(hist.percentile(50.0).unwrap(), 2.0);
        assert_relative_eq!(hist.percentile(100.0).unwrap(), 3.0);
    }

    #[test]
    fn test_percentiles_batch() {
        let hist = uniform();
        let values = hist.percentiles(&[10.0, 50.0, 75.0]).unwrap();
        assert_eq!(values.len(), 3);
        assert_relative_eq!(values[2], 3.0);
        assert!(hist.percentiles(&[10.0, 101.0]).is_err());
    }

    #[test]
    fn test_invalid_histograms() {
        assert!(matches!(
            Histogram::new(vec![0.0], vec![]),
            Err(HistogramError::InvalidEdges(_))
        ));
        assert!(matches!(
            Histogram::new(vec![0.0, 2.0, 1.0], vec![1.0, 1.0]),
            Err(HistogramError::InvalidEdges(_))
        ));
        assert!(matches!(
            Histogram::new(vec![0.0, 1.0, 2.0], vec![1.0]),
            Err(HistogramError::InvalidCounts(_))
        ));
        assert!(matches!(
            Histogram::new(vec![0.0, 1.0], vec![-1.0]),
            Err(HistogramError::InvalidCounts(_))
        ));
        assert!(matches!(
            Histogram::new(vec![0.0, 1.0], vec![0.0]),
            Err(HistogramError::InvalidCounts(_))
        ));
    }

    #[test]
    fn test_invalid_percentile() {
        let hist = uniform();
        assert_eq!(
            hist.percentile(-1.0),
            Err(HistogramError::InvalidPercentile(-1.0))
        );
        assert!(hist.percentile(f64::NAN).is_err());
    }
}
