use crate::error::Error;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered bin edges of an energy grid.
///
/// `N + 1` strictly increasing edges define `N` bins, each covering
/// `[edge_i, edge_{i+1})`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<f64>", into = "Vec<f64>"))]
pub struct EnergyGrid {
    edges: Vec<f64>,
}

impl EnergyGrid {
    /// Creates a grid from bin `edges`.
    ///
    /// Returns [`Error::InvalidGrid`] unless there are at least two finite,
    /// strictly increasing edges.
    pub fn from_edges(edges: Vec<f64>) -> Result<Self, Error> {
        if edges.len() < 2 || edges.iter().any(|e| !e.is_finite()) {
            return Err(Error::InvalidGrid);
        }

        if edges.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::InvalidGrid);
        }

        Ok(Self { edges })
    }

    /// Creates `bins` equally wide bins between `min` and `max`.
    pub fn linear(min: f64, max: f64, bins: usize) -> Result<Self, Error> {
        let edges = (0..=bins)
            .map(|i| min + i as f64 * (max - min) / bins as f64)
            .collect();
        Self::from_edges(edges)
    }

    /// Creates `bins` logarithmically spaced bins between `min` and `max`.
    ///
    /// Edge `i` lies at `min * (max / min)^(i / bins)`.
    pub fn log_spaced(min: f64, max: f64, bins: usize) -> Result<Self, Error> {
        if min <= 0.0 {
            return Err(Error::InvalidGrid);
        }

        let edges = (0..=bins)
            .map(|i| min * (max / min).powf(i as f64 / bins as f64))
            .collect();
        Self::from_edges(edges)
    }

    /// Number of bins, one less than the number of edges.
    pub fn len(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Width of every bin, in the units of the edges.
    pub fn widths(&self) -> impl Iterator<Item = f64> + '_ {
        self.edges.windows(2).map(|pair| pair[1] - pair[0])
    }

    /// Center of every bin.
    pub fn midpoints(&self) -> impl Iterator<Item = f64> + '_ {
        self.edges.windows(2).map(|pair| 0.5 * (pair[0] + pair[1]))
    }
}

impl TryFrom<Vec<f64>> for EnergyGrid {
    type Error = Error;

    fn try_from(edges: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_edges(edges)
    }
}

impl From<EnergyGrid> for Vec<f64> {
    fn from(grid: EnergyGrid) -> Self {
        grid.edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(vec![])]
    #[case(vec![1.0])]
    #[case(vec![1.0, 1.0])]
    #[case(vec![2.0, 1.0, 3.0])]
    #[case(vec![1.0, f64::NAN])]
    #[case(vec![1.0, f64::INFINITY])]
    fn invalid_grid(#[case] edges: Vec<f64>) {
        assert!(matches!(
            EnergyGrid::from_edges(edges),
            Err(Error::InvalidGrid)
        ));
    }

    #[test]
    fn widths_and_midpoints() {
        let grid = EnergyGrid::from_edges(vec![1.0, 2.0, 4.0, 8.0]).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.widths().collect::<Vec<_>>(), vec![1.0, 2.0, 4.0]);
        assert_eq!(grid.midpoints().collect::<Vec<_>>(), vec![1.5, 3.0, 6.0]);
    }

    #[test]
    fn log_spaced_edges() {
        let grid = EnergyGrid::log_spaced(1.0, 100.0, 200).unwrap();
        assert_eq!(grid.len(), 200);
        assert_relative_eq!(grid.edges()[0], 1.0);
        assert_relative_eq!(grid.edges()[100], 10.0, max_relative = 1e-12);
        assert_relative_eq!(grid.edges()[200], 100.0, max_relative = 1e-12);
    }

    #[test]
    fn log_spaced_rejects_non_positive_start() {
        assert!(EnergyGrid::log_spaced(0.0, 10.0, 4).is_err());
    }

    #[test]
    fn linear_edges() {
        let grid = EnergyGrid::linear(0.0, 1.0, 4).unwrap();
        assert_eq!(grid.edges(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn zero_bins_is_invalid() {
        assert!(EnergyGrid::linear(0.0, 1.0, 0).is_err());
    }
}
