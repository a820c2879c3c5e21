//! Per-generation fitness history.

use serde::{Deserialize, Serialize};

/// Minimum, mean, and maximum fitness of every completed generation.
///
/// Recording is driven by the `history` option; with it disabled the
/// history stays empty. The matrix view orders the rows `[max, mean, min]`
/// for chart renderers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    min: Vec<f64>,
    mean: Vec<f64>,
    max: Vec<f64>,
}

impl History {
    pub(crate) fn record(&mut self, min: f64, mean: f64, max: f64) {
        self.min.push(min);
        self.mean.push(mean);
        self.max.push(max);
    }

    /// Number of recorded generations.
    pub fn len(&self) -> usize {
        self.min.len()
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_empty()
    }

    pub fn min(&self) -> &[f64] {
        &self.min
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn max(&self) -> &[f64] {
        &self.max
    }

    /// The history as a `[max, mean, min]` matrix.
    pub fn matrix(&self) -> [Vec<f64>; 3] {
        [self.max.clone(), self.mean.clone(), self.min.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_appends_in_parallel() {
        let mut history = History::default();
        history.record(0.0, 1.5, 3.0);
        history.record(1.0, 2.0, 4.0);

        assert_eq!(history.len(), 2);
        assert_eq!(history.min(), &[0.0, 1.0]);
        assert_eq!(history.mean(), &[1.5, 2.0]);
        assert_eq!(history.max(), &[3.0, 4.0]);
    }

    #[test]
    fn test_matrix_row_order() {
        let mut history = History::default();
        history.record(1.0, 2.0, 3.0);

        let [max, mean, min] = history.matrix();
        assert_eq!(max, vec![3.0]);
        assert_eq!(mean, vec![2.0]);
        assert_eq!(min, vec![1.0]);
    }
}
