//! Solver configuration.

use aequa_numeric::ScannerConfig;
use serde::{Deserialize, Serialize};

/// Configuration of a [`crate::System`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Lower bound of the numeric search interval.
    pub approximate_min: f64,
    /// Upper bound of the numeric search interval.
    pub approximate_max: f64,
    /// Longest exact form, in characters, that is still displayed.
    pub max_exact_length: usize,
    /// Numeric root scanner settings.
    pub scanner: ScannerConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            approximate_min: -10.0,
            approximate_max: 10.0,
            max_exact_length: 120,
            scanner: ScannerConfig::default(),
        }
    }
}

impl SolverConfig {
    /// Sets the numeric search interval.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    #[must_use]
    pub fn with_interval(mut self, min: f64, max: f64) -> Self {
        assert!(min <= max, "empty search interval");
        self.approximate_min = min;
        self.approximate_max = max;
        self
    }

    /// Sets the longest displayed exact form.
    #[must_use]
    pub fn with_max_exact_length(mut self, max_exact_length: usize) -> Self {
        self.max_exact_length = max_exact_length;
        self
    }

    /// Sets the root scanner configuration.
    #[must_use]
    pub fn with_scanner(mut self, scanner: ScannerConfig) -> Self {
        self.scanner = scanner;
        self
    }
}
