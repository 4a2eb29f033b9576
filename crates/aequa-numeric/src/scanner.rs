//! Left-to-right root scanner.
//!
//! The scanner samples the function on a regular grid starting at an
//! internal cursor. Every root it returns moves the cursor just past that
//! root, so successive calls enumerate roots in increasing order. Once the
//! cursor reaches the end of the interval every call returns NaN.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::refine::{brent, golden_section_minimum};

/// Configuration for [`RootScanner`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Number of sampling steps across the interval.
    pub steps: usize,
    /// Fraction of the span added on each side by [`RootScanner::stretch`].
    pub stretch_ratio: f64,
    /// Absolute width at which refinement stops, relative to the step.
    pub relative_tolerance: f64,
    /// Iteration cap of the refinement methods.
    pub max_iterations: usize,
    /// Largest `|f(x)|` accepted at a local minimum of `|f|`.
    pub null_tolerance: f64,
    /// Roots closer to zero than this fraction of a step are snapped to 0.
    pub zero_snap_ratio: f64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            steps: 500,
            stretch_ratio: 0.01,
            relative_tolerance: 1e-12,
            max_iterations: 200,
            null_tolerance: 1e-10,
            zero_snap_ratio: 1e-9,
        }
    }
}

/// A point of the plane; the scanner reports roots as `(root, f(root))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate2D {
    /// Abscissa.
    pub x: f64,
    /// Ordinate.
    pub y: f64,
}

impl Coordinate2D {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The point returned when no root is left.
    #[must_use]
    pub const fn undefined() -> Self {
        Self::new(f64::NAN, f64::NAN)
    }

    /// Returns true if the abscissa is NaN.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        self.x.is_nan()
    }
}

/// Enumerates the roots of a function over `[min, max]`.
#[derive(Debug, Clone)]
pub struct RootScanner {
    min: f64,
    max: f64,
    cursor: f64,
    /// True until the first sample has been examined.
    fresh: bool,
    config: ScannerConfig,
}

impl RootScanner {
    /// Creates a scanner over `[min, max]` with the default configuration.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self::with_config(min, max, ScannerConfig::default())
    }

    /// Creates a scanner with a custom configuration.
    ///
    /// # Panics
    ///
    /// Panics if `min > max` or the configuration has no steps.
    #[must_use]
    pub fn with_config(min: f64, max: f64, config: ScannerConfig) -> Self {
        assert!(min <= max, "empty scan interval");
        assert!(config.steps > 0, "scanner needs at least one step");
        Self {
            min,
            max,
            cursor: min,
            fresh: true,
            config,
        }
    }

    /// Lower bound of the interval.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound of the interval.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Widens the interval on both sides so that roots lying exactly on a
    /// bound are bracketed, and restarts the scan.
    pub fn stretch(&mut self) {
        let span = self.max - self.min;
        let margin = if span > 0.0 {
            span * self.config.stretch_ratio
        } else {
            self.config.stretch_ratio * self.min.abs().max(1.0)
        };
        self.min -= margin;
        self.max += margin;
        self.cursor = self.min;
        self.fresh = true;
    }

    fn step(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let steps = self.config.steps as f64;
        let span = self.max - self.min;
        if span > 0.0 {
            span / steps
        } else {
            f64::EPSILON
        }
    }

    /// Returns the next root to the right of the cursor, or
    /// [`Coordinate2D::undefined`] when the interval is exhausted.
    pub fn next_root<F>(&mut self, mut f: F) -> Coordinate2D
    where
        F: FnMut(f64) -> f64,
    {
        let step = self.step();
        let tolerance = self.config.relative_tolerance * step;
        let iterations = self.config.max_iterations;

        let mut xa = self.cursor;
        let mut ya = f(xa);
        if self.fresh {
            self.fresh = false;
            if ya == 0.0 {
                return self.accept(xa, ya, step);
            }
        }
        let mut previous: Option<(f64, f64)> = None;

        while xa < self.max {
            let xb = (xa + step).min(self.max);
            let yb = f(xb);

            if yb == 0.0 {
                return self.accept(xb, yb, step);
            }
            if ya.is_finite() && yb.is_finite() && ya != 0.0 && (ya < 0.0) != (yb < 0.0) {
                let x = brent(&mut f, xa, xb, ya, yb, tolerance, iterations);
                let y = f(x);
                // At a pole the refined point is larger than the bracket.
                if y.abs() <= self.config.null_tolerance || y.abs() < ya.abs().min(yb.abs()) {
                    return self.accept(x, y, step);
                }
                trace!("rejecting pole near {x}");
            } else if let Some((xp, yp)) = previous {
                let same_sign = (yp < 0.0) == (ya < 0.0) && (ya < 0.0) == (yb < 0.0);
                let finite = yp.is_finite() && ya.is_finite() && yb.is_finite();
                if finite && same_sign && ya.abs() < yp.abs() && ya.abs() <= yb.abs() {
                    let x = golden_section_minimum(&mut f, xp, xb, tolerance, iterations);
                    let y = f(x);
                    if y.abs() <= self.config.null_tolerance {
                        return self.accept(x, y, step);
                    }
                }
            }
            previous = Some((xa, ya));
            xa = xb;
            ya = yb;
        }

        self.cursor = self.max;
        Coordinate2D::undefined()
    }

    fn accept(&mut self, x: f64, y: f64, step: f64) -> Coordinate2D {
        let x = if x.abs() < self.config.zero_snap_ratio * step { 0.0 } else { x };
        // Resume strictly after the root.
        self.cursor = x + (self.config.relative_tolerance * step * 1e6).max(f64::EPSILON * x.abs() * 4.0);
        trace!("root at {x}");
        Coordinate2D::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn all_roots(mut scanner: RootScanner, f: impl Fn(f64) -> f64) -> Vec<f64> {
        let mut roots = Vec::new();
        loop {
            let root = scanner.next_root(&f);
            if root.is_undefined() {
                return roots;
            }
            roots.push(root.x);
            assert!(roots.len() < 100, "scanner does not terminate");
        }
    }

    #[test]
    fn test_single_transcendental_root() {
        let roots = all_roots(RootScanner::new(-10.0, 10.0), |x| x.cos() - x);
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - 0.739_085_133_215_160_6).abs() < 1e-10);
    }

    #[test]
    fn test_roots_come_in_order() {
        let roots = all_roots(RootScanner::new(-10.0, 10.0), f64::sin);
        assert_eq!(roots.len(), 7);
        for (k, root) in (-3..=3).zip(&roots) {
            assert!((root - f64::from(k) * PI).abs() < 1e-10, "{root}");
        }
        assert_eq!(roots[3], 0.0);
    }

    #[test]
    fn test_even_multiplicity_root() {
        let roots = all_roots(RootScanner::new(-1.0, 1.0), |x| (x - 0.1234) * (x - 0.1234));
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - 0.1234).abs() < 1e-6);
    }

    #[test]
    fn test_poles_are_not_roots() {
        assert!(all_roots(RootScanner::new(-1.0, 1.0), |x| 1.0 / x).is_empty());
        assert!(all_roots(RootScanner::new(0.5, 2.5), f64::tan).is_empty());
    }

    #[test]
    fn test_undefined_region() {
        let roots = all_roots(RootScanner::new(-1.0, 3.0), f64::ln);
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_root_on_lower_bound() {
        let mut scanner = RootScanner::new(2.0, 5.0);
        assert_eq!(scanner.next_root(|x| x - 2.0).x, 2.0);
        assert!(scanner.next_root(|x| x - 2.0).is_undefined());
    }

    #[test]
    fn test_stretch_widens_interval() {
        let mut scanner = RootScanner::new(-10.0, 10.0);
        scanner.stretch();
        assert!((scanner.min() + 10.2).abs() < 1e-12);
        assert!((scanner.max() - 10.2).abs() < 1e-12);
        let root = scanner.next_root(|x| x - 10.1);
        assert!((root.x - 10.1).abs() < 1e-10);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: ScannerConfig = serde_json::from_str(r#"{"steps": 100}"#).unwrap();
        assert_eq!(config.steps, 100);
        assert_eq!(config.null_tolerance, ScannerConfig::default().null_tolerance);
    }
}
