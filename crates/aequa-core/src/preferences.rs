//! Process-wide calculation preferences.
//!
//! Solving reads the angle unit, complex format, unit format and display
//! precision from a [`SharedPreferences`] handle. Each solving phase takes a
//! fresh [`Preferences`] snapshot, so a change made between phases is seen
//! by the next phase.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Default number of significant digits for approximations.
pub const DEFAULT_SIGNIFICANT_DIGITS: usize = 10;

/// Unit of angles for trigonometric functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    /// Radians.
    #[default]
    Radian,
    /// Degrees.
    Degree,
    /// Gradians.
    Gradian,
}

impl AngleUnit {
    /// Measure of a half turn in this unit.
    #[must_use]
    pub fn half_turn(self) -> f64 {
        match self {
            AngleUnit::Radian => std::f64::consts::PI,
            AngleUnit::Degree => 180.0,
            AngleUnit::Gradian => 200.0,
        }
    }
}

/// How complex results are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexFormat {
    /// Complex results are reported as nonreal.
    #[default]
    Real,
    /// `a+b*i`.
    Cartesian,
    /// `r*e^(θ*i)`.
    Polar,
}

/// Preferred system of physical units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitFormat {
    /// Metric units.
    #[default]
    Metric,
    /// Imperial units.
    Imperial,
}

/// A snapshot of the calculation preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Angle unit.
    pub angle_unit: AngleUnit,
    /// Complex format.
    pub complex_format: ComplexFormat,
    /// Unit format.
    pub unit_format: UnitFormat,
    /// Significant digits of displayed approximations.
    pub significant_digits: usize,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            angle_unit: AngleUnit::default(),
            complex_format: ComplexFormat::default(),
            unit_format: UnitFormat::default(),
            significant_digits: DEFAULT_SIGNIFICANT_DIGITS,
        }
    }
}

/// Preferences shared between the owner and solving sessions.
#[derive(Debug, Clone, Default)]
pub struct SharedPreferences(Arc<RwLock<Preferences>>);

impl SharedPreferences {
    /// Shares the given preferences.
    #[must_use]
    pub fn new(preferences: Preferences) -> Self {
        Self(Arc::new(RwLock::new(preferences)))
    }

    /// Copies out the current preferences.
    #[must_use]
    pub fn snapshot(&self) -> Preferences {
        *self.0.read()
    }

    /// Applies an update to the shared preferences.
    pub fn update(&self, apply: impl FnOnce(&mut Preferences)) {
        apply(&mut *self.0.write());
    }

    /// Sets the angle unit.
    pub fn set_angle_unit(&self, angle_unit: AngleUnit) {
        self.update(|p| p.angle_unit = angle_unit);
    }

    /// Sets the complex format.
    pub fn set_complex_format(&self, complex_format: ComplexFormat) {
        self.update(|p| p.complex_format = complex_format);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_updates_are_shared() {
        let shared = SharedPreferences::default();
        let other = shared.clone();
        other.set_complex_format(ComplexFormat::Cartesian);
        assert_eq!(shared.snapshot().complex_format, ComplexFormat::Cartesian);
        assert_eq!(shared.snapshot().significant_digits, DEFAULT_SIGNIFICANT_DIGITS);
    }

    #[test]
    fn test_deserialize_partial() {
        let prefs: Preferences = serde_json::from_str(r#"{"angle_unit":"degree"}"#).unwrap();
        assert_eq!(prefs.angle_unit, AngleUnit::Degree);
        assert_eq!(prefs.complex_format, ComplexFormat::Real);
        assert_eq!(prefs.significant_digits, DEFAULT_SIGNIFICANT_DIGITS);
    }
}
