//! Settings that steer a reduction.

use aequa_core::{AngleUnit, ComplexFormat, Preferences, UnitFormat};

/// What a reduced expression is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReductionTarget {
    /// Expanded canonical form for coefficient extraction.
    SystemForAnalysis,
    /// Unexpanded form, cheaper to evaluate many times.
    SystemForApproximation,
    /// Expanded form for display.
    #[default]
    User,
}

/// What to do with symbols the user has defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SymbolicComputation {
    /// Substitute every defined symbol by its definition.
    #[default]
    ReplaceAllDefinedSymbolsWithDefinition,
    /// Leave every symbol alone.
    KeepAllSymbols,
}

impl SymbolicComputation {
    /// The policy matching the user-variable override flag of a solve.
    #[must_use]
    pub const fn for_override(override_user_variables: bool) -> Self {
        if override_user_variables {
            SymbolicComputation::KeepAllSymbols
        } else {
            SymbolicComputation::ReplaceAllDefinedSymbolsWithDefinition
        }
    }
}

/// Everything a reduction reads besides the expression itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ReductionContext {
    /// Complex format; in `Real`, non-real intermediate results are flagged.
    pub complex_format: ComplexFormat,
    /// Angle unit of trigonometric functions.
    pub angle_unit: AngleUnit,
    /// Unit format.
    pub unit_format: UnitFormat,
    /// Target of the reduction.
    pub target: ReductionTarget,
    /// Treatment of defined symbols.
    pub symbolic_computation: SymbolicComputation,
}

impl ReductionContext {
    /// Builds a context from a preference snapshot.
    #[must_use]
    pub fn from_preferences(preferences: &Preferences, target: ReductionTarget) -> Self {
        Self {
            complex_format: preferences.complex_format,
            angle_unit: preferences.angle_unit,
            unit_format: preferences.unit_format,
            target,
            symbolic_computation: SymbolicComputation::default(),
        }
    }

    /// Replaces the target.
    #[must_use]
    pub fn with_target(mut self, target: ReductionTarget) -> Self {
        self.target = target;
        self
    }

    /// Replaces the complex format.
    #[must_use]
    pub fn with_complex_format(mut self, complex_format: ComplexFormat) -> Self {
        self.complex_format = complex_format;
        self
    }

    /// Replaces the angle unit.
    #[must_use]
    pub fn with_angle_unit(mut self, angle_unit: AngleUnit) -> Self {
        self.angle_unit = angle_unit;
        self
    }

    /// Replaces the symbolic computation policy.
    #[must_use]
    pub fn with_symbolic_computation(mut self, symbolic_computation: SymbolicComputation) -> Self {
        self.symbolic_computation = symbolic_computation;
        self
    }

    /// Returns true if products of sums are multiplied out.
    #[must_use]
    pub fn expands(&self) -> bool {
        self.target != ReductionTarget::SystemForApproximation
    }
}
