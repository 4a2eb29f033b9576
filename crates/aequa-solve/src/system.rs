//! Classification and exact solving of equation systems.
//!
//! A solve runs up to two passes. The first replaces symbols the user has
//! defined by their values; if it does not produce a solution, the second
//! pass keeps those symbols as unknowns. Each pass builds its own
//! [`Attempt`], and [`System::exact_solve`] adopts one of them.

use aequa_core::{
    ComplexFormat, Context, ExprHandle, ExprNode, PoolCursor, Preferences, SharedPreferences, SymbolId, MAX_EQUATIONS,
};
use aequa_simplify::{
    collect_variables, contains_matrix, standard_form, updated_complex_format, ReductionContext, ReductionTarget,
    SymbolicComputation, VariableSet,
};
use log::{debug, warn};
use smallvec::SmallVec;

use crate::config::SolverConfig;
use crate::error::{Outcome, SolveResult, SolverError};
use crate::solution::{DisplayPolicy, Solution, SolutionRegistry};
use crate::store::EquationStore;

/// Bounds of the numeric search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

/// What kind of system was recognised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SystemKind {
    /// Linear equations in any number of unknowns.
    Linear,
    /// One polynomial equation of degree 2 or 3 in one unknown.
    PolynomialMonovariable {
        /// Degree of the polynomial.
        degree: usize,
    },
    /// One equation in one unknown without a closed form.
    GeneralMonovariable {
        /// The unknown.
        variable: SymbolId,
        /// Where numeric solving looks for roots.
        interval: Interval,
    },
}

/// State produced by one solving pass.
#[derive(Debug, Clone)]
pub(crate) struct Attempt {
    pub(crate) override_user_variables: bool,
    pub(crate) kind: Option<SystemKind>,
    pub(crate) complex_format: ComplexFormat,
    pub(crate) variables: VariableSet,
    pub(crate) user_variables: VariableSet,
    pub(crate) has_more_solutions: bool,
    pub(crate) solutions: SolutionRegistry,
}

impl Attempt {
    fn new(override_user_variables: bool, complex_format: ComplexFormat) -> Self {
        Self {
            override_user_variables,
            kind: None,
            complex_format,
            variables: VariableSet::new(),
            user_variables: VariableSet::new(),
            has_more_solutions: false,
            solutions: SolutionRegistry::new(),
        }
    }

    /// Reduction settings of this pass for a preference snapshot.
    pub(crate) fn reduction(&self, preferences: &Preferences, target: ReductionTarget) -> ReductionContext {
        ReductionContext::from_preferences(preferences, target)
            .with_complex_format(self.complex_format)
            .with_symbolic_computation(SymbolicComputation::for_override(self.override_user_variables))
    }

    pub(crate) fn display_policy(preferences: &Preferences, config: &SolverConfig) -> DisplayPolicy {
        DisplayPolicy {
            significant_digits: preferences.significant_digits,
            max_exact_length: config.max_exact_length,
        }
    }

    /// Reduces every equation, collecting user and resolution variables.
    fn simplify_and_find_variables(
        &mut self,
        store: &EquationStore,
        ctx: &mut Context,
        preferences: &SharedPreferences,
    ) -> Result<SmallVec<[ExprHandle; MAX_EQUATIONS]>, SolverError> {
        let mut simplified = SmallVec::new();
        for stored in store.iter() {
            let snapshot = preferences.snapshot();
            let keep = ReductionContext::from_preferences(&snapshot, ReductionTarget::SystemForAnalysis)
                .with_complex_format(self.complex_format)
                .with_symbolic_computation(SymbolicComputation::KeepAllSymbols);
            let with_user_variables = standard_form(ctx, stored.equation(), &keep);

            let context = &*ctx;
            if let Err(overflow) = collect_variables(
                context.arena(),
                with_user_variables,
                &mut self.user_variables,
                &|id| context.is_defined(id),
            ) {
                warn!("ignoring user variables beyond {}", overflow.capacity);
            }

            let form = if self.override_user_variables {
                with_user_variables
            } else {
                standard_form(ctx, stored.equation(), &self.reduction(&snapshot, ReductionTarget::SystemForAnalysis))
            };
            match ctx.arena().get(form) {
                ExprNode::Undefined => return Err(SolverError::EquationUndefined),
                ExprNode::Nonreal => return Err(SolverError::EquationNonreal),
                _ if contains_matrix(ctx.arena(), form) => return Err(SolverError::EquationUndefined),
                _ => {}
            }

            self.complex_format = updated_complex_format(self.complex_format, ctx.arena(), form);
            collect_variables(ctx.arena(), form, &mut self.variables, &|_| true)
                .map_err(|_| SolverError::TooManyVariables)?;
            simplified.push(form);
        }
        Ok(simplified)
    }

    /// One complete pass: classification, then linear, then polynomial
    /// solving.
    fn solve(
        &mut self,
        store: &EquationStore,
        ctx: &mut Context,
        preferences: &SharedPreferences,
        config: &SolverConfig,
    ) -> SolveResult {
        let simplified = self.simplify_and_find_variables(store, ctx, preferences)?;

        match self.solve_linear_system(ctx, &simplified, preferences, config) {
            Err(SolverError::NonLinearSystem) if self.variables.len() <= 1 && simplified.len() <= 1 => {}
            other => return other,
        }

        let outcome = self.solve_polynomial(ctx, simplified[0], preferences, config)?;
        if outcome == Outcome::RequireApproximateSolution {
            self.kind = Some(SystemKind::GeneralMonovariable {
                variable: self.variables.as_slice()[0],
                interval: Interval {
                    min: config.approximate_min,
                    max: config.approximate_max,
                },
            });
        }
        Ok(outcome)
    }
}

/// An equation system being solved.
#[derive(Debug, Clone)]
pub struct System {
    preferences: SharedPreferences,
    config: SolverConfig,
    attempt: Attempt,
    result: Option<SolveResult>,
}

impl System {
    /// Creates a system reading the given preferences.
    #[must_use]
    pub fn new(preferences: SharedPreferences) -> Self {
        Self::with_config(preferences, SolverConfig::default())
    }

    /// Creates a system with a custom configuration.
    #[must_use]
    pub fn with_config(preferences: SharedPreferences, config: SolverConfig) -> Self {
        let complex_format = preferences.snapshot().complex_format;
        Self {
            preferences,
            config,
            attempt: Attempt::new(false, complex_format),
            result: None,
        }
    }

    /// Solves the system exactly.
    ///
    /// User-defined symbols are first replaced by their values. When that
    /// yields no solution the system is solved again with those symbols as
    /// unknowns; the first pass is kept if the second one fails.
    ///
    /// # Errors
    ///
    /// Returns the [`SolverError`] of the adopted pass.
    pub fn exact_solve(&mut self, store: &EquationStore, ctx: &mut Context) -> SolveResult {
        let (first_attempt, first) = self.run_pass(store, ctx, false);
        if first == Ok(Outcome::Solved) && !first_attempt.solutions.is_empty() {
            return self.adopt(first_attempt, first);
        }

        debug!("retrying with user variables kept as unknowns");
        let (second_attempt, second) = self.run_pass(store, ctx, true);
        if first == Ok(Outcome::Solved) && second.is_err() {
            debug!("keeping the first pass over {second:?}");
            return self.adopt(first_attempt, first);
        }
        self.adopt(second_attempt, second)
    }

    fn run_pass(
        &self,
        store: &EquationStore,
        ctx: &mut Context,
        override_user_variables: bool,
    ) -> (Attempt, SolveResult) {
        let complex_format = self.preferences.snapshot().complex_format;
        let mut attempt = Attempt::new(override_user_variables, complex_format);
        let result = attempt.solve(store, ctx, &self.preferences, &self.config);
        debug!(
            "pass with override={override_user_variables}: {result:?}, {} solutions",
            attempt.solutions.len()
        );
        (attempt, result)
    }

    fn adopt(&mut self, attempt: Attempt, result: SolveResult) -> SolveResult {
        self.attempt = attempt;
        self.result = Some(result);
        result
    }

    /// Resets every solution that displays pool nodes allocated at or after
    /// `cursor`, or all of them when there is no cursor. Call this before
    /// [`Context::reclaim`].
    pub fn tidy(&mut self, cursor: Option<PoolCursor>) {
        self.attempt.solutions.tidy(cursor);
    }

    /// Changes the numeric search interval.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn set_approximate_interval(&mut self, min: f64, max: f64) {
        self.config = self.config.with_interval(min, max);
        if let Some(SystemKind::GeneralMonovariable { interval, .. }) = &mut self.attempt.kind {
            *interval = Interval { min, max };
        }
    }

    pub(crate) fn attempt_mut(&mut self) -> &mut Attempt {
        &mut self.attempt
    }

    pub(crate) fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub(crate) fn preferences(&self) -> &SharedPreferences {
        &self.preferences
    }

    /// The recognised kind, `None` before a successful classification.
    #[must_use]
    pub fn kind(&self) -> Option<SystemKind> {
        self.attempt.kind
    }

    /// Degree of the system: 1 when linear, the polynomial degree otherwise.
    #[must_use]
    pub fn degree(&self) -> Option<usize> {
        match self.attempt.kind? {
            SystemKind::Linear => Some(1),
            SystemKind::PolynomialMonovariable { degree } => Some(degree),
            SystemKind::GeneralMonovariable { .. } => None,
        }
    }

    /// Result of the last exact solve.
    #[must_use]
    pub fn last_result(&self) -> Option<SolveResult> {
        self.result
    }

    /// True when the adopted pass kept user-defined symbols as unknowns.
    #[must_use]
    pub fn override_user_variables(&self) -> bool {
        self.attempt.override_user_variables
    }

    /// Complex format in force, widened by the equations.
    #[must_use]
    pub fn complex_format(&self) -> ComplexFormat {
        self.attempt.complex_format
    }

    /// Unknowns of the system in order of appearance.
    #[must_use]
    pub fn variables(&self) -> &[SymbolId] {
        self.attempt.variables.as_slice()
    }

    /// Names of the unknowns.
    #[must_use]
    pub fn variable_names<'c>(&self, ctx: &'c Context) -> Vec<&'c str> {
        self.variables()
            .iter()
            .filter_map(|id| ctx.arena().symbol_name(*id))
            .collect()
    }

    /// Defined symbols the equations mention.
    #[must_use]
    pub fn user_variables(&self) -> &[SymbolId] {
        self.attempt.user_variables.as_slice()
    }

    /// True when the solutions listed are not all of them.
    #[must_use]
    pub fn has_more_solutions(&self) -> bool {
        self.attempt.has_more_solutions
    }

    /// Solutions in registration order.
    #[must_use]
    pub fn solutions(&self) -> &[Solution] {
        self.attempt.solutions.as_slice()
    }

    /// Number of solutions.
    #[must_use]
    pub fn number_of_solutions(&self) -> usize {
        self.attempt.solutions.len()
    }
}
