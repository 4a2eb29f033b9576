//! Numeric solving of a general equation in one unknown.

use aequa_core::{Context, MAX_APPROXIMATE_SOLUTIONS};
use aequa_numeric::RootScanner;
use aequa_simplify::{approximate_at, standard_form, ReductionTarget};
use log::debug;

use crate::error::SolverError;
use crate::store::EquationStore;
use crate::system::{System, SystemKind};

impl System {
    /// Looks for roots of the equation in the search interval, in
    /// increasing order.
    ///
    /// At most [`MAX_APPROXIMATE_SOLUTIONS`] roots are kept; if another one
    /// lies in the interval, [`System::has_more_solutions`] is set.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::ApproximationUnavailable`] unless the last exact
    /// solve classified the system as a general equation in one unknown.
    pub fn approximate_solve(&mut self, store: &EquationStore, ctx: &mut Context) -> Result<(), SolverError> {
        let Some(SystemKind::GeneralMonovariable { variable, interval }) = self.kind() else {
            return Err(SolverError::ApproximationUnavailable);
        };
        let stored = match (store.len(), store.get(0)) {
            (1, Some(stored)) => stored,
            _ => return Err(SolverError::ApproximationUnavailable),
        };

        let snapshot = self.preferences().snapshot();
        let mut scanner = RootScanner::with_config(interval.min, interval.max, self.config().scanner);
        let attempt = self.attempt_mut();
        let reduction = attempt.reduction(&snapshot, ReductionTarget::SystemForApproximation);
        let form = standard_form(ctx, stored.equation(), &reduction);
        attempt.solutions.clear();
        attempt.has_more_solutions = false;

        scanner.stretch();
        let arena = ctx.arena();
        let evaluate = |x: f64| approximate_at(arena, form, &reduction, variable, x);
        let mut found = 0;
        while found <= MAX_APPROXIMATE_SOLUTIONS {
            let mut root = scanner.next_root(&evaluate).x;
            if root < interval.min {
                continue;
            }
            if root > interval.max {
                root = f64::NAN;
            }
            if found == MAX_APPROXIMATE_SOLUTIONS {
                attempt.has_more_solutions = !root.is_nan();
                break;
            }
            if root.is_nan() {
                break;
            }
            attempt.solutions.register_value(root);
            found += 1;
        }
        debug!(
            "{} numeric roots in [{}, {}], more: {}",
            attempt.solutions.len(),
            interval.min,
            interval.max,
            attempt.has_more_solutions
        );
        Ok(())
    }
}
