//! Solutions and the registry that accepts them.

use aequa_core::{serialize, Context, ExprHandle, ExprNode, PoolCursor, MAX_SOLUTIONS};
use aequa_simplify::{
    approximate, contains_decimal, exact_and_approximate_are_equal, simplify_and_approximate, ReductionContext,
};
use log::trace;
use smallvec::SmallVec;

use crate::error::SolverError;

/// How a solution was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolutionType {
    /// A closed form.
    #[default]
    Exact,
    /// A closed form depending on free parameters.
    Formal,
    /// A numeric value.
    Approximate,
}

/// A displayed expression: the pool node and its serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    node: ExprHandle,
    text: String,
}

impl Layout {
    fn new(ctx: &Context, node: ExprHandle, significant_digits: usize) -> Self {
        Self {
            node,
            text: serialize(ctx.arena(), node, significant_digits),
        }
    }

    /// The expression shown.
    #[must_use]
    pub fn node(&self) -> ExprHandle {
        self.node
    }

    /// Its text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns true if the node does not survive truncation to `cursor`.
    #[must_use]
    pub fn is_downstream_of(&self, cursor: PoolCursor) -> bool {
        self.node.is_downstream_of(cursor)
    }
}

/// One solution of a system.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    exact: Option<Layout>,
    approximate: Option<Layout>,
    value: f64,
    exact_and_approximate_are_equal: bool,
    solution_type: SolutionType,
}

impl Default for Solution {
    fn default() -> Self {
        Self {
            exact: None,
            approximate: None,
            value: f64::NAN,
            exact_and_approximate_are_equal: false,
            solution_type: SolutionType::default(),
        }
    }
}

impl Solution {
    /// The exact form, when it is worth displaying.
    #[must_use]
    pub fn exact_layout(&self) -> Option<&Layout> {
        self.exact.as_ref()
    }

    /// The approximate form.
    #[must_use]
    pub fn approximate_layout(&self) -> Option<&Layout> {
        self.approximate.as_ref()
    }

    /// The real value, or NaN when there is no single real value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// True when the approximate form is exactly the exact value.
    #[must_use]
    pub fn exact_and_approximate_are_equal(&self) -> bool {
        self.exact_and_approximate_are_equal
    }

    /// How the solution was obtained.
    #[must_use]
    pub fn solution_type(&self) -> SolutionType {
        self.solution_type
    }

    fn references(&self, cursor: PoolCursor) -> bool {
        self.exact.iter().chain(&self.approximate).any(|l| l.is_downstream_of(cursor))
    }
}

/// Rules for what gets displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayPolicy {
    /// Significant digits of approximations.
    pub significant_digits: usize,
    /// Longest exact form still displayed.
    pub max_exact_length: usize,
}

impl DisplayPolicy {
    fn never_displays_exact(&self, ctx: &Context, exact: ExprHandle, text: &str) -> bool {
        contains_decimal(ctx.arena(), exact) || text.chars().count() > self.max_exact_length
    }
}

/// Ordered list of accepted solutions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolutionRegistry {
    solutions: SmallVec<[Solution; MAX_SOLUTIONS]>,
}

impl SolutionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of solutions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    /// Returns true if there is no solution.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// The solutions in registration order.
    #[must_use]
    pub fn as_slice(&self) -> &[Solution] {
        &self.solutions
    }

    /// Removes every solution.
    pub fn clear(&mut self) {
        self.solutions.clear();
    }

    /// Simplifies `expr` and records it, unless its value is not real.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::EquationUndefined`] if the value is undefined
    /// and the solution is not formal.
    ///
    /// # Panics
    ///
    /// Panics if the registry is already full.
    pub fn register(
        &mut self,
        ctx: &mut Context,
        expr: ExprHandle,
        solution_type: SolutionType,
        reduction: &ReductionContext,
        policy: DisplayPolicy,
    ) -> Result<(), SolverError> {
        let (exact, approximate_node) = if solution_type == SolutionType::Approximate {
            (None, expr)
        } else {
            let (exact, approximate_node) = simplify_and_approximate(ctx, expr, reduction);
            (Some(exact), approximate_node)
        };
        match ctx.arena().get(approximate_node) {
            ExprNode::Nonreal => return Ok(()),
            ExprNode::Undefined if solution_type != SolutionType::Formal => {
                return Err(SolverError::EquationUndefined)
            }
            _ => {}
        }

        let digits = policy.significant_digits;
        let mut exact_layout = exact
            .map(|node| Layout::new(ctx, node, digits))
            .filter(|layout| !policy.never_displays_exact(ctx, layout.node, &layout.text));
        let approximate_layout =
            (solution_type != SolutionType::Formal).then(|| Layout::new(ctx, approximate_node, digits));

        let mut equal = false;
        let mut same_text = false;
        if solution_type == SolutionType::Exact {
            if let (Some(exact), Some(approximate)) = (exact_layout.as_ref(), approximate_layout.as_ref()) {
                same_text = exact.text == approximate.text;
                equal = !same_text && exact_and_approximate_are_equal(ctx, exact.node, &approximate.text, reduction);
            }
        }
        if same_text {
            exact_layout = None;
        }

        let value = if solution_type == SolutionType::Formal {
            f64::NAN
        } else {
            approximate(ctx.arena(), approximate_node, reduction, &[]).to_f64()
        };

        assert!(self.solutions.len() < MAX_SOLUTIONS - 1, "solution registry overflow");
        trace!(
            "registering {:?} solution {:?} ~ {:?}",
            solution_type,
            exact_layout.as_ref().map(Layout::text),
            approximate_layout.as_ref().map(Layout::text)
        );
        self.solutions.push(Solution {
            exact: exact_layout,
            approximate: approximate_layout,
            value,
            exact_and_approximate_are_equal: equal,
            solution_type,
        });
        Ok(())
    }

    /// Records a numeric root; values that are not finite are ignored.
    pub fn register_value(&mut self, value: f64) {
        if value.is_finite() && self.solutions.len() < MAX_SOLUTIONS {
            self.solutions.push(Solution {
                value,
                solution_type: SolutionType::Approximate,
                ..Solution::default()
            });
        }
    }

    /// Resets every solution displaying a node allocated at or after
    /// `cursor`, or every solution when there is no cursor.
    pub fn tidy(&mut self, cursor: Option<PoolCursor>) {
        for solution in &mut self.solutions {
            if cursor.map_or(true, |c| solution.references(c)) {
                *solution = Solution::default();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aequa_core::ComplexFormat;

    fn policy() -> DisplayPolicy {
        DisplayPolicy {
            significant_digits: 10,
            max_exact_length: 120,
        }
    }

    fn register(registry: &mut SolutionRegistry, ctx: &mut Context, text: &str, solution_type: SolutionType) -> Result<(), SolverError> {
        let expr = ctx.parse(text).unwrap();
        registry.register(ctx, expr, solution_type, &ReductionContext::default(), policy())
    }

    #[test]
    fn test_identical_forms_keep_only_approximation() {
        let mut ctx = Context::new();
        let mut registry = SolutionRegistry::new();
        register(&mut registry, &mut ctx, "4/2", SolutionType::Exact).unwrap();
        let solution = &registry.as_slice()[0];
        assert!(solution.exact_layout().is_none());
        assert_eq!(solution.approximate_layout().unwrap().text(), "2");
        assert_eq!(solution.value(), 2.0);
    }

    #[test]
    fn test_equal_forms_are_flagged() {
        let mut ctx = Context::new();
        let mut registry = SolutionRegistry::new();
        register(&mut registry, &mut ctx, "1/2", SolutionType::Exact).unwrap();
        register(&mut registry, &mut ctx, "√(2)", SolutionType::Exact).unwrap();
        let [half, root] = registry.as_slice() else {
            panic!("expected two solutions");
        };
        assert_eq!(half.exact_layout().unwrap().text(), "1/2");
        assert_eq!(half.approximate_layout().unwrap().text(), "0.5");
        assert!(half.exact_and_approximate_are_equal());
        assert_eq!(root.exact_layout().unwrap().text(), "√(2)");
        assert!(!root.exact_and_approximate_are_equal());
    }

    #[test]
    fn test_nonreal_is_dropped() {
        let mut ctx = Context::new();
        let mut registry = SolutionRegistry::new();
        register(&mut registry, &mut ctx, "√(-1)", SolutionType::Exact).unwrap();
        assert!(registry.is_empty());

        let cartesian = ReductionContext::default().with_complex_format(ComplexFormat::Cartesian);
        let expr = ctx.parse("√(-1)").unwrap();
        registry.register(&mut ctx, expr, SolutionType::Exact, &cartesian, policy()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.as_slice()[0].value().is_nan());
    }

    #[test]
    fn test_undefined_fails_unless_formal() {
        let mut ctx = Context::new();
        let mut registry = SolutionRegistry::new();
        assert_eq!(
            register(&mut registry, &mut ctx, "1/0", SolutionType::Exact),
            Err(SolverError::EquationUndefined)
        );
        register(&mut registry, &mut ctx, "2*t+1", SolutionType::Formal).unwrap();
        let solution = &registry.as_slice()[0];
        assert_eq!(solution.exact_layout().unwrap().text(), "2*t+1");
        assert!(solution.approximate_layout().is_none());
        assert!(solution.value().is_nan());
    }

    #[test]
    fn test_long_exact_forms_are_hidden() {
        let mut ctx = Context::new();
        let mut registry = SolutionRegistry::new();
        let expr = ctx.parse("√(2)+√(3)").unwrap();
        let short = DisplayPolicy {
            max_exact_length: 4,
            ..policy()
        };
        registry
            .register(&mut ctx, expr, SolutionType::Exact, &ReductionContext::default(), short)
            .unwrap();
        assert!(registry.as_slice()[0].exact_layout().is_none());
        assert!((registry.as_slice()[0].value() - 3.146_264_369_941_972).abs() < 1e-12);
    }

    #[test]
    fn test_numeric_values() {
        let mut registry = SolutionRegistry::new();
        registry.register_value(1.5);
        registry.register_value(f64::NAN);
        registry.register_value(f64::INFINITY);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.as_slice()[0].solution_type(), SolutionType::Approximate);
        assert!(registry.as_slice()[0].approximate_layout().is_none());
    }

    #[test]
    fn test_tidy() {
        let mut ctx = Context::new();
        let mut registry = SolutionRegistry::new();
        register(&mut registry, &mut ctx, "1/3", SolutionType::Exact).unwrap();
        let cursor = ctx.checkpoint();
        register(&mut registry, &mut ctx, "1/7", SolutionType::Exact).unwrap();
        registry.register_value(0.25);

        registry.tidy(Some(cursor));
        let solutions = registry.as_slice();
        assert_eq!(solutions[0].exact_layout().unwrap().text(), "1/3");
        assert!(solutions[1].exact_layout().is_none());
        assert!(solutions[1].value().is_nan());
        assert_eq!(solutions[2].value(), 0.25);

        registry.tidy(None);
        assert!(registry.as_slice().iter().all(|s| s.approximate_layout().is_none()));
    }
}
