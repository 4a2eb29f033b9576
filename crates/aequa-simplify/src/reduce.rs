//! Bottom-up reduction to canonical form.
//!
//! Children are reduced first, then the parent is rebuilt through the
//! canonical constructors [`Simplifier::add`], [`Simplifier::mul`],
//! [`Simplifier::pow`] and [`Simplifier::apply`]. The result obeys a few
//! structural rules that the solver relies on:
//!
//! - no `Neg` or `Div` nodes survive; `-a` is `(-1)*a` and `a/b` is `a*b^(-1)`;
//! - a product carries at most one numeric factor, stored first;
//! - like terms of a sum are collected and the terms sorted by degree;
//! - unless the target is [`ReductionTarget::SystemForApproximation`],
//!   products of sums are multiplied out;
//! - `undefined` absorbs everything, then `nonreal` does.
//!
//! [`ReductionTarget::SystemForApproximation`]: crate::ReductionTarget::SystemForApproximation

use std::mem;

use aequa_core::order::{compare, compare_terms};
use aequa_core::{ComplexFormat, Constant, Context, ExprArena, ExprHandle, ExprNode, SymbolId};
use aequa_integers::{Integer, Rational};
use log::debug;
use num_traits::{One, Zero};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::reduction::{ReductionContext, SymbolicComputation};

pub(crate) type Operands = SmallVec<[ExprHandle; 4]>;

/// Passes of base merging in a single product.
const MAX_MERGE_PASSES: usize = 4;

/// Limits that keep a reduction from blowing up.
#[derive(Clone, Debug)]
pub struct SimplifierConfig {
    /// Largest number of terms a product of sums may expand to.
    pub max_expanded_terms: usize,
    /// Largest integer power of a sum that is multiplied out.
    pub max_expansion_power: i64,
    /// Largest result size, in bits, of an exact rational power.
    pub max_exponent_bits: f64,
    /// Largest root index extracted from a rational radicand.
    pub max_root_index: u32,
}

impl Default for SimplifierConfig {
    fn default() -> Self {
        Self {
            max_expanded_terms: 256,
            max_expansion_power: 8,
            max_exponent_bits: 4096.0,
            max_root_index: 64,
        }
    }
}

/// Numeric factor of a term.
#[derive(Clone, Debug, PartialEq)]
enum Coefficient {
    Exact(Rational),
    Approximate(f64),
}

impl Coefficient {
    fn of(node: &ExprNode) -> Option<Self> {
        match node {
            ExprNode::Number(value) => Some(Coefficient::Exact(value.clone())),
            ExprNode::Decimal(_) => node.as_decimal().map(Coefficient::Approximate),
            _ => None,
        }
    }

    fn one() -> Self {
        Coefficient::Exact(Rational::one())
    }

    fn value(&self) -> f64 {
        match self {
            Coefficient::Exact(value) => value.to_f64(),
            Coefficient::Approximate(value) => *value,
        }
    }

    fn add(self, other: Self) -> Self {
        match (self, other) {
            (Coefficient::Exact(a), Coefficient::Exact(b)) => Coefficient::Exact(a + b),
            (a, b) => Coefficient::Approximate(a.value() + b.value()),
        }
    }

    fn mul(self, other: Self) -> Self {
        match (self, other) {
            (Coefficient::Exact(a), Coefficient::Exact(b)) => Coefficient::Exact(a * b),
            (a, b) => Coefficient::Approximate(a.value() * b.value()),
        }
    }

    fn is_zero(&self) -> bool {
        match self {
            Coefficient::Exact(value) => value.is_zero(),
            Coefficient::Approximate(value) => *value == 0.0,
        }
    }

    fn is_one(&self) -> bool {
        matches!(self, Coefficient::Exact(value) if value.is_one())
    }

    fn into_expr(self, arena: &mut ExprArena) -> ExprHandle {
        match self {
            Coefficient::Exact(value) => arena.number(value),
            Coefficient::Approximate(value) => arena.decimal(value),
        }
    }
}

/// Rough size in bits of a rational.
fn magnitude_bits(value: &Rational) -> f64 {
    let numerator = value.numerator().to_f64().abs().log2();
    let denominator = value.denominator().to_f64().log2();
    numerator.max(denominator).max(1.0)
}

/// Reduces expressions living in a [`Context`].
///
/// A simplifier memoizes every reduction it performs, so reusing one for
/// several related expressions is cheaper than reducing each separately.
pub struct Simplifier<'a> {
    pub(crate) ctx: &'a mut Context,
    pub(crate) reduction: ReductionContext,
    pub(crate) config: SimplifierConfig,
    cache: FxHashMap<ExprHandle, ExprHandle>,
    expanding: SmallVec<[SymbolId; 4]>,
}

impl<'a> Simplifier<'a> {
    /// Creates a simplifier with the default limits.
    pub fn new(ctx: &'a mut Context, reduction: ReductionContext) -> Self {
        Self::with_config(ctx, reduction, SimplifierConfig::default())
    }

    /// Creates a simplifier with custom limits.
    pub fn with_config(
        ctx: &'a mut Context,
        reduction: ReductionContext,
        config: SimplifierConfig,
    ) -> Self {
        Self {
            ctx,
            reduction,
            config,
            cache: FxHashMap::default(),
            expanding: SmallVec::new(),
        }
    }

    /// The reduction settings in use.
    #[must_use]
    pub fn reduction(&self) -> &ReductionContext {
        &self.reduction
    }

    /// The expression pool.
    #[must_use]
    pub fn arena(&self) -> &ExprArena {
        self.ctx.arena()
    }

    /// The expression pool, mutably.
    pub fn arena_mut(&mut self) -> &mut ExprArena {
        self.ctx.arena_mut()
    }

    /// Reduces an expression to canonical form.
    pub fn reduce(&mut self, expr: ExprHandle) -> ExprHandle {
        if let Some(&done) = self.cache.get(&expr) {
            return done;
        }
        let node = self.ctx.arena().get(expr).clone();
        let reduced = match node {
            ExprNode::Number(_)
            | ExprNode::Decimal(_)
            | ExprNode::Constant(_)
            | ExprNode::Undefined
            | ExprNode::Nonreal => expr,
            ExprNode::Symbol(id) => self.reduce_symbol(expr, id),
            ExprNode::Add(terms) => {
                let terms: Operands = terms.iter().map(|t| self.reduce(*t)).collect();
                self.add(&terms)
            }
            ExprNode::Mul(factors) => {
                let factors: Operands = factors.iter().map(|f| self.reduce(*f)).collect();
                self.mul(&factors)
            }
            ExprNode::Pow { base, exp } => {
                let base = self.reduce(base);
                let exp = self.reduce(exp);
                self.pow(base, exp)
            }
            ExprNode::Neg(arg) => {
                let arg = self.reduce(arg);
                let minus_one = self.ctx.arena_mut().integer(-1);
                self.mul(&[minus_one, arg])
            }
            ExprNode::Div { num, den } => {
                let num = self.reduce(num);
                let den = self.reduce(den);
                let minus_one = self.ctx.arena_mut().integer(-1);
                let inverse = self.pow(den, minus_one);
                self.mul(&[num, inverse])
            }
            ExprNode::Function { func, arg } => {
                let arg = self.reduce(arg);
                self.apply(func, arg)
            }
            ExprNode::Matrix {
                rows,
                cols,
                entries,
            } => {
                let entries = entries.iter().map(|e| self.reduce(*e)).collect();
                self.ctx.arena_mut().matrix(rows, cols, entries)
            }
        };
        self.cache.insert(expr, reduced);
        reduced
    }

    fn reduce_symbol(&mut self, expr: ExprHandle, id: SymbolId) -> ExprHandle {
        let replace = SymbolicComputation::ReplaceAllDefinedSymbolsWithDefinition;
        if self.reduction.symbolic_computation != replace {
            return expr;
        }
        let Some(definition) = self.ctx.definition(id) else {
            return expr;
        };
        if self.expanding.contains(&id) {
            debug!(
                "circular definition of {}",
                self.ctx.arena().symbol_name(id).unwrap_or("?")
            );
            return self.ctx.arena_mut().undefined();
        }
        self.expanding.push(id);
        let reduced = self.reduce(definition);
        self.expanding.pop();
        reduced
    }

    /// `undefined` or `nonreal` when one of the operands is.
    pub(crate) fn poisoned(&mut self, operands: &[ExprHandle]) -> Option<ExprHandle> {
        let arena = self.ctx.arena();
        let undefined = operands
            .iter()
            .any(|h| matches!(arena.get(*h), ExprNode::Undefined));
        let nonreal = operands
            .iter()
            .any(|h| matches!(arena.get(*h), ExprNode::Nonreal));
        if undefined {
            Some(self.ctx.arena_mut().undefined())
        } else if nonreal {
            Some(self.ctx.arena_mut().nonreal())
        } else {
            None
        }
    }

    pub(crate) fn has_matrix(&self, operands: &[ExprHandle]) -> bool {
        let arena = self.ctx.arena();
        operands
            .iter()
            .any(|h| matches!(arena.get(*h), ExprNode::Matrix { .. }))
    }

    fn is_sum(&self, expr: ExprHandle) -> bool {
        matches!(self.ctx.arena().get(expr), ExprNode::Add(_))
    }

    fn terms_of(&self, expr: ExprHandle) -> Operands {
        match self.ctx.arena().get(expr) {
            ExprNode::Add(terms) => terms.clone(),
            _ => smallvec::smallvec![expr],
        }
    }

    // === Sums ===

    /// Canonical sum of reduced terms.
    pub fn add(&mut self, terms: &[ExprHandle]) -> ExprHandle {
        let mut flat = Operands::new();
        for &term in terms {
            flat.extend(self.terms_of(term));
        }
        if let Some(poison) = self.poisoned(&flat) {
            return poison;
        }
        if self.has_matrix(&flat) {
            return self.ctx.arena_mut().add(flat);
        }

        let mut collected: Vec<(Option<ExprHandle>, Coefficient)> = Vec::with_capacity(flat.len());
        let mut index: FxHashMap<Option<ExprHandle>, usize> = FxHashMap::default();
        for term in flat {
            let (coefficient, body) = self.split_term(term);
            match index.get(&body) {
                Some(&i) => {
                    let current = mem::replace(&mut collected[i].1, Coefficient::one());
                    collected[i].1 = current.add(coefficient);
                }
                None => {
                    index.insert(body, collected.len());
                    collected.push((body, coefficient));
                }
            }
        }

        let mut result = Operands::new();
        for (body, coefficient) in collected {
            if !coefficient.is_zero() {
                result.push(self.make_term(coefficient, body));
            }
        }
        let arena = self.ctx.arena();
        result.sort_by(|a, b| compare_terms(arena, *a, *b));
        self.ctx.arena_mut().add(result)
    }

    /// Splits a reduced term into its coefficient and its body.
    fn split_term(&mut self, term: ExprHandle) -> (Coefficient, Option<ExprHandle>) {
        let arena = self.ctx.arena();
        let factors = match arena.get(term) {
            ExprNode::Mul(factors) => factors.clone(),
            node => {
                return match Coefficient::of(node) {
                    Some(coefficient) => (coefficient, None),
                    None => (Coefficient::one(), Some(term)),
                }
            }
        };
        let Some(coefficient) = Coefficient::of(arena.get(factors[0])) else {
            return (Coefficient::one(), Some(term));
        };
        let rest: Operands = factors[1..].iter().copied().collect();
        let body = self.ctx.arena_mut().mul(rest);
        (coefficient, Some(body))
    }

    fn make_term(&mut self, coefficient: Coefficient, body: Option<ExprHandle>) -> ExprHandle {
        let arena = self.ctx.arena_mut();
        let Some(body) = body else {
            return coefficient.into_expr(arena);
        };
        if coefficient.is_one() {
            return body;
        }
        let mut factors = Operands::new();
        factors.push(coefficient.into_expr(arena));
        match arena.get(body) {
            ExprNode::Mul(inner) => factors.extend(inner.iter().copied()),
            _ => factors.push(body),
        }
        arena.mul(factors)
    }

    // === Products ===

    /// Canonical product of reduced factors.
    pub fn mul(&mut self, factors: &[ExprHandle]) -> ExprHandle {
        let mut coefficient = Coefficient::one();
        let mut others = Operands::new();
        self.absorb(factors, &mut coefficient, &mut others);

        if let Some(poison) = self.poisoned(&others) {
            return poison;
        }
        if self.has_matrix(&others) {
            let mut factors = Operands::new();
            if !coefficient.is_one() {
                factors.push(coefficient.into_expr(self.ctx.arena_mut()));
            }
            factors.extend(others);
            return self.ctx.arena_mut().mul(factors);
        }

        for _ in 0..MAX_MERGE_PASSES {
            if coefficient.is_zero() {
                break;
            }
            let (merged, changed) = self.merge_powers(&others);
            others.clear();
            self.absorb(&merged, &mut coefficient, &mut others);
            if !changed {
                break;
            }
        }
        if let Some(poison) = self.poisoned(&others) {
            return poison;
        }
        if coefficient.is_zero() {
            return coefficient.into_expr(self.ctx.arena_mut());
        }
        if self.reduction.expands() && others.iter().any(|f| self.is_sum(*f)) {
            return self.distribute(coefficient, &others);
        }
        self.build_product(coefficient, others)
    }

    /// Moves numbers into the coefficient and flattens nested products.
    fn absorb(&self, factors: &[ExprHandle], coefficient: &mut Coefficient, others: &mut Operands) {
        for &factor in factors {
            match self.ctx.arena().get(factor) {
                ExprNode::Mul(inner) => {
                    let inner = inner.clone();
                    self.absorb(&inner, coefficient, others);
                }
                node => match Coefficient::of(node) {
                    Some(value) => {
                        let current = mem::replace(coefficient, Coefficient::one());
                        *coefficient = current.mul(value);
                    }
                    None => others.push(factor),
                },
            }
        }
    }

    /// Groups factors by base and adds the exponents of each group.
    fn merge_powers(&mut self, factors: &[ExprHandle]) -> (Operands, bool) {
        let one = self.ctx.arena_mut().integer(1);
        let mut groups: Vec<(ExprHandle, Operands, ExprHandle)> = Vec::with_capacity(factors.len());
        let mut index: FxHashMap<ExprHandle, usize> = FxHashMap::default();
        let arena = self.ctx.arena();
        for &factor in factors {
            let (base, exp) = match arena.get(factor) {
                ExprNode::Pow { base, exp } => (*base, *exp),
                _ => (factor, one),
            };
            match index.get(&base) {
                Some(&i) => groups[i].1.push(exp),
                None => {
                    index.insert(base, groups.len());
                    groups.push((base, smallvec::smallvec![exp], factor));
                }
            }
        }

        let mut merged = Operands::new();
        let mut changed = false;
        for (base, exponents, first) in groups {
            if exponents.len() == 1 {
                merged.push(first);
                continue;
            }
            changed = true;
            let exponent = self.add(&exponents);
            merged.push(self.pow(base, exponent));
        }
        (merged, changed)
    }

    fn build_product(&mut self, coefficient: Coefficient, mut others: Operands) -> ExprHandle {
        let arena = self.ctx.arena();
        others.sort_by(|a, b| compare(arena, *a, *b));
        let arena = self.ctx.arena_mut();
        if others.is_empty() {
            return coefficient.into_expr(arena);
        }
        if !coefficient.is_one() {
            others.insert(0, coefficient.into_expr(arena));
        }
        arena.mul(others)
    }

    /// Multiplies out the sums among `factors`.
    fn distribute(&mut self, coefficient: Coefficient, factors: &[ExprHandle]) -> ExprHandle {
        let (sums, rest): (Operands, Operands) =
            factors.iter().copied().partition(|f| self.is_sum(*f));
        let expanded_terms = sums
            .iter()
            .map(|s| self.terms_of(*s).len())
            .try_fold(1usize, usize::checked_mul);
        if expanded_terms.map_or(true, |n| n > self.config.max_expanded_terms) {
            debug!("product of {} sums left unexpanded", sums.len());
            return self.build_product(coefficient, factors.iter().copied().collect());
        }

        let mut partial = vec![self.build_product(coefficient, rest)];
        for sum in sums {
            let terms = self.terms_of(sum);
            let mut next = Vec::with_capacity(partial.len() * terms.len());
            for &p in &partial {
                for &t in &terms {
                    next.push(self.mul(&[p, t]));
                }
            }
            partial = next;
        }
        self.add(&partial)
    }

    // === Powers ===

    /// Canonical power of a reduced base and exponent.
    pub fn pow(&mut self, base: ExprHandle, exp: ExprHandle) -> ExprHandle {
        if let Some(poison) = self.poisoned(&[base, exp]) {
            return poison;
        }
        if self.has_matrix(&[base, exp]) {
            return self.ctx.arena_mut().pow(base, exp);
        }
        let arena = self.ctx.arena();
        let base_node = arena.get(base).clone();
        let exp_node = arena.get(exp).clone();

        if exp_node.is_zero() {
            return if base_node.is_zero() {
                self.ctx.arena_mut().undefined()
            } else {
                self.ctx.arena_mut().integer(1)
            };
        }
        if exp_node.is_one() || base_node.is_one() {
            return base;
        }

        match (&base_node, &exp_node) {
            (ExprNode::Number(b), ExprNode::Number(e)) => self.rational_power(b, e, base, exp),
            (b, e) if b.is_number() && e.is_number() => {
                let b = b.as_decimal().unwrap_or_else(|| b.as_rational().map_or(f64::NAN, Rational::to_f64));
                let e = e.as_decimal().unwrap_or_else(|| e.as_rational().map_or(f64::NAN, Rational::to_f64));
                self.decimal_power(b, e, base, exp)
            }
            (ExprNode::Constant(Constant::I), ExprNode::Number(e)) if e.is_integer() => {
                let quarter = e
                    .to_integer()
                    .map(|n| n % Integer::new(4))
                    .and_then(|n| n.to_i64())
                    .unwrap_or(0)
                    .rem_euclid(4);
                let arena = self.ctx.arena_mut();
                match quarter {
                    0 => arena.integer(1),
                    1 => base,
                    2 => arena.integer(-1),
                    _ => {
                        let minus_one = arena.integer(-1);
                        self.mul(&[minus_one, base])
                    }
                }
            }
            (ExprNode::Pow { base: inner, exp: inner_exp }, ExprNode::Number(e)) if e.is_integer() => {
                let product = self.mul(&[*inner_exp, exp]);
                self.pow(*inner, product)
            }
            (ExprNode::Mul(factors), ExprNode::Number(e)) if e.is_integer() => {
                let powers: Operands = factors.iter().map(|f| self.pow(*f, exp)).collect();
                self.mul(&powers)
            }
            (ExprNode::Mul(factors), ExprNode::Number(_))
                if self
                    .ctx
                    .arena()
                    .get(factors[0])
                    .as_rational()
                    .is_some_and(Rational::is_positive) =>
            {
                // (c*a)^e = c^e * a^e holds for a positive real c.
                let rest: Operands = factors[1..].iter().copied().collect();
                let rest = self.ctx.arena_mut().mul(rest);
                let outer = self.pow(factors[0], exp);
                let inner = self.pow(rest, exp);
                self.mul(&[outer, inner])
            }
            (ExprNode::Add(terms), ExprNode::Number(e))
                if self.reduction.expands()
                    && e.to_i64().is_some_and(|n| (2..=self.config.max_expansion_power).contains(&n)) =>
            {
                let n = e.to_i64().unwrap_or(1);
                let expanded = u32::try_from(n)
                    .ok()
                    .and_then(|n| terms.len().checked_pow(n))
                    .is_some_and(|count| count <= self.config.max_expanded_terms);
                if expanded {
                    self.expand_power(base, n)
                } else {
                    self.ctx.arena_mut().pow(base, exp)
                }
            }
            _ => self.ctx.arena_mut().pow(base, exp),
        }
    }

    fn expand_power(&mut self, base: ExprHandle, n: i64) -> ExprHandle {
        let terms = self.terms_of(base);
        let mut result = base;
        for _ in 1..n {
            let current = self.terms_of(result);
            let mut products = Vec::with_capacity(current.len() * terms.len());
            for &a in &current {
                for &b in &terms {
                    products.push(self.mul(&[a, b]));
                }
            }
            result = self.add(&products);
        }
        result
    }

    fn decimal_power(&mut self, base: f64, exp: f64, base_handle: ExprHandle, exp_handle: ExprHandle) -> ExprHandle {
        let arena = self.ctx.arena_mut();
        if base == 0.0 {
            return if exp > 0.0 { arena.decimal(0.0) } else { arena.undefined() };
        }
        if base < 0.0 && exp.fract() != 0.0 {
            return if self.reduction.complex_format == ComplexFormat::Real {
                arena.nonreal()
            } else {
                arena.pow(base_handle, exp_handle)
            };
        }
        arena.decimal(base.powf(exp))
    }

    fn fits(&self, base: &Rational, exponent: u64) -> bool {
        #[allow(clippy::cast_precision_loss)]
        let exponent = exponent as f64;
        magnitude_bits(base) * exponent <= self.config.max_exponent_bits
    }

    fn rational_power(&mut self, base: &Rational, exp: &Rational, base_handle: ExprHandle, exp_handle: ExprHandle) -> ExprHandle {
        if base.is_zero() {
            let arena = self.ctx.arena_mut();
            return if exp.is_positive() { arena.integer(0) } else { arena.undefined() };
        }
        if let Some(n) = exp.to_i64() {
            if !self.fits(base, n.unsigned_abs()) {
                return self.ctx.arena_mut().pow(base_handle, exp_handle);
            }
            let arena = self.ctx.arena_mut();
            return match base.powi(n) {
                Some(value) => arena.number(value),
                None => arena.pow(base_handle, exp_handle),
            };
        }

        let structural = |s: &mut Self| s.ctx.arena_mut().pow(base_handle, exp_handle);
        let (Some(p), Some(q)) = (exp.numerator().to_i64(), exp.denominator().to_i64()) else {
            return structural(self);
        };
        let Some(index) = u32::try_from(q).ok().filter(|q| *q <= self.config.max_root_index) else {
            return structural(self);
        };

        if base.is_negative() {
            let magnitude = base.abs();
            let real = self.reduction.complex_format == ComplexFormat::Real;
            if q % 2 == 1 {
                if !real {
                    return structural(self);
                }
                // Real odd root: (-a)^(p/q) = (-1)^p * a^(p/q).
                let root = self.radical(&magnitude, p, index, base_handle, exp_handle);
                if p % 2 == 0 {
                    return root;
                }
                let minus_one = self.ctx.arena_mut().integer(-1);
                return self.mul(&[minus_one, root]);
            }
            if real {
                return self.ctx.arena_mut().nonreal();
            }
            if q == 2 {
                let arena = self.ctx.arena_mut();
                let i = arena.constant(Constant::I);
                let p_handle = arena.integer(p);
                let i_power = self.pow(i, p_handle);
                let root = self.radical(&magnitude, p, index, base_handle, exp_handle);
                return self.mul(&[i_power, root]);
            }
            return structural(self);
        }
        self.radical(base, p, index, base_handle, exp_handle)
    }

    /// `base^(p/q)` for a positive rational base, with perfect powers pulled
    /// out of the radical and the denominator rationalized.
    fn radical(&mut self, base: &Rational, p: i64, q: u32, base_handle: ExprHandle, exp_handle: ExprHandle) -> ExprHandle {
        let q_wide = i64::from(q);
        let whole_exponent = p.div_euclid(q_wide);
        let remainder = p.rem_euclid(q_wide);
        let Ok(remainder) = u32::try_from(remainder) else {
            return self.ctx.arena_mut().pow(base_handle, exp_handle);
        };
        let complement = q - remainder;
        if !self.fits(base, whole_exponent.unsigned_abs() + u64::from(q)) {
            return self.ctx.arena_mut().pow(base_handle, exp_handle);
        }
        let Some(whole) = base.powi(whole_exponent) else {
            return self.ctx.arena_mut().undefined();
        };

        // (n/d)^(r/q) = (n^r * d^(q-r))^(1/q) / d
        let numerator = base.numerator();
        let denominator = base.denominator();
        let radicand = numerator.pow(remainder) * denominator.pow(complement);
        let (outside, mut inside) = radicand.split_perfect_power(q);
        let coefficient = whole * Rational::from_integer(outside) / Rational::from_integer(denominator);

        let arena = self.ctx.arena_mut();
        if inside.is_one() {
            return arena.number(coefficient);
        }
        let mut index = q;
        'lower: loop {
            for g in (2..=index).rev().filter(|g| index % g == 0) {
                if let Some(root) = inside.exact_nth_root(g) {
                    inside = root;
                    index /= g;
                    continue 'lower;
                }
            }
            break;
        }
        let radicand = arena.number(Rational::from_integer(inside));
        let root_exponent = arena.rational(1, i64::from(index));
        let radical = arena.pow(radicand, root_exponent);
        if coefficient.is_one() {
            return radical;
        }
        let coefficient = arena.number(coefficient);
        arena.mul(smallvec::smallvec![coefficient, radical])
    }
}

/// Reduces `expr` with a fresh [`Simplifier`].
pub fn reduce(ctx: &mut Context, expr: ExprHandle, reduction: &ReductionContext) -> ExprHandle {
    Simplifier::new(ctx, *reduction).reduce(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduction::ReductionTarget;
    use aequa_core::serialize;

    fn reduced(text: &str) -> String {
        reduced_with(text, &ReductionContext::default())
    }

    fn reduced_with(text: &str, reduction: &ReductionContext) -> String {
        let mut ctx = Context::new();
        let expr = ctx.parse(text).unwrap();
        let r = reduce(&mut ctx, expr, reduction);
        serialize(ctx.arena(), r, 10)
    }

    #[test]
    fn test_collect_like_terms() {
        assert_eq!(reduced("x+x"), "2*x");
        assert_eq!(reduced("x-x"), "0");
        assert_eq!(reduced("3*x+2-x-5"), "2*x-3");
        assert_eq!(reduced("y+x"), "x+y");
    }

    #[test]
    fn test_products_merge_bases() {
        assert_eq!(reduced("x*x"), "x^2");
        assert_eq!(reduced("x^2/x"), "x");
        assert_eq!(reduced("2*x*3"), "6*x");
        assert_eq!(reduced("x/x"), "1");
    }

    #[test]
    fn test_expansion() {
        assert_eq!(reduced("(x+1)*(x-1)"), "x^2-1");
        assert_eq!(reduced("(x+1)^2"), "x^2+2*x+1");
        assert_eq!(reduced("x*(x-5)+6"), "x^2-5*x+6");
        assert_eq!(reduced("-(x+1)"), "-x-1");
    }

    #[test]
    fn test_no_expansion_for_approximation() {
        let reduction = ReductionContext::default().with_target(ReductionTarget::SystemForApproximation);
        assert_eq!(reduced_with("(x+1)*(x-1)", &reduction), "(x-1)*(x+1)");
    }

    #[test]
    fn test_rational_arithmetic() {
        assert_eq!(reduced("1/2+1/3"), "5/6");
        assert_eq!(reduced("2^10"), "1024");
        assert_eq!(reduced("(2/3)^(-2)"), "9/4");
        assert_eq!(reduced("1/0"), "undef");
        assert_eq!(reduced("0^0"), "undef");
    }

    #[test]
    fn test_radicals() {
        assert_eq!(reduced("√(8)"), "2*√(2)");
        assert_eq!(reduced("√(4)"), "2");
        assert_eq!(reduced("1/√(2)"), "√(2)/2");
        assert_eq!(reduced("√(2)*√(2)"), "2");
        assert_eq!(reduced("4^(3/2)"), "8");
        assert_eq!(reduced("4^(1/4)"), "√(2)");
    }

    #[test]
    fn test_negative_radicands() {
        assert_eq!(reduced("(-8)^(1/3)"), "-2");
        assert_eq!(reduced("√(-4)"), "nonreal");
        let cartesian = ReductionContext::default().with_complex_format(ComplexFormat::Cartesian);
        assert_eq!(reduced_with("√(-4)", &cartesian), "2*i");
        assert_eq!(reduced_with("i^2", &cartesian), "-1");
        assert_eq!(reduced_with("i^7", &cartesian), "-i");
    }

    #[test]
    fn test_undefined_dominates() {
        assert_eq!(reduced("√(-4)+1/0"), "undef");
        assert_eq!(reduced("x*undef"), "undef");
    }

    #[test]
    fn test_definitions_replaced_or_kept() {
        let mut ctx = Context::new();
        ctx.define("a", "3").unwrap();
        let expr = ctx.parse("a*x+a").unwrap();
        let replaced = reduce(&mut ctx, expr, &ReductionContext::default());
        assert_eq!(serialize(ctx.arena(), replaced, 10), "3*x+3");

        let keep = ReductionContext::default()
            .with_symbolic_computation(SymbolicComputation::KeepAllSymbols);
        let kept = reduce(&mut ctx, expr, &keep);
        assert_eq!(serialize(ctx.arena(), kept, 10), "a*x+a");
    }

    #[test]
    fn test_circular_definition_is_undefined() {
        let mut ctx = Context::new();
        ctx.define("a", "b+1").unwrap();
        ctx.define("b", "a").unwrap();
        let expr = ctx.parse("a").unwrap();
        let r = reduce(&mut ctx, expr, &ReductionContext::default());
        assert!(matches!(ctx.arena().get(r), ExprNode::Undefined));
    }

    #[test]
    fn test_decimals_stay_approximate() {
        assert_eq!(reduced("1.5+1/2"), "2");
        let mut ctx = Context::new();
        let half = ctx.arena_mut().decimal(0.5);
        let x = ctx.arena_mut().symbol("x");
        let sum = ctx.arena_mut().add(smallvec::smallvec![half, x, half]);
        let r = reduce(&mut ctx, sum, &ReductionContext::default());
        assert_eq!(serialize(ctx.arena(), r, 10), "x+1");
        let terms = ctx.arena().get(r).children();
        assert!(matches!(ctx.arena().get(terms[1]), ExprNode::Decimal(_)));
    }

    #[test]
    fn test_reduce_is_idempotent_on_examples() {
        for text in ["x^2-5*x+6", "√(2)/2", "(x+1)^3", "2^(1/3)*x", "sin(x)+cos(y)"] {
            let mut ctx = Context::new();
            let expr = ctx.parse(text).unwrap();
            let once = reduce(&mut ctx, expr, &ReductionContext::default());
            let twice = reduce(&mut ctx, once, &ReductionContext::default());
            assert_eq!(once, twice, "{text}");
        }
    }
}
