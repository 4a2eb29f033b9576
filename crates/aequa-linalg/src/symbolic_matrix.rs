//! Dense matrices of expressions.
//!
//! Entries are handles into a [`Context`] pool; every arithmetic step goes
//! through a [`Simplifier`] so that entries stay in canonical form and exact
//! cancellations are seen as exact zeros.

use std::ops::{Index, IndexMut};

use aequa_core::{Context, ExprArena, ExprHandle, ExprNode};
use aequa_simplify::{is_null, ReductionContext, Simplifier, TrinaryBoolean};
use log::trace;

/// Dense matrix of expressions stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolicMatrix {
    /// Matrix entries in row-major order.
    data: Vec<ExprHandle>,
    /// Number of rows.
    num_rows: usize,
    /// Number of columns.
    num_cols: usize,
}

impl SymbolicMatrix {
    /// Creates a matrix filled with the exact zero.
    #[must_use]
    pub fn zeros(arena: &mut ExprArena, num_rows: usize, num_cols: usize) -> Self {
        let zero = arena.integer(0);
        Self {
            data: vec![zero; num_rows * num_cols],
            num_rows,
            num_cols,
        }
    }

    /// Creates a matrix from its rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows do not all have the same length.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<ExprHandle>>) -> Self {
        let num_rows = rows.len();
        let num_cols = rows.first().map_or(0, Vec::len);
        let data: Vec<ExprHandle> = rows.into_iter().flatten().collect();
        assert_eq!(data.len(), num_rows * num_cols, "ragged matrix rows");
        Self {
            data,
            num_rows,
            num_cols,
        }
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Returns the entry at (row, col).
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<ExprHandle> {
        (row < self.num_rows && col < self.num_cols).then(|| self.data[row * self.num_cols + col])
    }

    /// Returns a slice of the specified row.
    #[must_use]
    pub fn row(&self, row: usize) -> &[ExprHandle] {
        let start = row * self.num_cols;
        &self.data[start..start + self.num_cols]
    }

    /// Returns a column as a vector.
    #[must_use]
    pub fn col(&self, col: usize) -> Vec<ExprHandle> {
        (0..self.num_rows).map(|row| self[(row, col)]).collect()
    }

    /// Swaps two rows.
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let i_start = i * self.num_cols;
        let j_start = j * self.num_cols;
        for k in 0..self.num_cols {
            self.data.swap(i_start + k, j_start + k);
        }
    }

    /// Appends a row.
    ///
    /// # Panics
    ///
    /// Panics if the row length differs from the column count.
    pub fn push_row(&mut self, row: &[ExprHandle]) {
        assert_eq!(row.len(), self.num_cols, "row length mismatch");
        self.data.extend_from_slice(row);
        self.num_rows += 1;
    }

    /// Builds the matrix expression holding these entries.
    pub fn to_expression(&self, arena: &mut ExprArena) -> ExprHandle {
        arena.matrix(self.num_rows, self.num_cols, self.data.clone())
    }

    /// Reduces every entry; returns false if one of them is undefined.
    pub fn canonize(&mut self, ctx: &mut Context, reduction: &ReductionContext) -> bool {
        let mut simplifier = Simplifier::new(ctx, *reduction);
        self.canonize_with(&mut simplifier)
    }

    fn canonize_with(&mut self, simplifier: &mut Simplifier<'_>) -> bool {
        for entry in &mut self.data {
            *entry = simplifier.reduce(*entry);
        }
        let arena = simplifier.arena();
        !self
            .data
            .iter()
            .any(|e| matches!(arena.get(*e), ExprNode::Undefined))
    }

    /// Brings the matrix to reduced row echelon form, in place, over every
    /// column, and returns its rank.
    ///
    /// A pivot is the first entry of its column known to be non-null, or
    /// failing that the first one that cannot be decided. Returns `None` if
    /// an entry is undefined.
    pub fn rank(&mut self, ctx: &mut Context, reduction: &ReductionContext) -> Option<usize> {
        let mut simplifier = Simplifier::new(ctx, *reduction);
        if !self.canonize_with(&mut simplifier) {
            return None;
        }
        let minus_one = simplifier.arena_mut().integer(-1);
        let one = simplifier.arena_mut().integer(1);

        let mut pivot_row = 0;
        let mut pivot_col = 0;
        while pivot_row < self.num_rows && pivot_col < self.num_cols {
            let Some(candidate) = self.find_pivot(simplifier.arena(), reduction, pivot_row, pivot_col) else {
                pivot_col += 1;
                continue;
            };
            self.swap_rows(pivot_row, candidate);

            // Scale the pivot row so that the pivot is 1.
            let pivot = self[(pivot_row, pivot_col)];
            let inverse = simplifier.pow(pivot, minus_one);
            for col in pivot_col + 1..self.num_cols {
                let entry = self[(pivot_row, col)];
                self[(pivot_row, col)] = simplifier.mul(&[entry, inverse]);
            }
            self[(pivot_row, pivot_col)] = one;

            // Clear the pivot column everywhere else.
            for row in 0..self.num_rows {
                if row == pivot_row {
                    continue;
                }
                let factor = self[(row, pivot_col)];
                if is_null(simplifier.arena(), factor, reduction) == TrinaryBoolean::True {
                    continue;
                }
                let scale = simplifier.mul(&[minus_one, factor]);
                for col in pivot_col..self.num_cols {
                    let shift = simplifier.mul(&[scale, self[(pivot_row, col)]]);
                    let entry = self[(row, col)];
                    self[(row, col)] = simplifier.add(&[entry, shift]);
                }
            }
            pivot_row += 1;
            pivot_col += 1;
        }

        let arena = simplifier.arena();
        if self
            .data
            .iter()
            .any(|e| matches!(arena.get(*e), ExprNode::Undefined))
        {
            return None;
        }
        trace!("rank {pivot_row} for a {}x{} matrix", self.num_rows, self.num_cols);
        Some(pivot_row)
    }

    fn find_pivot(&self, arena: &ExprArena, reduction: &ReductionContext, from: usize, col: usize) -> Option<usize> {
        let nullity = |row: usize| is_null(arena, self[(row, col)], reduction);
        (from..self.num_rows)
            .find(|row| nullity(*row) == TrinaryBoolean::False)
            .or_else(|| (from..self.num_rows).find(|row| nullity(*row) == TrinaryBoolean::Unknown))
    }

    /// Columns holding a pivot, for a matrix in reduced row echelon form.
    #[must_use]
    pub fn pivot_columns(&self, arena: &ExprArena, reduction: &ReductionContext) -> Vec<usize> {
        (0..self.num_rows)
            .filter_map(|row| {
                self.row(row)
                    .iter()
                    .position(|e| is_null(arena, *e, reduction) != TrinaryBoolean::True)
            })
            .collect()
    }
}

impl Index<(usize, usize)> for SymbolicMatrix {
    type Output = ExprHandle;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[row * self.num_cols + col]
    }
}

impl IndexMut<(usize, usize)> for SymbolicMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.data[row * self.num_cols + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aequa_core::serialize;
    use aequa_simplify::ReductionTarget;

    fn analysis() -> ReductionContext {
        ReductionContext::default().with_target(ReductionTarget::SystemForAnalysis)
    }

    fn matrix(ctx: &mut Context, rows: &[&[&str]]) -> SymbolicMatrix {
        SymbolicMatrix::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|text| ctx.parse(text).unwrap()).collect())
                .collect(),
        )
    }

    fn texts(ctx: &Context, m: &SymbolicMatrix) -> Vec<String> {
        (0..m.num_rows())
            .flat_map(|row| m.row(row).to_vec())
            .map(|e| serialize(ctx.arena(), e, 10))
            .collect()
    }

    #[test]
    fn test_full_rank() {
        let mut ctx = Context::new();
        let mut m = matrix(&mut ctx, &[&["1", "1", "2"], &["1", "-1", "0"]]);
        assert_eq!(m.rank(&mut ctx, &analysis()), Some(2));
        assert_eq!(texts(&ctx, &m), ["1", "0", "1", "0", "1", "1"]);
    }

    #[test]
    fn test_dependent_rows() {
        let mut ctx = Context::new();
        let mut m = matrix(&mut ctx, &[&["1", "1", "1"], &["2", "2", "2"]]);
        assert_eq!(m.rank(&mut ctx, &analysis()), Some(1));
        assert_eq!(m.pivot_columns(ctx.arena(), &analysis()), [0]);
    }

    #[test]
    fn test_pivot_skips_zero_column_entries() {
        let mut ctx = Context::new();
        let mut m = matrix(&mut ctx, &[&["0", "2", "4"], &["3", "0", "6"]]);
        assert_eq!(m.rank(&mut ctx, &analysis()), Some(2));
        assert_eq!(texts(&ctx, &m), ["1", "0", "2", "0", "1", "2"]);
    }

    #[test]
    fn test_symbolic_entries() {
        let mut ctx = Context::new();
        let mut m = matrix(&mut ctx, &[&["1", "0", "1"], &["0", "1", "t"]]);
        assert_eq!(m.rank(&mut ctx, &analysis()), Some(2));
        assert_eq!(serialize(ctx.arena(), m[(1, 2)], 10), "t");
    }

    #[test]
    fn test_undefined_entry() {
        let mut ctx = Context::new();
        let mut m = matrix(&mut ctx, &[&["1/0", "1"]]);
        assert_eq!(m.rank(&mut ctx, &analysis()), None);
    }

    #[test]
    fn test_push_row() {
        let mut ctx = Context::new();
        let mut m = SymbolicMatrix::zeros(ctx.arena_mut(), 1, 3);
        let one = ctx.arena_mut().integer(1);
        let zero = ctx.arena_mut().integer(0);
        m.push_row(&[zero, one, zero]);
        assert_eq!(m.num_rows(), 2);
        assert_eq!(m.col(1), [zero, one]);
        let expr = m.to_expression(ctx.arena_mut());
        assert_eq!(serialize(ctx.arena(), expr, 10), "[[0,0,0],[0,1,0]]");
    }
}
