//! The set of equations being solved.

use aequa_core::{Context, Equation, ParseError, MAX_EQUATIONS};
use thiserror::Error;

/// Errors raised while filling an [`EquationStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store already holds [`MAX_EQUATIONS`] equations.
    #[error("cannot hold more than {capacity} equations")]
    Full {
        /// Capacity of the store.
        capacity: usize,
    },
    /// The equation text does not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// An equation together with the text it was entered as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEquation {
    text: String,
    equation: Equation,
}

impl StoredEquation {
    /// The text the equation was entered as.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The parsed equation.
    #[must_use]
    pub fn equation(&self) -> &Equation {
        &self.equation
    }
}

/// Ordered, bounded collection of equations.
#[derive(Debug, Clone, Default)]
pub struct EquationStore {
    equations: Vec<StoredEquation>,
}

impl EquationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `text` into `ctx` and appends it; returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Full`] when the store is full and
    /// [`StoreError::Parse`] when the text is not an equation.
    pub fn add(&mut self, ctx: &mut Context, text: &str) -> Result<usize, StoreError> {
        if self.equations.len() >= MAX_EQUATIONS {
            return Err(StoreError::Full {
                capacity: MAX_EQUATIONS,
            });
        }
        let equation = ctx.parse_equation(text)?;
        self.equations.push(StoredEquation {
            text: text.to_string(),
            equation,
        });
        Ok(self.equations.len() - 1)
    }

    /// Removes and returns the equation at `index`.
    pub fn remove(&mut self, index: usize) -> Option<StoredEquation> {
        (index < self.equations.len()).then(|| self.equations.remove(index))
    }

    /// Removes every equation.
    pub fn clear(&mut self) {
        self.equations.clear();
    }

    /// The equation at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&StoredEquation> {
        self.equations.get(index)
    }

    /// Number of equations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.equations.len()
    }

    /// Returns true if there is no equation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    /// Iterates over the equations in order.
    pub fn iter(&self) -> impl Iterator<Item = &StoredEquation> {
        self.equations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let mut ctx = Context::new();
        let mut store = EquationStore::new();
        assert_eq!(store.add(&mut ctx, "x+y=2").unwrap(), 0);
        assert_eq!(store.add(&mut ctx, "x-y=0").unwrap(), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.remove(0).unwrap().text(), "x+y=2");
        assert_eq!(store.get(0).unwrap().text(), "x-y=0");
        assert!(store.remove(5).is_none());
    }

    #[test]
    fn test_capacity() {
        let mut ctx = Context::new();
        let mut store = EquationStore::new();
        for k in 0..MAX_EQUATIONS {
            store.add(&mut ctx, &format!("x={k}")).unwrap();
        }
        assert_eq!(
            store.add(&mut ctx, "x=0"),
            Err(StoreError::Full {
                capacity: MAX_EQUATIONS
            })
        );
    }

    #[test]
    fn test_parse_error() {
        let mut ctx = Context::new();
        let mut store = EquationStore::new();
        assert!(matches!(store.add(&mut ctx, "x+"), Err(StoreError::Parse(_))));
        assert!(store.is_empty());
    }
}
