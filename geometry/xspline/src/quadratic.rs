//! Quadratic forms over a vector of unknowns.

use std::ops::{Add, AddAssign};

use crate::{Result, SplineError};
use nalgebra::{DMatrix, DVector};

/// A quadratic function `f(x) = xᵀ A x + bᵀ x + c`.
///
/// Forms over the same unknowns combine by plain addition, which is how a
/// least-squares optimizer accumulates several energy terms before solving.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticForm {
    a: DMatrix<f64>,
    b: DVector<f64>,
    c: f64,
}

impl QuadraticForm {
    /// The zero form over `num_vars` unknowns.
    #[must_use]
    pub fn zeros(num_vars: usize) -> Self {
        Self {
            a: DMatrix::zeros(num_vars, num_vars),
            b: DVector::zeros(num_vars),
            c: 0.0,
        }
    }

    /// Build a form from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`SplineError::InvalidArgument`] unless `a` is square and `b`
    /// has a matching length.
    pub fn new(a: DMatrix<f64>, b: DVector<f64>, c: f64) -> Result<Self> {
        if !a.is_square() || a.nrows() != b.len() {
            return Err(SplineError::invalid_argument(format!(
                "quadratic form dimensions mismatch: A is {}x{}, b has {} entries",
                a.nrows(),
                a.ncols(),
                b.len()
            )));
        }
        Ok(Self { a, b, c })
    }

    /// Number of unknowns.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.b.len()
    }

    /// Quadratic coefficients.
    #[must_use]
    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    /// Linear coefficients.
    #[must_use]
    pub fn b(&self) -> &DVector<f64> {
        &self.b
    }

    /// Constant term.
    #[must_use]
    pub fn c(&self) -> f64 {
        self.c
    }

    /// Add `(constant + Σ coeff · x[var])²` to the form.
    ///
    /// A variable may appear more than once in `terms`.
    ///
    /// # Panics
    ///
    /// Panics if a variable index is out of bounds.
    pub fn add_squared_linear(&mut self, constant: f64, terms: &[(usize, f64)]) {
        for &(i, ci) in terms {
            for &(j, cj) in terms {
                self.a[(i, j)] += ci * cj;
            }
            self.b[i] += 2.0 * constant * ci;
        }
        self.c += constant * constant;
    }

    /// Evaluate the form at `x`.
    ///
    /// # Panics
    ///
    /// Panics if `x` has the wrong length.
    #[must_use]
    pub fn evaluate(&self, x: &DVector<f64>) -> f64 {
        x.dot(&(&self.a * x)) + self.b.dot(x) + self.c
    }

    /// Gradient `(A + Aᵀ) x + b` at `x`.
    ///
    /// # Panics
    ///
    /// Panics if `x` has the wrong length.
    #[must_use]
    pub fn gradient(&self, x: &DVector<f64>) -> DVector<f64> {
        &self.a * x + self.a.tr_mul(x) + &self.b
    }

    /// The form `g(x) = f(x + delta)`.
    ///
    /// Use this after applying a displacement to re-express the same energy
    /// around the new position.
    ///
    /// # Panics
    ///
    /// Panics if `delta` has the wrong length.
    #[must_use]
    pub fn translated(&self, delta: &DVector<f64>) -> Self {
        Self {
            a: self.a.clone(),
            b: self.gradient(delta),
            c: self.evaluate(delta),
        }
    }

    /// The form multiplied by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            a: &self.a * factor,
            b: &self.b * factor,
            c: self.c * factor,
        }
    }
}

impl AddAssign<&QuadraticForm> for QuadraticForm {
    fn add_assign(&mut self, rhs: &QuadraticForm) {
        self.a += &rhs.a;
        self.b += &rhs.b;
        self.c += rhs.c;
    }
}

impl AddAssign for QuadraticForm {
    fn add_assign(&mut self, rhs: QuadraticForm) {
        *self += &rhs;
    }
}

impl Add for QuadraticForm {
    type Output = QuadraticForm;

    fn add(mut self, rhs: QuadraticForm) -> QuadraticForm {
        self += &rhs;
        self
    }
}
