//! Dense univariate polynomials.
//!
//! Coefficients are stored highest degree first, so `[1.0, -2.0, 1.0]` is
//! `x^2 - 2x + 1`. A polynomial always holds at least one coefficient; the
//! constructor rejects an empty sequence so `degree` and `derivative` never see one.
//!
//! Polynomials are closed under addition, multiplication and composition. The
//! function tree relies on this to keep sums and products of polynomials flat.

use itertools::{EitherOrBoth, Itertools};
use ndarray::{Array1, Array2};

use crate::errors::FunctionError;
use crate::render::{number, PLACEHOLDER};

/// A polynomial `c_n x^n + ... + c_1 x + c_0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    /// Creates a polynomial from its coefficients, highest degree first.
    ///
    /// # Errors
    /// Returns `FunctionError::MalformedConstruction` if `coeffs` is empty.
    pub fn new(coeffs: Vec<f64>) -> Result<Self, FunctionError> {
        if coeffs.is_empty() {
            return Err(FunctionError::MalformedConstruction(
                "polynomial needs at least one coefficient".to_string(),
            ));
        }
        Ok(Self { coeffs })
    }

    /// `a * x + b`
    pub fn affine(a: f64, b: f64) -> Self {
        Self { coeffs: vec![a, b] }
    }

    /// `a * x`
    pub fn scale(a: f64) -> Self {
        Self::affine(a, 0.0)
    }

    /// The constant polynomial `c`.
    pub fn constant(c: f64) -> Self {
        Self { coeffs: vec![c] }
    }

    /// The identity `x`.
    pub fn identity() -> Self {
        Self::scale(1.0)
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    /// Degree as given by the coefficient count. Leading zeros are not trimmed.
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Evaluates by coefficient expansion, summing from the constant term upwards.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coeffs
            .iter()
            .rev()
            .enumerate()
            .fold(0.0, |acc, (k, c)| acc + c * x.powi(k as i32))
    }

    /// Evaluates every element of `xs` at once through the Vandermonde matrix.
    ///
    /// Column `k` of the matrix holds `x^k`, matching the order of [`Polynomial::evaluate`].
    pub fn evaluate_array(&self, xs: &Array1<f64>) -> Array1<f64> {
        let vander = Array2::from_shape_fn((xs.len(), self.coeffs.len()), |(i, k)| {
            xs[i].powi(k as i32)
        });
        let coeffs: Array1<f64> = self.coeffs.iter().rev().copied().collect();
        vander.dot(&coeffs)
    }

    /// Power rule. The derivative of a constant is the zero polynomial.
    pub fn derivative(&self) -> Self {
        if self.coeffs.len() == 1 {
            return Self::constant(0.0);
        }
        let degree = self.degree();
        let coeffs = self.coeffs[..degree]
            .iter()
            .enumerate()
            .map(|(i, c)| c * (degree - i) as f64)
            .collect();
        Self { coeffs }
    }

    /// Sum of two polynomials. Neither operand is modified.
    pub fn add(&self, other: &Polynomial) -> Self {
        let mut coeffs: Vec<f64> = self
            .coeffs
            .iter()
            .rev()
            .zip_longest(other.coeffs.iter().rev())
            .map(|pair| match pair {
                EitherOrBoth::Both(a, b) => a + b,
                EitherOrBoth::Left(c) | EitherOrBoth::Right(c) => *c,
            })
            .collect();
        coeffs.reverse();
        Self { coeffs }
    }

    /// Product of two polynomials by coefficient convolution.
    pub fn multiply(&self, other: &Polynomial) -> Self {
        let mut coeffs = vec![0.0; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        Self { coeffs }
    }

    /// `self(inner(x))`, expanded with Horner's scheme.
    pub fn compose(&self, inner: &Polynomial) -> Self {
        self.coeffs[1..]
            .iter()
            .fold(Self::constant(self.coeffs[0]), |acc, c| {
                acc.multiply(inner).add(&Self::constant(*c))
            })
    }

    /// Drops leading zero coefficients, keeping at least one.
    pub fn trimmed(&self) -> Self {
        let first = self
            .coeffs
            .iter()
            .position(|c| *c != 0.0)
            .unwrap_or(self.coeffs.len() - 1);
        Self {
            coeffs: self.coeffs[first..].to_vec(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| *c == 0.0)
    }

    /// True if the polynomial is the constant `value`, ignoring leading zeros.
    pub fn is_constant(&self, value: f64) -> bool {
        let trimmed = self.trimmed();
        trimmed.coeffs.len() == 1 && trimmed.coeffs[0] == value
    }

    /// Renders the polynomial with the variable written as the placeholder.
    ///
    /// Zero terms are skipped, unit coefficients are suppressed, and the constant
    /// term only appears when it is nonzero or the sole term.
    pub fn template(&self) -> String {
        let degree = self.degree();
        let mut terms = Vec::with_capacity(self.coeffs.len());
        for (i, &c) in self.coeffs.iter().enumerate() {
            let power = degree - i;
            let term = match power {
                0 if c == 0.0 && !terms.is_empty() => continue,
                0 => number(c),
                _ if c == 0.0 => continue,
                1 if c == 1.0 => PLACEHOLDER.to_string(),
                1 => format!("{}({PLACEHOLDER})", number(c)),
                _ if c == 1.0 => format!("({PLACEHOLDER})^{power}"),
                _ => format!("{}({PLACEHOLDER})^{power}", number(c)),
            };
            terms.push(term);
        }
        terms.iter().join(" + ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn poly(coeffs: &[f64]) -> Polynomial {
        Polynomial::new(coeffs.to_vec()).unwrap()
    }

    #[test]
    fn test_empty_coefficients_rejected() {
        assert!(matches!(
            Polynomial::new(vec![]),
            Err(FunctionError::MalformedConstruction(_))
        ));
    }

    #[test]
    fn test_degree_and_shapes() {
        assert_eq!(poly(&[1.0, -2.0, 1.0]).degree(), 2);
        assert_eq!(Polynomial::affine(2.0, 3.0).coefficients(), &[2.0, 3.0]);
        assert_eq!(Polynomial::scale(4.0).coefficients(), &[4.0, 0.0]);
        assert_eq!(Polynomial::constant(5.0).degree(), 0);
    }

    #[test]
    fn test_evaluate_root() {
        // (x - 1)^2 vanishes at 1
        assert_eq!(poly(&[1.0, -2.0, 1.0]).evaluate(1.0), 0.0);
        assert_eq!(poly(&[2.0, 0.0, 3.0]).evaluate(2.0), 11.0);
    }

    #[test]
    fn test_scalar_matches_array() {
        let p = poly(&[0.5, -1.25, 3.0, 7.0]);
        for x in [-2.0, -0.3, 0.0, 1.7, 4.0] {
            let single = p.evaluate_array(&array![x]);
            assert_abs_diff_eq!(single[0], p.evaluate(x), epsilon = 1e-12);
        }

        let xs = array![-1.0, 0.0, 2.0];
        let ys = poly(&[1.0, 0.0, -1.0]).evaluate_array(&xs);
        assert_eq!(ys, array![0.0, -1.0, 3.0]);
    }

    #[test]
    fn test_derivative() {
        assert_eq!(poly(&[1.0, -2.0, 1.0]).derivative(), poly(&[2.0, -2.0]));
        assert_eq!(poly(&[3.0, 0.0, 0.0, 1.0]).derivative(), poly(&[9.0, 0.0, 0.0]));
        assert_eq!(Polynomial::constant(7.0).derivative(), Polynomial::constant(0.0));
    }

    #[test]
    fn test_add_pads_and_does_not_mutate() {
        let long = poly(&[1.0, 2.0, 3.0]);
        let short = poly(&[10.0, 20.0]);
        let sum = long.add(&short);
        assert_eq!(sum, poly(&[1.0, 12.0, 23.0]));
        assert_eq!(short.add(&long), sum);
        assert_eq!(long, poly(&[1.0, 2.0, 3.0]));
        assert_eq!(short, poly(&[10.0, 20.0]));
    }

    #[test]
    fn test_multiply() {
        // (x + 1)(x - 1) = x^2 - 1
        let p = Polynomial::affine(1.0, 1.0).multiply(&Polynomial::affine(1.0, -1.0));
        assert_eq!(p, poly(&[1.0, 0.0, -1.0]));
    }

    #[test]
    fn test_compose() {
        // (x^2)(x + 1) = x^2 + 2x + 1
        let p = poly(&[1.0, 0.0, 0.0]).compose(&Polynomial::affine(1.0, 1.0));
        assert_eq!(p, poly(&[1.0, 2.0, 1.0]));
    }

    #[test]
    fn test_trimmed() {
        assert_eq!(poly(&[0.0, 0.0, 2.0, 1.0]).trimmed(), poly(&[2.0, 1.0]));
        assert_eq!(poly(&[0.0, 0.0]).trimmed(), Polynomial::constant(0.0));
        assert!(poly(&[0.0, 0.0, 3.0]).is_constant(3.0));
    }

    #[test]
    fn test_template() {
        assert_eq!(poly(&[1.0, -2.0, 1.0]).template(), "({0})^2 + -2({0}) + 1");
        assert_eq!(poly(&[3.0, 0.0, 1.0, 0.0]).template(), "3({0})^3 + {0}");
        assert_eq!(Polynomial::scale(2.5).template(), "2.5({0})");
        assert_eq!(Polynomial::constant(0.0).template(), "0");
        assert_eq!(poly(&[0.0, 0.0]).template(), "0");
    }
}
