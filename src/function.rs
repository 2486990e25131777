//! Numeric function trees of one free variable.
//!
//! This module defines `Function`, an expression tree whose nodes can be:
//!
//! - Evaluated on a number or on an `ndarray` array of numbers
//! - Differentiated analytically, producing a new tree
//! - Rendered as a formula with a placeholder for the free variable
//! - Simplified using algebraic rules
//!
//! # Tree Structure
//! - Polynomials: the only nodes carrying coefficients. Affine, scale and constant
//!   functions are polynomials of a fixed shape.
//! - Primitives: Power, Log, Exponential, Sin, Cos
//! - Combinators: Sum, Product and Compose own their two children
//! - Abstract: a named function without evaluation or differentiation rules
//!
//! # Differentiation
//! The derivative method applies, node by node:
//! - Power rule for polynomials
//! - Sum rule: (f + g)' = f' + g'
//! - Product rule: (f * g)' = f' * g + f * g'
//! - Chain rule: (f ∘ g)' = (f' ∘ g) * g'
//! - (x^n)' = n * x^(n-1), log' = x^(-1), exp' = exp, sin' = cos, cos' = -sin
//!
//! # Combinators
//! Trees are built with the named combinators `add`, `multiply`, `compose`,
//! `negate`, `divide` and `pow`. Sums and products of two polynomials are folded
//! into a single polynomial.

use ndarray::Array1;

use crate::errors::FunctionError;
use crate::polynomial::Polynomial;
use crate::render::{number, substitute, PLACEHOLDER};
use crate::types::Value;

/// Number of points used by [`Function::sample_default`].
pub const DEFAULT_SAMPLES: usize = 100;

/// A node of a numeric function tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    /// Polynomial with coefficients highest degree first
    Polynomial(Polynomial),
    /// Pointwise sum of two functions
    Sum(Box<Function>, Box<Function>),
    /// Pointwise product of two functions
    Product(Box<Function>, Box<Function>),
    /// `outer(inner(x))`
    Compose {
        outer: Box<Function>,
        inner: Box<Function>,
    },
    /// `x^n`
    Power(f64),
    /// Natural logarithm
    Log,
    /// `e^x`
    Exponential,
    /// Sine (argument in radians)
    Sin,
    /// Cosine (argument in radians)
    Cos,
    /// A named function with no known rules
    Abstract(String),
}

#[allow(clippy::should_implement_trait)]
impl Function {
    /// Polynomial node from coefficients, highest degree first.
    ///
    /// # Errors
    /// Returns `FunctionError::MalformedConstruction` if `coeffs` is empty.
    pub fn polynomial(coeffs: Vec<f64>) -> Result<Self, FunctionError> {
        Polynomial::new(coeffs).map(Function::Polynomial)
    }

    /// `a * x + b`
    pub fn affine(a: f64, b: f64) -> Self {
        Function::Polynomial(Polynomial::affine(a, b))
    }

    /// `a * x`
    pub fn scale(a: f64) -> Self {
        Function::Polynomial(Polynomial::scale(a))
    }

    /// The constant function `c`.
    pub fn constant(c: f64) -> Self {
        Function::Polynomial(Polynomial::constant(c))
    }

    /// The identity function `x`.
    pub fn identity() -> Self {
        Function::Polynomial(Polynomial::identity())
    }

    /// A named function that can be composed and rendered but not evaluated.
    pub fn abstract_fn(name: impl Into<String>) -> Self {
        Function::Abstract(name.into())
    }

    /// `self + other`. Two polynomials are added coefficient-wise.
    pub fn add(self, other: Function) -> Function {
        match (self, other) {
            (Function::Polynomial(p), Function::Polynomial(q)) => Function::Polynomial(p.add(&q)),
            (f, g) => Function::Sum(Box::new(f), Box::new(g)),
        }
    }

    /// `self * other`. Two polynomials are multiplied by convolution.
    pub fn multiply(self, other: Function) -> Function {
        match (self, other) {
            (Function::Polynomial(p), Function::Polynomial(q)) => {
                Function::Polynomial(p.multiply(&q))
            }
            (f, g) => Function::Product(Box::new(f), Box::new(g)),
        }
    }

    /// `self(inner(x))`
    pub fn compose(self, inner: Function) -> Function {
        Function::Compose {
            outer: Box::new(self),
            inner: Box::new(inner),
        }
    }

    /// `-self`, built as `Scale(-1) ∘ self`.
    pub fn negate(self) -> Function {
        Function::scale(-1.0).compose(self)
    }

    /// `self / other`, built as `self * other^(-1)`.
    pub fn divide(self, other: Function) -> Function {
        self.multiply(other.pow(-1.0))
    }

    /// `self^n`, built as `Power(n) ∘ self`.
    pub fn pow(self, n: f64) -> Function {
        Function::Power(n).compose(self)
    }

    /// Evaluates the function on a number or an array.
    ///
    /// Arrays are evaluated element-wise and give the same values as evaluating
    /// each element on its own.
    ///
    /// # Errors
    /// - `FunctionError::TypeMismatch` if `x` is text
    /// - `FunctionError::Unimplemented` if the tree contains an abstract function
    pub fn evaluate(&self, x: &Value) -> Result<Value, FunctionError> {
        match x {
            Value::Scalar(x) => self.eval(*x).map(Value::Scalar),
            Value::Array(xs) => self.eval_array(xs).map(Value::Array),
            Value::Text(_) => Err(FunctionError::TypeMismatch {
                expected: "number or array",
                got: x.kind(),
            }),
        }
    }

    /// Evaluates the function at a single point.
    pub fn eval(&self, x: f64) -> Result<f64, FunctionError> {
        match self {
            Function::Polynomial(p) => Ok(p.evaluate(x)),
            Function::Sum(f, g) => Ok(f.eval(x)? + g.eval(x)?),
            Function::Product(f, g) => Ok(f.eval(x)? * g.eval(x)?),
            Function::Compose { outer, inner } => outer.eval(inner.eval(x)?),
            Function::Power(n) => Ok(pow_scalar(x, *n)),
            Function::Log => Ok(x.ln()),
            Function::Exponential => Ok(x.exp()),
            Function::Sin => Ok(x.sin()),
            Function::Cos => Ok(x.cos()),
            Function::Abstract(name) => Err(unimplemented("evaluate", name)),
        }
    }

    /// Evaluates the function on every element of `xs`.
    pub fn eval_array(&self, xs: &Array1<f64>) -> Result<Array1<f64>, FunctionError> {
        match self {
            Function::Polynomial(p) => Ok(p.evaluate_array(xs)),
            Function::Sum(f, g) => Ok(f.eval_array(xs)? + g.eval_array(xs)?),
            Function::Product(f, g) => Ok(f.eval_array(xs)? * g.eval_array(xs)?),
            Function::Compose { outer, inner } => outer.eval_array(&inner.eval_array(xs)?),
            Function::Power(n) => Ok(xs.mapv(|x| pow_scalar(x, *n))),
            Function::Log => Ok(xs.mapv(f64::ln)),
            Function::Exponential => Ok(xs.mapv(f64::exp)),
            Function::Sin => Ok(xs.mapv(f64::sin)),
            Function::Cos => Ok(xs.mapv(f64::cos)),
            Function::Abstract(name) => Err(unimplemented("evaluate", name)),
        }
    }

    /// Calls the function: numbers and arrays are evaluated, text is substituted
    /// for the free variable.
    ///
    /// # Example
    /// ```
    /// use difftree::{Function, Value};
    ///
    /// let f = Function::Sin.compose(Function::scale(2.0));
    /// assert_eq!(f.call("t").unwrap(), Value::Text("sin(2(t))".to_string()));
    /// assert_eq!(f.call(0.0).unwrap(), Value::Scalar(0.0));
    /// ```
    pub fn call(&self, x: impl Into<Value>) -> Result<Value, FunctionError> {
        match x.into() {
            Value::Text(variable) => Ok(Value::Text(self.render(&variable))),
            x => self.evaluate(&x),
        }
    }

    /// Computes the derivative of this function as a new tree.
    ///
    /// # Errors
    /// Returns `FunctionError::Unimplemented` if the tree contains an abstract function.
    pub fn derivative(&self) -> Result<Function, FunctionError> {
        let derivative = match self {
            Function::Polynomial(p) => Function::Polynomial(p.derivative()),

            // (f + g)' = f' + g'
            Function::Sum(f, g) => f.derivative()?.add(g.derivative()?),

            // (f * g)' = f' * g + f * g'
            Function::Product(f, g) => {
                let left = f.derivative()?.multiply((**g).clone());
                let right = (**f).clone().multiply(g.derivative()?);
                left.add(right)
            }

            // (f ∘ g)' = (f' ∘ g) * g'
            Function::Compose { outer, inner } => outer
                .derivative()?
                .compose((**inner).clone())
                .multiply(inner.derivative()?),

            Function::Power(n) if *n == 0.0 => Function::constant(0.0),
            Function::Power(n) => Function::constant(*n).multiply(Function::Power(n - 1.0)),
            Function::Log => Function::Power(-1.0),
            Function::Exponential => Function::Exponential,
            Function::Sin => Function::Cos,
            Function::Cos => Function::Sin.negate(),
            Function::Abstract(name) => return Err(unimplemented("derivative", name)),
        };
        Ok(derivative)
    }

    /// Renders the function with [`PLACEHOLDER`] standing for the free variable.
    pub fn template(&self) -> String {
        match self {
            Function::Polynomial(p) => p.template(),
            Function::Sum(f, g) => format!("({})+({})", f.template(), g.template()),
            Function::Product(f, g) => format!("({})*({})", f.template(), g.template()),
            Function::Compose { outer, inner } => substitute(&outer.template(), &inner.template()),
            Function::Power(n) => format!("({PLACEHOLDER})^({})", number(*n)),
            Function::Log => format!("log({PLACEHOLDER})"),
            Function::Exponential => format!("exp({PLACEHOLDER})"),
            Function::Sin => format!("sin({PLACEHOLDER})"),
            Function::Cos => format!("cos({PLACEHOLDER})"),
            Function::Abstract(name) => format!("{name}({PLACEHOLDER})"),
        }
    }

    /// Renders the function using `variable` as the name of the free variable.
    pub fn render(&self, variable: &str) -> String {
        substitute(&self.template(), variable)
    }

    /// Simplifies the tree with basic algebraic rules.
    ///
    /// - Polynomials lose their leading zeros
    /// - Sums and products of polynomials are folded
    /// - Additive identity: f + 0 → f
    /// - Multiplicative identity and zero: f * 1 → f, f * 0 → 0
    /// - Powers: x^1 ∘ g → g, x^0 ∘ g → 1
    /// - Composition with a constant outer function or identity inner function is dropped
    ///
    /// Rules that discard a subtree never discard an abstract function, so a tree that
    /// fails to evaluate still fails after simplification.
    /// - Composition of two polynomials is expanded
    pub fn simplify(&self) -> Function {
        match self {
            Function::Polynomial(p) => Function::Polynomial(p.trimmed()),

            Function::Sum(f, g) => match (f.simplify(), g.simplify()) {
                (f, g) if g.is_zero() => f,
                (f, g) if f.is_zero() => g,
                (f, g) => f.add(g).simplify_polynomial(),
            },

            Function::Product(f, g) => match (f.simplify(), g.simplify()) {
                (f, g) if f.is_zero() && !g.has_abstract() => Function::constant(0.0),
                (f, g) if g.is_zero() && !f.has_abstract() => Function::constant(0.0),
                (f, g) if g.is_one() => f,
                (f, g) if f.is_one() => g,
                (f, g) => f.multiply(g).simplify_polynomial(),
            },

            Function::Compose { outer, inner } => match (outer.simplify(), inner.simplify()) {
                (Function::Polynomial(p), inner) if p.degree() == 0 && !inner.has_abstract() => {
                    Function::Polynomial(p)
                }
                (Function::Power(n), inner) if n == 0.0 && !inner.has_abstract() => {
                    Function::constant(1.0)
                }
                (Function::Power(n), inner) if n == 1.0 => inner,
                (outer, inner) if inner.is_identity() => outer,
                (Function::Polynomial(p), Function::Polynomial(q)) => {
                    Function::Polynomial(p.compose(&q).trimmed())
                }
                (outer, inner) => outer.compose(inner),
            },

            leaf => leaf.clone(),
        }
    }

    /// Samples the function at `points` evenly spaced values from `start` to `end`.
    ///
    /// Returns the sample positions and the function values, ready to be handed
    /// to a plotting library.
    ///
    /// # Errors
    /// - `FunctionError::MalformedConstruction` if `points` is zero
    /// - Any error raised while evaluating the tree
    pub fn sample(
        &self,
        start: f64,
        end: f64,
        points: usize,
    ) -> Result<(Array1<f64>, Array1<f64>), FunctionError> {
        if points == 0 {
            return Err(FunctionError::MalformedConstruction(
                "cannot sample on zero points".to_string(),
            ));
        }
        let xs = Array1::linspace(start, end, points);
        let ys = self.eval_array(&xs)?;
        Ok((xs, ys))
    }

    /// Samples the function on `[-1, 1]` with [`DEFAULT_SAMPLES`] points.
    pub fn sample_default(&self) -> Result<(Array1<f64>, Array1<f64>), FunctionError> {
        self.sample(-1.0, 1.0, DEFAULT_SAMPLES)
    }

    fn has_abstract(&self) -> bool {
        match self {
            Function::Abstract(_) => true,
            Function::Sum(f, g) | Function::Product(f, g) => f.has_abstract() || g.has_abstract(),
            Function::Compose { outer, inner } => outer.has_abstract() || inner.has_abstract(),
            _ => false,
        }
    }

    fn is_zero(&self) -> bool {
        matches!(self, Function::Polynomial(p) if p.is_zero())
    }

    fn is_one(&self) -> bool {
        matches!(self, Function::Polynomial(p) if p.is_constant(1.0))
    }

    fn is_identity(&self) -> bool {
        matches!(self, Function::Polynomial(p) if p.trimmed() == Polynomial::identity())
    }

    fn simplify_polynomial(self) -> Function {
        match self {
            Function::Polynomial(p) => Function::Polynomial(p.trimmed()),
            other => other,
        }
    }
}

/// Renders the function with `x` as the free variable.
impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render("x"))
    }
}

impl From<Polynomial> for Function {
    fn from(p: Polynomial) -> Self {
        Function::Polynomial(p)
    }
}

/// `x^n` with repeated multiplication for integral exponents.
pub(crate) fn pow_scalar(x: f64, n: f64) -> f64 {
    if n.fract() == 0.0 && n.abs() <= i32::MAX as f64 {
        x.powi(n as i32)
    } else {
        x.powf(n)
    }
}

fn unimplemented(operation: &'static str, name: &str) -> FunctionError {
    FunctionError::Unimplemented {
        operation,
        function: name.to_string(),
    }
}
