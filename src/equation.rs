//! Compiled functions of one variable with their first two derivatives.
//!
//! An `Equation` parses a formula (or takes a ready-made [`Function`] tree),
//! simplifies it, differentiates it twice and JIT-compiles all three trees with
//! Cranelift. Afterwards evaluation is a plain native call.
//!
//! # Example
//!
//! ```
//! use difftree::Equation;
//!
//! let eq = Equation::new("x^3 - 2*x").unwrap();
//! assert_eq!(eq.eval(2.0), 4.0);
//! assert_eq!(eq.derivative(2.0), 10.0);
//! assert_eq!(eq.second_derivative(2.0), 12.0);
//! ```

use std::sync::Arc;

use colored::Colorize;
use rayon::prelude::*;

use crate::backends::vector::Vector;
use crate::builder::build_function;
use crate::errors::EquationError;
use crate::function::Function;
use crate::types::JITFunction;

/// A function of one variable, compiled together with its first and second derivative.
#[derive(Clone)]
pub struct Equation {
    formula: String,
    variable: String,
    function: Function,
    derivative_tree: Function,
    fun: JITFunction,
    derivative: JITFunction,
    second_derivative: JITFunction,
}

impl std::fmt::Debug for Equation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{{")?;
        writeln!(f, "    {}: {}", "Equation".cyan(), self.formula)?;
        writeln!(f, "    {}: {}", "Variable".cyan(), self.variable)?;
        writeln!(f, "    {}: {:?}", "Tree".cyan(), self.function)?;
        writeln!(
            f,
            "    {}: {}",
            "Derivative".cyan(),
            self.derivative_tree.render(&self.variable)
        )?;
        writeln!(f, "}}")
    }
}

impl std::fmt::Display for Equation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{{")?;
        writeln!(f, "    {}: {}", "Equation".cyan(), self.formula)?;
        writeln!(
            f,
            "    {}: {}",
            "Function".cyan(),
            self.function.render(&self.variable)
        )?;
        writeln!(
            f,
            "    {}: {}",
            "Derivative".cyan(),
            self.derivative_tree.render(&self.variable)
        )?;
        writeln!(f, "}}")
    }
}

impl Equation {
    /// Parses and compiles a formula in the variable `x`.
    ///
    /// # Errors
    /// Returns `EquationError` if the formula fails to parse, refers to another
    /// variable, contains a function that cannot be differentiated, or fails to compile.
    pub fn new(formula: impl Into<String>) -> Result<Self, EquationError> {
        Self::with_variable(formula, "x")
    }

    /// Parses and compiles a formula in the given variable.
    ///
    /// ```
    /// # use difftree::Equation;
    /// let eq = Equation::with_variable("sin(t)", "t").unwrap();
    /// assert_eq!(eq.derivative(0.0), 1.0);
    /// ```
    pub fn with_variable(
        formula: impl Into<String>,
        variable: &str,
    ) -> Result<Self, EquationError> {
        let formula = formula.into();
        let function = Function::parse(&formula, variable)?;
        Self::build(formula, variable, function)
    }

    /// Compiles an existing function tree. The formula is the tree rendered in `x`.
    pub fn from_function(function: Function) -> Result<Self, EquationError> {
        Self::build(function.to_string(), "x", function)
    }

    fn build(formula: String, variable: &str, function: Function) -> Result<Self, EquationError> {
        let function = function.simplify();
        let derivative_tree = function.derivative()?.simplify();
        let second_tree = derivative_tree.derivative()?.simplify();

        let fun = build_function(&function)?;
        let derivative = build_function(&derivative_tree)?;
        let second_derivative = build_function(&second_tree)?;

        Ok(Self {
            formula,
            variable: variable.to_string(),
            function,
            derivative_tree,
            fun,
            derivative,
            second_derivative,
        })
    }

    pub fn eval(&self, x: f64) -> f64 {
        (self.fun)(x)
    }

    pub fn derivative(&self, x: f64) -> f64 {
        (self.derivative)(x)
    }

    pub fn second_derivative(&self, x: f64) -> f64 {
        (self.second_derivative)(x)
    }

    /// Evaluates the equation at every point of `xs` in parallel.
    ///
    /// ```
    /// # use difftree::Equation;
    /// let eq = Equation::new("2*x + 1").unwrap();
    /// assert_eq!(eq.eval_vector(&vec![0.0, 1.0, 2.0]), vec![1.0, 3.0, 5.0]);
    /// ```
    pub fn eval_vector<V: Vector>(&self, xs: &V) -> V {
        map_parallel(&self.fun, xs)
    }

    /// Evaluates the first derivative at every point of `xs` in parallel.
    pub fn derivative_vector<V: Vector>(&self, xs: &V) -> V {
        map_parallel(&self.derivative, xs)
    }

    /// Evaluates the second derivative at every point of `xs` in parallel.
    pub fn second_derivative_vector<V: Vector>(&self, xs: &V) -> V {
        map_parallel(&self.second_derivative, xs)
    }

    /// The formula this equation was built from.
    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// The simplified function tree that was compiled.
    pub fn function(&self) -> &Function {
        &self.function
    }

    /// The simplified tree of the first derivative.
    pub fn derivative_function(&self) -> &Function {
        &self.derivative_tree
    }

    /// Returns a handle to the compiled function that can be shared across threads.
    pub fn fun(&self) -> JITFunction {
        Arc::clone(&self.fun)
    }
}

fn map_parallel<V: Vector>(f: &JITFunction, xs: &V) -> V {
    let values = xs.values();
    V::from_values(values.par_iter().map(|&x| f(x)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ConvertError, FunctionError};
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};

    #[test]
    fn test_polynomial_equation() {
        let eq = Equation::new("x^2 - 2*x + 1").unwrap();
        assert_eq!(eq.eval(1.0), 0.0);
        assert_eq!(eq.eval(3.0), 4.0);
        assert_eq!(eq.derivative(3.0), 4.0);
        assert_eq!(eq.second_derivative(-7.0), 2.0);
    }

    #[test]
    fn test_transcendental_equation() {
        let eq = Equation::new("sin(2*x) * exp(x)").unwrap();
        for x in [-1.0f64, 0.0, 0.4, 1.3] {
            let f = (2.0 * x).sin() * x.exp();
            let df = 2.0 * (2.0 * x).cos() * x.exp() + f;
            let d2f = -3.0 * f + 4.0 * (2.0 * x).cos() * x.exp();
            assert_abs_diff_eq!(eq.eval(x), f, epsilon = 1e-12);
            assert_abs_diff_eq!(eq.derivative(x), df, epsilon = 1e-12);
            assert_abs_diff_eq!(eq.second_derivative(x), d2f, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_log_and_sqrt() {
        let eq = Equation::new("ln(x) + sqrt(x)").unwrap();
        let x: f64 = 4.0;
        assert_abs_diff_eq!(eq.eval(x), x.ln() + 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(eq.derivative(x), 1.0 / x + 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(
            eq.second_derivative(x),
            -1.0 / (x * x) - 0.25 / (x * x.sqrt()),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_jit_matches_tree() {
        let f = Function::Cos
            .compose(Function::polynomial(vec![1.0, 0.0, -1.0]).unwrap())
            .add(Function::Exponential.multiply(Function::Sin));
        let eq = Equation::from_function(f.clone()).unwrap();
        let df = f.derivative().unwrap();
        for x in [-2.0, -0.5, 0.0, 0.9, 2.2] {
            assert_abs_diff_eq!(eq.eval(x), f.eval(x).unwrap(), epsilon = 1e-12);
            assert_abs_diff_eq!(eq.derivative(x), df.eval(x).unwrap(), epsilon = 1e-12);
        }
        assert_eq!(eq.formula(), f.to_string());
    }

    #[test]
    fn test_vector_evaluation() {
        let eq = Equation::new("3*x^2").unwrap();
        assert_eq!(eq.eval_vector(&vec![1.0, 2.0]), vec![3.0, 12.0]);
        assert_eq!(eq.derivative_vector(&array![1.0, 2.0]), array![6.0, 12.0]);
        assert_eq!(
            eq.second_derivative_vector(&Array1::from_elem(3, 5.0)),
            array![6.0, 6.0, 6.0]
        );
        assert!(eq.eval_vector(&Vec::<f64>::new()).is_empty());
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            Equation::new("x * y"),
            Err(EquationError::BuildTreeError(ConvertError::VariableNotFound(_)))
        ));
        assert!(matches!(
            Equation::new("f(x)"),
            Err(EquationError::FunctionError(FunctionError::Unimplemented { .. }))
        ));
    }

    #[test]
    fn test_display() {
        let eq = Equation::with_variable("sin(t)", "t").unwrap();
        let shown = eq.to_string();
        assert!(shown.contains("sin(t)"));
        assert!(shown.contains("cos(t)"));
        assert!(format!("{eq:?}").contains("Sin"));
        assert_eq!(eq.variable(), "t");
        assert_eq!(eq.derivative_function(), &Function::Cos);
        assert_eq!(eq.derivative_function().render(eq.variable()), "cos(t)");
    }

    #[test]
    fn test_shared_across_threads() {
        let eq = Equation::new("x^2").unwrap();
        let fun = eq.fun();
        let results: Vec<f64> = (0..8).into_par_iter().map(|i| fun(i as f64)).collect();
        assert_eq!(results[7], 49.0);
        assert_eq!(eq.clone().eval(5.0), 25.0);
    }
}
