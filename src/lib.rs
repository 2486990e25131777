//! Function expression trees with analytic differentiation.
//!
//! This crate models mathematical functions of one variable as trees of polynomials,
//! sums, products, compositions and primitive functions (powers, logarithm,
//! exponential, sine and cosine). Trees evaluate on numbers or ndarray arrays,
//! differentiate with the sum, product and chain rules, and render as formulas.
//!
//! A parallel [`Symbolic`] tree manipulates formulas only, so derivatives of named
//! functions such as `f(g(x))` can be written out.
//!
//! Trees can be parsed from strings with [evalexpr](https://github.com/ISibboI/evalexpr)
//! and compiled to native code with
//! [Cranelift](https://github.com/bytecodealliance/wasmtime/tree/main/cranelift).
//!
//! # Example
//!
//! ```rust
//! use difftree::{Equation, Function};
//!
//! // sin(x^2 + 1)
//! let f = Function::Sin.compose(Function::polynomial(vec![1.0, 0.0, 1.0]).unwrap());
//! assert_eq!(f.to_string(), "sin((x)^2 + 1)");
//!
//! // Chain rule
//! let df = f.derivative().unwrap();
//! assert_eq!(df.eval(0.0).unwrap(), 0.0);
//!
//! // JIT-compiled with first and second derivatives
//! let eq = Equation::new("x^2 + 2*x").unwrap();
//! assert_eq!(eq.derivative(1.0), 4.0);
//! ```

pub use equation::Equation;
pub use errors::{BuilderError, ConvertError, EquationError, FunctionError};
pub use function::Function;
pub use polynomial::Polynomial;
pub use symbolic::{Symbolic, Term};
pub use types::{JITFunction, Value};

pub mod prelude {
    pub use crate::backends::vector::Vector;
    pub use crate::builder::build_function;
    pub use crate::convert::build_function_tree;
    pub use crate::equation::Equation;
    pub use crate::function::Function;
    pub use crate::polynomial::Polynomial;
    pub use crate::symbolic::{Symbolic, Term};
    pub use crate::types::Value;
}

/// Containers accepted by batch evaluation
pub mod backends {
    pub mod vector;
}
/// JIT compilation functionality using Cranelift
pub mod builder;
/// IR generation for function trees
mod codegen;
/// Conversion from parsed formulas to function trees
pub mod convert;
/// Compiled equations with derivatives
pub mod equation;
/// Error types for the various failure modes
pub mod errors;
/// Repeated doubling, Fibonacci and FizzBuzz
pub mod exercises;
/// Numeric function trees
pub mod function;
/// Dense polynomials
pub mod polynomial;
/// Placeholder templates shared by both tree families
pub mod render;
/// Symbolic function trees
pub mod symbolic;
/// Shared type definitions
pub mod types;
/// Functions for linking host functions into compiled code
pub(crate) mod operators {
    pub(crate) mod libcall;
    pub(crate) mod power;
}
