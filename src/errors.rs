//! Error types for the difftree crate.
//!
//! This module defines the error types for building, evaluating, parsing and
//! compiling function trees:
//!
//! - `FunctionError`: Errors raised by the function trees themselves
//! - `ConvertError`: Errors during conversion from evalexpr AST to a function tree
//! - `BuilderError`: Errors during JIT compilation with Cranelift
//! - `EquationError`: High-level errors when working with compiled equations
//!
//! Each error type implements the standard Error trait and provides detailed error messages.

use cranelift_codegen::CodegenError;
use cranelift_module::ModuleError;
use evalexpr::{DefaultNumericTypes, EvalexprError};
use thiserror::Error;

/// Errors raised while constructing, evaluating or differentiating function trees.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FunctionError {
    /// An operation was requested on a function that has no rule for it
    #[error("{operation} is not implemented for {function}")]
    Unimplemented {
        operation: &'static str,
        function: String,
    },
    /// The argument passed to an evaluation was of the wrong kind
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },
    /// Invalid construction arguments, such as an empty coefficient list
    #[error("malformed construction: {0}")]
    MalformedConstruction(String),
}

/// Errors that can occur during conversion from evalexpr AST to a function tree.
///
/// Only one free variable is supported, so anything that refers to another identifier
/// or to an operator without a counterpart in the tree is rejected here.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Error when the exponent of a `^` operator is not a numeric constant
    #[error("Could not convert exponent in Exp operator: {0}")]
    ExpOperator(String),
    /// Error when encountering an operator that is not supported by our implementation
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),
    /// Error when the root node does not have exactly one child
    #[error("Expected single child for root node: {0}")]
    RootNode(String),
    /// Error when a constant value is not a number
    #[error("Expected numeric constant: {0}")]
    ConstOperator(String),
    /// Error when an identifier other than the free variable is referenced
    #[error("Variable not found: {0}")]
    VariableNotFound(String),
    /// Error when an operator does not have the expected number of operands
    #[error("Expected {expected} operands, got {got}")]
    Arity { expected: usize, got: usize },
    /// Error raised by the tree constructors while converting
    #[error(transparent)]
    Function(#[from] FunctionError),
}

/// Errors that can occur during JIT compilation of function trees.
#[derive(Error, Debug)]
pub enum BuilderError {
    /// Error when the target machine architecture is not supported
    #[error("host machine is not supported: {0}")]
    HostMachineNotSupported(String),
    /// Error when a Cranelift setting is rejected
    #[error("invalid setting: {0}")]
    SettingError(String),
    /// Error during Cranelift code generation
    #[error("codegen error: {0}")]
    CodegenError(CodegenError),
    /// Error in the Cranelift JIT module
    #[error("module error: {0}")]
    ModuleError(ModuleError),
    /// Error when defining the JIT function
    #[error("function error: {0}")]
    FunctionError(String),
    /// Error when declaring the JIT function or one of its imports
    #[error("declaration error: {0}")]
    DeclarationError(String),
}

/// High-level errors that can occur when working with compiled equations.
///
/// This enum wraps lower-level errors from formula parsing, tree conversion,
/// differentiation and JIT compilation.
#[derive(Debug, Error)]
pub enum EquationError {
    /// Error when parsing the initial formula string with evalexpr
    #[error("Failed to build Evalexpr AST")]
    BuildEvalexprError(#[from] EvalexprError<DefaultNumericTypes>),
    /// Error when converting from evalexpr AST to a function tree
    #[error("Failed to build function tree")]
    BuildTreeError(#[from] ConvertError),
    /// Error when JIT compiling the function tree
    #[error("Failed to build JIT function")]
    BuildFunctionError(#[from] BuilderError),
    /// Error raised by the function tree (e.g. differentiating an abstract function)
    #[error("Function error: {0}")]
    FunctionError(#[from] FunctionError),
}
