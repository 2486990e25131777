use std::sync::Arc;

use ndarray::Array1;

/// Type alias for a JIT-compiled function of one variable.
///
/// This represents a function that:
/// - Takes the value of the free variable
/// - Returns the f64 result of evaluating the compiled function tree
/// - Is both Send and Sync for thread safety
pub type JITFunction = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// An argument to, or result of, calling a function tree.
///
/// Numbers and arrays are evaluated, text is substituted for the free variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Array(Array1<f64>),
    Text(String),
}

impl Value {
    /// Short name of the variant, used in type mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "number",
            Value::Array(_) => "array",
            Value::Text(_) => "string",
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array1<f64>> {
        match self {
            Value::Array(xs) => Some(xs),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(x)
    }
}

impl From<Array1<f64>> for Value {
    fn from(xs: Array1<f64>) -> Self {
        Value::Array(xs)
    }
}

impl From<Vec<f64>> for Value {
    fn from(xs: Vec<f64>) -> Self {
        Value::Array(Array1::from_vec(xs))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}
