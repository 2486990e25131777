//! Conversion from evalexpr AST nodes into numeric function trees.
//!
//! Formulas such as `"sin(2*x) + x^2"` are parsed by the evalexpr crate and then
//! mapped onto [`Function`] nodes. Arithmetic goes through the tree's combinators, so
//! polynomial subexpressions fold into a single [`Polynomial`](crate::Polynomial) while
//! everything else becomes sums, products and compositions.
//!
//! The main entry point is `build_function_tree`, or [`Function::parse`] to go
//! straight from a string.

use evalexpr::{build_operator_tree, Node, Operator};

use crate::errors::{ConvertError, EquationError};
use crate::exercises::repeated_doubling;
use crate::function::Function;
use crate::polynomial::Polynomial;

/// Largest natural exponent multiplied out into polynomial coefficients; higher
/// powers stay `Power(n)` compositions.
const MAX_EXPANDED_POWER: f64 = 16.0;

/// Converts an evalexpr AST node into a function of `variable`.
///
/// # Supported syntax
/// * Arithmetic: `+`, `-`, `*`, `/` and unary minus
/// * The free variable and numeric constants
/// * `^` with a constant exponent, or with a positive constant base. Natural powers
///   of polynomials are multiplied out
/// * `sin`, `cos`, `exp`, `ln`/`log` and `sqrt`, with or without the `math::` prefix
///
/// Any other single-argument function name becomes an abstract node. It renders
/// but cannot be evaluated or differentiated.
pub fn build_function_tree(node: &Node, variable: &str) -> Result<Function, ConvertError> {
    match node.operator() {
        Operator::Add => {
            let children = node.children();
            let (first, rest) = split_first(children)?;
            rest.iter()
                .try_fold(build_function_tree(first, variable)?, |acc, child| {
                    Ok(acc.add(build_function_tree(child, variable)?))
                })
        }
        Operator::Mul => {
            let children = node.children();
            let (first, rest) = split_first(children)?;
            rest.iter()
                .try_fold(build_function_tree(first, variable)?, |acc, child| {
                    Ok(acc.multiply(build_function_tree(child, variable)?))
                })
        }
        Operator::Sub => {
            let [lhs, rhs] = binary(node)?;
            let lhs = build_function_tree(lhs, variable)?;
            let rhs = build_function_tree(rhs, variable)?;
            Ok(lhs.add(negated(rhs)))
        }
        Operator::Div => {
            let [lhs, rhs] = binary(node)?;
            let numerator = build_function_tree(lhs, variable)?;
            Ok(match constant_value(rhs) {
                Some(c) if c != 0.0 => Function::constant(1.0 / c).multiply(numerator),
                _ => numerator.divide(build_function_tree(rhs, variable)?),
            })
        }
        Operator::Neg => {
            let [child] = unary(node)?;
            Ok(negated(build_function_tree(child, variable)?))
        }
        Operator::Const { value } => match value {
            evalexpr::Value::Float(f) => Ok(Function::constant(*f)),
            evalexpr::Value::Int(i) => Ok(Function::constant(*i as f64)),
            _ => Err(ConvertError::ConstOperator(format!("{value:?}"))),
        },
        Operator::VariableIdentifierRead { identifier } => {
            if identifier == variable {
                Ok(Function::identity())
            } else {
                Err(ConvertError::VariableNotFound(identifier.to_string()))
            }
        }
        Operator::FunctionIdentifier { identifier } => {
            let [argument] = unary(node)?;
            let inner = build_function_tree(argument, variable)?;
            let name = identifier.strip_prefix("math::").unwrap_or(identifier);
            let outer = match name {
                "sin" => Function::Sin,
                "cos" => Function::Cos,
                "exp" => Function::Exponential,
                "ln" | "log" => Function::Log,
                "sqrt" => Function::Power(0.5),
                _ => Function::abstract_fn(name),
            };
            Ok(outer.compose(inner))
        }
        Operator::RootNode => {
            let children = node.children();
            if children.len() == 1 {
                build_function_tree(&children[0], variable)
            } else {
                Err(ConvertError::RootNode(format!(
                    "{} children in {node}",
                    children.len()
                )))
            }
        }
        Operator::Exp => {
            let [base, exponent] = binary(node)?;
            if let Some(n) = constant_value(exponent) {
                return Ok(match build_function_tree(base, variable)? {
                    Function::Polynomial(p)
                        if (0.0..=MAX_EXPANDED_POWER).contains(&n) && n.fract() == 0.0 =>
                    {
                        Function::Polynomial(expand_power(&p, n as u32))
                    }
                    base => base.pow(n),
                });
            }
            match constant_value(base) {
                // c^f = exp(ln(c) * f)
                Some(c) if c > 0.0 => {
                    let exponent = build_function_tree(exponent, variable)?;
                    Ok(Function::Exponential.compose(Function::scale(c.ln()).compose(exponent)))
                }
                _ => Err(ConvertError::ExpOperator(format!(
                    "expected a constant exponent or a positive constant base in {node}"
                ))),
            }
        }
        other => Err(ConvertError::UnsupportedOperator(format!("{other:?}"))),
    }
}

impl Function {
    /// Parses `formula` as a function of `variable`.
    ///
    /// ```
    /// use difftree::Function;
    ///
    /// let f = Function::parse("x^2 - 2*x + 1", "x").unwrap();
    /// assert_eq!(f.eval(1.0).unwrap(), 0.0);
    /// ```
    pub fn parse(formula: &str, variable: &str) -> Result<Function, EquationError> {
        let node: Node = build_operator_tree(formula)?;
        Ok(build_function_tree(&node, variable)?)
    }
}

/// Folds a constant subtree (numbers, unary minus, parentheses) to its value.
fn constant_value(node: &Node) -> Option<f64> {
    match node.operator() {
        Operator::Const { value } => match value {
            evalexpr::Value::Float(f) => Some(*f),
            evalexpr::Value::Int(i) => Some(*i as f64),
            _ => None,
        },
        Operator::Neg | Operator::RootNode if node.children().len() == 1 => {
            let value = constant_value(&node.children()[0])?;
            Some(if matches!(node.operator(), Operator::Neg) {
                -value
            } else {
                value
            })
        }
        _ => None,
    }
}

/// `-f` as a product, so that negated polynomials stay polynomials.
fn negated(f: Function) -> Function {
    Function::constant(-1.0).multiply(f)
}

/// `p^n` for a natural `n`, multiplied out.
fn expand_power(p: &Polynomial, n: u32) -> Polynomial {
    repeated_doubling(p.clone(), u64::from(n), Polynomial::constant(1.0), &|a: &Polynomial, b: &Polynomial| {
        a.multiply(b)
    })
}

fn split_first(children: &[Node]) -> Result<(&Node, &[Node]), ConvertError> {
    children
        .split_first()
        .ok_or(ConvertError::Arity { expected: 2, got: 0 })
}

fn unary(node: &Node) -> Result<[&Node; 1], ConvertError> {
    match node.children() {
        [child] => Ok([child]),
        children => Err(ConvertError::Arity {
            expected: 1,
            got: children.len(),
        }),
    }
}

fn binary(node: &Node) -> Result<[&Node; 2], ConvertError> {
    match node.children() {
        [lhs, rhs] => Ok([lhs, rhs]),
        children => Err(ConvertError::Arity {
            expected: 2,
            got: children.len(),
        }),
    }
}
