//! Symbolic function trees.
//!
//! `Symbolic` mirrors [`Function`](crate::function::Function), but instead of numbers
//! it produces formula strings. A named function `f` renders as `f({0})` and
//! differentiates to `f'`, so the sum, product and chain rules can be written out
//! for functions whose definition is unknown.
//!
//! ```
//! use difftree::Symbolic;
//!
//! let f = Symbolic::named("f").compose(Symbolic::named("g"));
//! assert_eq!(f.derivative().render("x"), "(f'(g(x))*g'(x))");
//! ```

use crate::render::{number, substitute, PLACEHOLDER};

/// A node of a symbolic function tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbolic {
    /// A named function, `f({0})`
    Named(String),
    /// `(A+B)`
    Sum(Box<Symbolic>, Box<Symbolic>),
    /// `(A*B)`
    Prod(Box<Symbolic>, Box<Symbolic>),
    /// `A(B)`
    Comp(Box<Symbolic>, Box<Symbolic>),
    /// `n*({0})`
    Scale(f64),
    /// The constant `n`
    Const(f64),
    /// `Power({0},n)`
    Power(f64),
    Sin,
    Cos,
    Exp,
}

/// Argument to, or result of, calling a symbolic function.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// A formula string
    Text(String),
    /// Another symbolic node
    Node(Symbolic),
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Term::Text(s.to_string())
    }
}

impl From<String> for Term {
    fn from(s: String) -> Self {
        Term::Text(s)
    }
}

impl From<Symbolic> for Term {
    fn from(node: Symbolic) -> Self {
        Term::Node(node)
    }
}

#[allow(clippy::should_implement_trait)]
impl Symbolic {
    pub fn named(name: impl Into<String>) -> Self {
        Symbolic::Named(name.into())
    }

    /// `self + other`. Two scalings fold into one.
    pub fn add(self, other: Symbolic) -> Symbolic {
        match (self, other) {
            (Symbolic::Scale(n), Symbolic::Scale(m)) => Symbolic::Scale(n + m),
            (a, b) => Symbolic::Sum(Box::new(a), Box::new(b)),
        }
    }

    /// `self * other`
    pub fn multiply(self, other: Symbolic) -> Symbolic {
        Symbolic::Prod(Box::new(self), Box::new(other))
    }

    /// `self(inner)` as a composition node.
    pub fn compose(self, inner: Symbolic) -> Symbolic {
        Symbolic::Comp(Box::new(self), Box::new(inner))
    }

    /// `-self`, i.e. `Scale(-1)` applied to `self`.
    pub fn negate(self) -> Symbolic {
        Symbolic::Scale(-1.0).apply(self)
    }

    /// Applies `self` to another node.
    ///
    /// Constants ignore their argument, a scaling becomes a product with a
    /// constant, everything else becomes a composition.
    pub fn apply(&self, inner: Symbolic) -> Symbolic {
        match self {
            Symbolic::Const(_) => self.clone(),
            Symbolic::Scale(n) => Symbolic::Const(*n).multiply(inner),
            _ => self.clone().compose(inner),
        }
    }

    /// Calls the function on a node or on a formula string.
    ///
    /// A string replaces the placeholder, so `sin` called on `"t"` gives `"sin(t)"`.
    pub fn call(&self, arg: impl Into<Term>) -> Term {
        match arg.into() {
            Term::Node(inner) => Term::Node(self.apply(inner)),
            Term::Text(s) => Term::Text(substitute(&self.template(), &s)),
        }
    }

    /// Formula with [`PLACEHOLDER`] standing for the free variable.
    pub fn template(&self) -> String {
        match self {
            Symbolic::Named(name) => format!("{name}({PLACEHOLDER})"),
            Symbolic::Sum(a, b) => format!("({}+{})", a.template(), b.template()),
            Symbolic::Prod(a, b) => format!("({}*{})", a.template(), b.template()),
            Symbolic::Comp(a, b) => substitute(&a.template(), &b.template()),
            Symbolic::Scale(n) if *n < 0.0 => format!("(-{})*({PLACEHOLDER})", number(-n)),
            Symbolic::Scale(n) => format!("{}*({PLACEHOLDER})", number(*n)),
            Symbolic::Const(n) => number(*n),
            Symbolic::Power(n) => format!("Power({PLACEHOLDER},{})", number(*n)),
            Symbolic::Sin => format!("sin({PLACEHOLDER})"),
            Symbolic::Cos => format!("cos({PLACEHOLDER})"),
            Symbolic::Exp => format!("exp({PLACEHOLDER})"),
        }
    }

    /// Formula with `variable` substituted for the placeholder.
    pub fn render(&self, variable: &str) -> String {
        substitute(&self.template(), variable)
    }

    /// Derivative as a new symbolic tree, following the same rules as the numeric tree.
    pub fn derivative(&self) -> Symbolic {
        match self {
            Symbolic::Named(name) => Symbolic::Named(format!("{name}'")),
            Symbolic::Sum(a, b) => a.derivative().add(b.derivative()),
            Symbolic::Prod(a, b) => {
                let left = a.derivative().multiply((**b).clone());
                let right = (**a).clone().multiply(b.derivative());
                left.add(right)
            }
            Symbolic::Comp(a, b) => a
                .derivative()
                .apply((**b).clone())
                .multiply(b.derivative()),
            Symbolic::Scale(n) => Symbolic::Const(*n),
            Symbolic::Const(_) => Symbolic::Const(0.0),
            Symbolic::Power(n) => Symbolic::Const(*n).multiply(Symbolic::Power(n - 1.0)),
            Symbolic::Sin => Symbolic::Cos,
            Symbolic::Cos => Symbolic::Sin.negate(),
            Symbolic::Exp => Symbolic::Exp,
        }
    }
}

/// Renders the formula with `x` as the free variable.
impl std::fmt::Display for Symbolic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render("x"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates() {
        assert_eq!(Symbolic::named("f").template(), "f({0})");
        assert_eq!(Symbolic::Scale(2.0).template(), "2*({0})");
        assert_eq!(Symbolic::Scale(-3.0).template(), "(-3)*({0})");
        assert_eq!(Symbolic::Const(4.5).template(), "4.5");
        assert_eq!(Symbolic::Power(3.0).template(), "Power({0},3)");
        assert_eq!(
            Symbolic::Sin.add(Symbolic::Cos).template(),
            "(sin({0})+cos({0}))"
        );
        assert_eq!(
            Symbolic::Exp.multiply(Symbolic::named("g")).to_string(),
            "(exp(x)*g(x))"
        );
    }

    #[test]
    fn test_call_with_text() {
        assert_eq!(Symbolic::Sin.call("t"), Term::Text("sin(t)".to_string()));
        assert_eq!(Symbolic::Scale(2.0).call("t"), Term::Text("2*(t)".to_string()));
        assert_eq!(Symbolic::Const(7.0).call("t"), Term::Text("7".to_string()));
        assert_eq!(
            Symbolic::Power(2.0).call("a+b"),
            Term::Text("Power(a+b,2)".to_string())
        );
    }

    #[test]
    fn test_call_with_node() {
        assert_eq!(
            Symbolic::Sin.call(Symbolic::Exp),
            Term::Node(Symbolic::Sin.compose(Symbolic::Exp))
        );
        assert_eq!(
            Symbolic::Scale(3.0).call(Symbolic::Cos),
            Term::Node(Symbolic::Const(3.0).multiply(Symbolic::Cos))
        );
        assert_eq!(
            Symbolic::Const(1.0).call(Symbolic::Cos),
            Term::Node(Symbolic::Const(1.0))
        );
    }

    #[test]
    fn test_composition_rendering() {
        let f = Symbolic::Sin.compose(Symbolic::Exp.compose(Symbolic::named("g")));
        assert_eq!(f.to_string(), "sin(exp(g(x)))");

        let g = Symbolic::Power(2.0).compose(Symbolic::Sin.add(Symbolic::Cos));
        assert_eq!(g.to_string(), "Power((sin(x)+cos(x)),2)");
    }

    #[test]
    fn test_named_derivative() {
        assert_eq!(Symbolic::named("f").derivative(), Symbolic::named("f'"));
        assert_eq!(
            Symbolic::named("f").derivative().derivative().to_string(),
            "f''(x)"
        );
    }

    #[test]
    fn test_sum_and_scale_folding() {
        assert_eq!(
            Symbolic::Scale(2.0).add(Symbolic::Scale(-5.0)),
            Symbolic::Scale(-3.0)
        );
        assert_eq!(
            Symbolic::named("f")
                .add(Symbolic::named("g"))
                .derivative()
                .to_string(),
            "(f'(x)+g'(x))"
        );
    }

    #[test]
    fn test_product_rule() {
        let d = Symbolic::Sin.multiply(Symbolic::Cos).derivative();
        assert_eq!(
            d.to_string(),
            "((cos(x)*cos(x))+(sin(x)*(-1*sin(x))))"
        );
    }

    #[test]
    fn test_chain_rule() {
        let d = Symbolic::named("f").compose(Symbolic::named("g")).derivative();
        assert_eq!(d.to_string(), "(f'(g(x))*g'(x))");

        let d = Symbolic::Exp.compose(Symbolic::Scale(2.0)).derivative();
        assert_eq!(d.to_string(), "(exp(2*(x))*2)");
    }

    #[test]
    fn test_primitive_derivatives() {
        assert_eq!(Symbolic::Sin.derivative(), Symbolic::Cos);
        assert_eq!(
            Symbolic::Cos.derivative(),
            Symbolic::Const(-1.0).multiply(Symbolic::Sin)
        );
        assert_eq!(Symbolic::Exp.derivative(), Symbolic::Exp);
        assert_eq!(Symbolic::Scale(4.0).derivative(), Symbolic::Const(4.0));
        assert_eq!(Symbolic::Const(4.0).derivative(), Symbolic::Const(0.0));
        assert_eq!(
            Symbolic::Power(3.0).derivative().to_string(),
            "(3*Power(x,2))"
        );
    }

    #[test]
    fn test_negate() {
        assert_eq!(Symbolic::named("h").negate().to_string(), "(-1*h(x))");
    }
}
