//! Placeholder substitution shared by the numeric and symbolic trees.
//!
//! Both families render themselves as a template in which the free variable is
//! written as [`PLACEHOLDER`]. Composition and string calls replace every
//! occurrence of the placeholder with another string. The replacement is wrapped
//! in parentheses when it contains a top-level operator and the placeholder is not
//! already enclosed by a bracket pair (or an argument separator).

/// Token standing for the free variable in a rendered template.
pub const PLACEHOLDER: &str = "{0}";

/// Returns true when `s` has an operator or space outside of any parentheses.
///
/// A leading minus sign counts as an operator so that `-2` ends up as `(-2)`.
pub(crate) fn needs_parens(s: &str) -> bool {
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '+' | '-' | '*' | '/' | '^' | ' ' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

/// Replaces every placeholder in `template` by `arg`.
///
/// Occurrences already written as `(…)` or `(…,` keep `arg` as is, others get
/// `(arg)` when [`needs_parens`] says so.
pub fn substitute(template: &str, arg: &str) -> String {
    let wrapped = format!("({arg})");
    let mut out = String::with_capacity(template.len() + arg.len());
    let mut rest = template;
    while let Some(pos) = rest.find(PLACEHOLDER) {
        let (before, after) = (&rest[..pos], &rest[pos + PLACEHOLDER.len()..]);
        let enclosed = before.ends_with('(') && (after.starts_with(')') || after.starts_with(','));
        out.push_str(before);
        if enclosed || !needs_parens(arg) {
            out.push_str(arg);
        } else {
            out.push_str(&wrapped);
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Formats a number the way templates print coefficients (`2` rather than `2.0`).
pub(crate) fn number(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_parens() {
        assert!(!needs_parens("x"));
        assert!(!needs_parens("{0}"));
        assert!(!needs_parens("sin({0})"));
        assert!(!needs_parens("2({0})"));
        assert!(needs_parens("({0})^2 + 1"));
        assert!(needs_parens("-2"));
        assert!(needs_parens("(a)*(b)"));
    }

    #[test]
    fn test_substitute_enclosed() {
        assert_eq!(substitute("sin({0})", "x + 1"), "sin(x + 1)");
        assert_eq!(substitute("Power({0},3)", "a*b"), "Power(a*b,3)");
        assert_eq!(substitute("({0})^2", "sin({0})"), "(sin({0}))^2");
    }

    #[test]
    fn test_substitute_bare() {
        assert_eq!(substitute("{0} + 1", "x"), "x + 1");
        assert_eq!(substitute("{0} + 1", "(x)*(y)"), "((x)*(y)) + 1");
        assert_eq!(substitute("3", "x"), "3");
    }

    #[test]
    fn test_substitute_every_occurrence() {
        assert_eq!(substitute("(f({0})+g({0}))", "t"), "(f(t)+g(t))");
    }
}
