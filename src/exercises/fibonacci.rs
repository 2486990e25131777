//! Fibonacci numbers three ways.
//!
//! `F(0) = 0`, `F(1) = 1`. Results are `u64`, which holds every value up to
//! `F(MAX_INDEX)`; larger indices return `None`.

use ndarray::{array, Array2};

use super::egyptian::repeated_doubling;

/// Largest `n` whose Fibonacci number fits in a `u64`.
pub const MAX_INDEX: u64 = 93;

/// Naive recursion, exponential in `n`.
pub fn fibonacci_recursive(n: u64) -> Option<u64> {
    match n {
        0 => Some(0),
        1 => Some(1),
        _ => fibonacci_recursive(n - 1)?.checked_add(fibonacci_recursive(n - 2)?),
    }
}

/// Iterates the pair `(F(k-1), F(k))`.
pub fn fibonacci_iter(n: u64) -> Option<u64> {
    if n == 0 {
        return Some(0);
    }
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 1..n {
        (a, b) = (b, a.checked_add(b)?);
    }
    Some(b)
}

/// Raises `[[1, 1], [1, 0]]` to the power `n - 1` by repeated squaring.
///
/// Every intermediate matrix holds Fibonacci numbers no larger than `F(n)`, so the
/// index is checked once up front.
///
/// ```
/// use difftree::exercises::fibonacci_power;
///
/// assert_eq!(fibonacci_power(10), Some(55));
/// assert_eq!(fibonacci_power(94), None);
/// ```
pub fn fibonacci_power(n: u64) -> Option<u64> {
    match n {
        0 => Some(0),
        _ if n > MAX_INDEX => None,
        _ => {
            let step: Array2<u64> = array![[1, 1], [1, 0]];
            let identity = Array2::<u64>::eye(2);
            let evolve =
                repeated_doubling(step, n - 1, identity, &|a: &Array2<u64>, b: &Array2<u64>| {
                    a.dot(b)
                });
            // evolve · [1, 0]ᵀ picks the first column
            Some(evolve[[0, 0]])
        }
    }
}
