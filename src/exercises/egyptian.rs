//! Egyptian multiplication and exponentiation.
//!
//! Both are instances of the same scheme: combine `a` with itself `n` times using an
//! associative operation, in `O(log n)` steps by halving `n` and doubling `a`.

use num_traits::{One, Zero};

fn is_odd(n: u64) -> bool {
    n & 1 == 1
}

/// Combines `a` with itself `n` times under `op`, `identity` being the result for `n == 0`.
///
/// `op` must be associative.
///
/// ```
/// use difftree::exercises::repeated_doubling;
///
/// let s = repeated_doubling("ab".to_string(), 3, String::new(), &|x: &String, y: &String| x.clone() + y);
/// assert_eq!(s, "ababab");
/// ```
pub fn repeated_doubling<T, F>(a: T, n: u64, identity: T, op: &F) -> T
where
    F: Fn(&T, &T) -> T,
{
    match n {
        0 => identity,
        1 => a,
        _ => {
            let doubled = op(&a, &a);
            let half = repeated_doubling(doubled, n / 2, identity, op);
            if is_odd(n) {
                op(&half, &a)
            } else {
                half
            }
        }
    }
}

/// `a * n` by repeated addition.
pub fn egyptian_multiplication<T>(a: T, n: u64) -> T
where
    T: Zero + Clone,
{
    repeated_doubling(a, n, T::zero(), &|x: &T, y: &T| x.clone() + y.clone())
}

/// `a^n` by repeated multiplication.
pub fn egyptian_power<T>(a: T, n: u64) -> T
where
    T: One + Clone,
{
    repeated_doubling(a, n, T::one(), &|x: &T, y: &T| x.clone() * y.clone())
}
