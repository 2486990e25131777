//! FizzBuzz.

use std::fmt;

/// What to say for a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FizzBuzz {
    Fizz,
    Buzz,
    FizzBuzz,
    Number(u32),
}

impl fmt::Display for FizzBuzz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FizzBuzz::Fizz => write!(f, "fizz"),
            FizzBuzz::Buzz => write!(f, "buzz"),
            FizzBuzz::FizzBuzz => write!(f, "fizzbuzz"),
            FizzBuzz::Number(n) => write!(f, "{n}"),
        }
    }
}

/// `fizz` for multiples of 3, `buzz` for multiples of 5, `fizzbuzz` for both.
pub fn fizz_buzz_helper(n: u32) -> FizzBuzz {
    match (n % 3 == 0, n % 5 == 0) {
        (true, true) => FizzBuzz::FizzBuzz,
        (true, false) => FizzBuzz::Fizz,
        (false, true) => FizzBuzz::Buzz,
        (false, false) => FizzBuzz::Number(n),
    }
}

/// The answers for `1..=n`.
///
/// ```
/// use difftree::exercises::fizzbuzz;
/// use itertools::Itertools;
///
/// assert_eq!(fizzbuzz(5).join(" "), "1 2 fizz 4 buzz");
/// ```
pub fn fizzbuzz(n: u32) -> impl Iterator<Item = FizzBuzz> {
    (1..=n).map(fizz_buzz_helper)
}
