//! Small numeric exercises: repeated doubling, Fibonacci numbers and FizzBuzz.

pub mod egyptian;
pub mod fibonacci;
pub mod fizzbuzz;

pub use egyptian::{egyptian_multiplication, egyptian_power, repeated_doubling};
pub use fibonacci::{fibonacci_iter, fibonacci_power, fibonacci_recursive, MAX_INDEX};
pub use fizzbuzz::{fizz_buzz_helper, fizzbuzz, FizzBuzz};
