//! Code generation for `x^n`.
//!
//! Small integral exponents are unrolled into multiplications; anything else goes
//! through the `pow` libcall.

use cranelift::prelude::FunctionBuilder;
use cranelift_codegen::ir::{InstBuilder, Value};
use cranelift_module::Module;

use super::libcall::Libcall;
use crate::errors::BuilderError;

/// Largest exponent magnitude that is unrolled instead of calling `pow`.
const MAX_UNROLLED_EXPONENT: f64 = 64.0;

/// Emits `base^exponent`.
pub(crate) fn build_power(
    builder: &mut FunctionBuilder,
    module: &mut dyn Module,
    base: Value,
    exponent: f64,
) -> Result<Value, BuilderError> {
    if exponent.fract() == 0.0 && exponent.abs() <= MAX_UNROLLED_EXPONENT {
        return Ok(integer_power(builder, base, exponent as i64));
    }
    let exponent = builder.ins().f64const(exponent);
    Libcall::Pow.call(builder, module, &[base, exponent])
}

/// Inlined multiplications for common exponents, binary exponentiation for the rest.
fn integer_power(builder: &mut FunctionBuilder, base: Value, exp: i64) -> Value {
    match exp {
        0 => builder.ins().f64const(1.0),
        1 => base,
        2 => builder.ins().fmul(base, base),
        3 => {
            let square = builder.ins().fmul(base, base);
            builder.ins().fmul(square, base)
        }
        4 => {
            let square = builder.ins().fmul(base, base);
            builder.ins().fmul(square, square)
        }
        -1 => {
            let one = builder.ins().f64const(1.0);
            builder.ins().fdiv(one, base)
        }
        -2 => {
            let square = builder.ins().fmul(base, base);
            let one = builder.ins().f64const(1.0);
            builder.ins().fdiv(one, square)
        }
        _ => {
            let mut result = builder.ins().f64const(1.0);
            let mut current = base;
            let mut remaining = exp.unsigned_abs();

            while remaining > 0 {
                if remaining & 1 == 1 {
                    result = builder.ins().fmul(result, current);
                }
                if remaining > 1 {
                    current = builder.ins().fmul(current, current);
                }
                remaining >>= 1;
            }

            if exp < 0 {
                let one = builder.ins().f64const(1.0);
                builder.ins().fdiv(one, result)
            } else {
                result
            }
        }
    }
}
