//! Linking and calling the transcendental functions from JIT-compiled code.
//!
//! Cranelift has no instructions for `sin`, `cos`, `exp`, `ln` or `pow`, so compiled
//! functions call back into Rust. Each [`Libcall`] owns an `extern "C"` shim whose
//! address is registered with the JIT builder under [`Libcall::symbol`], and is then
//! imported into the module whenever a function tree needs it.

use cranelift::prelude::FunctionBuilder;
use cranelift_codegen::ir::types::F64;
use cranelift_codegen::ir::{AbiParam, InstBuilder, Value};
use cranelift_module::{FuncId, Linkage, Module};

use crate::errors::BuilderError;

extern "C" fn jit_sin(x: f64) -> f64 {
    x.sin()
}

extern "C" fn jit_cos(x: f64) -> f64 {
    x.cos()
}

extern "C" fn jit_exp(x: f64) -> f64 {
    x.exp()
}

extern "C" fn jit_ln(x: f64) -> f64 {
    x.ln()
}

extern "C" fn jit_pow(base: f64, exponent: f64) -> f64 {
    base.powf(exponent)
}

/// A host function callable from compiled code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Libcall {
    Sin,
    Cos,
    Exp,
    Ln,
    Pow,
}

impl Libcall {
    pub(crate) const ALL: [Libcall; 5] = [
        Libcall::Sin,
        Libcall::Cos,
        Libcall::Exp,
        Libcall::Ln,
        Libcall::Pow,
    ];

    /// Name the shim is registered under in the JIT symbol table.
    pub(crate) fn symbol(self) -> &'static str {
        match self {
            Libcall::Sin => "difftree_sin",
            Libcall::Cos => "difftree_cos",
            Libcall::Exp => "difftree_exp",
            Libcall::Ln => "difftree_ln",
            Libcall::Pow => "difftree_pow",
        }
    }

    pub(crate) fn address(self) -> *const u8 {
        match self {
            Libcall::Sin => jit_sin as extern "C" fn(f64) -> f64 as *const u8,
            Libcall::Cos => jit_cos as extern "C" fn(f64) -> f64 as *const u8,
            Libcall::Exp => jit_exp as extern "C" fn(f64) -> f64 as *const u8,
            Libcall::Ln => jit_ln as extern "C" fn(f64) -> f64 as *const u8,
            Libcall::Pow => jit_pow as extern "C" fn(f64, f64) -> f64 as *const u8,
        }
    }

    fn arity(self) -> usize {
        match self {
            Libcall::Pow => 2,
            _ => 1,
        }
    }

    /// Declares the shim as an import of `module`.
    ///
    /// Declaring the same import twice returns the same `FuncId`, so callers link on
    /// every use rather than caching ids.
    pub(crate) fn link(self, module: &mut dyn Module) -> Result<FuncId, BuilderError> {
        let mut sig = module.make_signature();
        for _ in 0..self.arity() {
            sig.params.push(AbiParam::new(F64));
        }
        sig.returns.push(AbiParam::new(F64));

        module
            .declare_function(self.symbol(), Linkage::Import, &sig)
            .map_err(|e| BuilderError::DeclarationError(e.to_string()))
    }

    /// Emits a call to the shim and returns its result.
    pub(crate) fn call(
        self,
        builder: &mut FunctionBuilder,
        module: &mut dyn Module,
        args: &[Value],
    ) -> Result<Value, BuilderError> {
        if args.len() != self.arity() {
            return Err(BuilderError::FunctionError(format!(
                "{} takes {} arguments, got {}",
                self.symbol(),
                self.arity(),
                args.len()
            )));
        }
        let func_id = self.link(module)?;
        let func = module.declare_func_in_func(func_id, builder.func);
        let call = builder.ins().call(func, args);
        Ok(builder.inst_results(call)[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_are_distinct() {
        let symbols: Vec<_> = Libcall::ALL.iter().map(|l| l.symbol()).collect();
        for (i, a) in symbols.iter().enumerate() {
            for b in &symbols[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_shims() {
        assert_eq!(jit_sin(0.0), 0.0);
        assert_eq!(jit_cos(0.0), 1.0);
        assert_eq!(jit_exp(0.0), 1.0);
        assert_eq!(jit_ln(1.0), 0.0);
        assert_eq!(jit_pow(2.0, 0.5), 2f64.sqrt());
    }
}
