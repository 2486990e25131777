//! Cranelift IR generation for numeric function trees.

use cranelift::prelude::FunctionBuilder;
use cranelift_codegen::ir::{InstBuilder, Value as IrValue};
use cranelift_module::Module;

use crate::errors::{EquationError, FunctionError};
use crate::function::Function;
use crate::operators::libcall::Libcall;
use crate::operators::power::build_power;
use crate::polynomial::Polynomial;

impl Function {
    /// Emits IR computing `self(x)` and returns the resulting value.
    ///
    /// Compositions are generated inside out: the inner tree's result becomes the
    /// argument of the outer tree.
    ///
    /// # Errors
    /// Abstract nodes have no code and fail with `FunctionError::Unimplemented`.
    pub(crate) fn codegen(
        &self,
        builder: &mut FunctionBuilder,
        module: &mut dyn Module,
        x: IrValue,
    ) -> Result<IrValue, EquationError> {
        match self {
            Function::Polynomial(p) => Ok(horner(builder, p, x)),
            Function::Sum(f, g) => {
                let lhs = f.codegen(builder, module, x)?;
                let rhs = g.codegen(builder, module, x)?;
                Ok(builder.ins().fadd(lhs, rhs))
            }
            Function::Product(f, g) => {
                let lhs = f.codegen(builder, module, x)?;
                let rhs = g.codegen(builder, module, x)?;
                Ok(builder.ins().fmul(lhs, rhs))
            }
            Function::Compose { outer, inner } => {
                let arg = inner.codegen(builder, module, x)?;
                outer.codegen(builder, module, arg)
            }
            Function::Power(n) => Ok(build_power(builder, module, x, *n)?),
            Function::Log => Ok(Libcall::Ln.call(builder, module, &[x])?),
            Function::Exponential => Ok(Libcall::Exp.call(builder, module, &[x])?),
            Function::Sin => Ok(Libcall::Sin.call(builder, module, &[x])?),
            Function::Cos => Ok(Libcall::Cos.call(builder, module, &[x])?),
            Function::Abstract(name) => Err(FunctionError::Unimplemented {
                operation: "compile",
                function: name.clone(),
            }
            .into()),
        }
    }
}

fn horner(builder: &mut FunctionBuilder, p: &Polynomial, x: IrValue) -> IrValue {
    let (lead, rest) = match p.coefficients().split_first() {
        Some(split) => split,
        None => return builder.ins().f64const(0.0),
    };
    let mut acc = builder.ins().f64const(*lead);
    for c in rest {
        acc = builder.ins().fmul(acc, x);
        if *c != 0.0 {
            let c = builder.ins().f64const(*c);
            acc = builder.ins().fadd(acc, c);
        }
    }
    acc
}
