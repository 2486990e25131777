//! This module provides functionality for JIT compilation of function trees.
//! It uses Cranelift as the backend compiler to generate native machine code.
//!
//! The main entry points are:
//! - `build_function()` - Compiles a function tree into a callable `f64 -> f64`
//! - `clif_ir()` - Returns the Cranelift IR a tree compiles to, for inspection

use std::sync::Arc;

use cranelift::prelude::{FunctionBuilder, FunctionBuilderContext};
use cranelift_codegen::ir::{types, AbiParam, InstBuilder};
use cranelift_codegen::isa::TargetIsa;
use cranelift_codegen::settings::{self, Configurable};
use cranelift_codegen::Context;
use cranelift_jit::{JITBuilder, JITModule};
use cranelift_module::{Linkage, Module};

use crate::{
    errors::{BuilderError, EquationError},
    function::Function,
    operators::libcall::Libcall,
    types::JITFunction,
};

/// Builds a JIT-compiled function from a function tree.
///
/// The tree is compiled to native machine code with Cranelift. Transcendental
/// primitives call back into the host's `f64` methods.
///
/// # Arguments
/// * `function` - The function tree to compile
///
/// # Returns
/// A thread-safe function of the free variable, wrapped in an Arc so it can be shared
/// between threads.
///
/// # Errors
/// Returns an EquationError if the tree contains an abstract node or compilation fails.
pub fn build_function(function: &Function) -> Result<JITFunction, EquationError> {
    let isa = create_isa()?;
    let (mut module, mut ctx) = create_module_and_context(isa);
    build_function_body(&mut ctx, function, &mut module)?;
    let raw_fn = compile_and_finalize(&mut module, &mut ctx)?;

    Ok(Arc::new(move |x: f64| raw_fn(x)))
}

/// Returns the textual Cranelift IR generated for `function`.
pub fn clif_ir(function: &Function) -> Result<String, EquationError> {
    let isa = create_isa()?;
    let (mut module, mut ctx) = create_module_and_context(isa);
    build_function_body(&mut ctx, function, &mut module)?;
    Ok(ctx.func.display().to_string())
}

fn set_flag(
    builder: &mut settings::Builder,
    name: &str,
    value: &str,
) -> Result<(), BuilderError> {
    builder
        .set(name, value)
        .map_err(|e| BuilderError::SettingError(format!("{name}={value}: {e}")))
}

/// Creates an Instruction Set Architecture (ISA) target for code generation.
///
/// The host architecture is detected by cranelift-native. Code is generated without
/// PIC, optimized for speed, and verified only in debug builds.
///
/// # Errors
/// Returns a BuilderError if:
/// - The host machine architecture is not supported
/// - A setting is rejected
/// - Code generation configuration fails
pub(crate) fn create_isa() -> Result<Arc<dyn TargetIsa>, BuilderError> {
    let mut flag_builder = settings::builder();

    // cranelift-jit resolves symbols by absolute address and rejects PIC.
    set_flag(&mut flag_builder, "use_colocated_libcalls", "false")?;
    set_flag(&mut flag_builder, "is_pic", "false")?;
    set_flag(&mut flag_builder, "opt_level", "speed")?;
    let verify = if cfg!(debug_assertions) { "true" } else { "false" };
    set_flag(&mut flag_builder, "enable_verifier", verify)?;

    let isa_builder = cranelift_native::builder().map_err(|msg| {
        let host = target_lexicon::Triple::host();
        BuilderError::HostMachineNotSupported(format!("{host}: {msg}"))
    })?;

    isa_builder
        .finish(settings::Flags::new(flag_builder))
        .map_err(BuilderError::CodegenError)
}

/// Creates a new JIT module and function context.
///
/// Every [`Libcall`] shim is registered in the module's symbol table, and the
/// context signature is set to `fn(f64) -> f64`.
pub(crate) fn create_module_and_context(isa: Arc<dyn TargetIsa>) -> (JITModule, Context) {
    let mut builder = JITBuilder::with_isa(isa, cranelift_module::default_libcall_names());
    for libcall in Libcall::ALL {
        builder.symbol(libcall.symbol(), libcall.address());
    }

    let module = JITModule::new(builder);
    let mut ctx = module.make_context();

    let mut sig = module.make_signature();
    sig.params.push(AbiParam::new(types::F64));
    sig.returns.push(AbiParam::new(types::F64));
    ctx.func.signature = sig;

    (module, ctx)
}

/// Builds the function body by generating Cranelift IR from the function tree.
///
/// The entry block receives the free variable as its only parameter, the tree is
/// generated on top of it and its value returned.
fn build_function_body(
    ctx: &mut Context,
    function: &Function,
    module: &mut dyn Module,
) -> Result<(), EquationError> {
    let mut builder_ctx = FunctionBuilderContext::new();
    let mut func_builder = FunctionBuilder::new(&mut ctx.func, &mut builder_ctx);

    let entry_block = func_builder.create_block();
    func_builder.switch_to_block(entry_block);
    let x = func_builder.append_block_param(entry_block, types::F64);

    let result = function.codegen(&mut func_builder, module, x)?;
    func_builder.ins().return_(&[result]);

    func_builder.seal_block(entry_block);
    func_builder.finalize();

    Ok(())
}

/// Compiles and finalizes the function, returning a callable function pointer.
///
/// # Errors
/// Returns a BuilderError if declaration, definition or finalization fails.
fn compile_and_finalize(
    module: &mut JITModule,
    ctx: &mut Context,
) -> Result<extern "C" fn(f64) -> f64, BuilderError> {
    let func_id = module
        .declare_function("difftree_jit_fn", Linkage::Local, &ctx.func.signature)
        .map_err(|msg| BuilderError::DeclarationError(msg.to_string()))?;

    module
        .define_function(func_id, ctx)
        .map_err(|msg| BuilderError::FunctionError(msg.to_string()))?;

    module.clear_context(ctx);
    module
        .finalize_definitions()
        .map_err(BuilderError::ModuleError)?;

    // SAFETY: the function was compiled with the signature fn(f64) -> f64 in the host
    // calling convention. JIT memory is never freed, so the pointer outlives the module.
    let func = unsafe {
        std::mem::transmute::<*const u8, extern "C" fn(f64) -> f64>(
            module.get_finalized_function(func_id),
        )
    };
    Ok(func)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FunctionError;
    use approx::assert_abs_diff_eq;

    fn assert_matches_tree(f: &Function, points: &[f64]) {
        let compiled = build_function(f).unwrap();
        for &x in points {
            assert_abs_diff_eq!(compiled(x), f.eval(x).unwrap(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_host_isa_is_not_pic() {
        let isa = create_isa().unwrap();
        assert!(!isa.flags().is_pic());
        assert!(!isa.flags().use_colocated_libcalls());
        let (module, _) = create_module_and_context(isa);
        drop(module);
        let equation = crate::Equation::new("x^2 + sin(x)").unwrap();
        assert_eq!(equation.eval(0.0), 0.0);
    }

    #[test]
    fn test_polynomial() {
        let p = Function::polynomial(vec![2.0, -3.0, 0.0, 1.5]).unwrap();
        assert_matches_tree(&p, &[-2.0, 0.0, 0.5, 3.0]);
        assert_eq!(build_function(&Function::constant(4.0)).unwrap()(10.0), 4.0);
    }

    #[test]
    fn test_primitives() {
        assert_matches_tree(&Function::Sin, &[0.0, 1.0, -2.5]);
        assert_matches_tree(&Function::Cos, &[0.0, 1.0, -2.5]);
        assert_matches_tree(&Function::Exponential, &[0.0, 1.0, -2.5]);
        assert_matches_tree(&Function::Log, &[0.5, 1.0, 7.0]);
    }

    #[test]
    fn test_powers() {
        for n in [0.0, 1.0, 2.0, 3.0, 5.0, 7.0, -1.0, -2.0, -3.0] {
            assert_matches_tree(&Function::Power(n), &[0.5, 1.5, 2.0]);
        }
        assert_matches_tree(&Function::Power(0.5), &[0.25, 4.0]);
        assert_matches_tree(&Function::Power(100.0), &[1.01]);
    }

    #[test]
    fn test_combinators() {
        let f = Function::Sin
            .compose(Function::scale(2.0))
            .multiply(Function::Exponential)
            .add(Function::Log.compose(Function::affine(1.0, 3.0)))
            .divide(Function::Cos.add(Function::constant(2.0)));
        assert_matches_tree(&f, &[-1.0, 0.0, 0.7, 2.0]);
    }

    #[test]
    fn test_derivative_compiles() {
        let f = Function::Sin.compose(Function::polynomial(vec![1.0, 0.0, 1.0]).unwrap());
        let df = f.derivative().unwrap();
        assert_matches_tree(&df, &[-1.0, 0.0, 0.3, 1.2]);
    }

    #[test]
    fn test_abstract_fails() {
        let result = build_function(&Function::abstract_fn("g").compose(Function::Sin));
        assert!(matches!(
            result,
            Err(EquationError::FunctionError(FunctionError::Unimplemented { .. }))
        ));
    }

    #[test]
    fn test_clif_ir() {
        let ir = clif_ir(&Function::Sin).unwrap();
        assert!(ir.contains("call"));
        let ir = clif_ir(&Function::Power(2.0)).unwrap();
        assert!(ir.contains("fmul"));
    }

    #[test]
    fn test_compiled_function_is_shareable() {
        let f = build_function(&Function::Sin).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let f = f.clone();
                std::thread::spawn(move || f(i as f64))
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), (i as f64).sin());
        }
    }
}
