//! Crate root: wires together the translation pipeline.
//!
//! The stages are intentionally small and composable so they can be evolved
//! independently:
//! - `tokenizer` performs lexical analysis and produces a flat token stream.
//! - `parser` owns all syntactic knowledge and returns the expression AST.
//! - `codegen` lowers the AST into a GLSL snippet over complex-arithmetic
//!   primitives.
//! - `error` centralises the diagnostics shared by the other modules.
//!
//! Around the core sit the renderer-facing helpers: `shader` splices
//! snippets into a shader template and tracks live-recompile state, `tiling`
//! keeps the root-marker and pan/zoom uniform state, and `mandelbrot` holds
//! the CPU reference iteration.

pub mod error;
pub mod mandelbrot;
pub mod parser;
pub mod shader;
pub mod tiling;
pub mod tokenizer;

mod codegen;

pub use error::{CompileError, CompileResult};

/// Translate an expression over the complex variable `z` into a GLSL
/// snippet.
///
/// The translation is a pure function: each call lexes, parses, and emits
/// from scratch, holding no state between invocations. On failure the error
/// describes the offending token and its position; no partial snippet is
/// ever produced.
pub fn expression_to_glsl(expr: &str) -> CompileResult<String> {
  let tokens = tokenizer::tokenize(expr)?;
  let ast = parser::parse(tokens, expr)?;
  Ok(codegen::generate(&ast))
}
