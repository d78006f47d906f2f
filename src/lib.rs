//! Crate root: wires together the translation pipeline.
//!
//! - `scanner` performs lexical analysis and produces a flat lexeme vector.
//! - `parser` walks the lexemes by recursive descent and emits assembly as a
//!   side effect of each match.
//! - `codegen` owns the instruction vocabulary and the output buffer.
//! - `error` centralises the diagnostics shared by the other modules.
//!
//! Each call to [`translate`] or [`translate_expression`] owns its own
//! scanner, parse state and output buffer, so translations never share state.

pub mod codegen;
pub mod error;
pub mod parser;
pub mod scanner;

use tracing::debug;

pub use codegen::{Instruction, OutputBuffer};
pub use error::{CompileError, CompileResult, Expected};
pub use scanner::{Lexeme, LexemeKind, scan};

use parser::ParseState;
use scanner::Scanner;

/// Translate a program consisting of a single function declaration.
pub fn translate(source: &[u8]) -> CompileResult<OutputBuffer> {
  run(source, parser::function)
}

/// Translate a bare additive expression.
pub fn translate_expression(source: &[u8]) -> CompileResult<OutputBuffer> {
  run(source, parser::expression)
}

fn run(source: &[u8], rule: fn(&mut ParseState) -> CompileResult<()>) -> CompileResult<OutputBuffer> {
  let mut scanner = Scanner::new(source);
  let lexemes = scanner.by_ref().collect::<CompileResult<Vec<_>>>()?;
  debug!(bytes = source.len(), lexemes = lexemes.len(), "scanned");

  let mut state = ParseState::new(lexemes, scanner.location());
  rule(&mut state)?;
  state.expect_eof()?;

  let out = state.into_output();
  debug!(bytes = out.len(), "translated");
  Ok(out)
}
