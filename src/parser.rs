//! Single-pass recursive-descent parser that emits assembly as it matches.
//!
//! There is no syntax tree. Each grammar rule consumes lexemes through
//! [`ParseState`] and writes instructions straight into the state's
//! [`OutputBuffer`]:
//!
//! ```text
//! function   := identifier "(" ")" type "{" expression "}"
//! type       := "i32"
//! expression := term { ("+" | "-") term }
//! term       := digit
//! ```
//!
//! Every instruction is written only after the lexemes it describes have been
//! matched. A failing rule returns the error and the caller drops the buffer.
//!
//! A function is framed as a standalone NASM unit: the name is exported with
//! `global`, the body goes in `.text` and ends in `ret`. A bare expression
//! gets no framing.

use tracing::debug;

use crate::codegen::{Instruction, OutputBuffer};
use crate::error::{CompileError, CompileResult, Expected};
use crate::scanner::{Lexeme, LexemeKind, describe_lexeme};

/// The only type keyword the language knows.
pub const I32: &str = "i32";

/// Lexeme cursor plus the output it feeds.
pub struct ParseState {
  lexemes: Vec<Lexeme>,
  pos: usize,
  /// Position reported when the lookahead runs past the last lexeme.
  end: (usize, usize),
  out: OutputBuffer,
}

impl ParseState {
  /// Take ownership of the lexemes; `end` is the (line, column) just past
  /// the source, used when a rule hits end of input.
  pub fn new(lexemes: Vec<Lexeme>, end: (usize, usize)) -> Self {
    Self {
      lexemes,
      pos: 0,
      end,
      out: OutputBuffer::new(),
    }
  }

  /// The first unconsumed lexeme.
  pub fn peek(&self) -> Option<&Lexeme> {
    self.lexemes.get(self.pos)
  }

  pub fn peek_kind(&self) -> Option<LexemeKind> {
    self.peek().map(|lexeme| lexeme.kind)
  }

  pub fn is_eof(&self) -> bool {
    self.pos >= self.lexemes.len()
  }

  /// Consume the lookahead if it has the given kind, otherwise fail naming
  /// both the expectation and what was found.
  pub fn expect(&mut self, kind: LexemeKind) -> CompileResult<Lexeme> {
    match self.lexemes.get(self.pos) {
      Some(lexeme) if lexeme.kind == kind => {
        let lexeme = lexeme.clone();
        self.pos += 1;
        Ok(lexeme)
      }
      _ => Err(self.error(Expected::Lexeme(kind))),
    }
  }

  /// Build a parse error against the current lookahead.
  pub fn error(&self, expected: Expected) -> CompileError {
    let (line, column) = match self.peek() {
      Some(lexeme) => (lexeme.line, lexeme.column),
      None => self.end,
    };
    CompileError::Parse {
      line,
      column,
      expected,
      found: describe_lexeme(self.peek()),
    }
  }

  /// Fail unless every lexeme has been consumed.
  pub fn expect_eof(&self) -> CompileResult<()> {
    if self.is_eof() {
      Ok(())
    } else {
      Err(self.error(Expected::EndOfInput))
    }
  }

  fn emit(&mut self, instruction: Instruction) {
    self.out.emit(&instruction);
  }

  /// Give up the accumulated output. Only called after a successful parse.
  pub fn into_output(self) -> OutputBuffer {
    self.out
  }
}

/// `function := identifier "(" ")" type "{" expression "}"`
pub fn function(state: &mut ParseState) -> CompileResult<()> {
  let name = state.expect(LexemeKind::Identifier)?;
  let name = name.text.unwrap_or_default();
  debug!(%name, "function");
  state.emit(Instruction::Global(name.clone()));
  state.emit(Instruction::Section("text"));
  state.emit(Instruction::Label(name));

  state.expect(LexemeKind::LeftParen)?;
  state.expect(LexemeKind::RightParen)?;
  ty(state)?;
  state.expect(LexemeKind::LeftBrace)?;
  expression(state)?;
  state.expect(LexemeKind::RightBrace)?;
  state.emit(Instruction::Return);
  Ok(())
}

/// `type := "i32"`. Matched but not used by codegen.
pub fn ty(state: &mut ParseState) -> CompileResult<()> {
  match state.peek() {
    Some(lexeme) if lexeme.kind == LexemeKind::Identifier && lexeme.text() == Some(I32) => {
      state.pos += 1;
      Ok(())
    }
    _ => Err(state.error(Expected::Type)),
  }
}

/// Additive operators accepted between terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddOp {
  Add,
  Subtract,
}

impl AddOp {
  fn from_kind(kind: LexemeKind) -> Option<Self> {
    match kind {
      LexemeKind::Add => Some(Self::Add),
      LexemeKind::Subtract => Some(Self::Subtract),
      _ => None,
    }
  }

  fn kind(self) -> LexemeKind {
    match self {
      Self::Add => LexemeKind::Add,
      Self::Subtract => LexemeKind::Subtract,
    }
  }
}

/// `expression := term { ("+" | "-") term }`
///
/// Stops at the first lexeme that is not an additive operator; the caller
/// decides what may follow.
pub fn expression(state: &mut ParseState) -> CompileResult<()> {
  term(state)?;

  while let Some(op) = state.peek_kind().and_then(AddOp::from_kind) {
    state.emit(Instruction::Save);
    state.expect(op.kind())?;
    term(state)?;
    match op {
      AddOp::Add => state.emit(Instruction::Add),
      // rdi holds the left operand: (right - left) negated is left - right.
      AddOp::Subtract => {
        state.emit(Instruction::Subtract);
        state.emit(Instruction::Negate);
      }
    }
  }

  Ok(())
}

/// `term := digit`, loaded into the accumulator.
pub fn term(state: &mut ParseState) -> CompileResult<()> {
  let value = match state.peek() {
    Some(Lexeme {
      kind: LexemeKind::Number,
      text: Some(text),
      ..
    }) if text.len() == 1 => text.bytes().next().map(|d| i64::from(d - b'0')),
    _ => None,
  };
  let Some(value) = value else {
    return Err(state.error(Expected::Digit));
  };
  state.pos += 1;
  state.emit(Instruction::MoveImmediate(value));
  Ok(())
}
