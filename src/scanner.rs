//! Lexical analysis: turns the raw source bytes into a sequence of lexemes.
//!
//! The scanner knows nothing about the grammar. It classifies single bytes,
//! skips blanks and `//` comments, and tags every lexeme with the line and
//! column of its first character. Columns are 1-based and count bytes.

use std::fmt;

use tracing::trace;

use crate::error::{CompileError, CompileResult};

/// Kinds of lexemes recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexemeKind {
  Add,
  Subtract,
  Multiply,
  Divide,
  Modulus,
  Identifier,
  Number,
  LeftBrace,
  RightBrace,
  LeftParen,
  RightParen,
  Comma,
}

impl LexemeKind {
  /// Source spelling of a single-character lexeme.
  pub fn symbol(self) -> &'static str {
    match self {
      Self::Add => "+",
      Self::Subtract => "-",
      Self::Multiply => "*",
      Self::Divide => "/",
      Self::Modulus => "%",
      Self::Identifier => "IDENT",
      Self::Number => "NUMBER",
      Self::LeftBrace => "{",
      Self::RightBrace => "}",
      Self::LeftParen => "(",
      Self::RightParen => ")",
      Self::Comma => ",",
    }
  }

  /// Classify `+ - * / %`.
  pub fn operator(c: u8) -> Option<Self> {
    match c {
      b'+' => Some(Self::Add),
      b'-' => Some(Self::Subtract),
      b'*' => Some(Self::Multiply),
      b'/' => Some(Self::Divide),
      b'%' => Some(Self::Modulus),
      _ => None,
    }
  }

  /// Classify `{ } ( ) ,`.
  pub fn delimiter(c: u8) -> Option<Self> {
    match c {
      b'{' => Some(Self::LeftBrace),
      b'}' => Some(Self::RightBrace),
      b'(' => Some(Self::LeftParen),
      b')' => Some(Self::RightParen),
      b',' => Some(Self::Comma),
      _ => None,
    }
  }
}

impl fmt::Display for LexemeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.symbol())
  }
}

/// A classified, position-tagged unit of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
  pub kind: LexemeKind,
  pub line: usize,
  pub column: usize,
  /// Spelling of identifiers and numbers; `None` for everything else.
  pub text: Option<String>,
}

impl Lexeme {
  pub fn new(kind: LexemeKind, line: usize, column: usize) -> Self {
    Self {
      kind,
      line,
      column,
      text: None,
    }
  }

  pub fn with_text(kind: LexemeKind, line: usize, column: usize, text: impl Into<String>) -> Self {
    Self {
      kind,
      line,
      column,
      text: Some(text.into()),
    }
  }

  pub fn text(&self) -> Option<&str> {
    self.text.as_deref()
  }
}

/// Human-friendly description used in diagnostics.
pub fn describe_lexeme(lexeme: Option<&Lexeme>) -> String {
  match lexeme {
    Some(Lexeme {
      text: Some(text), ..
    }) => format!("\"{text}\""),
    Some(lexeme) => format!("\"{}\"", lexeme.kind.symbol()),
    None => "EOF".to_string(),
  }
}

pub fn is_newline(c: u8) -> bool {
  c == b'\n'
}

pub fn is_whitespace(c: u8) -> bool {
  c == b' ' || c == b'\t'
}

pub fn is_alphabetic(c: u8) -> bool {
  c.is_ascii_alphabetic()
}

pub fn is_numeric(c: u8) -> bool {
  c.is_ascii_digit()
}

pub fn is_identifier(c: u8) -> bool {
  is_alphabetic(c) || is_numeric(c)
}

/// Borrowed view of the source with a cached current byte.
///
/// `current` is `None` exactly when `position` is one past the end.
#[derive(Debug, Clone)]
pub struct ScanCursor<'a> {
  buffer: &'a [u8],
  position: usize,
  current: Option<u8>,
}

impl<'a> ScanCursor<'a> {
  pub fn new(buffer: &'a [u8]) -> Self {
    Self {
      buffer,
      position: 0,
      current: buffer.first().copied(),
    }
  }

  pub fn current(&self) -> Option<u8> {
    self.current
  }

  pub fn position(&self) -> usize {
    self.position
  }

  pub fn is_at_end(&self) -> bool {
    self.current.is_none()
  }

  /// Step one byte forward. Stepping past the end is a no-op.
  pub fn advance(&mut self) {
    if self.current.is_none() {
      return;
    }
    self.position += 1;
    self.current = self.buffer.get(self.position).copied();
  }

  /// Two-byte lookahead for a `//` comment opener.
  pub fn at_comment(&self) -> bool {
    self.buffer[self.position..].starts_with(b"//")
  }

  fn slice_from(&self, start: usize) -> &'a [u8] {
    &self.buffer[start..self.position]
  }
}

/// Lazy lexeme iterator. Stops after the first error.
pub struct Scanner<'a> {
  cursor: ScanCursor<'a>,
  line: usize,
  column: usize,
  failed: bool,
}

impl<'a> Scanner<'a> {
  pub fn new(buffer: &'a [u8]) -> Self {
    Self {
      cursor: ScanCursor::new(buffer),
      line: 1,
      column: 0,
      failed: false,
    }
  }

  /// Current (line, column) of the next unconsumed byte.
  pub fn location(&self) -> (usize, usize) {
    (self.line, self.column + 1)
  }

  fn bump(&mut self) {
    self.cursor.advance();
    self.column += 1;
  }

  fn new_line(&mut self) {
    self.line += 1;
    self.column = 0;
  }

  fn skip_comment(&mut self) {
    while let Some(c) = self.cursor.current() {
      self.cursor.advance();
      if is_newline(c) {
        break;
      }
    }
    self.new_line();
  }

  fn eat_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a [u8] {
    let start = self.cursor.position();
    while self.cursor.current().is_some_and(&pred) {
      self.bump();
    }
    self.cursor.slice_from(start)
  }
}

impl Iterator for Scanner<'_> {
  type Item = CompileResult<Lexeme>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.failed {
      return None;
    }

    loop {
      let c = self.cursor.current()?;

      if is_newline(c) {
        self.cursor.advance();
        self.new_line();
        continue;
      }

      if is_whitespace(c) {
        self.bump();
        continue;
      }

      if self.cursor.at_comment() {
        self.skip_comment();
        continue;
      }

      let (line, column) = self.location();

      let lexeme = if let Some(kind) = LexemeKind::operator(c) {
        self.bump();
        Lexeme::new(kind, line, column)
      } else if let Some(kind) = LexemeKind::delimiter(c) {
        self.bump();
        Lexeme::new(kind, line, column)
      } else if is_alphabetic(c) {
        let text = self.eat_while(is_identifier);
        Lexeme::with_text(
          LexemeKind::Identifier,
          line,
          column,
          String::from_utf8_lossy(text),
        )
      } else if is_numeric(c) {
        let text = self.eat_while(is_numeric);
        Lexeme::with_text(LexemeKind::Number, line, column, String::from_utf8_lossy(text))
      } else {
        self.failed = true;
        return Some(Err(CompileError::Lex {
          line,
          column,
          found: c,
        }));
      };

      trace!(kind = ?lexeme.kind, line, column, text = lexeme.text(), "lexeme");
      return Some(Ok(lexeme));
    }
  }
}

/// Scan the whole buffer, stopping at the first invalid character.
pub fn scan(source: &[u8]) -> CompileResult<Vec<Lexeme>> {
  Scanner::new(source).collect()
}
