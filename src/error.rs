//! Shared error utilities used across the translation pipeline.
//!
//! Diagnostics are kept lightweight: every error knows the line and column
//! of the offending input, and `render` reproduces that line with a caret
//! under the failing character.

use std::fmt;

use snafu::Snafu;

use crate::scanner::LexemeKind;

pub type CompileResult<T> = Result<T, CompileError>;

/// The first error hit during a translation. There is no recovery: the
/// pipeline stops and hands this back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum CompileError {
  #[snafu(display("{line}:{column}: invalid token '{}'", found.escape_ascii()))]
  Lex { line: usize, column: usize, found: u8 },

  #[snafu(display("{line}:{column}: expected {expected}, but got {found}"))]
  Parse {
    line: usize,
    column: usize,
    expected: Expected,
    found: String,
  },
}

/// What the parser was looking for when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
  Lexeme(LexemeKind),
  Type,
  Digit,
  EndOfInput,
}

impl fmt::Display for Expected {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Lexeme(LexemeKind::Identifier) => f.write_str("an identifier"),
      Self::Lexeme(LexemeKind::Number) => f.write_str("a number"),
      Self::Lexeme(kind) => write!(f, "\"{}\"", kind.symbol()),
      Self::Type => f.write_str("type \"i32\""),
      Self::Digit => f.write_str("a single digit"),
      Self::EndOfInput => f.write_str("end of input"),
    }
  }
}

impl CompileError {
  pub fn line(&self) -> usize {
    match self {
      Self::Lex { line, .. } | Self::Parse { line, .. } => *line,
    }
  }

  pub fn column(&self) -> usize {
    match self {
      Self::Lex { column, .. } | Self::Parse { column, .. } => *column,
    }
  }

  /// Format the error against the source it came from, pointing at the
  /// offending byte with a caret. Tabs before the column are kept in the
  /// marker line so the caret lines up however the terminal expands them.
  pub fn render(&self, source: &[u8]) -> String {
    let line = source
      .split(|&b| b == b'\n')
      .nth(self.line().saturating_sub(1))
      .unwrap_or_default();
    let prefix_len = self.column().saturating_sub(1);
    let mut marker: String = line
      .iter()
      .take(prefix_len)
      .map(|&b| if b == b'\t' { '\t' } else { ' ' })
      .collect();
    // Errors at end of line point one past the last byte.
    marker.extend(std::iter::repeat_n(' ', prefix_len.saturating_sub(line.len())));
    marker.push('^');
    let line_text = String::from_utf8_lossy(line);
    format!("{line_text}\n{marker} {self}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_error_message_names_expectation_and_lookahead() {
    let err = CompileError::Parse {
      line: 1,
      column: 5,
      expected: Expected::Lexeme(LexemeKind::RightParen),
      found: "\"i32\"".to_string(),
    };
    assert_eq!(err.to_string(), "1:5: expected \")\", but got \"i32\"");
  }

  #[test]
  fn lex_error_escapes_control_bytes() {
    let err = CompileError::Lex {
      line: 2,
      column: 3,
      found: b'\r',
    };
    assert_eq!(err.to_string(), "2:3: invalid token '\\r'");
  }

  #[test]
  fn render_points_at_column_on_the_failing_line() {
    let source = b"// header\nfoo(i32{5+}\n";
    let err = CompileError::Parse {
      line: 2,
      column: 5,
      expected: Expected::Lexeme(LexemeKind::RightParen),
      found: "\"i32\"".to_string(),
    };
    let rendered = err.render(source);
    let mut lines = rendered.lines();
    assert_eq!(lines.next(), Some("foo(i32{5+}"));
    assert_eq!(lines.next(), Some("    ^ 2:5: expected \")\", but got \"i32\""));
  }

  #[test]
  fn render_keeps_tabs_in_the_marker() {
    let source = b"f() i32 {\n\t\t1 +\t}";
    let err = CompileError::Parse {
      line: 2,
      column: 7,
      expected: Expected::Digit,
      found: "\"}\"".to_string(),
    };
    assert_eq!(
      err.render(source),
      "\t\t1 +\t}\n\t\t   \t^ 2:7: expected a single digit, but got \"}\""
    );
  }

  #[test]
  fn render_past_end_of_line() {
    let source = b"f() i32 {\n  1\n";
    let err = CompileError::Parse {
      line: 3,
      column: 1,
      expected: Expected::Lexeme(LexemeKind::RightBrace),
      found: "EOF".to_string(),
    };
    assert_eq!(err.render(source), "\n^ 3:1: expected \"}\", but got EOF");
  }
}
