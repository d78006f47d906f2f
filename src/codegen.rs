//! Code generation: the instruction vocabulary and the buffer it is written to.
//!
//! The emitter targets x86-64 in Intel syntax using a two-register machine:
//! `rax` is the accumulator and `rdi` holds the saved left operand. Labels
//! and directives sit at column zero, instructions are indented by four
//! spaces.

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};

use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
  Accumulator,
  Secondary,
}

impl fmt::Display for Register {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Accumulator => f.write_str("rax"),
      Self::Secondary => f.write_str("rdi"),
    }
  }
}

/// Every line the emitter can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
  /// `global <name>`: export a symbol to the linker.
  Global(String),
  /// `section .<name>`
  Section(&'static str),
  Label(String),
  /// Load an immediate into the accumulator.
  MoveImmediate(i64),
  /// Copy the accumulator into the secondary register.
  Save,
  /// `rax += rdi`
  Add,
  /// `rax -= rdi`
  Subtract,
  Negate,
  Return,
}

impl fmt::Display for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    use Register::{Accumulator, Secondary};

    match self {
      Self::Global(name) => write!(f, "global {name}"),
      Self::Section(name) => write!(f, "section .{name}"),
      Self::Label(name) => write!(f, "{name}:"),
      Self::MoveImmediate(value) => write!(f, "    mov {Accumulator}, {value}"),
      Self::Save => write!(f, "    mov {Secondary}, {Accumulator}"),
      Self::Add => write!(f, "    add {Accumulator}, {Secondary}"),
      Self::Subtract => write!(f, "    sub {Accumulator}, {Secondary}"),
      Self::Negate => write!(f, "    neg {Accumulator}"),
      Self::Return => f.write_str("    ret"),
    }
  }
}

/// Append-only output for one translation.
///
/// Growth is explicit: when an append does not fit in the spare capacity the
/// buffer reallocates to `2 * capacity + needed`. It never shrinks.
#[derive(Debug, Default)]
pub struct OutputBuffer {
  bytes: Vec<u8>,
}

impl OutputBuffer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      bytes: Vec::with_capacity(capacity),
    }
  }

  pub fn len(&self) -> usize {
    self.bytes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bytes.is_empty()
  }

  pub fn capacity(&self) -> usize {
    self.bytes.capacity()
  }

  fn push_bytes(&mut self, data: &[u8]) {
    let spare = self.bytes.capacity() - self.bytes.len();
    if data.len() > spare {
      let target = 2 * self.bytes.capacity() + data.len();
      self.bytes.reserve_exact(target - self.bytes.len());
    }
    self.bytes.extend_from_slice(data);
  }

  pub fn push_str(&mut self, s: &str) {
    self.push_bytes(s.as_bytes());
  }

  /// Write one instruction as its own line.
  pub fn emit(&mut self, instruction: &Instruction) {
    trace!(%instruction, "emit");
    let line = format!("{instruction}\n");
    self.push_str(&line);
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.bytes
  }

  pub fn text(&self) -> Cow<'_, str> {
    String::from_utf8_lossy(&self.bytes)
  }

  pub fn into_string(self) -> String {
    self.text().into_owned()
  }

  /// Hand the finished output to a writer. Consumes the buffer, so a
  /// translation is flushed at most once.
  pub fn flush<W: Write>(self, writer: &mut W) -> io::Result<()> {
    writer.write_all(&self.bytes)?;
    writer.flush()
  }
}
