use std::path::PathBuf;

use clap::Parser;

/// Translate a tiny source language into x86-64 assembly.
#[derive(Debug, Parser)]
#[command(name = "minic", version)]
pub struct Cli {
  /// Source file to translate, or `-` for stdin.
  pub input: PathBuf,

  /// Write the assembly here instead of stdout.
  #[arg(short, long)]
  pub output: Option<PathBuf>,

  /// Treat the input as a bare expression rather than a function.
  #[arg(long)]
  pub expression: bool,
}
