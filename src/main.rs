mod cli;

use std::fs;
use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result};
use clap::Parser as CliParser;
use minic::{translate, translate_expression};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

use crate::cli::Cli;

fn main() -> Result<()> {
  let fmt_layer = fmt::layer().with_writer(io::stderr);
  let filter_layer = EnvFilter::builder()
    .with_default_directive(LevelFilter::WARN.into())
    .from_env()
    .context("error reading logging directives")?;
  tracing_subscriber::registry()
    .with(filter_layer)
    .with(fmt_layer)
    .init();

  let args = Cli::parse();
  let source = read_source(&args)?;

  let result = if args.expression {
    translate_expression(&source)
  } else {
    translate(&source)
  };

  let asm = match result {
    Ok(asm) => asm,
    Err(err) => {
      eprintln!("{}", err.render(&source));
      process::exit(1);
    }
  };

  match &args.output {
    Some(path) => {
      let mut file = fs::File::create(path)
        .with_context(|| format!("error creating {}", path.display()))?;
      asm.flush(&mut file).context("error writing output")?;
    }
    None => asm
      .flush(&mut io::stdout().lock())
      .context("error writing output")?,
  }

  Ok(())
}

fn read_source(args: &Cli) -> Result<Vec<u8>> {
  if args.input.as_os_str() == "-" {
    let mut source = Vec::new();
    io::stdin()
      .read_to_end(&mut source)
      .context("error reading stdin")?;
    return Ok(source);
  }
  fs::read(&args.input).with_context(|| format!("error reading {}", args.input.display()))
}
