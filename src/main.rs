//! najac: compile a Naja source file to flat assembler source.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{self, Command};

use anyhow::{Context, Result};
use clap::Parser;
use naja::{CompileError, Compiler};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Naja compiler")]
struct Cli {
    /// Naja source file.
    input: PathBuf,

    /// Assembly output (defaults to the input with an `.asm` extension).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Assembler to run on the output.
    #[arg(long, env = "NAJA_ASSEMBLER")]
    assembler: Option<PathBuf>,

    /// Print the syntax tree.
    #[arg(long)]
    print_ast: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        match e.downcast_ref::<CompileError>() {
            Some(CompileError::Parse(diagnostics)) => {
                for diagnostic in diagnostics {
                    error!("{}", diagnostic);
                }
            }
            _ => error!("{:#}", e),
        }
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("read {}", cli.input.display()))?;
    info!(input = %cli.input.display(), "compiling");

    let compiler = Compiler::new()?;
    let tree = compiler.parse(&source)?;
    if cli.print_ast {
        print!("{}", tree.prettify());
    }
    let code = compiler.generator().generate(&tree).map_err(CompileError::from)?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension("asm"));
    fs::write(&output, code).with_context(|| format!("write {}", output.display()))?;
    info!(output = %output.display(), "wrote assembly");

    if let Some(assembler) = &cli.assembler {
        assemble(assembler, &output)?;
    }
    Ok(())
}

/// Run the assembler on `output`. Its exit status is only reported.
fn assemble(assembler: &Path, output: &Path) -> Result<()> {
    let status = Command::new(assembler)
        .arg(output)
        .status()
        .with_context(|| format!("run {}", assembler.display()))?;
    if status.success() {
        info!(assembler = %assembler.display(), "assembled");
    } else {
        warn!(assembler = %assembler.display(), %status, "assembler failed");
    }
    Ok(())
}
