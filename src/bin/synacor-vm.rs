use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use synacor_vm::{load_image, IoConsole, Machine, Outcome, VmError};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "synacor-vm")]
#[command(about = "Run a program image on the 15-bit register VM", long_about = None)]
struct Args {
    /// Path to the program image (little-endian 16-bit words)
    image: PathBuf,

    /// Read `in` characters from this file instead of stdin
    #[arg(long)]
    input: Option<PathBuf>,

    /// Stop after this many instructions (default: run until halt)
    #[arg(long)]
    max_steps: Option<u64>,

    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run_with<R: BufRead, W: Write>(
    machine: &mut Machine,
    input: R,
    output: W,
    max_steps: Option<u64>,
) -> std::result::Result<Outcome, VmError> {
    let mut console = IoConsole::new(input, output);
    machine.run(&mut console, max_steps)
}

/// Load and run the image; returns the process exit status.
fn execute(args: &Args) -> Result<i32> {
    let memory = load_image(&args.image)
        .with_context(|| format!("failed to load {}", args.image.display()))?;
    debug!(path = %args.image.display(), words = memory.image_len(), "image loaded");
    let mut machine = Machine::new(memory);

    let output = BufWriter::new(io::stdout().lock());
    let result = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open input {}", path.display()))?;
            run_with(&mut machine, BufReader::new(file), output, args.max_steps)
        }
        None => run_with(&mut machine, io::stdin().lock(), output, args.max_steps),
    };

    let steps = machine.state().steps();
    match result {
        Ok(outcome) => {
            info!(?outcome, steps, "program finished");
            Ok(0)
        }
        Err(err) => {
            error!(steps, ip = machine.state().ip(), "program error: {err}");
            Ok(err.exit_code())
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    let code = match execute(&args) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            1
        }
    };
    std::process::exit(code);
}
