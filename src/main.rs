use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{builder::BoolishValueParser, Parser, Subcommand};
use colored::Colorize;
use miette::{IntoDiagnostic, Result};

use ls8::{output, Cpu, Machine, Program};

/// ls8 runs programs for the LS-8, a tiny 8-bit register machine.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Quickly provide a `.ls8` file to run
    path: Option<PathBuf>,

    /// Print machine state before every instruction
    #[arg(
        short,
        long,
        global = true,
        env = "LS8_TRACE",
        value_parser = BoolishValueParser::new()
    )]
    trace: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Load a `.ls8` program and run it until it halts
    Run {
        /// `.ls8` file to run
        name: PathBuf,
    },
    /// Check that a `.ls8` file loads, without running it
    Check {
        /// File to check
        name: PathBuf,
    },
    /// List the instructions of a `.ls8` program
    Disasm {
        /// `.ls8` file to list
        name: PathBuf,
    },
}

fn main() -> miette::Result<()> {
    use MsgColor::*;
    let args = Args::parse();
    env_logger::init();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new() //
                .context_lines(ls8::DIAGNOSTIC_CONTEXT_LINES)
                .build(),
        )
    }))?;

    if let Some(command) = args.command {
        match command {
            Command::Run { name } => run(&name, args.trace),
            Command::Check { name } => {
                file_message(Green, "Checking", &name);
                let program = Program::read(&name)?;
                let summary = format!("{} bytes loaded", program.len());
                message(Green, "Success", &summary);
                Ok(())
            }
            Command::Disasm { name } => {
                file_message(Green, "Loading", &name);
                let program = Program::read(&name)?;
                let stdout = io::stdout();
                let mut out = stdout.lock();
                for line in output::disassemble(program.bytes()) {
                    writeln!(out, "{line}").into_diagnostic()?;
                }
                Ok(())
            }
        }
    } else if let Some(path) = args.path {
        run(&path, args.trace)
    } else {
        println!("\n~ ls8 v{VERSION} ~");
        println!("{SHORT_INFO}");
        Ok(())
    }
}

enum MsgColor {
    Green,
    Cyan,
    Red,
}

fn file_message(color: MsgColor, left: &str, right: &Path) {
    let right = format!("target {}", right.display());
    message(color, left, &right);
}

// Status goes to stderr, stdout only carries program output
fn message(color: MsgColor, left: &str, right: &str) {
    let left = match color {
        MsgColor::Green => left.green(),
        MsgColor::Cyan => left.cyan(),
        MsgColor::Red => left.red(),
    };
    eprintln!("{left:>12} {right}");
}

fn run(name: &Path, trace: bool) -> Result<()> {
    file_message(MsgColor::Green, "Loading", name);
    let program = Program::read(name)?;

    let mut cpu = Cpu::new(Machine::with_program(&program));
    cpu.set_trace(trace);

    message(MsgColor::Green, "Running", "loaded image");
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = cpu.run(&mut out);
    out.flush().into_diagnostic()?;
    if let Err(fault) = result {
        file_message(MsgColor::Red, "Faulted", name);
        return Err(fault.into());
    }

    file_message(MsgColor::Cyan, "Halted", name);
    Ok(())
}

const SHORT_INFO: &str = r"
Runs binary-text programs for the LS-8 8-bit register machine.
Please use `-h` or `--help` to access the usage instructions.
";

const VERSION: &str = env!("CARGO_PKG_VERSION");
