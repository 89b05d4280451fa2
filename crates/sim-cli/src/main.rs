//! CLI entry point for the `mipsim` binary.

mod driver;
mod view;

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use assembler::{assemble, parse_words};
use sim_core::{Engine, DEFAULT_MEMORY_BYTES};
#[cfg(test)]
use tempfile as _;

use crate::driver::RunController;
use crate::view::TextView;

const USAGE_TEXT: &str = "\
Usage: mipsim <program> [options]

Runs a program on the single-cycle simulator, printing a scoreboard after
every cycle. A .asm input is assembled in place; anything else is read as a
word-list file (one hex word per line).

Options:
  --step             Prompt before each cycle (Enter steps, q quits)
  --max-cycles <n>   Stop after at most <n> cycles
  --mem-bytes <n>    Memory size in bytes (default: 65536)
  -h, --help         Show this help message

Examples:
  mipsim program.asm
  mipsim program.bin --step --max-cycles 100
";

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    program: PathBuf,
    step: bool,
    max_cycles: Option<u64>,
    mem_bytes: usize,
}

#[derive(Debug, PartialEq, Eq)]
enum ParseResult {
    Run(RunArgs),
    Help,
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &OsString) -> Result<T, String> {
    value
        .to_str()
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| format!("invalid value for {flag}: {}", value.to_string_lossy()))
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut program: Option<PathBuf> = None;
    let mut step = false;
    let mut max_cycles: Option<u64> = None;
    let mut mem_bytes = DEFAULT_MEMORY_BYTES;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Ok(ParseResult::Help);
        }

        if arg == "--step" {
            step = true;
            continue;
        }

        if arg == "--max-cycles" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --max-cycles".to_string())?;
            max_cycles = Some(parse_number("--max-cycles", &value)?);
            continue;
        }

        if arg == "--mem-bytes" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --mem-bytes".to_string())?;
            mem_bytes = parse_number("--mem-bytes", &value)?;
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if program.is_some() {
            return Err("multiple program paths provided".to_string());
        }
        program = Some(PathBuf::from(arg));
    }

    let program = program.ok_or_else(|| "missing program path".to_string())?;
    Ok(ParseResult::Run(RunArgs {
        program,
        step,
        max_cycles,
        mem_bytes,
    }))
}

fn load_program(args: &RunArgs) -> Result<Vec<u32>, String> {
    let source = fs::read_to_string(&args.program)
        .map_err(|err| format!("{}: {err}", args.program.display()))?;

    let is_asm = args
        .program
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("asm"));

    if is_asm {
        assemble(&source).map_err(|err| format!("{}:{err}", args.program.display()))
    } else {
        parse_words(&source).map_err(|err| format!("{}:{err}", args.program.display()))
    }
}

fn run_program(args: &RunArgs) -> Result<(), String> {
    let words = load_program(args)?;

    let mut engine = Engine::new(args.mem_bytes);
    engine
        .load(&words, 0)
        .map_err(|err| format!("{}: {err}", args.program.display()))?;
    engine.attach(Box::new(TextView::default()));

    let controller = RunController::new(args.step, args.max_cycles);
    match controller.run(&mut engine) {
        Ok(_) => Ok(()),
        Err(fault) => Err(format!("fault at pc=0x{:08X}: {fault}", engine.pc())),
    }
}

fn main() -> ExitCode {
    match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            print!("{USAGE_TEXT}");
            ExitCode::SUCCESS
        }
        Ok(ParseResult::Run(args)) => match run_program(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(message) => {
                eprintln!("{message}");
                ExitCode::FAILURE
            }
        },
        Err(message) => {
            eprintln!("error: {message}");
            eprint!("{USAGE_TEXT}");
            ExitCode::from(2)
        }
    }
}
