//! CLI entry point for the `mips-asm` binary.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use assembler::{assemble, format_words};
use sim_core as _;
#[cfg(test)]
use tempfile as _;

const USAGE_TEXT: &str = "\
Usage: mips-asm <command> [options]

Commands:
  build <input> [-o <output>]  Assemble source to a word-list file

Options:
  -o, --output <file>  Output file path (default: input stem + .bin)
  -h, --help           Show this help message

Examples:
  mips-asm build program.asm
  mips-asm build program.asm -o program.bin
";

#[derive(Debug, PartialEq, Eq)]
struct BuildArgs {
    input: PathBuf,
    output: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Eq)]
enum ParseResult {
    Build(BuildArgs),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let first = args.next().ok_or_else(|| "missing command".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParseResult::Help);
    }

    if first != "build" {
        return Err(format!("unknown command: {}", first.to_string_lossy()));
    }

    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Ok(ParseResult::Help);
        }

        if arg == "-o" || arg == "--output" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for -o".to_string())?;
            output = Some(PathBuf::from(value));
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if input.is_some() {
            return Err("multiple input paths provided".to_string());
        }
        input = Some(PathBuf::from(arg));
    }

    let input = input.ok_or_else(|| "missing input path".to_string())?;
    Ok(ParseResult::Build(BuildArgs { input, output }))
}

fn run_build(args: &BuildArgs) -> Result<(), String> {
    let source = fs::read_to_string(&args.input)
        .map_err(|err| format!("{}: {err}", args.input.display()))?;

    let words = assemble(&source)
        .map_err(|err| format!("{}:{err}", args.input.display()))?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("bin"));
    fs::write(&output, format_words(&words))
        .map_err(|err| format!("{}: {err}", output.display()))?;

    eprintln!("wrote {} ({} words)", output.display(), words.len());
    Ok(())
}

fn main() -> ExitCode {
    match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            print!("{USAGE_TEXT}");
            ExitCode::SUCCESS
        }
        Ok(ParseResult::Build(args)) => match run_build(&args) {
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

#[cfg(test)]
mod tests {
    use super::{parse_args, BuildArgs, ParseResult};
    use std::ffi::OsString;
    use std::path::PathBuf;

    fn args(list: &[&str]) -> impl Iterator<Item = OsString> {
        list.iter()
            .map(OsString::from)
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn build_with_explicit_output_parses() {
        assert_eq!(
            parse_args(args(&["build", "p.asm", "-o", "p.bin"])).unwrap(),
            ParseResult::Build(BuildArgs {
                input: PathBuf::from("p.asm"),
                output: Some(PathBuf::from("p.bin")),
            })
        );
    }

    #[test]
    fn build_without_output_defaults_later() {
        assert_eq!(
            parse_args(args(&["build", "p.asm"])).unwrap(),
            ParseResult::Build(BuildArgs {
                input: PathBuf::from("p.asm"),
                output: None,
            })
        );
    }

    #[test]
    fn help_flag_short_circuits() {
        assert_eq!(parse_args(args(&["--help"])).unwrap(), ParseResult::Help);
    }

    #[test]
    fn missing_input_is_an_error() {
        assert!(parse_args(args(&["build"])).is_err());
        assert!(parse_args(args(&[])).is_err());
    }

    #[test]
    fn unknown_options_are_rejected() {
        assert!(parse_args(args(&["build", "p.asm", "--fast"])).is_err());
        assert!(parse_args(args(&["frobnicate"])).is_err());
    }
}
