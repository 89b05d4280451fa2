//! Integration tests for the mipsim CLI.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use assembler::format_words;
use sim_core::{encode_immediate, HALT_WORD, OP_ADDI, OP_LW};

fn binary_path() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop();
    path.pop();
    path.join("mipsim")
}

fn create_temp_file(dir: &std::path::Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn runs_an_assembly_program_and_prints_the_scoreboard() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_temp_file(
        temp_dir.path(),
        "sum.asm",
        "addi $t0, $zero, 5\naddi $t1, $zero, 7\nadd $t2, $t0, $t1\nhalt\n",
    );

    let output = Command::new(binary_path())
        .args([program.to_str().unwrap()])
        .output()
        .expect("failed to run mipsim");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!("{:<5}={:>#10x}", "$t2", 12)));
    assert!(stdout.contains("PC=0x0000000C | Halted"));
    assert!(stdout.contains("retired={ add:1, addi:2, halt:1 }"));
}

#[test]
fn runs_a_word_list_program() {
    let temp_dir = tempfile::tempdir().unwrap();
    let words = vec![encode_immediate(OP_ADDI, 0, 8, 9), HALT_WORD];
    let program = create_temp_file(temp_dir.path(), "tiny.bin", &format_words(&words));

    let output = Command::new(binary_path())
        .args([program.to_str().unwrap()])
        .output()
        .expect("failed to run mipsim");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!("{:<5}={:>#10x}", "$t0", 9)));
}

#[test]
fn max_cycles_stops_a_runaway_program() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_temp_file(
        temp_dir.path(),
        "spin.asm",
        "loop:\nj loop\nhalt\n",
    );

    let output = Command::new(binary_path())
        .args([program.to_str().unwrap(), "--max-cycles", "3"])
        .output()
        .expect("failed to run mipsim");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    // One scoreboard per cycle.
    assert_eq!(stdout.matches("| PC=0x").count(), 3);
}

#[test]
fn faults_are_reported_with_the_faulting_pc() {
    let temp_dir = tempfile::tempdir().unwrap();
    let words = vec![encode_immediate(OP_LW, 0, 9, 0x100), HALT_WORD];
    let program = create_temp_file(temp_dir.path(), "oob.bin", &format_words(&words));

    let output = Command::new(binary_path())
        .args([program.to_str().unwrap(), "--mem-bytes", "64"])
        .output()
        .expect("failed to run mipsim");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("fault at pc=0x00000000"));
    assert!(stderr.contains("out-of-bounds"));
}

#[test]
fn assembly_errors_carry_the_source_line() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_temp_file(temp_dir.path(), "bad.asm", "halt\nfrobnicate $t0\n");

    let output = Command::new(binary_path())
        .args([program.to_str().unwrap()])
        .output()
        .expect("failed to run mipsim");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad.asm:2: error: unknown mnemonic 'frobnicate'"));
}

#[test]
fn help_prints_usage() {
    let output = Command::new(binary_path())
        .args(["--help"])
        .output()
        .expect("failed to run mipsim");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: mipsim"));
}
