//! Runs the `synacor-vm` binary end to end.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::{NamedTempFile, TempDir};

const R0: u16 = 32768;
const R1: u16 = 32769;

fn image(words: &[u16]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp image");
    let bytes: Vec<u8> = words.iter().flat_map(|word| word.to_le_bytes()).collect();
    file.write_all(&bytes).expect("write image");
    file
}

fn run_vm(args: &[&Path], stdin: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_synacor-vm"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn synacor-vm");
    child
        .stdin
        .take()
        .expect("piped stdin")
        .write_all(stdin)
        .expect("write stdin");
    child.wait_with_output().expect("wait for synacor-vm")
}

#[test]
fn halting_program_prints_and_exits_zero() {
    let file = image(&[1, R1, 65, 9, R0, R1, 4, 19, R0, 0]);
    let output = run_vm(&[file.path()], b"");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(output.stdout, b"E");
}

#[test]
fn input_is_read_from_stdin() {
    let file = image(&[20, R0, 19, R0, 20, R0, 19, R0, 0]);
    let output = run_vm(&[file.path()], b"ok\n");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(output.stdout, b"ok");
}

#[test]
fn pop_on_empty_stack_exits_with_underflow_status() {
    let file = image(&[19, 33, 3, R0, 0]);
    let output = run_vm(&[file.path()], b"");
    assert_eq!(output.status.code(), Some(3));
    // output before the failure still reaches stdout
    assert_eq!(output.stdout, b"!");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stack underflow at 2"), "stderr: {stderr}");
}

#[test]
fn missing_image_exits_one_with_single_io_message() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("nofile.bin");
    let output = run_vm(&[&missing], b"");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load"), "stderr: {stderr}");
    assert_eq!(stderr.matches("os error").count(), 1, "stderr: {stderr}");
}

#[test]
fn wrong_argument_count_is_a_usage_error() {
    let none = run_vm(&[], b"");
    assert_eq!(none.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&none.stderr).contains("Usage"));

    let file = image(&[0]);
    let two = run_vm(&[file.path(), file.path()], b"");
    assert_eq!(two.status.code(), Some(2));
    assert!(two.stdout.is_empty());
}
