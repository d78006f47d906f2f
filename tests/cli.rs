use std::fs;

use assert_cmd::Command;
use tempdir::TempDir;

fn minic() -> Command {
  Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

#[test]
fn translates_file_to_stdout() {
  let tmp_dir = TempDir::new("stdout").expect("error creating temporary directory");
  let input = tmp_dir.path().join("main.lang");
  fs::write(&input, "// entry\nmain() i32 { 3 + 4 }\n").unwrap();

  minic()
    .arg(&input)
    .assert()
    .success()
    .stdout("global main\nsection .text\nmain:\n    mov rax, 3\n    mov rdi, rax\n    mov rax, 4\n    add rax, rdi\n    ret\n");
}

#[test]
fn writes_output_file() {
  let tmp_dir = TempDir::new("output").expect("error creating temporary directory");
  let input = tmp_dir.path().join("main.lang");
  let output = tmp_dir.path().join("main.s");
  fs::write(&input, "f() i32 { 5 }").unwrap();

  minic()
    .arg(&input)
    .arg("-o")
    .arg(&output)
    .assert()
    .success()
    .stdout("");

  assert_eq!(
    fs::read_to_string(&output).unwrap(),
    "global f\nsection .text\nf:\n    mov rax, 5\n    ret\n"
  );
}

#[test]
fn parse_error_exits_with_diagnostic_and_no_output() {
  let tmp_dir = TempDir::new("failure").expect("error creating temporary directory");
  let input = tmp_dir.path().join("bad.lang");
  let output = tmp_dir.path().join("bad.s");
  fs::write(&input, "foo(i32{5+}").unwrap();

  let assert = minic()
    .arg(&input)
    .arg("-o")
    .arg(&output)
    .assert()
    .failure()
    .code(1)
    .stdout("");

  let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
  assert!(
    stderr.contains("foo(i32{5+}\n    ^ 1:5: expected \")\", but got \"i32\""),
    "{stderr}"
  );
  assert!(!output.exists());
}

#[test]
fn lex_error_exits_with_status_one() {
  minic()
    .arg("-")
    .write_stdin("main() i32 { 1; }")
    .assert()
    .failure()
    .code(1)
    .stdout("");
}

#[test]
fn reads_stdin_in_expression_mode() {
  minic()
    .args(["--expression", "-"])
    .write_stdin("9 - 2")
    .assert()
    .success()
    .stdout("    mov rax, 9\n    mov rdi, rax\n    mov rax, 2\n    sub rax, rdi\n    neg rax\n");
}

#[test]
fn function_source_fails_in_expression_mode() {
  minic()
    .args(["--expression", "-"])
    .write_stdin("main() i32 { 1 }")
    .assert()
    .failure()
    .code(1);
}

#[test]
fn missing_input_file_is_reported() {
  let tmp_dir = TempDir::new("missing").expect("error creating temporary directory");
  let assert = minic()
    .arg(tmp_dir.path().join("nope.lang"))
    .assert()
    .failure();
  let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
  assert!(stderr.contains("error reading"), "{stderr}");
}
