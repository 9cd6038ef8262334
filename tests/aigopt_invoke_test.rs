//! Tests that invoke the `aigopt` binary.

use std::process::{Command, Output};

fn aigopt(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_aigopt"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn invoke_common_factor_test() {
    let output = aigopt(&["assets/circuits/common-factor.aag", "--verify"]);
    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "pis=3, pos=1, area=3, depth=2, not=0\n\noptimize\n\npis=3, pos=1, area=2, depth=2, not=0\n"
    );
}

#[test]
fn invoke_options_test() {
    for args in [
        ["assets/circuits/redundant.aag", "--ungated", "--verify"],
        ["assets/circuits/half-adder.aag", "--reassociate", "--verify"],
        ["assets/circuits/toggle.aag", "--ungated", "--reassociate"],
    ] {
        let output = aigopt(&args);
        assert!(output.status.success(), "{:?}", args);
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        assert_eq!(stdout.lines().filter(|l| l.starts_with("pis=")).count(), 2);
    }
}

#[test]
fn invoke_huge_header_test() {
    let path = std::env::temp_dir().join(format!("aigopt-huge-{}.aag", std::process::id()));
    std::fs::write(&path, "aag 4000000000 0 0 0 0\n").unwrap();
    let output = aigopt(&[path.to_str().unwrap()]);
    std::fs::remove_file(&path).unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unsupported feature"));
}

#[test]
fn invoke_failures_test() {
    // No circuit
    assert_eq!(aigopt(&[]).status.code(), Some(1));
    // Missing file
    assert_eq!(
        aigopt(&["assets/circuits/does-not-exist.aag"]).status.code(),
        Some(1)
    );
    // Not a circuit
    let output = aigopt(&["Cargo.toml"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn invoke_help_test() {
    let output = aigopt(&["--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("--verify"));
}
