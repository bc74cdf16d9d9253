//! End-to-end tests of the `pi` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn pi() -> Command {
    let mut cmd = Command::cargo_bin("pi").expect("binary not found");
    cmd.env_remove("PI_DIGITS").env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_flag() {
    pi()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("binary-splitting"));
}

#[test]
fn default_is_sixty_digits() {
    pi()
        .assert()
        .success()
        .stdout("3.141592653589793238462643383279502884197169399375105820974944\n");
}

#[test]
fn every_algorithm_prints_the_same_digits() {
    for algo in ["chudnovsky", "bbp", "binary-splitting"] {
        pi()
            .args(["100", "--algo", algo, "--threads", "2"])
            .assert()
            .success()
            .stdout(predicate::str::ends_with("3421170679\n"));
    }
}

#[test]
fn one_digit() {
    pi().args(["1", "-a", "chudnovsky"]).assert().success().stdout("3.1\n");
}

#[test]
fn digit_separators_and_suffixes() {
    pi()
        .arg("1_0")
        .assert()
        .success()
        .stdout("3.1415926535\n");
    pi()
        .arg("1K")
        .assert()
        .success()
        .stdout(predicate::function(|out: &str| out.trim_end().len() == 1002));
}

#[test]
fn zero_digits_fails() {
    pi()
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn memory_limit_fails_cleanly() {
    pi()
        .args(["100K", "--memory-limit", "1K"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("limit is 1024 bytes"));
}

#[test]
fn digits_from_environment() {
    pi()
        .env("PI_DIGITS", "5")
        .assert()
        .success()
        .stdout("3.14159\n");
}
