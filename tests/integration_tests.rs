use assert_cmd::prelude::*;
use predicates::str::{contains, diff};
use std::process::Command;

fn ls8() -> Command {
    Command::cargo_bin("ls8").unwrap()
}

#[test]
fn runs_without_arguments() {
    ls8().assert().success();
}

#[test]
fn prints_eight() {
    ls8()
        .arg("run")
        .arg("tests/files/print8.ls8")
        .assert()
        .success()
        .stdout(diff("8\n"))
        .stderr(contains("Halted"));
}

#[test]
fn prints_sum_and_nothing_else() {
    ls8()
        .arg("tests/files/add.ls8")
        .assert()
        .success()
        .stdout(diff("17\n"));
}

#[test]
fn prints_product() {
    ls8()
        .arg("run")
        .arg("tests/files/mult.ls8")
        .assert()
        .success()
        .stdout(diff("72\n"));
}

#[test]
fn pops_in_reverse_order() {
    ls8()
        .arg("run")
        .arg("tests/files/stack.ls8")
        .assert()
        .success()
        .stdout(diff("3\n2\n1\n"));
}

#[test]
fn returns_from_subroutines() {
    ls8()
        .arg("run")
        .arg("tests/files/call.ls8")
        .assert()
        .success()
        .stdout(diff("20\n30\n36\n60\n"));
}

#[test]
fn branches_on_comparison() {
    ls8()
        .arg("run")
        .arg("tests/files/sctest.ls8")
        .assert()
        .success()
        .stdout(diff("1\n2\n3\n4\n"));
}

#[test]
fn unknown_opcode_exits_with_failure() {
    ls8()
        .arg("run")
        .arg("tests/files/unknown.ls8")
        .assert()
        .failure()
        .stdout(diff("5\n"))
        .stderr(contains("unknown instruction"))
        .stderr(contains("at address 0x05"));
}

#[test]
fn invalid_register_exits_with_failure() {
    ls8()
        .arg("run")
        .arg("tests/files/bad_register.ls8")
        .assert()
        .failure()
        .stdout(diff(""))
        .stderr(contains("invalid register R9"));
}

#[test]
fn traces_each_instruction() {
    ls8()
        .arg("run")
        .arg("--trace")
        .arg("tests/files/print8.ls8")
        .assert()
        .success()
        .stdout(diff("8\n"))
        .stderr(contains("TRACE: 00 | 82 00 08 | 00 00 00 00 00 00 00 F4"))
        .stderr(contains("TRACE: 03 | 47 00 01 | 08 00 00 00 00 00 00 F4"))
        .stderr(contains("TRACE: 05 | 01 00 00 | 08 00 00 00 00 00 00 F4"));
}

#[test]
fn trace_from_environment() {
    ls8()
        .env("LS8_TRACE", "1")
        .arg("tests/files/print8.ls8")
        .assert()
        .success()
        .stderr(contains("TRACE: 00 |"));
}

#[test]
fn rejects_bad_literal() {
    ls8()
        .arg("run")
        .arg("tests/files/bad_literal.ls8")
        .assert()
        .failure()
        .stdout(diff(""))
        .stderr(contains("invalid binary literal"));
}

#[test]
fn checks_program() {
    ls8()
        .arg("check")
        .arg("tests/files/call.ls8")
        .assert()
        .success()
        .stdout(diff(""))
        .stderr(contains("30 bytes loaded"));

    ls8()
        .arg("check")
        .arg("tests/files/bad_literal.ls8")
        .assert()
        .failure();
}

#[test]
fn missing_file_fails() {
    ls8()
        .arg("run")
        .arg("tests/files/does_not_exist.ls8")
        .assert()
        .failure();
}

#[test]
fn disassembles_program() {
    ls8()
        .arg("disasm")
        .arg("tests/files/add.ls8")
        .assert()
        .success()
        .stdout(diff(
            "00: 82 00 08  LDI R0, 8\n\
             03: 82 01 09  LDI R1, 9\n\
             06: A0 00 01  ADD R0, R1\n\
             09: 47 00     PRN R0\n\
             0B: 01        HLT\n",
        ));
}
