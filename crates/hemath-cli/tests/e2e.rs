//! End-to-end CLI integration tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn hemath() -> Command {
    let mut cmd = Command::cargo_bin("hemath").expect("binary not found");
    cmd.env_remove("HEMATH_FORMAT")
        .env_remove("HEMATH_POOL")
        .env_remove("HEMATH_SEED");
    cmd
}

#[test]
fn help_flag() {
    hemath()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("modular arithmetic"));
}

#[test]
fn version_flag() {
    hemath()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hemath"));
}

#[test]
fn divide_by_mersenne_modulus() {
    hemath()
        .args(["divide", "100", "31"])
        .assert()
        .success()
        .stdout("quotient: 3\nremainder: 7\n");
}

#[test]
fn divide_wide_numerator() {
    // (2^128 - 1) = 3 * 113427455640312821154458202477256070485
    hemath()
        .args(["divide", "0xffffffffffffffffffffffffffffffff", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "quotient: 113427455640312821154458202477256070485",
        ))
        .stdout(predicate::str::contains("remainder: 0"));
}

#[test]
fn divide_by_power_of_two_modulus() {
    // 2^128 - 1 = (2^88 - 1) * 2^40 + (2^40 - 1)
    hemath()
        .args(["divide", "0xffffffffffffffffffffffffffffffff", "0x10000000000"])
        .assert()
        .success()
        .stdout("quotient: 309485009821345068724781055\nremainder: 1099511627775\n");
}

#[test]
fn invert_known_value() {
    hemath()
        .args(["invert", "331975426", "1351315121"])
        .assert()
        .success()
        .stdout("inverse: 1052541512\n");
}

#[test]
fn invert_without_inverse_exits_with_domain_code() {
    hemath()
        .args(["invert", "2", "4"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no inverse"));
}

#[test]
fn zero_modulus_is_a_config_error() {
    hemath()
        .args(["mulmod", "0", "0", "0"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("modulus cannot be zero"));
}

#[test]
fn malformed_number_is_a_config_error() {
    hemath()
        .args(["powmod", "2", "ten", "7"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("invalid number"));
}

#[test]
fn mulmod_and_powmod() {
    hemath()
        .args(["mulmod", "18446744073709551556", "18446744073709551555", "18446744073709551557"])
        .assert()
        .success()
        .stdout("product: 2\n");
    hemath()
        .args(["powmod", "2", "10", "1000000007"])
        .assert()
        .success()
        .stdout("power: 1024\n");
}

#[test]
fn seeded_primitive_root() {
    hemath()
        .args(["root", "2", "29", "--seed", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("root: 28"));
    hemath()
        .args(["root", "8", "1234565441", "--minimal", "--seed", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("root: 249725733"));
}

#[test]
fn root_for_non_dividing_degree_fails() {
    hemath()
        .args(["root", "4", "11"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no primitive root"));
}

#[test]
fn json_output_with_shared_pool_stats() {
    let output = hemath()
        .args(["divide", "100", "31", "--format", "json", "--pool", "shared", "--stats"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["operation"], "divide");
    assert_eq!(value["fields"]["quotient"], "3");
    assert_eq!(value["fields"]["remainder"], "7");
    assert!(value["pool"]["hits"].is_u64());
}

#[test]
fn format_from_environment() {
    hemath()
        .env("HEMATH_FORMAT", "json")
        .args(["info", "31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"reduction\": \"power-of-two-minus-one\""));
}

#[test]
fn output_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inverse.txt");
    hemath()
        .args(["invert", "3", "7", "-o", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout("");
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "inverse: 5\n");
}
