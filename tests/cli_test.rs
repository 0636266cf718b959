use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

fn json_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("tdspay"));
    cmd.arg("tests/fixtures/checkout.json")
        .arg("--script")
        .arg("tests/fixtures/approved_gateway.json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""status":"succeeded""#))
        .stdout(predicate::str::contains(r#""liabilityShifted":true"#))
        .stdout(predicate::str::contains(r#""nonce":"tokencc_abc123_3ds""#))
        .stdout(predicate::str::contains(r#""enrolled":"Y""#));

    Ok(())
}

#[test]
fn test_cli_reports_failing_step() {
    let script = json_file(
        r#"{"failAt": "createTDSPayment", "failureMessage": "3DS unavailable",
            "paymentMethod": {"creditCards": [{"nonce": "n", "bin": "411111"}]}}"#,
    );

    let mut cmd = Command::new(cargo_bin!("tdspay"));
    cmd.arg("tests/fixtures/checkout.json")
        .arg("--script")
        .arg(script.path());

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains(r#""status":"failed""#))
        .stdout(predicate::str::contains(r#""step":"createTDSPayment""#))
        .stderr(predicate::str::contains("3DS unavailable"));
}

#[test]
fn test_cli_liability_rejection() {
    let script = json_file(
        r#"{"paymentMethod": {"creditCards": [{"nonce": "n", "bin": "411111"}]},
            "verification": {"liabilityShifted": false, "threeDSecureInfo": {"status": "authenticate_failed"}}}"#,
    );

    let mut cmd = Command::new(cargo_bin!("tdspay"));
    cmd.arg("tests/fixtures/checkout.json")
        .arg("--script")
        .arg(script.path());

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains(r#""status":"rejected""#))
        .stderr(predicate::str::contains("liabilityShifted = false"));
}

#[test]
fn test_cli_validation_error_skips_gateway() {
    let checkout = json_file(r#"{"amount": "10.00"}"#);

    let mut cmd = Command::new(cargo_bin!("tdspay"));
    cmd.arg(checkout.path())
        .arg("--script")
        .arg("tests/fixtures/approved_gateway.json");

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Token [token] is required"));
}

#[test]
fn test_cli_missing_input_file() {
    let mut cmd = Command::new(cargo_bin!("tdspay"));
    cmd.arg("tests/fixtures/does_not_exist.json")
        .arg("--script")
        .arg("tests/fixtures/approved_gateway.json");

    cmd.assert().failure();
}
