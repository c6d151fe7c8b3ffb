use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

mod common;
use common::{W1, W2, W3, W9};

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let seeds = dir.path().join("wallets.csv");
    let requests = dir.path().join("requests.csv");

    common::write_seeds(
        &seeds,
        &[(W1, "1000.00"), (W2, "1000.00"), (W3, "1000.00")],
    )?;
    common::write_requests(
        &requests,
        &[
            [W1, "DEPOSIT", "500.00"],
            [W2, "WITHDRAW", "500.00"],
            [W3, "WITHDRAW", "1500.00"],
            [W9, "DEPOSIT", "1.00"],
        ],
    )?;

    let mut cmd = Command::new(cargo_bin!("wallet-lanes"));
    cmd.arg(&requests).arg("--wallets").arg(&seeds);

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("wallet,balance\n"))
        .stdout(predicate::str::contains(format!("{W1},1500.00")))
        .stdout(predicate::str::contains(format!("{W2},500.00")))
        .stdout(predicate::str::contains(format!("{W3},1000.00")))
        .stdout(predicate::str::contains(W9).not())
        .stderr(predicate::str::contains("request rejected"))
        .stderr(predicate::str::contains("insufficient funds"))
        .stderr(predicate::str::contains(format!("wallet {W9} not found")));

    Ok(())
}

#[test]
fn test_requests_apply_in_file_order() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let seeds = dir.path().join("wallets.csv");
    let requests = dir.path().join("requests.csv");

    common::write_seeds(&seeds, &[(W1, "0.00")])?;
    // withdrawal only succeeds if it runs after both deposits
    common::write_requests(
        &requests,
        &[
            [W1, "DEPOSIT", "30.00"],
            [W1, "DEPOSIT", "20.00"],
            [W1, "WITHDRAW", "50.00"],
            [W1, "DEPOSIT", "0.25"],
        ],
    )?;

    let mut cmd = Command::new(cargo_bin!("wallet-lanes"));
    cmd.arg(&requests)
        .arg("--wallets")
        .arg(&seeds)
        .arg("--idle-timeout-ms")
        .arg("1");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(format!("{W1},0.25")));

    Ok(())
}

#[test]
fn test_zero_idle_timeout_is_refused() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let requests = dir.path().join("requests.csv");
    common::write_requests(&requests, &[[W1, "DEPOSIT", "1.00"]])?;

    let mut cmd = Command::new(cargo_bin!("wallet-lanes"));
    cmd.arg(&requests).arg("--idle-timeout-ms").arg("0");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--idle-timeout-ms"));

    Ok(())
}

#[test]
fn test_missing_input_file_fails() {
    let mut cmd = Command::new(cargo_bin!("wallet-lanes"));
    cmd.arg("does/not/exist.csv");

    cmd.assert().failure();
}
