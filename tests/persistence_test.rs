#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::process::Command;
use tempfile::tempdir;

mod common;
use common::W1;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");
    let seeds = dir.path().join("wallets.csv");
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");

    // 1. First run: create the wallet and deposit into it
    common::write_seeds(&seeds, &[(W1, "100.00")]).unwrap();
    common::write_requests(&first, &[[W1, "DEPOSIT", "50.00"]]).unwrap();

    let output1 = Command::new(cargo_bin!("wallet-lanes"))
        .arg(&first)
        .arg("--wallets")
        .arg(&seeds)
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    assert!(stdout1.contains(&format!("{W1},150.00")));

    // 2. Second run: no seeds, the wallet must come back from the database
    common::write_requests(
        &second,
        &[[W1, "WITHDRAW", "25.00"], [W1, "WITHDRAW", "500.00"]],
    )
    .unwrap();

    let output2 = Command::new(cargo_bin!("wallet-lanes"))
        .arg(&second)
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);
    let stderr2 = String::from_utf8_lossy(&output2.stderr);

    assert!(stdout2.contains(&format!("{W1},125.00")));
    assert!(stderr2.contains("insufficient funds"));
}
