#![cfg(feature = "storage-rocksdb")]

mod common;

use assert_cmd::cargo_bin;
use common::commands_file;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: create a payment
    let csv1 = commands_file(&["create,,1,12345678900,PIX,,100.00,"]);

    let mut cmd1 = Command::new(cargo_bin!("payflow"));
    cmd1.arg("apply").arg(csv1.path()).arg("--db-path").arg(&db_path);

    let output1 = cmd1.output().expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    assert!(stdout1.contains("1,1,12345678900,PIX,,100.00,PENDING"));

    // 2. Second run: settle it and create another against the same DB path
    let csv2 = commands_file(&[
        "update_status,1,,,,,,SUCCEEDED",
        "create,,2,12345678900,BOLETO,,50.00,",
    ]);

    let mut cmd2 = Command::new(cargo_bin!("payflow"));
    cmd2.arg("apply").arg(csv2.path()).arg("--db-path").arg(&db_path);

    let output2 = cmd2.output().expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);

    // Payment 1 was recovered and the id sequence continued at 2
    assert!(stdout2.contains("1,1,12345678900,PIX,,100.00,SUCCEEDED"));
    assert!(stdout2.contains("2,2,12345678900,BOLETO,,50.00,PENDING"));
}

#[test]
fn test_single_commands_share_database() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    let created = Command::new(cargo_bin!("payflow"))
        .args(["create", "--debit-code", "9", "--tax-id", "1", "--method", "PIX", "--amount", "5.00"])
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .unwrap();
    assert!(created.status.success());

    let deactivated = Command::new(cargo_bin!("payflow"))
        .args(["deactivate", "1", "--db-path"])
        .arg(&db_path)
        .output()
        .unwrap();
    assert!(deactivated.status.success());
    let confirmation = String::from_utf8_lossy(&deactivated.stdout);
    assert!(confirmation.contains("1,9,1,PIX,,5.00,INACTIVE"));

    let listed = Command::new(cargo_bin!("payflow"))
        .args(["list", "--db-path"])
        .arg(&db_path)
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&listed.stdout);
    assert!(stdout.contains("1,9,1,PIX,,5.00,INACTIVE"));
}
