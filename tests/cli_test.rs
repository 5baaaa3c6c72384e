use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!());
    cmd.arg("tests/fixtures/actions.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "id,customer,recipient,description,status,rider,target_locker_id,locker_id,rider_locker_access_code,customer_retrieval_otp,paid",
        ))
        // Paid right after booking
        .stdout(predicate::str::contains(
            "PK001,user_customer_sim,Alice,Books,\"Paid, Ready for Rider Pickup\",Rider A,L-A01,,,,true",
        ))
        // Door delivery completed
        .stdout(predicate::str::contains(
            "PK005,user_customer_sim,Eve,Groceries,Delivered,Rider B,,,,,true",
        ))
        // The booked package went all the way into its locker
        .stdout(predicate::str::contains("user_1,Self,N/A,Stored in Locker,Rider A,L-C02,L-C02,,"))
        .stderr(predicate::str::contains(
            "Rejected action confirm_receipt by user_customer_sim: Incorrect OTP for package PK003",
        ));

    Ok(())
}

#[test]
fn test_cli_lockers_output() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!());
    cmd.arg("tests/fixtures/actions.csv")
        .arg("--output")
        .arg("lockers");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("id,location,status"))
        .stdout(predicate::str::contains("L-A01,North Campus,Occupied"))
        .stdout(predicate::str::contains("L-B01,South Campus,Maintenance"))
        .stdout(predicate::str::contains("L-C02,Central Library,Occupied"));

    Ok(())
}

#[test]
fn test_cli_missing_input_file() {
    let mut cmd = Command::new(cargo_bin!());
    cmd.arg("tests/fixtures/does_not_exist.csv");

    cmd.assert().failure();
}
