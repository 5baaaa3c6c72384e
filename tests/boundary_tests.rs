use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::process::Command;
use std::str::FromStr;

mod common;

fn decimal(report: &serde_json::Value, field: &str) -> Decimal {
    Decimal::from_str(report[field].as_str().unwrap()).unwrap()
}

#[test]
fn test_report_revenue_split() {
    let actions = common::write_actions(&[
        "customer, user_1, book, @a, L-A01, Rider A,",
        "customer, user_1, book, @b, L-A02, Rider B,",
        "customer, user_1, book, @c, L-B01, Rider C,",
        "customer, user_1, book, @d, L-C01, Rider A,",
        "customer, user_1, pay, @a",
        "customer, user_1, pay, @b",
        "customer, user_1, pay, @c",
        "customer, user_1, pay, @d",
    ])
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("unideliver"));
    cmd.arg(actions.path())
        .arg("--no-seed")
        .arg("--output")
        .arg("report");

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(report["paid_packages"], 4);
    assert_eq!(decimal(&report, "total_revenue"), dec!(10.00));
    assert_eq!(decimal(&report, "platform_earnings"), dec!(1.50));
    assert_eq!(decimal(&report, "rider_payouts"), dec!(8.50));
    assert_eq!(report["occupied_lockers"], 4);
    assert_eq!(report["total_lockers"], 5);
    assert_eq!(decimal(&report, "locker_utilization"), dec!(0.8));
}

#[test]
fn test_extreme_fee_precision() {
    let actions = common::write_actions(&[
        "customer, user_1, book, @a, L-A01, Rider A,",
        "customer, user_1, pay, @a",
    ])
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("unideliver"));
    cmd.arg(actions.path())
        .arg("--no-seed")
        .arg("--service-fee")
        .arg("0.0001")
        .arg("--commission-rate")
        .arg("0.5")
        .arg("--output")
        .arg("report");

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(decimal(&report, "total_revenue"), dec!(0.0001));
    assert_eq!(decimal(&report, "platform_earnings"), dec!(0.00005));
    assert_eq!(decimal(&report, "rider_payouts"), dec!(0.00005));
}

#[test]
fn test_commission_rate_out_of_range() {
    let actions = common::write_actions(&[]).unwrap();

    let mut cmd = Command::new(cargo_bin!("unideliver"));
    cmd.arg(actions.path()).arg("--commission-rate").arg("1.5");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Commission rate must be between 0 and 1"));
}

#[test]
fn test_negative_service_fee() {
    let actions = common::write_actions(&[]).unwrap();

    let mut cmd = Command::new(cargo_bin!("unideliver"));
    cmd.arg(actions.path()).arg("--service-fee=-1");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Amount must not be negative"));
}

#[test]
fn test_report_fee_out_of_range() {
    let actions = common::write_actions(&[
        "customer, user_1, book, @a, L-A01, Rider A,",
        "customer, user_1, book, @b, L-A02, Rider B,",
        "customer, user_1, pay, @a",
        "customer, user_1, pay, @b",
    ])
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("unideliver"));
    cmd.arg(actions.path())
        .arg("--no-seed")
        .arg("--service-fee")
        .arg("79228162514264337593543950335")
        .arg("--output")
        .arg("report");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("is out of range"));
}
