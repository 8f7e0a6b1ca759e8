use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

// Well-known first development account of local test nodes.
const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

fn cmd() -> Command {
    Command::cargo_bin("daoctl").unwrap()
}

fn run_help(args: &[&str]) {
    cmd().args(args).arg("--help").assert().success();
}

#[test]
fn every_command_has_a_help_path() {
    run_help(&[]);
    run_help(&["accounts"]);
    run_help(&["deploy"]);
    run_help(&["deploy", "token"]);
    run_help(&["deploy", "dao"]);
    run_help(&["deploy", "all"]);
}

#[test]
fn help_lists_the_command_surface() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("accounts").and(contains("deploy")));
}

#[test]
fn deploy_help_lists_the_granular_and_composite_commands() {
    cmd()
        .args(["deploy", "--help"])
        .assert()
        .success()
        .stdout(contains("token").and(contains("dao")).and(contains("all")));
}

#[test]
fn accounts_prints_addresses_derived_from_configured_keys() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("networks.yaml");
    std::fs::write(
        &config,
        format!(
            "networks:\n  localhost:\n    url: http://localhost:8545\n    accounts:\n      - \"{DEV_KEY}\"\n"
        ),
    )
    .unwrap();

    cmd()
        .arg("accounts")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(format!("{DEV_ADDRESS}\n"));
}

#[test]
fn unknown_network_fails_with_exit_code_one() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("networks.yaml");
    std::fs::write(&config, "networks:\n  localhost:\n    url: http://localhost:8545\n")
        .unwrap();

    cmd()
        .arg("accounts")
        .args(["--network", "mainnet", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stderr(contains("not defined"));
}

#[test]
fn deploy_token_without_artifacts_fails_before_touching_the_network() {
    let dir = TempDir::new().unwrap();

    cmd()
        .current_dir(dir.path())
        .args([
            "deploy",
            "token",
            "--name",
            "MotoClub",
            "--symbol",
            "MC",
            "--private-key",
            DEV_KEY,
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("No artifact"));

    // Nothing was deployed, so no record may appear.
    assert!(!dir.path().join("deployments").exists());
}

#[test]
fn deploy_dao_without_a_token_address_or_record_is_rejected() {
    let dir = TempDir::new().unwrap();

    cmd()
        .current_dir(dir.path())
        .args(["deploy", "dao", "--private-key", DEV_KEY])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("pass --token"));
}

#[test]
fn mismatched_sender_and_key_are_rejected_before_any_work() {
    let dir = TempDir::new().unwrap();

    cmd()
        .current_dir(dir.path())
        .args([
            "deploy",
            "all",
            "--name",
            "MotoClub",
            "--symbol",
            "MC",
            "--private-key",
            DEV_KEY,
            "--sender",
            "0x0000000000000000000000000000000000000000",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("does not match"));
}
