use crate::common::{FileAssert, TestProject};
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let project = TestProject::new().unwrap();
    project
        .command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("conf"))
        .stdout(predicate::str::contains("product"));
}

#[test]
fn test_product_help_lists_subcommands() {
    let project = TestProject::new().unwrap();
    project
        .command()
        .args(["product", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("instantiate"))
        .stdout(predicate::str::contains("extract-vars"))
        .stdout(predicate::str::contains("get-chart"));
}

#[test]
fn test_invalid_unassigned_policy_rejected() {
    let project = TestProject::new().unwrap();
    project
        .command()
        .args(["product", "instantiate", "x", "out", "--unassigned", "drop"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("drop"));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    let project = TestProject::new().unwrap();
    project.command().args(["-v", "-q", "conf"]).assert().failure();
}

#[test]
fn test_invalid_set_syntax_suggests_format() {
    let project = TestProject::new().unwrap();
    project.write_file("chart/Chart.yaml", "apiVersion: v2\nname: c\nversion: 1.0.0\n").unwrap();

    project
        .command()
        .args(["product", "instantiate", "chart", "out", "--set", "novalue"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("key=value"));
}

#[test]
fn test_log_file_receives_debug_output() {
    let project = TestProject::new().unwrap();
    project.write_file("install.conf", "A=1\n").unwrap();
    let log = project.path("logs/helmkit.log");

    project
        .command()
        .args(["--verbose", "--log-file", log.to_str().unwrap(), "conf"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG").not());

    FileAssert::exists(&log);
    FileAssert::contains(&log, "Saved resolved configuration");
}

#[test]
fn test_quiet_suppresses_info_logs() {
    let project = TestProject::new().unwrap();
    project.write_file("install.conf", "A=1\n").unwrap();

    project
        .command()
        .args(["--quiet", "conf"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}
