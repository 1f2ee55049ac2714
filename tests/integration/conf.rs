use crate::common::{FileAssert, TestProject};
use helmkit::confload::LoadedConfig;
use helmkit::test_utils::ConfFixture;
use serde_json::Value;

fn read_output(project: &TestProject, relative: &str) -> Value {
    let text = std::fs::read_to_string(project.path(relative)).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_conf_default_discovery_with_grouping() {
    let project = TestProject::new().unwrap();
    ConfFixture::database_grouping().write_to(project.project_path());

    project.run_helmkit(&["conf"]).unwrap().assert_success().assert_stdout_contains(
        "all_variables.json",
    );

    let output = read_output(&project, "all_variables.json");
    assert_eq!(output["main"]["RDBMS_DB_CLIENT"], "mysql");
    assert_eq!(output["main"]["DB_COMMON_USER"], "common_db_user");
    assert!(output["main"].get("MYSQL_HOST").is_none());
    assert_eq!(output["database_configs"]["mysql"]["DB_USER"], "common_db_user");
    assert_eq!(output["database_configs"]["postgres"]["DB_USER"], "pg_user_override");
    assert_eq!(output["metadata"]["source_type"], "default_discovery");
    assert_eq!(output["metadata"]["database_grouping_enabled"], true);
}

#[test]
fn test_conf_grouping_disabled() {
    let project = TestProject::new().unwrap();
    ConfFixture::database_grouping().write_to(project.project_path());

    project
        .run_helmkit(&["conf", "--dbgrouping", "false", "--output", "flat.json"])
        .unwrap()
        .assert_success();

    let output = read_output(&project, "flat.json");
    assert!(output.get("database_configs").is_none());
    assert_eq!(output["main"]["MYSQL_HOST"], "mysqlserver");
    assert_eq!(output["main"]["PG_HOST"], "pgserver");
}

#[test]
fn test_conf_environment_and_basepath() {
    let project = TestProject::new().unwrap();
    ConfFixture::new()
        .with_file("app/install-dev.conf", "MODE=development\nAPI_URL=${DEV_API_URL}\n")
        .with_file("app/install.conf", "MODE=generic\n")
        .with_file("app/conf-dev/api.conf", "DEV_API_URL=http://dev.api\n")
        .write_to(project.project_path());

    let base = project.path("app");
    project
        .run_helmkit(&["conf", "--basepath", base.to_str().unwrap(), "--env", "dev"])
        .unwrap()
        .assert_success();

    // Relative output lands in the base path
    let output = read_output(&project, "app/all_variables.json");
    assert_eq!(output["main"]["MODE"], "development");
    assert_eq!(output["main"]["API_URL"], "http://dev.api");
    assert_eq!(output["metadata"]["source_environment"], "dev");
}

#[test]
fn test_conf_custom_files_and_directories() {
    let project = TestProject::new().unwrap();
    ConfFixture::new()
        .with_file("base.conf", "HOST=localhost\nURL=http://${HOST}:${PORT}\n")
        .with_file("extra/b.conf", "PORT=8080\n")
        .with_file("extra/a.conf", "PORT=1\nHOST=example\n")
        .with_file("extra/notes.txt", "PORT=9999\n")
        .write_to(project.project_path());

    project
        .run_helmkit(&["conf", "--files", "base.conf,extra", "--output", "out/vars.json"])
        .unwrap()
        .assert_success();

    let output = read_output(&project, "out/vars.json");
    // Directory entries are read in name order, later files win
    assert_eq!(output["main"]["PORT"], "8080");
    assert_eq!(output["main"]["HOST"], "example");
    assert_eq!(output["main"]["URL"], "http://example:8080");
    assert_eq!(output["metadata"]["source_type"], "custom_paths");
}

#[test]
fn test_conf_missing_custom_file_fails() {
    let project = TestProject::new().unwrap();

    project
        .run_helmkit(&["conf", "--files", "missing.conf"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("missing.conf");
    FileAssert::not_exists(project.path("all_variables.json"));
}

#[test]
fn test_conf_output_deserializes() {
    let project = TestProject::new().unwrap();
    project.write_file("install.conf", "A=1\nB=${A}-${UNKNOWN}\n").unwrap();

    project.run_helmkit(&["conf", "--output", "vars.json"]).unwrap().assert_success();

    let text = std::fs::read_to_string(project.path("vars.json")).unwrap();
    let config: LoadedConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(config.main["B"], "1-${UNKNOWN}");
    assert!(config.database_configs.is_empty());
}
