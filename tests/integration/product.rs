use crate::common::{FileAssert, TestProject};
use helmkit::test_utils::{ChartFixture, fixtures::PNG_ICON};
use serde_json::Value;

/// Project with `charts/demo` (a chart fixture) and an empty `chart_products/`.
fn project_with_chart() -> TestProject {
    let project = TestProject::new().unwrap();
    ChartFixture::new("demo").with_subchart().write_to(&project.path("charts/demo"));
    std::fs::create_dir_all(project.path("chart_products")).unwrap();
    project
}

#[test]
fn test_extract_vars_text_and_json() {
    let project = project_with_chart();

    let output = project.run_helmkit(&["product", "extract-vars", "charts/demo"]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains("Found Variables:")
        .assert_stdout_contains("  - imageTagVar");
    assert!(!output.stdout.contains("pngSecret"));

    let output = project
        .run_helmkit(&["product", "--output", "json", "extract-vars", "charts/demo"])
        .unwrap();
    output.assert_success();
    let vars: Value = serde_json::from_str(&output.stdout).unwrap();
    let names: Vec<&str> = vars.as_array().unwrap().iter().map(|v| v["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "appName",
            "chartVersionVar",
            "containerNameVar",
            "imageRepoVar",
            "imageTagVar",
            "replicaCountVar",
            "serviceTypeVar",
        ]
    );
}

#[test]
fn test_extract_vars_missing_path() {
    let project = project_with_chart();
    project
        .run_helmkit(&["product", "extract-vars", "charts/nope"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("not found");
}

#[test]
fn test_instantiate_with_values_file_and_set() {
    let project = project_with_chart();
    project
        .write_file(
            "values.yaml",
            "replicaCountVar: 2\nimageRepoVar: nginx\nimageTagVar: '1.25'\nserviceTypeVar: ClusterIP\n",
        )
        .unwrap();

    project
        .run_helmkit(&[
            "product",
            "instantiate",
            "charts/demo",
            "out/demo",
            "--values",
            "values.yaml",
            "--set",
            "replicaCountVar=5,appName=web",
            "--validate",
        ])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("Successfully instantiated chart to:");

    let values = project.path("out/demo/values.yaml");
    FileAssert::contains(&values, "replicaCount: '5'");
    FileAssert::contains(&values, "repository: 'nginx'");
    FileAssert::contains(&values, "tag: '1.25'");
    FileAssert::equals(
        project.path("out/demo/templates/NOTES.txt"),
        "This chart deploys web.\nVersion: ",
    );
    assert_eq!(std::fs::read(project.path("out/demo/icon.png")).unwrap(), PNG_ICON);
}

#[test]
fn test_instantiate_error_policy_writes_nothing() {
    let project = project_with_chart();

    let output = project
        .run_helmkit(&[
            "product",
            "instantiate",
            "charts/demo",
            "out/demo",
            "--set",
            "appName=web",
            "--unassigned",
            "error",
        ])
        .unwrap();
    output
        .assert_failure()
        .assert_stderr_contains("Unassigned variables")
        .assert_stderr_contains("chartVersionVar")
        .assert_stderr_contains("serviceTypeVar");
    FileAssert::not_exists(project.path("out/demo"));
}

#[test]
fn test_instantiate_missing_chart_path() {
    let project = project_with_chart();
    project
        .run_helmkit(&["product", "instantiate", "charts/nope", "out"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("chart not found: charts/nope");
    FileAssert::not_exists(project.path("out"));
}

#[test]
fn test_instantiate_keep_policy() {
    let project = project_with_chart();

    project
        .run_helmkit(&["product", "instantiate", "charts/demo", "out", "--unassigned", "keep"])
        .unwrap()
        .assert_success();
    FileAssert::contains(project.path("out/values.yaml"), "replicaCount: '@{replicaCountVar}'");
}

#[test]
fn test_define_list_get_and_instantiate_product() {
    let project = project_with_chart();
    project
        .write_file(
            "vars.yaml",
            "- name: appName\n  description: Application name\n  default: demo\n- name: imageTagVar\n",
        )
        .unwrap();

    project
        .run_helmkit(&[
            "product",
            "define",
            "web-app",
            "--base-chart-path",
            "charts/demo",
            "--description",
            "Demo web application",
            "--variables-file",
            "vars.yaml",
        ])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("Successfully defined product 'web-app'");
    FileAssert::exists(project.path("chart_products/web-app/product_meta.yaml"));
    FileAssert::exists(project.path("chart_products/web-app/chart/Chart.yaml"));

    project
        .run_helmkit(&["product", "list"])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("web-app")
        .assert_stdout_contains("Demo web application");

    let output = project.run_helmkit(&["product", "--output", "json", "get", "web-app"]).unwrap();
    output.assert_success();
    let product: Value = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(product["name"], "web-app");
    assert_eq!(product["variables"][0]["name"], "appName");
    assert_eq!(product["variables"][0]["default"], "demo");
    assert_eq!(product["variables"].as_array().unwrap().len(), 2);

    let output = project.run_helmkit(&["product", "--output", "yaml", "get-chart", "web-app"]).unwrap();
    output.assert_success().assert_stdout_contains("name: demo").assert_stdout_contains("version: 0.1.0");

    project
        .run_helmkit(&["product", "instantiate", "web-app", "out", "--set", "appName=shop"])
        .unwrap()
        .assert_success();
    FileAssert::contains(project.path("out/templates/NOTES.txt"), "This chart deploys shop.");

    // Defining the same product twice is rejected
    project
        .run_helmkit(&["product", "define", "web-app", "--base-chart-path", "charts/demo"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("already exists");
}

#[test]
fn test_get_unknown_product_suggests() {
    let project = project_with_chart();
    project
        .run_helmkit(&["product", "define", "nginx", "--base-chart-path", "charts/demo"])
        .unwrap()
        .assert_success();

    project
        .run_helmkit(&["product", "get", "ngnix"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("product not found: ngnix")
        .assert_stderr_contains("nginx");
}

#[test]
fn test_list_empty_products_dir() {
    let project = TestProject::new().unwrap();
    project
        .run_helmkit(&["product", "--products-dir", "nowhere", "list"])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("No products found");
}

#[test]
fn test_validate_reports_every_invalid_file() {
    let project = project_with_chart();
    project.run_helmkit(&["product", "validate", "charts/demo"]).unwrap().assert_success();

    project.write_file("charts/demo/templates/bad.yaml", "key: [unclosed\n").unwrap();
    project.write_file("charts/demo/data.json", "{\"a\": }").unwrap();

    project
        .run_helmkit(&["product", "validate", "charts/demo"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("bad.yaml")
        .assert_stderr_contains("data.json");
}
