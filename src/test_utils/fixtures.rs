//! Test fixtures for chart and configuration trees
//!
//! Fixtures are written with `std::fs` and panic on failure, so they are only
//! meant for tests.

use std::fs;
use std::path::{Path, PathBuf};

/// PNG signature followed by a placeholder-looking payload that must never be extracted.
pub const PNG_ICON: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, b'@', b'{', b'p', b'n', b'g', b'S', b'e', b'c',
    b'r', b'e', b't', b'}',
];

/// Builder for a small Helm chart using `@{name}` placeholders.
///
/// The chart uses the placeholders `appName`, `chartVersionVar`,
/// `containerNameVar`, `imageRepoVar`, `imageTagVar`, `replicaCountVar` and
/// `serviceTypeVar`, and ships a binary `icon.png`.
#[derive(Clone, Debug)]
pub struct ChartFixture {
    name: String,
    subchart: bool,
    extra_files: Vec<(String, Vec<u8>)>,
}

impl ChartFixture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subchart: false,
            extra_files: Vec::new(),
        }
    }

    /// Add `charts/mysubchart` with its own manifest and values.
    pub fn with_subchart(mut self) -> Self {
        self.subchart = true;
        self
    }

    /// Add an arbitrary file relative to the chart root.
    pub fn with_file(mut self, relative: impl Into<String>, content: impl AsRef<[u8]>) -> Self {
        self.extra_files.push((relative.into(), content.as_ref().to_vec()));
        self
    }

    /// Write the chart into `dir` (created if needed) and return `dir`.
    pub fn write_to(&self, dir: &Path) -> PathBuf {
        let chart_yaml = format!(
            "apiVersion: v2\nname: {}\ndescription: A Helm chart for Kubernetes\ntype: application\nversion: 0.1.0\nappVersion: \"1.0.0\"\n",
            self.name
        );
        write_file(dir, "Chart.yaml", chart_yaml.as_bytes());
        write_file(
            dir,
            "values.yaml",
            b"replicaCount: '@{replicaCountVar}'\nimage:\n  repository: '@{imageRepoVar}'\n  tag: '@{imageTagVar}'\nservice:\n  type: '@{serviceTypeVar}'\n  port: 80\n",
        );
        write_file(
            dir,
            "templates/deployment.yaml",
            b"apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: \"{{ .Release.Name }}-@{appName}\"\nspec:\n  replicas: 1\n  template:\n    spec:\n      containers:\n        - name: '@{containerNameVar}'\n          image: \"{{ .Values.image.repository }}:{{ .Values.image.tag }}\"\n",
        );
        write_file(
            dir,
            "templates/NOTES.txt",
            b"This chart deploys @{appName}.\nVersion: @{chartVersionVar}",
        );
        write_file(dir, "icon.png", PNG_ICON);

        if self.subchart {
            write_file(
                dir,
                "charts/mysubchart/Chart.yaml",
                b"apiVersion: v2\nname: mysubchart\nversion: 0.1.0\n",
            );
            write_file(
                dir,
                "charts/mysubchart/values.yaml",
                b"image:\n  tag: '@{imageTagVar}'\n",
            );
        }

        for (relative, content) in &self.extra_files {
            write_file(dir, relative, content);
        }

        dir.to_path_buf()
    }
}

/// Builder for an `install.conf` + `conf/` tree.
#[derive(Clone, Debug, Default)]
pub struct ConfFixture {
    files: Vec<(String, String)>,
}

impl ConfFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// The layout used throughout the loader tests: a MySQL client selected in
    /// `install.conf`, two database files and one shared file.
    pub fn database_grouping() -> Self {
        Self::new()
            .with_file("install.conf", "RDBMS_DB_CLIENT=mysql\nMAIN_SETTING=abc\n")
            .with_file(
                "conf/database_mysql.conf",
                "MYSQL_HOST=mysqlserver\nDB_USER=${DB_COMMON_USER}\n",
            )
            .with_file("conf/database_postgres.conf", "PG_HOST=pgserver\nDB_USER=pg_user_override\n")
            .with_file("conf/common.conf", "DB_COMMON_USER=common_db_user\n")
    }

    pub fn with_file(mut self, relative: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.push((relative.into(), content.into()));
        self
    }

    /// Write every file below `dir` and return `dir`.
    pub fn write_to(&self, dir: &Path) -> PathBuf {
        for (relative, content) in &self.files {
            write_file(dir, relative, content.as_bytes());
        }
        dir.to_path_buf()
    }
}

fn write_file(dir: &Path, relative: &str, content: &[u8]) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("failed to create {}: {e}", parent.display()));
    }
    fs::write(&path, content).unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
}
