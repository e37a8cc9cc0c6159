#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Throwaway project tree with a fake lint tool, mimicking the layout the
/// wrapper sees in a real checkout.
pub struct Project {
    pub td: TempDir,
}

pub const SAMPLE_REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<issues format="4" by="lint 24.2">
  <issue id="NewApi"
         message="Call requires API level 14"
         errorLine1="    view.setBackground(d);"
         errorLine2="         ~~~~~~~~~~~~~">
    <location file="java/src/org/example/Foo.java" line="42"/>
  </issue>
  <issue id="UnusedResources"
         message="The resource R.string.hello appears to be unused">
    <location file="out/Debug/example.jar"/>
  </issue>
</issues>
"#;

impl Project {
    pub fn new() -> Self {
        let td = TempDir::new().expect("tmpdir");
        let root = td.path();
        fs::create_dir_all(root.join("tools")).expect("mkdir tools");
        fs::create_dir_all(root.join("out/Debug")).expect("mkdir out");
        fs::create_dir_all(root.join("java/src/org/example")).expect("mkdir java");
        fs::write(root.join("tools/api-platforms.xml"), "<api/>").expect("write platform xml");
        fs::write(
            root.join("java/src/org/example/Foo.java"),
            "class Foo {}",
        )
        .expect("write source");
        Self { td }
    }

    pub fn root(&self) -> &Path {
        self.td.path()
    }

    pub fn result_path(&self) -> PathBuf {
        self.root().join("out/Debug/lint-result.xml")
    }

    pub fn stamp_path(&self) -> PathBuf {
        self.root().join("out/lint.stamp")
    }

    pub fn record_path(&self) -> PathBuf {
        self.root().join("out/lint.stamp.fingerprint")
    }

    pub fn depfile_path(&self) -> PathBuf {
        self.root().join("out/lint.d")
    }

    pub fn source(&self) -> PathBuf {
        self.root().join("java/src/org/example/Foo.java")
    }

    /// Install `tools/lint` as an executable shell script.
    #[cfg(unix)]
    pub fn install_tool(&self, body: &str) {
        use std::os::unix::fs::PermissionsExt;
        let path = self.root().join("tools/lint");
        fs::write(&path, format!("#!/bin/sh\n{body}")).expect("write tool");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod tool");
    }

    /// Fake tool that writes `report` to the result path and exits with
    /// `code`. A run marker is appended to out/invocations on every call.
    #[cfg(unix)]
    pub fn install_reporting_tool(&self, report: &str, code: i32) {
        let report_file = self.root().join("out/report-template.xml");
        fs::write(&report_file, report).expect("write report template");
        let body = format!(
            "echo run >> {invocations}\ncp {template} {result}\nexit {code}\n",
            invocations = self.root().join("out/invocations").display(),
            template = report_file.display(),
            result = self.result_path().display(),
        );
        self.install_tool(&body);
    }

    pub fn invocation_count(&self) -> usize {
        fs::read_to_string(self.root().join("out/invocations"))
            .map(|s| s.lines().count())
            .unwrap_or(0)
    }

    /// Wrapper invocation with the required arguments and one java source.
    pub fn cmd(&self) -> Command {
        let root = self.root();
        let mut c = Command::new(env!("CARGO_BIN_EXE_lintwrap"));
        c.arg("--enable")
            .arg("--src-root")
            .arg(root)
            .arg("--lint-path")
            .arg(root.join("tools/lint"))
            .arg("--product-dir")
            .arg(root.join("out/Debug"))
            .arg("--result-path")
            .arg(self.result_path())
            .arg("--cache-dir")
            .arg(root.join("out/lint-cache"))
            .arg("--platform-xml-path")
            .arg(root.join("tools/api-platforms.xml"))
            .arg("--java-files")
            .arg(self.source())
            .arg("--stamp")
            .arg(self.stamp_path())
            .arg("--depfile")
            .arg(self.depfile_path());
        c
    }
}

pub fn stderr_of(out: &std::process::Output) -> String {
    String::from_utf8_lossy(&out.stderr).to_string()
}
