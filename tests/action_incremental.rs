#![cfg(unix)]

mod common;

use common::{stderr_of, Project};
use std::fs;

const EMPTY_REPORT: &str = "<?xml version=\"1.0\"?>\n<issues format=\"4\"/>\n";

#[test]
fn clean_run_then_unchanged_rerun_skips_the_tool() {
    let p = Project::new();
    p.install_reporting_tool(EMPTY_REPORT, 0);

    let out = p.cmd().output().expect("first run");
    assert!(out.status.success(), "stderr:\n{}", stderr_of(&out));
    assert_eq!(p.invocation_count(), 1);
    assert!(p.stamp_path().exists());
    assert!(p.record_path().exists());

    let out = p.cmd().output().expect("second run");
    assert!(out.status.success(), "stderr:\n{}", stderr_of(&out));
    assert_eq!(p.invocation_count(), 1, "unchanged inputs must skip the tool");
}

#[test]
fn modified_source_triggers_a_rerun() {
    let p = Project::new();
    p.install_reporting_tool(EMPTY_REPORT, 0);

    assert!(p.cmd().output().expect("first run").status.success());
    assert_eq!(p.invocation_count(), 1);

    fs::write(p.source(), "class Foo { int x; }").expect("edit source");
    assert!(p.cmd().output().expect("second run").status.success());
    assert_eq!(p.invocation_count(), 2, "edited source must rerun the tool");
}

#[test]
fn missing_result_file_triggers_a_rerun_despite_matching_record() {
    let p = Project::new();
    p.install_reporting_tool(EMPTY_REPORT, 0);

    assert!(p.cmd().output().expect("first run").status.success());
    fs::remove_file(p.result_path()).expect("drop result");

    assert!(p.cmd().output().expect("second run").status.success());
    assert_eq!(p.invocation_count(), 2, "missing output must be stale");
}

#[test]
fn missing_src_dir_warns_and_still_completes() {
    let p = Project::new();
    p.install_reporting_tool(EMPTY_REPORT, 0);

    let out = p
        .cmd()
        .arg("--src-dirs")
        .arg(p.root().join("no/such/dir"))
        .output()
        .expect("run lintwrap");
    let err = stderr_of(&out);

    assert!(out.status.success(), "stderr:\n{err}");
    assert!(
        err.contains("skipping unreadable directory entry"),
        "a bad --src-dirs entry must be diagnosed, stderr:\n{err}"
    );
}

#[test]
fn disabled_run_only_touches_the_stamp() {
    let p = Project::new();
    p.install_reporting_tool(EMPTY_REPORT, 0);

    let c = p.cmd();
    // Rebuild the argument list without --enable.
    let args: Vec<_> = c
        .get_args()
        .map(|a| a.to_os_string())
        .filter(|a| a != "--enable")
        .collect();
    let out = std::process::Command::new(env!("CARGO_BIN_EXE_lintwrap"))
        .args(args)
        .output()
        .expect("disabled run");

    assert!(out.status.success(), "stderr:\n{}", stderr_of(&out));
    assert_eq!(p.invocation_count(), 0, "tool must not run when disabled");
    assert!(p.stamp_path().exists(), "stamp still gets touched");
    assert!(!p.result_path().exists());
}
