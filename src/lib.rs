//! Incremental build wrapper for the Android lint static analyzer.
//!
//! The wrapper decides whether a run is needed from content hashes of the
//! declared inputs, stages sources into collision-free temporary directories,
//! invokes the tool, normalizes the stored report so it carries no
//! machine-specific paths, and propagates pass/fail per the strict-failure
//! flag. Concurrent runs against the same outputs are the caller's job to
//! serialize.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

pub mod annotate;
pub mod cli;
pub mod depfile;
pub mod errors;
pub mod paths;
pub mod report;
pub mod runner;
pub mod stale;
pub mod staging;
pub mod util;

pub use errors::{exit_code_for_error, exit_code_for_io_error, LintError};
pub use paths::SourceRoot;
pub use runner::{run_incremental, run_lint, ActionInputs, LintOptions, RunOutcome};

/// Resolve the parsed command line into one incremental action and run it.
pub fn run(cli: cli::Cli) -> Result<RunOutcome, LintError> {
    if !cli.enable {
        // Disabled builds still need their stamp for the build graph.
        if let Some(stamp) = &cli.stamp {
            util::fs::touch(stamp)?;
        }
        return Ok(RunOutcome::UpToDate);
    }

    let root = match &cli.src_root {
        Some(p) => SourceRoot::new(p)?,
        None => SourceRoot::from_executable()?,
    };
    debug!(root = %root.path().display(), "source root");

    let sources = if cli.src_dirs.is_empty() {
        cli.java_files.clone()
    } else {
        find_java_sources(&cli.src_dirs)
    };

    let mut input_paths = vec![cli.lint_path.clone(), cli.platform_xml_path.clone()];
    if let Some(config) = &cli.config_path {
        input_paths.push(config.clone());
    }
    if let Some(jar) = &cli.jar_path {
        input_paths.push(jar.clone());
    }
    if let Some(manifest) = &cli.manifest_path {
        input_paths.push(manifest.clone());
    }
    if let Some(resource_dir) = &cli.resource_dir {
        input_paths.extend(files_under(resource_dir));
    }
    input_paths.extend(sources.iter().cloned());

    let mut input_strings = Vec::new();
    if let Some(processed) = &cli.processed_config_path {
        input_strings.push(processed.display().to_string());
    }

    let record_base = cli.stamp.as_ref().unwrap_or(&cli.result_path);
    let record_path = PathBuf::from(format!("{}.fingerprint", record_base.display()));

    let opts = LintOptions {
        lint_path: cli.lint_path,
        product_dir: cli.product_dir,
        result_path: cli.result_path,
        cache_dir: Some(cli.cache_dir),
        config_path: cli.config_path,
        processed_config_path: cli.processed_config_path,
        manifest_path: cli.manifest_path,
        jar_path: cli.jar_path,
        resource_dir: cli.resource_dir,
        can_fail_build: cli.can_fail_build,
        silent: cli.silent,
    };
    let inputs = ActionInputs {
        sources,
        input_paths,
        input_strings,
        record_path,
        stamp_path: cli.stamp,
        depfile_path: cli.depfile,
    };

    run_incremental(&root, &opts, &inputs)
}

/// All `*.java` files under the given directories, in deterministic order.
/// An unreadable or missing directory yields a warning, not an abort, so a
/// bad `--src-dirs` entry is visible instead of silently shrinking the run.
fn find_java_sources(dirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for dir in dirs {
        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(log_walk_error)
        {
            if entry.file_type().is_file()
                && entry.path().extension().is_some_and(|e| e == "java")
            {
                out.push(entry.into_path());
            }
        }
    }
    out
}

/// Every regular file under a directory, in deterministic order. Resource
/// files join the declared input set so resource edits retrigger the run.
fn files_under(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(log_walk_error)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect()
}

fn log_walk_error(entry: walkdir::Result<walkdir::DirEntry>) -> Option<walkdir::DirEntry> {
    match entry {
        Ok(e) => Some(e),
        Err(e) => {
            warn!("skipping unreadable directory entry: {e}");
            None
        }
    }
}
