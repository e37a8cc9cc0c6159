//! Orchestration of one incremental lint action: narrow sources, stage them,
//! prepare the config, invoke the tool, and interpret the outcome.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::annotate;
use crate::depfile::write_depfile;
use crate::errors::LintError;
use crate::paths::SourceRoot;
use crate::report::{parse_issues, show_issues};
use crate::stale::{is_action_stale, narrow_sources, ChangeSet, Fingerprint};
use crate::staging::StagingLayout;
use crate::util::fs::touch;
use crate::util::{filter_lines, ExecRequest};

/// Reports smaller than this after a nonzero exit are tool breakage, not
/// findings.
const MIN_PLAUSIBLE_REPORT_BYTES: u64 = 10;

/// Everything one invocation needs, resolved from the command line. Paths are
/// kept absolute or cwd-relative here; relativization happens only when the
/// command is built.
#[derive(Debug, Clone)]
pub struct LintOptions {
    pub lint_path: PathBuf,
    pub product_dir: PathBuf,
    pub result_path: PathBuf,
    pub cache_dir: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub processed_config_path: Option<PathBuf>,
    pub manifest_path: Option<PathBuf>,
    pub jar_path: Option<PathBuf>,
    pub resource_dir: Option<PathBuf>,
    pub can_fail_build: bool,
    pub silent: bool,
}

/// Declared inputs of the action, for staleness checks and the depfile.
#[derive(Debug, Clone)]
pub struct ActionInputs {
    pub sources: Vec<PathBuf>,
    pub input_paths: Vec<PathBuf>,
    pub input_strings: Vec<String>,
    pub record_path: PathBuf,
    pub stamp_path: Option<PathBuf>,
    pub depfile_path: Option<PathBuf>,
}

/// Terminal state of one run that did not abort the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Input set already recorded and output present; the tool never ran.
    UpToDate,
    /// Tool exited zero with no findings.
    Clean,
    /// Findings were reported (non-strict mode only reaches here).
    IssuesFound(usize),
    /// Near-empty report after a nonzero exit, swallowed in non-strict mode.
    ToolMalfunction,
    /// Report was not well-formed, swallowed in non-strict mode.
    UnparseableReport,
}

/// Incremental wrapper: skip the tool entirely when the recorded fingerprint
/// still matches, otherwise run it and, on anything short of a strict-mode
/// failure, persist the new fingerprint and refresh stamp and depfile.
pub fn run_incremental(
    root: &SourceRoot,
    opts: &LintOptions,
    inputs: &ActionInputs,
) -> Result<RunOutcome, LintError> {
    let new = Fingerprint::of_inputs(&inputs.input_paths, &inputs.input_strings)?;
    let old = Fingerprint::load(&inputs.record_path);

    if !is_action_stale(&opts.result_path, old.as_ref(), &new) {
        debug!(record = %inputs.record_path.display(), "inputs unchanged; skipping lint");
        finish(inputs)?;
        return Ok(RunOutcome::UpToDate);
    }

    let changes = ChangeSet::classify(old.as_ref(), &new);
    let outcome = run_lint(root, opts, &inputs.sources, &changes)?;

    new.store(&inputs.record_path)?;
    finish(inputs)?;
    Ok(outcome)
}

fn finish(inputs: &ActionInputs) -> Result<(), LintError> {
    if let Some(depfile) = &inputs.depfile_path {
        let target = inputs
            .stamp_path
            .as_deref()
            .unwrap_or(inputs.record_path.as_path());
        write_depfile(depfile, target, &inputs.input_paths)?;
    }
    if let Some(stamp) = &inputs.stamp_path {
        touch(stamp)?;
    }
    Ok(())
}

/// One full pass of the state machine: Staging → ConfigPrep → Invoking →
/// terminal state.
pub fn run_lint(
    root: &SourceRoot,
    opts: &LintOptions,
    sources: &[PathBuf],
    changes: &ChangeSet,
) -> Result<RunOutcome, LintError> {
    let sources = narrow_sources(sources, changes, opts.resource_dir.is_some());
    debug!(count = sources.len(), "sources selected for this run");

    let staging = StagingLayout::stage(&sources)?;

    let product_dir_rel = root.relativize(&opts.product_dir)?;
    annotate::process_config(
        opts.config_path.as_deref(),
        opts.processed_config_path.as_deref(),
        &product_dir_rel,
    )?;

    let cmd = build_command(root, opts, staging.dirs())?;
    debug!(?cmd, "lint invocation");

    // Stale leftovers must never be mistaken for fresh output.
    if opts.result_path.exists() {
        fs::remove_file(&opts.result_path)?;
    }

    let mut request = ExecRequest::new(&cmd[0])
        .args(&cmd[1..])
        .cwd(root.path())
        .capture_output(true);
    if let Some(cache_dir) = &opts.cache_dir {
        // The JVM announces _JAVA_OPTIONS on stderr; that one line is noise.
        let rel = root.relativize(cache_dir)?;
        request = request.env("_JAVA_OPTIONS", format!("-Duser.home={rel}"));
    }
    let output = request.run()?;

    let stderr = if opts.cache_dir.is_some() {
        filter_lines(&output.stderr, |l| l.contains("_JAVA_OPTIONS"))
    } else {
        output.stderr.clone()
    };
    if !opts.silent && !stderr.trim().is_empty() {
        eprint!("{stderr}");
    }

    if output.status.success() {
        return Ok(RunOutcome::Clean);
    }

    let tool_error = format!("lint exited with {}", output.status);

    // Nonzero exit with no report at all means the tool could not run.
    if !opts.result_path.exists() {
        return Err(LintError::Usage {
            message: tool_error,
        });
    }

    let report_size = fs::metadata(&opts.result_path)?.len();
    if report_size < MIN_PLAUSIBLE_REPORT_BYTES {
        if opts.can_fail_build {
            return Err(LintError::ToolMalfunction {
                path: opts.result_path.clone(),
                tool_error,
            });
        }
        if !opts.silent {
            eprintln!(
                "lintwrap: {} is near-empty ({report_size} bytes); {tool_error}",
                opts.result_path.display()
            );
        }
        return Ok(RunOutcome::ToolMalfunction);
    }

    let content = fs::read_to_string(&opts.result_path)?;
    let issues = match parse_issues(&content) {
        Ok(issues) => issues,
        Err(e) => {
            if opts.can_fail_build {
                return Err(LintError::ReportParse {
                    path: opts.result_path.clone(),
                    message: e.to_string(),
                });
            }
            if !opts.silent {
                eprintln!("lintwrap: lint created an unparseable report ({e})");
                eprintln!("File contents:");
                eprintln!("{content}");
            }
            return Ok(RunOutcome::UnparseableReport);
        }
    };

    let num_issues = show_issues(&issues, opts.silent);
    annotate::process_result(&opts.result_path, &product_dir_rel)?;

    if !opts.silent {
        eprintln!("{}", remediation_message(root, opts, num_issues)?);
    }
    if opts.can_fail_build {
        return Err(LintError::Failed { issues: num_issues });
    }
    Ok(RunOutcome::IssuesFound(num_issues))
}

/// Invocation command in argument order: tool, fixed flags, optional
/// classpath/config/resources, one --sources per staging dir, manifest parent
/// dir positional. All paths relativized to the source root.
fn build_command(
    root: &SourceRoot,
    opts: &LintOptions,
    staging_dirs: &[PathBuf],
) -> Result<Vec<String>, LintError> {
    let mut cmd = vec![
        root.relativize(&opts.lint_path)?,
        "-Werror".to_string(),
        "--exitcode".to_string(),
        "--showall".to_string(),
        "--xml".to_string(),
        root.relativize(&opts.result_path)?,
    ];
    if let Some(jar) = &opts.jar_path {
        cmd.push("--classpath".to_string());
        cmd.push(root.relativize(jar)?);
    }
    if let Some(processed) = &opts.processed_config_path {
        cmd.push("--config".to_string());
        cmd.push(root.relativize(processed)?);
    }
    if let Some(resources) = &opts.resource_dir {
        cmd.push("--resources".to_string());
        cmd.push(root.relativize(resources)?);
    }
    for dir in staging_dirs {
        cmd.push("--sources".to_string());
        cmd.push(root.relativize(dir)?);
    }
    if let Some(manifest) = &opts.manifest_path {
        let parent = manifest.parent().unwrap_or(Path::new("."));
        cmd.push(root.relativize(parent)?);
    }
    Ok(cmd)
}

fn remediation_message(
    root: &SourceRoot,
    opts: &LintOptions,
    num_issues: usize,
) -> Result<String, LintError> {
    let result_rel = root.relativize(&opts.result_path)?;
    let mut msg = format!(
        "\nLint found {num_issues} new issues.\n - For full explanation refer to {result_rel}\n"
    );
    if let Some(config) = &opts.config_path {
        let config_rel = root.relativize(config)?;
        msg.push_str(&format!(
            " - To suppress these issues:\n    1. Read the comment in {config_rel}\n    2. Regenerate the suppressions from {result_rel}\n"
        ));
    }
    Ok(msg)
}
