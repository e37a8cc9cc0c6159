//! Error taxonomy for one lint action.
//!
//! Exit-code mapping: io::ErrorKind::NotFound maps to 127 (tool not found);
//! everything else maps to 1. The exit code is the only machine-readable
//! success signal.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Terminal failure of one lint action. Callers branch on the variant
/// instead of re-inspecting the filesystem.
#[derive(Debug, Error)]
pub enum LintError {
    /// The tool itself could not run (nonzero exit with no report at all).
    /// Always fatal, regardless of strictness.
    #[error("lint could not be run: {message}")]
    Usage { message: String },

    /// The tool exited nonzero but left a near-empty report behind. Fatal
    /// only in strict-failure mode.
    #[error("lint produced a near-empty report at {}: {tool_error}", path.display())]
    ToolMalfunction { path: PathBuf, tool_error: String },

    /// The report exists but is not well-formed.
    #[error("unparseable lint report at {}: {message}", path.display())]
    ReportParse { path: PathBuf, message: String },

    /// Real findings, raised only in strict-failure mode.
    #[error("lint found {issues} new issues")]
    Failed { issues: usize },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Map an io::Error to a process exit code:
/// - 127 for NotFound (command not found)
/// - 1 for all other errors
pub fn exit_code_for_io_error(e: &io::Error) -> u8 {
    if e.kind() == io::ErrorKind::NotFound {
        127
    } else {
        1
    }
}

pub fn exit_code_for_error(e: &LintError) -> u8 {
    match e {
        LintError::Io(ioe) => exit_code_for_io_error(ioe),
        LintError::Other(err) => err
            .chain()
            .find_map(|cause| cause.downcast_ref::<io::Error>())
            .map(exit_code_for_io_error)
            .unwrap_or(1),
        _ => 1,
    }
}
