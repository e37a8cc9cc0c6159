use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Write a Makefile-syntax depfile (`target: input input ...`) listing the
/// full declared input set, so downstream incremental builds recompute when
/// any of them changes. Spaces in paths are escaped the way ninja expects.
pub fn write_depfile(depfile: &Path, target: &Path, inputs: &[PathBuf]) -> io::Result<()> {
    let mut line = String::new();
    line.push_str(&escape(&target.display().to_string()));
    line.push(':');
    for input in inputs {
        line.push(' ');
        line.push_str(&escape(&input.display().to_string()));
    }
    line.push('\n');
    fs::write(depfile, line)
}

fn escape(path: &str) -> String {
    path.replace(' ', "\\ ")
}
