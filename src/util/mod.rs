//! Small utilities: structured process execution and filesystem helpers.

pub mod exec;
pub mod fs;

pub use exec::{ExecOutput, ExecRequest};

/// Drop every line for which `discard` returns true, preserving the order of
/// the rest. Used to strip known informational noise from captured stderr.
pub fn filter_lines<F>(text: &str, discard: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        if !discard(line) {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
