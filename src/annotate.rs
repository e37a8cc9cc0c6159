use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::stale::is_time_stale;

/// Token standing in for the absolute product/output directory in the
/// suppression config and in the stored report.
pub const PRODUCT_DIR_TOKEN: &str = "PRODUCT_DIR";

/// Literal textual substitution. Kept pure and separate so the round-trip
/// property (config → product dir → token restores the original) can be
/// tested directly.
pub fn substitute(content: &str, needle: &str, replacement: &str) -> String {
    content.replace(needle, replacement)
}

/// Pre-invocation pass: render the suppression config with the relativized
/// product dir in place of the token. Skipped when either path is absent or
/// the processed file is already fresh relative to the config.
pub fn process_config(
    config_path: Option<&Path>,
    processed_config_path: Option<&Path>,
    product_dir_rel: &str,
) -> Result<()> {
    let (config, processed) = match (config_path, processed_config_path) {
        (Some(c), Some(p)) => (c, p),
        _ => return Ok(()),
    };
    if !is_time_stale(processed, &[config])? {
        return Ok(());
    }

    let content = fs::read_to_string(config)
        .with_context(|| format!("failed to read config {}", config.display()))?;
    let rendered = substitute(&content, PRODUCT_DIR_TOKEN, product_dir_rel);
    fs::write(processed, rendered)
        .with_context(|| format!("failed to write processed config {}", processed.display()))?;
    Ok(())
}

/// Post-invocation pass: put the token back in place of the relativized
/// product dir so the stored report is identical across machines.
pub fn process_result(result_path: &Path, product_dir_rel: &str) -> Result<()> {
    let content = fs::read_to_string(result_path)
        .with_context(|| format!("failed to read report {}", result_path.display()))?;
    let normalized = substitute(&content, product_dir_rel, PRODUCT_DIR_TOKEN);
    fs::write(result_path, normalized)
        .with_context(|| format!("failed to rewrite report {}", result_path.display()))?;
    Ok(())
}
