use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Recorded state of one action's declared inputs: content digest per file
/// plus the extra string-valued dependencies (e.g. the processed-config path).
/// Persisted as JSON next to the stamp file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    files: BTreeMap<String, String>,
    strings: Vec<String>,
}

impl Fingerprint {
    /// Hash every declared input. Missing inputs are an error: the input set
    /// invariant requires all of them to exist at invocation time.
    pub fn of_inputs(paths: &[PathBuf], strings: &[String]) -> Result<Self> {
        let mut files = BTreeMap::new();
        for path in paths {
            let bytes = fs::read(path)
                .with_context(|| format!("failed to read declared input {}", path.display()))?;
            let mut hasher = Sha256::new();
            hasher.update(&bytes);
            files.insert(
                path.display().to_string(),
                format!("{:x}", hasher.finalize()),
            );
        }
        Ok(Self {
            files,
            strings: strings.to_vec(),
        })
    }

    /// Load a previously recorded fingerprint. Any read or decode failure
    /// means "no prior state" and forces a full rerun.
    pub fn load(record_path: &Path) -> Option<Self> {
        let data = fs::read_to_string(record_path).ok()?;
        serde_json::from_str(&data).ok()
    }

    pub fn store(&self, record_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to encode fingerprint")?;
        fs::write(record_path, json)
            .with_context(|| format!("failed to write fingerprint {}", record_path.display()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
    Unmodified,
}

/// Classification of every input path against the prior fingerprint.
#[derive(Debug, Clone)]
pub struct ChangeSet {
    states: BTreeMap<String, ChangeKind>,
}

impl ChangeSet {
    /// Compare the prior record (if any) against the freshly computed one.
    /// With no prior record every path counts as added.
    pub fn classify(old: Option<&Fingerprint>, new: &Fingerprint) -> Self {
        let empty = BTreeMap::new();
        let old_files = old.map(|f| &f.files).unwrap_or(&empty);
        let mut states = BTreeMap::new();
        for (path, digest) in &new.files {
            let kind = match old_files.get(path) {
                None => ChangeKind::Added,
                Some(prev) if prev != digest => ChangeKind::Modified,
                Some(_) => ChangeKind::Unmodified,
            };
            states.insert(path.clone(), kind);
        }
        for path in old_files.keys() {
            if !new.files.contains_key(path) {
                states.insert(path.clone(), ChangeKind::Removed);
            }
        }
        Self { states }
    }

    /// True when nothing was removed, i.e. every change is an addition or a
    /// modification. Only then is narrowing the source list safe.
    pub fn added_or_modified_only(&self) -> bool {
        self.states.values().all(|k| *k != ChangeKind::Removed)
    }

    pub fn is_changed(&self, path: &Path) -> bool {
        matches!(
            self.states.get(&path.display().to_string()),
            Some(ChangeKind::Added) | Some(ChangeKind::Modified)
        )
    }
}

/// Timestamp staleness: true if the output is missing or older than any
/// input. Used by the config pre-pass, where a content hash would be
/// overkill.
pub fn is_time_stale(output: &Path, inputs: &[&Path]) -> io::Result<bool> {
    let out_meta = match fs::metadata(output) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(e),
    };
    let out_mtime = out_meta.modified()?;
    for input in inputs {
        if fs::metadata(input)?.modified()? > out_mtime {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Action-level staleness: rerun when the output is gone, there is no prior
/// record, or the recorded fingerprint no longer matches.
pub fn is_action_stale(output: &Path, old: Option<&Fingerprint>, new: &Fingerprint) -> bool {
    if !output.exists() {
        return true;
    }
    match old {
        None => true,
        Some(prev) => prev != new,
    }
}

/// Decide which sources to pass to the tool. With a resource dir the full
/// list must always go through (a narrowed list would mis-flag resources as
/// unused). Without one, a change set of additions/modifications only lets
/// the incremental mode see just the changed subset.
pub fn narrow_sources(
    sources: &[PathBuf],
    changes: &ChangeSet,
    has_resource_dir: bool,
) -> Vec<PathBuf> {
    if has_resource_dir || !changes.added_or_modified_only() {
        return sources.to_vec();
    }
    sources
        .iter()
        .filter(|s| changes.is_changed(s))
        .cloned()
        .collect()
}
