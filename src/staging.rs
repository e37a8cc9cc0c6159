use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Temporary layout of source symlinks, partitioned so that no two files in
/// the same directory share a base name. The analysis tool indexes sources by
/// directory, so duplicate base names (Foo.java in two packages) would shadow
/// each other without this.
///
/// The whole tree lives under one `TempDir` and is removed on drop, on every
/// exit path.
#[derive(Debug)]
pub struct StagingLayout {
    root: TempDir,
    dirs: Vec<PathBuf>,
}

impl StagingLayout {
    /// Place every source with first-fit over the directories in creation
    /// order; open a new numbered directory when all existing ones already
    /// hold the base name. Each placement is a symlink to the absolute
    /// original, never a copy.
    pub fn stage(sources: &[PathBuf]) -> io::Result<Self> {
        let root = TempDir::new()?;
        let mut dirs: Vec<PathBuf> = Vec::new();

        for src in sources {
            let base = src.file_name().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("source path has no file name: {}", src.display()),
                )
            })?;

            let target_dir = match dirs.iter().find(|d| !d.join(base).exists()) {
                Some(d) => d.clone(),
                None => {
                    let d = root.path().join(dirs.len().to_string());
                    fs::create_dir(&d)?;
                    dirs.push(d.clone());
                    d
                }
            };

            let abs = if src.is_absolute() {
                src.clone()
            } else {
                std::env::current_dir()?.join(src)
            };
            symlink_file(&abs, &target_dir.join(base))?;
        }

        Ok(Self { root, dirs })
    }

    /// Staging directories in creation order; each becomes one `--sources`
    /// root on the tool command line.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }
}

#[cfg(unix)]
fn symlink_file(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn symlink_file(original: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(original, link)
}
