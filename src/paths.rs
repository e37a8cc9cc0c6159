use std::env;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Directory levels between the installed wrapper binary and the top-level
/// source root (<root>/build/android/lintwrap).
const ROOT_ASCENT_LEVELS: usize = 3;

/// Top-level source root against which every tool-facing path is relativized.
///
/// Computed once at startup and passed by reference into the runner so that
/// the invocation command and the stored report contain no machine-specific
/// absolute paths. No hidden globals; this is the only holder of the root.
#[derive(Debug, Clone)]
pub struct SourceRoot {
    root: PathBuf,
}

impl SourceRoot {
    /// Wrap an explicit root path (absolutized against the current directory).
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        Ok(Self {
            root: absolutize(&root.into())?,
        })
    }

    /// Derive the root from the wrapper executable's own location by ascending
    /// a fixed number of directory levels.
    pub fn from_executable() -> io::Result<Self> {
        let exe = env::current_exe()?;
        let mut root = exe
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| io::Error::other("executable path has no parent directory"))?;
        for _ in 0..ROOT_ASCENT_LEVELS {
            root = match root.parent() {
                Some(p) => p.to_path_buf(),
                None => break,
            };
        }
        Self::new(root)
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Render `path` relative to the root, as a string suitable for the tool
    /// command line and for report text. Deterministic for a given root; paths
    /// outside the root gain leading `..` components.
    pub fn relativize(&self, path: &Path) -> io::Result<String> {
        let abs = absolutize(path)?;
        Ok(relative_to(&self.root, &abs).display().to_string())
    }
}

/// Absolutize against the current directory and fold away `.`/`..` lexically
/// (no symlink resolution, so unbuilt output paths are fine).
fn absolutize(path: &Path) -> io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };
    let mut out = PathBuf::new();
    for comp in joined.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(comp.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    Ok(out)
}

/// Lexical relative path from `base` to `path`; both must be absolute and
/// already normalized.
fn relative_to(base: &Path, path: &Path) -> PathBuf {
    let mut base_iter = base.components();
    let mut path_iter = path.components();
    let mut rel = PathBuf::new();

    loop {
        match (base_iter.clone().next(), path_iter.clone().next()) {
            (Some(b), Some(p)) if b == p => {
                base_iter.next();
                path_iter.next();
            }
            (None, None) => {
                rel.push(".");
                return rel;
            }
            _ => break,
        }
    }

    for _ in base_iter {
        rel.push("..");
    }
    for comp in path_iter {
        rel.push(comp.as_os_str());
    }
    rel
}
