use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Ensure a file exists by creating parent directories as needed.
pub fn ensure_file_exists(p: &Path) -> io::Result<()> {
    if !p.exists() {
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent)?;
        }
        File::create(p)?;
    }
    Ok(())
}

/// Create the file if missing and bump its mtime to now (build stamp).
pub fn touch(p: &Path) -> io::Result<()> {
    ensure_file_exists(p)?;
    let f = OpenOptions::new().write(true).open(p)?;
    f.set_modified(SystemTime::now())
}
