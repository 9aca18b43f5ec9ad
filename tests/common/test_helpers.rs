/// Common test helper functions

use std::fs;
use std::io;
use std::path::Path;

/// Number of entries directly inside `dir`.
pub fn entry_count(dir: &Path) -> io::Result<usize> {
    Ok(fs::read_dir(dir)?.count())
}

/// Whether anything exists at `path`, without following links.
pub fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Verify that a file still holds `len` copies of `fill`
pub fn verify_fill(path: &Path, len: usize, fill: u8) -> io::Result<bool> {
    let data = fs::read(path)?;
    Ok(data.len() == len && data.iter().all(|&b| b == fill))
}
