/// Temporary directory trees for deletion tests

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A tree of files under a fresh temporary directory.
///
/// The tree root is a child of the temporary directory, so tests can check
/// that nothing is left next to it after deletion.
pub struct TestTree {
    dir: TempDir,
    root: PathBuf,
}

impl TestTree {
    pub fn new(name: &str) -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let root = dir.path().join(name);
        fs::create_dir(&root)?;
        Ok(Self { dir, root })
    }

    /// Add a file of `len` bytes filled with `fill`, creating parent directories.
    pub fn file(self, relative: &str, len: usize, fill: u8) -> io::Result<Self> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, vec![fill; len])?;
        Ok(self)
    }

    pub fn subdir(self, relative: &str) -> io::Result<Self> {
        fs::create_dir_all(self.root.join(relative))?;
        Ok(self)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn root_str(&self) -> &str {
        self.root.to_str().unwrap_or_default()
    }

    /// The temporary directory holding the tree root.
    pub fn parent(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}
