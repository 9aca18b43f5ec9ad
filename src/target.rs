use crate::{IoResultExt, ShredError, ShredResult};
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

/// What kind of entry a target currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Directory,
    /// Symbolic link or reparse point. Never followed.
    Link,
    /// FIFO, socket or device node.
    Special,
}

impl TargetKind {
    pub fn of(metadata: &Metadata) -> Self {
        if is_link(metadata) {
            TargetKind::Link
        } else if metadata.is_dir() {
            TargetKind::Directory
        } else if metadata.is_file() {
            TargetKind::File
        } else {
            TargetKind::Special
        }
    }
}

/// A file-system entry under operation.
///
/// Holds only the path; existence and kind are probed on demand and never
/// cached, so a target stays valid across the rename steps of a wipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    path: PathBuf,
}

impl Target {
    /// Handle form: no validation, a missing entry is simply absent.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// String-path form for files: rejects empty and missing paths.
    pub fn existing_file(path: &str) -> ShredResult<Self> {
        let target = Self::validated(path, "file")?;
        match target.metadata()? {
            Some(meta) if TargetKind::of(&meta) != TargetKind::Directory => Ok(target),
            _ => Err(ShredError::NotFound(target.path)),
        }
    }

    /// String-path form for directories: rejects empty and missing paths.
    /// A link counts if it resolves to a directory.
    pub fn existing_directory(path: &str) -> ShredResult<Self> {
        let target = Self::validated(path, "directory")?;
        let is_dir = fs::metadata(&target.path).map(|m| m.is_dir()).unwrap_or(false);
        if is_dir {
            Ok(target)
        } else {
            Err(ShredError::NotFound(target.path))
        }
    }

    fn validated(path: &str, what: &str) -> ShredResult<Self> {
        if path.is_empty() {
            return Err(ShredError::InvalidArgument(format!("{} path can not be empty", what)));
        }
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Metadata of the entry itself (links are not followed), or `None` if
    /// nothing exists at the path right now.
    pub fn metadata(&self) -> ShredResult<Option<Metadata>> {
        probe(&self.path)
    }

    pub fn exists(&self) -> ShredResult<bool> {
        Ok(self.metadata()?.is_some())
    }

    pub fn kind(&self) -> ShredResult<Option<TargetKind>> {
        Ok(self.metadata()?.as_ref().map(TargetKind::of))
    }

    pub fn is_read_only(&self) -> ShredResult<bool> {
        Ok(self.metadata()?.map(|m| is_read_only(&m)).unwrap_or(false))
    }
}

impl From<&Path> for Target {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for Target {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

pub(crate) fn probe(path: &Path) -> ShredResult<Option<Metadata>> {
    match fs::symlink_metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ShredError::io(path, e)),
    }
}

/// Identifier of the volume holding an entry, where the platform exposes one.
pub(crate) fn volume_id(metadata: &Metadata) -> Option<u64> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        Some(metadata.dev())
    }
    #[cfg(not(unix))]
    {
        let _ = metadata;
        None
    }
}

fn is_link(metadata: &Metadata) -> bool {
    if metadata.file_type().is_symlink() {
        return true;
    }
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        use winapi::um::winnt::FILE_ATTRIBUTE_REPARSE_POINT;
        metadata.file_attributes() & FILE_ATTRIBUTE_REPARSE_POINT != 0
    }
    #[cfg(not(windows))]
    {
        false
    }
}

fn is_read_only(metadata: &Metadata) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o200 == 0
    }
    #[cfg(not(unix))]
    {
        metadata.permissions().readonly()
    }
}

/// Make the entry writable by its owner. Links are left alone: changing
/// their permissions would change the target's.
pub(crate) fn clear_read_only(path: &Path, metadata: &Metadata) -> ShredResult<()> {
    if is_link(metadata) || !is_read_only(metadata) {
        return Ok(());
    }

    let mut permissions = metadata.permissions();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        permissions.set_mode(permissions.mode() | 0o200);
    }
    #[cfg(not(unix))]
    {
        permissions.set_readonly(false);
    }

    tracing::debug!(path = %path.display(), "Clearing read-only flag");
    fs::set_permissions(path, permissions).map_err(|e| ShredError::access_denied(path, e))
}

/// Unlink a link entry. Windows directory links and junctions are removed
/// as directories, which does not touch their contents.
pub(crate) fn remove_link(path: &Path, metadata: &Metadata) -> ShredResult<()> {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        use winapi::um::winnt::FILE_ATTRIBUTE_DIRECTORY;
        if metadata.file_attributes() & FILE_ATTRIBUTE_DIRECTORY != 0 {
            return fs::remove_dir(path).at(path);
        }
    }
    #[cfg(not(windows))]
    let _ = metadata;

    fs::remove_file(path).at(path)
}
