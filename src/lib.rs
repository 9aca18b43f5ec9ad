// Medium-aware secure deletion.
//
// Layout:
// - medium/: storage medium classification (trait, fixed and system classifiers)
// - policy.rs: PolicyDecision table (medium -> wipe or plain remove)
// - overwrite/: chunked pseudorandom overwrite with exclusive access
// - eraser.rs: Eraser seam over overwrite + obfuscate, RandomEraser
// - obfuscate/: timestamp epochs, attribute reset, random renames
// - target.rs: file-system entry under operation
// - shred_orchestrator.rs: Shredder, the traversal driver tying it together

// Allow uppercase acronyms for file system names like NTFS, FAT32
#![allow(clippy::upper_case_acronyms)]

pub mod eraser;
pub mod medium;
pub mod obfuscate;
pub mod overwrite;
pub mod policy;
pub mod shred_orchestrator;
pub mod target;

// Re-export the main entry points for convenience
pub use eraser::{Eraser, RandomEraser};
pub use medium::{
    FilesystemKind, FixedClassifier, MediumClassification, MediumClassifier, MediumType,
    SystemClassifier,
};
pub use obfuscate::Obfuscation;
pub use policy::{decide, PolicyDecision};
pub use shred_orchestrator::Shredder;
pub use target::{Target, TargetKind};

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Largest chunk written by a single overwrite step (64 MiB).
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Rename rounds applied to a file before it is unlinked.
pub const DEFAULT_FILE_ROUNDS: u32 = 8;

/// Rename rounds applied to a directory before it is removed.
pub const DEFAULT_DIRECTORY_ROUNDS: u32 = 1;

#[derive(Error, Debug)]
pub enum ShredError {
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage medium detection failed: {0}")]
    DetectionFailed(String),

    #[error("Access denied on {}: {source}", path.display())]
    AccessDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O failure on {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ShredError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ShredError::IoFailure {
            path: path.into(),
            source,
        }
    }

    pub fn access_denied(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ShredError::AccessDenied {
            path: path.into(),
            source,
        }
    }
}

pub type ShredResult<T> = Result<T, ShredError>;

/// Attaches the offending path to a raw I/O error.
pub(crate) trait IoResultExt<T> {
    fn at(self, path: &Path) -> ShredResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, path: &Path) -> ShredResult<T> {
        self.map_err(|e| ShredError::io(path, e))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShredConfig {
    /// Upper bound for one overwrite chunk, in bytes.
    pub max_chunk_size: usize,
    pub file_rounds: u32,
    pub directory_rounds: u32,
    /// Truncate wiped files to a random decoy length in [0, 1024) instead of zero.
    pub randomize_final_size: bool,
}

impl Default for ShredConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            file_rounds: DEFAULT_FILE_ROUNDS,
            directory_rounds: DEFAULT_DIRECTORY_ROUNDS,
            randomize_final_size: false,
        }
    }
}

impl ShredConfig {
    /// Reject settings that would let a wipe skip its overwrite or rename cycle.
    pub fn validate(&self) -> ShredResult<()> {
        if self.max_chunk_size == 0 {
            return Err(ShredError::InvalidArgument(
                "max_chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.file_rounds == 0 || self.directory_rounds == 0 {
            return Err(ShredError::InvalidArgument(
                "obfuscation rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// What a single deletion call did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShredReport {
    pub files_wiped: u64,
    pub files_removed: u64,
    pub links_removed: u64,
    /// FIFOs, sockets and device nodes.
    pub specials_removed: u64,
    pub directories_removed: u64,
    pub bytes_overwritten: u64,
}

impl ShredReport {
    pub fn merge(&mut self, other: &ShredReport) {
        self.files_wiped += other.files_wiped;
        self.files_removed += other.files_removed;
        self.links_removed += other.links_removed;
        self.specials_removed += other.specials_removed;
        self.directories_removed += other.directories_removed;
        self.bytes_overwritten += other.bytes_overwritten;
    }

    pub fn entries(&self) -> u64 {
        self.files_wiped
            + self.files_removed
            + self.links_removed
            + self.specials_removed
            + self.directories_removed
    }
}

/// Securely delete a file, choosing the strategy from the detected medium.
pub fn delete_file(path: &str) -> ShredResult<ShredReport> {
    Shredder::new(SystemClassifier, ShredConfig::default())?.delete_file_at(path)
}

/// Securely delete a file, always overwriting and obfuscating it.
pub fn delete_file_without_detection(path: &str) -> ShredResult<ShredReport> {
    Shredder::new(SystemClassifier, ShredConfig::default())?.delete_file_without_detection_at(path)
}

/// Securely delete a directory, choosing the strategy per volume.
pub fn delete_directory(path: &str, recursive: bool) -> ShredResult<ShredReport> {
    Shredder::new(SystemClassifier, ShredConfig::default())?.delete_directory_at(path, recursive)
}

/// Securely delete a directory, always overwriting and obfuscating its files.
pub fn delete_directory_without_detection(path: &str, recursive: bool) -> ShredResult<ShredReport> {
    Shredder::new(SystemClassifier, ShredConfig::default())?
        .delete_directory_without_detection_at(path, recursive)
}
