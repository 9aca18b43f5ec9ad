// Storage medium classification
//
// - mod.rs: classification value types and the MediumClassifier seam
// - detection.rs: SystemClassifier (Linux mount table + sysfs)

pub mod detection;


pub use detection::SystemClassifier;

use crate::ShredResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Physical or logical storage class of a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediumType {
    Rotational,
    SolidState,
    Network,
    Unknown,
}

impl fmt::Display for MediumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediumType::Rotational => write!(f, "Rotational"),
            MediumType::SolidState => write!(f, "SolidState"),
            MediumType::Network => write!(f, "Network"),
            MediumType::Unknown => write!(f, "Unknown"),
        }
    }
}

/// File system family, as far as timestamp epochs are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilesystemKind {
    NTFS,
    FAT32,
    Other,
}

impl FilesystemKind {
    /// Map a file system type name (`ntfs3`, `vfat`, `NTFS`, ...) to its kind.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "ntfs" | "ntfs3" | "ntfs-3g" | "fuse.ntfs-3g" => FilesystemKind::NTFS,
            "vfat" | "msdos" | "fat" | "fat32" => FilesystemKind::FAT32,
            _ => FilesystemKind::Other,
        }
    }
}

impl fmt::Display for FilesystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilesystemKind::NTFS => write!(f, "NTFS"),
            FilesystemKind::FAT32 => write!(f, "FAT32"),
            FilesystemKind::Other => write!(f, "Other"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediumClassification {
    pub medium: MediumType,
    pub filesystem: FilesystemKind,
}

impl MediumClassification {
    pub fn new(medium: MediumType, filesystem: FilesystemKind) -> Self {
        Self { medium, filesystem }
    }
}

/// Reports which kind of medium backs the volume holding `path`.
///
/// Implementations must not guess: a volume that cannot be classified is a
/// `ShredError::DetectionFailed`.
#[cfg_attr(test, mockall::automock)]
pub trait MediumClassifier {
    fn classify(&self, path: &Path) -> ShredResult<MediumClassification>;
}

/// Classifier for callers that already know the medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClassifier(pub MediumClassification);

impl FixedClassifier {
    pub fn new(medium: MediumType, filesystem: FilesystemKind) -> Self {
        Self(MediumClassification::new(medium, filesystem))
    }
}

impl MediumClassifier for FixedClassifier {
    fn classify(&self, _path: &Path) -> ShredResult<MediumClassification> {
        Ok(self.0)
    }
}

impl<C: MediumClassifier + ?Sized> MediumClassifier for &C {
    fn classify(&self, path: &Path) -> ShredResult<MediumClassification> {
        (**self).classify(path)
    }
}
