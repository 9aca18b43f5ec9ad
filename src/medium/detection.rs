use super::{FilesystemKind, MediumClassification, MediumClassifier, MediumType};
use crate::{ShredError, ShredResult};
use std::path::{Path, PathBuf};

/// File system types served over the network. Overwriting these only
/// rewrites a remote copy we have no control over.
const NETWORK_FS_TYPES: &[&str] = &[
    "nfs",
    "nfs4",
    "cifs",
    "smb3",
    "smbfs",
    "9p",
    "ceph",
    "glusterfs",
    "afs",
    "ncpfs",
    "davfs",
    "fuse.sshfs",
    "fuse.rclone",
    "fuse.s3fs",
];

/// Classifies volumes from the live system state.
///
/// On Linux the mount table gives the file system type and device number,
/// and sysfs reports whether the backing block device rotates. Every call
/// re-reads both; nothing is cached.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClassifier;

impl MediumClassifier for SystemClassifier {
    #[cfg(target_os = "linux")]
    fn classify(&self, path: &Path) -> ShredResult<MediumClassification> {
        let resolved = Self::resolve_anchor(path)?;

        let mounts = procfs::process::Process::myself()
            .and_then(|process| process.mountinfo())
            .map_err(|e| ShredError::DetectionFailed(format!("cannot read mount table: {}", e)))?;

        let mounts: Vec<MountEntry> = mounts
            .into_iter()
            .map(|m| MountEntry {
                mount_point: m.mount_point,
                fs_type: m.fs_type,
                majmin: m.majmin,
            })
            .collect();

        let mount = find_mount(&mounts, &resolved).ok_or_else(|| {
            ShredError::DetectionFailed(format!("no mount found for {}", resolved.display()))
        })?;

        let filesystem = FilesystemKind::from_name(&mount.fs_type);
        let medium = if is_network_fs(&mount.fs_type) {
            MediumType::Network
        } else {
            Self::block_device_medium(&mount.majmin)
        };

        tracing::debug!(
            path = %resolved.display(),
            mount = %mount.mount_point.display(),
            fs_type = %mount.fs_type,
            %medium,
            "Classified volume"
        );

        Ok(MediumClassification::new(medium, filesystem))
    }

    #[cfg(not(target_os = "linux"))]
    fn classify(&self, path: &Path) -> ShredResult<MediumClassification> {
        Err(ShredError::DetectionFailed(format!(
            "medium detection is not supported on this platform ({})",
            path.display()
        )))
    }
}

#[cfg(target_os = "linux")]
impl SystemClassifier {
    /// The entry whose volume matters. A link lives on its parent's volume,
    /// wherever it points.
    fn resolve_anchor(path: &Path) -> ShredResult<PathBuf> {
        let is_link = std::fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false);

        let anchor = if is_link {
            match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            }
        } else {
            path
        };

        anchor.canonicalize().map_err(|e| {
            ShredError::DetectionFailed(format!("cannot resolve {}: {}", anchor.display(), e))
        })
    }

    /// Read the rotational flag of the block device behind `majmin`.
    /// Partitions carry no queue directory, so fall back to the parent disk.
    fn block_device_medium(majmin: &str) -> MediumType {
        let device = PathBuf::from(format!("/sys/dev/block/{}", majmin));
        let device = match std::fs::canonicalize(&device) {
            Ok(real) => real,
            // Anonymous devices (tmpfs, overlay, btrfs subvolumes) have no block node
            Err(_) => return MediumType::Unknown,
        };

        let candidates = [
            Some(device.join("queue/rotational")),
            device.parent().map(|p| p.join("queue/rotational")),
        ];

        candidates
            .iter()
            .flatten()
            .find_map(|flag| std::fs::read_to_string(flag).ok())
            .map(|contents| parse_rotational(&contents))
            .unwrap_or(MediumType::Unknown)
    }
}

/// One line of the mount table, reduced to what classification needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MountEntry {
    pub mount_point: PathBuf,
    pub fs_type: String,
    pub majmin: String,
}

/// Longest mount point that is a prefix of `path`. Later entries win ties,
/// matching the kernel's view of stacked mounts.
pub(crate) fn find_mount<'a>(mounts: &'a [MountEntry], path: &Path) -> Option<&'a MountEntry> {
    mounts
        .iter()
        .filter(|m| path.starts_with(&m.mount_point))
        .fold(None, |best: Option<&MountEntry>, candidate| match best {
            Some(current)
                if current.mount_point.components().count()
                    > candidate.mount_point.components().count() =>
            {
                Some(current)
            }
            _ => Some(candidate),
        })
}

pub(crate) fn is_network_fs(fs_type: &str) -> bool {
    let fs_type = fs_type.trim().to_ascii_lowercase();
    NETWORK_FS_TYPES.contains(&fs_type.as_str())
}

pub(crate) fn parse_rotational(contents: &str) -> MediumType {
    match contents.trim() {
        "1" => MediumType::Rotational,
        "0" => MediumType::SolidState,
        _ => MediumType::Unknown,
    }
}
