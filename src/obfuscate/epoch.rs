use crate::FilesystemKind;
use chrono::{DateTime, Local, TimeZone, Utc};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Seconds between 1601-01-01 (NTFS epoch) and 1970-01-01.
const NTFS_EPOCH_OFFSET_SECS: u64 = 11_644_473_600;

/// Smallest NTFS time step.
const NTFS_TICK: Duration = Duration::from_nanos(100);

/// 1980-01-01T00:00:00Z, the FAT epoch when the local zone cannot express it.
const FAT_EPOCH_UTC_SECS: u64 = 315_532_800;

impl FilesystemKind {
    /// Sentinel timestamp wiped entries are reset to: the earliest time the
    /// file system can store, so the value carries no information.
    pub fn obfuscation_epoch(self) -> SystemTime {
        match self {
            FilesystemKind::NTFS => ntfs_epoch(),
            FilesystemKind::FAT32 | FilesystemKind::Other => fat_epoch(),
        }
    }

    pub fn obfuscation_epoch_utc(self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.obfuscation_epoch())
    }
}

fn ntfs_epoch() -> SystemTime {
    UNIX_EPOCH
        .checked_sub(Duration::from_secs(NTFS_EPOCH_OFFSET_SECS) - NTFS_TICK)
        .unwrap_or(UNIX_EPOCH)
}

/// FAT stores local wall-clock time.
fn fat_epoch() -> SystemTime {
    Local
        .with_ymd_and_hms(1980, 1, 1, 0, 0, 0)
        .earliest()
        .map(SystemTime::from)
        .unwrap_or(UNIX_EPOCH + Duration::from_secs(FAT_EPOCH_UTC_SECS))
}

/// Split a time into signed seconds and nanoseconds relative to the Unix epoch,
/// the shape `timespec` wants (nanoseconds always non-negative).
#[cfg(unix)]
pub(crate) fn unix_parts(time: SystemTime) -> (i64, i64) {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => (after.as_secs() as i64, i64::from(after.subsec_nanos())),
        Err(err) => {
            let before = err.duration();
            let mut secs = -(before.as_secs() as i64);
            let mut nanos = i64::from(before.subsec_nanos());
            if nanos > 0 {
                secs -= 1;
                nanos = 1_000_000_000 - nanos;
            }
            (secs, nanos)
        }
    }
}
