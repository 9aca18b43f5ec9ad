// Platform side of obfuscation: attribute reset and timestamp writes.
// Neither follows symbolic links.

use crate::{ShredError, ShredResult};
use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;

/// Replace the entry's attributes with "not content indexed", so an indexing
/// service does not hold it open across the renames.
#[cfg(windows)]
pub(crate) fn mark_not_indexed(path: &Path, _metadata: &Metadata) -> ShredResult<()> {
    use std::io;
    use std::os::windows::ffi::OsStrExt;
    use winapi::um::fileapi::SetFileAttributesW;
    use winapi::um::winnt::FILE_ATTRIBUTE_NOT_CONTENT_INDEXED;

    let wide: Vec<u16> = path.as_os_str().encode_wide().chain(Some(0)).collect();
    let ok = unsafe { SetFileAttributesW(wide.as_ptr(), FILE_ATTRIBUTE_NOT_CONTENT_INDEXED) };
    if ok == 0 {
        return Err(ShredError::access_denied(path, io::Error::last_os_error()));
    }
    Ok(())
}

/// Unix has no indexing attribute; the equivalent reset is dropping the
/// read-only protection so the entry can be renamed and unlinked.
#[cfg(not(windows))]
pub(crate) fn mark_not_indexed(path: &Path, metadata: &Metadata) -> ShredResult<()> {
    crate::target::clear_read_only(path, metadata)
}

/// Set access and modification time (and creation time where settable).
#[cfg(unix)]
pub(crate) fn set_times(path: &Path, time: SystemTime) -> ShredResult<()> {
    use super::epoch::unix_parts;
    use nix::sys::stat::{utimensat, UtimensatFlags};
    use nix::sys::time::TimeSpec;
    use std::io;

    let (secs, nanos) = unix_parts(time);
    let stamp = TimeSpec::new(secs as _, nanos as _);

    utimensat(None, path, &stamp, &stamp, UtimensatFlags::NoFollowSymlink)
        .map_err(|errno| ShredError::io(path, io::Error::from(errno)))
}

#[cfg(windows)]
pub(crate) fn set_times(path: &Path, time: SystemTime) -> ShredResult<()> {
    use crate::IoResultExt;
    use std::fs::{FileTimes, OpenOptions};
    use std::os::windows::fs::{FileTimesExt, OpenOptionsExt};
    use winapi::um::winbase::{FILE_FLAG_BACKUP_SEMANTICS, FILE_FLAG_OPEN_REPARSE_POINT};
    use winapi::um::winnt::FILE_WRITE_ATTRIBUTES;

    // Backup semantics lets the same call open directories
    let file = OpenOptions::new()
        .access_mode(FILE_WRITE_ATTRIBUTES)
        .custom_flags(FILE_FLAG_BACKUP_SEMANTICS | FILE_FLAG_OPEN_REPARSE_POINT)
        .open(path)
        .at(path)?;

    let times = FileTimes::new()
        .set_accessed(time)
        .set_modified(time)
        .set_created(time);
    file.set_times(times).at(path)
}

#[cfg(not(any(unix, windows)))]
pub(crate) fn set_times(path: &Path, time: SystemTime) -> ShredResult<()> {
    use crate::IoResultExt;
    use std::fs::{FileTimes, OpenOptions};

    let file = OpenOptions::new().write(true).open(path).at(path)?;
    file.set_times(FileTimes::new().set_accessed(time).set_modified(time))
        .at(path)
}
