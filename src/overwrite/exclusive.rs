use crate::{ShredError, ShredResult};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// A file opened for writing that no one else may write while it is held.
///
/// Unix takes a non-blocking exclusive `flock`; Windows opens with share mode 0.
/// The lock and the handle go away together when the guard is dropped, on
/// every exit path.
pub struct ExclusiveFile {
    file: File,
    path: PathBuf,
}

impl ExclusiveFile {
    pub fn open(path: &Path) -> ShredResult<Self> {
        let mut options = OpenOptions::new();
        options.write(true);

        #[cfg(windows)]
        {
            use std::os::windows::fs::OpenOptionsExt;
            options.share_mode(0);
        }

        let file = options.open(path).map_err(|e| Self::open_error(path, e))?;

        #[cfg(unix)]
        {
            use nix::fcntl::{flock, FlockArg};
            use std::os::unix::io::AsRawFd;

            flock(file.as_raw_fd(), FlockArg::LockExclusiveNonblock)
                .map_err(|errno| ShredError::access_denied(path, io::Error::from(errno)))?;
        }

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Refusals to grant write access are access errors, everything else is I/O.
    fn open_error(path: &Path, error: io::Error) -> ShredError {
        if error.kind() == io::ErrorKind::PermissionDenied {
            return ShredError::access_denied(path, error);
        }

        #[cfg(windows)]
        {
            use winapi::shared::winerror::{ERROR_LOCK_VIOLATION, ERROR_SHARING_VIOLATION};
            let code = error.raw_os_error();
            if code == Some(ERROR_SHARING_VIOLATION as i32)
                || code == Some(ERROR_LOCK_VIOLATION as i32)
            {
                return ShredError::access_denied(path, error);
            }
        }

        ShredError::io(path, error)
    }
}

impl Drop for ExclusiveFile {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            use nix::fcntl::{flock, FlockArg};
            use std::os::unix::io::AsRawFd;

            if let Err(errno) = flock(self.file.as_raw_fd(), FlockArg::Unlock) {
                tracing::debug!(
                    path = %self.path.display(),
                    %errno,
                    "Unlock failed, closing anyway"
                );
            }
        }
    }
}
