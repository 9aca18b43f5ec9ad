// Overwrite engine
//
// Streams pseudorandom bytes over a file's current length in bounded chunks,
// syncing after every chunk, then truncates it. The file is held through an
// ExclusiveFile guard for the whole pass.

pub mod exclusive;


pub use exclusive::ExclusiveFile;

use crate::target::probe;
use crate::{IoResultExt, ShredError, ShredResult};
use rand::{Rng, RngCore};
use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

/// Exclusive upper bound of the decoy length left behind by a randomized truncate.
pub const MAX_DECOY_SIZE: u64 = 1024;

/// Overwrite every byte of the file at `path`, then truncate it.
///
/// Returns the number of bytes overwritten. A missing file is a no-op.
pub fn overwrite<R: RngCore>(
    path: &Path,
    rng: &mut R,
    max_chunk_size: usize,
    randomize_final_size: bool,
) -> ShredResult<u64> {
    let metadata = match probe(path)? {
        Some(metadata) => metadata,
        None => return Ok(0),
    };
    if !metadata.is_file() {
        return Err(ShredError::InvalidArgument(format!(
            "{} is not a regular file",
            path.display()
        )));
    }
    if max_chunk_size == 0 {
        return Err(ShredError::InvalidArgument(
            "max_chunk_size must be greater than zero".to_string(),
        ));
    }

    let mut guard = ExclusiveFile::open(path)?;
    let file = guard.file_mut();

    let length = file.metadata().at(path)?.len();
    let written = overwrite_content(file, length, rng, max_chunk_size).at(path)?;

    let final_size = if randomize_final_size {
        rng.gen_range(0..MAX_DECOY_SIZE)
    } else {
        0
    };
    file.set_len(final_size).at(path)?;
    file.sync_all().at(path)?;

    tracing::debug!(
        path = %path.display(),
        bytes = written,
        final_size,
        "Overwrote file content"
    );

    Ok(written)
}

/// Write `length` random bytes from the start of `file` in chunks of at most
/// `max_chunk_size`, forcing each chunk to stable storage before the next.
pub(crate) fn overwrite_content<R: RngCore>(
    file: &mut File,
    length: u64,
    rng: &mut R,
    max_chunk_size: usize,
) -> io::Result<u64> {
    file.seek(SeekFrom::Start(0))?;

    let buffer_size = length.min(max_chunk_size as u64) as usize;
    let mut buffer = vec![0u8; buffer_size];
    let mut remaining = length;

    while remaining > 0 {
        let chunk = remaining.min(buffer_size as u64) as usize;
        let slice = &mut buffer[..chunk];
        rng.fill_bytes(slice);

        file.write_all(slice)?;
        file.sync_all()?;

        remaining -= chunk as u64;
        tracing::trace!(chunk, remaining, "Chunk written");
    }

    Ok(length)
}
