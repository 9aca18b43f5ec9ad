use crate::obfuscate::{self, Obfuscation};
use crate::overwrite;
use crate::{FilesystemKind, ShredResult, DEFAULT_MAX_CHUNK_SIZE};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use std::path::Path;

/// The destructive steps of a wipe, separated from the traversal so they can
/// be swapped or instrumented.
pub trait Eraser {
    /// Overwrite the file's content and truncate it. Returns bytes overwritten.
    fn overwrite(&mut self, path: &Path, randomize_final_size: bool) -> ShredResult<u64>;

    /// Reset timestamps and rename the entry `rounds` times.
    fn obfuscate(
        &mut self,
        path: &Path,
        filesystem: FilesystemKind,
        rounds: u32,
    ) -> ShredResult<Obfuscation>;
}

/// Eraser backed by an injected, non-cryptographic random source.
#[derive(Debug, Clone)]
pub struct RandomEraser<R: RngCore> {
    rng: R,
    max_chunk_size: usize,
}

impl<R: RngCore> RandomEraser<R> {
    pub fn new(rng: R, max_chunk_size: usize) -> Self {
        Self {
            rng,
            max_chunk_size,
        }
    }

    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }
}

impl RandomEraser<SmallRng> {
    /// Fast generator seeded from the operating system.
    pub fn from_entropy(max_chunk_size: usize) -> Self {
        Self::new(SmallRng::from_entropy(), max_chunk_size)
    }
}

impl Default for RandomEraser<SmallRng> {
    fn default() -> Self {
        Self::from_entropy(DEFAULT_MAX_CHUNK_SIZE)
    }
}

impl<R: RngCore> Eraser for RandomEraser<R> {
    fn overwrite(&mut self, path: &Path, randomize_final_size: bool) -> ShredResult<u64> {
        overwrite::overwrite(
            path,
            &mut self.rng,
            self.max_chunk_size,
            randomize_final_size,
        )
    }

    fn obfuscate(
        &mut self,
        path: &Path,
        filesystem: FilesystemKind,
        rounds: u32,
    ) -> ShredResult<Obfuscation> {
        obfuscate::obfuscate(path, filesystem, rounds, &mut self.rng)
    }
}

impl<E: Eraser + ?Sized> Eraser for &mut E {
    fn overwrite(&mut self, path: &Path, randomize_final_size: bool) -> ShredResult<u64> {
        (**self).overwrite(path, randomize_final_size)
    }

    fn obfuscate(
        &mut self,
        path: &Path,
        filesystem: FilesystemKind,
        rounds: u32,
    ) -> ShredResult<Obfuscation> {
        (**self).obfuscate(path, filesystem, rounds)
    }
}
