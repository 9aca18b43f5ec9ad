// Name and timestamp obfuscation
//
// An entry about to be unlinked is stripped of its identity first: its
// timestamps are reset to a per-file-system epoch and it is renamed in
// place, one or more times, to freshly generated names.

mod attributes;
pub mod epoch;

#[cfg(test)]
mod tests;

use crate::target::probe;
use crate::{FilesystemKind, IoResultExt, ShredError, ShredResult};
use rand::{Rng, RngCore};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Characters of generated names (8.3 shaped, lowercase alphanumerics).
const NAME_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const NAME_STEM_LEN: usize = 8;
const NAME_EXT_LEN: usize = 3;

/// Give up finding an unused name after this many collisions.
const MAX_NAME_ATTEMPTS: usize = 64;

/// Outcome of one obfuscation sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Obfuscation {
    /// Where the entry lives now.
    pub final_path: PathBuf,
    /// Every path the entry was renamed to, in order.
    pub trail: Vec<PathBuf>,
}

impl Obfuscation {
    fn untouched(path: &Path) -> Self {
        Self {
            final_path: path.to_path_buf(),
            trail: Vec::new(),
        }
    }

    pub fn rounds(&self) -> usize {
        self.trail.len()
    }
}

/// Reset creation, last-write and last-access times to the epoch of `filesystem`.
pub fn obfuscate_times(path: &Path, filesystem: FilesystemKind) -> ShredResult<()> {
    attributes::set_times(path, filesystem.obfuscation_epoch())
}

/// Strip the entry at `path` of its attributes, timestamps and name.
///
/// Each of the `rounds` rounds resets the timestamps (renames may refresh
/// them) and moves the entry to a new random name in the same directory.
/// A missing entry is a no-op.
pub fn obfuscate<R: RngCore>(
    path: &Path,
    filesystem: FilesystemKind,
    rounds: u32,
    rng: &mut R,
) -> ShredResult<Obfuscation> {
    obfuscate_with(path, filesystem, rounds, rng, obfuscate_times)
}

/// `obfuscate` with a caller-supplied timestamp reset. It runs once per
/// round on the entry's current name, before that round's rename.
pub(crate) fn obfuscate_with<R, T>(
    path: &Path,
    filesystem: FilesystemKind,
    rounds: u32,
    rng: &mut R,
    mut reset_times: T,
) -> ShredResult<Obfuscation>
where
    R: RngCore,
    T: FnMut(&Path, FilesystemKind) -> ShredResult<()>,
{
    let metadata = match probe(path)? {
        Some(metadata) => metadata,
        None => return Ok(Obfuscation::untouched(path)),
    };

    let parent = path.parent().ok_or_else(|| {
        ShredError::InvalidArgument(format!("cannot rename {}", path.display()))
    })?;

    attributes::mark_not_indexed(path, &metadata)?;

    let mut used: HashSet<String> = HashSet::new();
    if let Some(name) = path.file_name() {
        used.insert(name.to_string_lossy().into_owned());
    }

    let mut current = path.to_path_buf();
    let mut trail = Vec::with_capacity(rounds as usize);

    for round in 0..rounds {
        reset_times(&current, filesystem)?;

        let next = fresh_path(parent, &mut used, rng)?;
        fs::rename(&current, &next).at(&current)?;

        tracing::debug!(
            round = round + 1,
            from = %current.display(),
            to = %next.display(),
            "Renamed entry"
        );

        trail.push(next.clone());
        current = next;
    }

    Ok(Obfuscation {
        final_path: current,
        trail,
    })
}

/// Random 8.3 style name, e.g. `k3v0x9qa.p2m`.
pub fn random_name<R: RngCore>(rng: &mut R) -> String {
    let mut pick = || NAME_ALPHABET[rng.gen_range(0..NAME_ALPHABET.len())] as char;

    let mut name = String::with_capacity(NAME_STEM_LEN + 1 + NAME_EXT_LEN);
    name.extend((0..NAME_STEM_LEN).map(|_| pick()));
    name.push('.');
    name.extend((0..NAME_EXT_LEN).map(|_| pick()));
    name
}

/// A name in `parent` that was not used in this sequence and does not exist.
fn fresh_path<R: RngCore>(
    parent: &Path,
    used: &mut HashSet<String>,
    rng: &mut R,
) -> ShredResult<PathBuf> {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let name = random_name(rng);
        if !used.insert(name.clone()) {
            continue;
        }
        let candidate = parent.join(&name);
        if probe(&candidate)?.is_none() {
            return Ok(candidate);
        }
    }

    Err(ShredError::io(
        parent,
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "could not find an unused random name",
        ),
    ))
}
