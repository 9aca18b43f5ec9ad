// Shred Orchestrator - Routes every entry of a deletion request to the right strategy
//
// The orchestrator is the traversal driver: it probes the target, asks the
// classifier what medium the volume is on, and either wipes (overwrite +
// obfuscate + unlink) or plainly removes each file. Directories are walked
// depth-first with an explicit stack and obfuscated before removal.

use crate::policy::decide_for;
use crate::target::{clear_read_only, probe, remove_link, volume_id};
use crate::{
    Eraser, FilesystemKind, IoResultExt, MediumClassification, MediumClassifier, PolicyDecision,
    RandomEraser, ShredConfig, ShredError, ShredReport, ShredResult, Target, TargetKind,
};
use rand::rngs::SmallRng;
use std::collections::HashMap;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};

/// Secure deletion entry point.
///
/// Holds only its configuration, classifier and eraser. Every call is an
/// independent pass with its own classification queries.
pub struct Shredder<C: MediumClassifier, E: Eraser> {
    classifier: C,
    eraser: E,
    config: ShredConfig,
}

impl<C: MediumClassifier> Shredder<C, RandomEraser<SmallRng>> {
    /// Shredder with a fast entropy-seeded eraser.
    pub fn new(classifier: C, config: ShredConfig) -> ShredResult<Self> {
        let eraser = RandomEraser::from_entropy(config.max_chunk_size);
        Self::with_eraser(classifier, eraser, config)
    }
}

impl<C: MediumClassifier, E: Eraser> Shredder<C, E> {
    pub fn with_eraser(classifier: C, eraser: E, config: ShredConfig) -> ShredResult<Self> {
        config.validate()?;
        Ok(Self {
            classifier,
            eraser,
            config,
        })
    }

    pub fn config(&self) -> &ShredConfig {
        &self.config
    }

    pub fn eraser(&self) -> &E {
        &self.eraser
    }

    // ==================== HANDLE OPERATIONS ====================

    /// Delete a file using the strategy its medium calls for.
    /// A missing file is a successful no-op.
    pub fn delete_file(&mut self, target: &Target) -> ShredResult<ShredReport> {
        tracing::info!(path = %target.path().display(), "Deleting file");
        let mut pass = self.pass(true);
        pass.file(target.path())?;
        Ok(pass.finish())
    }

    /// Delete a file, always overwriting and obfuscating it.
    pub fn delete_file_without_detection(&mut self, target: &Target) -> ShredResult<ShredReport> {
        tracing::info!(path = %target.path().display(), "Deleting file without detection");
        let mut pass = self.pass(false);
        pass.file(target.path())?;
        Ok(pass.finish())
    }

    /// Delete a directory and, if `recursive`, everything below it.
    pub fn delete_directory(
        &mut self,
        target: &Target,
        recursive: bool,
    ) -> ShredResult<ShredReport> {
        tracing::info!(path = %target.path().display(), recursive, "Deleting directory");
        let mut pass = self.pass(true);
        pass.directory(target.path(), recursive)?;
        Ok(pass.finish())
    }

    pub fn delete_directory_without_detection(
        &mut self,
        target: &Target,
        recursive: bool,
    ) -> ShredResult<ShredReport> {
        tracing::info!(
            path = %target.path().display(),
            recursive,
            "Deleting directory without detection"
        );
        let mut pass = self.pass(false);
        pass.directory(target.path(), recursive)?;
        Ok(pass.finish())
    }

    // ==================== PATH OPERATIONS ====================

    /// Like `delete_file`, but an empty path is `InvalidArgument` and a
    /// missing one is `NotFound`.
    pub fn delete_file_at(&mut self, path: &str) -> ShredResult<ShredReport> {
        let target = Target::existing_file(path)?;
        self.delete_file(&target)
    }

    pub fn delete_file_without_detection_at(&mut self, path: &str) -> ShredResult<ShredReport> {
        let target = Target::existing_file(path)?;
        self.delete_file_without_detection(&target)
    }

    pub fn delete_directory_at(&mut self, path: &str, recursive: bool) -> ShredResult<ShredReport> {
        let target = Target::existing_directory(path)?;
        self.delete_directory(&target, recursive)
    }

    pub fn delete_directory_without_detection_at(
        &mut self,
        path: &str,
        recursive: bool,
    ) -> ShredResult<ShredReport> {
        let target = Target::existing_directory(path)?;
        self.delete_directory_without_detection(&target, recursive)
    }

    fn pass(&mut self, detect: bool) -> Pass<'_, C, E> {
        Pass {
            classifier: if detect { Some(&self.classifier) } else { None },
            eraser: &mut self.eraser,
            config: &self.config,
            volumes: HashMap::new(),
            report: ShredReport::default(),
        }
    }
}

/// Work item of the directory walk.
enum Step {
    Enter(PathBuf, bool),
    File(PathBuf),
    Leave(PathBuf),
}

/// State of one top-level call. Dropped when the call returns, taking the
/// per-volume classifications with it.
struct Pass<'s, C: MediumClassifier, E: Eraser> {
    classifier: Option<&'s C>,
    eraser: &'s mut E,
    config: &'s ShredConfig,
    volumes: HashMap<Option<u64>, MediumClassification>,
    report: ShredReport,
}

impl<'s, C: MediumClassifier, E: Eraser> Pass<'s, C, E> {
    fn finish(self) -> ShredReport {
        tracing::info!(
            wiped = self.report.files_wiped,
            removed = self.report.files_removed,
            links = self.report.links_removed,
            specials = self.report.specials_removed,
            directories = self.report.directories_removed,
            bytes = self.report.bytes_overwritten,
            "Deletion complete"
        );
        self.report
    }

    /// Classification of the volume holding `path`, queried at most once per
    /// volume in this pass. `None` when detection is off.
    fn classification(
        &mut self,
        path: &Path,
        metadata: &Metadata,
    ) -> ShredResult<Option<MediumClassification>> {
        let classifier = match self.classifier {
            Some(classifier) => classifier,
            None => return Ok(None),
        };

        let volume = volume_id(metadata);
        if let Some(known) = self.volumes.get(&volume) {
            return Ok(Some(*known));
        }

        let classification = classifier.classify(path)?;
        tracing::info!(
            path = %path.display(),
            medium = %classification.medium,
            filesystem = %classification.filesystem,
            "Classified volume"
        );
        self.volumes.insert(volume, classification);
        Ok(Some(classification))
    }

    fn filesystem(&mut self, path: &Path, metadata: &Metadata) -> ShredResult<FilesystemKind> {
        Ok(self
            .classification(path, metadata)?
            .map(|c| c.filesystem)
            .unwrap_or(FilesystemKind::Other))
    }

    fn file(&mut self, path: &Path) -> ShredResult<()> {
        let metadata = match probe(path)? {
            Some(metadata) => metadata,
            None => return Ok(()),
        };

        match TargetKind::of(&metadata) {
            TargetKind::Directory => Err(ShredError::InvalidArgument(format!(
                "{} is a directory",
                path.display()
            ))),
            TargetKind::Link => self.link(path, &metadata),
            TargetKind::File => self.regular_file(path, &metadata),
            TargetKind::Special => self.special(path, &metadata),
        }
    }

    fn regular_file(&mut self, path: &Path, metadata: &Metadata) -> ShredResult<()> {
        let classification = self.classification(path, metadata)?;
        let decision = decide_for(classification.as_ref());

        clear_read_only(path, metadata)?;

        match decision {
            PolicyDecision::PlainRemove => {
                fs::remove_file(path).at(path)?;
                self.report.files_removed += 1;
            }
            PolicyDecision::DestructiveWipe => {
                let filesystem = classification
                    .map(|c| c.filesystem)
                    .unwrap_or(FilesystemKind::Other);

                let bytes = self
                    .eraser
                    .overwrite(path, self.config.randomize_final_size)?;
                let obfuscation = self
                    .eraser
                    .obfuscate(path, filesystem, self.config.file_rounds)?;
                fs::remove_file(&obfuscation.final_path).at(&obfuscation.final_path)?;

                self.report.files_wiped += 1;
                self.report.bytes_overwritten += bytes;
            }
        }

        tracing::debug!(path = %path.display(), ?decision, "File deleted");
        Ok(())
    }

    /// Special entries are never overwritten. On a medium that calls for a
    /// wipe their entry is obfuscated like a file's before it is unlinked.
    fn special(&mut self, path: &Path, metadata: &Metadata) -> ShredResult<()> {
        let classification = self.classification(path, metadata)?;
        clear_read_only(path, metadata)?;

        let final_path = match decide_for(classification.as_ref()) {
            PolicyDecision::PlainRemove => path.to_path_buf(),
            PolicyDecision::DestructiveWipe => {
                let filesystem = classification
                    .map(|c| c.filesystem)
                    .unwrap_or(FilesystemKind::Other);
                self
                    .eraser
                    .obfuscate(path, filesystem, self.config.file_rounds)?
                    .final_path
            }
        };
        fs::remove_file(&final_path).at(&final_path)?;

        self.report.specials_removed += 1;
        tracing::debug!(path = %path.display(), "Special entry removed");
        Ok(())
    }

    /// Links are never followed: only the link entry is obfuscated and removed.
    fn link(&mut self, path: &Path, metadata: &Metadata) -> ShredResult<()> {
        tracing::warn!(path = %path.display(), "Not following link, removing the link only");

        let filesystem = self.filesystem(path, metadata)?;
        let obfuscation = self
            .eraser
            .obfuscate(path, filesystem, self.config.directory_rounds)?;
        remove_link(&obfuscation.final_path, metadata)?;

        self.report.links_removed += 1;
        Ok(())
    }

    fn directory(&mut self, root: &Path, recursive: bool) -> ShredResult<()> {
        let mut stack = vec![Step::Enter(root.to_path_buf(), recursive)];

        while let Some(step) = stack.pop() {
            match step {
                Step::File(path) => self.file(&path)?,
                Step::Leave(dir) => self.remove_directory(&dir)?,
                Step::Enter(dir, recursive) => {
                    let metadata = match probe(&dir)? {
                        Some(metadata) => metadata,
                        None => continue,
                    };

                    match TargetKind::of(&metadata) {
                        TargetKind::Link => {
                            self.link(&dir, &metadata)?;
                            continue;
                        }
                        TargetKind::File | TargetKind::Special => {
                            return Err(ShredError::InvalidArgument(format!(
                                "{} is not a directory",
                                dir.display()
                            )));
                        }
                        TargetKind::Directory => {}
                    }

                    // Classify before anything below is touched
                    self.classification(&dir, &metadata)?;

                    let (subdirs, files) = list_children(&dir)?;
                    if !recursive && !(subdirs.is_empty() && files.is_empty()) {
                        return Err(ShredError::InvalidArgument(format!(
                            "{} is not empty",
                            dir.display()
                        )));
                    }

                    // Popped in order: subdirectories, then files, then the directory itself
                    stack.push(Step::Leave(dir));
                    stack.extend(files.into_iter().rev().map(Step::File));
                    stack.extend(
                        subdirs
                            .into_iter()
                            .rev()
                            .map(|subdir| Step::Enter(subdir, true)),
                    );
                }
            }
        }

        Ok(())
    }

    fn remove_directory(&mut self, dir: &Path) -> ShredResult<()> {
        let metadata = match probe(dir)? {
            Some(metadata) => metadata,
            None => return Ok(()),
        };

        let filesystem = self.filesystem(dir, &metadata)?;
        let obfuscation = self
            .eraser
            .obfuscate(dir, filesystem, self.config.directory_rounds)?;
        fs::remove_dir(&obfuscation.final_path).at(&obfuscation.final_path)?;

        self.report.directories_removed += 1;
        tracing::debug!(path = %dir.display(), "Directory removed");
        Ok(())
    }
}

/// Children of `dir`, split into real subdirectories and everything else
/// (files and links), each sorted by name.
fn list_children(dir: &Path) -> ShredResult<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut subdirs = Vec::new();
    let mut others = Vec::new();

    for entry in fs::read_dir(dir).at(dir)? {
        let entry = entry.at(dir)?;
        let path = entry.path();
        let file_type = entry.file_type().at(&path)?;

        if file_type.is_dir() && !file_type.is_symlink() {
            subdirs.push(path);
        } else {
            others.push(path);
        }
    }

    subdirs.sort();
    others.sort();
    Ok((subdirs, others))
}
