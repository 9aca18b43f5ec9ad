#[cfg(test)]
mod tests {
    use crate::obfuscate::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::fs;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};
    use tempfile::tempdir;

    type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

    // ==================== EPOCH TESTS ====================

    #[test]
    fn test_ntfs_epoch_is_one_tick_after_1601() {
        let epoch = FilesystemKind::NTFS.obfuscation_epoch();
        let before_unix = UNIX_EPOCH.duration_since(epoch).unwrap();

        assert_eq!(
            before_unix,
            Duration::from_secs(11_644_473_600) - Duration::from_nanos(100)
        );
        assert_eq!(
            FilesystemKind::NTFS
                .obfuscation_epoch_utc()
                .format("%Y-%m-%d %H:%M:%S%.f")
                .to_string(),
            "1601-01-01 00:00:00.000000100"
        );
    }

    #[test]
    fn test_fat_and_other_share_the_1980_epoch() {
        let fat = FilesystemKind::FAT32.obfuscation_epoch();
        let other = FilesystemKind::Other.obfuscation_epoch();
        assert_eq!(fat, other);

        // Local midnight, so within a day of the UTC instant
        let utc_1980 = UNIX_EPOCH + Duration::from_secs(315_532_800);
        let skew = match fat.duration_since(utc_1980) {
            Ok(d) => d,
            Err(e) => e.duration(),
        };
        assert!(skew <= Duration::from_secs(26 * 3600));
    }

    #[cfg(unix)]
    #[test]
    fn test_unix_parts_before_epoch() {
        use crate::obfuscate::epoch::unix_parts;

        let ntfs = FilesystemKind::NTFS.obfuscation_epoch();
        assert_eq!(unix_parts(ntfs), (-11_644_473_600, 100));

        let after = UNIX_EPOCH + Duration::new(5, 7);
        assert_eq!(unix_parts(after), (5, 7));
        assert_eq!(unix_parts(UNIX_EPOCH), (0, 0));
    }

    // ==================== NAME TESTS ====================

    #[test]
    fn test_random_name_shape() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let name = random_name(&mut rng);
            assert_eq!(name.len(), 12);
            assert_eq!(&name[8..9], ".");
            assert!(name
                .chars()
                .filter(|&c| c != '.')
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }

    // ==================== OBFUSCATION TESTS ====================

    #[test]
    fn test_obfuscate_times_resets_to_epoch() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("stamp.txt");
        fs::write(&path, b"data")?;

        obfuscate_times(&path, FilesystemKind::FAT32)?;

        let meta = fs::metadata(&path)?;
        let epoch = FilesystemKind::FAT32.obfuscation_epoch();
        assert_eq!(meta.modified()?, epoch);
        assert_eq!(meta.accessed()?, epoch);
        Ok(())
    }

    #[test]
    fn test_obfuscate_missing_entry_is_noop() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("ghost");
        let mut rng = StdRng::seed_from_u64(5);

        let result = obfuscate(&path, FilesystemKind::Other, 8, &mut rng)?;
        assert_eq!(result.final_path, path);
        assert_eq!(result.rounds(), 0);
        Ok(())
    }

    #[test]
    fn test_obfuscate_file_eight_distinct_names() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("diary.txt");
        fs::write(&path, b"dear diary")?;

        let mut rng = StdRng::seed_from_u64(1234);
        let result = obfuscate(&path, FilesystemKind::Other, 8, &mut rng)?;

        assert_eq!(result.rounds(), 8);
        let distinct: HashSet<_> = result.trail.iter().collect();
        assert_eq!(distinct.len(), 8, "every round must use a new name");
        assert!(result.trail.iter().all(|p| p.parent() == Some(dir.path())));
        assert!(result.trail.iter().all(|p| p.file_name() != path.file_name()));

        assert!(!path.exists());
        assert_eq!(result.final_path, *result.trail.last().unwrap());
        assert_eq!(fs::read(&result.final_path)?, b"dear diary");

        // Intermediate names are gone, only the final one remains
        let remaining: Vec<_> = fs::read_dir(dir.path())?.collect();
        assert_eq!(remaining.len(), 1);
        Ok(())
    }

    #[test]
    fn test_obfuscate_leaves_epoch_timestamps() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("a.txt");
        fs::write(&path, b"x")?;

        let mut rng = StdRng::seed_from_u64(77);
        let result = obfuscate(&path, FilesystemKind::FAT32, 3, &mut rng)?;

        let modified = fs::metadata(&result.final_path)?.modified()?;
        assert_eq!(modified, FilesystemKind::FAT32.obfuscation_epoch());
        assert!(modified < SystemTime::now());
        Ok(())
    }

    #[test]
    fn test_every_round_resets_times_before_renaming() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("a.txt");
        fs::write(&path, b"x")?;

        let mut resets = Vec::new();
        let mut rng = StdRng::seed_from_u64(21);
        let result = obfuscate_with(&path, FilesystemKind::NTFS, 5, &mut rng, |p, fs_kind| {
            assert!(p.exists(), "reset must run before the entry moves");
            resets.push((p.to_path_buf(), fs_kind));
            obfuscate_times(p, fs_kind)
        })?;

        assert_eq!(resets.len(), 5);
        assert!(resets.iter().all(|(_, k)| *k == FilesystemKind::NTFS));

        let mut expected = vec![path.clone()];
        expected.extend(result.trail[..4].iter().cloned());
        let reset_paths: Vec<_> = resets.into_iter().map(|(p, _)| p).collect();
        assert_eq!(reset_paths, expected);
        Ok(())
    }

    #[test]
    fn test_failed_time_reset_stops_before_rename() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("a.txt");
        fs::write(&path, b"x")?;

        let mut rng = StdRng::seed_from_u64(3);
        let result = obfuscate_with(&path, FilesystemKind::Other, 8, &mut rng, |p, _| {
            Err(crate::ShredError::io(
                p,
                std::io::Error::new(std::io::ErrorKind::Other, "clock"),
            ))
        });

        assert!(matches!(result, Err(crate::ShredError::IoFailure { .. })));
        assert!(path.exists());
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn test_obfuscate_directory_single_round() -> Result<()> {
        let dir = tempdir()?;
        let sub = dir.path().join("private");
        fs::create_dir(&sub)?;
        fs::write(sub.join("inner.txt"), b"inner")?;

        let mut rng = StdRng::seed_from_u64(8);
        let result = obfuscate(&sub, FilesystemKind::Other, 1, &mut rng)?;

        assert_eq!(result.rounds(), 1);
        assert!(!sub.exists());
        assert!(result.final_path.is_dir());
        assert!(result.final_path.join("inner.txt").exists());
        Ok(())
    }

    #[test]
    fn test_obfuscate_read_only_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("ro.txt");
        fs::write(&path, b"x")?;
        let mut permissions = fs::metadata(&path)?.permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&path, permissions)?;

        let mut rng = StdRng::seed_from_u64(2);
        let result = obfuscate(&path, FilesystemKind::Other, 2, &mut rng)?;

        assert!(!fs::metadata(&result.final_path)?.permissions().readonly());
        Ok(())
    }

    #[test]
    fn test_obfuscate_never_clobbers_existing_names() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("target.txt");
        fs::write(&path, b"target")?;

        // Pre-create the first names the seeded generator will produce
        let mut probe_rng = StdRng::seed_from_u64(99);
        let taken: Vec<String> = (0..4).map(|_| random_name(&mut probe_rng)).collect();
        for name in &taken {
            fs::write(dir.path().join(name), b"bystander")?;
        }

        let mut rng = StdRng::seed_from_u64(99);
        let result = obfuscate(&path, FilesystemKind::Other, 4, &mut rng)?;

        for name in &taken {
            assert_eq!(fs::read(dir.path().join(name))?, b"bystander");
        }
        assert_eq!(fs::read(&result.final_path)?, b"target");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_obfuscate_symlink_leaves_target_untouched() -> Result<()> {
        let dir = tempdir()?;
        let real = dir.path().join("real.txt");
        fs::write(&real, b"keep me")?;
        let before = fs::metadata(&real)?.modified()?;

        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&real, &link)?;

        let mut rng = StdRng::seed_from_u64(4);
        let result = obfuscate(&link, FilesystemKind::Other, 2, &mut rng)?;

        assert!(fs::symlink_metadata(&result.final_path)?.file_type().is_symlink());
        assert_eq!(fs::read(&real)?, b"keep me");
        assert_eq!(fs::metadata(&real)?.modified()?, before);
        Ok(())
    }
}
