/// Tests that run against the host's real medium detection
///
/// Detection may legitimately fail in containers, so these tests accept
/// either a classification or DetectionFailed, never a partial deletion.
use vanish::{MediumClassifier, ShredError, SystemClassifier};

#[path = "common/mod.rs"]
mod common;

use common::fixtures::TestTree;
use common::test_helpers::{entry_exists, verify_fill};

#[test]
fn test_classify_temp_directory() {
    let tree = TestTree::new("probe").expect("temp tree");
    match SystemClassifier.classify(tree.root()) {
        Ok(classification) => {
            println!(
                "Temp directory is on {} ({})",
                classification.medium, classification.filesystem
            );
        }
        Err(ShredError::DetectionFailed(reason)) => {
            println!("Detection unavailable: {}", reason);
        }
        Err(other) => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_delete_file_with_detection_is_all_or_nothing() {
    let tree = TestTree::new("D")
        .and_then(|t| t.file("secret.txt", 64, 0x5A))
        .expect("temp tree");
    let path = tree.join("secret.txt");

    match vanish::delete_file(path.to_str().expect("utf-8 path")) {
        Ok(report) => {
            assert_eq!(report.files_wiped + report.files_removed, 1);
            assert!(!entry_exists(&path));
        }
        Err(ShredError::DetectionFailed(_)) => {
            assert!(verify_fill(&path, 64, 0x5A).expect("readable"));
        }
        Err(other) => panic!("unexpected error: {other}"),
    }
}
