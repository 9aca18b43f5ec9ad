// Tests for the medium -> decision table

use super::*;
use crate::FilesystemKind;
use test_case::test_case;

#[test_case(MediumType::Rotational => PolicyDecision::DestructiveWipe ; "rotational wiped")]
#[test_case(MediumType::Unknown => PolicyDecision::DestructiveWipe ; "unknown wiped")]
#[test_case(MediumType::SolidState => PolicyDecision::PlainRemove ; "solid state removed")]
#[test_case(MediumType::Network => PolicyDecision::PlainRemove ; "network removed")]
fn test_decision_table(medium: MediumType) -> PolicyDecision {
    decide(medium)
}

#[test]
fn test_decide_for_without_classification_always_wipes() {
    assert_eq!(decide_for(None), PolicyDecision::DestructiveWipe);
}

#[test]
fn test_decide_for_ignores_filesystem_kind() {
    for filesystem in [FilesystemKind::NTFS, FilesystemKind::FAT32, FilesystemKind::Other] {
        let ssd = MediumClassification::new(MediumType::SolidState, filesystem);
        let hdd = MediumClassification::new(MediumType::Rotational, filesystem);

        assert_eq!(decide_for(Some(&ssd)), PolicyDecision::PlainRemove);
        assert_eq!(decide_for(Some(&hdd)), PolicyDecision::DestructiveWipe);
    }
}
