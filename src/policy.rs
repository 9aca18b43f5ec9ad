use crate::{MediumClassification, MediumType};
use serde::{Deserialize, Serialize};

/// How a file is disposed of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyDecision {
    /// Overwrite, obfuscate, then unlink.
    DestructiveWipe,
    /// Unlink only.
    PlainRemove,
}

/// Decision table keyed on the medium. Unknown media are wiped.
pub fn decide(medium: MediumType) -> PolicyDecision {
    match medium {
        MediumType::Rotational | MediumType::Unknown => PolicyDecision::DestructiveWipe,
        MediumType::SolidState | MediumType::Network => PolicyDecision::PlainRemove,
    }
}

/// Decision for an optional classification; no classification means the
/// caller opted out of detection and always gets a wipe.
pub fn decide_for(classification: Option<&MediumClassification>) -> PolicyDecision {
    classification
        .map(|c| decide(c.medium))
        .unwrap_or(PolicyDecision::DestructiveWipe)
}

#[cfg(test)]
mod policy_tests;
