/// Common test utilities for the integration tests
///
/// This module provides:
/// - Directory tree fixtures built in a temporary directory
/// - Helpers for inspecting what a deletion left behind

pub mod fixtures;
pub mod test_helpers;
