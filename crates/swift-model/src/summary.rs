use std::fmt;

use serde::{Deserialize, Serialize};

/// Counts produced by a bulk import run.
///
/// `hq_skipped` counts headquarters already present or failing validation.
/// `branches_skipped` counts duplicate and orphaned branches plus branches
/// failing validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    #[serde(rename = "hqAdded")]
    pub hq_added: usize,
    #[serde(rename = "hqSkipped")]
    pub hq_skipped: usize,
    pub branches_added: usize,
    pub branches_duplicate: usize,
    #[serde(rename = "branchesMissingHQ")]
    pub branches_missing_hq: usize,
    pub branches_skipped: usize,
}

impl ImportSummary {
    /// Number of records the run looked at.
    #[must_use]
    pub fn total_processed(&self) -> usize {
        self.hq_added + self.hq_skipped + self.branches_added + self.branches_skipped
    }

    /// Whether the run changed the registry.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.hq_added > 0 || self.branches_added > 0
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Headquarters added: {}", self.hq_added)?;
        writeln!(f, "Skipped HQs (duplicates): {}", self.hq_skipped)?;
        writeln!(f, "Branches added: {}", self.branches_added)?;
        writeln!(f, "Duplicate branches: {}", self.branches_duplicate)?;
        writeln!(f, "Branches with missing HQ: {}", self.branches_missing_hq)?;
        write!(f, "All skipped branches: {}", self.branches_skipped)
    }
}
