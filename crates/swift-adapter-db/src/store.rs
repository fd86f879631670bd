//! Store contract used by the registry service.

use async_trait::async_trait;
use swift_model::{BranchDocument, RegistryDocument};

use crate::Result;

/// Result of a conditional branch append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The branch was appended
    Pushed,
    /// No headquarters document with the given code exists
    ParentMissing,
    /// The headquarters already embeds a branch with this code
    Duplicate,
}

/// Which top-level documents to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountFilter<'a> {
    All,
    Code(&'a str),
    Country(&'a str),
}

/// Persistence operations over top-level registry documents.
///
/// Every write is a single conditional operation on the backend; callers
/// never read-modify-write a document.
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// Top-level document with exactly this code.
    async fn find_by_code(&self, code: &str) -> Result<Option<RegistryDocument>>;

    /// Top-level documents whose country is `iso2`, ordered by code.
    async fn find_by_country(&self, iso2: &str) -> Result<Vec<RegistryDocument>>;

    /// Insert unless a document with the same code exists.
    ///
    /// Fails with [`crate::Error::DuplicateKey`] when the code is taken.
    async fn insert(&self, document: &RegistryDocument) -> Result<()>;

    /// Append `branch` to the headquarters `hq_code` if no branch with the
    /// same code is embedded yet.
    async fn push_branch_if_absent(
        &self,
        hq_code: &str,
        branch: &BranchDocument,
    ) -> Result<PushOutcome>;

    /// Remove the branch `branch_code` from `hq_code`. Returns whether a
    /// branch was removed.
    async fn pull_branch(&self, hq_code: &str, branch_code: &str) -> Result<bool>;

    /// Delete every top-level document whose code equals `code` or whose
    /// first eight characters equal `prefix`. Returns the number removed.
    async fn delete_by_code_or_prefix(&self, code: &str, prefix: &str) -> Result<u64>;

    /// Number of top-level documents matching `filter`.
    async fn count(&self, filter: CountFilter<'_>) -> Result<u64>;
}
