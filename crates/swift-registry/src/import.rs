//! Bulk import reconciliation.
//!
//! Headquarters are committed before any branch is attached, so a batch may
//! list a branch ahead of its headquarters. Individual records never abort a
//! run; they are skipped and counted. Only a store failure stops the import.

use std::collections::HashSet;

use swift_adapter_db::{CountFilter, PushOutcome, RegistryStore};
use swift_model::{ImportSummary, RecordInput, headquarters_code_for, is_headquarters_code};
use tracing::{debug, info, warn};

use crate::Result;

/// Merge `records` into the store and count what happened to each.
///
/// Records must already be normalized and validated. A headquarters without
/// a country name is skipped. Codes repeated within the batch keep their
/// first occurrence. The role of each record is taken from its code suffix.
///
/// # Errors
///
/// Returns [`crate::Error::Internal`] when the store fails; counts gathered
/// before the failure are discarded.
pub async fn reconcile<S>(store: &S, records: Vec<RecordInput>) -> Result<ImportSummary>
where
    S: RegistryStore + ?Sized,
{
    let (headquarters, branches) = partition(records);
    info!(
        headquarters = headquarters.len(),
        branches = branches.len(),
        "reconciling import batch"
    );

    let mut summary = ImportSummary::default();
    for record in &headquarters {
        if import_headquarters(store, record).await? {
            summary.hq_added += 1;
        } else {
            summary.hq_skipped += 1;
        }
    }

    for record in &branches {
        match import_branch(store, record).await? {
            PushOutcome::Pushed => summary.branches_added += 1,
            PushOutcome::Duplicate => {
                summary.branches_duplicate += 1;
                summary.branches_skipped += 1;
            }
            PushOutcome::ParentMissing => {
                summary.branches_missing_hq += 1;
                summary.branches_skipped += 1;
            }
        }
    }

    info!(
        hq_added = summary.hq_added,
        hq_skipped = summary.hq_skipped,
        branches_added = summary.branches_added,
        branches_duplicate = summary.branches_duplicate,
        branches_missing_hq = summary.branches_missing_hq,
        branches_skipped = summary.branches_skipped,
        "import finished"
    );
    Ok(summary)
}

/// Split into headquarters and branches, dropping repeated codes.
fn partition(records: Vec<RecordInput>) -> (Vec<RecordInput>, Vec<RecordInput>) {
    let mut seen = HashSet::new();
    let mut headquarters = Vec::new();
    let mut branches = Vec::new();
    for record in records {
        if !seen.insert(record.code.clone()) {
            debug!(code = %record.code, "duplicate code in batch, keeping first occurrence");
            continue;
        }
        if is_headquarters_code(&record.code) {
            headquarters.push(record);
        } else {
            branches.push(record);
        }
    }
    (headquarters, branches)
}

/// Insert one headquarters with an empty branch list. Returns whether it was
/// added.
async fn import_headquarters<S>(store: &S, record: &RecordInput) -> Result<bool>
where
    S: RegistryStore + ?Sized,
{
    let Some(country_name) = record.country_name.as_deref() else {
        warn!(code = %record.code, "headquarters has no country name, skipping");
        return Ok(false);
    };
    if store.count(CountFilter::Code(&record.code)).await? > 0 {
        debug!(code = %record.code, "headquarters already present, skipping");
        return Ok(false);
    }

    let mut document = record.to_headquarters_document(country_name);
    document.branches.clear();
    match store.insert(&document).await {
        Ok(()) => Ok(true),
        Err(swift_adapter_db::Error::DuplicateKey { code }) => {
            debug!(code = %code, "headquarters inserted concurrently, skipping");
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}

async fn import_branch<S>(store: &S, record: &RecordInput) -> Result<PushOutcome>
where
    S: RegistryStore + ?Sized,
{
    let hq_code = headquarters_code_for(&record.code);
    let parent = store
        .find_by_code(&hq_code)
        .await?
        .filter(|document| document.is_headquarters);
    let Some(parent) = parent else {
        warn!(code = %record.code, hq = %hq_code, "headquarters missing, skipping branch");
        return Ok(PushOutcome::ParentMissing);
    };
    if parent.has_branch(&record.code) {
        debug!(code = %record.code, hq = %hq_code, "branch already attached, skipping");
        return Ok(PushOutcome::Duplicate);
    }

    let outcome = store
        .push_branch_if_absent(&hq_code, &record.to_branch_document())
        .await?;
    if outcome == PushOutcome::ParentMissing {
        warn!(
            code = %record.code,
            hq = %hq_code,
            "headquarters removed during import, skipping branch"
        );
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_by_suffix_and_first_occurrence() {
        let records = vec![
            RecordInput::branch("AAAAPLPWABC", "PL").with_bank_name("FIRST"),
            RecordInput::headquarters("AAAAPLPWXXX", "PL"),
            RecordInput::branch("AAAAPLPWABC", "PL").with_bank_name("SECOND"),
            // declared role is ignored; the suffix decides
            RecordInput::new("BBBBPLPWXXX", "PL", false),
            RecordInput::branch("CCCCPLPW", "PL"),
        ];
        let (headquarters, branches) = partition(records);

        let hq_codes: Vec<&str> = headquarters.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(hq_codes, vec!["AAAAPLPWXXX", "BBBBPLPWXXX"]);
        let branch_codes: Vec<&str> = branches.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(branch_codes, vec!["AAAAPLPWABC", "CCCCPLPW"]);
        assert_eq!(branches[0].bank_name, "FIRST");
    }
}
