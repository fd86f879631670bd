//! Registry service: lookups, adds and deletes over a [`RegistryStore`].

use std::collections::HashSet;
use std::sync::Arc;

use swift_adapter_db::{CountFilter, PushOutcome, RegistryStore};
use swift_model::{
    BranchDocument, CountryRecordsView, FlatRecordView, ImportSummary, RecordInput,
    RegistryDocument, UnifiedRecordView, code_prefix, headquarters_code_for, is_headquarters_code,
    shares_prefix,
};
use swift_validation::{
    CountryTable, normalize_code, normalize_iso2, validate_code, validate_iso2, validate_record,
    validate_suffix_consistency,
};
use tracing::{debug, info, warn};

use crate::import::reconcile;
use crate::{Error, Result};

/// Entry point for every registry operation.
///
/// Holds no state between calls besides the store handle and the country
/// reference table, which is loaded once and shared.
pub struct RegistryService<S> {
    store: S,
    countries: Arc<CountryTable>,
}

impl<S: RegistryStore> RegistryService<S> {
    pub fn new(store: S, countries: Arc<CountryTable>) -> Self {
        Self { store, countries }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn countries(&self) -> &CountryTable {
        &self.countries
    }

    /// Details of one code. Headquarters list their branches; a branch takes
    /// its headquarters' country name.
    ///
    /// # Errors
    ///
    /// `BadRequest` for a malformed code, `NotFound` when neither the code nor
    /// a branch under its headquarters exists, `Internal` on store failure.
    pub async fn get_details(&self, code: &str) -> Result<UnifiedRecordView> {
        let code = normalize_code(code);
        validate_code(&code)?;
        debug!(code = %code, "looking up SWIFT code");

        if let Some(document) = self.store.find_by_code(&code).await? {
            return Ok(document.into());
        }

        let parent = self.find_parent(&code).await?;
        parent
            .branch(&code)
            .map(|branch| UnifiedRecordView::branch(branch, parent.country_name.clone()))
            .ok_or_else(|| Error::NotFound(format!("no branch found for SWIFT code {code}")))
    }

    /// Every code registered for a country: headquarters first, then
    /// branches, each listed once.
    ///
    /// # Errors
    ///
    /// `BadRequest` for a malformed or unknown ISO2, `NotFound` when the
    /// country has no codes, `Internal` on store failure.
    pub async fn get_by_country(&self, iso2: &str) -> Result<CountryRecordsView> {
        let iso2 = normalize_iso2(iso2);
        validate_iso2(&iso2)?;
        let country_name = self.countries.validate_exists(&iso2)?.name.clone();

        let documents = self.store.find_by_country(&iso2).await?;
        if documents.is_empty() {
            return Err(Error::NotFound(format!(
                "no SWIFT codes found for country {iso2}"
            )));
        }

        let mut seen = HashSet::new();
        let mut records = Vec::new();
        let mut branches = Vec::new();
        for document in &documents {
            if document.is_headquarters && seen.insert(document.code.as_str()) {
                records.push(FlatRecordView::from(document));
            }
            for branch in &document.branches {
                if branch.country_iso2 != iso2 {
                    debug!(
                        code = %branch.code,
                        hq = %document.code,
                        iso2 = %branch.country_iso2,
                        "branch registered under another country, not listed"
                    );
                    continue;
                }
                if seen.insert(branch.code.as_str()) {
                    branches.push(FlatRecordView::from(branch));
                }
            }
        }
        records.extend(branches);

        debug!(iso2 = %iso2, records = records.len(), "country lookup");
        Ok(CountryRecordsView {
            country_iso2: iso2,
            country_name,
            records,
        })
    }

    /// Register a headquarters, or attach a branch to its existing
    /// headquarters. Returns a confirmation message.
    ///
    /// # Errors
    ///
    /// `BadRequest` for malformed input or a country mismatch, `NotFound`
    /// when a branch has no headquarters, `Conflict` when the code already
    /// exists, `Internal` on store failure.
    pub async fn add(&self, record: RecordInput) -> Result<String> {
        let record = normalize_record(record);
        validate_code(&record.code)?;
        validate_suffix_consistency(&record.code, record.is_headquarters)?;
        validate_iso2(&record.country_iso2)?;
        let country_name = self
            .countries
            .resolve_name(&record.country_iso2, record.country_name.as_deref())?;

        if record.is_headquarters {
            self.add_headquarters(&record, country_name).await
        } else {
            self.add_branch(&record).await
        }
    }

    async fn add_headquarters(&self, record: &RecordInput, country_name: String) -> Result<String> {
        let code = &record.code;
        if self.store.count(CountFilter::Code(code)).await? > 0 {
            return Err(Error::Conflict(format!(
                "headquarter SWIFT code {code} already exists"
            )));
        }

        let mut document = record.to_headquarters_document(country_name);
        document.branches = check_supplied_branches(&document)?;
        self.store.insert(&document).await?;

        info!(code = %code, branches = document.branches.len(), "headquarters added");
        Ok(format!("Headquarter SWIFT code {code} added successfully"))
    }

    async fn add_branch(&self, record: &RecordInput) -> Result<String> {
        let code = &record.code;
        let parent = self.find_parent(code).await?;
        if record.country_iso2 != parent.country_iso2 {
            return Err(Error::BadRequest(format!(
                "branch SWIFT code {code} country ISO2 {} does not match headquarter {} country ISO2 {}",
                record.country_iso2, parent.code, parent.country_iso2
            )));
        }
        let duplicate = || {
            Error::Conflict(format!(
                "branch SWIFT code {code} already exists under headquarter {}",
                parent.code
            ))
        };
        if parent.has_branch(code) {
            return Err(duplicate());
        }

        match self
            .store
            .push_branch_if_absent(&parent.code, &record.to_branch_document())
            .await?
        {
            PushOutcome::Pushed => {
                info!(code = %code, hq = %parent.code, "branch added");
                Ok(format!(
                    "Branch SWIFT code {code} added to headquarter {} successfully",
                    parent.code
                ))
            }
            PushOutcome::Duplicate => Err(duplicate()),
            PushOutcome::ParentMissing => Err(missing_parent(code, &parent.code)),
        }
    }

    /// Delete a headquarters together with every record sharing its prefix,
    /// or remove a single branch from its headquarters.
    ///
    /// # Errors
    ///
    /// `BadRequest` for a malformed code, `NotFound` when there is nothing to
    /// delete, `Internal` on store failure.
    pub async fn delete(&self, code: &str) -> Result<String> {
        let code = normalize_code(code);
        validate_code(&code)?;

        if is_headquarters_code(&code) {
            self.delete_headquarters(&code).await
        } else {
            self.delete_branch(&code).await
        }
    }

    async fn delete_headquarters(&self, code: &str) -> Result<String> {
        let not_found = || Error::NotFound(format!("headquarter {code} not found, cannot delete"));
        match self.store.find_by_code(code).await? {
            Some(document) if document.is_headquarters => {}
            _ => return Err(not_found()),
        }

        let removed = self
            .store
            .delete_by_code_or_prefix(code, code_prefix(code))
            .await?;
        if removed == 0 {
            return Err(not_found());
        }

        info!(code = %code, removed, "headquarters deleted with its prefix");
        Ok(format!("Deleted headquarter {code} and its branches"))
    }

    async fn delete_branch(&self, code: &str) -> Result<String> {
        let hq_code = headquarters_code_for(code);
        let parent = self
            .store
            .find_by_code(&hq_code)
            .await?
            .filter(|document| document.is_headquarters);
        if parent.is_none() {
            return Err(Error::NotFound(format!(
                "branch {code} not found and its headquarter {hq_code} does not exist"
            )));
        }

        if !self.store.pull_branch(&hq_code, code).await? {
            return Err(Error::NotFound(format!(
                "branch {code} not found under headquarter {hq_code}"
            )));
        }

        info!(code = %code, hq = %hq_code, "branch deleted");
        Ok(format!("Branch {code} deleted successfully"))
    }

    /// Reconcile a batch into the registry.
    ///
    /// Each record is checked against the code, ISO2 and country rules
    /// first. A record that fails is skipped and counted by its suffix;
    /// the rest are reconciled. Records without a country name take the
    /// canonical one.
    ///
    /// # Errors
    ///
    /// `Internal` when the store fails mid-run.
    pub async fn import_batch(&self, records: Vec<RecordInput>) -> Result<ImportSummary> {
        let mut invalid = ImportSummary::default();
        let mut accepted = Vec::with_capacity(records.len());
        for record in records {
            let mut record = normalize_record(record);
            let country_name = validate_record(
                &record.code,
                &record.country_iso2,
                record.country_name.as_deref(),
                &self.countries,
            )
            .and_then(|()| {
                self.countries
                    .resolve_name(&record.country_iso2, record.country_name.as_deref())
            });
            match country_name {
                Ok(name) => {
                    record.country_name = Some(name);
                    accepted.push(record);
                }
                Err(err) => {
                    warn!(code = %record.code, error = %err, "invalid import record, skipping");
                    if is_headquarters_code(&record.code) {
                        invalid.hq_skipped += 1;
                    } else {
                        invalid.branches_skipped += 1;
                    }
                }
            }
        }

        let mut summary = reconcile(&self.store, accepted).await?;
        summary.hq_skipped += invalid.hq_skipped;
        summary.branches_skipped += invalid.branches_skipped;
        Ok(summary)
    }

    /// Headquarters owning `code`, which must be a top-level headquarters
    /// document.
    async fn find_parent(&self, code: &str) -> Result<RegistryDocument> {
        let hq_code = headquarters_code_for(code);
        let parent = self
            .store
            .find_by_code(&hq_code)
            .await?
            .filter(|document| document.is_headquarters);
        match parent {
            Some(parent) => Ok(parent),
            None if is_headquarters_code(code) => {
                Err(Error::NotFound(format!("headquarter not found: {code}")))
            }
            None => Err(missing_parent(code, &hq_code)),
        }
    }
}

fn missing_parent(code: &str, hq_code: &str) -> Error {
    Error::NotFound(format!(
        "can not do any actions with branch {code} because its headquarter {hq_code} is missing"
    ))
}

/// Uppercase the code, ISO2 and country name; drop a blank country name.
fn normalize_record(mut record: RecordInput) -> RecordInput {
    record.code = normalize_code(&record.code);
    record.country_iso2 = normalize_iso2(&record.country_iso2);
    record.country_name = record
        .country_name
        .map(|name| name.trim().to_uppercase())
        .filter(|name| !name.is_empty());
    record
}

/// Branches supplied with a new headquarters must be well-formed branches of
/// it, in its country, each listed once.
fn check_supplied_branches(hq: &RegistryDocument) -> Result<Vec<BranchDocument>> {
    let mut seen = HashSet::new();
    let mut branches = Vec::with_capacity(hq.branches.len());
    for branch in &hq.branches {
        let mut branch = branch.clone();
        branch.code = normalize_code(&branch.code);
        branch.country_iso2 = normalize_iso2(&branch.country_iso2);
        branch.is_headquarters = false;

        validate_code(&branch.code)?;
        if !branch.is_branch_shaped() {
            return Err(Error::BadRequest(format!(
                "supplied branch {} of headquarter {} cannot end with 'XXX'",
                branch.code, hq.code
            )));
        }
        if !shares_prefix(&branch.code, &hq.code) {
            return Err(Error::BadRequest(format!(
                "supplied branch {} does not share the prefix of headquarter {}",
                branch.code, hq.code
            )));
        }
        if branch.country_iso2 != hq.country_iso2 {
            return Err(Error::BadRequest(format!(
                "supplied branch {} country ISO2 {} does not match headquarter {} country ISO2 {}",
                branch.code, branch.country_iso2, hq.code, hq.country_iso2
            )));
        }
        if !seen.insert(branch.code.clone()) {
            return Err(Error::BadRequest(format!(
                "supplied branch {} is listed more than once",
                branch.code
            )));
        }
        branches.push(branch);
    }
    Ok(branches)
}
