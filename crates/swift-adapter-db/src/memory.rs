//! Concurrent in-process document map.
//!
//! Each conditional operation holds the shard lock of the document it
//! touches, so pushes and pulls on one headquarters never interleave.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use swift_model::{BranchDocument, RegistryDocument, code_prefix};

use crate::store::{CountFilter, PushOutcome};
use crate::{Error, Result};

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: DashMap<String, RegistryDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_by_code(&self, code: &str) -> Option<RegistryDocument> {
        self.documents.get(code).map(|document| document.value().clone())
    }

    pub fn find_by_country(&self, iso2: &str) -> Vec<RegistryDocument> {
        let mut documents: Vec<RegistryDocument> = self
            .documents
            .iter()
            .filter(|entry| entry.country_iso2 == iso2)
            .map(|entry| entry.value().clone())
            .collect();
        documents.sort_by(|a, b| a.code.cmp(&b.code));
        documents
    }

    pub fn insert(&self, document: &RegistryDocument) -> Result<()> {
        match self.documents.entry(document.code.clone()) {
            Entry::Occupied(_) => Err(Error::DuplicateKey {
                code: document.code.clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(document.clone());
                Ok(())
            }
        }
    }

    pub fn push_branch_if_absent(&self, hq_code: &str, branch: &BranchDocument) -> PushOutcome {
        let Some(mut document) = self.documents.get_mut(hq_code) else {
            return PushOutcome::ParentMissing;
        };
        if document.has_branch(&branch.code) {
            return PushOutcome::Duplicate;
        }
        document.branches.push(branch.clone());
        PushOutcome::Pushed
    }

    pub fn pull_branch(&self, hq_code: &str, branch_code: &str) -> bool {
        let Some(mut document) = self.documents.get_mut(hq_code) else {
            return false;
        };
        let before = document.branches.len();
        document.branches.retain(|branch| branch.code != branch_code);
        document.branches.len() != before
    }

    pub fn delete_by_code_or_prefix(&self, code: &str, prefix: &str) -> u64 {
        let keys: Vec<String> = self
            .documents
            .iter()
            .filter(|entry| entry.key() == code || code_prefix(entry.key()) == prefix)
            .map(|entry| entry.key().clone())
            .collect();
        let removed = keys
            .iter()
            .filter(|key| self.documents.remove(key.as_str()).is_some())
            .count();
        removed as u64
    }

    pub fn count(&self, filter: CountFilter<'_>) -> u64 {
        let count = match filter {
            CountFilter::All => self.documents.len(),
            CountFilter::Code(code) => usize::from(self.documents.contains_key(code)),
            CountFilter::Country(iso2) => self
                .documents
                .iter()
                .filter(|entry| entry.country_iso2 == iso2)
                .count(),
        };
        count as u64
    }
}
