//! Record input for writes
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)] // with_* setters chain

use serde::{Deserialize, Serialize};

use crate::document::{BranchDocument, RegistryDocument};

/// A record supplied to `add` or to a bulk import.
///
/// `country_name` is optional: when absent the canonical reference name is
/// used. `branches` is only meaningful for headquarters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInput {
    #[serde(rename = "swiftCode")]
    pub code: String,
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    #[serde(rename = "isHeadquarter", default)]
    pub is_headquarters: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<BranchDocument>>,
}

impl RecordInput {
    pub fn new(code: impl Into<String>, country_iso2: impl Into<String>, is_headquarters: bool) -> Self {
        Self {
            code: code.into(),
            country_iso2: country_iso2.into(),
            is_headquarters,
            ..Self::default()
        }
    }

    pub fn headquarters(code: impl Into<String>, country_iso2: impl Into<String>) -> Self {
        Self::new(code, country_iso2, true)
    }

    pub fn branch(code: impl Into<String>, country_iso2: impl Into<String>) -> Self {
        Self::new(code, country_iso2, false)
    }

    pub fn with_bank_name(mut self, bank_name: impl Into<String>) -> Self {
        self.bank_name = bank_name.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_country_name(mut self, country_name: impl Into<String>) -> Self {
        self.country_name = Some(country_name.into());
        self
    }

    pub fn with_branches(mut self, branches: Vec<BranchDocument>) -> Self {
        self.branches = Some(branches);
        self
    }

    /// Headquarters document for this record, taking the given country name.
    pub fn to_headquarters_document(&self, country_name: impl Into<String>) -> RegistryDocument {
        RegistryDocument {
            code: self.code.clone(),
            bank_name: self.bank_name.clone(),
            address: self.address.clone(),
            country_iso2: self.country_iso2.clone(),
            country_name: country_name.into(),
            is_headquarters: true,
            branches: self.branches.clone().unwrap_or_default(),
        }
    }

    /// Embedded branch entry for this record.
    pub fn to_branch_document(&self) -> BranchDocument {
        BranchDocument::new(
            self.code.clone(),
            self.bank_name.clone(),
            self.address.clone(),
            self.country_iso2.clone(),
        )
    }
}
