//! Response views
#![allow(clippy::must_use_candidate)]

use serde::{Deserialize, Serialize};

use crate::document::{BranchDocument, RegistryDocument};

/// Detail view returned for a single code.
///
/// Headquarters carry their branch list; branches carry the country name of
/// their headquarters and no list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedRecordView {
    pub address: String,
    pub bank_name: String,
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    pub country_name: String,
    #[serde(rename = "isHeadquarter")]
    pub is_headquarters: bool,
    #[serde(rename = "swiftCode")]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<FlatRecordView>>,
}

/// One entry of a list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRecordView {
    pub address: String,
    pub bank_name: String,
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    #[serde(rename = "isHeadquarter")]
    pub is_headquarters: bool,
    #[serde(rename = "swiftCode")]
    pub code: String,
}

/// Country-aggregated view: every headquarters of a country followed by
/// their branches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecordsView {
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    pub country_name: String,
    #[serde(rename = "swiftCodes")]
    pub records: Vec<FlatRecordView>,
}

impl UnifiedRecordView {
    /// Branch view with the owning headquarters' country name.
    pub fn branch(branch: &BranchDocument, country_name: impl Into<String>) -> Self {
        Self {
            address: branch.address.clone(),
            bank_name: branch.bank_name.clone(),
            country_iso2: branch.country_iso2.clone(),
            country_name: country_name.into(),
            is_headquarters: false,
            code: branch.code.clone(),
            branches: None,
        }
    }
}

impl From<RegistryDocument> for UnifiedRecordView {
    fn from(document: RegistryDocument) -> Self {
        let branches: Option<Vec<FlatRecordView>> = document
            .is_headquarters
            .then(|| document.branches.iter().map(FlatRecordView::from).collect());
        Self {
            address: document.address,
            bank_name: document.bank_name,
            country_iso2: document.country_iso2,
            country_name: document.country_name,
            is_headquarters: document.is_headquarters,
            code: document.code,
            branches,
        }
    }
}

impl From<&RegistryDocument> for FlatRecordView {
    fn from(document: &RegistryDocument) -> Self {
        Self {
            address: document.address.clone(),
            bank_name: document.bank_name.clone(),
            country_iso2: document.country_iso2.clone(),
            is_headquarters: document.is_headquarters,
            code: document.code.clone(),
        }
    }
}

impl From<&BranchDocument> for FlatRecordView {
    fn from(branch: &BranchDocument) -> Self {
        Self {
            address: branch.address.clone(),
            bank_name: branch.bank_name.clone(),
            country_iso2: branch.country_iso2.clone(),
            is_headquarters: false,
            code: branch.code.clone(),
        }
    }
}
