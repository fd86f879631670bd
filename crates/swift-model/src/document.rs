//! Persisted document shapes
#![allow(clippy::must_use_candidate)]

use serde::{Deserialize, Serialize};

use crate::code::is_headquarters_code;

/// A top-level registry document.
///
/// Only headquarters are stored at the top level; each one embeds the
/// branches sharing its 8-character prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryDocument {
    #[serde(rename = "swiftCode")]
    pub code: String,
    pub bank_name: String,
    pub address: String,
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    pub country_name: String,
    #[serde(rename = "isHeadquarter")]
    pub is_headquarters: bool,
    #[serde(default)]
    pub branches: Vec<BranchDocument>,
}

/// A branch embedded in its headquarters document.
///
/// The country name is not stored; it is inherited from the headquarters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchDocument {
    #[serde(rename = "swiftCode")]
    pub code: String,
    pub bank_name: String,
    pub address: String,
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    #[serde(rename = "isHeadquarter", default)]
    pub is_headquarters: bool,
}

impl RegistryDocument {
    /// Headquarters document with an empty branch list.
    pub fn headquarters(
        code: impl Into<String>,
        bank_name: impl Into<String>,
        address: impl Into<String>,
        country_iso2: impl Into<String>,
        country_name: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            bank_name: bank_name.into(),
            address: address.into(),
            country_iso2: country_iso2.into(),
            country_name: country_name.into(),
            is_headquarters: true,
            branches: Vec::new(),
        }
    }

    /// Find an embedded branch by exact code.
    pub fn branch(&self, code: &str) -> Option<&BranchDocument> {
        self.branches.iter().find(|branch| branch.code == code)
    }

    pub fn has_branch(&self, code: &str) -> bool {
        self.branch(code).is_some()
    }
}

impl BranchDocument {
    pub fn new(
        code: impl Into<String>,
        bank_name: impl Into<String>,
        address: impl Into<String>,
        country_iso2: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            bank_name: bank_name.into(),
            address: address.into(),
            country_iso2: country_iso2.into(),
            is_headquarters: false,
        }
    }

    /// Whether the code of this entry is branch-shaped.
    pub fn is_branch_shaped(&self) -> bool {
        !is_headquarters_code(&self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_wire_names() {
        let mut hq = RegistryDocument::headquarters(
            "AAAABBB1XXX",
            "BANK",
            "MAIN STREET 1",
            "PL",
            "POLAND",
        );
        hq.branches
            .push(BranchDocument::new("AAAABBB1ABC", "BANK", "SIDE STREET 2", "PL"));

        let json = serde_json::to_value(&hq).unwrap();
        assert_eq!(json["swiftCode"], "AAAABBB1XXX");
        assert_eq!(json["countryISO2"], "PL");
        assert_eq!(json["isHeadquarter"], true);
        assert_eq!(json["branches"][0]["swiftCode"], "AAAABBB1ABC");
        assert_eq!(json["branches"][0]["isHeadquarter"], false);
        assert!(json["branches"][0].get("countryName").is_none());
    }

    #[test]
    fn test_missing_branches_field_defaults_to_empty() {
        let json = r#"{
            "swiftCode": "AAAABBB1XXX",
            "bankName": "BANK",
            "address": "",
            "countryISO2": "PL",
            "countryName": "POLAND",
            "isHeadquarter": true
        }"#;
        let doc: RegistryDocument = serde_json::from_str(json).unwrap();
        assert!(doc.branches.is_empty());
        assert!(!doc.has_branch("AAAABBB1ABC"));
    }
}
