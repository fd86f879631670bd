#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # swift-validation
//!
//! Format rules for institution codes and ISO2 country codes, and lookups
//! against the country reference table.
//!
//! Everything here is pure: no I/O, no store access. The same checks are
//! shared by live writes and by bulk import.
//!
//! ## Example Usage
//!
//! ```rust
//! use swift_validation::{CountryTable, validate_code, validate_suffix_consistency};
//!
//! validate_code("AAAABBB1XXX").unwrap();
//! validate_suffix_consistency("AAAABBB1XXX", true).unwrap();
//!
//! let mut countries = CountryTable::new();
//! countries.insert("PL", "Poland");
//! countries.validate_name_match("PL", "poland").unwrap();
//! assert!(countries.validate_exists("DE").is_err());
//! ```

pub mod codes;
pub mod countries;

pub use codes::{
    normalize_code, normalize_iso2, validate_code, validate_iso2, validate_suffix_consistency,
};
pub use countries::{CountryTable, validate_exists, validate_name_match};

use thiserror::Error;

/// Format and reference-data violations.
///
/// Every variant is a malformed-input error; none of them depends on the
/// state of the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("missing SWIFT code")]
    MissingCode,

    #[error("SWIFT code '{code}' must be 8 or 11 characters long, got {length}")]
    InvalidCodeLength { code: String, length: usize },

    #[error("SWIFT code '{code}' must contain only letters and digits")]
    InvalidCodeCharacters { code: String },

    #[error("country ISO2 '{iso2}' must be exactly two uppercase letters")]
    InvalidIso2 { iso2: String },

    #[error("HQ SWIFT code '{code}' must end with 'XXX'")]
    HeadquartersSuffixRequired { code: String },

    #[error("branch SWIFT code '{code}' cannot end with 'XXX'")]
    BranchSuffixForbidden { code: String },

    #[error("country ISO2 '{iso2}' not found")]
    UnknownCountry { iso2: String },

    #[error("country name '{name}' does not match ISO2 '{iso2}' (expected '{expected}')")]
    CountryNameMismatch {
        iso2: String,
        name: String,
        expected: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Validate the code, ISO2 and country name of one incoming record.
///
/// `country_name` is checked only when present and non-blank.
///
/// # Errors
///
/// Returns the first rule the record violates.
pub fn validate_record(
    code: &str,
    iso2: &str,
    country_name: Option<&str>,
    countries: &CountryTable,
) -> Result<()> {
    validate_code(code)?;
    validate_iso2(iso2)?;
    countries.validate_exists(iso2)?;
    match country_name.map(str::trim) {
        Some(name) if !name.is_empty() => countries.validate_name_match(iso2, name),
        _ => Ok(()),
    }
}
