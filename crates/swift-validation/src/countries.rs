//! Country reference table
//!
//! ISO2 → canonical name. Keys and names are stored uppercase; lookups by
//! name are case-insensitive.

use std::collections::HashMap;

use swift_model::Country;
use tracing::debug;

use crate::{Error, Result};

/// Read-only ISO2 → country mapping loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct CountryTable {
    countries: HashMap<String, Country>,
}

impl CountryTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a country; both parts are trimmed and uppercased.
    pub fn insert(&mut self, iso2: impl AsRef<str>, name: impl AsRef<str>) {
        let iso2 = iso2.as_ref().trim().to_uppercase();
        let name = name.as_ref().trim().to_uppercase();
        self.countries
            .insert(iso2.clone(), Country::new(iso2, name));
    }

    #[must_use]
    pub fn get(&self, iso2: &str) -> Option<&Country> {
        self.countries.get(iso2)
    }

    /// Canonical name for `iso2`.
    #[must_use]
    pub fn name_of(&self, iso2: &str) -> Option<&str> {
        self.get(iso2).map(|country| country.name.as_str())
    }

    #[must_use]
    pub fn contains(&self, iso2: &str) -> bool {
        self.countries.contains_key(iso2)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Check that `iso2` is a known country.
    ///
    /// # Errors
    ///
    /// `UnknownCountry` when the code is absent from the table.
    pub fn validate_exists(&self, iso2: &str) -> Result<&Country> {
        self.get(iso2).ok_or_else(|| Error::UnknownCountry {
            iso2: iso2.to_string(),
        })
    }

    /// Check that `name` is the canonical name of `iso2`, ignoring case.
    ///
    /// # Errors
    ///
    /// `UnknownCountry` for an unknown ISO2, `CountryNameMismatch` when the
    /// names differ.
    pub fn validate_name_match(&self, iso2: &str, name: &str) -> Result<()> {
        let country = self.validate_exists(iso2)?;
        if country.name.eq_ignore_ascii_case(name.trim()) {
            return Ok(());
        }
        debug!(iso2, name, expected = %country.name, "country name mismatch");
        Err(Error::CountryNameMismatch {
            iso2: iso2.to_string(),
            name: name.to_string(),
            expected: country.name.clone(),
        })
    }

    /// Resolve the name to store for `iso2`: the supplied one when it matches,
    /// the canonical one when none is supplied.
    ///
    /// # Errors
    ///
    /// Same as [`CountryTable::validate_name_match`].
    pub fn resolve_name(&self, iso2: &str, name: Option<&str>) -> Result<String> {
        let country = self.validate_exists(iso2)?;
        match name.map(str::trim) {
            Some(name) if !name.is_empty() => {
                self.validate_name_match(iso2, name)?;
                Ok(country.name.clone())
            }
            _ => Ok(country.name.clone()),
        }
    }
}

impl FromIterator<(String, String)> for CountryTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (iso2, name) in iter {
            table.insert(iso2, name);
        }
        table
    }
}

/// Check that `iso2` exists in `countries`.
///
/// # Errors
///
/// See [`CountryTable::validate_exists`].
pub fn validate_exists(iso2: &str, countries: &CountryTable) -> Result<()> {
    countries.validate_exists(iso2).map(|_| ())
}

/// Check that `name` matches the canonical name of `iso2` in `countries`.
///
/// # Errors
///
/// See [`CountryTable::validate_name_match`].
pub fn validate_name_match(iso2: &str, name: &str, countries: &CountryTable) -> Result<()> {
    countries.validate_name_match(iso2, name)
}
