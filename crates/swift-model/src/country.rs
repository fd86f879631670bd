//! Country reference entry
#![allow(clippy::must_use_candidate)]

use serde::{Deserialize, Serialize};

/// A country with its ISO2 code and canonical (uppercase) name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Country {
    pub iso2: String,
    pub name: String,
}

impl Country {
    pub fn new(iso2: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            iso2: iso2.into(),
            name: name.into(),
        }
    }
}
