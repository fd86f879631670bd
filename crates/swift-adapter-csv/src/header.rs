//! Header normalization and column lookup

use std::collections::HashMap;

use csv::StringRecord;

use crate::errors::{CsvError, CsvResult};

/// Column positions keyed by normalized (trimmed, uppercased) header name.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    /// Index a header row, folding each alias onto its canonical name.
    ///
    /// When two cells resolve to the same name the first one wins.
    pub fn new(header: &StringRecord, aliases: &[(&str, &str)]) -> Self {
        let mut positions = HashMap::new();
        for (idx, cell) in header.iter().enumerate() {
            let mut name = sanitize(cell);
            if let Some((_, canonical)) = aliases.iter().find(|(alias, _)| *alias == name) {
                name = (*canonical).to_string();
            }
            positions.entry(name).or_insert(idx);
        }
        Self { positions }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Fail unless every name in `required` is present.
    pub fn require(&self, required: &[&str]) -> CsvResult<()> {
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|name| !self.positions.contains_key(*name))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CsvError::missing_columns(missing))
        }
    }

    /// Cell of `record` under column `name`, if both exist.
    pub fn cell<'r>(&self, record: &'r StringRecord, name: &str) -> Option<&'r str> {
        self.position(name).and_then(|idx| record.get(idx))
    }
}

/// Trim and uppercase a header cell, dropping a UTF-8 byte order mark.
pub fn sanitize(cell: &str) -> String {
    cell.trim_start_matches('\u{feff}').trim().to_uppercase()
}
