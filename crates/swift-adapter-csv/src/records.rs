//! SWIFT code batch reader
//!
//! Turns a CSV export of SWIFT codes into normalized, validated and
//! deduplicated [`RecordInput`] values ready for bulk import. Rows that fail
//! validation are skipped and reported, never fatal; only an unreadable source
//! or a header without a SWIFT code column aborts the read.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use swift_model::{RecordInput, is_headquarters_code};
use swift_validation::{CountryTable, normalize_code, normalize_iso2, validate_record};
use tracing::{debug, info, warn};

use crate::config::CsvConfig;
use crate::errors::{CsvError, CsvResult};
use crate::header::HeaderIndex;

pub const SWIFT_CODE_COLUMN: &str = "SWIFT CODE";
pub const COUNTRY_ISO2_COLUMN: &str = "COUNTRY ISO2 CODE";
pub const BANK_NAME_COLUMN: &str = "NAME";
pub const ADDRESS_COLUMN: &str = "ADDRESS";
pub const COUNTRY_NAME_COLUMN: &str = "COUNTRY NAME";

/// Header spellings seen in real exports.
const SWIFT_CODE_ALIASES: &[(&str, &str)] = &[
    ("SWIFTCODE", SWIFT_CODE_COLUMN),
    ("SWIFT CODES", SWIFT_CODE_COLUMN),
    ("SWIFT_CODE", SWIFT_CODE_COLUMN),
    ("SWIFT C0DE", SWIFT_CODE_COLUMN),
];

/// A row left out of the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-indexed line in the source
    pub line: usize,
    /// Normalized code as read (may be empty)
    pub code: String,
    pub reason: String,
}

/// Outcome of reading one batch file.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    /// Valid records, first occurrence of each code, in source order
    pub records: Vec<RecordInput>,
    pub rejected: Vec<RejectedRow>,
    /// Rows dropped because their code appeared earlier
    pub duplicates: usize,
}

impl ParseReport {
    pub fn headquarters_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_headquarters).count()
    }

    pub fn branch_count(&self) -> usize {
        self.records.len() - self.headquarters_count()
    }
}

/// Reader for SWIFT code batch files.
#[derive(Debug, Clone)]
pub struct SwiftCodeReader<'a> {
    config: CsvConfig,
    countries: &'a CountryTable,
}

impl<'a> SwiftCodeReader<'a> {
    /// Create a reader validating against `countries`
    pub fn new(countries: &'a CountryTable) -> Self {
        Self {
            config: CsvConfig::default(),
            countries,
        }
    }

    /// Use a custom CSV configuration
    pub fn with_config(mut self, config: CsvConfig) -> Self {
        self.config = config;
        self
    }

    /// Read a batch file from disk.
    pub fn read_path(&self, path: impl AsRef<Path>) -> CsvResult<ParseReport> {
        let path = path.as_ref();
        info!(path = %path.display(), "reading SWIFT code batch");
        let file = File::open(path)?;
        self.read(file)
    }

    /// Read a batch from any CSV source.
    pub fn read<R: Read>(&self, source: R) -> CsvResult<ParseReport> {
        if !self.config.has_header {
            return Err(CsvError::unsupported("SWIFT code batches require a header row"));
        }

        let mut reader = self.config.reader(source);
        let mut rows = reader.records();
        let header = rows.next().ok_or(CsvError::Empty)??;
        let index = HeaderIndex::new(&header, SWIFT_CODE_ALIASES);
        index.require(&[SWIFT_CODE_COLUMN])?;

        let mut report = ParseReport::default();
        let mut seen = HashSet::new();
        for (row, record) in rows.enumerate() {
            let record = record?;
            let line = row + 2;
            match self.extract(&index, &record) {
                Ok(input) => {
                    if seen.insert(input.code.clone()) {
                        report.records.push(input);
                    } else {
                        debug!(line, code = %input.code, "duplicate SWIFT code in batch");
                        report.duplicates += 1;
                    }
                }
                Err(rejected) => {
                    warn!(line, code = %rejected.0, reason = %rejected.1, "skipping SWIFT code row");
                    report.rejected.push(RejectedRow {
                        line,
                        code: rejected.0,
                        reason: rejected.1,
                    });
                }
            }
        }

        info!(
            records = report.records.len(),
            rejected = report.rejected.len(),
            duplicates = report.duplicates,
            "SWIFT code batch read"
        );
        Ok(report)
    }

    /// Normalize and validate one row; on rejection return `(code, reason)`.
    fn extract(
        &self,
        index: &HeaderIndex,
        record: &StringRecord,
    ) -> Result<RecordInput, (String, String)> {
        let cell = |name: &str| index.cell(record, name).unwrap_or_default();

        let code = normalize_code(cell(SWIFT_CODE_COLUMN));
        let iso2 = normalize_iso2(cell(COUNTRY_ISO2_COLUMN));
        let bank_name = cell(BANK_NAME_COLUMN).trim().to_uppercase();
        let address = cell(ADDRESS_COLUMN).trim().to_uppercase();
        let country_name = cell(COUNTRY_NAME_COLUMN).trim().to_uppercase();
        let supplied_name = (!country_name.is_empty()).then_some(country_name.as_str());

        if let Err(err) = validate_record(&code, &iso2, supplied_name, self.countries) {
            return Err((code, err.to_string()));
        }
        let country_name = match self.countries.resolve_name(&iso2, supplied_name) {
            Ok(name) => name,
            Err(err) => return Err((code, err.to_string())),
        };

        let is_headquarters = is_headquarters_code(&code);
        let mut input = RecordInput::new(code, iso2, is_headquarters)
            .with_bank_name(bank_name)
            .with_address(address)
            .with_country_name(country_name);
        if is_headquarters {
            input = input.with_branches(Vec::new());
        }
        Ok(input)
    }
}
