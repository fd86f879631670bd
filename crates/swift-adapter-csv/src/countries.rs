//! Country reference loader
//!
//! Reads an ISO2 → name table from CSV. The deployment ships one table,
//! embedded at compile time; a different file can be supplied by path.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use swift_validation::CountryTable;
use tracing::{debug, warn};

use crate::config::CsvConfig;
use crate::errors::{CsvError, CsvResult};
use crate::header::HeaderIndex;

/// ISO2 column name
pub const ISO2_COLUMN: &str = "ISO2";
/// Country name column name
pub const NAME_COLUMN: &str = "NAME";

const EMBEDDED_COUNTRIES: &str = include_str!("../resources/countries.csv");

/// Load the reference table shipped with the deployment.
pub fn load() -> CsvResult<CountryTable> {
    load_from_reader(EMBEDDED_COUNTRIES.as_bytes(), &CsvConfig::default())
}

/// Load a reference table from a CSV file.
pub fn load_from_path(path: impl AsRef<Path>) -> CsvResult<CountryTable> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading country reference data");
    let file = File::open(path)?;
    load_from_reader(file, &CsvConfig::default())
}

/// Load a reference table from any CSV source with `ISO2` and `NAME` columns.
pub fn load_from_reader<R: Read>(source: R, config: &CsvConfig) -> CsvResult<CountryTable> {
    if !config.has_header {
        return Err(CsvError::unsupported(
            "country reference data requires a header row",
        ));
    }

    let mut reader = config.reader(source);
    let mut records = reader.records();
    let header = records.next().ok_or(CsvError::Empty)??;
    let index = HeaderIndex::new(&header, &[]);
    index.require(&[ISO2_COLUMN, NAME_COLUMN])?;

    let mut table = CountryTable::new();
    for (row, record) in records.enumerate() {
        let record = record?;
        let line = row + 2;
        let iso2 = index.cell(&record, ISO2_COLUMN).unwrap_or_default().trim();
        let name = index.cell(&record, NAME_COLUMN).unwrap_or_default().trim();
        if iso2.is_empty() || name.is_empty() {
            warn!(line, "skipping country row with empty ISO2 or name");
            continue;
        }
        table.insert(iso2, name);
    }

    debug!(countries = table.len(), "country reference data loaded");
    Ok(table)
}
