//! # swift-adapter-csv
//!
//! CSV adapter for SWIFT code batches and country reference data.
//!
//! This crate reads the two tabular sources the registry consumes: the
//! ISO2 → country name table and bulk-import exports of SWIFT codes.
//!
//! ## Example Usage
//!
//! ```rust
//! use swift_adapter_csv::{SwiftCodeReader, load_countries};
//!
//! let countries = load_countries().unwrap();
//! let data = "SWIFT CODE,COUNTRY ISO2 CODE,NAME,ADDRESS,COUNTRY NAME\n\
//!             AAAAPLPWXXX,PL,BANK,STREET 1,POLAND\n";
//! let report = SwiftCodeReader::new(&countries).read(data.as_bytes()).unwrap();
//! assert_eq!(report.records.len(), 1);
//! ```

pub mod config;
pub mod countries;
pub mod errors;
pub mod header;
pub mod records;

// Re-export main types
pub use config::CsvConfig;
pub use countries::{
    load as load_countries, load_from_path as load_countries_from_path,
    load_from_reader as load_countries_from_reader,
};
pub use errors::{CsvError, CsvResult};
pub use header::HeaderIndex;
pub use records::{ParseReport, RejectedRow, SwiftCodeReader};

pub use errors::CsvError as Error;
pub type Result<T> = CsvResult<T>;
