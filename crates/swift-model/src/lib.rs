#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # swift-model
//!
//! Document, request and view structures for the SWIFT code registry.
//!
//! Headquarters are stored as top-level documents that embed their branches.
//! The role of a code is never stored independently of its structure: a code
//! is a headquarters exactly when it is an 11-character code ending in `XXX`,
//! and a branch belongs to the headquarters sharing its first 8 characters.

/// Structural helpers for institution codes (prefix, suffix, parent code).
pub mod code;
/// Country reference entry.
pub mod country;
/// Persisted document shapes.
pub mod document;
/// Write-side record input used by `add` and bulk import.
pub mod request;
/// Bulk import accounting.
pub mod summary;
/// Read-side response views.
pub mod view;

pub use code::{
    FULL_CODE_LEN, HEADQUARTERS_SUFFIX, PREFIX_LEN, SHORT_CODE_LEN, code_prefix,
    headquarters_code_for, is_headquarters_code, shares_prefix,
};
pub use country::Country;
pub use document::{BranchDocument, RegistryDocument};
pub use request::RecordInput;
pub use summary::ImportSummary;
pub use view::{CountryRecordsView, FlatRecordView, UnifiedRecordView};
