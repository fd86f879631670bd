//! Table layout and row mapping for the libsql backend.
//!
//! One row per top-level document. Embedded branches live in a JSON array
//! column so that every branch mutation is a single conditional `UPDATE`.

use libsql::Value;
use swift_model::{BranchDocument, RegistryDocument};

use crate::{Error, Result};

pub const TABLE: &str = "swift_codes";

pub const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS swift_codes (
    swift_code TEXT PRIMARY KEY NOT NULL,
    bank_name TEXT NOT NULL,
    address TEXT NOT NULL,
    country_iso2 TEXT NOT NULL,
    country_name TEXT NOT NULL,
    is_headquarter INTEGER NOT NULL,
    branches TEXT NOT NULL DEFAULT '[]'
)";

pub const CREATE_COUNTRY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_swift_codes_country_iso2 ON swift_codes (country_iso2)";

pub const SELECT_BY_CODE: &str = "SELECT swift_code, bank_name, address, country_iso2, country_name, is_headquarter, branches
FROM swift_codes WHERE swift_code = ?1";

pub const SELECT_BY_COUNTRY: &str = "SELECT swift_code, bank_name, address, country_iso2, country_name, is_headquarter, branches
FROM swift_codes WHERE country_iso2 = ?1 ORDER BY swift_code";

pub const INSERT_IF_ABSENT: &str = "INSERT INTO swift_codes
    (swift_code, bank_name, address, country_iso2, country_name, is_headquarter, branches)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
ON CONFLICT (swift_code) DO NOTHING";

pub const PUSH_BRANCH_IF_ABSENT: &str = "UPDATE swift_codes
SET branches = json_insert(branches, '$[#]', json(?2))
WHERE swift_code = ?1
  AND NOT EXISTS (
    SELECT 1 FROM json_each(swift_codes.branches) AS entry
    WHERE json_extract(entry.value, '$.swiftCode') = ?3
  )";

pub const PULL_BRANCH: &str = "UPDATE swift_codes
SET branches = (
    SELECT json_group_array(json(entry.value))
    FROM json_each(swift_codes.branches) AS entry
    WHERE json_extract(entry.value, '$.swiftCode') <> ?2
)
WHERE swift_code = ?1
  AND EXISTS (
    SELECT 1 FROM json_each(swift_codes.branches) AS entry
    WHERE json_extract(entry.value, '$.swiftCode') = ?2
  )";

pub const DELETE_BY_CODE_OR_PREFIX: &str =
    "DELETE FROM swift_codes WHERE swift_code = ?1 OR substr(swift_code, 1, 8) = ?2";

pub const COUNT_ALL: &str = "SELECT COUNT(*) FROM swift_codes";
pub const COUNT_BY_CODE: &str = "SELECT COUNT(*) FROM swift_codes WHERE swift_code = ?1";
pub const COUNT_BY_COUNTRY: &str = "SELECT COUNT(*) FROM swift_codes WHERE country_iso2 = ?1";

/// Statements applied by [`crate::DbConnection::initialize`].
pub fn ddl() -> [&'static str; 2] {
    [CREATE_TABLE, CREATE_COUNTRY_INDEX]
}

/// Bind values for [`INSERT_IF_ABSENT`].
pub fn insert_params(document: &RegistryDocument) -> Result<Vec<Value>> {
    Ok(vec![
        Value::Text(document.code.clone()),
        Value::Text(document.bank_name.clone()),
        Value::Text(document.address.clone()),
        Value::Text(document.country_iso2.clone()),
        Value::Text(document.country_name.clone()),
        Value::Integer(i64::from(document.is_headquarters)),
        Value::Text(encode_branches(&document.code, &document.branches)?),
    ])
}

/// Bind values for [`PUSH_BRANCH_IF_ABSENT`].
pub fn push_params(hq_code: &str, branch: &BranchDocument) -> Result<Vec<Value>> {
    let json = serde_json::to_string(branch).map_err(|err| Error::Decode {
        code: branch.code.clone(),
        details: err.to_string(),
    })?;
    Ok(vec![
        Value::Text(hq_code.to_string()),
        Value::Text(json),
        Value::Text(branch.code.clone()),
    ])
}

pub fn encode_branches(code: &str, branches: &[BranchDocument]) -> Result<String> {
    serde_json::to_string(branches).map_err(|err| Error::Decode {
        code: code.to_string(),
        details: err.to_string(),
    })
}

pub fn decode_branches(code: &str, json: &str) -> Result<Vec<BranchDocument>> {
    serde_json::from_str(json).map_err(|err| Error::Decode {
        code: code.to_string(),
        details: format!("invalid branches column: {err}"),
    })
}

/// Map a row selected with the column order of [`SELECT_BY_CODE`].
pub fn decode_row(row: &libsql::Row) -> Result<RegistryDocument> {
    let code = text(row, 0, "swift_code", "")?;
    let bank_name = text(row, 1, "bank_name", &code)?;
    let address = text(row, 2, "address", &code)?;
    let country_iso2 = text(row, 3, "country_iso2", &code)?;
    let country_name = text(row, 4, "country_name", &code)?;
    let is_headquarters = integer(row, 5, "is_headquarter", &code)? != 0;
    let branches = decode_branches(&code, &text(row, 6, "branches", &code)?)?;

    Ok(RegistryDocument {
        code,
        bank_name,
        address,
        country_iso2,
        country_name,
        is_headquarters,
        branches,
    })
}

fn text(row: &libsql::Row, idx: i32, column: &str, code: &str) -> Result<String> {
    match value(row, idx, column, code)? {
        Value::Text(text) => Ok(text),
        Value::Null => Ok(String::new()),
        other => Err(Error::Decode {
            code: code.to_string(),
            details: format!("column {column} holds {other:?}, expected text"),
        }),
    }
}

fn integer(row: &libsql::Row, idx: i32, column: &str, code: &str) -> Result<i64> {
    match value(row, idx, column, code)? {
        Value::Integer(value) => Ok(value),
        other => Err(Error::Decode {
            code: code.to_string(),
            details: format!("column {column} holds {other:?}, expected integer"),
        }),
    }
}

fn value(row: &libsql::Row, idx: i32, column: &str, code: &str) -> Result<Value> {
    row.get_value(idx).map_err(|err| Error::Decode {
        code: code.to_string(),
        details: format!("column {column}: {err}"),
    })
}
