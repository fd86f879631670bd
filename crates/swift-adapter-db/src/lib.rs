//! # swift-adapter-db
//!
//! Persistent store for SWIFT code registry documents.
//!
//! Headquarters are stored as top-level documents keyed by code, each
//! embedding its branches. Writes are conditional so concurrent requests and
//! imports never overwrite an existing headquarters or duplicate a branch.
//!
//! Two backends sit behind [`DbConnection`]: libsql (local file, in-memory or
//! remote) and a concurrent in-process map.

pub mod connection;
pub mod memory;
mod pool;
pub mod schema;
pub mod store;

pub use connection::{ConnectionConfig, DbConnection};
pub use memory::MemoryStore;
pub use store::{CountFilter, PushOutcome, RegistryStore};

use thiserror::Error;

/// Errors that can occur when working with the store.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {details}")]
    Config { details: String },

    #[error("Connection error: {details}")]
    Connection { details: String },

    #[error("Libsql error during {context}: {source}")]
    Libsql {
        context: String,
        #[source]
        source: libsql::Error,
    },

    #[error("SQL error executing `{statement}`: {source}")]
    Sql {
        statement: String,
        #[source]
        source: libsql::Error,
    },

    #[error("Document with SWIFT code {code} already exists")]
    DuplicateKey { code: String },

    #[error("Malformed document {code}: {details}")]
    Decode { code: String, details: String },
}

pub type Result<T> = std::result::Result<T, Error>;
