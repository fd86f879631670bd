#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # swift-registry
//!
//! Lookup, add, delete and bulk import of SWIFT codes.
//!
//! [`RegistryService`] owns the registry rules: role by suffix, parent
//! derivation by prefix, country checks against the reference table and
//! cascading deletes. Persistence goes through any
//! [`swift_adapter_db::RegistryStore`].

pub mod import;
pub mod service;

pub use import::reconcile;
pub use service::RegistryService;

use thiserror::Error;

/// Failure category of a registry operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Conflict,
    Internal,
}

impl ErrorKind {
    /// HTTP status a transport layer should answer with.
    #[must_use]
    pub fn status_code(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Internal => 500,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "bad request",
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::Internal => "internal error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by registry operations. Exactly one kind applies to
/// every failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Message without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::NotFound(message)
            | Self::Conflict(message)
            | Self::Internal(message) => message,
        }
    }
}

impl From<swift_validation::Error> for Error {
    fn from(e: swift_validation::Error) -> Self {
        Error::BadRequest(e.to_string())
    }
}

impl From<swift_adapter_db::Error> for Error {
    fn from(e: swift_adapter_db::Error) -> Self {
        match e {
            swift_adapter_db::Error::DuplicateKey { code } => {
                Error::Conflict(format!("SWIFT code {code} already exists"))
            }
            other => Error::Internal(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_bad_requests() {
        let err = Error::from(swift_validation::Error::UnknownCountry {
            iso2: "ZZ".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.message(), "country ISO2 'ZZ' not found");
        assert_eq!(err.to_string(), "bad request: country ISO2 'ZZ' not found");
    }

    #[test]
    fn test_store_errors_map_to_conflict_or_internal() {
        let duplicate = Error::from(swift_adapter_db::Error::DuplicateKey {
            code: "AAAAPLPWXXX".to_string(),
        });
        assert_eq!(duplicate.kind(), ErrorKind::Conflict);
        assert!(duplicate.message().contains("AAAAPLPWXXX"));

        let outage = Error::from(swift_adapter_db::Error::Connection {
            details: "Database is not connected".to_string(),
        });
        assert_eq!(outage.kind(), ErrorKind::Internal);
        assert_eq!(outage.kind().status_code(), 500);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::BadRequest.status_code(), 400);
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::Conflict.status_code(), 409);
        assert_eq!(ErrorKind::NotFound.to_string(), "not found");
    }
}
