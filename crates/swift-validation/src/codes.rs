//! Institution code and ISO2 format rules

use std::sync::LazyLock;

use regex::Regex;
use swift_model::{FULL_CODE_LEN, SHORT_CODE_LEN, is_headquarters_code};

use crate::{Error, Result};

static ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("alphanumeric pattern compiles"));

static ISO2: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").expect("ISO2 pattern compiles"));

/// Trim and uppercase an institution code.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Trim and uppercase an ISO2 country code.
#[must_use]
pub fn normalize_iso2(iso2: &str) -> String {
    iso2.trim().to_ascii_uppercase()
}

/// Check that `code` is 8 or 11 alphanumeric characters.
///
/// # Errors
///
/// `MissingCode` for empty input, `InvalidCodeLength` or
/// `InvalidCodeCharacters` otherwise.
pub fn validate_code(code: &str) -> Result<()> {
    if code.is_empty() {
        return Err(Error::MissingCode);
    }

    let length = code.chars().count();
    if length != SHORT_CODE_LEN && length != FULL_CODE_LEN {
        return Err(Error::InvalidCodeLength {
            code: code.to_string(),
            length,
        });
    }

    if !ALPHANUMERIC.is_match(code) {
        return Err(Error::InvalidCodeCharacters {
            code: code.to_string(),
        });
    }

    Ok(())
}

/// Check that `iso2` is exactly two uppercase ASCII letters.
///
/// # Errors
///
/// `InvalidIso2` when the value is not of that shape.
pub fn validate_iso2(iso2: &str) -> Result<()> {
    if ISO2.is_match(iso2) {
        Ok(())
    } else {
        Err(Error::InvalidIso2 {
            iso2: iso2.to_string(),
        })
    }
}

/// Check the declared role of a code against its `XXX` suffix.
///
/// # Errors
///
/// `HeadquartersSuffixRequired` when a headquarters lacks the suffix,
/// `BranchSuffixForbidden` when a branch carries it.
pub fn validate_suffix_consistency(code: &str, declared_is_headquarters: bool) -> Result<()> {
    match (declared_is_headquarters, is_headquarters_code(code)) {
        (true, false) => Err(Error::HeadquartersSuffixRequired {
            code: code.to_string(),
        }),
        (false, true) => Err(Error::BranchSuffixForbidden {
            code: code.to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_code_lengths() {
        assert!(validate_code("ABCDEFGH").is_ok());
        assert!(validate_code("ABCDEFGHXXX").is_ok());
        assert!(matches!(
            validate_code("ABCDEFG"),
            Err(Error::InvalidCodeLength { length: 7, .. })
        ));
        assert!(matches!(
            validate_code("ABCDEFGHG"),
            Err(Error::InvalidCodeLength { length: 9, .. })
        ));
        assert!(matches!(
            validate_code("ABCDEFGHIJKL"),
            Err(Error::InvalidCodeLength { length: 12, .. })
        ));
        assert_eq!(validate_code(""), Err(Error::MissingCode));
    }

    #[test]
    fn test_validate_code_characters() {
        assert!(validate_code("abcdefgh123").is_ok());
        assert!(matches!(
            validate_code("ABCD-FGHXXX"),
            Err(Error::InvalidCodeCharacters { .. })
        ));
        assert!(matches!(
            validate_code("ABCD FGH"),
            Err(Error::InvalidCodeCharacters { .. })
        ));
    }

    #[test]
    fn test_validate_iso2() {
        assert!(validate_iso2("US").is_ok());
        assert!(validate_iso2("USA").is_err());
        assert!(validate_iso2("U1").is_err());
        assert!(validate_iso2("us").is_err());
        assert!(validate_iso2("").is_err());
    }

    #[test]
    fn test_validate_suffix_consistency() {
        assert!(validate_suffix_consistency("ABCDEFGHXXX", true).is_ok());
        assert!(validate_suffix_consistency("ABCDEFGHABC", false).is_ok());
        assert!(matches!(
            validate_suffix_consistency("ABCDEFGHABC", true),
            Err(Error::HeadquartersSuffixRequired { .. })
        ));
        assert!(matches!(
            validate_suffix_consistency("ABCDEFGHXXX", false),
            Err(Error::BranchSuffixForbidden { .. })
        ));
        assert!(validate_suffix_consistency("ABCDEXXX", true).is_ok());
        assert!(matches!(
            validate_suffix_consistency("ABCDEXXX", false),
            Err(Error::BranchSuffixForbidden { .. })
        ));
    }

    #[test]
    fn test_normalization() {
        assert_eq!(normalize_code("  aaaabbb1xxx "), "AAAABBB1XXX");
        assert_eq!(normalize_iso2("pl"), "PL");
    }
}
