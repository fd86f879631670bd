//! Institution code structure
//!
//! `BBBB CC LL [BBB]`: bank code, country ISO2, location code and an optional
//! branch code. `XXX` in the branch position marks the headquarters.

/// Branch code reserved for the headquarters' default branch.
pub const HEADQUARTERS_SUFFIX: &str = "XXX";

/// Length of the bank + country + location prefix shared by an institution.
pub const PREFIX_LEN: usize = 8;

/// Length of a code without a branch part.
pub const SHORT_CODE_LEN: usize = 8;

/// Length of a code with a branch part.
pub const FULL_CODE_LEN: usize = 11;

/// Whether `code` is headquarters-shaped. The `XXX` suffix alone decides,
/// for 8- and 11-character codes alike.
#[must_use]
pub fn is_headquarters_code(code: &str) -> bool {
    code.ends_with(HEADQUARTERS_SUFFIX)
}

/// The 8-character institution prefix, or the whole input when it is shorter.
#[must_use]
pub fn code_prefix(code: &str) -> &str {
    code.get(..PREFIX_LEN).unwrap_or(code)
}

/// Code of the headquarters that owns `code`. A headquarters owns itself.
#[must_use]
pub fn headquarters_code_for(code: &str) -> String {
    if is_headquarters_code(code) {
        return code.to_string();
    }
    format!("{}{HEADQUARTERS_SUFFIX}", code_prefix(code))
}

/// Whether both codes belong to the same institution prefix.
#[must_use]
pub fn shares_prefix(left: &str, right: &str) -> bool {
    left.len() >= PREFIX_LEN && right.len() >= PREFIX_LEN && code_prefix(left) == code_prefix(right)
}
