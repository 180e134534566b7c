//! Collection and resource name validation.
//!
//! Names are used verbatim as single path segments beneath the store root:
//! - Must be non-empty
//! - Must not contain `/`, `\` or NUL
//! - Must not be `.` or `..`
//!
//! Anything else (spaces, dots, unicode) is accepted as-is.

use crate::error::{StoreError, StoreResult};

/// Characters that would let a name escape its directory.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '\0'];

/// Validate a collection name.
///
/// ```
/// use jsondb_store::names::validate_collection;
///
/// assert!(validate_collection("users").is_ok());
/// assert!(validate_collection("").is_err());
/// assert!(validate_collection("../etc").is_err());
/// ```
pub fn validate_collection(name: &str) -> StoreResult<()> {
    validate_segment("collection", name)
}

/// Validate a resource name.
pub fn validate_resource(name: &str) -> StoreResult<()> {
    validate_segment("resource", name)
}

fn validate_segment(what: &'static str, name: &str) -> StoreResult<()> {
    if name.is_empty() {
        return Err(StoreError::invalid(what, "name must not be empty"));
    }

    if let Some(ch) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(StoreError::invalid(
            what,
            format!("{name:?} contains forbidden character {ch:?}"),
        ));
    }

    if name == "." || name == ".." {
        return Err(StoreError::invalid(
            what,
            format!("{name:?} is a relative directory reference"),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_are_valid() {
        for name in ["users", "alice", "alice.json", "user 42", "ÿ-data", ".hidden"] {
            assert!(validate_resource(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn empty_is_rejected() {
        let err = validate_collection("").unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("collection"));

        let err = validate_resource("").unwrap_err();
        assert!(err.to_string().contains("resource"));
    }

    #[test]
    fn separators_are_rejected() {
        assert!(validate_collection("a/b").is_err());
        assert!(validate_collection("a\\b").is_err());
        assert!(validate_resource("nul\0byte").is_err());
    }

    #[test]
    fn dot_segments_are_rejected() {
        assert!(validate_collection(".").is_err());
        assert!(validate_collection("..").is_err());
        assert!(validate_resource("...").is_ok());
    }
}
