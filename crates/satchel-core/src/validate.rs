//! Argument-shape validation shared by every repository.
//!
//! These checks run before any storage is touched, so malformed input is
//! always reported as `IllegalArgument` and never as `NotFound`.

use std::sync::OnceLock;

use regex::Regex;

use crate::defaults::{AUTH_HASH_LEN, MAX_DESC_LEN, MAX_NAME_LEN, MAX_URL_LEN, USERNAME_PATTERN};
use crate::error::{Error, Result};
use crate::models::EntityId;

/// Reject the reserved "no id" value.
pub fn require_id(field: &str, id: EntityId) -> Result<()> {
    if id == 0 {
        return Err(Error::IllegalArgument(format!(
            "{} must be non-zero",
            field
        )));
    }
    Ok(())
}

/// Reject an empty list, and the reserved id inside an otherwise valid list.
pub fn require_ids(field: &str, ids: &[EntityId]) -> Result<()> {
    if ids.is_empty() {
        return Err(Error::IllegalArgument(format!(
            "{} must not be empty",
            field
        )));
    }
    for id in ids {
        require_id(field, *id)?;
    }
    Ok(())
}

/// Name-style fields: non-empty, at most [`MAX_NAME_LEN`] characters.
pub fn require_name(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::IllegalArgument(format!(
            "{} must not be empty",
            field
        )));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(Error::IllegalArgument(format!(
            "{} exceeds {} characters",
            field, MAX_NAME_LEN
        )));
    }
    Ok(())
}

/// Description-style fields: may be empty, at most [`MAX_DESC_LEN`]
/// characters.
pub fn require_description(field: &str, value: &str) -> Result<()> {
    if value.chars().count() > MAX_DESC_LEN {
        return Err(Error::IllegalArgument(format!(
            "{} exceeds {} characters",
            field, MAX_DESC_LEN
        )));
    }
    Ok(())
}

/// URL fields: non-empty, at most [`MAX_URL_LEN`] characters.
pub fn require_url(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::IllegalArgument(format!(
            "{} must not be empty",
            field
        )));
    }
    if value.chars().count() > MAX_URL_LEN {
        return Err(Error::IllegalArgument(format!(
            "{} exceeds {} characters",
            field, MAX_URL_LEN
        )));
    }
    Ok(())
}

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(USERNAME_PATTERN).expect("username pattern is valid"))
}

/// Account usernames must match [`USERNAME_PATTERN`].
pub fn require_username(value: &str) -> Result<()> {
    if !username_regex().is_match(value) {
        return Err(Error::IllegalArgument(format!(
            "username '{}' does not match the required pattern",
            value
        )));
    }
    Ok(())
}

/// Authentication hashes are fixed-width lowercase-insensitive hex strings.
pub fn require_auth_hash(value: &str) -> Result<()> {
    if value.len() != AUTH_HASH_LEN || !value.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::IllegalArgument(format!(
            "authentication hash must be {} hex characters",
            AUTH_HASH_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_id_rejects_zero() {
        assert!(matches!(
            require_id("document id", 0),
            Err(Error::IllegalArgument(_))
        ));
        assert!(require_id("document id", 1).is_ok());
    }

    #[test]
    fn test_require_ids_rejects_empty_and_zero_member() {
        assert!(matches!(
            require_ids("aspect ids", &[]),
            Err(Error::IllegalArgument(_))
        ));
        assert!(matches!(
            require_ids("aspect ids", &[3, 0, 5]),
            Err(Error::IllegalArgument(_))
        ));
        assert!(require_ids("aspect ids", &[3, 5]).is_ok());
    }

    #[test]
    fn test_require_name_bounds() {
        assert!(matches!(
            require_name("name", ""),
            Err(Error::IllegalArgument(_))
        ));
        assert!(require_name("name", "projects").is_ok());
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            require_name("name", &long),
            Err(Error::IllegalArgument(_))
        ));
    }

    #[test]
    fn test_require_description_allows_empty() {
        assert!(require_description("description", "").is_ok());
        let long = "x".repeat(MAX_DESC_LEN + 1);
        assert!(matches!(
            require_description("description", &long),
            Err(Error::IllegalArgument(_))
        ));
    }

    #[test]
    fn test_require_username() {
        assert!(require_username("alice").is_ok());
        assert!(require_username("a.lice-42").is_ok());
        assert!(require_username("ab").is_err());
        assert!(require_username("-leading").is_err());
        assert!(require_username("has space").is_err());
    }

    #[test]
    fn test_require_auth_hash() {
        let good = "a".repeat(AUTH_HASH_LEN);
        assert!(require_auth_hash(&good).is_ok());
        assert!(require_auth_hash("abc").is_err());
        let bad = "g".repeat(AUTH_HASH_LEN);
        assert!(require_auth_hash(&bad).is_err());
    }
}
