//! Printable, bounded-length identifiers used throughout the model.
//!
//! The evaluator treats all three as opaque keys; the validation here only
//! guards the wire shape (`name@domain`, `name#domain`, bounded length) so
//! that malformed identifiers are caught at the model boundary instead of
//! surfacing as confusing lookup misses deep in the evaluator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length, in bytes, of any identifier accepted by the model.
pub const MAX_ID_LEN: usize = 288;

fn is_printable(s: &str) -> bool {
    !s.is_empty() && s.len() <= MAX_ID_LEN && s.chars().all(|c| !c.is_control())
}

/// `true` if `s` is printable and within [`MAX_ID_LEN`].
///
/// This is the loose check applied to the query envelope's
/// `creator_account_id`: unlike [`AccountId`], the envelope's creator
/// field is carried as an opaque string on the wire (the original
/// query factory never required `name@domain` shape there), so it is
/// validated for printability and bound only, not for an `@` split.
pub fn is_valid_identifier(s: &str) -> bool {
    is_printable(s)
}

/// Account identifier in `name@domain` form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Builds an `AccountId`, requiring exactly one `@` and non-empty
    /// name/domain halves.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if !is_printable(&raw) {
            return None;
        }
        let (name, domain) = raw.split_once('@')?;
        if name.is_empty() || domain.is_empty() {
            return None;
        }
        Some(AccountId(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Asset identifier in `name#domain` form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if !is_printable(&raw) {
            return None;
        }
        let (name, domain) = raw.split_once('#')?;
        if name.is_empty() || domain.is_empty() {
            return None;
        }
        Some(AssetId(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque role label.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId(String);

impl RoleId {
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if !is_printable(&raw) {
            return None;
        }
        Some(RoleId(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_requires_at_sign() {
        assert!(AccountId::new("alice@example").is_some());
        assert!(AccountId::new("alice").is_none());
        assert!(AccountId::new("@example").is_none());
        assert!(AccountId::new("alice@").is_none());
    }

    #[test]
    fn asset_id_requires_hash_sign() {
        assert!(AssetId::new("coin#example").is_some());
        assert!(AssetId::new("coin").is_none());
    }

    #[test]
    fn role_id_accepts_opaque_label() {
        assert!(RoleId::new("admin").is_some());
        assert!(RoleId::new("").is_none());
    }

    #[test]
    fn ids_reject_oversized_input() {
        let too_long = "a".repeat(MAX_ID_LEN + 1);
        assert!(AccountId::new(format!("{too_long}@example")).is_none());
    }
}
