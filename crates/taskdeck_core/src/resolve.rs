//! List-reference resolution.
//!
//! # Responsibility
//! - Parse a raw, user-supplied list reference into a typed target.
//! - Normalize percent-encoding, case and whitespace before UUID parsing.
//!
//! # Invariants
//! - Resolution is pure: no storage access, no lazy creation. Existence and
//!   ownership checks happen downstream at the authorization gate.
//! - Reserved keywords (`inbox`, `upcoming`) are matched case-insensitively
//!   before any identifier parsing is attempted.

use crate::model::task_list::{ListId, INBOX_NAME};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const UPCOMING_KEYWORD: &str = "upcoming";

/// Outcome of interpreting a raw list-filter token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTarget {
    /// No list constraint; the query spans the owner's whole task set.
    NoFilter,
    /// The owner's reserved default list, created lazily on first reference.
    Inbox,
    /// Due-date projection over the owner's tasks; not a list at all.
    Upcoming,
    /// A concrete list identifier. Not yet checked for existence.
    ById(ListId),
}

/// Resolution failure for tokens that are neither keywords nor identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// The token does not parse as a list identifier.
    InvalidReference(String),
}

impl Display for ReferenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidReference(raw) => {
                write!(f, "`{raw}` is not a valid list reference")
            }
        }
    }
}

impl Error for ReferenceError {}

/// Resolves a raw list reference into a typed target.
///
/// # Contract
/// - `None`, empty or whitespace-only input yields `NoFilter`.
/// - `inbox` / `upcoming` (any case) yield their keyword targets.
/// - Anything else is percent-decoded, trimmed, lowercased and has spaces
///   folded to hyphens before being parsed as a UUID.
pub fn resolve_list_reference(raw: Option<&str>) -> Result<ResolvedTarget, ReferenceError> {
    let raw = match raw {
        Some(value) => value.trim(),
        None => return Ok(ResolvedTarget::NoFilter),
    };

    if raw.is_empty() {
        return Ok(ResolvedTarget::NoFilter);
    }
    if raw.eq_ignore_ascii_case(INBOX_NAME) {
        return Ok(ResolvedTarget::Inbox);
    }
    if raw.eq_ignore_ascii_case(UPCOMING_KEYWORD) {
        return Ok(ResolvedTarget::Upcoming);
    }

    let decoded = urlencoding::decode(raw)
        .map_err(|_| ReferenceError::InvalidReference(raw.to_string()))?;
    let normalized = decoded.trim().to_lowercase().replace(' ', "-");

    Uuid::parse_str(&normalized)
        .map(ResolvedTarget::ById)
        .map_err(|_| ReferenceError::InvalidReference(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{resolve_list_reference, ReferenceError, ResolvedTarget};
    use uuid::Uuid;

    #[test]
    fn absent_and_blank_references_mean_no_filter() {
        assert_eq!(
            resolve_list_reference(None).unwrap(),
            ResolvedTarget::NoFilter
        );
        assert_eq!(
            resolve_list_reference(Some("")).unwrap(),
            ResolvedTarget::NoFilter
        );
        assert_eq!(
            resolve_list_reference(Some("   ")).unwrap(),
            ResolvedTarget::NoFilter
        );
    }

    #[test]
    fn keywords_match_case_insensitively() {
        assert_eq!(
            resolve_list_reference(Some("Inbox")).unwrap(),
            ResolvedTarget::Inbox
        );
        assert_eq!(
            resolve_list_reference(Some("UPCOMING")).unwrap(),
            ResolvedTarget::Upcoming
        );
    }

    #[test]
    fn valid_uuid_resolves_by_id() {
        let id = Uuid::new_v4();
        let resolved = resolve_list_reference(Some(&id.to_string())).unwrap();
        assert_eq!(resolved, ResolvedTarget::ById(id));
    }

    #[test]
    fn uppercase_and_encoded_uuids_are_normalized() {
        let id = Uuid::parse_str("8f0d6bc9-95a2-4cc8-b7a6-0d0ca41e5f3d").unwrap();
        let upper = id.to_string().to_uppercase();
        assert_eq!(
            resolve_list_reference(Some(&upper)).unwrap(),
            ResolvedTarget::ById(id)
        );

        // Percent-encoded spaces fold to hyphens before parsing.
        let spaced = "8f0d6bc9%2095a2%204cc8%20b7a6%200d0ca41e5f3d";
        assert_eq!(
            resolve_list_reference(Some(spaced)).unwrap(),
            ResolvedTarget::ById(id)
        );
    }

    #[test]
    fn garbage_tokens_fail_as_invalid_reference() {
        let err = resolve_list_reference(Some("list-not-found")).unwrap_err();
        assert_eq!(
            err,
            ReferenceError::InvalidReference("list-not-found".to_string())
        );
    }
}
