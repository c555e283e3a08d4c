//! The authenticated principal a request carries once trust has been
//! established.

use std::collections::BTreeSet;

use serde::Serialize;

/// A subject together with the authorities it was granted.
///
/// An identity can only exist with a non-empty subject and at least one
/// authority. A request whose resolved authorities are empty is treated as
/// unauthenticated, so [`AuthenticatedIdentity::new`] returns `None` for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedIdentity {
    subject: String,
    authorities: BTreeSet<String>,
}

impl AuthenticatedIdentity {
    pub fn new(subject: impl Into<String>, authorities: BTreeSet<String>) -> Option<Self> {
        let subject = subject.into();
        if subject.is_empty() || authorities.is_empty() {
            return None;
        }

        Some(Self {
            subject,
            authorities,
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn authorities(&self) -> &BTreeSet<String> {
        &self.authorities
    }

    /// Check if the identity holds a specific authority
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }

    /// Check if the identity holds all of the specified authorities
    pub fn has_all_authorities(&self, authorities: &[&str]) -> bool {
        authorities.iter().all(|a| self.has_authority(a))
    }
}

/// Splits a comma-separated authorities string into a set.
///
/// Entries are trimmed and blanks dropped, so `""` and `" , "` both yield
/// an empty set.
pub fn parse_authorities(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}
