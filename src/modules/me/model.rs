use serde::{Deserialize, Serialize};

use edgeguard_core::AuthenticatedIdentity;

const PRODUCT_SCOPE: &str = "product:";

/// The caller as this service sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeResponse {
    pub subject: String,
    /// Sorted, de-duplicated.
    pub authorities: Vec<String>,
}

impl From<&AuthenticatedIdentity> for MeResponse {
    fn from(identity: &AuthenticatedIdentity) -> Self {
        Self {
            subject: identity.subject().to_string(),
            authorities: identity.authorities().iter().cloned().collect(),
        }
    }
}

impl MeResponse {
    /// Same caller, authorities narrowed to the product service.
    pub fn product_scoped(identity: &AuthenticatedIdentity) -> Self {
        Self {
            subject: identity.subject().to_string(),
            authorities: identity
                .authorities()
                .iter()
                .filter(|a| a.starts_with(PRODUCT_SCOPE))
                .cloned()
                .collect(),
        }
    }
}
