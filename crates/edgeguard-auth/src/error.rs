use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};

/// Why a token was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signature does not match")]
    SignatureInvalid,

    #[error("token expired at {exp}")]
    Expired { exp: i64 },

    #[error("unsupported token: {0}")]
    Unsupported(String),

    #[error("token has no {0} claim")]
    MissingClaim(&'static str),
}

impl TokenError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::Malformed(_) => "malformed",
            TokenError::SignatureInvalid => "signature_invalid",
            TokenError::Expired { .. } => "expired",
            TokenError::Unsupported(_) => "unsupported",
            TokenError::MissingClaim(_) => "missing_claim",
        }
    }

    pub(crate) fn from_jwt(token: &str, err: JwtError) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm
            | ErrorKind::InvalidKeyFormat => TokenError::Unsupported(err.to_string()),
            ErrorKind::MissingRequiredClaim(claim) => {
                TokenError::Malformed(format!("missing required claim {claim}"))
            }
            // An `alg` the library cannot even name (`none`, `HS1`) fails
            // header parsing; report it as unsupported rather than garbage.
            ErrorKind::Json(_) => match declared_algorithm(token) {
                Some(alg) => TokenError::Unsupported(format!("algorithm {alg}")),
                None => TokenError::Malformed(err.to_string()),
            },
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// The `alg` a token's header declares, if the header is readable JSON
/// naming an algorithm outside the HMAC family.
fn declared_algorithm(token: &str) -> Option<String> {
    let header = token.split('.').next()?;
    let bytes = URL_SAFE_NO_PAD.decode(header).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let alg = value.get("alg")?.as_str()?;

    match alg {
        "HS256" | "HS384" | "HS512" => None,
        other => Some(other.to_string()),
    }
}
