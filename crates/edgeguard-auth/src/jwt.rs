//! Token validation against the shared HMAC key.
//!
//! The gateway and the downstream services share one [`TokenValidator`],
//! built once at startup from the configured key. It answers three
//! questions about a compact token:
//!
//! - is it acceptable right now ([`TokenValidator::validate`],
//!   [`TokenValidator::check`])
//! - whose is it ([`TokenValidator::extract_subject`])
//! - what may they do ([`TokenValidator::extract_authorities`])
//!
//! # Acceptance rules
//!
//! - `HS256`, `HS384`, and `HS512` are accepted; anything else is
//!   [`TokenError::Unsupported`]
//! - `exp` must be present; the token is expired once `exp < now`, with no
//!   leeway
//! - `aud`, `iss`, and `nbf` are not checked
//!
//! Raw tokens never reach the log. Failures are logged with a fingerprint
//! of the token instead.
//!
//! # Example
//!
//! ```ignore
//! use edgeguard_auth::{SigningKey, TokenValidator};
//!
//! let key = SigningKey::from_config(&jwt_config)?;
//! let validator = TokenValidator::new(key);
//!
//! if validator.validate(token) {
//!     let subject = validator.extract_subject(token)?;
//!     let authorities = validator.extract_authorities(token)?;
//! }
//! ```

use chrono::Utc;
use jsonwebtoken::{Algorithm, Validation, decode};
#[cfg(any(test, feature = "test-utils"))]
use jsonwebtoken::{Header, encode};
use tracing::{debug, warn};

use edgeguard_core::fingerprint;

use crate::claims::Claims;
use crate::error::TokenError;
use crate::key::SigningKey;

pub struct TokenValidator {
    key: SigningKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(key: SigningKey) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        // Expiry is checked against an explicit clock in `parse_claims_at`.
        validation.validate_exp = false;
        validation.validate_aud = false;

        Self { key, validation }
    }

    /// Verifies the signature and returns the claims of an unexpired token.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Malformed`] for anything that is not a well-formed
    ///   token with an `exp` claim
    /// - [`TokenError::SignatureInvalid`] when the key does not match
    /// - [`TokenError::Unsupported`] for non-HMAC algorithms
    /// - [`TokenError::Expired`] once `exp` has passed
    pub fn parse_claims(&self, token: &str) -> Result<Claims, TokenError> {
        self.parse_claims_at(token, Utc::now().timestamp())
    }

    /// [`parse_claims`](Self::parse_claims) against a fixed clock.
    pub fn parse_claims_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, self.key.decoding_key(), &self.validation)
            .map_err(|e| TokenError::from_jwt(token, e))?
            .claims;

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired { exp: claims.exp });
        }

        Ok(claims)
    }

    /// Like [`parse_claims`](Self::parse_claims), but every failure is
    /// logged at `warn` under its own message.
    pub fn check(&self, token: &str) -> Result<Claims, TokenError> {
        self.check_at(token, Utc::now().timestamp())
    }

    pub fn check_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let result = self.parse_claims_at(token, now);
        match &result {
            Ok(_) => debug!(token = %fingerprint(token.as_bytes()), "JWT accepted"),
            Err(err) => log_rejection(token, err),
        }
        result
    }

    /// Whether `token` is acceptable right now. Never panics.
    pub fn validate(&self, token: &str) -> bool {
        self.check(token).is_ok()
    }

    pub fn validate_at(&self, token: &str, now: i64) -> bool {
        self.check_at(token, now).is_ok()
    }

    /// The `sub` claim of a valid token.
    ///
    /// Fails with [`TokenError::MissingClaim`] when the token verifies but
    /// carries no subject.
    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        self.extract_subject_at(token, Utc::now().timestamp())
    }

    pub fn extract_subject_at(&self, token: &str, now: i64) -> Result<String, TokenError> {
        self.parse_claims_at(token, now)?
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or(TokenError::MissingClaim("sub"))
    }

    /// The raw `authorities` claim of a valid token, `None` when absent.
    pub fn extract_authorities(&self, token: &str) -> Result<Option<String>, TokenError> {
        self.extract_authorities_at(token, Utc::now().timestamp())
    }

    pub fn extract_authorities_at(
        &self,
        token: &str,
        now: i64,
    ) -> Result<Option<String>, TokenError> {
        Ok(self.parse_claims_at(token, now)?.authorities)
    }
}

fn log_rejection(token: &str, err: &TokenError) {
    let token = fingerprint(token.as_bytes());
    match err {
        TokenError::Malformed(reason) => {
            warn!(%token, kind = err.kind(), %reason, "Invalid JWT token")
        }
        TokenError::SignatureInvalid => {
            warn!(%token, kind = err.kind(), "Invalid JWT signature")
        }
        TokenError::Expired { exp } => {
            warn!(%token, kind = err.kind(), exp, "JWT token is expired")
        }
        TokenError::Unsupported(reason) => {
            warn!(%token, kind = err.kind(), %reason, "JWT token is unsupported")
        }
        TokenError::MissingClaim(claim) => {
            warn!(%token, kind = err.kind(), claim, "JWT claims are incomplete")
        }
    }
}

/// Signs `claims` with HS256 under `key`.
///
/// Test support only; nothing in the request path issues tokens.
#[cfg(any(test, feature = "test-utils"))]
pub fn sign_claims(key: &SigningKey, claims: &Claims) -> Result<String, TokenError> {
    sign_claims_with(key, Algorithm::HS256, claims)
}

#[cfg(any(test, feature = "test-utils"))]
pub fn sign_claims_with(
    key: &SigningKey,
    algorithm: Algorithm,
    claims: &Claims,
) -> Result<String, TokenError> {
    encode(&Header::new(algorithm), claims, key.encoding_key())
        .map_err(|e| TokenError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "a2tra2tra2tra2tra2tra2tra2tra2tra2tra2tra2s=";
    // 32 bytes of 'o'
    const OTHER_KEY: &str = "b29vb29vb29vb29vb29vb29vb29vb29vb29vb29vb28=";
    const NOW: i64 = 1_700_000_000;

    fn key() -> SigningKey {
        SigningKey::from_base64(KEY).unwrap()
    }

    fn validator() -> TokenValidator {
        TokenValidator::new(key())
    }

    fn sign(claims: &Claims) -> String {
        sign_claims(&key(), claims).unwrap()
    }

    fn claims(sub: Option<&str>, authorities: Option<&str>, exp: i64) -> Claims {
        Claims {
            sub: sub.map(str::to_string),
            exp,
            iat: Some(NOW - 60),
            authorities: authorities.map(str::to_string),
        }
    }

    #[test]
    fn test_valid_token_round_trip() {
        let token = sign(&claims(Some("alice"), Some("product:read"), NOW + 3600));
        let parsed = validator().parse_claims_at(&token, NOW).unwrap();

        assert_eq!(parsed.sub.as_deref(), Some("alice"));
        assert_eq!(parsed.authorities.as_deref(), Some("product:read"));
        assert!(validator().validate_at(&token, NOW));
    }

    #[test]
    fn test_expiry_boundary() {
        let token = sign(&claims(Some("alice"), None, NOW));
        assert!(validator().validate_at(&token, NOW));
        assert!(!validator().validate_at(&token, NOW + 1));
        assert_eq!(
            validator().parse_claims_at(&token, NOW + 1).unwrap_err(),
            TokenError::Expired { exp: NOW }
        );
    }

    #[test]
    fn test_check_reports_failure_kind() {
        let token = sign(&claims(Some("alice"), None, NOW - 1));
        assert_eq!(
            validator().check_at(&token, NOW).unwrap_err().kind(),
            "expired"
        );
        assert!(validator().check_at(&token, NOW - 1).is_ok());
    }

    #[test]
    fn test_past_token_is_rejected() {
        let token = sign(&claims(Some("alice"), None, 1_000));
        assert!(!validator().validate(&token));
        assert!(matches!(
            validator().extract_subject(&token),
            Err(TokenError::Expired { .. })
        ));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let validator = validator();
        for garbage in ["", "abc", "a.b", "a.b.c", "a.b.c.d", "not a token"] {
            assert!(!validator.validate(garbage), "accepted {garbage:?}");
            assert!(matches!(
                validator.parse_claims(garbage),
                Err(TokenError::Malformed(_))
            ));
        }
    }

    #[test]
    fn test_wrong_key_is_signature_error() {
        let other = SigningKey::from_base64(OTHER_KEY).unwrap();
        let token = sign_claims(&other, &claims(Some("alice"), None, NOW + 60)).unwrap();

        assert_eq!(
            validator().parse_claims_at(&token, NOW).unwrap_err(),
            TokenError::SignatureInvalid
        );
    }

    #[test]
    fn test_tampered_payload_is_signature_error() {
        let token = sign(&claims(Some("alice"), Some("product:read"), NOW + 60));
        let forged = sign(&claims(Some("mallory"), Some("product:delete"), NOW + 60));

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = forged.split('.').nth(1).unwrap();
        parts[1] = forged_payload;
        let spliced = parts.join(".");

        assert_eq!(
            validator().parse_claims_at(&spliced, NOW).unwrap_err(),
            TokenError::SignatureInvalid
        );
    }

    #[test]
    fn test_other_hmac_algorithms_are_accepted() {
        for alg in [Algorithm::HS384, Algorithm::HS512] {
            let token =
                sign_claims_with(&key(), alg, &claims(Some("alice"), None, NOW + 60)).unwrap();
            assert!(validator().validate_at(&token, NOW), "{alg:?} rejected");
        }
    }

    #[test]
    fn test_unsigned_token_is_unsupported() {
        // {"alg":"none"} . {"sub":"alice","exp":4102444800} . (empty)
        let token = "eyJhbGciOiJub25lIn0.eyJzdWIiOiJhbGljZSIsImV4cCI6NDEwMjQ0NDgwMH0.";
        assert!(matches!(
            validator().parse_claims(token),
            Err(TokenError::Unsupported(_))
        ));
    }

    #[test]
    fn test_rsa_header_is_unsupported() {
        // {"alg":"RS256","typ":"JWT"} . {"sub":"alice","exp":4102444800} . junk
        let token = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiJhbGljZSIsImV4cCI6NDEwMjQ0NDgwMH0.c2ln";
        assert!(matches!(
            validator().parse_claims(token),
            Err(TokenError::Unsupported(_))
        ));
    }

    #[test]
    fn test_missing_exp_is_malformed() {
        #[derive(serde::Serialize)]
        struct NoExp {
            sub: &'static str,
        }

        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoExp { sub: "alice" },
            key().encoding_key(),
        )
        .unwrap();

        assert!(matches!(
            validator().parse_claims(&token),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_extract_subject_and_authorities() {
        let validator = validator();
        let exp = Utc::now().timestamp() + 3600;

        let full = sign(&claims(Some("alice"), Some("product:read,product:create"), exp));
        assert_eq!(validator.extract_subject(&full).unwrap(), "alice");
        assert_eq!(
            validator.extract_authorities(&full).unwrap().as_deref(),
            Some("product:read,product:create")
        );

        let bare = sign(&claims(Some("bob"), None, exp));
        assert_eq!(validator.extract_authorities(&bare).unwrap(), None);
    }

    #[test]
    fn test_extraction_against_fixed_clock() {
        let token = sign(&claims(Some("alice"), Some("product:read"), NOW));
        let validator = validator();

        assert_eq!(validator.extract_subject_at(&token, NOW).unwrap(), "alice");
        assert_eq!(
            validator.extract_authorities_at(&token, NOW).unwrap().as_deref(),
            Some("product:read")
        );
        assert_eq!(
            validator.extract_subject_at(&token, NOW + 1).unwrap_err(),
            TokenError::Expired { exp: NOW }
        );
    }

    #[test]
    fn test_missing_subject_is_reported() {
        let exp = Utc::now().timestamp() + 3600;
        let token = sign(&claims(None, Some("product:read"), exp));

        assert!(validator().validate(&token));
        assert_eq!(
            validator().extract_subject(&token).unwrap_err(),
            TokenError::MissingClaim("sub")
        );
    }
}
