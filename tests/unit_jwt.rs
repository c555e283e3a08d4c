use chrono::Utc;
use edgeguard::edgeguard_auth::{
    Algorithm, Claims, KeyError, SigningKey, TokenError, TokenValidator, sign_claims,
    sign_claims_with,
};
use edgeguard::edgeguard_config::JwtConfig;

const TEST_KEY: &str = "a2tra2tra2tra2tra2tra2tra2tra2tra2tra2tra2s=";

fn get_test_validator() -> TokenValidator {
    let config = JwtConfig {
        secret_key: TEST_KEY.to_string(),
    };
    TokenValidator::new(SigningKey::from_config(&config).unwrap())
}

fn sign(claims: &Claims) -> String {
    sign_claims(&SigningKey::from_base64(TEST_KEY).unwrap(), claims).unwrap()
}

#[test]
fn test_round_trip_preserves_claims() {
    let validator = get_test_validator();
    let exp = Utc::now().timestamp() + 3600;
    let token = sign(&Claims::new("alice", Some("product:read,product:create"), exp));

    assert!(validator.validate(&token));
    assert_eq!(validator.extract_subject(&token).unwrap(), "alice");
    assert_eq!(
        validator.extract_authorities(&token).unwrap().as_deref(),
        Some("product:read,product:create")
    );

    let claims = validator.parse_claims(&token).unwrap();
    assert_eq!(claims.exp, exp);
    assert!(!claims.is_expired());
}

#[test]
fn test_expiry_is_inclusive_of_exp_second() {
    let validator = get_test_validator();
    let now = 1_800_000_000;
    let token = sign(&Claims::new("alice", None, now));

    assert!(validator.validate_at(&token, now));
    assert!(!validator.validate_at(&token, now + 1));
}

#[test]
fn test_expired_token_fails_extraction() {
    let validator = get_test_validator();
    let token = sign(&Claims::new("alice", Some("product:read"), Utc::now().timestamp() - 1));

    assert!(!validator.validate(&token));
    assert!(matches!(
        validator.extract_authorities(&token),
        Err(TokenError::Expired { .. })
    ));
}

#[test]
fn test_every_hmac_variant_is_accepted() {
    let validator = get_test_validator();
    let key = SigningKey::from_base64(TEST_KEY).unwrap();
    let claims = Claims::new("alice", None, Utc::now().timestamp() + 60);

    for alg in [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512] {
        let token = sign_claims_with(&key, alg, &claims).unwrap();
        assert!(validator.validate(&token), "{alg:?}");
    }
}

#[test]
fn test_validate_never_panics_on_garbage() {
    let validator = get_test_validator();
    for garbage in ["", ".", "..", "...", "Bearer x", "eyJ.eyJ.eyJ", "🦀.🦀.🦀"] {
        assert!(!validator.validate(garbage));
    }
}

#[test]
fn test_signing_key_requirements() {
    assert!(matches!(
        SigningKey::from_base64("%%%"),
        Err(KeyError::InvalidBase64(_))
    ));
    // 16 bytes
    assert_eq!(
        SigningKey::from_base64("MDEyMzQ1Njc4OWFiY2RlZg==").unwrap_err(),
        KeyError::TooShort { len: 16 }
    );
    assert!(SigningKey::from_base64(TEST_KEY).is_ok());
}
