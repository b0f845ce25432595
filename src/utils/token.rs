use crate::config::AuthConfig;
use crate::models::user::Claims;
use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::json;

/// Everything that can go wrong between "a request arrived" and "we know who
/// this is". All variants except `Database` render as a uniform 401 so the
/// client can't tell a bad signature from an expired token from a deleted user.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No token in the Authorization header and none in the cookie.
    #[error("no credential supplied")]
    MissingCredential,
    /// Signature mismatch, malformed payload, wrong algorithm, or expired.
    #[error("invalid or expired token")]
    Invalid,
    /// The token verified but its subject no longer resolves to a user.
    #[error("token subject not found")]
    UnknownSubject,
    /// Username/password pair rejected.
    #[error("bad credentials")]
    BadCredentials,
    /// The credential store failed while resolving the subject.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Generic bodies on purpose. Which of the 401 reasons fired is logged
        // server-side, never disclosed to the caller.
        match self {
            AuthError::Database(e) => {
                tracing::error!("user lookup failed during auth: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Internal server error"})),
                )
                    .into_response()
            }
            AuthError::BadCredentials => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(json!({"error": "Incorrect username or password"})),
            )
                .into_response(),
            _ => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(json!({"error": "Not authenticated"})),
            )
                .into_response(),
        }
    }
}

/// Issues a signed access token for `username`, expiring
/// `access_token_exp_minutes` from now.
pub fn create_access_token(username: &str, auth: &AuthConfig) -> Result<String, AuthError> {
    let exp = chrono::Utc::now().timestamp() + auth.access_token_exp_minutes * 60;
    let claims = Claims {
        sub: username.to_string(),
        exp,
    };
    sign_claims(&claims, auth)
}

/// Signs an explicit claims record. Split out from `create_access_token` so
/// tests can mint tokens with arbitrary expiries.
pub fn sign_claims(claims: &Claims, auth: &AuthConfig) -> Result<String, AuthError> {
    encode(
        &Header::new(auth.algorithm),
        claims,
        &EncodingKey::from_secret(auth.secret_key.as_ref()),
    )
    .map_err(|_| AuthError::Invalid)
}

/// Verifies a token string and returns its claims.
///
/// Checks, in one shot:
/// - the signature, against our secret;
/// - the algorithm, which must be exactly the configured one (no algorithm
///   confusion, no `none`);
/// - the expiry, with zero leeway.
/// A token that fails any of these is never partially trusted. The claims come
/// back only on full success.
pub fn decode_access_token(token: &str, auth: &AuthConfig) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(auth.algorithm);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.secret_key.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig::new("HS256", "unit-test-secret".into(), 30).unwrap()
    }

    #[test]
    fn round_trip_preserves_subject() {
        let auth = test_config();
        let token = create_access_token("alice", &auth).unwrap();
        let claims = decode_access_token(&token, &auth).unwrap();
        assert_eq!(claims.sub, "alice");
        assert!(claims.exp > chrono::Utc::now().timestamp());
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = test_config();
        let claims = Claims {
            sub: "alice".into(),
            exp: chrono::Utc::now().timestamp() - 61,
        };
        let token = sign_claims(&claims, &auth).unwrap();
        assert!(matches!(
            decode_access_token(&token, &auth),
            Err(AuthError::Invalid)
        ));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let auth = test_config();
        let token = create_access_token("alice", &auth).unwrap();

        // Flip one character in the signature segment. Any single-byte change
        // must kill the whole token, never yield altered-but-valid claims.
        let sig_start = token.rfind('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        bytes[sig_start] = if bytes[sig_start] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(matches!(
            decode_access_token(&tampered, &auth),
            Err(AuthError::Invalid)
        ));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let auth = test_config();
        let alice = create_access_token("alice", &auth).unwrap();
        let bob = create_access_token("bob", &auth).unwrap();

        // Splice bob's payload onto alice's signature.
        let alice_parts: Vec<&str> = alice.split('.').collect();
        let bob_parts: Vec<&str> = bob.split('.').collect();
        let franken = format!("{}.{}.{}", alice_parts[0], bob_parts[1], alice_parts[2]);

        assert!(decode_access_token(&franken, &auth).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let auth = test_config();
        for junk in ["", "not-a-token", "a.b.c", "a.b"] {
            assert!(matches!(
                decode_access_token(junk, &auth),
                Err(AuthError::Invalid)
            ));
        }
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let auth = test_config();
        let other = AuthConfig::new("HS256", "a-different-secret".into(), 30).unwrap();
        let token = create_access_token("alice", &auth).unwrap();
        assert!(decode_access_token(&token, &other).is_err());
    }

    #[test]
    fn wrong_algorithm_is_rejected() {
        // Same secret, different HMAC flavor. Still a hard failure.
        let hs256 = test_config();
        let hs512 = AuthConfig::new("HS512", "unit-test-secret".into(), 30).unwrap();
        let token = create_access_token("alice", &hs256).unwrap();
        assert!(decode_access_token(&token, &hs512).is_err());
    }
}
