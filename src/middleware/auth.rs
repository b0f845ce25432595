use crate::models::user::User;
use crate::state::AppState;
use crate::utils::token::{AuthError, decode_access_token};
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

/// Cookie set by the login endpoint and read back here.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// An authenticated user resolved from the request's token.
///
/// Use this as a handler parameter and Axum will automatically:
/// 1. Locate a token (Authorization header first, cookie as fallback)
/// 2. Verify signature and expiry
/// 3. Fetch the user row for the token's subject
/// If any step fails the handler body never runs; the request is rejected
/// with a 401 and a `WWW-Authenticate: Bearer` header.
pub struct AuthenticatedUser(pub User);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // 1. Find a token: header wins over cookie.
        let token = extract_token(&parts.headers).ok_or(AuthError::MissingCredential)?;

        // 2. Verify it. Signature, algorithm and expiry all checked here;
        //    any failure collapses to the same generic rejection.
        let claims = decode_access_token(&token, &state.auth)?;

        // 3. Resolve the subject. The token can outlive its user (account
        //    deleted after issuance), so a miss here is still a 401, not a 500.
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = $1")
            .bind(&claims.sub)
            .fetch_optional(&state.db)
            .await?;

        match user {
            Some(u) => Ok(AuthenticatedUser(u)),
            None => {
                tracing::warn!("valid token for unknown subject {:?}", claims.sub);
                Err(AuthError::UnknownSubject)
            }
        }
    }
}

/// Locates a bearer token in the request headers.
///
/// Precedence: `Authorization: Bearer <token>` first, then the
/// `access_token` cookie. First match wins; a present-but-malformed
/// Authorization header does not fall through to the cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if headers.contains_key(header::AUTHORIZATION) {
        return bearer_from_header(headers);
    }
    token_from_cookie(headers)
}

fn bearer_from_header(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(|t| t.to_string())
}

/// Reads the session cookie. Login sets the value as `Bearer <token>` (the
/// shape browser form clients carry around), so the prefix is stripped when
/// present; a bare value is passed through as the token itself.
fn token_from_cookie(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in cookies.split(';') {
        let pair = pair.trim();
        if let Some(value) = pair
            .strip_prefix(ACCESS_TOKEN_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
        {
            let token = value.strip_prefix("Bearer ").unwrap_or(value);
            if token.is_empty() {
                return None;
            }
            return Some(token.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn finds_token_in_authorization_header() {
        let h = headers(&[("authorization", "Bearer abc.def.ghi")]);
        assert_eq!(extract_token(&h).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn finds_token_in_cookie_with_bearer_prefix() {
        let h = headers(&[("cookie", "access_token=Bearer abc.def.ghi")]);
        assert_eq!(extract_token(&h).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn bare_cookie_value_passes_through() {
        let h = headers(&[("cookie", "access_token=abc.def.ghi")]);
        assert_eq!(extract_token(&h).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn header_wins_over_cookie() {
        let h = headers(&[
            ("authorization", "Bearer from-header"),
            ("cookie", "access_token=Bearer from-cookie"),
        ]);
        assert_eq!(extract_token(&h).as_deref(), Some("from-header"));
    }

    #[test]
    fn malformed_header_does_not_fall_through_to_cookie() {
        let h = headers(&[
            ("authorization", "Basic dXNlcjpwYXNz"),
            ("cookie", "access_token=Bearer from-cookie"),
        ]);
        assert_eq!(extract_token(&h), None);
    }

    #[test]
    fn cookie_is_found_among_others() {
        let h = headers(&[("cookie", "theme=dark; access_token=Bearer tok; lang=en")]);
        assert_eq!(extract_token(&h).as_deref(), Some("tok"));
    }

    #[test]
    fn no_credential_yields_none() {
        assert_eq!(extract_token(&HeaderMap::new()), None);
        let h = headers(&[("cookie", "theme=dark")]);
        assert_eq!(extract_token(&h), None);
        let h = headers(&[("cookie", "access_token=")]);
        assert_eq!(extract_token(&h), None);
    }
}
