use crate::config::AuthConfig;
use crate::models::user::{LoginRequest, RegisterRequest, TokenResponse, User, UserProfile};
use crate::state::AppState;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::token::{AuthError, create_access_token};
use axum::{
    Form, Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;

/// Registers a new user.
///
/// Usernames are validated and unique; the password is hashed before it ever
/// touches the database. On success the response carries the new profile plus
/// a fresh token, so clients don't need a separate login round trip.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    // 0. Validate the username strictly
    if let Err(e) = crate::utils::validation::validate_username(&payload.username) {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": e})));
    }

    // 1. Check if the username is already taken
    let existing: Option<User> = match sqlx::query_as("SELECT * FROM users WHERE username = $1")
        .bind(&payload.username)
        .fetch_optional(&state.db)
        .await
    {
        Ok(u) => u,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": format!("Database error: {}", e)})),
            );
        }
    };

    if existing.is_some() {
        return (
            StatusCode::CONFLICT,
            Json(json!({"error": "Username already taken"})),
        );
    }

    // 2. Hash the password
    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Hashing error"})),
            );
        }
    };

    // 3. Create the user
    // The UNIQUE(username) constraint closes the race between the check above
    // and this insert; a loser gets Postgres error 23505 and we report 409.
    let now = chrono::Utc::now().timestamp();
    let created = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users
            (username, password_hash, name, surname, email, phone_number, birthday, city, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(&payload.username)
    .bind(&password_hash)
    .bind(&payload.name)
    .bind(&payload.surname)
    .bind(&payload.email)
    .bind(&payload.phone_number)
    .bind(&payload.birthday)
    .bind(&payload.city)
    .bind(now)
    .fetch_one(&state.db)
    .await;

    let user = match created {
        Ok(u) => u,
        Err(e) => {
            if let Some(db_err) = e.as_database_error() {
                if db_err.code() == Some("23505".into()) {
                    return (
                        StatusCode::CONFLICT,
                        Json(json!({"error": "Username already taken"})),
                    );
                }
            }
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": format!("Could not create user: {}", e)})),
            );
        }
    };

    tracing::info!("registered user {} (id {})", user.username, user.id);

    // 4. Issue a token
    let token = match create_access_token(&user.username, &state.auth) {
        Ok(t) => t,
        Err(_) => {
            // The account exists either way; they can still log in manually.
            return (
                StatusCode::CREATED,
                Json(json!({
                    "user": UserProfile::from(user),
                    "message": "User created, but token generation failed"
                })),
            );
        }
    };

    (
        StatusCode::CREATED,
        Json(json!({
            "user": UserProfile::from(user),
            "access_token": token,
            "token_type": "bearer",
        })),
    )
}

/// Checks a username/password pair against the store.
///
/// "No such user" and "wrong password" are indistinguishable to the caller.
/// Error messages that differ per case are a username oracle.
async fn authenticate(state: &AppState, username: &str, password: &str) -> Result<User, AuthError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(&state.db)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AuthError::BadCredentials),
    };

    match verify_password(password, &user.password_hash) {
        Ok(true) => Ok(user),
        _ => Err(AuthError::BadCredentials),
    }
}

/// Builds the session cookie value for a freshly issued token.
///
/// The value keeps the `Bearer ` prefix the way the browser flow has always
/// carried it; the session resolver strips it on the way back in. Max-Age is
/// deliberately the token TTL, so the cookie and the token die together, and
/// the token's own expiry stays the single authority either way.
fn session_cookie(token: &str, auth: &AuthConfig) -> String {
    format!(
        "{}=Bearer {}; HttpOnly; SameSite=Lax; Max-Age={}; Path=/",
        crate::middleware::auth::ACCESS_TOKEN_COOKIE,
        token,
        auth.access_token_exp_minutes * 60
    )
}

/// Logs a user in (JSON API flavor).
///
/// Success returns the token payload and also sets the session cookie, so the
/// same endpoint serves fetch()-based frontends. Failure is a 401 with a
/// generic message and no cookie.
pub async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> Response {
    let user = match authenticate(&state, &payload.username, &payload.password).await {
        Ok(u) => u,
        Err(e) => return e.into_response(),
    };

    let token = match create_access_token(&user.username, &state.auth) {
        Ok(t) => t,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Token generation error"})),
            )
                .into_response();
        }
    };

    tracing::debug!("issued access token for {}", user.username);

    (
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie(&token, &state.auth))],
        Json(TokenResponse {
            access_token: token,
            token_type: "bearer".to_string(),
        }),
    )
        .into_response()
}

/// Logs a user in (browser form flavor).
///
/// Same checks as `login`, but the success path is a 303 redirect to the
/// user's profile page with the session cookie set.
pub async fn login_form(
    State(state): State<AppState>,
    Form(payload): Form<LoginRequest>,
) -> Response {
    let user = match authenticate(&state, &payload.username, &payload.password).await {
        Ok(u) => u,
        Err(e) => return e.into_response(),
    };

    let token = match create_access_token(&user.username, &state.auth) {
        Ok(t) => t,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Token generation error"})),
            )
                .into_response();
        }
    };

    (
        [(header::SET_COOKIE, session_cookie(&token, &state.auth))],
        Redirect::to(&format!("/{}", user.id)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_shape() {
        let auth = AuthConfig::new("HS256", "secret".into(), 30).unwrap();
        let cookie = session_cookie("abc.def.ghi", &auth);
        assert!(cookie.starts_with("access_token=Bearer abc.def.ghi;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        // Cookie lifetime tracks the token TTL (30 minutes here).
        assert!(cookie.contains("Max-Age=1800"));
        assert!(cookie.contains("Path=/"));
    }
}
