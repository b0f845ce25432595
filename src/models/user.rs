use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from `users`. The password hash is an argon2 PHC string and never
/// leaves the server, hence the serde skip.
#[derive(Debug, Serialize, Deserialize, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone_number: String,
    pub birthday: String,
    pub city: String,
    pub created_at: i64,
}

/// Public view of a user, safe to hand to clients and templates.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone_number: String,
    pub birthday: String,
    pub city: String,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        UserProfile {
            id: u.id,
            username: u.username,
            name: u.name,
            surname: u.surname,
            email: u.email,
            phone_number: u.phone_number,
            birthday: u.birthday,
            city: u.city,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub birthday: String,
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of a successful login. `token_type` is always "bearer".
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// What actually goes inside a token: the subject (username) and the unix
/// expiry timestamp. Nothing else. The user row is re-fetched on every
/// request, so stale profile data can't hide inside a still-valid token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}
