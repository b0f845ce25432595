use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, Clone, FromRow)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub main_text: String,
    pub created_at: i64,
}

/// The author is never part of the payload. It is always the authenticated
/// user, so nobody can post under someone else's id.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub main_text: String,
}
