use crate::middleware::auth::AuthenticatedUser;
use crate::models::post::{CreatePostRequest, Post};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;

/// Creates a post. Only authenticated users can post, and the author is
/// always the logged-in user.
pub async fn create_post(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreatePostRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    if payload.title.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Title must not be empty"})),
        );
    }

    let now = chrono::Utc::now().timestamp();
    let created = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (user_id, title, main_text, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(&payload.title)
    .bind(&payload.main_text)
    .bind(now)
    .fetch_one(&state.db)
    .await;

    match created {
        Ok(p) => (StatusCode::CREATED, Json(json!(p))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": format!("Could not create post: {}", e)})),
        ),
    }
}

/// Lists a user's posts, newest first. Public, like the profile page.
pub async fn list_user_posts(
    State(state): State<AppState>,
    Path(uid): Path<i64>,
) -> (StatusCode, Json<serde_json::Value>) {
    let posts = match sqlx::query_as::<_, Post>(
        "SELECT * FROM posts WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(uid)
    .fetch_all(&state.db)
    .await
    {
        Ok(p) => p,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": format!("DB error: {}", e)})),
            );
        }
    };

    (StatusCode::OK, Json(json!(posts)))
}

/// Gets a single post by id.
pub async fn get_post(
    State(state): State<AppState>,
    Path(pid): Path<i64>,
) -> (StatusCode, Json<serde_json::Value>) {
    let post = match sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
        .bind(pid)
        .fetch_optional(&state.db)
        .await
    {
        Ok(p) => p,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": format!("DB error: {}", e)})),
            );
        }
    };

    match post {
        Some(p) => (StatusCode::OK, Json(json!(p))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Post not found"})),
        ),
    }
}
