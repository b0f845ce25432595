use crate::models::post::Post;
use crate::models::user::{User, UserProfile};
use crate::state::AppState;
use crate::utils::render::render_profile;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Server-rendered profile page: the user's details and their posts.
///
/// Public by design, same as the original app's `GET /{uid}`. All the HTML
/// comes out of a pure render function; this handler only fetches.
pub async fn profile_page(State(state): State<AppState>, Path(uid): Path<i64>) -> Response {
    let user: Option<User> = match sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(uid)
        .fetch_optional(&state.db)
        .await
    {
        Ok(u) => u,
        Err(e) => {
            tracing::error!("profile lookup failed: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Something went wrong</h1>".to_string()),
            )
                .into_response();
        }
    };

    let user = match user {
        Some(u) => u,
        None => {
            return (
                StatusCode::NOT_FOUND,
                Html("<h1>No such user</h1>".to_string()),
            )
                .into_response();
        }
    };

    let posts = sqlx::query_as::<_, Post>(
        "SELECT * FROM posts WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(uid)
    .fetch_all(&state.db)
    .await
    .unwrap_or_default();

    Html(render_profile(&UserProfile::from(user), &posts)).into_response()
}
