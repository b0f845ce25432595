use crate::middleware::auth::AuthenticatedUser;
use crate::models::photo::Photo;
use crate::state::AppState;
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use sha2::{Digest, Sha256};

/// Uploads a photo for the authenticated user.
///
/// Multi-step:
/// 1. Hash the bytes (SHA-256); the hash is the storage key
/// 2. Write the blob to disk
/// 3. Insert the metadata row
/// The file name comes from the `X-File-Name` header if the client sends one,
/// and the content type from the standard header.
pub async fn upload_photo(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<serde_json::Value>) {
    if body.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Empty photo upload"})),
        );
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let file_name = headers
        .get("x-file-name")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("photo")
        .to_string();

    // 1. Hash
    let hash = hex_digest(&body);

    // 2. Store the blob. Content-addressed, so a duplicate upload just
    //    rewrites an identical file.
    if let Err(e) = state.photos.save_blob(&hash, &body).await {
        tracing::error!("photo blob write failed: {e}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Could not store photo"})),
        );
    }

    // 3. Record the metadata
    let now = chrono::Utc::now().timestamp();
    let created = sqlx::query_as::<_, Photo>(
        r#"
        INSERT INTO photos (user_id, file_name, content_hash, content_type, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(&file_name)
    .bind(&hash)
    .bind(&content_type)
    .bind(now)
    .fetch_one(&state.db)
    .await;

    match created {
        Ok(p) => (StatusCode::CREATED, Json(json!(p))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": format!("Could not record photo: {}", e)})),
        ),
    }
}

/// Downloads a photo's bytes with its stored content type.
pub async fn download_photo(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let photo = match sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await
    {
        Ok(p) => p,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": format!("DB error: {}", e)})),
            )
                .into_response();
        }
    };

    let photo = match photo {
        Some(p) => p,
        None => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "Photo not found"})),
            )
                .into_response();
        }
    };

    match state.photos.get_blob(&photo.content_hash).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, photo.content_type)],
            bytes,
        )
            .into_response(),
        Err(e) => {
            // Row exists but the blob is gone. That's our bug, not the client's.
            tracing::error!("photo {} blob missing: {e}", photo.id);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Photo data unavailable"})),
            )
                .into_response()
        }
    }
}

/// Lists a user's photo metadata (not the bytes), newest first.
pub async fn list_user_photos(
    State(state): State<AppState>,
    Path(uid): Path<i64>,
) -> (StatusCode, Json<serde_json::Value>) {
    let photos = match sqlx::query_as::<_, Photo>(
        "SELECT * FROM photos WHERE user_id = $1 ORDER BY created_at DESC",
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

    (StatusCode::OK, Json(json!(photos)))
}

fn hex_digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_digest_is_stable_sha256() {
        // sha256("abc"), a fixed vector.
        assert_eq!(
            hex_digest(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
