use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::UserProfile;
use axum::Json;

/// Returns the profile of whoever owns the presented token.
///
/// All the work happens in the extractor; by the time this body runs the
/// session is already resolved.
pub async fn me(AuthenticatedUser(user): AuthenticatedUser) -> Json<UserProfile> {
    Json(UserProfile::from(user))
}
