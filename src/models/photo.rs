use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Photo metadata. The bytes themselves sit on disk under the content hash,
/// so re-uploading the same image costs one row and zero storage.
#[derive(Debug, Serialize, Deserialize, Clone, FromRow)]
pub struct Photo {
    pub id: i64,
    pub user_id: i64,
    pub file_name: String,
    pub content_hash: String,
    pub content_type: String,
    pub created_at: i64,
}
