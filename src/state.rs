use crate::config::AuthConfig;
use crate::db::DB;
use crate::utils::storage::PhotoStore;

#[derive(Clone)]
pub struct AppState {
    pub db: DB,
    pub auth: AuthConfig,
    pub photos: PhotoStore,
}
