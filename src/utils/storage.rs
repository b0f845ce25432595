use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Content-addressed photo storage on the local filesystem.
///
/// Blobs are written under `<root>/blobs/<sha256-hex>`. Uploading the same
/// bytes twice overwrites a file with identical content, so writes are
/// idempotent and need no locking.
#[derive(Clone)]
pub struct PhotoStore {
    root: PathBuf,
}

impl PhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Reads `PHOTO_STORAGE_DIR` from the environment, defaulting to
    /// `./photos`, and creates the blob directory up front so the first
    /// upload doesn't race directory creation.
    pub fn from_env() -> Result<Self> {
        let root = env::var("PHOTO_STORAGE_DIR").unwrap_or_else(|_| "photos".to_string());
        let store = Self::new(root);
        std::fs::create_dir_all(store.blob_dir())
            .context("could not create photo storage directory")?;
        Ok(store)
    }

    fn blob_dir(&self) -> PathBuf {
        self.root.join("blobs")
    }

    fn blob_path(&self, hash: &str) -> PathBuf {
        self.blob_dir().join(hash)
    }

    pub async fn save_blob(&self, hash: &str, data: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(self.blob_dir()).await?;
        tokio::fs::write(self.blob_path(hash), data)
            .await
            .with_context(|| format!("could not write blob {hash}"))?;
        Ok(())
    }

    pub async fn get_blob(&self, hash: &str) -> Result<Vec<u8>> {
        tokio::fs::read(self.blob_path(hash))
            .await
            .with_context(|| format!("could not read blob {hash}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(dir.path());

        store.save_blob("abc123", b"jpeg bytes").await.unwrap();
        assert_eq!(store.get_blob("abc123").await.unwrap(), b"jpeg bytes");
    }

    #[tokio::test]
    async fn missing_blob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(dir.path());
        assert!(store.get_blob("nope").await.is_err());
    }

    #[tokio::test]
    async fn duplicate_save_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(dir.path());

        store.save_blob("h", b"same").await.unwrap();
        store.save_blob("h", b"same").await.unwrap();
        assert_eq!(store.get_blob("h").await.unwrap(), b"same");
    }
}
