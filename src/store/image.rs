use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::Result;

/// Metadata kept for one stored image.
#[derive(Clone, Debug)]
pub struct ImageInfo {
    /// Identifier of the laptop the image belongs to.
    pub laptop_id: String,
    /// File-type extension, e.g. `.jpg`.
    pub image_type: String,
    /// Where the blob was written.
    pub path: PathBuf,
}

/// Image store writing blobs to disk with an in-memory index.
///
/// The index does not survive a restart; only the blob files do.
pub struct DiskImageStore {
    image_folder: PathBuf,
    images: Arc<RwLock<HashMap<String, ImageInfo>>>,
}

impl DiskImageStore {
    /// Creates a store rooted at the given folder.
    pub fn new(image_folder: impl Into<PathBuf>) -> Self {
        Self {
            image_folder: image_folder.into(),
            images: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Writes the image data under a fresh identifier and indexes it.
    ///
    /// The blob write runs outside the lock and may race writes for other
    /// images; only the index update is guarded. On write failure no index
    /// entry is created, but a partial file may remain on disk.
    pub async fn save(&self, laptop_id: &str, image_type: &str, data: &[u8]) -> Result<String> {
        let image_id = Uuid::new_v4().to_string();
        let path = self.image_folder.join(format!("{image_id}{image_type}"));

        tokio::fs::write(&path, data).await?;

        let mut images = self.images.write().await;
        images.insert(
            image_id.clone(),
            ImageInfo {
                laptop_id: laptop_id.to_string(),
                image_type: image_type.to_string(),
                path,
            },
        );

        Ok(image_id)
    }

    /// Looks up the index entry for an image identifier.
    pub async fn find(&self, image_id: &str) -> Option<ImageInfo> {
        let images = self.images.read().await;
        images.get(image_id).cloned()
    }

    /// Number of indexed images.
    pub async fn count(&self) -> usize {
        let images = self.images.read().await;
        images.len()
    }
}

impl Clone for DiskImageStore {
    fn clone(&self) -> Self {
        Self {
            image_folder: self.image_folder.clone(),
            images: Arc::clone(&self.images),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_writes_blob_and_indexes_it() {
        let folder = tempfile::tempdir().unwrap();
        let store = DiskImageStore::new(folder.path());

        let data = b"not really a jpeg";
        let image_id = store.save("laptop-1", ".jpg", data).await.unwrap();

        let info = store.find(&image_id).await.unwrap();
        assert_eq!(info.laptop_id, "laptop-1");
        assert_eq!(info.image_type, ".jpg");
        assert_eq!(info.path, folder.path().join(format!("{image_id}.jpg")));

        let written = tokio::fs::read(&info.path).await.unwrap();
        assert_eq!(written, data);
    }

    #[tokio::test]
    async fn failed_write_leaves_no_index_entry() {
        let folder = tempfile::tempdir().unwrap();
        let store = DiskImageStore::new(folder.path().join("does-not-exist"));

        let result = store.save("laptop-1", ".png", b"payload").await;

        assert!(result.is_err());
        assert_eq!(store.count().await, 0);
    }
}
