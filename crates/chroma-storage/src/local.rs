use crate::keys::validate_filename;
use crate::traits::{ByteStream, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use chroma_core::ImageKind;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage: one flat directory per image kind
#[derive(Clone, Debug)]
pub struct LocalStorage {
    upload_dir: PathBuf,
    colorized_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance, creating both directories if missing
    ///
    /// # Arguments
    /// * `upload_dir` - Directory for files as uploaded (e.g., "uploads")
    /// * `colorized_dir` - Directory for pipeline output (e.g., "colorized")
    pub async fn new(
        upload_dir: impl Into<PathBuf>,
        colorized_dir: impl Into<PathBuf>,
    ) -> StorageResult<Self> {
        let upload_dir = upload_dir.into();
        let colorized_dir = colorized_dir.into();

        for dir in [&upload_dir, &colorized_dir] {
            fs::create_dir_all(dir).await.map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create storage directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        Ok(LocalStorage {
            upload_dir,
            colorized_dir,
        })
    }

    pub fn dir(&self, kind: ImageKind) -> &Path {
        match kind {
            ImageKind::Upload => &self.upload_dir,
            ImageKind::Colorized => &self.colorized_dir,
        }
    }

    /// Resolve a filename inside the directory for `kind`
    fn path_for(&self, kind: ImageKind, filename: &str) -> StorageResult<PathBuf> {
        validate_filename(filename)?;
        Ok(self.dir(kind).join(filename))
    }

    async fn is_file(path: &Path) -> bool {
        fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, kind: ImageKind, filename: &str, data: Vec<u8>) -> StorageResult<()> {
        let path = self.path_for(kind, filename)?;
        let size = data.len();
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            kind = %kind,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(())
    }

    async fn get(&self, kind: ImageKind, filename: &str) -> StorageResult<Vec<u8>> {
        let path = self.path_for(kind, filename)?;

        if !Self::is_file(&path).await {
            return Err(StorageError::NotFound(filename.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            path = %path.display(),
            size_bytes = data.len(),
            "Local storage read successful"
        );

        Ok(data)
    }

    async fn download_stream(&self, kind: ImageKind, filename: &str) -> StorageResult<ByteStream> {
        let path = self.path_for(kind, filename)?;

        if !Self::is_file(&path).await {
            return Err(StorageError::NotFound(filename.to_string()));
        }

        let file = fs::File::open(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to open file {}: {}", path.display(), e))
        })?;

        let path_display = path.display().to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(path = %path_display, error = %e, "Local storage stream read error");
                StorageError::DownloadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(Box::pin(stream))
    }

    async fn exists(&self, kind: ImageKind, filename: &str) -> StorageResult<bool> {
        let path = self.path_for(kind, filename)?;
        Ok(Self::is_file(&path).await)
    }

    async fn delete(&self, kind: ImageKind, filename: &str) -> StorageResult<bool> {
        let path = self.path_for(kind, filename)?;

        if !Self::is_file(&path).await {
            return Ok(false);
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), kind = %kind, "Local storage delete successful");

        Ok(true)
    }

    async fn content_length(&self, kind: ImageKind, filename: &str) -> StorageResult<u64> {
        let path = self.path_for(kind, filename)?;
        let meta = fs::metadata(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(filename.to_string()),
            _ => StorageError::IoError(e),
        })?;
        Ok(meta.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage(dir: &Path) -> LocalStorage {
        LocalStorage::new(dir.join("uploads"), dir.join("colorized"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_creates_directories() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;
        assert!(storage.dir(ImageKind::Upload).is_dir());
        assert!(storage.dir(ImageKind::Colorized).is_dir());
    }

    #[tokio::test]
    async fn test_put_get_per_kind() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        storage
            .put(ImageKind::Upload, "a.png", b"original".to_vec())
            .await
            .unwrap();
        storage
            .put(ImageKind::Colorized, "a.png", b"colorized".to_vec())
            .await
            .unwrap();

        assert_eq!(storage.get(ImageKind::Upload, "a.png").await.unwrap(), b"original");
        assert_eq!(
            storage.get(ImageKind::Colorized, "a.png").await.unwrap(),
            b"colorized"
        );
        assert_eq!(
            storage.content_length(ImageKind::Upload, "a.png").await.unwrap(),
            8
        );
        assert!(dir.path().join("uploads").join("a.png").is_file());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        assert!(matches!(
            storage.get(ImageKind::Upload, "missing.png").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            storage.download_stream(ImageKind::Colorized, "missing.png").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(!storage.exists(ImageKind::Upload, "missing.png").await.unwrap());
        assert!(!storage.delete(ImageKind::Upload, "missing.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;
        storage
            .put(ImageKind::Colorized, "b.jpg", b"x".to_vec())
            .await
            .unwrap();

        assert!(storage.delete(ImageKind::Colorized, "b.jpg").await.unwrap());
        assert!(!storage.exists(ImageKind::Colorized, "b.jpg").await.unwrap());
        assert!(!storage.delete(ImageKind::Colorized, "b.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let result = storage.get(ImageKind::Upload, "../colorized/x.png").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete(ImageKind::Upload, "..").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.put(ImageKind::Upload, "/etc/passwd", vec![1]).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_directory_is_not_a_file() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;
        std::fs::create_dir(dir.path().join("uploads").join("nested")).unwrap();
        assert!(!storage.exists(ImageKind::Upload, "nested").await.unwrap());
    }

    #[tokio::test]
    async fn test_stream_download() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;
        let data: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
        storage
            .put(ImageKind::Upload, "big.bmp", data.clone())
            .await
            .unwrap();

        let mut stream = storage
            .download_stream(ImageKind::Upload, "big.bmp")
            .await
            .unwrap();
        let mut downloaded = Vec::new();
        while let Some(chunk) = stream.next().await {
            downloaded.extend_from_slice(&chunk.unwrap());
        }

        assert_eq!(data, downloaded);
    }
}
