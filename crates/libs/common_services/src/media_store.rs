//! Disk-backed storage for re-encoded album images.
//!
//! Blobs live at `<media_root>/albums/<album_id>/<image_id>.jpg` and are
//! served back under `/media/`. Writes are chunked so the caller can observe
//! byte-level progress while a blob lands.

use color_eyre::eyre::{Result, WrapErr};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;

const WRITE_CHUNK_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct MediaStore {
    media_root: PathBuf,
    public_base_url: String,
}

impl MediaStore {
    #[must_use]
    pub fn new(media_root: PathBuf, public_base_url: &str) -> Self {
        Self {
            media_root,
            public_base_url: public_base_url.trim_end_matches('/').to_owned(),
        }
    }

    #[must_use]
    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    fn album_dir(&self, album_id: &str) -> PathBuf {
        self.media_root.join("albums").join(album_id)
    }

    fn blob_path(&self, album_id: &str, image_id: &str) -> PathBuf {
        self.album_dir(album_id).join(format!("{image_id}.jpg"))
    }

    /// Public download URL for a stored image.
    #[must_use]
    pub fn public_url(&self, album_id: &str, image_id: &str) -> String {
        format!(
            "{}/media/albums/{album_id}/{image_id}.jpg",
            self.public_base_url
        )
    }

    /// Write a blob in chunks, reporting `(bytes_written, bytes_total)` after
    /// every chunk. Returns the public URL of the stored image.
    pub async fn save(
        &self,
        album_id: &str,
        image_id: &str,
        bytes: &[u8],
        mut on_progress: impl FnMut(u64, u64),
    ) -> Result<String> {
        let path = self.blob_path(album_id, image_id);
        fs::create_dir_all(self.album_dir(album_id))
            .await
            .wrap_err("Failed to create album media directory")?;

        let mut file = fs::File::create(&path)
            .await
            .wrap_err_with(|| format!("Failed to create blob {}", path.display()))?;

        let total = bytes.len() as u64;
        let mut written: u64 = 0;
        for chunk in bytes.chunks(WRITE_CHUNK_BYTES) {
            file.write_all(chunk)
                .await
                .wrap_err_with(|| format!("Failed to write blob {}", path.display()))?;
            written += chunk.len() as u64;
            on_progress(written, total);
        }
        file.flush().await?;

        Ok(self.public_url(album_id, image_id))
    }

    /// Remove a single image blob. Missing files are fine; the record is the
    /// source of truth and the blob may already be gone.
    pub async fn delete(&self, album_id: &str, image_id: &str) -> Result<()> {
        let path = self.blob_path(album_id, image_id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Blob already gone: {}", path.display());
                Ok(())
            }
            Err(e) => Err(e).wrap_err_with(|| format!("Failed to delete {}", path.display())),
        }
    }

    /// Remove every blob an album owns, then its directory.
    pub async fn delete_album(&self, album_id: &str) -> Result<()> {
        let dir = self.album_dir(album_id);
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).wrap_err_with(|| format!("Failed to delete {}", dir.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(root: &Path) -> MediaStore {
        MediaStore::new(root.to_path_buf(), "https://plurr.app/")
    }

    #[test]
    fn public_url_strips_trailing_slash() {
        let store = store(Path::new("/tmp/media"));
        assert_eq!(
            store.public_url("a1b2c3", "img-1"),
            "https://plurr.app/media/albums/a1b2c3/img-1.jpg"
        );
    }

    #[tokio::test]
    async fn save_reports_progress_up_to_total() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store(dir.path());
        let payload = vec![7u8; 150 * 1024];

        let mut reports = Vec::new();
        let url = store
            .save("album1", "img1", &payload, |written, total| {
                reports.push((written, total));
            })
            .await
            .expect("save");

        assert!(url.ends_with("/media/albums/album1/img1.jpg"));
        assert_eq!(reports.len(), 3);
        assert_eq!(reports.last(), Some(&(payload.len() as u64, payload.len() as u64)));
        let on_disk = std::fs::read(dir.path().join("albums/album1/img1.jpg")).expect("read back");
        assert_eq!(on_disk.len(), payload.len());
    }

    #[tokio::test]
    async fn delete_album_removes_all_blobs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store(dir.path());
        store
            .save("album1", "img1", b"one", |_, _| {})
            .await
            .expect("save");
        store
            .save("album1", "img2", b"two", |_, _| {})
            .await
            .expect("save");

        store.delete_album("album1").await.expect("delete");
        assert!(!dir.path().join("albums/album1").exists());

        // Deleting again is a no-op, not an error.
        store.delete_album("album1").await.expect("idempotent");
    }

    #[tokio::test]
    async fn delete_missing_blob_is_ok() {
        let dir = tempfile::tempdir().expect("tempdir");
        store(dir.path())
            .delete("album1", "never-existed")
            .await
            .expect("missing blob is not an error");
    }
}
