//! Storage for uploaded files.
//!
//! Files live under `<root>/profiles/` and `<root>/documents/` and are
//! served read-only at [`URL_PREFIX`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use paddock_core::UploadPurpose;

/// Public path the upload root is served under.
pub const URL_PREFIX: &str = "/uploads";

/// Errors from the file store. Paths appear only in logs, never in responses.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// URL does not point into this store.
    #[error("not a stored upload: {0}")]
    ForeignUrl(String),
}

/// Persists accepted uploads and hands back their public URL.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `bytes` for `purpose` and return the URL it is served at.
    ///
    /// `extension` is either empty or a sanitized `.ext` suffix.
    async fn put(
        &self,
        purpose: UploadPurpose,
        extension: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError>;

    /// Delete a file previously returned by [`FileStore::put`].
    async fn remove(&self, url: &str) -> Result<(), StorageError>;
}

/// [`FileStore`] writing to a local directory.
#[derive(Debug, Clone)]
pub struct LocalDiskStore {
    root: PathBuf,
}

impl LocalDiskStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory served at [`URL_PREFIX`].
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the purpose directories if they are missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if a directory cannot be created.
    pub async fn ensure_dirs(&self) -> Result<(), StorageError> {
        for purpose in [UploadPurpose::Profile, UploadPurpose::Document] {
            fs::create_dir_all(self.root.join(purpose.directory())).await?;
        }
        Ok(())
    }

    /// Map a public URL back to its path under the root.
    fn path_for_url(&self, url: &str) -> Result<PathBuf, StorageError> {
        let foreign = || StorageError::ForeignUrl(url.to_owned());

        let rest = url
            .strip_prefix(URL_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(foreign)?;
        let (dir, name) = rest.split_once('/').ok_or_else(foreign)?;

        let known_dir = [UploadPurpose::Profile, UploadPurpose::Document]
            .iter()
            .any(|purpose| purpose.directory() == dir);
        if !known_dir || name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
            return Err(foreign());
        }

        Ok(self.root.join(dir).join(name))
    }
}

/// `<unix-millis>-<random below 1e9><extension>`.
fn generate_file_name(extension: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    format!("{millis}-{suffix}{extension}")
}

/// Remove a partially written temp file; failures are logged, not returned.
async fn discard_temp_file(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "removed partial upload"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "could not remove partial upload"
        ),
    }
}

#[async_trait]
impl FileStore for LocalDiskStore {
    async fn put(
        &self,
        purpose: UploadPurpose,
        extension: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        let dir = self.root.join(purpose.directory());
        fs::create_dir_all(&dir).await?;

        let name = generate_file_name(extension);
        let final_path = dir.join(&name);
        let temp_path = dir.join(format!(".{name}.tmp"));

        // Atomic write: temp file + rename
        let written = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(bytes).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&temp_path, &final_path).await
        }
        .await;

        if let Err(e) = written {
            tracing::warn!(
                path = %temp_path.display(),
                error = %e,
                "upload write failed"
            );
            discard_temp_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(path = %final_path.display(), size = bytes.len(), "upload stored");
        Ok(format!("{URL_PREFIX}/{}/{name}", purpose.directory()))
    }

    async fn remove(&self, url: &str) -> Result<(), StorageError> {
        let path = self.path_for_url(url)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
