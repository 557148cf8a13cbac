use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Durable storage for uploaded product images. Every stored file gets a
/// fresh UUID prefix, so concurrent uploads of identically named files never
/// collide.
#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub async fn init(root: impl Into<PathBuf>) -> Result<Self, std::io::Error> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` under a uniquely suffixed name and returns the stored
    /// path (relative to the process working directory).
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, DomainError> {
        let file_name = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(original_name));
        let path = self.root.join(&file_name);

        tokio::fs::write(&path, bytes).await.map_err(|e| {
            warn!("failed to store upload {}: {}", path.display(), e);
            DomainError::Internal(format!("file storage error: {}", e))
        })?;

        info!(path = %path.display(), size = bytes.len(), "upload stored");
        Ok(path.to_string_lossy().into_owned())
    }

    /// Best-effort removal of a previously stored file. Used to reclaim the
    /// upload when a later step of the submission fails.
    pub async fn remove(&self, stored_path: &str) {
        if let Err(e) = tokio::fs::remove_file(stored_path).await {
            warn!("failed to remove stored upload {}: {}", stored_path, e);
        }
    }
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
