use std::path::{Path, PathBuf};

use tracing::info;
use uuid::Uuid;

use crate::models::UserError;

const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Served when a user registers without uploading a picture.
pub const DEFAULT_AVATAR: &str = "/uploads/default-avatar.png";

/// Writes uploaded avatar images under the configured upload directory and
/// hands back the public path they will be served from.
pub struct AvatarStore {
    upload_dir: PathBuf,
}

impl AvatarStore {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    /// Store an uploaded file under a fresh UUID name, keeping only the
    /// extension from the client-supplied filename.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<String, UserError> {
        let extension = Self::extension_of(original_name)?;
        let stored_name = format!("{}.{}", Uuid::new_v4(), extension);

        tokio::fs::create_dir_all(&self.upload_dir).await?;
        tokio::fs::write(self.upload_dir.join(&stored_name), data).await?;

        info!("Stored avatar {} ({} bytes)", stored_name, data.len());
        Ok(format!("/uploads/{}", stored_name))
    }

    fn extension_of(original_name: &str) -> Result<String, UserError> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| UserError::UnsupportedFileType(original_name.to_string()))?;

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(UserError::UnsupportedFileType(original_name.to_string()));
        }
        Ok(extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn saves_under_a_uuid_name_with_the_original_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = AvatarStore::new(dir.path());

        let public_path = store.save("Photo.PNG", b"fake-image").await.unwrap();

        assert!(public_path.starts_with("/uploads/"));
        assert!(public_path.ends_with(".png"));
        let stored = dir.path().join(public_path.trim_start_matches("/uploads/"));
        assert_eq!(tokio::fs::read(stored).await.unwrap(), b"fake-image");
    }

    #[tokio::test]
    async fn rejects_disallowed_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let store = AvatarStore::new(dir.path());

        assert_matches!(
            store.save("malware.exe", b"nope").await,
            Err(UserError::UnsupportedFileType(_))
        );
        assert_matches!(
            store.save("no-extension", b"nope").await,
            Err(UserError::UnsupportedFileType(_))
        );
    }
}
