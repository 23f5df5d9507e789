use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Image extensions accepted for client logos.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg", "ico"];

/// A logo file received from a multipart form, not yet written to disk.
#[derive(Clone, Debug, PartialEq)]
pub struct LogoUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl LogoUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.into(), bytes }
    }
}

/// Directory-backed store for uploaded logos.
///
/// Stored names are flat (`{millis}-{rand}-logo.{ext}`) and are what the
/// `clients.logo` column and the `/uploads/{name}` route refer to.
#[derive(Clone, Debug)]
pub struct LogoStore {
    dir: PathBuf,
}

impl LogoStore {
    /// Open the store, creating the directory if missing.
    pub async fn new<P: Into<PathBuf>>(dir: P) -> Result<Self, ServiceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| ServiceError::Storage(format!("cannot create {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Lowercased extension of `file_name` if it is an accepted image type.
    pub fn extension_of(file_name: &str) -> Result<String, ServiceError> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            Ok(ext)
        } else {
            Err(ServiceError::Validation(format!(
                "unsupported logo type; expected one of {}",
                ALLOWED_EXTENSIONS.join(", ")
            )))
        }
    }

    /// Write the upload and return its stored file name.
    pub async fn save(&self, upload: &LogoUpload) -> Result<String, ServiceError> {
        let ext = Self::extension_of(&upload.file_name)?;
        if upload.bytes.is_empty() {
            return Err(ServiceError::Validation("logo file is empty".into()));
        }
        let tag = Uuid::new_v4().simple().to_string();
        let name = format!("{}-{}-logo.{}", Utc::now().timestamp_millis(), &tag[..8], ext);
        fs::write(self.dir.join(&name), &upload.bytes)
            .await
            .map_err(|e| ServiceError::Storage(format!("cannot write logo {name}: {e}")))?;
        debug!(file = %name, size = upload.bytes.len(), "logo stored");
        Ok(name)
    }

    /// Delete a stored logo. Returns whether a file was removed; a missing file is not an error.
    pub async fn remove(&self, name: &str) -> Result<bool, ServiceError> {
        let Some(path) = self.resolve(name) else {
            warn!(file = %name, "refusing to remove logo outside uploads directory");
            return Ok(false);
        };
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(file = %name, "logo removed");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ServiceError::Storage(format!("cannot remove logo {name}: {e}"))),
        }
    }

    pub async fn exists(&self, name: &str) -> bool {
        match self.resolve(name) {
            Some(path) => fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false),
            None => false,
        }
    }

    /// Only bare file names map into the directory.
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let bare = Path::new(name).file_name()?.to_str()?;
        if bare != name || name == ".." || name == "." {
            return None;
        }
        Some(self.dir.join(bare))
    }
}
