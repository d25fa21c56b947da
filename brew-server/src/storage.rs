//! Upload storage
//!
//! Files are content-addressed: `{namespace}/{sha256}.{ext}` under the upload
//! root, so re-uploading the same bytes yields the same URL.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use sha2::{Digest, Sha256};
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Maximum upload size (5 MiB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Accepted file extensions
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// URL path prefix the upload root is served under
pub const PUBLIC_PREFIX: &str = "/static/uploads";

/// Upload namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadNamespace {
    Breweries,
    Tours,
    Users,
}

impl UploadNamespace {
    pub const ALL: [UploadNamespace; 3] = [Self::Breweries, Self::Tours, Self::Users];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breweries => "breweries",
            Self::Tours => "tours",
            Self::Users => "users",
        }
    }
}

impl FromStr for UploadNamespace {
    type Err = UploadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ns| ns.as_str() == s)
            .ok_or_else(|| UploadError::UnknownNamespace(s.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("file too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("unsupported format: {0:?}")]
    Unsupported(String),

    #[error("empty file")]
    Empty,

    #[error("unknown upload namespace: {0}")]
    UnknownNamespace(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match &err {
            UploadError::TooLarge { max, .. } => {
                AppError::with_message(ErrorCode::FileTooLarge, err.to_string())
                    .with_detail("max_bytes", *max)
            }
            UploadError::Unsupported(_) => AppError::with_message(
                ErrorCode::UnsupportedFileFormat,
                format!("{err}. Supported: {}", SUPPORTED_FORMATS.join(", ")),
            ),
            UploadError::Empty => AppError::new(ErrorCode::EmptyFile),
            UploadError::UnknownNamespace(ns) => {
                AppError::new(ErrorCode::UnknownUploadNamespace).with_detail("namespace", ns.clone())
            }
            UploadError::Io(e) => {
                tracing::error!(error = %e, "Upload write failed");
                AppError::new(ErrorCode::FileStorageFailed)
            }
        }
    }
}

/// Check size and extension; returns the normalized extension
pub fn validate_upload(filename: &str, len: usize) -> Result<String, UploadError> {
    if len == 0 {
        return Err(UploadError::Empty);
    }
    if len > MAX_FILE_SIZE {
        return Err(UploadError::TooLarge {
            size: len,
            max: MAX_FILE_SIZE,
        });
    }
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(UploadError::Unsupported(ext));
    }
    Ok(ext)
}

/// Blob storage capability
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `namespace` and return the public URL
    fn put(&self, namespace: UploadNamespace, ext: &str, bytes: &[u8]) -> Result<String, UploadError>;
}

/// Filesystem-backed store
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    /// Create the store and provision every namespace directory
    pub fn open(root: impl Into<PathBuf>, public_base_url: &str) -> Result<Self, UploadError> {
        let root = root.into();
        for ns in UploadNamespace::ALL {
            std::fs::create_dir_all(root.join(ns.as_str()))?;
        }
        Ok(Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, namespace: UploadNamespace, file: &str) -> String {
        format!(
            "{}{PUBLIC_PREFIX}/{}/{file}",
            self.public_base_url,
            namespace.as_str()
        )
    }
}

impl BlobStore for LocalBlobStore {
    fn put(&self, namespace: UploadNamespace, ext: &str, bytes: &[u8]) -> Result<String, UploadError> {
        let hash = hex::encode(Sha256::digest(bytes));
        let file = format!("{hash}.{ext}");
        let path = self.root.join(namespace.as_str()).join(&file);

        if !path.exists() {
            std::fs::write(&path, bytes)?;
            tracing::info!(namespace = namespace.as_str(), file = %file, size = bytes.len(), "Upload stored");
        }
        Ok(self.url_for(namespace, &file))
    }
}
