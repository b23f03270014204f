//! Photo uploads attached to diagnoses.
//!
//! Files land in a flat directory under a `{unix_millis}-{random}{.ext}`
//! name and are referenced by public URL (`{base}/uploads/{name}`).

use std::path::{Path, PathBuf};

use rand::Rng;

/// Route prefix the upload directory is served under.
pub const UPLOAD_ROUTE: &str = "/uploads";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Failed to store upload {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    public_base_url: String,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one file and return its public URL.
    pub fn save(
        &self,
        original_name: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| UploadError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let filename = unique_filename(original_name, content_type);
        let path = self.dir.join(&filename);
        std::fs::write(&path, bytes).map_err(|source| UploadError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(file = %filename, size = bytes.len(), "Stored upload");
        Ok(self.public_url(&filename))
    }

    pub fn public_url(&self, filename: &str) -> String {
        format!("{}{UPLOAD_ROUTE}/{filename}", self.public_base_url)
    }
}

/// `{unix_millis}-{0..1e9}{ext}`; the extension comes from the client
/// filename, falling back to the declared content type.
pub fn unique_filename(original_name: Option<&str>, content_type: Option<&str>) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    let ext = extension_for(original_name, content_type)
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    format!("{millis}-{suffix}{ext}")
}

fn extension_for(original_name: Option<&str>, content_type: Option<&str>) -> Option<String> {
    let from_name = original_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase);

    from_name.or_else(|| {
        content_type
            .and_then(mime_guess::get_mime_extensions_str)
            .and_then(|exts| exts.first())
            .map(|e| e.to_string())
    })
}
