use std::fs;
use std::io::Write;
use std::sync::{Arc, OnceLock};

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;

use crate::error::CatalogError;

/// Binary payload with the MIME type it should be saved under.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub data: Vec<u8>,
    pub mime: Option<String>,
}

pub trait FileSaveSink: Send + Sync {
    fn save(&self, blob: &Blob, filename: &str) -> Result<(), CatalogError>;
}

impl<T: FileSaveSink + ?Sized> FileSaveSink for Arc<T> {
    fn save(&self, blob: &Blob, filename: &str) -> Result<(), CatalogError> {
        (**self).save(blob, filename)
    }
}

/// Saves blobs into a directory, replacing any existing file of the same
/// name atomically.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: Utf8PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn path_for(&self, filename: &str) -> Utf8PathBuf {
        self.root.join(sanitize_filename(filename))
    }
}

impl FileSaveSink for DirectorySink {
    fn save(&self, blob: &Blob, filename: &str) -> Result<(), CatalogError> {
        fs::create_dir_all(self.root.as_std_path())
            .map_err(|err| CatalogError::Filesystem(err.to_string()))?;
        let dest = self.path_for(filename);
        let mut temp = tempfile::Builder::new()
            .prefix("gn-catalog-save")
            .tempfile_in(self.root.as_std_path())
            .map_err(|err| CatalogError::Filesystem(err.to_string()))?;
        temp.write_all(&blob.data)
            .map_err(|err| CatalogError::Filesystem(err.to_string()))?;
        temp.persist(dest.as_std_path())
            .map_err(|err| CatalogError::Filesystem(err.to_string()))?;
        tracing::info!(path = %dest, bytes = blob.data.len(), mime = ?blob.mime, "saved file");
        Ok(())
    }
}

pub fn sanitize_filename(name: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let pattern = UNSAFE.get_or_init(|| {
        Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).expect("static filename regex is valid")
    });
    let cleaned = pattern.replace_all(name.trim(), "_").to_string();
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "download".to_string()
    } else {
        cleaned
    }
}
