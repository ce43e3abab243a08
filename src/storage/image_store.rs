// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Uploaded image blobs on the local filesystem

use anyhow::Context;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs as async_fs;
use tracing::debug;
use uuid::Uuid;

const MAX_FILENAME_LEN: usize = 255;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Invalid image filename '{0}'")]
    InvalidFilename(String),

    #[error("Image '{0}' not found")]
    NotFound(String),

    #[error("Image store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Check a client-supplied handle is a plain `<name>.<ext>` with no path parts
pub fn validate_filename(filename: &str) -> Result<(), BlobError> {
    let invalid = || BlobError::InvalidFilename(filename.to_string());

    if filename.is_empty() || filename.len() > MAX_FILENAME_LEN || filename.starts_with('.') {
        return Err(invalid());
    }
    if !filename
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(invalid());
    }
    if filename.contains("..") {
        return Err(invalid());
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

/// Directory of uploaded photos, each under a random `<uuid>.<ext>` name
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Use `root` as the upload directory, creating it if needed
    pub async fn open<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        async_fs::create_dir_all(&root)
            .await
            .with_context(|| format!("Failed to create upload directory {:?}", root))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, filename: &str) -> Result<PathBuf, BlobError> {
        validate_filename(filename)?;
        Ok(self.root.join(filename))
    }

    /// Write a new blob, returning its generated filename
    pub async fn save(&self, bytes: &[u8], extension: &str) -> Result<String, BlobError> {
        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.path_for(&filename)?;
        async_fs::write(&path, bytes).await?;
        debug!("Stored {} bytes as {}", bytes.len(), filename);
        Ok(filename)
    }

    pub async fn load(&self, filename: &str) -> Result<Vec<u8>, BlobError> {
        let path = self.path_for(filename)?;
        match async_fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(BlobError::NotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a blob; `Ok(false)` when it was already gone
    pub async fn remove(&self, filename: &str) -> Result<bool, BlobError> {
        let path = self.path_for(filename)?;
        match async_fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
