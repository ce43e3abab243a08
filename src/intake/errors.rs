// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use thiserror::Error;

use crate::classification::UnknownCategory;
use crate::storage::BlobError;
use crate::vision::ImageError;

/// Failures of the item intake pipeline
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Invalid image: {0}")]
    InvalidImage(#[from] ImageError),

    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid category: {0}")]
    InvalidCategory(#[from] UnknownCategory),

    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("Invalid filename '{0}'")]
    InvalidFilename(String),

    #[error("Invalid limit {0}: expected 1 to {max}", max = super::query::MAX_LIST_LIMIT)]
    InvalidLimit(i64),

    #[error("Lost item {0} not found")]
    ItemNotFound(i64),

    #[error("Image '{0}' not found")]
    ImageNotFound(String),

    #[error("Object detector is not loaded")]
    DetectorUnavailable,

    #[error("Object detection failed: {0:#}")]
    Detection(anyhow::Error),

    #[error("Captioning failed: {0:#}")]
    Captioning(anyhow::Error),

    #[error("Storage error: {0:#}")]
    Storage(anyhow::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<BlobError> for IntakeError {
    fn from(err: BlobError) -> Self {
        match err {
            BlobError::InvalidFilename(name) => IntakeError::InvalidFilename(name),
            BlobError::NotFound(name) => IntakeError::ImageNotFound(name),
            BlobError::Io(e) => IntakeError::Io(e),
        }
    }
}

impl IntakeError {
    /// True for errors caused by the request rather than the service
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            IntakeError::DetectorUnavailable
                | IntakeError::Detection(_)
                | IntakeError::Captioning(_)
                | IntakeError::Storage(_)
                | IntakeError::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, IntakeError>;
