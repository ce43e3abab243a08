// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Title and description generation for item photos

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use super::image_utils::EncodedImage;

pub const PLACEHOLDER_TITLE: &str = "Untitled item";
pub const PLACEHOLDER_DESCRIPTION: &str = "Automatic description unavailable: the captioning model is not loaded. Please edit this description before submitting.";

/// Short title plus a longer description for one photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caption {
    pub title: String,
    pub description: String,
}

impl Caption {
    pub fn placeholder() -> Self {
        Self {
            title: PLACEHOLDER_TITLE.to_string(),
            description: PLACEHOLDER_DESCRIPTION.to_string(),
        }
    }

    /// Blank fields fall back to the placeholder text
    pub fn or_placeholder(self) -> Self {
        Self {
            title: non_blank(self.title, PLACEHOLDER_TITLE),
            description: non_blank(self.description, PLACEHOLDER_DESCRIPTION),
        }
    }
}

fn non_blank(text: String, fallback: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Vision-language model producing text about an image
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Captioner: Send + Sync {
    async fn title(&self, image: &EncodedImage) -> Result<String>;

    async fn description(&self, image: &EncodedImage) -> Result<String>;
}

/// Captioner availability, decided once at startup
#[derive(Clone)]
pub enum CaptionService {
    Available(Arc<dyn Captioner>),
    Unavailable,
}

impl std::fmt::Debug for CaptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptionService::Available(_) => f.write_str("CaptionService::Available"),
            CaptionService::Unavailable => f.write_str("CaptionService::Unavailable"),
        }
    }
}

impl CaptionService {
    pub fn is_available(&self) -> bool {
        matches!(self, CaptionService::Available(_))
    }

    /// Title and description, requested concurrently.
    ///
    /// `Unavailable` yields the placeholder; errors from an available
    /// captioner propagate.
    pub async fn caption(&self, image: &EncodedImage) -> Result<Caption> {
        match self {
            CaptionService::Available(captioner) => {
                let (title, description) =
                    tokio::try_join!(captioner.title(image), captioner.description(image))?;
                Ok(Caption {
                    title: title.trim().to_string(),
                    description: description.trim().to_string(),
                })
            }
            CaptionService::Unavailable => Ok(Caption::placeholder()),
        }
    }
}
