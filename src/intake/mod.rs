// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Item intake pipeline
//!
//! Orchestrates photo validation, blob storage, detection, classification,
//! captioning and persistence of lost items.

pub mod errors;
pub mod query;

use image::DynamicImage;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::classification::{Category, CategoryClassifier};
use crate::storage::{validate_filename, ImageStore, ItemFilter, ItemStore, LostItem, NewLostItem};
use crate::vision::image_utils::{decode_image_bytes, format_to_extension};
use crate::vision::{Caption, CaptionService, Detection, DetectionResult, EncodedImage, ObjectDetector};

pub use errors::{IntakeError, Result};
pub use query::{build_filter, parse_since, MAX_LIST_LIMIT};

/// Preview produced by analysing a stored photo; nothing is persisted
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub object_name: Option<String>,
    pub confidence: Option<f32>,
    pub filename: String,
    pub detections: Vec<Detection>,
}

/// Client-supplied fields for creating an item
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateItem {
    pub title: String,
    pub description: String,
    /// Defaults to `Other` when absent
    pub category: Option<String>,
    pub found_location: Option<String>,
    pub filename: Option<String>,
    pub object_name: Option<String>,
    pub confidence: Option<f32>,
}

#[derive(Clone)]
pub struct ItemIntake {
    detector: Option<Arc<dyn ObjectDetector>>,
    captions: CaptionService,
    classifier: CategoryClassifier,
    items: Arc<dyn ItemStore>,
    images: ImageStore,
}

impl ItemIntake {
    pub fn new(
        detector: Option<Arc<dyn ObjectDetector>>,
        captions: CaptionService,
        classifier: CategoryClassifier,
        items: Arc<dyn ItemStore>,
        images: ImageStore,
    ) -> Self {
        Self {
            detector,
            captions,
            classifier,
            items,
            images,
        }
    }

    pub fn has_detector(&self) -> bool {
        self.detector.is_some()
    }

    pub fn has_captioner(&self) -> bool {
        self.captions.is_available()
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    /// Category for a detected label at the given confidence
    pub fn categorize(&self, label: Option<&str>, confidence: f32) -> Category {
        self.classifier.classify(label, confidence)
    }

    /// Validate and store an uploaded photo, returning its handle
    pub async fn upload(&self, bytes: &[u8]) -> Result<String> {
        let (_, info) = decode_image_bytes(bytes)?;
        let filename = self
            .images
            .save(bytes, format_to_extension(info.format))
            .await?;
        info!(
            "Stored upload {} ({}x{}, {} bytes)",
            filename, info.width, info.height, info.size_bytes
        );
        Ok(filename)
    }

    /// Run detection, classification and captioning over a stored photo
    pub async fn analyze(&self, filename: &str) -> Result<Analysis> {
        validate_filename(filename)?;
        let bytes = self.images.load(filename).await?;
        let (image, info) = decode_image_bytes(&bytes)?;
        self.analyze_image(image, EncodedImage::new(bytes, info.format), filename)
            .await
    }

    /// Single-request flow: store, analyse and persist in one go
    pub async fn submit_item(
        &self,
        bytes: &[u8],
        found_location: Option<String>,
    ) -> Result<LostItem> {
        let (image, info) = decode_image_bytes(bytes)?;
        let filename = self
            .images
            .save(bytes, format_to_extension(info.format))
            .await?;

        let encoded = EncodedImage::new(bytes.to_vec(), info.format);
        let analysis = match self.analyze_image(image, encoded, &filename).await {
            Ok(analysis) => analysis,
            Err(e) => {
                self.discard_blob(&filename).await;
                return Err(e);
            }
        };

        let caption = Caption {
            title: analysis.title,
            description: analysis.description,
        }
        .or_placeholder();

        let new_item = NewLostItem {
            title: caption.title,
            description: caption.description,
            category: analysis.category.as_str().to_string(),
            found_location: normalize_optional(found_location),
            filename: Some(filename.clone()),
            confidence: analysis.confidence,
            object_name: analysis.object_name,
        };

        match self.items.create(new_item).await {
            Ok(item) => {
                info!("Registered lost item {} ({})", item.id, item.category);
                Ok(item)
            }
            Err(e) => {
                self.discard_blob(&filename).await;
                Err(IntakeError::Storage(e))
            }
        }
    }

    /// Persist an item from client-edited fields
    pub async fn create_item(&self, request: CreateItem) -> Result<LostItem> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(IntakeError::MissingField("title"));
        }
        let description = request.description.trim();
        if description.is_empty() {
            return Err(IntakeError::MissingField("description"));
        }

        let category = match request.category.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse::<Category>()?,
            _ => Category::Other,
        };

        let filename = normalize_optional(request.filename);
        if let Some(ref name) = filename {
            validate_filename(name)?;
        }

        let new_item = NewLostItem {
            title: title.to_string(),
            description: description.to_string(),
            category: category.as_str().to_string(),
            found_location: normalize_optional(request.found_location),
            filename,
            confidence: request.confidence,
            object_name: normalize_optional(request.object_name),
        };

        let item = self.items.create(new_item).await.map_err(IntakeError::Storage)?;
        info!("Created lost item {} ({})", item.id, item.category);
        Ok(item)
    }

    pub async fn get_item(&self, id: i64) -> Result<LostItem> {
        self.items
            .get(id)
            .await
            .map_err(IntakeError::Storage)?
            .ok_or(IntakeError::ItemNotFound(id))
    }

    pub async fn count_items(&self) -> Result<i64> {
        self.items.count().await.map_err(IntakeError::Storage)
    }

    /// Items matching `filter`, newest first
    pub async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<LostItem>> {
        let items = self.items.list(filter).await.map_err(IntakeError::Storage)?;
        debug!("Listed {} lost items with {:?}", items.len(), filter);
        Ok(items)
    }

    /// Delete an item and its photo; a photo that is already gone is fine
    pub async fn delete_item(&self, id: i64) -> Result<LostItem> {
        let item = self
            .items
            .delete(id)
            .await
            .map_err(IntakeError::Storage)?
            .ok_or(IntakeError::ItemNotFound(id))?;

        if let Some(ref filename) = item.filename {
            match self.images.remove(filename).await {
                Ok(true) => debug!("Removed image {} of item {}", filename, id),
                Ok(false) => warn!("Image {} of item {} was already missing", filename, id),
                Err(e) => warn!("Failed to remove image {} of item {}: {}", filename, id, e),
            }
        }

        info!("Deleted lost item {}", id);
        Ok(item)
    }

    async fn analyze_image(
        &self,
        image: DynamicImage,
        encoded: EncodedImage,
        filename: &str,
    ) -> Result<Analysis> {
        let detector = self.detector.clone().ok_or(IntakeError::DetectorUnavailable)?;

        // Detection is CPU-bound; captioning waits on the sidecar
        let detect = async move {
            match tokio::task::spawn_blocking(move || detector.detect(&image)).await {
                Ok(result) => result.map_err(IntakeError::Detection),
                Err(e) => Err(IntakeError::Detection(anyhow::anyhow!(
                    "Detection task failed: {}",
                    e
                ))),
            }
        };
        let caption = async {
            self.captions
                .caption(&encoded)
                .await
                .map_err(IntakeError::Captioning)
        };
        let (detection, caption) = tokio::try_join!(detect, caption)?;

        let (category, object_name, confidence) = self.classify_detection(&detection);
        debug!(
            "Analysed {}: {:?} @ {:?} -> {}",
            filename, object_name, confidence, category
        );

        Ok(Analysis {
            title: caption.title,
            description: caption.description,
            category,
            object_name,
            confidence,
            filename: filename.to_string(),
            detections: detection.all_detections,
        })
    }

    fn classify_detection(
        &self,
        detection: &DetectionResult,
    ) -> (Category, Option<String>, Option<f32>) {
        if !detection.detected {
            return (Category::Other, None, None);
        }
        let category = self
            .classifier
            .classify(detection.label.as_deref(), detection.confidence);
        (category, detection.label.clone(), Some(detection.confidence))
    }

    async fn discard_blob(&self, filename: &str) {
        if let Err(e) = self.images.remove(filename).await {
            warn!("Failed to discard image {}: {}", filename, e);
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
