// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Single-request submit flow against a real SQLite store and upload dir

use crate::common::{jpeg_bytes, png_bytes, FakeCaptioner, FakeDetector, IntakeBuilder};
use lostfound_node::intake::IntakeError;
use lostfound_node::storage::ItemFilter;
use lostfound_node::vision::captioner::{PLACEHOLDER_DESCRIPTION, PLACEHOLDER_TITLE};

#[tokio::test]
async fn test_submit_persists_classified_item() {
    let t = IntakeBuilder::new()
        .detector(FakeDetector::seeing("cell phone", 0.91))
        .captioner(FakeCaptioner::new("Black smartphone", "A black phone with a cracked screen."))
        .build()
        .await;

    let item = t
        .intake
        .submit_item(&png_bytes(), Some("  Library, 2nd floor ".to_string()))
        .await
        .unwrap();

    assert!(item.id > 0);
    assert_eq!(item.category, "Electronics");
    assert_eq!(item.title, "Black smartphone");
    assert_eq!(item.description, "A black phone with a cracked screen.");
    assert_eq!(item.object_name.as_deref(), Some("cell phone"));
    assert_eq!(item.found_location.as_deref(), Some("Library, 2nd floor"));
    assert!((item.confidence.unwrap() - 0.91).abs() < 1e-6);

    let filename = item.filename.clone().unwrap();
    assert!(filename.ends_with(".png"));
    assert!(t.upload_dir.path().join(&filename).exists());

    let fetched = t.intake.get_item(item.id).await.unwrap();
    assert_eq!(fetched, item);
}

#[tokio::test]
async fn test_low_confidence_lands_in_other() {
    let t = IntakeBuilder::new()
        .detector(FakeDetector::seeing("laptop", 0.40))
        .build()
        .await;

    let item = t.intake.submit_item(&jpeg_bytes(), None).await.unwrap();

    assert_eq!(item.category, "Other");
    // The detection is still recorded even though it was not trusted
    assert_eq!(item.object_name.as_deref(), Some("laptop"));
    assert!(item.filename.unwrap().ends_with(".jpg"));
}

#[tokio::test]
async fn test_nothing_detected_stores_other_without_object() {
    let t = IntakeBuilder::new().detector(FakeDetector::empty()).build().await;

    let item = t.intake.submit_item(&png_bytes(), None).await.unwrap();

    assert_eq!(item.category, "Other");
    assert!(item.object_name.is_none());
    assert!(item.confidence.is_none());
}

#[tokio::test]
async fn test_missing_captioner_uses_placeholders() {
    let t = IntakeBuilder::new()
        .detector(FakeDetector::seeing("umbrella", 0.88))
        .build()
        .await;

    let item = t.intake.submit_item(&png_bytes(), None).await.unwrap();

    assert_eq!(item.title, PLACEHOLDER_TITLE);
    assert_eq!(item.description, PLACEHOLDER_DESCRIPTION);
    assert_eq!(item.category, "Accessories");
}

#[tokio::test]
async fn test_blank_caption_falls_back_to_placeholder() {
    let t = IntakeBuilder::new()
        .detector(FakeDetector::seeing("backpack", 0.9))
        .captioner(FakeCaptioner::new("   ", "Red backpack with keychain."))
        .build()
        .await;

    let item = t.intake.submit_item(&png_bytes(), None).await.unwrap();

    assert_eq!(item.title, PLACEHOLDER_TITLE);
    assert_eq!(item.description, "Red backpack with keychain.");
}

#[tokio::test]
async fn test_invalid_image_is_rejected_before_storage() {
    let t = IntakeBuilder::new()
        .detector(FakeDetector::seeing("tie", 0.9))
        .build()
        .await;

    let err = t
        .intake
        .submit_item(b"definitely not an image", None)
        .await
        .unwrap_err();

    assert!(matches!(err, IntakeError::InvalidImage(_)));
    assert!(err.is_client_error());
    assert_eq!(std::fs::read_dir(t.upload_dir.path()).unwrap().count(), 0);
    assert_eq!(t.intake.count_items().await.unwrap(), 0);
}

#[tokio::test]
async fn test_detector_unavailable_leaves_nothing_behind() {
    let t = IntakeBuilder::new().build().await;

    let err = t.intake.submit_item(&png_bytes(), None).await.unwrap_err();

    assert!(matches!(err, IntakeError::DetectorUnavailable));
    assert_eq!(std::fs::read_dir(t.upload_dir.path()).unwrap().count(), 0);
    assert_eq!(t.intake.count_items().await.unwrap(), 0);
}

#[tokio::test]
async fn test_detection_failure_discards_photo() {
    let t = IntakeBuilder::new()
        .detector(FakeDetector::failing())
        .build()
        .await;

    let err = t.intake.submit_item(&png_bytes(), None).await.unwrap_err();

    assert!(matches!(err, IntakeError::Detection(_)));
    assert!(!err.is_client_error());
    assert_eq!(std::fs::read_dir(t.upload_dir.path()).unwrap().count(), 0);
    let items = t.intake.list_items(&ItemFilter::default()).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_captioner_failure_discards_photo() {
    let t = IntakeBuilder::new()
        .detector(FakeDetector::seeing("book", 0.95))
        .captioner(FakeCaptioner::failing())
        .build()
        .await;

    let err = t.intake.submit_item(&png_bytes(), None).await.unwrap_err();

    assert!(matches!(err, IntakeError::Captioning(_)));
    assert_eq!(std::fs::read_dir(t.upload_dir.path()).unwrap().count(), 0);
}
