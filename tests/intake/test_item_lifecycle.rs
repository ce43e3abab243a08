// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Listing, filtering and deletion of stored items

use crate::common::{png_bytes, FakeDetector, IntakeBuilder};
use chrono::{Duration, Utc};
use lostfound_node::classification::Category;
use lostfound_node::intake::{build_filter, CreateItem, IntakeError};
use lostfound_node::storage::ItemFilter;

fn item(title: &str, category: &str) -> CreateItem {
    CreateItem {
        title: title.to_string(),
        description: format!("{} description", title),
        category: Some(category.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let t = IntakeBuilder::new().build().await;

    let first = t.intake.create_item(item("Wallet", "Accessories")).await.unwrap();
    let second = t.intake.create_item(item("Laptop", "Electronics")).await.unwrap();
    let third = t.intake.create_item(item("Jacket", "Clothing")).await.unwrap();

    let items = t.intake.list_items(&ItemFilter::default()).await.unwrap();
    let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[tokio::test]
async fn test_list_filters_by_category_and_limit() {
    let t = IntakeBuilder::new().build().await;

    for title in ["Phone", "Tablet", "Charger"] {
        t.intake.create_item(item(title, "Electronics")).await.unwrap();
    }
    t.intake.create_item(item("Hat", "Clothing")).await.unwrap();

    let filter = build_filter(Some("Electronics"), None, Some(2)).unwrap();
    let items = t.intake.list_items(&filter).await.unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.category == "Electronics"));
    assert_eq!(items[0].title, "Charger");

    let filter = ItemFilter {
        category: Some(Category::Clothing),
        ..Default::default()
    };
    let items = t.intake.list_items(&filter).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Hat");
}

#[tokio::test]
async fn test_list_since_bound() {
    let t = IntakeBuilder::new().build().await;
    t.intake.create_item(item("Bottle", "Personal")).await.unwrap();

    let past = ItemFilter {
        since: Some(Utc::now() - Duration::hours(1)),
        ..Default::default()
    };
    assert_eq!(t.intake.list_items(&past).await.unwrap().len(), 1);

    let future = ItemFilter {
        since: Some(Utc::now() + Duration::hours(1)),
        ..Default::default()
    };
    assert!(t.intake.list_items(&future).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_missing_item() {
    let t = IntakeBuilder::new().build().await;
    let err = t.intake.get_item(42).await.unwrap_err();
    assert!(matches!(err, IntakeError::ItemNotFound(42)));
}

#[tokio::test]
async fn test_delete_removes_row_and_photo() {
    let t = IntakeBuilder::new()
        .detector(FakeDetector::seeing("scissors", 0.9))
        .build()
        .await;

    let submitted = t.intake.submit_item(&png_bytes(), None).await.unwrap();
    let path = t.upload_dir.path().join(submitted.filename.clone().unwrap());
    assert!(path.exists());

    let deleted = t.intake.delete_item(submitted.id).await.unwrap();
    assert_eq!(deleted.id, submitted.id);
    assert!(!path.exists());

    let err = t.intake.get_item(submitted.id).await.unwrap_err();
    assert!(matches!(err, IntakeError::ItemNotFound(_)));

    let err = t.intake.delete_item(submitted.id).await.unwrap_err();
    assert!(matches!(err, IntakeError::ItemNotFound(_)));
}

#[tokio::test]
async fn test_delete_tolerates_missing_photo() {
    let t = IntakeBuilder::new().build().await;

    let filename = t.intake.upload(&png_bytes()).await.unwrap();
    let mut request = item("Notebook", "Utils");
    request.filename = Some(filename.clone());
    let created = t.intake.create_item(request).await.unwrap();

    std::fs::remove_file(t.upload_dir.path().join(&filename)).unwrap();

    let deleted = t.intake.delete_item(created.id).await.unwrap();
    assert_eq!(deleted.filename.as_deref(), Some(filename.as_str()));
    assert_eq!(t.intake.count_items().await.unwrap(), 0);
}
