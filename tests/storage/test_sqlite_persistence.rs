// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! File-backed SQLite store: items survive reopening the database

use chrono::Utc;
use lostfound_node::classification::Category;
use lostfound_node::storage::{ItemFilter, ItemStore, NewLostItem, SqliteItemStore};
use tempfile::TempDir;

fn database_url(dir: &TempDir) -> String {
    format!("sqlite://{}", dir.path().join("lost_items.db").display())
}

fn new_item(title: &str, category: Category) -> NewLostItem {
    NewLostItem {
        title: title.to_string(),
        description: format!("{} found near the entrance", title),
        category: category.as_str().to_string(),
        found_location: Some("Main entrance".to_string()),
        filename: Some("0b6f1c9e-3d2a-4c55-9d0e-1f2a3b4c5d6e.jpg".to_string()),
        confidence: Some(0.8125),
        object_name: Some("suitcase".to_string()),
    }
}

#[tokio::test]
async fn test_items_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let url = database_url(&dir);

    let created = {
        let store = SqliteItemStore::connect(&url).await.unwrap();
        let item = store
            .create(new_item("Grey suitcase", Category::Accessories))
            .await
            .unwrap();
        store.pool().close().await;
        item
    };

    let store = SqliteItemStore::connect(&url).await.unwrap();
    let fetched = store.get(created.id).await.unwrap().unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.category, "Accessories");
    assert_eq!(fetched.confidence, Some(0.8125));
    assert!(fetched.added_at <= Utc::now());
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_reopen_does_not_rerun_migrations_destructively() {
    let dir = TempDir::new().unwrap();
    let url = database_url(&dir);

    {
        let store = SqliteItemStore::connect(&url).await.unwrap();
        store.create(new_item("Umbrella", Category::Accessories)).await.unwrap();
        store.create(new_item("Headphones", Category::Electronics)).await.unwrap();
        store.pool().close().await;
    }

    let store = SqliteItemStore::connect(&url).await.unwrap();
    store.create(new_item("Gloves", Category::Clothing)).await.unwrap();

    let all = store.list(&ItemFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].title, "Gloves");

    let ids: Vec<i64> = all.iter().map(|i| i.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(ids, sorted);
}

#[tokio::test]
async fn test_delete_returns_removed_row() {
    let dir = TempDir::new().unwrap();
    let store = SqliteItemStore::connect(&database_url(&dir)).await.unwrap();

    let created = store.create(new_item("Watch", Category::Accessories)).await.unwrap();
    let removed = store.delete(created.id).await.unwrap().unwrap();

    assert_eq!(removed, created);
    assert!(store.get(created.id).await.unwrap().is_none());
    assert!(store.delete(created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_url_is_an_error() {
    let result = SqliteItemStore::connect("postgres://nope").await;
    assert!(result.is_err());
}
