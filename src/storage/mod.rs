// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod image_store;
pub mod item_store;
pub mod sqlite;

// Re-export main types for convenience
pub use image_store::{validate_filename, BlobError, ImageStore};
pub use item_store::{ItemFilter, ItemStore, LostItem, NewLostItem};
pub use sqlite::SqliteItemStore;
