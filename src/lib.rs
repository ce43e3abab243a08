// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod classification;
pub mod cli;
pub mod config;
pub mod intake;
pub mod storage;
pub mod version;
pub mod vision;

// Re-export main types
pub use api::{create_app, start_server, AppState};
pub use classification::{Category, CategoryClassifier, CategoryTable};
pub use config::ServiceConfig;
pub use intake::{Analysis, CreateItem, IntakeError, ItemIntake};
pub use storage::{ImageStore, ItemFilter, ItemStore, LostItem, NewLostItem, SqliteItemStore};
