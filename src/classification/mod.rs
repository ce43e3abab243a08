// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Category assignment for detected objects

pub mod category;
pub mod classifier;

pub use category::{Category, UnknownCategory};
pub use classifier::{
    CategoryClassifier, CategoryKeywords, CategoryTable, DEFAULT_CONFIDENCE_THRESHOLD,
};
