// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze image API endpoint module
//!
//! Provides POST /analyze-image for previewing the category and caption of
//! an uploaded photo.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::analyze_image_handler;
pub use request::AnalyzeImageRequest;
pub use response::{AnalyzeImageResponse, BoundingBox, DetectedObject};
