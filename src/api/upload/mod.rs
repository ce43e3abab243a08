// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Photo upload endpoints
//!
//! Provides POST /upload (store only) and POST /submit-item (store, analyse
//! and persist).

pub mod handler;
pub mod multipart;

pub use handler::{submit_item_handler, upload_handler, UploadResponse};
