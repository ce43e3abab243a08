// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod analyze;
pub mod errors;
pub mod http_server;
pub mod items;
pub mod upload;

pub use analyze::{analyze_image_handler, AnalyzeImageRequest, AnalyzeImageResponse};
pub use errors::{ApiError, ErrorResponse};
pub use http_server::{build_state, create_app, start_server, AppState, HealthResponse};
pub use items::{CreateLostItemRequest, DeleteItemResponse, ListItemsQuery, LostItemResponse};
pub use upload::UploadResponse;
