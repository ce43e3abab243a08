// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lost item endpoints
//!
//! Provides create, list, get and delete over persisted items.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{
    create_lost_item_handler, delete_lost_item_handler, get_lost_item_handler,
    list_lost_items_handler,
};
pub use request::{CreateLostItemRequest, ListItemsQuery};
pub use response::{DeleteItemResponse, LostItemResponse, UPLOADS_PREFIX};
