// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection label to category mapping
//!
//! The keyword table is an explicit value handed to the classifier at
//! construction, so callers (and tests) can swap in their own mapping.

use serde::{Deserialize, Serialize};

use super::category::Category;

/// Minimum detection confidence trusted to pick a specific category
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.65;

/// Keywords that map a detector label onto one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub category: Category,
    pub keywords: Vec<String>,
}

impl CategoryKeywords {
    pub fn new(category: Category, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Ordered keyword table; earlier entries win when keyword sets overlap
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    entries: Vec<CategoryKeywords>,
}

impl CategoryTable {
    /// Build a table, normalizing keywords to trimmed lowercase
    pub fn new(entries: Vec<CategoryKeywords>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| CategoryKeywords {
                category: entry.category,
                keywords: entry
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .collect();
        Self { entries }
    }

    /// The keyword table shipped with the service (COCO labels plus a few extras)
    pub fn reference() -> Self {
        Self::new(vec![
            CategoryKeywords::new(
                Category::Electronics,
                &["cell phone", "laptop", "keyboard", "mouse", "remote", "tv", "monitor"],
            ),
            CategoryKeywords::new(
                Category::Accessories,
                &[
                    "backpack",
                    "handbag",
                    "tie",
                    "suitcase",
                    "umbrella",
                    "wallet",
                    "sunglasses",
                    "watch",
                ],
            ),
            CategoryKeywords::new(
                Category::Clothing,
                &["shirt", "pants", "shoes", "hat", "jacket", "coat", "dress", "skirt"],
            ),
            CategoryKeywords::new(
                Category::SportsEquipment,
                &[
                    "sports ball",
                    "baseball bat",
                    "baseball glove",
                    "skateboard",
                    "surfboard",
                    "tennis racket",
                    "frisbee",
                    "skis",
                    "snowboard",
                ],
            ),
            CategoryKeywords::new(Category::Utils, &["book", "scissors", "pen", "pencil"]),
            CategoryKeywords::new(
                Category::Personal,
                &[
                    "toothbrush",
                    "hair drier",
                    "bottle",
                    "cup",
                    "wine glass",
                    "fork",
                    "knife",
                    "spoon",
                ],
            ),
            CategoryKeywords::new(Category::KeysCards, &["keys", "card"]),
            CategoryKeywords::new(Category::Other, &[]),
        ])
    }

    pub fn entries(&self) -> &[CategoryKeywords] {
        &self.entries
    }

    /// First category whose keyword set contains `label` (case-insensitive).
    /// `Other` entries never match; `Other` is only the fallthrough.
    pub fn lookup(&self, label: &str) -> Option<Category> {
        let needle = label.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.category != Category::Other)
            .find(|entry| entry.keywords.iter().any(|k| *k == needle))
            .map(|entry| entry.category)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::reference()
    }
}

/// Maps a detected label and its confidence onto a [`Category`]
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    table: CategoryTable,
    threshold: f32,
}

impl CategoryClassifier {
    pub fn new(table: CategoryTable, threshold: f32) -> Self {
        Self { table, threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Low-confidence (including NaN) or missing labels always land in `Other`.
    pub fn classify(&self, label: Option<&str>, confidence: f32) -> Category {
        if confidence.is_nan() || confidence < self.threshold {
            return Category::Other;
        }
        match label {
            Some(label) => self.table.lookup(label).unwrap_or(Category::Other),
            None => Category::Other,
        }
    }
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new(CategoryTable::reference(), DEFAULT_CONFIDENCE_THRESHOLD)
    }
}
