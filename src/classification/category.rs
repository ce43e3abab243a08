// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fixed set of item categories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

/// Coarse bucket assigned to a lost item for browsing and filtering.
///
/// Declaration order is the matching priority used by the classifier.
/// The wire name (`as_str`) is what gets stored and returned over HTTP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Category {
    Electronics,
    Accessories,
    Clothing,
    SportsEquipment,
    Utils,
    Personal,
    KeysCards,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Electronics,
        Category::Accessories,
        Category::Clothing,
        Category::SportsEquipment,
        Category::Utils,
        Category::Personal,
        Category::KeysCards,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Accessories => "Accessories",
            Category::Clothing => "Clothing",
            Category::SportsEquipment => "Sports Equipment",
            Category::Utils => "Utils",
            Category::Personal => "Personal",
            Category::KeysCards => "Keys/Cards",
            Category::Other => "Other",
        }
    }

    fn identifier(&self) -> &'static str {
        match self {
            Category::SportsEquipment => "SportsEquipment",
            Category::KeysCards => "KeysCards",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts the wire name or the variant identifier, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| {
                c.as_str().eq_ignore_ascii_case(needle) || c.identifier().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl From<Category> for &'static str {
    fn from(category: Category) -> Self {
        category.as_str()
    }
}

impl TryFrom<String> for Category {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
