// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Parsing of listing query parameters

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::errors::{IntakeError, Result};
use crate::classification::Category;
use crate::storage::ItemFilter;

pub const MAX_LIST_LIMIT: i64 = 500;

/// Parse a `since` bound.
///
/// Accepts RFC 3339 (offsets allowed), a naive ISO-8601 datetime read as
/// UTC, or a plain date meaning midnight UTC.
pub fn parse_since(raw: &str) -> Result<DateTime<Utc>> {
    let value = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(IntakeError::InvalidTimestamp(raw.to_string()))
}

/// Build an [`ItemFilter`] from raw query values; blank values are ignored
pub fn build_filter(
    category: Option<&str>,
    since: Option<&str>,
    limit: Option<i64>,
) -> Result<ItemFilter> {
    let category = match non_blank(category) {
        Some(raw) => Some(raw.parse::<Category>()?),
        None => None,
    };
    let since = non_blank(since).map(parse_since).transpose()?;
    let limit = match limit {
        Some(n) if (1..=MAX_LIST_LIMIT).contains(&n) => Some(n as u32),
        Some(n) => return Err(IntakeError::InvalidLimit(n)),
        None => None,
    };

    Ok(ItemFilter {
        category,
        since,
        limit,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
