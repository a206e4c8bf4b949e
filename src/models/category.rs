//! Category data models and API request/response types.
//!
//! This module defines:
//! - `Category`: Database entity for a tool category
//! - `CreateCategoryRequest` / `UpdateCategoryRequest`: mutation bodies
//! - `PageQuery` / `Page<T>`: shared pagination types for list endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a category record from the database.
///
/// # Database Table
///
/// Maps to the `categories` table. Names are unique; tools join through
/// the `tool_categories` table.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Category {
    /// Unique identifier for this category
    pub id: Uuid,

    /// Unique display name, also usable as a lookup key
    pub name: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Manual ordering weight, lower sorts first in curated views
    pub sort: i32,

    /// Timestamp when the category was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of last update
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a category.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "anniversary",
///   "description": "Tools for anniversaries",
///   "sort": 10
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Category name (must be unique)
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Ordering weight (defaults to 0 if not provided)
    #[serde(default)]
    pub sort: i32,
}

/// Request body for updating a category.
///
/// All fields are optional; absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sort: Option<i32>,
}

/// Query-string parameters for paginated list endpoints.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Optional case-insensitive substring filter on name/description
    pub q: Option<String>,

    /// 1-based page number (defaults to 1)
    #[serde(default = "default_page")]
    pub page: i64,

    /// Page size (defaults to 20)
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

impl PageQuery {
    /// Row offset for the current page, clamped so page numbers below 1
    /// behave like page 1.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.page_size.max(1)
    }
}

/// One page of results plus paging metadata.
///
/// # JSON Example
///
/// ```json
/// {
///   "items": [ ... ],
///   "total": 42,
///   "page": 1,
///   "page_size": 20
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_query_defaults() {
        let query: PageQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 20);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn offset_clamps_out_of_range_pages() {
        let query: PageQuery = serde_json::from_value(json!({
            "page": 0,
            "page_size": 10
        }))
        .unwrap();
        assert_eq!(query.offset(), 0);

        let query: PageQuery = serde_json::from_value(json!({
            "page": 3,
            "page_size": 10
        }))
        .unwrap();
        assert_eq!(query.offset(), 20);
    }
}
