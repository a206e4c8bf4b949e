//! Tool catalog data models.
//!
//! This module defines:
//! - `ToolMetadata`: Database entity describing one interactive tool
//! - `ToolSummary`: The trimmed listing view returned by the tools index
//! - `ToolListQuery`: Query-string filters accepted by the listing endpoint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a tool metadata record from the database.
///
/// # Database Table
///
/// Maps to the `tool_metadata` table. One row per interactive tool
/// (text-card generator, starry-sky canvas, countdown capsule, ...).
/// The `tool_key` is the stable identifier configurations reference.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ToolMetadata {
    /// Unique identifier for this catalog entry
    pub id: Uuid,

    /// Stable key referenced by saved configurations and routes
    pub tool_key: String,

    /// Display name
    pub tool_name: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Optional free-form tag (e.g. "anniversary", "daily")
    pub tag: Option<String>,

    /// Inactive tools are hidden from all public reads
    pub is_active: bool,

    /// Timestamp when the entry was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of last update; listings sort newest-updated first
    pub updated_at: DateTime<Utc>,
}

/// Trimmed tool view for listing endpoints.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ToolSummary {
    pub tool_key: String,
    pub tool_name: String,
    pub description: Option<String>,
    pub tag: Option<String>,
}

/// Query-string filters for the tools listing.
///
/// All filters are optional and combine with AND:
/// - `q`: case-insensitive substring match on name or description
/// - `tag`: exact tag match
/// - `category`: category id or name; tools must belong to it
#[derive(Debug, Default, Deserialize)]
pub struct ToolListQuery {
    pub q: Option<String>,
    pub tag: Option<String>,
    pub category: Option<String>,
}
