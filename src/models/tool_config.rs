//! Shareable configuration data models and API request/response types.
//!
//! This module defines:
//! - `ToolConfig`: Database entity for a saved configuration
//! - `SaveConfigRequest` / `SaveConfigResponse`: the save endpoint's contract
//! - `SharedConfigResponse`: the public view returned for a share link

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a saved tool configuration from the database.
///
/// # Database Table
///
/// Maps to the `tool_configs` table. Each record:
/// - Carries an opaque JSON payload scoped to a tool by `tool_key`
/// - Is reachable through its public `share_id`
/// - Belongs to the authenticated user who saved it
///
/// # Visibility
///
/// A record is visible to readers only while `is_deleted` is false and
/// `expires_at` (when set) has not passed. Invisible records still exist
/// physically; purging them is a housekeeping concern outside this service.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ToolConfig {
    /// Internal identifier, `cfg_` followed by 24 random characters
    ///
    /// Distinct from the public `share_id`; never used for lookup by
    /// external callers.
    pub id: String,

    /// Which tool this configuration belongs to
    ///
    /// Opaque to this service. No foreign key is enforced; the tool layer
    /// owns the meaning of the key and the shape of the payload.
    pub tool_key: String,

    /// The configuration payload, stored and returned verbatim
    pub config: serde_json::Value,

    /// Public share token, the sole lookup key for retrieval
    ///
    /// Unique among live records (partial unique index). Possession of the
    /// share id is the read capability; no authentication is required.
    pub share_id: String,

    /// The user who saved this configuration
    pub owner_id: String,

    /// Optional client-supplied correlation string, opaque
    pub fingerprint: Option<String>,

    /// Optional expiry; once in the past the record reads as not-found
    pub expires_at: Option<DateTime<Utc>>,

    /// Soft-delete flag; deleted records are excluded from all reads
    pub is_deleted: bool,

    /// Timestamp when the configuration was saved
    pub created_at: DateTime<Utc>,

    /// Timestamp of last mutation
    pub updated_at: DateTime<Utc>,
}

/// Request body for saving a configuration.
///
/// # JSON Example
///
/// ```json
/// {
///   "tool_key": "warm-text-card",
///   "config": { "theme": "warm", "maxCards": 12 },
///   "expires_at": "2026-01-01T00:00:00Z"
/// }
/// ```
///
/// # Validation
///
/// - `tool_key`: Required, non-empty
/// - `config`: Required, must be a JSON object
/// - `fingerprint`: Optional, opaque
/// - `expires_at`: Optional; a past timestamp is accepted and the record is
///   simply never visible
#[derive(Debug, Deserialize)]
pub struct SaveConfigRequest {
    /// Which tool the configuration belongs to
    pub tool_key: String,

    /// The configuration payload
    pub config: serde_json::Value,

    /// Optional client correlation string
    pub fingerprint: Option<String>,

    /// Optional expiry timestamp (ISO 8601)
    pub expires_at: Option<DateTime<Utc>>,
}

/// Response body for a successful save.
///
/// # JSON Example
///
/// ```json
/// {
///   "share_id": "Xk92kaZ1Qm3f",
///   "record_id": "cfg_x1y2z3a4b5c6d7e8f9g0h1i2"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct SaveConfigResponse {
    /// Public share token for the saved configuration
    pub share_id: String,

    /// Internal record identifier
    pub record_id: String,
}

/// Public view of a shared configuration.
///
/// Returned by the share lookup endpoint. Omits `owner_id`, `fingerprint`
/// and the soft-delete/expiry bookkeeping, which are internal.
#[derive(Debug, Serialize)]
pub struct SharedConfigResponse {
    /// Internal record identifier
    pub id: String,

    /// Which tool the configuration belongs to
    pub tool_key: String,

    /// The configuration payload, verbatim as saved
    pub config: serde_json::Value,

    /// The share token that located this record
    pub share_id: String,

    /// When the configuration was saved
    pub created_at: DateTime<Utc>,
}

/// Convert the database record to its public view.
///
/// This transformation removes the internal `owner_id` and `fingerprint`
/// fields.
impl From<ToolConfig> for SharedConfigResponse {
    fn from(record: ToolConfig) -> Self {
        Self {
            id: record.id,
            tool_key: record.tool_key,
            config: record.config,
            share_id: record.share_id,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn save_request_optional_fields_default_to_none() {
        let request: SaveConfigRequest = serde_json::from_value(json!({
            "tool_key": "warm-text-card",
            "config": { "theme": "warm", "maxCards": 12 }
        }))
        .unwrap();

        assert_eq!(request.tool_key, "warm-text-card");
        assert!(request.fingerprint.is_none());
        assert!(request.expires_at.is_none());
    }

    #[test]
    fn shared_view_hides_owner_and_fingerprint() {
        let record = ToolConfig {
            id: "cfg_abcdefghijklmnopqrstuvwx".to_string(),
            tool_key: "starry-sky".to_string(),
            config: json!({ "stars": 200 }),
            share_id: "Xk92kaZ1Qm3f".to_string(),
            owner_id: "user-42".to_string(),
            fingerprint: Some("fp-1".to_string()),
            expires_at: None,
            is_deleted: false,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let view = SharedConfigResponse::from(record);
        let body = serde_json::to_value(&view).unwrap();

        assert_eq!(body["config"], json!({ "stars": 200 }));
        assert!(body.get("owner_id").is_none());
        assert!(body.get("fingerprint").is_none());
    }
}
