//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables.

/// Bearer token authentication model
pub mod api_token;
/// Tool category model
pub mod category;
/// Tool catalog metadata model
pub mod tool;
/// Shareable tool configuration model
pub mod tool_config;
