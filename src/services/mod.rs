//! Business logic services.
//!
//! Handlers stay thin; the rules live here.

/// Category CRUD and category-scoped tool listing
pub mod category_service;
/// Shareable configuration store: repository + save coordinator
pub mod config_service;
/// Random identifier generation for share links and record ids
pub mod share_id;
/// Tool catalog lookup and filtered listing
pub mod tool_service;
