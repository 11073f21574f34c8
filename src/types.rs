/// Shared types used across the codebase

use serde_json::{Map, Value};

/// A schema-free record as stored and returned by every collection.
pub type Document = Map<String, Value>;

/// Store-managed internal identity.
pub const ID_FIELD: &str = "_id";
/// Store-managed creation timestamp (RFC 3339, UTC).
pub const CREATED_AT: &str = "createdAt";
/// Store-managed modification timestamp (RFC 3339, UTC).
pub const UPDATED_AT: &str = "updatedAt";

/// Fields that only the store may assign. Silently dropped from API payloads.
pub const SYSTEM_FIELDS: &[&str] = &[ID_FIELD, CREATED_AT, UPDATED_AT];
