pub const SCHEMA_VERSION: i32 = 2;

pub const SCHEMA_V1: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL
);

-- Flat key-value storage; each value is an opaque UTF-8 document
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// V2 migration: track when each key was last written
pub const MIGRATION_V2: &str = r#"
ALTER TABLE kv_store ADD COLUMN updated_at TEXT;
"#;
