//! Database schema definitions

/// Schema version stamped into `PRAGMA user_version`
pub const SCHEMA_VERSION: i64 = 1;

/// Default database file name
pub const DATABASE_NAME: &str = "risi.db";

/// SQL to create the rices table
pub const CREATE_RICES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS rices (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    breed TEXT,
    packaging INTEGER NOT NULL,
    price INTEGER NOT NULL DEFAULT 0
)
"#;

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![CREATE_RICES_TABLE]
}
