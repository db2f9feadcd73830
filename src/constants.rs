/// Expected database schema version
/// Databases created by other revisions must match this before serving
pub const EXPECTED_SCHEMA_VERSION: &str = "1";
