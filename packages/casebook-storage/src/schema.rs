/// Idempotent schema bootstrap, applied statement by statement by
/// [`crate::db::Db::ensure_schema`].
pub const SCHEMA: &str = include_str!("../sql/schema.sql");
