//! Title and county lookup for one query. Both tables are tiny controlled
//! vocabularies; a category matches when its folded name appears inside the
//! folded query text, so "police officer smith" reaches "police officer" but
//! a bare "officer" does not.

use casebook_storage::{db::Db, fold::folded};

use crate::ServiceResult;

pub(crate) async fn matching_title_ids(db: &Db, text: &str) -> ServiceResult<Vec<i64>> {
	matching_ids(db, "titles", "title_id", text).await
}

pub(crate) async fn matching_county_ids(db: &Db, text: &str) -> ServiceResult<Vec<i64>> {
	matching_ids(db, "counties", "county_id", text).await
}

async fn matching_ids(
	db: &Db,
	table: &str,
	key_column: &str,
	text: &str,
) -> ServiceResult<Vec<i64>> {
	if text.is_empty() {
		return Ok(Vec::new());
	}

	// Folded names contain only [a-z0-9 ], so they are safe LIKE patterns.
	let name = folded("c.name");
	let sql = format!(
		"SELECT c.{key_column} FROM {table} c WHERE {name} <> '' AND $1 LIKE '%' || {name} || '%'"
	);
	let ids = sqlx::query_scalar(&sql)
		.bind(text.to_string())
		.fetch_all(&db.pool)
		.await?;

	Ok(ids)
}
