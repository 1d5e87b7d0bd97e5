use crate::{Result, db::Db};

/// Partially known date range attached to titles and command affiliations.
/// Zero components are unknown; a fully zero end marks a current record.
#[derive(Clone, Copy, Debug, Default)]
pub struct DateSpan {
	pub start_year: i16,
	pub start_month: i16,
	pub start_day: i16,
	pub end_year: i16,
	pub end_month: i16,
	pub end_day: i16,
	pub at_least_since: bool,
}

pub async fn insert_person(
	db: &Db,
	name: &str,
	is_law_enforcement: bool,
	admin_only: bool,
	host_only: bool,
) -> Result<i64> {
	let person_id = sqlx::query_scalar(
		"\
INSERT INTO persons (name, is_law_enforcement, admin_only, host_only)
VALUES ($1, $2, $3, $4)
RETURNING person_id",
	)
	.bind(name)
	.bind(is_law_enforcement)
	.bind(admin_only)
	.bind(host_only)
	.fetch_one(&db.pool)
	.await?;

	Ok(person_id)
}

pub async fn restrict_person_to_org(db: &Db, person_id: i64, organization_id: i64) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO person_access_orgs (person_id, organization_id)
VALUES ($1, $2)
ON CONFLICT DO NOTHING",
	)
	.bind(person_id)
	.bind(organization_id)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn insert_person_alias(db: &Db, person_id: i64, name: &str) -> Result<i64> {
	let alias_id = sqlx::query_scalar(
		"INSERT INTO person_aliases (person_id, name) VALUES ($1, $2) RETURNING alias_id",
	)
	.bind(person_id)
	.bind(name)
	.fetch_one(&db.pool)
	.await?;

	Ok(alias_id)
}

pub async fn insert_person_identifier(
	db: &Db,
	person_id: i64,
	identifier: &str,
	identifier_type: &str,
) -> Result<i64> {
	let identifier_id = sqlx::query_scalar(
		"\
INSERT INTO person_identifiers (person_id, identifier, identifier_type)
VALUES ($1, $2, $3)
RETURNING identifier_id",
	)
	.bind(person_id)
	.bind(identifier)
	.bind(identifier_type)
	.fetch_one(&db.pool)
	.await?;

	Ok(identifier_id)
}

pub async fn insert_title(db: &Db, name: &str) -> Result<i64> {
	let title_id = sqlx::query_scalar(
		"\
INSERT INTO titles (name)
VALUES ($1)
ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
RETURNING title_id",
	)
	.bind(name)
	.fetch_one(&db.pool)
	.await?;

	Ok(title_id)
}

pub async fn insert_county(db: &Db, name: &str) -> Result<i64> {
	let county_id = sqlx::query_scalar(
		"\
INSERT INTO counties (name)
VALUES ($1)
ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
RETURNING county_id",
	)
	.bind(name)
	.fetch_one(&db.pool)
	.await?;

	Ok(county_id)
}

pub async fn insert_person_title(
	db: &Db,
	person_id: i64,
	title_id: i64,
	span: DateSpan,
) -> Result<i64> {
	let person_title_id = sqlx::query_scalar(
		"\
INSERT INTO person_titles (
	person_id,
	title_id,
	start_year,
	start_month,
	start_day,
	end_year,
	end_month,
	end_day,
	at_least_since
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
RETURNING person_title_id",
	)
	.bind(person_id)
	.bind(title_id)
	.bind(span.start_year)
	.bind(span.start_month)
	.bind(span.start_day)
	.bind(span.end_year)
	.bind(span.end_month)
	.bind(span.end_day)
	.bind(span.at_least_since)
	.fetch_one(&db.pool)
	.await?;

	Ok(person_title_id)
}

pub async fn insert_grouping(
	db: &Db,
	name: &str,
	is_law_enforcement: bool,
	admin_only: bool,
	host_only: bool,
) -> Result<i64> {
	let grouping_id = sqlx::query_scalar(
		"\
INSERT INTO groupings (name, is_law_enforcement, admin_only, host_only)
VALUES ($1, $2, $3, $4)
RETURNING grouping_id",
	)
	.bind(name)
	.bind(is_law_enforcement)
	.bind(admin_only)
	.bind(host_only)
	.fetch_one(&db.pool)
	.await?;

	Ok(grouping_id)
}

pub async fn restrict_grouping_to_org(
	db: &Db,
	grouping_id: i64,
	organization_id: i64,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO grouping_access_orgs (grouping_id, organization_id)
VALUES ($1, $2)
ON CONFLICT DO NOTHING",
	)
	.bind(grouping_id)
	.bind(organization_id)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn insert_grouping_alias(db: &Db, grouping_id: i64, name: &str) -> Result<i64> {
	let alias_id = sqlx::query_scalar(
		"INSERT INTO grouping_aliases (grouping_id, name) VALUES ($1, $2) RETURNING alias_id",
	)
	.bind(grouping_id)
	.bind(name)
	.fetch_one(&db.pool)
	.await?;

	Ok(alias_id)
}

pub async fn link_grouping_county(db: &Db, grouping_id: i64, county_id: i64) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO grouping_counties (grouping_id, county_id)
VALUES ($1, $2)
ON CONFLICT DO NOTHING",
	)
	.bind(grouping_id)
	.bind(county_id)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn insert_person_grouping(
	db: &Db,
	person_id: i64,
	grouping_id: i64,
	link_type: &str,
	span: DateSpan,
) -> Result<i64> {
	let person_grouping_id = sqlx::query_scalar(
		"\
INSERT INTO person_groupings (
	person_id,
	grouping_id,
	type,
	start_year,
	start_month,
	start_day,
	end_year,
	end_month,
	end_day,
	at_least_since
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
RETURNING person_grouping_id",
	)
	.bind(person_id)
	.bind(grouping_id)
	.bind(link_type)
	.bind(span.start_year)
	.bind(span.start_month)
	.bind(span.start_day)
	.bind(span.end_year)
	.bind(span.end_month)
	.bind(span.end_day)
	.bind(span.at_least_since)
	.fetch_one(&db.pool)
	.await?;

	Ok(person_grouping_id)
}
