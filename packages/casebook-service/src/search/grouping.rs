use casebook_config::Weights;
use casebook_domain::SearchCriteria;
use casebook_storage::db::Db;
use sqlx::{Postgres, QueryBuilder};

use crate::{
	ServiceResult,
	access::{AccessPrincipal, GROUPING_VISIBILITY, push_visibility},
	search::{
		GroupingRow, category::matching_county_ids, grouped, ladder::push_ladder,
	},
};

pub(crate) struct GroupingQuery<'a> {
	pub(crate) criteria: &'a SearchCriteria,
	pub(crate) weights: &'a Weights,
	pub(crate) principal: &'a AccessPrincipal,
	pub(crate) limit: i64,
	pub(crate) offset: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct CandidateRow {
	grouping_id: i64,
	name: String,
	score: f64,
}

pub(crate) async fn run(
	db: &Db,
	query: GroupingQuery<'_>,
) -> ServiceResult<(i64, Vec<GroupingRow>)> {
	let (total_count, candidates) = if query.criteria.is_blank() {
		run_blank(db, &query).await?
	} else {
		run_scored(db, &query).await?
	};

	if candidates.is_empty() {
		return Ok((total_count, Vec::new()));
	}

	let rows = hydrate(db, candidates).await?;

	Ok((total_count, rows))
}

async fn run_blank(
	db: &Db,
	query: &GroupingQuery<'_>,
) -> ServiceResult<(i64, Vec<CandidateRow>)> {
	let mut count = QueryBuilder::<Postgres>::new(
		"SELECT count(*) FROM groupings g WHERE g.is_law_enforcement AND ",
	);

	push_visibility(&mut count, query.principal, GROUPING_VISIBILITY);

	let total_count: i64 = count.build_query_scalar().fetch_one(&db.pool).await?;
	let mut page = QueryBuilder::<Postgres>::new(
		"\
SELECT g.grouping_id, g.name, 0::float8 AS score
FROM groupings g
WHERE g.is_law_enforcement AND ",
	);

	push_visibility(&mut page, query.principal, GROUPING_VISIBILITY);

	page.push(" ORDER BY g.created_at DESC, g.grouping_id DESC LIMIT ");
	page.push_bind(query.limit);
	page.push(" OFFSET ");
	page.push_bind(query.offset);

	let candidates = page.build_query_as().fetch_all(&db.pool).await?;

	Ok((total_count, candidates))
}

async fn run_scored(
	db: &Db,
	query: &GroupingQuery<'_>,
) -> ServiceResult<(i64, Vec<CandidateRow>)> {
	let county_ids = matching_county_ids(db, &query.criteria.text).await?;
	let mut count = QueryBuilder::<Postgres>::new("SELECT count(*) FROM (");

	push_candidates(&mut count, query, &county_ids);

	count.push(") ranked WHERE ranked.score > 0");

	let total_count: i64 = count.build_query_scalar().fetch_one(&db.pool).await?;
	let mut page = QueryBuilder::<Postgres>::new(
		"SELECT ranked.grouping_id, ranked.name, ranked.score FROM (",
	);

	push_candidates(&mut page, query, &county_ids);

	page.push(
		"\
) ranked
WHERE ranked.score > 0
ORDER BY ranked.score DESC, ranked.grouping_id ASC
LIMIT ",
	);
	page.push_bind(query.limit);
	page.push(" OFFSET ");
	page.push_bind(query.offset);

	let candidates = page.build_query_as().fetch_all(&db.pool).await?;

	Ok((total_count, candidates))
}

/// One scored row per grouping: its own name, the best-matching alias, and a
/// flat bonus when a linked county matches the query text.
fn push_candidates<'args>(
	builder: &mut QueryBuilder<'args, Postgres>,
	query: &GroupingQuery<'_>,
	county_ids: &[i64],
) {
	builder.push("SELECT g.grouping_id, g.name, (");
	push_ladder(builder, "g.name", &query.weights.primary_name, query.criteria);
	builder.push(" + COALESCE((SELECT MAX(");
	push_ladder(builder, "ga.name", &query.weights.primary_alias, query.criteria);
	builder.push(") FROM grouping_aliases ga WHERE ga.grouping_id = g.grouping_id), 0::float8)");
	builder.push(" + ");
	push_county_bonus(builder, query, county_ids);
	builder.push(") AS score FROM groupings g WHERE g.is_law_enforcement AND ");
	push_visibility(builder, query.principal, GROUPING_VISIBILITY);
}

fn push_county_bonus<'args>(
	builder: &mut QueryBuilder<'args, Postgres>,
	query: &GroupingQuery<'_>,
	county_ids: &[i64],
) {
	if county_ids.is_empty() {
		builder.push("0::float8");

		return;
	}

	builder.push(
		"\
(CASE WHEN EXISTS (
	SELECT 1
	FROM grouping_counties gc
	WHERE gc.grouping_id = g.grouping_id AND gc.county_id = ANY(",
	);
	builder.push_bind(county_ids.to_vec());
	builder.push(") ) THEN ");
	builder.push_bind(query.weights.county_bonus);
	builder.push(" ELSE 0::float8 END)");
}

async fn hydrate(db: &Db, candidates: Vec<CandidateRow>) -> ServiceResult<Vec<GroupingRow>> {
	let ids: Vec<i64> = candidates.iter().map(|row| row.grouping_id).collect();
	let mut aliases = grouped(
		sqlx::query_as(
			"\
SELECT ga.grouping_id, ga.name
FROM grouping_aliases ga
WHERE ga.grouping_id = ANY($1)
ORDER BY ga.name",
		)
		.bind(&ids)
		.fetch_all(&db.pool)
		.await?,
	);
	let mut counties = grouped(
		sqlx::query_as(
			"\
SELECT gc.grouping_id, c.name
FROM grouping_counties gc
JOIN counties c ON c.county_id = gc.county_id
WHERE gc.grouping_id = ANY($1)
ORDER BY c.name",
		)
		.bind(&ids)
		.fetch_all(&db.pool)
		.await?,
	);
	let rows = candidates
		.into_iter()
		.map(|candidate| GroupingRow {
			aliases: aliases.remove(&candidate.grouping_id).unwrap_or_default(),
			counties: counties.remove(&candidate.grouping_id).unwrap_or_default(),
			grouping_id: candidate.grouping_id,
			name: candidate.name,
			score: candidate.score,
		})
		.collect();

	Ok(rows)
}
