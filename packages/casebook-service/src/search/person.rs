use casebook_config::Weights;
use casebook_domain::SearchCriteria;
use casebook_storage::{db::Db, fold::escape_like};
use sqlx::{Postgres, QueryBuilder};

use crate::{
	ServiceResult,
	access::{AccessPrincipal, GROUPING_VISIBILITY, PERSON_VISIBILITY, push_visibility},
	search::{
		PersonRow,
		category::{matching_county_ids, matching_title_ids},
		grouped,
		ladder::push_ladder,
	},
};

pub(crate) struct PersonQuery<'a> {
	pub(crate) criteria: &'a SearchCriteria,
	pub(crate) weights: &'a Weights,
	pub(crate) principal: &'a AccessPrincipal,
	pub(crate) limit: i64,
	pub(crate) offset: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct CandidateRow {
	person_id: i64,
	name: String,
	score: f64,
}

pub(crate) async fn run(db: &Db, query: PersonQuery<'_>) -> ServiceResult<(i64, Vec<PersonRow>)> {
	let (total_count, candidates) = if query.criteria.is_blank() {
		run_blank(db, &query).await?
	} else {
		run_scored(db, &query).await?
	};

	if candidates.is_empty() {
		return Ok((total_count, Vec::new()));
	}

	let rows = hydrate(db, query.principal, candidates).await?;

	Ok((total_count, rows))
}

/// Blank queries have nothing to rank on; they page through the visible
/// law-enforcement persons newest first.
async fn run_blank(
	db: &Db,
	query: &PersonQuery<'_>,
) -> ServiceResult<(i64, Vec<CandidateRow>)> {
	let mut count = QueryBuilder::<Postgres>::new(
		"SELECT count(*) FROM persons p WHERE p.is_law_enforcement AND ",
	);

	push_visibility(&mut count, query.principal, PERSON_VISIBILITY);

	let total_count: i64 = count.build_query_scalar().fetch_one(&db.pool).await?;
	let mut page = QueryBuilder::<Postgres>::new(
		"\
SELECT p.person_id, p.name, 0::float8 AS score
FROM persons p
WHERE p.is_law_enforcement AND ",
	);

	push_visibility(&mut page, query.principal, PERSON_VISIBILITY);

	page.push(" ORDER BY p.created_at DESC, p.person_id DESC LIMIT ");
	page.push_bind(query.limit);
	page.push(" OFFSET ");
	page.push_bind(query.offset);

	let candidates = page.build_query_as().fetch_all(&db.pool).await?;

	Ok((total_count, candidates))
}

async fn run_scored(
	db: &Db,
	query: &PersonQuery<'_>,
) -> ServiceResult<(i64, Vec<CandidateRow>)> {
	let title_ids = matching_title_ids(db, &query.criteria.text).await?;
	let county_ids = matching_county_ids(db, &query.criteria.text).await?;
	let mut count = QueryBuilder::<Postgres>::new("SELECT count(*) FROM (");

	push_candidates(&mut count, query, &title_ids, &county_ids);

	count.push(") ranked WHERE ranked.score > 0 OR ranked.title_match");

	let total_count: i64 = count.build_query_scalar().fetch_one(&db.pool).await?;
	let mut page =
		QueryBuilder::<Postgres>::new("SELECT ranked.person_id, ranked.name, ranked.score FROM (");

	push_candidates(&mut page, query, &title_ids, &county_ids);

	page.push(
		"\
) ranked
WHERE ranked.score > 0 OR ranked.title_match
ORDER BY ranked.score DESC, ranked.person_id ASC
LIMIT ",
	);
	page.push_bind(query.limit);
	page.push(" OFFSET ");
	page.push_bind(query.offset);

	let candidates = page.build_query_as().fetch_all(&db.pool).await?;

	Ok((total_count, candidates))
}

/// One scored row per person. Every alias, command, and identifier source is
/// aggregated with MAX inside its own scalar subquery, so a person with many
/// matching aliases still surfaces exactly once.
fn push_candidates<'args>(
	builder: &mut QueryBuilder<'args, Postgres>,
	query: &PersonQuery<'_>,
	title_ids: &[i64],
	county_ids: &[i64],
) {
	builder.push("SELECT p.person_id, p.name, (");
	push_ladder(builder, "p.name", &query.weights.primary_name, query.criteria);
	builder.push(" + COALESCE((SELECT MAX(");
	push_ladder(builder, "pa.name", &query.weights.primary_alias, query.criteria);
	builder.push(") FROM person_aliases pa WHERE pa.person_id = p.person_id), 0::float8)");
	builder.push(" + COALESCE((SELECT MAX(");
	push_ladder(builder, "g.name", &query.weights.secondary_name, query.criteria);
	builder.push(
		"\
) FROM person_groupings pg
JOIN groupings g ON g.grouping_id = pg.grouping_id
WHERE pg.person_id = p.person_id
	AND pg.end_year = 0 AND pg.end_month = 0 AND pg.end_day = 0
	AND ",
	);
	push_visibility(builder, query.principal, GROUPING_VISIBILITY);
	builder.push("), 0::float8)");
	builder.push(" + COALESCE((SELECT MAX(");
	push_ladder(builder, "ga.name", &query.weights.secondary_alias, query.criteria);
	builder.push(
		"\
) FROM person_groupings pg
JOIN groupings g ON g.grouping_id = pg.grouping_id
JOIN grouping_aliases ga ON ga.grouping_id = g.grouping_id
WHERE pg.person_id = p.person_id
	AND pg.end_year = 0 AND pg.end_month = 0 AND pg.end_day = 0
	AND ",
	);
	push_visibility(builder, query.principal, GROUPING_VISIBILITY);
	builder.push("), 0::float8)");
	builder.push(" + ");
	push_identifier_score(builder, query);
	builder.push(" + ");
	push_county_bonus(builder, query, county_ids);
	builder.push(") AS score, ");
	push_title_match(builder, title_ids);
	builder.push(" AS title_match FROM persons p WHERE p.is_law_enforcement AND ");
	push_visibility(builder, query.principal, PERSON_VISIBILITY);
}

fn push_identifier_score<'args>(
	builder: &mut QueryBuilder<'args, Postgres>,
	query: &PersonQuery<'_>,
) {
	if query.criteria.identifiers.is_empty() {
		builder.push("0::float8");

		return;
	}

	builder.push("COALESCE((SELECT MAX(CASE WHEN lower(pi.identifier) IN (");

	for (index, identifier) in query.criteria.identifiers.iter().enumerate() {
		if index > 0 {
			builder.push(", ");
		}

		builder.push_bind(identifier.clone());
	}

	builder.push(") THEN ");
	builder.push_bind(query.weights.identifier_exact);
	builder.push(" WHEN ");

	for (index, identifier) in query.criteria.identifiers.iter().enumerate() {
		if index > 0 {
			builder.push(" OR ");
		}

		builder.push("lower(pi.identifier) LIKE '%' || ");
		builder.push_bind(escape_like(identifier));
		builder.push(" || '%'");
	}

	builder.push(" THEN ");
	builder.push_bind(query.weights.identifier_partial);
	builder.push(
		" ELSE 0::float8 END) FROM person_identifiers pi WHERE pi.person_id = p.person_id), 0::float8)",
	);
}

/// County affiliation reaches a person through their current commands, and
/// only through commands the principal may see.
fn push_county_bonus<'args>(
	builder: &mut QueryBuilder<'args, Postgres>,
	query: &PersonQuery<'_>,
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
	FROM person_groupings pg
	JOIN groupings g ON g.grouping_id = pg.grouping_id
	JOIN grouping_counties gc ON gc.grouping_id = g.grouping_id
	WHERE pg.person_id = p.person_id
		AND pg.end_year = 0 AND pg.end_month = 0 AND pg.end_day = 0
		AND gc.county_id = ANY(",
	);
	builder.push_bind(county_ids.to_vec());
	builder.push(") AND ");
	push_visibility(builder, query.principal, GROUPING_VISIBILITY);
	builder.push(") THEN ");
	builder.push_bind(query.weights.county_bonus);
	builder.push(" ELSE 0::float8 END)");
}

fn push_title_match<'args>(builder: &mut QueryBuilder<'args, Postgres>, title_ids: &[i64]) {
	if title_ids.is_empty() {
		builder.push("FALSE");

		return;
	}

	builder.push(
		"\
EXISTS (
	SELECT 1
	FROM person_titles pt
	WHERE pt.person_id = p.person_id
		AND pt.end_year = 0 AND pt.end_month = 0 AND pt.end_day = 0
		AND pt.title_id = ANY(",
	);
	builder.push_bind(title_ids.to_vec());
	builder.push("))");
}

async fn hydrate(
	db: &Db,
	principal: &AccessPrincipal,
	candidates: Vec<CandidateRow>,
) -> ServiceResult<Vec<PersonRow>> {
	let ids: Vec<i64> = candidates.iter().map(|row| row.person_id).collect();
	let mut aliases = grouped(
		sqlx::query_as(
			"\
SELECT pa.person_id, pa.name
FROM person_aliases pa
WHERE pa.person_id = ANY($1)
ORDER BY pa.name",
		)
		.bind(&ids)
		.fetch_all(&db.pool)
		.await?,
	);
	let mut identifiers = grouped(
		sqlx::query_as(
			"\
SELECT pi.person_id, pi.identifier
FROM person_identifiers pi
WHERE pi.person_id = ANY($1)
ORDER BY pi.identifier",
		)
		.bind(&ids)
		.fetch_all(&db.pool)
		.await?,
	);
	let mut titles = grouped(
		sqlx::query_as(
			"\
SELECT pt.person_id, t.name
FROM person_titles pt
JOIN titles t ON t.title_id = pt.title_id
WHERE pt.person_id = ANY($1)
	AND pt.end_year = 0 AND pt.end_month = 0 AND pt.end_day = 0
ORDER BY t.name",
		)
		.bind(&ids)
		.fetch_all(&db.pool)
		.await?,
	);
	let mut commands = QueryBuilder::<Postgres>::new(
		"\
SELECT pg.person_id, g.name
FROM person_groupings pg
JOIN groupings g ON g.grouping_id = pg.grouping_id
WHERE pg.person_id = ANY(",
	);

	commands.push_bind(ids);
	commands.push(") AND pg.end_year = 0 AND pg.end_month = 0 AND pg.end_day = 0 AND ");
	push_visibility(&mut commands, principal, GROUPING_VISIBILITY);
	commands.push(" ORDER BY g.name");

	let mut commands = grouped(commands.build_query_as().fetch_all(&db.pool).await?);
	let rows = candidates
		.into_iter()
		.map(|candidate| PersonRow {
			aliases: aliases.remove(&candidate.person_id).unwrap_or_default(),
			identifiers: identifiers.remove(&candidate.person_id).unwrap_or_default(),
			current_titles: titles.remove(&candidate.person_id).unwrap_or_default(),
			current_commands: commands.remove(&candidate.person_id).unwrap_or_default(),
			person_id: candidate.person_id,
			name: candidate.name,
			score: candidate.score,
		})
		.collect();

	Ok(rows)
}
