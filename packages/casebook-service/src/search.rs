mod category;
mod grouping;
mod ladder;
mod person;

use std::collections::HashMap;

use casebook_domain::SearchCriteria;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{AccessPrincipal, CasebookService, ServiceError, ServiceResult};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchRequest {
	pub query: String,
	pub principal: AccessPrincipal,
	#[serde(default)]
	pub page: PageRequest,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
	pub offset: i64,
	/// Page size. Falls back to the configured default when absent.
	pub limit: Option<i64>,
}

impl Default for PageRequest {
	fn default() -> Self {
		Self { offset: 0, limit: None }
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchPage<T> {
	/// Number of matching rows before pagination.
	pub total_count: i64,
	pub rows: Vec<T>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersonRow {
	pub person_id: i64,
	pub name: String,
	pub aliases: Vec<String>,
	pub identifiers: Vec<String>,
	pub current_titles: Vec<String>,
	pub current_commands: Vec<String>,
	pub score: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupingRow {
	pub grouping_id: i64,
	pub name: String,
	pub aliases: Vec<String>,
	pub counties: Vec<String>,
	pub score: f64,
}

/// Runs a person search as the request's principal. A blank query is not an
/// error; it returns the visible law-enforcement persons newest first.
pub async fn search_persons(
	service: &CasebookService,
	request: &SearchRequest,
) -> ServiceResult<SearchPage<PersonRow>> {
	let (limit, offset) = validate_page(&service.cfg.search, &request.page)?;
	let criteria = SearchCriteria::parse(&request.query, service.recognizer());
	let query = person::PersonQuery {
		criteria: &criteria,
		weights: &service.cfg.search.weights,
		principal: &request.principal,
		limit,
		offset,
	};
	let (total_count, rows) = person::run(&service.db, query).await?;

	record_search(service, "person", &request.principal, &request.query, &criteria).await;
	info!(entity = "person", total_count, returned = rows.len(), "Search completed.");

	Ok(SearchPage { total_count, rows })
}

/// Runs a grouping search as the request's principal.
pub async fn search_groupings(
	service: &CasebookService,
	request: &SearchRequest,
) -> ServiceResult<SearchPage<GroupingRow>> {
	let (limit, offset) = validate_page(&service.cfg.search, &request.page)?;
	let criteria = SearchCriteria::parse(&request.query, service.recognizer());
	let query = grouping::GroupingQuery {
		criteria: &criteria,
		weights: &service.cfg.search.weights,
		principal: &request.principal,
		limit,
		offset,
	};
	let (total_count, rows) = grouping::run(&service.db, query).await?;

	record_search(service, "grouping", &request.principal, &request.query, &criteria).await;
	info!(entity = "grouping", total_count, returned = rows.len(), "Search completed.");

	Ok(SearchPage { total_count, rows })
}

fn validate_page(
	search: &casebook_config::Search,
	page: &PageRequest,
) -> ServiceResult<(i64, i64)> {
	if page.offset < 0 {
		return Err(ServiceError::InvalidArgument {
			message: "page.offset must not be negative.".to_string(),
		});
	}

	let limit = page.limit.unwrap_or(search.default_limit);

	if limit <= 0 {
		return Err(ServiceError::InvalidArgument {
			message: "page.limit must be greater than zero.".to_string(),
		});
	}
	if limit > search.max_limit {
		return Err(ServiceError::InvalidArgument {
			message: format!("page.limit must not exceed {}.", search.max_limit),
		});
	}

	Ok((limit, page.offset))
}

/// Writes the audit entry for a completed search. Audit failures are logged
/// and swallowed; they must never fail the search itself.
async fn record_search(
	service: &CasebookService,
	entity: &str,
	principal: &AccessPrincipal,
	raw_query: &str,
	criteria: &SearchCriteria,
) {
	let payload = match serde_json::to_value(criteria) {
		Ok(payload) => payload,
		Err(err) => {
			warn!(error = %err, "Failed to serialize search criteria for the audit log.");

			return;
		},
	};
	let result = sqlx::query(
		"\
INSERT INTO search_log (
	entity,
	is_administrator,
	is_superuser,
	is_host,
	organization_id,
	raw_query,
	criteria
)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(entity)
	.bind(principal.is_administrator)
	.bind(principal.is_superuser)
	.bind(principal.is_host)
	.bind(principal.organization_id)
	.bind(raw_query)
	.bind(payload)
	.execute(&service.db.pool)
	.await;

	if let Err(err) = result {
		warn!(error = %err, entity, "Failed to record the search audit entry.");
	}
}

pub(crate) fn grouped(rows: Vec<(i64, String)>) -> HashMap<i64, Vec<String>> {
	let mut map: HashMap<i64, Vec<String>> = HashMap::new();

	for (id, name) in rows {
		map.entry(id).or_default().push(name);
	}

	map
}
