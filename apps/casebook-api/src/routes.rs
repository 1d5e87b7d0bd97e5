use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use casebook_service::{
	GroupingRow, PersonRow, SearchPage, SearchRequest, ServiceError, search_groupings,
	search_persons,
};
use serde::Serialize;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search/persons", post(persons))
		.route("/v1/search/groupings", post(groupings))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn persons(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchPage<PersonRow>>, ApiError> {
	let page = search_persons(&state.service, &payload).await?;

	Ok(Json(page))
}

async fn groupings(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchPage<GroupingRow>>, ApiError> {
	let page = search_groupings(&state.service, &payload).await?;

	Ok(Json(page))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let message = err.to_string();

		match err {
			ServiceError::InvalidArgument { .. } => Self {
				status: StatusCode::BAD_REQUEST,
				error_code: "invalid_argument",
				message,
			},
			ServiceError::StorageUnavailable { .. } => Self {
				status: StatusCode::SERVICE_UNAVAILABLE,
				error_code: "storage_unavailable",
				message,
			},
			ServiceError::SearchFailed { .. } => Self {
				status: StatusCode::INTERNAL_SERVER_ERROR,
				error_code: "search_failed",
				message,
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code.to_string(), message: self.message };

		(self.status, Json(body)).into_response()
	}
}
