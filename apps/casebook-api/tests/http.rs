use axum::{
	body::{self, Body},
	http::{Request, StatusCode},
};
use tower::util::ServiceExt;

use casebook_api::{routes, state::AppState};
use casebook_config::{Config, Postgres, Search, Service, Storage};
use casebook_storage::queries;
use casebook_testkit::TestDatabase;

fn test_config(dsn: String) -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage { postgres: Postgres { dsn, pool_max_conns: 1 } },
		search: Search::default(),
	}
}

async fn test_env() -> Option<TestDatabase> {
	let base_dsn = match casebook_testkit::env_dsn() {
		Some(value) => value,
		None => {
			eprintln!("Skipping HTTP tests; set CASEBOOK_PG_DSN to run this test.");

			return None;
		},
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");

	Some(test_db)
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CASEBOOK_PG_DSN to run."]
async fn health_ok() {
	let Some(test_db) = test_env().await else {
		return;
	};
	let state = AppState::new(test_config(test_db.dsn().to_string()))
		.await
		.expect("Failed to initialize app state.");
	let app = routes::router(state);
	let response = app
		.oneshot(
			Request::builder()
				.uri("/health")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CASEBOOK_PG_DSN to run."]
async fn person_search_round_trips_over_http() {
	let Some(test_db) = test_env().await else {
		return;
	};
	let state = AppState::new(test_config(test_db.dsn().to_string()))
		.await
		.expect("Failed to initialize app state.");

	queries::insert_person(&state.service.db, "Jill Braaten", true, false, false)
		.await
		.expect("Failed to insert person.");

	let app = routes::router(state);
	let payload = serde_json::json!({
		"query": "jill braten",
		"principal": { "is_administrator": false },
	});
	let response = app
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/v1/search/persons")
				.header("content-type", "application/json")
				.body(Body::from(payload.to_string()))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call person search.");

	assert_eq!(response.status(), StatusCode::OK);

	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json: serde_json::Value = serde_json::from_slice(&bytes).expect("Failed to parse response.");

	assert_eq!(json["total_count"], 1);
	assert_eq!(json["rows"][0]["name"], "Jill Braaten");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CASEBOOK_PG_DSN to run."]
async fn bad_pagination_maps_to_bad_request() {
	let Some(test_db) = test_env().await else {
		return;
	};
	let state = AppState::new(test_config(test_db.dsn().to_string()))
		.await
		.expect("Failed to initialize app state.");
	let app = routes::router(state);
	let payload = serde_json::json!({
		"query": "anything",
		"principal": {},
		"page": { "offset": -1 },
	});
	let response = app
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/v1/search/groupings")
				.header("content-type", "application/json")
				.body(Body::from(payload.to_string()))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call grouping search.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json: serde_json::Value = serde_json::from_slice(&bytes).expect("Failed to parse response.");

	assert_eq!(json["error_code"], "invalid_argument");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
